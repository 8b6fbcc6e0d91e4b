use thiserror::Error;

/// Errors raised while validating or compiling a search atom
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The atom has no patterns
    #[error("no patterns defined for search atom")]
    EmptyPatterns,

    /// Modifier token outside the supported vocabulary
    #[error("unknown modifier {0:?}")]
    UnknownModifier(String),

    /// Empty modifier token, e.g. `field||contains`
    #[error("empty modifier")]
    EmptyModifier,

    /// `expand` used in a position other than first
    #[error("'expand' must be the first modifier")]
    ExpandNotFirst,

    /// `expand` pattern that is not a `%name%` placeholder
    #[error("placeholder {0:?} must be wrapped in '%'")]
    InvalidPlaceholder(String),

    /// Pattern does not compile as a regular expression
    #[error("invalid regular expression {pattern:?}: {source}")]
    InvalidRegex {
        /// Offending regular expression
        pattern: String,
        /// Compiler error
        #[source]
        source: regex::Error,
    },

    /// The compiled matcher exceeds the regex size limit
    #[error("patterns compile to more than {limit} bytes")]
    RegexTooLarge {
        /// Size limit in bytes
        limit: usize,
    },

    /// Pattern is not an IPv4 or IPv6 network
    #[error("invalid CIDR {pattern:?}: {source}")]
    InvalidCidr {
        /// Offending CIDR literal
        pattern: String,
        /// Parser error
        #[source]
        source: ipnetwork::IpNetworkError,
    },

    /// Two modifiers each select a different pattern interpretation
    #[error("modifiers '{0}' and '{1}' cannot be combined")]
    ConflictingModifiers(&'static str, &'static str),
}
