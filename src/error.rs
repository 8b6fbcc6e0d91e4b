/// Error types for the Sigma rule engine
use crate::parser::ParseError;
use crate::pattern::ValidationError;
use std::fmt::Display;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for rule parsing and loading
#[derive(Error, Debug)]
pub enum SigmaError {
    /// The document is not valid YAML or does not have the expected shape
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// A required rule field is absent
    #[error("missing required field '{field}'")]
    MissingField {
        /// Path of the missing field
        field: String,
    },

    /// A rule field is present but malformed
    #[error("invalid field '{field}': {message}")]
    InvalidField {
        /// Path of the offending field, e.g. `related[1].type`
        field: String,
        /// What is wrong with it
        message: String,
    },

    /// A search identifier contains an invalid modifier or pattern
    #[error("search identifier '{identifier}', key '{key}': {source}")]
    InvalidSearch {
        /// Search identifier owning the key
        identifier: String,
        /// The `field|modifier` key that failed
        key: String,
        /// Underlying validation failure
        #[source]
        source: ValidationError,
    },

    /// A condition string failed to parse
    #[error("condition {condition:?}: {source}")]
    Condition {
        /// The condition text
        condition: String,
        /// Underlying parser failure
        #[source]
        source: ParseError,
    },

    /// Valid Sigma that this engine does not evaluate (aggregations)
    #[error("unsupported Sigma feature: {feature}")]
    Unsupported {
        /// The feature that was used
        feature: String,
    },

    /// Wraps an error with the title of the rule it occurred in
    #[error("rule {title:?}: {source}")]
    InRule {
        /// Rule title
        title: String,
        /// The error raised while parsing the rule
        #[source]
        source: Box<SigmaError>,
    },

    /// Wraps an error with the rule file it occurred in
    #[error("{}: {source}", path.display())]
    InFile {
        /// Rule file
        path: PathBuf,
        /// The error raised while loading the file
        #[source]
        source: Box<SigmaError>,
    },

    /// IO operation failed while loading rules
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        /// File or directory being read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for Sigma operations
pub type Result<T> = std::result::Result<T, SigmaError>;

impl SigmaError {
    /// Whether the rule is valid Sigma that uses a feature this engine rejects
    pub fn is_unsupported(&self) -> bool {
        match self {
            SigmaError::Unsupported { .. } => true,
            SigmaError::InRule { source, .. } | SigmaError::InFile { source, .. } => {
                source.is_unsupported()
            }
            _ => false,
        }
    }

    pub(crate) fn invalid_field(field: impl Into<String>, message: impl Display) -> Self {
        SigmaError::InvalidField {
            field: field.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn missing_field(field: impl Into<String>) -> Self {
        SigmaError::MissingField {
            field: field.into(),
        }
    }

    pub(crate) fn in_rule(self, title: &str) -> Self {
        SigmaError::InRule {
            title: title.to_string(),
            source: Box::new(self),
        }
    }
}

/// Error for a single rule source that failed to load
#[derive(Error, Debug)]
#[error("{}: {error}", path.display())]
pub struct LoadError {
    /// Path to the file that failed to parse
    pub path: PathBuf,
    /// The specific error encountered
    pub error: SigmaError,
}
