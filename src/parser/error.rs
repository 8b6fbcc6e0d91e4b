use thiserror::Error;

/// Parse error types for Sigma conditions
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The condition contains no tokens
    #[error("empty condition")]
    EmptyCondition,

    /// Token was not expected in this context
    #[error("unexpected token {token:?} at position {position}")]
    UnexpectedToken {
        /// Text of the unexpected token
        token: String,
        /// Byte offset in the condition
        position: usize,
    },

    /// The condition ended in the middle of an expression
    #[error("unexpected end of condition")]
    UnexpectedEof,

    /// Parentheses are not properly matched
    #[error("unmatched parenthesis at position {position}")]
    UnmatchedParenthesis {
        /// Byte offset of the unmatched parenthesis
        position: usize,
    },

    /// Referenced condition item is missing
    #[error("missing condition item: {key}")]
    MissingConditionItem {
        /// Key of the missing condition item
        key: String,
    },

    /// A quantifier pattern matched no search identifier
    #[error("no search identifier matches {pattern:?}")]
    NoMatchingIdentifiers {
        /// The identifier pattern
        pattern: String,
    },

    /// Glob pattern is invalid
    #[error("invalid glob pattern: {pattern}, error: {error}")]
    InvalidGlobPattern {
        /// The invalid pattern
        pattern: String,
        /// Error description
        error: String,
    },

    /// Aggregation expressions (`| count() ...`) are not evaluated
    #[error("aggregation not supported (at position {position})")]
    AggregationUnsupported {
        /// Byte offset of the pipe
        position: usize,
    },

    /// Recursion depth limit exceeded during parsing
    #[error("recursion depth limit exceeded: {current} levels, limit: {limit}")]
    RecursionLimitExceeded {
        /// Current recursion depth
        current: usize,
        /// Maximum allowed depth
        limit: usize,
    },
}

impl ParseError {
    /// Create an unexpected token error
    pub fn unexpected(item: &crate::lexer::Item) -> Self {
        ParseError::UnexpectedToken {
            token: item.value.clone(),
            position: item.position,
        }
    }

    /// Create a missing condition item error
    pub fn missing_condition_item(key: &str) -> Self {
        ParseError::MissingConditionItem {
            key: key.to_string(),
        }
    }
}
