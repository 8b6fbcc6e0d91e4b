//! Log entries and the event abstraction search atoms match against

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Anything a detection can be evaluated against
pub trait Event: Send + Sync {
    /// Free-text message, consulted by search atoms without a field
    fn message(&self) -> &str;

    /// Look up a field value, comparing field names case-insensitively.
    /// Returns the first matching field.
    fn field(&self, name: &str) -> Option<&str>;
}

/// A single structured log record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Free-text message
    #[serde(default)]
    pub message: String,
    /// Field name to value; iteration is in key order
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl LogEntry {
    /// Create an entry with a message and no fields
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Add a field, builder style
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

impl Event for LogEntry {
    fn message(&self) -> &str {
        &self.message
    }

    fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| fold_eq(key, name))
            .map(|(_, value)| value.as_str())
    }
}

/// Caller-supplied evaluation options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Placeholder name to literal values, consulted by `expand` atoms
    pub placeholders: HashMap<String, Vec<String>>,
}

impl MatchOptions {
    /// Options with no placeholders
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the values for one placeholder
    pub fn with_placeholder<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.placeholders
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }
}

/// Unicode case-insensitive string equality without allocating
pub(crate) fn fold_eq(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
