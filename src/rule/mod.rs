//! Sigma rule parsing and representation
//!
//! This module parses Sigma rules from YAML and assembles them, together with
//! their compiled [`Detection`], into an immutable [`Rule`].
//!
//! # Example
//!
//! ```
//! use sigma_match::{parse_rule, LogEntry, MatchOptions};
//!
//! # fn example() -> anyhow::Result<()> {
//! let rule = parse_rule(r#"
//! title: Suspicious Process Creation
//! id: 12345678-1234-1234-1234-123456789abc
//! status: stable
//! detection:
//!   selection:
//!     EventID: 1
//!     CommandLine|contains: 'powershell'
//!   condition: selection
//! "#)?;
//!
//! let entry = LogEntry::default()
//!     .with_field("EventID", "1")
//!     .with_field("CommandLine", "powershell.exe -enc AAAA");
//! assert!(rule.matches(&entry, &MatchOptions::default()));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use crate::error::{Result, SigmaError};
use crate::event::{Event, MatchOptions};
use crate::tree::{build_detection, Detection};
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// `date` and `modified` values
pub mod date;
/// The raw `detection` block
pub mod detection;
pub mod logsource;
pub mod metadata;
/// The `related` list
pub mod related;
pub mod tags;

pub use date::{DateParseError, RuleDate};
pub use detection::DetectionBlock;
pub use logsource::Logsource;
pub use metadata::{Level, Status, UnknownVariant};
pub use related::{Relation, RelationType};
pub use tags::Tags;

/// A parsed Sigma rule.
/// https://github.com/SigmaHQ/sigma-specification
#[derive(Debug, Clone)]
pub struct Rule {
    /// Rule title
    pub title: String,
    /// Unique rule identifier
    pub id: Option<String>,
    /// Relations to other rules
    pub related: Vec<Relation>,
    /// Maturity of the rule
    pub status: Option<Status>,
    /// Rule description
    pub description: Option<String>,
    /// External references
    pub references: Vec<String>,
    /// Rule author
    pub author: Option<String>,
    /// Creation date
    pub date: Option<RuleDate>,
    /// Last modification date
    pub modified: Option<RuleDate>,
    /// Rule tags for categorization
    pub tags: Tags,
    /// Severity level
    pub level: Option<Level>,
    /// Log source configuration
    pub logsource: Logsource,
    /// Fields relevant to this rule
    pub fields: Vec<String>,
    /// Known false positive scenarios
    pub falsepositives: Vec<String>,
    /// Top-level keys without a dedicated field
    pub extra: BTreeMap<String, Value>,
    /// Compiled detection logic
    pub detection: Detection,
}

/// Wire shape of a rule document, before validation
#[derive(Debug, Deserialize)]
struct RawRule {
    title: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    related: Value,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    references: Vec<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    modified: Option<String>,
    #[serde(default)]
    tags: Tags,
    #[serde(default)]
    level: Option<String>,
    #[serde(default)]
    logsource: Logsource,
    #[serde(default)]
    fields: Vec<String>,
    #[serde(default)]
    falsepositives: Vec<String>,
    #[serde(default)]
    detection: Option<DetectionBlock>,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

impl Rule {
    /// Parse a rule from YAML bytes
    pub fn from_yaml(data: &[u8]) -> Result<Rule> {
        let raw: RawRule = serde_yaml::from_slice(data)?;

        let title = raw.title.clone().ok_or_else(|| SigmaError::missing_field("title"))?;
        if title.trim().is_empty() {
            return Err(SigmaError::invalid_field("title", "must not be empty"));
        }

        let rule = assemble(title.clone(), raw).map_err(|e| e.in_rule(&title))?;
        debug!(
            title = %rule.title,
            identifiers = rule.detection.expr.identifiers().len(),
            "parsed rule"
        );
        Ok(rule)
    }

    /// Evaluate an event against the rule's detection
    pub fn matches(&self, event: &dyn Event, options: &MatchOptions) -> bool {
        self.detection.matches(event, options)
    }

    /// Check if the rule carries all provided tags
    pub fn has_tags<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        self.tags.has_all(tags)
    }
}

/// Parse a rule from YAML text
pub fn parse_rule(text: &str) -> Result<Rule> {
    Rule::from_yaml(text.as_bytes())
}

fn assemble(title: String, raw: RawRule) -> Result<Rule> {
    let detection = raw
        .detection
        .as_ref()
        .ok_or_else(|| SigmaError::missing_field("detection"))
        .and_then(build_detection)?;

    Ok(Rule {
        title,
        id: raw.id,
        related: related::parse_related(&raw.related)?,
        status: parse_enum(raw.status.as_deref(), "status")?,
        description: raw.description,
        references: raw.references,
        author: raw.author,
        date: parse_date(raw.date.as_deref(), "date")?,
        modified: parse_date(raw.modified.as_deref(), "modified")?,
        tags: raw.tags,
        level: parse_enum(raw.level.as_deref(), "level")?,
        logsource: raw.logsource,
        fields: raw.fields,
        falsepositives: raw.falsepositives,
        extra: raw.extra,
        detection,
    })
}

fn parse_enum<T>(value: Option<&str>, field: &str) -> Result<Option<T>>
where
    T: std::str::FromStr<Err = UnknownVariant>,
{
    value
        .map(|v| v.parse::<T>().map_err(|e| SigmaError::invalid_field(field, e)))
        .transpose()
}

fn parse_date(value: Option<&str>, field: &str) -> Result<Option<RuleDate>> {
    value
        .map(|v| v.parse::<RuleDate>().map_err(|e| SigmaError::invalid_field(field, e)))
        .transpose()
}
