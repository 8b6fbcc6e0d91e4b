use crate::error::{Result, SigmaError};
use crate::rule::metadata::UnknownVariant;
use serde_yaml::Value;
use std::fmt;
use std::str::FromStr;

/// How a rule relates to another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationType {
    /// Derived from the referenced rule
    Derived,
    /// Supersedes the referenced rule
    Obsoletes,
    /// Merged from the referenced rule
    Merged,
    /// Previously known under the referenced id
    Renamed,
    /// Covers similar activity
    Similar,
}

impl RelationType {
    /// The value as written in rules
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::Derived => "derived",
            RelationType::Obsoletes => "obsoletes",
            RelationType::Merged => "merged",
            RelationType::Renamed => "renamed",
            RelationType::Similar => "similar",
        }
    }
}

impl FromStr for RelationType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "derived" => Ok(RelationType::Derived),
            "obsoletes" => Ok(RelationType::Obsoletes),
            "merged" => Ok(RelationType::Merged),
            "renamed" => Ok(RelationType::Renamed),
            "similar" => Ok(RelationType::Similar),
            other => Err(UnknownVariant {
                kind: "relation type",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry of a rule's `related` list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    /// Id of the other rule
    pub id: String,
    /// Kind of relation
    pub relation_type: RelationType,
}

/// Parse the `related` field: a list of `{id, type}` mappings
pub(crate) fn parse_related(value: &Value) -> Result<Vec<Relation>> {
    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Sequence(items) => items,
        _ => return Err(SigmaError::invalid_field("related", "expected a list")),
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let Value::Mapping(entry) = item else {
                return Err(SigmaError::invalid_field(
                    format!("related[{i}]"),
                    "expected a mapping with id and type",
                ));
            };
            let id = entry
                .get("id")
                .ok_or_else(|| SigmaError::missing_field(format!("related[{i}].id")))?
                .as_str()
                .ok_or_else(|| {
                    SigmaError::invalid_field(format!("related[{i}].id"), "expected a string")
                })?;
            let relation_type = entry
                .get("type")
                .ok_or_else(|| SigmaError::missing_field(format!("related[{i}].type")))?
                .as_str()
                .ok_or_else(|| {
                    SigmaError::invalid_field(format!("related[{i}].type"), "expected a string")
                })?
                .parse::<RelationType>()
                .map_err(|e| SigmaError::invalid_field(format!("related[{i}].type"), e))?;

            Ok(Relation {
                id: id.to_string(),
                relation_type,
            })
        })
        .collect()
}
