use crate::error::{Result, SigmaError};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;

const CONDITION_KEY: &str = "condition";
const TIMEFRAME_KEY: &str = "timeframe";

/// The raw `detection` block of a rule: the condition(s) plus the search
/// identifiers, in document order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct DetectionBlock(pub Mapping);

impl DetectionBlock {
    /// Condition strings. A single string or a non-empty list of strings.
    pub fn conditions(&self) -> Result<Vec<String>> {
        let field = "detection.condition";
        match self.0.get(CONDITION_KEY) {
            None => Err(SigmaError::missing_field(field)),
            Some(Value::String(condition)) => Ok(vec![condition.clone()]),
            Some(Value::Sequence(items)) if !items.is_empty() => items
                .iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::String(condition) => Ok(condition.clone()),
                    _ => Err(SigmaError::invalid_field(
                        format!("{field}[{i}]"),
                        "condition must be a string",
                    )),
                })
                .collect(),
            Some(Value::Sequence(_)) => {
                Err(SigmaError::invalid_field(field, "condition list is empty"))
            }
            Some(_) => Err(SigmaError::invalid_field(
                field,
                "expected a string or a list of strings",
            )),
        }
    }

    /// Search identifiers and their values, sorted by name
    pub fn identifiers(&self) -> Result<BTreeMap<&str, &Value>> {
        let mut identifiers = BTreeMap::new();
        for (key, value) in &self.0 {
            let name = key.as_str().ok_or_else(|| {
                SigmaError::invalid_field("detection", "search identifier names must be strings")
            })?;
            if name != CONDITION_KEY {
                identifiers.insert(name, value);
            }
        }
        Ok(identifiers)
    }

    /// Whether a `timeframe` key appears anywhere in the block
    pub fn has_timeframe(&self) -> bool {
        mapping_has_key(&self.0, TIMEFRAME_KEY)
    }
}

fn mapping_has_key(mapping: &Mapping, key: &str) -> bool {
    mapping
        .iter()
        .any(|(k, v)| k.as_str() == Some(key) || value_has_key(v, key))
}

fn value_has_key(value: &Value, key: &str) -> bool {
    match value {
        Value::Mapping(mapping) => mapping_has_key(mapping, key),
        Value::Sequence(items) => items.iter().any(|item| value_has_key(item, key)),
        Value::Tagged(tagged) => value_has_key(&tagged.value, key),
        _ => false,
    }
}
