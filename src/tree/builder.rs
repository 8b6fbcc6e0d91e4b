//! Builds a [`Detection`] from a rule's `detection` block

use crate::ast::{Expr, SearchAtom};
use crate::error::{Result, SigmaError};
use crate::parser::{parse_condition, ParseError};
use crate::rule::DetectionBlock;
use crate::tree::Detection;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Separates the field name from its modifiers in a search key
const MODIFIER_SEPARATOR: char = '|';

/// Build the expression tree for a detection block.
///
/// Every search identifier is compiled (and validated) before any condition
/// is parsed, so an invalid identifier is reported even when no condition
/// references it.
pub fn build_detection(block: &DetectionBlock) -> Result<Detection> {
    if block.has_timeframe() {
        return Err(SigmaError::Unsupported {
            feature: "timeframe".to_string(),
        });
    }

    let conditions = block.conditions()?;

    let mut identifiers = BTreeMap::new();
    for (name, value) in block.identifiers()? {
        let expr = build_identifier(name, value)?;
        identifiers.insert(name.to_string(), Expr::named(name, expr));
    }

    let exprs = conditions
        .iter()
        .map(|condition| {
            parse_condition(condition, &identifiers).map_err(|source| match source {
                ParseError::AggregationUnsupported { .. } => SigmaError::Unsupported {
                    feature: format!("aggregation in condition {condition:?}"),
                },
                source => SigmaError::Condition {
                    condition: condition.clone(),
                    source,
                },
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        identifiers = identifiers.len(),
        conditions = exprs.len(),
        "built detection"
    );
    Ok(Detection::new(Expr::or(exprs)))
}

/// Expression for one search identifier value
fn build_identifier(name: &str, value: &Value) -> Result<Expr> {
    let path = format!("detection.{name}");
    match value {
        Value::Null => Err(SigmaError::invalid_field(path, "search identifier has no value")),
        Value::Mapping(mapping) => build_mapping(name, mapping, &path),
        Value::Sequence(items) => build_list(name, items, &path),
        scalar => {
            let pattern = scalar_to_string(scalar)
                .ok_or_else(|| SigmaError::invalid_field(&path, "unsupported value type"))?;
            keyword_atom(name, vec![pattern])
        }
    }
}

fn build_list(name: &str, items: &[Value], path: &str) -> Result<Expr> {
    if items.is_empty() {
        return Err(SigmaError::invalid_field(path, "search identifier list is empty"));
    }

    // A plain keyword list becomes a single atom.
    let scalars: Option<Vec<String>> = items.iter().map(scalar_to_string).collect();
    if let Some(patterns) = scalars {
        return keyword_atom(name, patterns);
    }

    let exprs = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let item_path = format!("{path}[{i}]");
            match item {
                Value::Mapping(mapping) => build_mapping(name, mapping, &item_path),
                other => match scalar_to_string(other) {
                    Some(pattern) => keyword_atom(name, vec![pattern]),
                    None => Err(SigmaError::invalid_field(
                        item_path,
                        "list elements must be scalars or mappings",
                    )),
                },
            }
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Expr::or(exprs))
}

/// `field|modifier: value` pairs, all of which must match
fn build_mapping(name: &str, mapping: &Mapping, path: &str) -> Result<Expr> {
    if mapping.is_empty() {
        return Err(SigmaError::invalid_field(path, "search identifier mapping is empty"));
    }

    let atoms = mapping
        .iter()
        .map(|(key, value)| {
            let key = key
                .as_str()
                .ok_or_else(|| SigmaError::invalid_field(path, "field names must be strings"))?;
            build_field_atom(name, key, value, &format!("{path}.{key}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Expr::and(atoms))
}

fn build_field_atom(name: &str, key: &str, value: &Value, path: &str) -> Result<Expr> {
    let mut parts = key.split(MODIFIER_SEPARATOR);
    let field = parts
        .next()
        .filter(|field| !field.is_empty())
        .map(str::to_string);
    let modifiers: Vec<&str> = parts.collect();

    let patterns = match value {
        Value::Null => vec![String::new()],
        Value::Sequence(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => Some(String::new()),
                other => scalar_to_string(other),
            })
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| SigmaError::invalid_field(path, "list values must be scalars"))?,
        Value::Mapping(_) => {
            return Err(SigmaError::invalid_field(path, "nested mappings are not supported"))
        }
        scalar => vec![scalar_to_string(scalar)
            .ok_or_else(|| SigmaError::invalid_field(path, "unsupported value type"))?],
    };

    SearchAtom::new(field, modifiers.as_slice(), patterns)
        .map(Expr::from)
        .map_err(|source| SigmaError::InvalidSearch {
            identifier: name.to_string(),
            key: key.to_string(),
            source,
        })
}

fn keyword_atom(name: &str, patterns: Vec<String>) -> Result<Expr> {
    SearchAtom::keywords(patterns)
        .map(Expr::from)
        .map_err(|source| SigmaError::InvalidSearch {
            identifier: name.to_string(),
            key: name.to_string(),
            source,
        })
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
