//! Factory functions for validating and compiling search atom patterns

use crate::pattern::{
    escape::glob_to_regex,
    string_matcher::CompiledMatcher,
    transform::{base64_encode, base64_offset_variants, windash_variants},
    Modifier, ModifierSet, PatternMode, ValidationError,
};
use ipnetwork::IpNetwork;
use regex::{Regex, RegexBuilder};
use std::borrow::Cow;
use std::collections::HashMap;

/// Compiled program size limit. Large IOC lists compile into a single
/// alternation, well beyond the `regex` default of 10 MiB.
const REGEX_SIZE_LIMIT: usize = 256 * 1024 * 1024;

/// Lazy DFA cache limit per regex
const DFA_SIZE_LIMIT: usize = 32 * 1024 * 1024;

/// Check a pattern list against its modifiers.
///
/// With `expand` every pattern must be a `%name%` placeholder and the content
/// checks for `re` and `cidr` are deferred to match time.
pub fn validate(modifiers: &ModifierSet, patterns: &[String]) -> Result<(), ValidationError> {
    if patterns.is_empty() {
        return Err(ValidationError::EmptyPatterns);
    }

    if modifiers.has(Modifier::Expand) {
        if let Some(bad) = patterns.iter().find(|p| placeholder_name(p).is_none()) {
            return Err(ValidationError::InvalidPlaceholder(bad.clone()));
        }
        return Ok(());
    }

    match modifiers.mode() {
        PatternMode::Regex => {
            for pattern in patterns {
                build_regex(pattern)?;
            }
        }
        PatternMode::Cidr => {
            for pattern in patterns {
                parse_network(pattern)?;
            }
        }
        PatternMode::Glob => {}
    }
    Ok(())
}

/// Name inside a `%name%` placeholder
pub fn placeholder_name(pattern: &str) -> Option<&str> {
    pattern.strip_prefix('%')?.strip_suffix('%')
}

/// Replace every `%name%` pattern by the caller's values for `name`.
/// Unknown names contribute nothing.
pub fn expand_placeholders(
    patterns: &[String],
    placeholders: &HashMap<String, Vec<String>>,
) -> Vec<String> {
    patterns
        .iter()
        .filter_map(|p| placeholder_name(p))
        .filter_map(|name| placeholders.get(name))
        .flatten()
        .cloned()
        .collect()
}

/// Build the matcher for a resolved pattern list.
///
/// `field_bound` is true when the atom targets a named field; such matches
/// are anchored unless `contains`, `startswith` or `endswith` relax an end.
pub fn compile(
    field_bound: bool,
    modifiers: &ModifierSet,
    patterns: &[String],
) -> Result<CompiledMatcher, ValidationError> {
    if patterns.is_empty() {
        return Err(ValidationError::EmptyPatterns);
    }

    if modifiers.mode() == PatternMode::Cidr {
        let networks = patterns
            .iter()
            .map(|p| parse_network(p))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(CompiledMatcher::Cidr {
            networks,
            all: modifiers.has(Modifier::All),
        });
    }

    let contains = modifiers.has(Modifier::Contains);
    let prefix = if field_bound && !contains && !modifiers.has(Modifier::EndsWith) {
        "^"
    } else {
        ""
    };
    let suffix = if field_bound && !contains && !modifiers.has(Modifier::StartsWith) {
        "$"
    } else {
        ""
    };

    let fragments: Vec<String> = patterns.iter().map(|p| fragment(modifiers, p)).collect();

    if modifiers.has(Modifier::All) {
        let regexes = fragments
            .iter()
            .map(|f| build_regex(&format!("{prefix}(?:{f}){suffix}")))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CompiledMatcher::All(regexes))
    } else {
        let source = format!("{prefix}(?:{}){suffix}", fragments.join("|"));
        Ok(CompiledMatcher::Any(build_regex(&source)?))
    }
}

/// Regex fragment for one pattern, without anchors
fn fragment(modifiers: &ModifierSet, pattern: &str) -> String {
    if modifiers.mode() == PatternMode::Regex {
        return format!("({pattern})");
    }

    if modifiers.has(Modifier::Base64Offset) {
        return alternation(&base64_offset_variants(pattern.as_bytes()));
    }

    let value: Cow<'_, str> = if modifiers.has(Modifier::Base64) {
        Cow::Owned(base64_encode(pattern))
    } else {
        Cow::Borrowed(pattern)
    };

    if modifiers.has(Modifier::WinDash) {
        return match windash_variants(&value) {
            Some(variants) => alternation(&variants),
            None => regex::escape(&value),
        };
    }

    glob_to_regex(&value)
}

fn alternation(literals: &[String]) -> String {
    literals
        .iter()
        .map(|l| regex::escape(l))
        .collect::<Vec<_>>()
        .join("|")
}

fn build_regex(source: &str) -> Result<Regex, ValidationError> {
    RegexBuilder::new(source)
        .case_insensitive(true)
        .size_limit(REGEX_SIZE_LIMIT)
        .dfa_size_limit(DFA_SIZE_LIMIT)
        .build()
        .map_err(|error| match error {
            regex::Error::CompiledTooBig(limit) => ValidationError::RegexTooLarge { limit },
            error => ValidationError::InvalidRegex {
                pattern: source.to_string(),
                source: error,
            },
        })
}

fn parse_network(pattern: &str) -> Result<IpNetwork, ValidationError> {
    pattern
        .parse::<IpNetwork>()
        .map_err(|source| ValidationError::InvalidCidr {
            pattern: pattern.to_string(),
            source,
        })
}
