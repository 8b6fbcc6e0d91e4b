//! RuleSet implementation for loading and evaluating multiple Sigma rules
//!
//! Rules are loaded from files and directories through [`RuleSetBuilder`]
//! and evaluated independently against each event, either sequentially or
//! across the rayon thread pool.

use crate::error::{LoadError, Result, SigmaError};
use crate::event::{Event, MatchOptions};
use crate::rule::{Level, Logsource, Rule};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Extensions scanned in rule directories by default
pub const DEFAULT_EXTENSIONS: &[&str] = &["yml", "yaml"];

/// A rule together with where it was loaded from
#[derive(Debug, Clone)]
pub struct RuleHandle {
    /// The parsed rule
    pub rule: Rule,
    /// Source file path, if loaded from disk
    pub path: Option<PathBuf>,
}

/// A rule that matched an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleMatch {
    /// Rule title
    pub title: String,
    /// Rule id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Rule severity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    /// Rule tags
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl RuleMatch {
    fn from_rule(rule: &Rule) -> Self {
        Self {
            title: rule.title.clone(),
            id: rule.id.clone(),
            level: rule.level,
            tags: rule.tags.0.clone(),
        }
    }
}

/// Collection of parsed Sigma rules
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<RuleHandle>,
    /// Index of rules by ID for fast lookup
    rule_index: HashMap<String, usize>,
    errors: Vec<LoadError>,
}

impl RuleSet {
    /// Create a new empty ruleset
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parsed rule
    pub fn add_rule(&mut self, rule: Rule) {
        self.push(RuleHandle { rule, path: None });
    }

    fn push(&mut self, handle: RuleHandle) {
        if let Some(id) = &handle.rule.id {
            if self.rule_index.contains_key(id) {
                warn!(id = %id, title = %handle.rule.title, "duplicate rule id, lookup keeps the first");
            } else {
                self.rule_index.insert(id.clone(), self.rules.len());
            }
        }
        self.rules.push(handle);
    }

    /// Parse and add the rule in `path`
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "loading rule");
        let contents = std::fs::read(path).map_err(|source| SigmaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let rule = Rule::from_yaml(&contents).map_err(|e| SigmaError::InFile {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        self.push(RuleHandle {
            rule,
            path: Some(path.to_path_buf()),
        });
        Ok(())
    }

    /// Get the number of rules in the set
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the ruleset is empty
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in load order
    pub fn rules(&self) -> impl Iterator<Item = &RuleHandle> {
        self.rules.iter()
    }

    /// Look up a rule by id
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rule_index.get(id).map(|&i| &self.rules[i].rule)
    }

    /// Files that failed to parse while loading
    pub fn errors(&self) -> &[LoadError] {
        &self.errors
    }

    /// Keep only rules whose logsource satisfies `filter`
    pub fn retain_logsource(&mut self, filter: &Logsource) {
        self.rules.retain(|handle| handle.rule.logsource.matches(filter));
        self.rule_index.clear();
        for (i, handle) in self.rules.iter().enumerate() {
            if let Some(id) = &handle.rule.id {
                self.rule_index.entry(id.clone()).or_insert(i);
            }
        }
    }

    /// Evaluate all rules against an event, returning the matches in load order
    pub fn evaluate(&self, event: &dyn Event, options: &MatchOptions) -> Vec<RuleMatch> {
        self.rules
            .iter()
            .filter(|handle| handle.rule.matches(event, options))
            .map(|handle| RuleMatch::from_rule(&handle.rule))
            .collect()
    }

    /// Like [`RuleSet::evaluate`], spreading the rules over the rayon pool
    pub fn evaluate_parallel(&self, event: &dyn Event, options: &MatchOptions) -> Vec<RuleMatch> {
        self.rules
            .par_iter()
            .filter(|handle| handle.rule.matches(event, options))
            .map(|handle| RuleMatch::from_rule(&handle.rule))
            .collect()
    }
}

/// Builder for loading a [`RuleSet`] from disk
#[derive(Debug, Clone)]
pub struct RuleSetBuilder {
    /// Rule files and directories to load
    pub rule_paths: Vec<PathBuf>,
    /// Whether to fail on the first rule that does not parse
    pub fail_on_parse_error: bool,
    /// Whether to descend into subdirectories
    pub recursive: bool,
    /// File extensions considered in directories
    pub extensions: Vec<String>,
}

impl Default for RuleSetBuilder {
    fn default() -> Self {
        Self {
            rule_paths: vec![],
            fail_on_parse_error: false,
            recursive: true,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl RuleSetBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule file or directory
    pub fn add_rule_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.rule_paths.push(path.into());
        self
    }

    /// Set whether to fail on parse errors
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Set whether directories are scanned recursively
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Replace the extensions considered in directories
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Load every configured path.
    ///
    /// Unreadable paths are always errors. Rules that fail to parse are
    /// collected in [`RuleSet::errors`] unless `fail_on_parse_error` is set.
    pub fn build(&self) -> Result<RuleSet> {
        let mut ruleset = RuleSet::new();

        for root in &self.rule_paths {
            for path in self.rule_files(root)? {
                match ruleset.load_file(&path) {
                    Ok(()) => {}
                    Err(error @ SigmaError::Io { .. }) => return Err(error),
                    Err(error) if self.fail_on_parse_error => return Err(error),
                    Err(error) => {
                        warn!(path = %path.display(), %error, "skipping rule");
                        let error = match error {
                            SigmaError::InFile { source, .. } => *source,
                            other => other,
                        };
                        ruleset.errors.push(LoadError { path, error });
                    }
                }
            }
        }

        info!(
            rules = ruleset.len(),
            failed = ruleset.errors.len(),
            "loaded ruleset"
        );
        Ok(ruleset)
    }

    /// Rule files under `root` in file-name order; a file root is returned as is
    fn rule_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let mut files = Vec::new();

        for entry in WalkDir::new(root).max_depth(max_depth).sort_by_file_name() {
            let entry = entry.map_err(|e| SigmaError::Io {
                path: e.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf),
                source: e.into(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            // depth 0 is an explicitly named file
            if entry.depth() == 0 || self.has_rule_extension(entry.path()) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn has_rule_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
    }
}
