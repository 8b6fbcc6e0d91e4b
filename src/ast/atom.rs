use crate::event::{Event, MatchOptions};
use crate::pattern::{
    compile, expand_placeholders, validate, MatcherCache, Modifier, ModifierSet, StringMatcher,
    ValidationError,
};
use std::borrow::Cow;
use tracing::{debug, warn};

/// Leaf of the expression tree: a field (or the message), a modifier list
/// and the raw patterns.
///
/// Validation and compilation run once in [`SearchAtom::new`]. Atoms using
/// `expand` only know their patterns at match time; their matcher is
/// compiled on first use and memoized per placeholder resolution.
#[derive(Debug, Clone)]
pub struct SearchAtom {
    field: Option<String>,
    modifiers: ModifierSet,
    patterns: Vec<String>,
    cache: MatcherCache,
}

impl SearchAtom {
    /// Create and validate an atom
    pub fn new<M: AsRef<str>>(
        field: Option<String>,
        modifiers: &[M],
        patterns: Vec<String>,
    ) -> Result<Self, ValidationError> {
        let modifiers = ModifierSet::parse(modifiers)?;
        validate(&modifiers, &patterns)?;

        let cache = if modifiers.has(Modifier::Expand) {
            MatcherCache::new()
        } else {
            let matcher = compile(field.is_some(), &modifiers, &patterns)?;
            MatcherCache::seeded(patterns.clone(), matcher)
        };

        Ok(Self {
            field,
            modifiers,
            patterns,
            cache,
        })
    }

    /// Fieldless, unmodified atom matching any of `patterns` in the message
    pub fn keywords(patterns: Vec<String>) -> Result<Self, ValidationError> {
        Self::new::<&str>(None, &[], patterns)
    }

    /// Target field, `None` for the free-text message
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Modifiers in rule order
    pub fn modifiers(&self) -> &ModifierSet {
        &self.modifiers
    }

    /// Raw patterns
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Fieldless and without modifiers
    pub fn is_plain_keyword(&self) -> bool {
        self.field.is_none() && self.modifiers.is_empty()
    }

    /// Evaluate against an event. Never fails: anything that prevents a
    /// matcher from being built is a non-match.
    pub fn matches(&self, event: &dyn Event, options: &MatchOptions) -> bool {
        let value = match &self.field {
            None => event.message(),
            Some(field) => event.field(field).unwrap_or(""),
        };

        let patterns: Cow<'_, [String]> = if self.modifiers.has(Modifier::Expand) {
            let expanded = expand_placeholders(&self.patterns, &options.placeholders);
            if expanded.is_empty() {
                return false;
            }
            Cow::Owned(expanded)
        } else {
            Cow::Borrowed(&self.patterns)
        };

        let compiled = self.cache.get_or_try_compile(&patterns, || {
            debug!(field = ?self.field, patterns = patterns.len(), "compiling search atom");
            compile(self.field.is_some(), &self.modifiers, &patterns)
        });

        match compiled {
            Ok(matcher) => matcher.string_match(value),
            Err(error) => {
                warn!(field = ?self.field, %error, "search atom cannot be compiled, treating as no match");
                false
            }
        }
    }

    /// Condition-like rendering for diagnostics
    pub fn describe(&self) -> String {
        let mut key = self.field.clone().unwrap_or_default();
        for modifier in self.modifiers.iter() {
            key.push('|');
            key.push_str(modifier.as_str());
        }
        if key.is_empty() {
            format!("{:?}", self.patterns)
        } else {
            format!("{key}: {:?}", self.patterns)
        }
    }
}

// The cache is derived state and takes no part in equality.
impl PartialEq for SearchAtom {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field
            && self.modifiers == other.modifiers
            && self.patterns == other.patterns
    }
}
