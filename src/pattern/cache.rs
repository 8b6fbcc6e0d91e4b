//! Memoization cell for compiled matchers
//!
//! The cached matcher is derived data: it is a pure function of the atom's
//! field, modifiers and resolved patterns. Only the resolved patterns can
//! vary between calls (through `expand`), so they form the key. Concurrent
//! misses may compile twice; the last writer wins and both results behave
//! identically.

use crate::pattern::CompiledMatcher;
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug)]
struct CacheEntry {
    key: Vec<String>,
    matcher: Arc<CompiledMatcher>,
}

/// Single-slot, thread-safe matcher cache
#[derive(Debug, Default)]
pub struct MatcherCache {
    slot: RwLock<Option<CacheEntry>>,
}

impl MatcherCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache already holding the matcher for `key`
    pub fn seeded(key: Vec<String>, matcher: CompiledMatcher) -> Self {
        Self {
            slot: RwLock::new(Some(CacheEntry {
                key,
                matcher: Arc::new(matcher),
            })),
        }
    }

    /// Return the cached matcher for `key`, compiling and publishing it on a miss
    pub fn get_or_try_compile<E, F>(&self, key: &[String], compile: F) -> Result<Arc<CompiledMatcher>, E>
    where
        F: FnOnce() -> Result<CompiledMatcher, E>,
    {
        {
            let guard = self.slot.read();
            if let Some(entry) = guard.as_ref() {
                if entry.key == key {
                    return Ok(Arc::clone(&entry.matcher));
                }
            }
        }

        let matcher = Arc::new(compile()?);
        *self.slot.write() = Some(CacheEntry {
            key: key.to_vec(),
            matcher: Arc::clone(&matcher),
        });
        Ok(matcher)
    }

    /// Whether a matcher is currently cached
    #[cfg(test)]
    pub(crate) fn is_populated(&self) -> bool {
        self.slot.read().is_some()
    }
}

impl Clone for MatcherCache {
    // Clones share the compiled matcher, not the lock.
    fn clone(&self) -> Self {
        let entry = self.slot.read().as_ref().map(|entry| CacheEntry {
            key: entry.key.clone(),
            matcher: Arc::clone(&entry.matcher),
        });
        Self {
            slot: RwLock::new(entry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use std::convert::Infallible;

    fn any(pattern: &str) -> CompiledMatcher {
        CompiledMatcher::Any(Regex::new(pattern).unwrap())
    }

    #[test]
    fn test_hit_reuses_matcher() {
        let cache = MatcherCache::new();
        let key = vec!["a".to_string()];
        let first = cache
            .get_or_try_compile(&key, || Ok::<_, Infallible>(any("a")))
            .unwrap();
        let second = cache
            .get_or_try_compile(&key, || -> Result<CompiledMatcher, Infallible> {
                panic!("must not recompile on a hit")
            })
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_changed_key_recompiles() {
        let cache = MatcherCache::new();
        let a = cache
            .get_or_try_compile(&["a".to_string()], || Ok::<_, Infallible>(any("a")))
            .unwrap();
        let b = cache
            .get_or_try_compile(&["b".to_string()], || Ok::<_, Infallible>(any("b")))
            .unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_error_is_not_cached() {
        let cache = MatcherCache::new();
        let result = cache.get_or_try_compile(&["x".to_string()], || Err("boom"));
        assert_eq!(result.unwrap_err(), "boom");
        assert!(!cache.is_populated());
    }

    #[test]
    fn test_seeded_cache_hits_without_compiling() {
        let key = vec!["a".to_string()];
        let cache = MatcherCache::seeded(key.clone(), any("a"));
        assert!(cache.is_populated());

        let cloned = cache.clone();
        let first = cache
            .get_or_try_compile(&key, || -> Result<CompiledMatcher, Infallible> {
                panic!("seeded key must not recompile")
            })
            .unwrap();
        let second = cloned
            .get_or_try_compile(&key, || -> Result<CompiledMatcher, Infallible> {
                panic!("clones share the seeded matcher")
            })
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
