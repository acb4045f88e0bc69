//! Bounded cache of compiled regular expressions for `go.matches_pattern`.
//!
//! LRU eviction at `MAX_REGEX_CACHE_SIZE` entries. Cloning shares the
//! underlying cache; moka handles concurrent access.

use std::sync::Arc;

use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use regex::Regex;
use regolint_core::constants::MAX_REGEX_CACHE_SIZE;

#[derive(Clone)]
pub struct RegexCache {
    cache: Cache<String, Arc<Regex>>,
}

impl Default for RegexCache {
    fn default() -> Self {
        Self::new(MAX_REGEX_CACHE_SIZE)
    }
}

impl RegexCache {
    pub fn new(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .eviction_policy(EvictionPolicy::lru())
            .build();
        Self { cache }
    }

    /// Compiled form of `pattern`, compiling and caching on a miss.
    /// Invalid patterns are never cached.
    pub fn get_or_compile(&self, pattern: &str) -> Result<Arc<Regex>, regex::Error> {
        if let Some(hit) = self.cache.get(pattern) {
            return Ok(hit);
        }
        let compiled = Arc::new(Regex::new(pattern)?);
        self.cache.insert(pattern.to_string(), Arc::clone(&compiled));
        Ok(compiled)
    }

    /// `text` matches `pattern`; an invalid pattern never matches.
    pub fn is_match(&self, text: &str, pattern: &str) -> bool {
        match self.get_or_compile(pattern) {
            Ok(re) => re.is_match(text),
            Err(err) => {
                tracing::debug!(pattern, error = %err, "invalid pattern in go.matches_pattern");
                false
            }
        }
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.cache.contains_key(pattern)
    }

    /// Approximate entry count; pending maintenance is flushed first.
    pub fn len(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for RegexCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegexCache")
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}
