// Answer cache - normalized question to generated answer
// Author: kelexine (https://github.com/kelexine)

use crate::cache::models::CacheStats;
use parking_lot::{Mutex, RwLock};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tracing::debug;

/// Cache key for a question: the case-folded text.
pub fn normalize(question: &str) -> String {
    question.to_lowercase()
}

/// Process-lifetime cache of generated answers.
///
/// Entries never expire and are never evicted. Concurrent misses on the same
/// key are not coalesced: each caller generates and the last insert wins.
#[derive(Debug, Default)]
pub struct AnswerCache {
    entries: RwLock<HashMap<String, String>>,
    stats: Mutex<CacheStats>,
}

impl AnswerCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the cached answer for `question` (normalized first).
    pub fn get(&self, question: &str) -> Option<String> {
        let key = normalize(question);
        let found = self.entries.read().get(&key).cloned();

        let mut stats = self.stats.lock();
        if found.is_some() {
            debug!("Answer cache hit: {}", fingerprint(&key));
            stats.hits += 1;
        } else {
            debug!("Answer cache miss: {}", fingerprint(&key));
            stats.misses += 1;
        }

        found
    }

    /// Store `answer` under the normalized `question`, replacing any previous
    /// entry.
    pub fn insert(&self, question: &str, answer: String) {
        let key = normalize(question);
        debug!("Answer cache store: {}", fingerprint(&key));

        self.entries.write().insert(key, answer);
        self.stats.lock().stores += 1;
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        self.stats.lock().clone()
    }
}

/// Short stable identifier for a key, so logs never carry question text.
fn fingerprint(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    hex::encode(&digest[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_case_folds() {
        assert_eq!(normalize("What is FEVER?"), "what is fever?");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_fingerprint_is_stable_and_short() {
        let a = fingerprint("what is fever?");
        let b = fingerprint("what is fever?");
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
        assert_ne!(a, fingerprint("what is a cold?"));
    }

    #[test]
    fn test_last_write_wins() {
        let cache = AnswerCache::new();
        cache.insert("Q", "first".to_string());
        cache.insert("q", "second".to_string());

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("Q").as_deref(), Some("second"));
        assert_eq!(cache.stats().stores, 2);
    }
}
