//! Rate limit record storage
//!
//! The limiter only needs get/set/delete per key plus a coarse sweep, so a
//! distributed cache can be swapped in for multi-instance deployments
//! without touching the window algorithm.

use dashmap::DashMap;

/// One accepted hit (or batch of hits) at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestRecord {
    pub timestamp_ms: i64,
    pub count: u32,
}

impl RequestRecord {
    pub fn hit(timestamp_ms: i64) -> Self {
        Self {
            timestamp_ms,
            count: 1,
        }
    }
}

/// Trait for rate limit storage backends
///
/// Keys are already namespaced (`"{identifier}:{key}"`). Records are kept in
/// insertion (chronological) order.
pub trait RateLimitStore: Send + Sync + 'static {
    /// Records for a key, oldest first. Unknown keys yield an empty list.
    fn get(&self, key: &str) -> Vec<RequestRecord>;

    /// Replace the records for a key.
    fn set(&self, key: &str, records: Vec<RequestRecord>);

    /// Drop a key entirely. No-op when absent.
    fn delete(&self, key: &str);

    /// Drop every key whose newest record is older than `cutoff_ms`.
    /// Returns the number of keys removed.
    fn sweep_expired(&self, cutoff_ms: i64) -> usize;

    /// Number of tracked keys
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local store backed by a sharded concurrent map
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, Vec<RequestRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RateLimitStore for MemoryStore {
    fn get(&self, key: &str) -> Vec<RequestRecord> {
        self.entries
            .get(key)
            .map(|records| records.value().clone())
            .unwrap_or_default()
    }

    fn set(&self, key: &str, records: Vec<RequestRecord>) {
        if records.is_empty() {
            self.entries.remove(key);
        } else {
            self.entries.insert(key.to_owned(), records);
        }
    }

    fn delete(&self, key: &str) {
        self.entries.remove(key);
    }

    fn sweep_expired(&self, cutoff_ms: i64) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, records| records.iter().any(|r| r.timestamp_ms >= cutoff_ms));
        before.saturating_sub(self.entries.len())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_unknown_key_is_empty() {
        let store = MemoryStore::new();
        assert!(store.get("api:nobody").is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_get_delete() {
        let store = MemoryStore::new();
        store.set("api:u1", vec![RequestRecord::hit(10), RequestRecord::hit(20)]);
        assert_eq!(store.get("api:u1").len(), 2);
        assert_eq!(store.len(), 1);

        store.delete("api:u1");
        store.delete("api:u1");
        assert!(store.get("api:u1").is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_empty_removes_key() {
        let store = MemoryStore::new();
        store.set("api:u1", vec![RequestRecord::hit(10)]);
        store.set("api:u1", Vec::new());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_sweep_keeps_keys_with_any_recent_record() {
        let store = MemoryStore::new();
        store.set("api:old", vec![RequestRecord::hit(100), RequestRecord::hit(200)]);
        store.set("api:mixed", vec![RequestRecord::hit(100), RequestRecord::hit(5_000)]);
        store.set("api:new", vec![RequestRecord::hit(6_000)]);

        let removed = store.sweep_expired(1_000);

        assert_eq!(removed, 1);
        assert!(store.get("api:old").is_empty());
        assert_eq!(store.get("api:mixed").len(), 2);
        assert_eq!(store.get("api:new").len(), 1);
    }
}
