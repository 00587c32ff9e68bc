use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Process-wide cache whose entries expire a fixed time after insertion.
///
/// Entries are never evicted early or invalidated; an expired entry is simply
/// ignored and overwritten by the next successful fetch.
#[derive(Debug, Clone)]
pub struct TtlCache<K, V> {
    entries: Arc<Mutex<HashMap<K, (Instant, V)>>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.lock().ok()?;
        entries
            .get(key)
            .filter(|(stored_at, _)| stored_at.elapsed() < self.ttl)
            .map(|(_, value)| value.clone())
    }

    pub fn insert(&self, key: K, value: V) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key, (Instant::now(), value));
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_within_ttl() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert(50usize, vec!["bench-press"]);

        assert_eq!(cache.get(&50), Some(vec!["bench-press"]));
        assert_eq!(cache.get(&100), None);
    }

    #[test]
    fn test_expired_entries_are_ignored() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.insert("deadlift", 1);

        assert_eq!(cache.get(&"deadlift"), None);
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let other = cache.clone();
        other.insert(1u8, "shared");

        assert_eq!(cache.get(&1), Some("shared"));
    }
}
