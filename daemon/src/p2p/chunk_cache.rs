use lru::LruCache;

/// Size-bounded associative cache contract, keyed by content reference.
///
/// Entries carry an explicit byte weight so the cache can bound memory, not
/// just entry count. The reassembly worker is the only writer; the contract
/// therefore exposes `&mut self` access and leaves thread safety to the
/// owner.
pub trait Cacher<V>: Send {
    /// Inserts or replaces the entry, weighted by `size` bytes.
    fn put(&mut self, key: Vec<u8>, value: V, size: usize);

    /// Looks up an entry, refreshing its recency.
    fn get(&mut self, key: &[u8]) -> Option<&V>;

    fn remove(&mut self, key: &[u8]) -> Option<V>;

    fn has(&self, key: &[u8]) -> bool;

    /// All keys currently cached, most recently used first.
    fn keys(&self) -> Vec<Vec<u8>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct WeightedEntry<V> {
    value: V,
    size: usize,
}

/// LRU cache bounded by the total byte weight of its entries. When the
/// budget is exceeded, least-recently-used entries are dropped until the
/// cache fits again; the most recent insertion is never evicted by its own
/// arrival.
pub struct ChunkCache<V> {
    entries: LruCache<Vec<u8>, WeightedEntry<V>>,
    max_bytes: usize,
    used_bytes: usize,
}

impl<V> ChunkCache<V> {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            entries: LruCache::unbounded(),
            max_bytes,
            used_bytes: 0,
        }
    }

    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    fn evict_over_budget(&mut self) {
        while self.used_bytes > self.max_bytes && self.entries.len() > 1 {
            if let Some((_, evicted)) = self.entries.pop_lru() {
                self.used_bytes -= evicted.size;
            }
        }
    }
}

impl<V: Send> Cacher<V> for ChunkCache<V> {
    fn put(&mut self, key: Vec<u8>, value: V, size: usize) {
        if let Some(previous) = self.entries.put(key, WeightedEntry { value, size }) {
            self.used_bytes -= previous.size;
        }
        self.used_bytes += size;
        self.evict_over_budget();
    }

    fn get(&mut self, key: &[u8]) -> Option<&V> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    fn remove(&mut self, key: &[u8]) -> Option<V> {
        let entry = self.entries.pop(key)?;
        self.used_bytes -= entry.size;
        Some(entry.value)
    }

    fn has(&self, key: &[u8]) -> bool {
        self.entries.contains(key)
    }

    fn keys(&self) -> Vec<Vec<u8>> {
        self.entries.iter().map(|(key, _)| key.clone()).collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_remove() {
        let mut cache = ChunkCache::new(1024);
        cache.put(b"ref1".to_vec(), 1u32, 10);

        assert!(cache.has(b"ref1"));
        assert_eq!(cache.get(b"ref1"), Some(&1));
        assert_eq!(cache.used_bytes(), 10);

        assert_eq!(cache.remove(b"ref1"), Some(1));
        assert!(!cache.has(b"ref1"));
        assert_eq!(cache.used_bytes(), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_replacing_an_entry_updates_its_weight() {
        let mut cache = ChunkCache::new(1024);
        cache.put(b"ref1".to_vec(), 1u32, 10);
        cache.put(b"ref1".to_vec(), 2u32, 30);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.used_bytes(), 30);
        assert_eq!(cache.get(b"ref1"), Some(&2));
    }

    #[test]
    fn test_evicts_least_recently_used_over_budget() {
        let mut cache = ChunkCache::new(100);
        cache.put(b"ref1".to_vec(), 1u32, 60);
        cache.put(b"ref2".to_vec(), 2u32, 30);

        // Touch ref1 so ref2 becomes the eviction candidate.
        cache.get(b"ref1");
        cache.put(b"ref3".to_vec(), 3u32, 40);

        assert!(cache.has(b"ref1"));
        assert!(!cache.has(b"ref2"));
        assert!(cache.has(b"ref3"));
        assert_eq!(cache.used_bytes(), 100);
    }

    #[test]
    fn test_single_oversized_entry_is_kept() {
        let mut cache = ChunkCache::new(10);
        cache.put(b"ref1".to_vec(), 1u32, 50);

        assert!(cache.has(b"ref1"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_keys_lists_all_references() {
        let mut cache = ChunkCache::new(1024);
        cache.put(b"ref1".to_vec(), 1u32, 1);
        cache.put(b"ref2".to_vec(), 2u32, 1);

        let mut keys = cache.keys();
        keys.sort();
        assert_eq!(keys, vec![b"ref1".to_vec(), b"ref2".to_vec()]);
    }
}
