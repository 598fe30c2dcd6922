use std::time::Duration;

/// Minimum interval between two rounds of missing-chunk requests. Shorter
/// intervals would let a single large trie node flood the request pipeline.
pub const MIN_CHUNK_REQUEST_INTERVAL: Duration = Duration::from_secs(1);

/// Default byte budget for the in-flight chunk reassembly cache.
pub const DEFAULT_CHUNK_CACHE_BYTES: usize = 32 * 1024 * 1024;

/// Topic on which missing trie-node chunks are requested from peers.
pub const TRIE_NODES_TOPIC: &str = "trieNodes";
