pub mod chunk;
pub mod chunk_cache;
pub mod message_processor;
pub mod trie_node_chunks;

pub use chunk::ChunkSlab;
pub use chunk_cache::{Cacher, ChunkCache};
pub use trie_node_chunks::{
    CheckedChunkResult, TrieNodeChunksProcessor, TrieNodeChunksProcessorArgs,
};
