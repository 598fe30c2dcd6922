mod hash;

pub use hash::{hash, Blake3Hasher, Hasher, HASH_SIZE};
