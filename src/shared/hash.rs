use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

/// 64-bit hash of a persisted key. Bloom filter bits on disk depend on it, so
/// the hasher must never change without a format version bump.
pub fn stable_hash64<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = FxHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Splits the stable hash of `key` into the two halves used for double
/// hashing: `(low 32 bits, high 32 bits)`.
pub fn split_hash64(key: &[u8]) -> (u64, u64) {
    let hash = stable_hash64(key);
    (hash & 0xFFFF_FFFF, hash >> 32)
}
