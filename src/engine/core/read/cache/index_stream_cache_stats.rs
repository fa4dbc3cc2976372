#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStreamCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub evictions: u64,
    pub current_bytes: usize,
    pub capacity_bytes: usize,
}
