pub mod block_stat_index;
pub mod bloom_filter;
pub mod bloom_filter_index;
pub mod index_loader;

pub use block_stat_index::{BlockStatIndex, StatEntry};
pub use bloom_filter::BloomFilter;
#[cfg(test)]
pub use bloom_filter::BloomFilterBuilder;
pub use bloom_filter_index::{BloomFilterIndex, IndexStreamBuffer};
pub use index_loader::{IndexLoader, LoadedIndexes};

#[cfg(test)]
mod bloom_filter_index_test;
#[cfg(test)]
mod bloom_filter_test;
