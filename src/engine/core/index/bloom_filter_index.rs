use crate::engine::core::index::BloomFilter;
use crate::engine::core::read::cache::IndexStreamHandle;
use crate::engine::errors::SegmentReadError;

/// Bytes backing a loaded index: either shared with the stream cache or owned.
#[derive(Debug, Clone)]
pub enum IndexStreamBuffer {
    Cached(IndexStreamHandle),
    Local(Vec<u8>),
}

impl IndexStreamBuffer {
    pub fn bytes(&self) -> &[u8] {
        match self {
            IndexStreamBuffer::Cached(handle) => handle.value(),
            IndexStreamBuffer::Local(bytes) => bytes,
        }
    }

    pub fn is_cached(&self) -> bool {
        matches!(self, IndexStreamBuffer::Cached(_))
    }
}

/// Per-block bloom filters of one column, stored back to back.
#[derive(Debug, Clone)]
pub struct BloomFilterIndex {
    buffer: IndexStreamBuffer,
    entry_len: usize,
    hash_function_num: u32,
}

impl BloomFilterIndex {
    pub fn new(
        buffer: IndexStreamBuffer,
        bit_num: u32,
        hash_function_num: u32,
    ) -> Result<Self, SegmentReadError> {
        if bit_num == 0 || bit_num % 8 != 0 {
            return Err(SegmentReadError::FileFormat(format!(
                "bloom filter bit count {bit_num} is not a positive multiple of 8"
            )));
        }
        if hash_function_num == 0 {
            return Err(SegmentReadError::FileFormat(
                "bloom filter declares zero hash functions".into(),
            ));
        }
        let entry_len = (bit_num / 8) as usize;
        let len = buffer.bytes().len();
        if len % entry_len != 0 {
            return Err(SegmentReadError::FileFormat(format!(
                "bloom filter stream of {len} bytes is not a multiple of {entry_len}-byte entries"
            )));
        }
        Ok(Self {
            buffer,
            entry_len,
            hash_function_num,
        })
    }

    pub fn entry_count(&self) -> usize {
        self.buffer.bytes().len() / self.entry_len
    }

    pub fn entry(&self, block_id: u32) -> Option<BloomFilter<'_>> {
        let start = block_id as usize * self.entry_len;
        self.buffer
            .bytes()
            .get(start..start + self.entry_len)
            .map(|bits| BloomFilter::new(bits, self.hash_function_num))
    }

    pub fn is_cached(&self) -> bool {
        self.buffer.is_cached()
    }
}
