use std::sync::Arc;

/// Shared, immutable view of a cached index stream.
///
/// The bytes stay alive while any handle exists, even after the cache has
/// evicted the entry. Dropping the last handle frees them.
#[derive(Debug, Clone)]
pub struct IndexStreamHandle {
    bytes: Arc<[u8]>,
}

impl IndexStreamHandle {
    pub(crate) fn new(bytes: Arc<[u8]>) -> Self {
        Self { bytes }
    }

    pub fn value(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Number of live holders, cache included.
    pub fn holders(&self) -> usize {
        Arc::strong_count(&self.bytes)
    }
}

impl AsRef<[u8]> for IndexStreamHandle {
    fn as_ref(&self) -> &[u8] {
        self.value()
    }
}
