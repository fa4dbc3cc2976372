use crate::engine::core::segment::StreamKind;

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct IndexStreamCacheKey {
    pub file_identity: String,
    pub column_unique_id: u32,
    pub kind: StreamKind,
}

impl IndexStreamCacheKey {
    pub fn new(file_identity: impl Into<String>, column_unique_id: u32, kind: StreamKind) -> Self {
        Self {
            file_identity: file_identity.into(),
            column_unique_id,
            kind,
        }
    }
}
