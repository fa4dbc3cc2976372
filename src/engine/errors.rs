use thiserror::Error;
use tracing::{debug, error};

use crate::engine::core::column::compression::CompressionKind;

/// Errors surfaced by the segment read path.
#[derive(Debug, Error)]
pub enum SegmentReadError {
    #[error("File format error: {0}")]
    FileFormat(String),

    #[error("Allocation failed: {0}")]
    Allocation(String),

    #[error("Invalid input parameter: {0}")]
    InputParameter(String),

    #[error("Failed to seek column {column_unique_id} to block {block_id}: {reason}")]
    ColumnSeek {
        column_unique_id: u32,
        block_id: u32,
        reason: String,
    },

    /// A column stream ended while seeking. Callers turn this into end-of-segment.
    #[error("Column stream reached end of data")]
    DataEof,

    #[error("Unsupported compression: {0}")]
    UnsupportedCompression(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SegmentReadError {
    pub fn is_data_eof(&self) -> bool {
        matches!(self, SegmentReadError::DataEof)
    }

    pub fn unsupported(kind: CompressionKind) -> Self {
        SegmentReadError::UnsupportedCompression(format!("{:?}", kind))
    }

    pub fn log_error(&self) {
        match self {
            SegmentReadError::FileFormat(e) => {
                error!(target: "colseg::reader", "Segment file format error: {}", e);
            }
            SegmentReadError::Allocation(e) => {
                error!(target: "colseg::reader", "Allocation failed: {}", e);
            }
            SegmentReadError::InputParameter(e) => {
                error!(target: "colseg::reader", "Invalid input parameter: {}", e);
            }
            SegmentReadError::ColumnSeek {
                column_unique_id,
                block_id,
                reason,
            } => {
                error!(
                    target: "colseg::reader",
                    column_unique_id, block_id, "Column seek failed"
                );
                debug!(target: "colseg::reader", "Column seek failure details: {}", reason);
            }
            SegmentReadError::DataEof => {
                debug!(target: "colseg::reader", "Column stream reached end of data");
            }
            SegmentReadError::UnsupportedCompression(kind) => {
                error!(target: "colseg::reader", "Unsupported compression kind: {}", kind);
            }
            SegmentReadError::Io(e) => {
                error!(target: "colseg::reader", "I/O error: {}", e);
                debug!(target: "colseg::reader", "I/O error details: {:?}", e);
            }
        }
    }
}

/// Errors returned by the shared index stream cache.
#[derive(Debug, Error)]
pub enum IndexCacheError {
    #[error("entry of {size} bytes exceeds cache capacity of {capacity} bytes")]
    EntryTooLarge { size: usize, capacity: usize },

    #[error("cache lock poisoned")]
    Poisoned,
}

impl From<IndexCacheError> for SegmentReadError {
    fn from(e: IndexCacheError) -> Self {
        SegmentReadError::Allocation(format!("index stream cache insert failed: {e}"))
    }
}
