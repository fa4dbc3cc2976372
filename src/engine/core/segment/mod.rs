pub mod column_id_mapping;
pub mod segment_file;
pub mod segment_header;
pub mod segment_loader;

pub use column_id_mapping::ColumnIdMapping;
pub use segment_file::{SegmentFile, SegmentFileCursor};
pub use segment_header::{
    CURRENT_COLUMN_DATA_VERSION, ColumnEncoding, MAGIC_STRING, SegmentColumn, SegmentHeader,
    StreamDescriptor, StreamKind, StreamSpan,
};
pub use segment_loader::{OpenedSegment, SegmentFileLoader};

#[cfg(test)]
mod segment_file_test;
