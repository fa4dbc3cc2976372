pub mod chunked_stream;
pub mod column_reader;
pub mod compression;
pub mod le_slice_reader;

pub use chunked_stream::{ChunkedStream, StreamPosition};
pub use column_reader::ColumnReader;
pub use le_slice_reader::{LeSliceReader, SIZE_U32, SIZE_U64};

#[cfg(test)]
mod column_reader_test;
