use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::engine::core::segment::{SegmentFile, SegmentHeader, StreamSpan};
use crate::engine::errors::SegmentReadError;

/// A segment file whose header has been read and validated.
#[derive(Debug)]
pub struct OpenedSegment {
    pub file: Arc<SegmentFile>,
    pub header: SegmentHeader,
    pub header_length: u64,
    pub streams: Vec<StreamSpan>,
}

pub struct SegmentFileLoader {
    max_supported_version: u16,
}

impl SegmentFileLoader {
    pub fn new(max_supported_version: u16) -> Self {
        Self {
            max_supported_version,
        }
    }

    pub fn open(&self, path: &Path) -> Result<OpenedSegment, SegmentReadError> {
        let file = SegmentFile::open(path)?;
        let (header, header_length) =
            SegmentHeader::read_from(BufReader::new(file.reader_from(0)))?;

        if header.version > self.max_supported_version {
            warn!(
                target: "colseg::header",
                path = %path.display(),
                found_version = header.version,
                max_supported = self.max_supported_version,
                "Segment may have been written by a newer engine; reading it anyway"
            );
        }

        let streams = header.stream_layout(header_length)?;
        if let Some(span) = streams.iter().find(|span| span.end() > file.len()) {
            return Err(SegmentReadError::FileFormat(format!(
                "stream of column {} ({:?}) ends at {} but file is {} bytes",
                span.descriptor.column_unique_id,
                span.descriptor.kind,
                span.end(),
                file.len()
            )));
        }

        debug!(
            target: "colseg::header",
            path = %path.display(),
            version = header.version,
            compress_kind = ?header.compress_kind,
            rows = header.number_of_rows,
            rows_per_block = header.num_rows_per_block,
            streams = streams.len(),
            header_length,
            "Opened segment"
        );

        Ok(OpenedSegment {
            file: Arc::new(file),
            header,
            header_length,
            streams,
        })
    }
}
