use std::sync::Arc;

use tracing::trace;

use crate::engine::core::column::compression::CompressionCodec;
use crate::engine::core::segment::{SegmentFile, StreamSpan};
use crate::engine::errors::SegmentReadError;

/// `[comp_len u32][raw_len u32]` in front of every chunk.
pub const CHUNK_HEAD_LEN: usize = 8;
/// Largest decoded chunk accepted; a bigger `raw_len` means a corrupt header.
pub const MAX_CHUNK_RAW_LEN: usize = 64 * 1024 * 1024;

/// Where a block starts inside a column's data stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct StreamPosition {
    /// Offset of the chunk header relative to the start of the stream.
    pub chunk_offset: u64,
    /// Offset inside the decoded chunk.
    pub offset_in_chunk: u32,
}

/// Sequential reader over one chunked, optionally compressed stream.
pub struct ChunkedStream {
    file: Arc<SegmentFile>,
    span: StreamSpan,
    codec: Arc<dyn CompressionCodec>,
    chunk: Vec<u8>,
    chunk_offset: Option<u64>,
    pos: usize,
    next_chunk_offset: u64,
    chunks_loaded: u64,
}

impl ChunkedStream {
    pub fn new(
        file: Arc<SegmentFile>,
        span: StreamSpan,
        codec: Arc<dyn CompressionCodec>,
        buffer_size: usize,
    ) -> Self {
        Self {
            file,
            span,
            codec,
            chunk: Vec::with_capacity(buffer_size),
            chunk_offset: None,
            pos: 0,
            next_chunk_offset: 0,
            chunks_loaded: 0,
        }
    }

    pub fn length(&self) -> u64 {
        self.span.descriptor.length
    }

    pub fn chunks_loaded(&self) -> u64 {
        self.chunks_loaded
    }

    /// Decodes the whole stream. Used for index streams, which are consumed in full.
    pub fn read_to_end(&mut self) -> Result<Vec<u8>, SegmentReadError> {
        let mut out = Vec::new();
        self.next_chunk_offset = 0;
        while self.next_chunk_offset < self.length() {
            self.load_chunk(self.next_chunk_offset)?;
            out.extend_from_slice(&self.chunk);
        }
        Ok(out)
    }

    /// Positions the stream at a block start. A chunk offset at or past the end
    /// of the stream is reported as `DataEof`.
    pub fn seek(&mut self, position: StreamPosition) -> Result<(), SegmentReadError> {
        if position.chunk_offset >= self.length() {
            return Err(SegmentReadError::DataEof);
        }
        if self.chunk_offset != Some(position.chunk_offset) {
            self.load_chunk(position.chunk_offset)?;
        }
        let offset = position.offset_in_chunk as usize;
        if offset > self.chunk.len() {
            return Err(SegmentReadError::FileFormat(format!(
                "offset {} outside decoded chunk of {} bytes at {}",
                offset,
                self.chunk.len(),
                position.chunk_offset
            )));
        }
        self.pos = offset;
        Ok(())
    }

    /// Unread bytes of the current chunk, loading the next chunk when the
    /// current one is exhausted. `None` at end of stream.
    pub fn current(&mut self) -> Result<Option<&[u8]>, SegmentReadError> {
        while self.chunk_offset.is_none() || self.pos >= self.chunk.len() {
            if self.next_chunk_offset >= self.length() {
                return Ok(None);
            }
            self.load_chunk(self.next_chunk_offset)?;
        }
        Ok(Some(&self.chunk[self.pos..]))
    }

    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.chunk.len());
    }

    fn load_chunk(&mut self, chunk_offset: u64) -> Result<(), SegmentReadError> {
        let stream_len = self.length();
        if chunk_offset + CHUNK_HEAD_LEN as u64 > stream_len {
            return Err(SegmentReadError::FileFormat(format!(
                "chunk header at {} overruns stream of {} bytes",
                chunk_offset, stream_len
            )));
        }
        let head = self
            .file
            .read_at(self.span.offset + chunk_offset, CHUNK_HEAD_LEN)?;
        let comp_len = u32::from_le_bytes([head[0], head[1], head[2], head[3]]) as u64;
        let raw_len = u32::from_le_bytes([head[4], head[5], head[6], head[7]]) as usize;
        if raw_len > MAX_CHUNK_RAW_LEN {
            return Err(SegmentReadError::FileFormat(format!(
                "chunk at {} claims {} decoded bytes, limit is {}",
                chunk_offset, raw_len, MAX_CHUNK_RAW_LEN
            )));
        }
        let payload_start = chunk_offset + CHUNK_HEAD_LEN as u64;
        if payload_start + comp_len > stream_len {
            return Err(SegmentReadError::FileFormat(format!(
                "chunk payload at {} of {} bytes overruns stream of {} bytes",
                payload_start, comp_len, stream_len
            )));
        }
        let payload = self
            .file
            .read_at(self.span.offset + payload_start, comp_len as usize)?;
        self.chunk = self.codec.decompress(&payload, raw_len)?;
        self.chunk_offset = Some(chunk_offset);
        self.pos = 0;
        self.next_chunk_offset = payload_start + comp_len;
        self.chunks_loaded += 1;

        if tracing::enabled!(tracing::Level::TRACE) {
            trace!(
                target: "colseg::io",
                column_unique_id = self.span.descriptor.column_unique_id,
                kind = ?self.span.descriptor.kind,
                chunk_offset,
                comp_len,
                raw_len,
                "Loaded chunk"
            );
        }
        Ok(())
    }
}
