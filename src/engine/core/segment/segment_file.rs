use std::fs::File;
use std::io::{self, Read};
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

use crate::engine::errors::SegmentReadError;

/// Read-only handle on one segment file.
///
/// All reads are positional so the handle can be shared by the index loader and
/// every column reader of a segment without coordinating a file cursor.
#[derive(Debug)]
pub struct SegmentFile {
    path: PathBuf,
    identity: String,
    file: File,
    len: u64,
    reads: AtomicU64,
    bytes_read: AtomicU64,
}

impl SegmentFile {
    pub fn open(path: &Path) -> Result<Self, SegmentReadError> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        let abs_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
        };
        Ok(Self {
            identity: abs_path.to_string_lossy().into_owned(),
            path: path.to_path_buf(),
            file,
            len,
            reads: AtomicU64::new(0),
            bytes_read: AtomicU64::new(0),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stable name used to key shared caches.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn read_at(&self, offset: u64, len: usize) -> Result<Vec<u8>, SegmentReadError> {
        let end = offset.checked_add(len as u64).ok_or_else(|| {
            SegmentReadError::FileFormat(format!("read range overflow at offset {offset}"))
        })?;
        if end > self.len {
            return Err(SegmentReadError::FileFormat(format!(
                "read past end of segment: end={} > file_len={}",
                end, self.len
            )));
        }
        let mut buf = vec![0u8; len];
        self.file.read_exact_at(&mut buf, offset)?;
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.bytes_read.fetch_add(len as u64, Ordering::Relaxed);
        if tracing::enabled!(tracing::Level::TRACE) {
            trace!(target: "colseg::io", path = %self.path.display(), offset, len, "read_at");
        }
        Ok(buf)
    }

    /// Sequential reader starting at `offset`, used to parse the header.
    /// Bytes pulled through it do not count towards `read_count`.
    pub fn reader_from(&self, offset: u64) -> SegmentFileCursor<'_> {
        SegmentFileCursor {
            file: &self.file,
            pos: offset,
        }
    }

    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read.load(Ordering::Relaxed)
    }
}

/// `Read` adapter over positional reads of a shared segment file.
pub struct SegmentFileCursor<'a> {
    file: &'a File,
    pos: u64,
}

impl Read for SegmentFileCursor<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.file.read_at(buf, self.pos)?;
        self.pos += n as u64;
        Ok(n)
    }
}
