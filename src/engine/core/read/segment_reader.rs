use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, trace, warn};

use crate::engine::core::filter::BlockState;
use crate::engine::core::index::{IndexLoader, LoadedIndexes};
use crate::engine::core::prune::{BlockPruner, InclusionBitmap, PruneRequest};
use crate::engine::core::read::reader_stats::elapsed_ns;
use crate::engine::core::read::{
    ColumnReaderSet, LazySeekCursor, ReaderOptions, ReaderStatistics, RowBatch, SeekOutcome,
};
use crate::engine::core::segment::{
    ColumnIdMapping, OpenedSegment, SegmentFileLoader, SegmentHeader,
};
use crate::engine::errors::SegmentReadError;
use crate::engine::schema::TabletSchema;
use crate::engine::types::ColumnId;

/// Result of positioning or reading: the next block to be returned and whether
/// the requested range is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanPosition {
    pub next_block_id: u32,
    pub eof: bool,
}

/// State that only exists once `init` has opened the segment.
struct OpenState {
    segment: OpenedSegment,
    mapping: ColumnIdMapping,
    indexes: LoadedIndexes,
    readers: ColumnReaderSet,
    bf_columns: Vec<ColumnId>,
    rows_per_block: u32,
}

/// Reads blocks of one segment file into row batches.
///
/// Driven by a single scan at a time: `init` once, then `seek_to_block` for
/// each block range followed by `get_block` until `eof`.
pub struct SegmentReader {
    path: PathBuf,
    schema: Arc<TabletSchema>,
    options: ReaderOptions,
    open: Option<OpenState>,
    block_count: u32,
    bitmap: Option<InclusionBitmap>,
    remaining_block_count: u32,
    cursor: LazySeekCursor,
    next_block_id: u32,
    end_block: u32,
    without_filter: bool,
    eof: bool,
    truncation_warned: bool,
    stats: ReaderStatistics,
}

impl SegmentReader {
    pub fn new(path: impl AsRef<Path>, schema: Arc<TabletSchema>, options: ReaderOptions) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            schema,
            options,
            open: None,
            block_count: 0,
            bitmap: None,
            remaining_block_count: 0,
            cursor: LazySeekCursor::new(),
            next_block_id: 0,
            end_block: 0,
            without_filter: false,
            eof: true,
            truncation_warned: false,
            stats: ReaderStatistics::default(),
        }
    }

    /// Opens the segment, loads its indexes and creates the column readers.
    /// `use_cache` controls whether freshly read index streams are inserted
    /// into the configured cache; lookups happen whenever a cache is set.
    pub fn init(&mut self, use_cache: bool) -> Result<(), SegmentReadError> {
        self.open_segment(use_cache).inspect_err(|e| e.log_error())
    }

    fn open_segment(&mut self, use_cache: bool) -> Result<(), SegmentReadError> {
        let segment =
            SegmentFileLoader::new(self.options.max_supported_version).open(&self.path)?;
        let header = &segment.header;

        let rows_per_block = match header.num_rows_per_block {
            0 => self.options.default_rows_per_block,
            n => n,
        };
        if rows_per_block == 0 {
            return Err(SegmentReadError::FileFormat(
                "segment declares 0 rows per block and no default is configured".into(),
            ));
        }
        let block_count = u32::try_from(header.number_of_rows.div_ceil(rows_per_block as u64))
            .map_err(|_| {
                SegmentReadError::FileFormat(format!(
                    "{} rows at {} rows per block exceed the block id range",
                    header.number_of_rows, rows_per_block
                ))
            })?;

        let bf_set: &BTreeSet<ColumnId> = &self.options.load_bf_columns;
        let mapping = ColumnIdMapping::build(
            &self.schema,
            &self.options.mapped_columns(),
            bf_set,
            header,
        )?;

        let indexes = IndexLoader::new(
            &segment,
            &self.schema,
            &mapping,
            bf_set,
            &self.options.decompressors,
        )
        .with_cache(self.options.cache.as_deref())
        .load(block_count, use_cache, &mut self.stats)?;

        let readers = ColumnReaderSet::create(
            &segment,
            &self.schema,
            &mapping,
            &self.options.used_columns,
            &self.options.decompressors,
        )?;

        debug!(
            target: "colseg::reader",
            path = %self.path.display(),
            rows = header.number_of_rows,
            rows_per_block,
            block_count,
            mapped_columns = mapping.mapped_in_segment(),
            "Segment reader initialized"
        );

        self.block_count = block_count;
        self.end_block = block_count.saturating_sub(1);
        self.next_block_id = 0;
        self.eof = block_count == 0;
        self.bitmap = None;
        self.remaining_block_count = block_count;
        self.cursor.invalidate();
        self.open = Some(OpenState {
            segment,
            mapping,
            indexes,
            readers,
            bf_columns: bf_set.iter().copied().collect(),
            rows_per_block,
        });
        Ok(())
    }

    /// Restricts reading to `[first_block, last_block]`, recomputing block
    /// inclusion unless `without_filter` is set.
    pub fn seek_to_block(
        &mut self,
        first_block: u32,
        last_block: u32,
        without_filter: bool,
    ) -> Result<ScanPosition, SegmentReadError> {
        if first_block > last_block {
            let err = SegmentReadError::InputParameter(format!(
                "invalid block range: first_block={first_block} > last_block={last_block}"
            ));
            err.log_error();
            return Err(err);
        }
        let Some(open) = self.open.as_ref() else {
            return Err(SegmentReadError::InputParameter(
                "seek_to_block called before init".into(),
            ));
        };

        self.cursor.invalidate();
        self.without_filter = without_filter;
        self.truncation_warned = false;
        self.bitmap = None;

        if self.block_count == 0 || first_block >= self.block_count {
            self.eof = true;
            self.next_block_id = first_block;
            self.remaining_block_count = 0;
            return Ok(self.position());
        }

        self.eof = false;
        self.end_block = last_block.min(self.block_count - 1);
        self.remaining_block_count = self.end_block - first_block + 1;

        if !without_filter {
            let pruner = BlockPruner::new(
                &self.schema,
                &open.mapping,
                &open.indexes,
                &open.bf_columns,
                open.rows_per_block,
                open.segment.header.number_of_rows,
            );
            let outcome = pruner.prune(
                &PruneRequest {
                    first_block,
                    end_block: self.end_block,
                    conditions: &self.options.conditions,
                    delete_handler: &self.options.delete_handler,
                    delete_status: self.options.delete_status,
                    segment_version: self.options.segment_version,
                },
                &mut self.stats,
            );
            self.remaining_block_count = outcome.remaining_block_count;
            self.bitmap = Some(outcome.bitmap);
        }

        self.move_to_candidate(first_block);
        trace!(
            target: "colseg::reader",
            first_block,
            last_block,
            end_block = self.end_block,
            next_block_id = self.next_block_id,
            eof = self.eof,
            "Seeked to block range"
        );
        Ok(self.position())
    }

    /// Reads the next candidate block into `batch`. Once `eof` has been
    /// returned, further calls return it again without touching the file.
    pub fn get_block(&mut self, batch: &mut RowBatch) -> Result<ScanPosition, SegmentReadError> {
        if self.eof {
            return Ok(self.position());
        }
        let Some(open) = self.open.as_mut() else {
            return Err(SegmentReadError::InputParameter(
                "get_block called before init".into(),
            ));
        };

        batch.reset();
        let bytes_before = open.segment.file.bytes_read();
        let block = self.next_block_id;

        let seek_start = Instant::now();
        let columns = batch.columns().to_vec();
        let readers = &mut open.readers;
        let indexes = &open.indexes;
        match self
            .cursor
            .advance_to(block, |b| readers.seek_to_block(b, &columns, indexes))
        {
            Ok(SeekOutcome::Seeked) => self.stats.block_seek_ns += elapsed_ns(seek_start),
            Ok(SeekOutcome::Skipped) => {}
            Err(SegmentReadError::DataEof) => {
                self.eof = true;
                return Ok(self.position());
            }
            Err(e) => {
                e.log_error();
                return Err(e);
            }
        }

        let rows_per_block = open.rows_per_block;
        let mut block_rows = rows_per_block as usize;
        if block + 1 == self.block_count {
            let rows_left = open
                .segment
                .header
                .number_of_rows
                .saturating_sub(block as u64 * rows_per_block as u64);
            block_rows = block_rows.min(rows_left as usize);
        }
        let rows = batch.capacity().min(block_rows);
        if rows < block_rows {
            self.stats.rows_batch_truncated += (block_rows - rows) as u64;
            if !self.truncation_warned {
                self.truncation_warned = true;
                warn!(
                    target: "colseg::reader",
                    path = %self.path.display(),
                    block,
                    batch_capacity = batch.capacity(),
                    rows_per_block,
                    "Batch smaller than a block; the rest of each block is skipped"
                );
            }
        }

        let load_start = Instant::now();
        if let Err(e) = open.readers.load(batch, rows) {
            e.log_error();
            return Err(e);
        }
        let state = self
            .bitmap
            .as_ref()
            .and_then(|bitmap| bitmap.get(block))
            .unwrap_or(BlockState::Partial);
        batch.set_block_state(state);
        self.cursor.on_rows_read(rows, rows_per_block);

        self.stats.block_load_ns += elapsed_ns(load_start);
        self.stats.blocks_load += 1;
        self.stats.raw_rows_read += rows as u64;
        self.stats.bytes_read += open.segment.file.bytes_read() - bytes_before;

        if tracing::enabled!(tracing::Level::TRACE) {
            trace!(target: "colseg::reader", block, rows, ?state, "Loaded block");
        }

        self.move_to_candidate(block + 1);
        Ok(self.position())
    }

    /// Sets `next_block_id` to the first block at or after `block` that pruning
    /// kept, or flags end of range.
    fn move_to_candidate(&mut self, block: u32) {
        let mut next = block;
        if let Some(bitmap) = self.bitmap.as_ref().filter(|_| !self.without_filter) {
            while next <= self.end_block && bitmap.is_excluded(next) {
                next += 1;
            }
        }
        if next > self.end_block {
            self.eof = true;
        }
        self.next_block_id = next;
    }

    pub fn position(&self) -> ScanPosition {
        ScanPosition {
            next_block_id: self.next_block_id,
            eof: self.eof,
        }
    }

    pub fn block_count(&self) -> u32 {
        self.block_count
    }

    pub fn rows_per_block(&self) -> Option<u32> {
        self.open.as_ref().map(|o| o.rows_per_block)
    }

    pub fn header(&self) -> Option<&SegmentHeader> {
        self.open.as_ref().map(|o| &o.segment.header)
    }

    pub fn bitmap(&self) -> Option<&InclusionBitmap> {
        self.bitmap.as_ref()
    }

    pub fn remaining_block_count(&self) -> u32 {
        self.remaining_block_count
    }

    pub fn cursor(&self) -> &LazySeekCursor {
        &self.cursor
    }

    pub fn stats(&self) -> ReaderStatistics {
        self.stats
    }

    /// Physical reads issued against the segment file since `init`.
    pub fn file_reads(&self) -> u64 {
        self.open
            .as_ref()
            .map(|o| o.segment.file.read_count())
            .unwrap_or(0)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
