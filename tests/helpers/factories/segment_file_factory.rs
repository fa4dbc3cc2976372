use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::engine::core::column::StreamPosition;
use crate::engine::core::column::compression::{
    CompressionCodec, CompressionKind, DecompressorRegistry,
};
use crate::engine::core::index::{BloomFilterBuilder, StatEntry};
use crate::engine::core::segment::{
    CURRENT_COLUMN_DATA_VERSION, ColumnEncoding, SegmentColumn, SegmentHeader, StreamDescriptor,
    StreamKind,
};
use crate::engine::schema::TabletSchema;
use crate::engine::types::{Datum, FieldType};

/// Writes a complete segment file for a schema and column-major values.
///
/// Every column of the schema gets a ROW_INDEX and DATA stream, plus a
/// BLOOM_FILTER stream when its unique id is in `bf_columns`, unless the
/// column is listed in `omitted`.
pub struct SegmentFileFactory {
    schema: TabletSchema,
    values: HashMap<u32, Vec<Datum>>,
    rows_per_block: u32,
    header_rows_per_block: Option<u32>,
    compress_kind: CompressionKind,
    null_supported: bool,
    bf_columns: BTreeSet<u32>,
    bf_bit_num: u32,
    bf_hash_function_num: u32,
    rows_per_chunk: usize,
    omitted: BTreeSet<u32>,
    stat_entries_dropped: usize,
    version: u16,
}

impl SegmentFileFactory {
    pub fn new() -> Self {
        Self {
            schema: TabletSchema::default(),
            values: HashMap::new(),
            rows_per_block: 1024,
            header_rows_per_block: None,
            compress_kind: CompressionKind::Lz4,
            null_supported: true,
            bf_columns: BTreeSet::new(),
            bf_bit_num: 512,
            bf_hash_function_num: 3,
            rows_per_chunk: 300,
            omitted: BTreeSet::new(),
            stat_entries_dropped: 0,
            version: CURRENT_COLUMN_DATA_VERSION,
        }
    }

    pub fn with_schema(mut self, schema: TabletSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Values of the column with `unique_id`, one per row.
    pub fn with_values(mut self, unique_id: u32, values: Vec<Datum>) -> Self {
        self.values.insert(unique_id, values);
        self
    }

    pub fn with_rows_per_block(mut self, rows_per_block: u32) -> Self {
        self.rows_per_block = rows_per_block;
        self
    }

    /// Value stored in the header, independent of how rows are blocked.
    pub fn with_header_rows_per_block(mut self, rows_per_block: u32) -> Self {
        self.header_rows_per_block = Some(rows_per_block);
        self
    }

    pub fn with_compression(mut self, kind: CompressionKind) -> Self {
        self.compress_kind = kind;
        self
    }

    pub fn with_null_supported(mut self, null_supported: bool) -> Self {
        self.null_supported = null_supported;
        self
    }

    pub fn with_bloom_filter(mut self, unique_id: u32) -> Self {
        self.bf_columns.insert(unique_id);
        self
    }

    pub fn with_bloom_params(mut self, bit_num: u32, hash_function_num: u32) -> Self {
        self.bf_bit_num = bit_num;
        self.bf_hash_function_num = hash_function_num;
        self
    }

    pub fn with_rows_per_chunk(mut self, rows_per_chunk: usize) -> Self {
        self.rows_per_chunk = rows_per_chunk.max(1);
        self
    }

    /// Leaves a schema column out of the segment, as if added after it was written.
    pub fn without_column(mut self, unique_id: u32) -> Self {
        self.omitted.insert(unique_id);
        self
    }

    /// Writes `n` fewer row index entries than there are blocks.
    pub fn with_stat_entries_dropped(mut self, n: usize) -> Self {
        self.stat_entries_dropped = n;
        self
    }

    pub fn with_version(mut self, version: u16) -> Self {
        self.version = version;
        self
    }

    pub fn create_in(self, dir: &Path) -> PathBuf {
        let path = dir.join("segment_0.dat");
        self.create_at(&path);
        path
    }

    pub fn create_at(self, path: &Path) {
        let bytes = self.build_bytes();
        let mut file = File::create(path).expect("create segment file");
        file.write_all(&bytes).expect("write segment file");
    }

    pub fn build_bytes(&self) -> Vec<u8> {
        let codec = DecompressorRegistry::builtin()
            .get(self.compress_kind)
            .expect("codec available");
        let number_of_rows = self.values.values().map(Vec::len).max().unwrap_or(0);

        let mut columns = Vec::new();
        let mut streams = Vec::new();
        let mut body = Vec::new();

        for column in self.schema.columns() {
            if self.omitted.contains(&column.unique_id) {
                continue;
            }
            columns.push(SegmentColumn {
                unique_id: column.unique_id,
                encoding: ColumnEncoding::Direct,
            });
            let values = self
                .values
                .get(&column.unique_id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let encoded = self.encode_column(codec.as_ref(), column.field_type, values);

            let mut kinds = vec![(StreamKind::RowIndex, encoded.row_index)];
            if self.bf_columns.contains(&column.unique_id) {
                kinds.push((StreamKind::BloomFilter, encoded.bloom));
            }
            kinds.push((StreamKind::Data, encoded.data));
            for (kind, bytes) in kinds {
                streams.push(StreamDescriptor {
                    column_unique_id: column.unique_id,
                    kind,
                    length: bytes.len() as u64,
                });
                body.extend_from_slice(&bytes);
            }
        }

        let header = SegmentHeader {
            version: self.version,
            compress_kind: self.compress_kind,
            null_supported: self.null_supported,
            stream_buffer_size: 4096,
            num_rows_per_block: self.header_rows_per_block.unwrap_or(self.rows_per_block),
            number_of_rows: number_of_rows as u64,
            bf_hash_function_num: self.bf_hash_function_num,
            bf_bit_num: self.bf_bit_num,
            columns,
            streams,
        };
        let mut out = Vec::new();
        header.write_to(&mut out).expect("write header");
        out.extend_from_slice(&body);
        out
    }

    /// Encodes one column into framed ROW_INDEX, BLOOM_FILTER and DATA streams.
    fn encode_column(
        &self,
        codec: &dyn CompressionCodec,
        field_type: FieldType,
        values: &[Datum],
    ) -> EncodedColumn {
        let rows_per_block = self.rows_per_block.max(1) as usize;
        let mut data = Vec::new();
        let mut chunk = Vec::new();
        let mut chunk_rows = 0usize;
        let mut stat_entries = Vec::new();
        let mut bloom_bytes = Vec::new();

        for block in values.chunks(rows_per_block) {
            let mut position = None;
            for value in block {
                if chunk_rows >= self.rows_per_chunk {
                    frame_chunk(&mut data, &chunk, codec);
                    chunk.clear();
                    chunk_rows = 0;
                }
                if position.is_none() {
                    position = Some(StreamPosition {
                        chunk_offset: data.len() as u64,
                        offset_in_chunk: chunk.len() as u32,
                    });
                }
                value.encode_into(field_type, self.null_supported, &mut chunk);
                chunk_rows += 1;
            }

            stat_entries.push(StatEntry {
                position: position.unwrap_or_default(),
                min: block.iter().min().cloned().unwrap_or(Datum::Null),
                max: block.iter().max().cloned().unwrap_or(Datum::Null),
            });

            let mut bloom = BloomFilterBuilder::new(self.bf_bit_num, self.bf_hash_function_num);
            for value in block {
                bloom.add(value);
            }
            bloom_bytes.extend(bloom.finish());
        }
        if !chunk.is_empty() {
            frame_chunk(&mut data, &chunk, codec);
        }

        let keep = stat_entries.len().saturating_sub(self.stat_entries_dropped);
        let mut row_index_raw = Vec::new();
        for entry in &stat_entries[..keep] {
            entry.encode_into(field_type, self.null_supported, &mut row_index_raw);
        }

        let mut row_index = Vec::new();
        if !row_index_raw.is_empty() {
            frame_chunk(&mut row_index, &row_index_raw, codec);
        }
        let mut bloom = Vec::new();
        if !bloom_bytes.is_empty() {
            frame_chunk(&mut bloom, &bloom_bytes, codec);
        }
        EncodedColumn {
            row_index,
            bloom,
            data,
        }
    }
}

impl Default for SegmentFileFactory {
    fn default() -> Self {
        Self::new()
    }
}

struct EncodedColumn {
    row_index: Vec<u8>,
    bloom: Vec<u8>,
    data: Vec<u8>,
}

/// Appends `raw` as one `[comp_len][raw_len][payload]` chunk.
fn frame_chunk(out: &mut Vec<u8>, raw: &[u8], codec: &dyn CompressionCodec) {
    let payload = codec.compress(raw).expect("compress chunk");
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(&(raw.len() as u32).to_le_bytes());
    out.extend_from_slice(&payload);
}
