use std::sync::Arc;

use tempfile::tempdir;

use crate::engine::core::column::compression::{CompressionCodec, ZstdCodec};
use crate::engine::core::column::{ChunkedStream, ColumnReader, StreamPosition};
use crate::engine::core::read::RowBatch;
use crate::engine::core::segment::{SegmentFile, StreamDescriptor, StreamKind, StreamSpan};
use crate::engine::errors::SegmentReadError;
use crate::engine::types::{Datum, FieldType};

/// One Varchar column stream holding `values` split into two chunks.
fn varchar_reader(dir: &std::path::Path, values: &[Datum]) -> (ColumnReader, u64) {
    let codec = ZstdCodec::default();
    let (head, tail) = values.split_at(values.len() / 2);
    let mut stream = Vec::new();
    let mut second_chunk = 0;
    for (i, part) in [head, tail].into_iter().enumerate() {
        if i == 1 {
            second_chunk = stream.len() as u64;
        }
        let mut raw = Vec::new();
        for value in part {
            value.encode_into(FieldType::Varchar, true, &mut raw);
        }
        let payload = codec.compress(&raw).unwrap();
        stream.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        stream.extend_from_slice(&(raw.len() as u32).to_le_bytes());
        stream.extend_from_slice(&payload);
    }
    let path = dir.join("col.dat");
    std::fs::write(&path, &stream).unwrap();

    let span = StreamSpan {
        descriptor: StreamDescriptor {
            column_unique_id: 11,
            kind: StreamKind::Data,
            length: stream.len() as u64,
        },
        offset: 0,
    };
    let file = Arc::new(SegmentFile::open(&path).unwrap());
    let stream = ChunkedStream::new(file, span, Arc::new(ZstdCodec::default()), 256);
    (
        ColumnReader::from_stream(11, FieldType::Varchar, true, stream),
        second_chunk,
    )
}

fn read(reader: &mut ColumnReader, rows: usize) -> Result<Vec<Datum>, SegmentReadError> {
    let mut batch = RowBatch::new(vec![0], rows);
    let (vector, arena) = batch.column_mut(0, reader.field_type());
    reader.next_vector(vector, arena, rows)?;
    batch.set_size(rows);
    batch.values(0)
}

fn sample() -> Vec<Datum> {
    vec![
        Datum::from("alpha"),
        Datum::Null,
        Datum::from(""),
        Datum::from("delta"),
        Datum::from("echo"),
        Datum::Null,
    ]
}

#[test]
fn decodes_values_and_nulls_across_chunks() {
    let dir = tempdir().unwrap();
    let values = sample();
    let (mut reader, _) = varchar_reader(dir.path(), &values);

    assert_eq!(read(&mut reader, 6).unwrap(), values);
}

#[test]
fn seek_restarts_decoding_at_a_chunk() {
    let dir = tempdir().unwrap();
    let values = sample();
    let (mut reader, second_chunk) = varchar_reader(dir.path(), &values);

    assert_eq!(read(&mut reader, 2).unwrap(), values[..2].to_vec());
    reader
        .seek(StreamPosition {
            chunk_offset: second_chunk,
            offset_in_chunk: 0,
        })
        .unwrap();
    assert_eq!(read(&mut reader, 3).unwrap(), values[3..].to_vec());
}

#[test]
fn reading_past_the_data_is_a_format_error() {
    let dir = tempdir().unwrap();
    let (mut reader, _) = varchar_reader(dir.path(), &sample());

    let err = read(&mut reader, 7).unwrap_err();
    assert!(matches!(err, SegmentReadError::FileFormat(_)));
}

#[test]
fn default_reader_repeats_its_value_and_ignores_seeks() {
    let mut reader = ColumnReader::with_default(42, FieldType::Varchar, Datum::from("n/a"));
    assert!(reader.is_default());
    reader
        .seek(StreamPosition {
            chunk_offset: 999,
            offset_in_chunk: 5,
        })
        .unwrap();

    assert_eq!(read(&mut reader, 4).unwrap(), vec![Datum::from("n/a"); 4]);
}
