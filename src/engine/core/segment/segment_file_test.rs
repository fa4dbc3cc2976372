use std::io::{Read, Write};

use tempfile::tempdir;

use crate::engine::core::segment::SegmentFile;
use crate::engine::errors::SegmentReadError;

#[test]
fn positional_reads_are_counted() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("seg.dat");
    std::fs::File::create(&path)
        .unwrap()
        .write_all(b"0123456789")
        .unwrap();

    let file = SegmentFile::open(&path).expect("open");
    assert_eq!(file.len(), 10);
    assert_eq!(file.read_at(2, 3).unwrap(), b"234");
    assert_eq!(file.read_at(7, 3).unwrap(), b"789");
    assert_eq!(file.read_count(), 2);
    assert_eq!(file.bytes_read(), 6);
    assert!(file.identity().ends_with("seg.dat"));
}

#[test]
fn read_past_end_is_a_format_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("short.dat");
    std::fs::write(&path, b"abc").unwrap();

    let file = SegmentFile::open(&path).expect("open");
    let err = file.read_at(1, 3).unwrap_err();
    assert!(matches!(err, SegmentReadError::FileFormat(_)));
    assert_eq!(file.read_count(), 0);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let err = SegmentFile::open(&dir.path().join("nope")).unwrap_err();
    assert!(matches!(err, SegmentReadError::Io(_)));
}

#[test]
fn cursor_reads_sequentially_without_counting() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cursor.dat");
    std::fs::write(&path, b"headerbody").unwrap();

    let file = SegmentFile::open(&path).expect("open");
    let mut head = String::new();
    file.reader_from(0)
        .take(6)
        .read_to_string(&mut head)
        .unwrap();
    let mut rest = Vec::new();
    file.reader_from(6).read_to_end(&mut rest).unwrap();

    assert_eq!(head, "header");
    assert_eq!(rest, b"body");
    assert_eq!(file.read_count(), 0);
}
