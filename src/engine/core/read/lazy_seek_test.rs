use crate::engine::core::read::{CursorState, LazySeekCursor, SeekOutcome};
use crate::engine::errors::SegmentReadError;

fn ok(_: u32) -> Result<(), SegmentReadError> {
    Ok(())
}

#[test]
fn first_advance_always_seeks() {
    let mut cursor = LazySeekCursor::new();
    assert_eq!(cursor.advance_to(0, ok).unwrap(), SeekOutcome::Seeked);
    assert_eq!(cursor.state(), CursorState::Positioned(0));
}

#[test]
fn full_block_read_keeps_alignment() {
    let mut cursor = LazySeekCursor::new();
    cursor.advance_to(3, ok).unwrap();
    cursor.on_rows_read(1024, 1024);
    assert_eq!(cursor.current_block(), Some(4));
    assert_eq!(cursor.advance_to(4, ok).unwrap(), SeekOutcome::Skipped);
    assert_eq!(cursor.seek_count(), 1);
}

#[test]
fn partial_read_forces_reseek_of_same_block() {
    let mut cursor = LazySeekCursor::new();
    cursor.advance_to(2, ok).unwrap();
    cursor.on_rows_read(100, 1024);
    assert_eq!(cursor.state(), CursorState::NeedsSeek);

    let mut seeked_to = None;
    let outcome = cursor
        .advance_to(2, |b| {
            seeked_to = Some(b);
            Ok::<(), SegmentReadError>(())
        })
        .unwrap();
    assert_eq!(outcome, SeekOutcome::Seeked);
    assert_eq!(seeked_to, Some(2));
    assert_eq!(cursor.seek_count(), 2);
}

#[test]
fn failed_seek_leaves_cursor_unpositioned() {
    let mut cursor = LazySeekCursor::new();
    let err = cursor
        .advance_to(1, |_| Err(SegmentReadError::DataEof))
        .unwrap_err();
    assert!(err.is_data_eof());
    assert_eq!(cursor.state(), CursorState::NeedsSeek);
    assert_eq!(cursor.seek_count(), 0);
}

#[test]
fn invalidate_forces_next_seek() {
    let mut cursor = LazySeekCursor::new();
    cursor.advance_to(0, ok).unwrap();
    cursor.invalidate();
    assert_eq!(cursor.advance_to(0, ok).unwrap(), SeekOutcome::Seeked);
}
