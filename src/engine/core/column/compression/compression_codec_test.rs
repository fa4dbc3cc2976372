use crate::engine::core::column::compression::{
    CompressionCodec, Lz4Codec, NoneCodec, ZstdCodec,
};
use crate::engine::errors::SegmentReadError;

#[test]
fn lz4_roundtrip_with_known_length() {
    let codec = Lz4Codec;
    let data = b"0123456789abcdef0123456789abcdef".to_vec();
    let comp = codec.compress(&data).expect("compress");
    let out = codec.decompress(&comp, data.len()).expect("decompress");
    assert_eq!(out, data);
}

#[test]
fn zstd_roundtrip_with_known_length() {
    let codec = ZstdCodec::default();
    let data = vec![42u8; 4096];
    let comp = codec.compress(&data).expect("compress");
    assert!(comp.len() < data.len());
    assert_eq!(codec.decompress(&comp, data.len()).expect("decompress"), data);
}

#[test]
fn none_codec_rejects_length_mismatch() {
    let codec = NoneCodec;
    let err = codec.decompress(b"abc", 4).unwrap_err();
    assert!(matches!(err, SegmentReadError::FileFormat(_)));
}

#[test]
fn lz4_garbage_is_a_format_error() {
    let codec = Lz4Codec;
    let err = codec.decompress(&[0xFF, 0xFF, 0xFF], 64).unwrap_err();
    assert!(matches!(err, SegmentReadError::FileFormat(_)));
}
