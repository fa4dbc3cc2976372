pub mod compression_codec;
pub mod compression_kind;
pub mod decompressor_registry;

pub use compression_codec::{CompressionCodec, Lz4Codec, NoneCodec, ZstdCodec};
pub use compression_kind::CompressionKind;
pub use decompressor_registry::DecompressorRegistry;

#[cfg(test)]
mod compression_codec_test;
