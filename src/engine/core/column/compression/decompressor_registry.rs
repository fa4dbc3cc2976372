use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::warn;

use crate::engine::core::column::compression::{
    CompressionCodec, CompressionKind, Lz4Codec, NoneCodec, ZstdCodec,
};
use crate::engine::errors::SegmentReadError;

/// Maps a header compression kind to the codec compiled into this build.
/// LZO has no codec here and is reported as unsupported.
pub struct DecompressorRegistry {
    codecs: HashMap<CompressionKind, Arc<dyn CompressionCodec>>,
}

static BUILTIN: Lazy<Arc<DecompressorRegistry>> =
    Lazy::new(|| Arc::new(DecompressorRegistry::with_builtin_codecs()));

impl DecompressorRegistry {
    pub fn empty() -> Self {
        Self {
            codecs: HashMap::new(),
        }
    }

    pub fn with_builtin_codecs() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(NoneCodec));
        registry.register(Arc::new(Lz4Codec));
        registry.register(Arc::new(ZstdCodec::default()));
        registry
    }

    pub fn builtin() -> Arc<Self> {
        Arc::clone(&BUILTIN)
    }

    pub fn register(&mut self, codec: Arc<dyn CompressionCodec>) {
        self.codecs.insert(codec.kind(), codec);
    }

    pub fn supports(&self, kind: CompressionKind) -> bool {
        self.codecs.contains_key(&kind)
    }

    pub fn get(&self, kind: CompressionKind) -> Result<Arc<dyn CompressionCodec>, SegmentReadError> {
        match self.codecs.get(&kind) {
            Some(codec) => Ok(Arc::clone(codec)),
            None => {
                warn!(target: "colseg::reader", ?kind, "No decompressor available");
                Err(SegmentReadError::unsupported(kind))
            }
        }
    }
}
