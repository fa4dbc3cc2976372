use crate::engine::errors::SegmentReadError;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompressionKind {
    None = 0,
    Lzo = 1,
    Lz4 = 2,
    Zstd = 3,
}

impl TryFrom<u8> for CompressionKind {
    type Error = SegmentReadError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(CompressionKind::None),
            1 => Ok(CompressionKind::Lzo),
            2 => Ok(CompressionKind::Lz4),
            3 => Ok(CompressionKind::Zstd),
            other => Err(SegmentReadError::UnsupportedCompression(format!(
                "unknown compression kind {other}"
            ))),
        }
    }
}

impl From<CompressionKind> for u8 {
    fn from(k: CompressionKind) -> u8 {
        k as u8
    }
}
