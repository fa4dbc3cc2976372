pub use super::factories::{SegmentFileFactory, TabletSchemaFactory};

pub struct Factory;

impl Factory {
    pub fn segment_file() -> SegmentFileFactory {
        SegmentFileFactory::new()
    }

    pub fn tablet_schema() -> TabletSchemaFactory {
        TabletSchemaFactory::new()
    }
}
