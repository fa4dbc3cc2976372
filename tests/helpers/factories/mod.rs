pub mod segment_file_factory;
pub mod tablet_schema_factory;

pub use segment_file_factory::SegmentFileFactory;
pub use tablet_schema_factory::TabletSchemaFactory;

#[cfg(test)]
mod segment_file_factory_test;
#[cfg(test)]
mod tablet_schema_factory_test;
