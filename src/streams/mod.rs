pub mod http_segment_source;
pub mod segment_source;

pub use http_segment_source::HttpSegmentSource;
#[cfg(test)]
pub use segment_source::MockSegmentSource;
pub use segment_source::{
    segment_source_for, ByteRange, LocalSegmentSource, MemorySegmentSource, SegmentSource,
};
