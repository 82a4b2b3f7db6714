mod analyzer;
mod summary;

pub use analyzer::{BatchAnalyzer, BatchOptions};
pub use summary::{BatchReport, BatchSummary, IndexedSegmentReport};
