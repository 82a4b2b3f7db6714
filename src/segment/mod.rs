mod analyzer;
mod types;

pub use analyzer::{AnalyzerOptions, SegmentAnalyzer, TrackMapping};
pub use types::{
    AudioTrack, FragmentFacts, InitContext, Resolution, SegmentReport, Track, TrackKind,
    VideoTrack,
};

#[cfg(test)]
pub(crate) mod fixtures;
