pub mod bits;
pub use bits::reader::ByteCursor;

pub mod mp4;
pub use mp4::{parse_boxes, BoxParseResult, BoxSummary, FourCC, Mp4Box};

pub mod segment;
pub use segment::{
    AnalyzerOptions, AudioTrack, FragmentFacts, InitContext, Resolution, SegmentAnalyzer,
    SegmentReport, Track, TrackKind, TrackMapping, VideoTrack,
};

pub mod batch;
pub use batch::{BatchAnalyzer, BatchOptions, BatchReport, BatchSummary, IndexedSegmentReport};

pub mod streams;
pub use streams::{
    segment_source_for, ByteRange, HttpSegmentSource, LocalSegmentSource, MemorySegmentSource,
    SegmentSource,
};

pub mod errors;
pub use errors::{BoxError, CmafParserError, CmafParserResult, Mp4Error, SourceError};

/// Analyze one segment given as a local path or an http(s) URL.
pub async fn analyze_segment(source: String) -> SegmentReport {
    let analyzer = SegmentAnalyzer::default();
    match segment_source_for(&source, None) {
        Ok(segment) => analyzer.analyze_source(&segment).await,
        Err(e) => SegmentReport::failed(format!("Failed to fetch {}: {}", source, e)),
    }
}

/// Analyze several segments concurrently; reports keep the order of `sources`.
pub async fn analyze_segments(sources: Vec<String>) -> BatchReport {
    analyze_segments_with(BatchAnalyzer::default(), sources).await
}

/// Like [`analyze_segments`], with a configured analyzer (init segment, limits).
pub async fn analyze_segments_with(analyzer: BatchAnalyzer, sources: Vec<String>) -> BatchReport {
    let mut segments: Vec<(usize, Box<dyn SegmentSource>)> = Vec::with_capacity(sources.len());
    let mut unavailable = Vec::new();
    for (index, uri) in sources.into_iter().enumerate() {
        match segment_source_for(&uri, None) {
            Ok(source) => segments.push((index, source)),
            Err(e) => unavailable.push(IndexedSegmentReport {
                index,
                report: SegmentReport::failed(format!("Failed to fetch {}: {}", uri, e)),
            }),
        }
    }

    let batch = analyzer.analyze(segments).await;
    if unavailable.is_empty() {
        return batch;
    }
    let mut reports = batch.segments;
    reports.extend(unavailable);
    BatchReport::new(reports)
}
