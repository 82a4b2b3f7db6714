use super::types::{InitContext, SegmentReport};
use crate::mp4::{decode_moof, decode_moov, parse_boxes, Mp4Box};
use crate::streams::SegmentSource;
use log::{debug, warn};
use std::sync::Arc;

/// How fragment track IDs are turned into video/audio tracks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrackMapping {
    /// Look track IDs up in the known init segment tracks; use the fixed
    /// mapping only when no init segment is known.
    #[default]
    InitSegment,
    /// Always map track 1 to video and track 2 to audio.
    FixedTrackIds,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerOptions {
    /// Attach the payload-free box tree to each report
    pub include_box_summary: bool,
    pub track_mapping: TrackMapping,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            include_box_summary: true,
            track_mapping: TrackMapping::InitSegment,
        }
    }
}

/// Builds a [`SegmentReport`] from the bytes of one segment.
///
/// Analysis never fails: anything wrong with the media ends up in
/// [`SegmentReport::issues`].
#[derive(Debug, Clone, Default)]
pub struct SegmentAnalyzer {
    options: AnalyzerOptions,
    init_context: Option<Arc<InitContext>>,
}

impl SegmentAnalyzer {
    pub fn new(options: AnalyzerOptions) -> Self {
        Self {
            options,
            init_context: None,
        }
    }

    /// Use tracks from a separately loaded init segment for fragment lookups.
    pub fn with_init_context(mut self, context: impl Into<Arc<InitContext>>) -> Self {
        self.init_context = Some(context.into());
        self
    }

    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    pub fn init_context(&self) -> Option<&InitContext> {
        self.init_context.as_deref()
    }

    pub fn analyze(&self, data: &[u8]) -> SegmentReport {
        self.analyze_with_context(data).0
    }

    /// Analyze a buffer and also return the tracks of any moov it holds.
    pub fn analyze_with_context(&self, data: &[u8]) -> (SegmentReport, InitContext) {
        let mut report = SegmentReport::new(data.len() as u64);
        let mut local_context = InitContext::new();

        let parsed = parse_boxes(data);
        report.issues.extend(parsed.issues);
        if self.options.include_box_summary {
            report.box_summary = Some(parsed.boxes.iter().map(Mp4Box::summarize).collect());
        }

        if parsed.boxes.is_empty() {
            report
                .issues
                .push("No recognizable MP4 atoms found.".to_string());
            return (report, local_context);
        }

        for moov in parsed.boxes.iter().filter(|b| b.box_type == *b"moov") {
            local_context.merge(decode_moov(moov, &mut report));
        }

        let mut context = self
            .init_context
            .as_deref()
            .cloned()
            .unwrap_or_default();
        context.merge(local_context.clone());
        let lookup = match self.options.track_mapping {
            TrackMapping::InitSegment if !context.is_empty() => Some(&context),
            _ => None,
        };

        let mut found_moof = false;
        for moof in parsed.boxes.iter().filter(|b| b.box_type == *b"moof") {
            found_moof = true;
            decode_moof(moof, lookup, &mut report);
        }
        if !found_moof {
            report
                .issues
                .push("No moof atom in segment (maybe init segment?)".to_string());
        }

        debug!(
            "analyzed {} bytes: {} top-level box(es), {} fragment(s), {} issue(s)",
            data.len(),
            parsed.boxes.len(),
            report.fragments.len(),
            report.issues.len()
        );
        (report, local_context)
    }

    /// Fetch a segment and analyze it. A failed fetch yields an empty report
    /// carrying the failure as its issue.
    pub async fn analyze_source<S: SegmentSource + ?Sized>(&self, source: &S) -> SegmentReport {
        match source.fetch().await {
            Ok(data) => self.analyze(&data),
            Err(e) => {
                warn!("fetch failed for {}: {}", source.describe(), e);
                SegmentReport::failed(format!("Failed to fetch {}: {}", source.describe(), e))
            }
        }
    }
}
