use crate::segment::{AudioTrack, SegmentReport, VideoTrack};
use serde::Serialize;

/// One segment's report at its manifest position
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedSegmentReport {
    pub index: usize,
    pub report: SegmentReport,
}

/// Roll-up over every segment of a batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub segment_count: usize,
    pub total_size_bytes: u64,
    /// `None` for an empty batch
    pub average_size_bytes: Option<f64>,
    /// First video track seen in index order
    pub video_track: Option<VideoTrack>,
    /// First audio track seen in index order
    pub audio_track: Option<AudioTrack>,
    pub any_encrypted: bool,
    pub issue_count: usize,
}

impl BatchSummary {
    /// Summarize reports that are already in index order.
    pub fn from_reports(segments: &[IndexedSegmentReport]) -> Self {
        let mut summary = BatchSummary {
            segment_count: segments.len(),
            ..Default::default()
        };

        for IndexedSegmentReport { report, .. } in segments {
            summary.total_size_bytes += report.size_bytes;
            summary.issue_count += report.issues.len();
            summary.any_encrypted |= report.is_encrypted();
            if summary.video_track.is_none() {
                summary.video_track = report.video_track.clone();
            }
            if summary.audio_track.is_none() {
                summary.audio_track = report.audio_track.clone();
            }
        }

        if !segments.is_empty() {
            summary.average_size_bytes =
                Some(summary.total_size_bytes as f64 / segments.len() as f64);
        }
        summary
    }
}

/// Index-ordered reports plus their summary
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub segments: Vec<IndexedSegmentReport>,
    pub summary: BatchSummary,
}

impl BatchReport {
    /// Sort by index and summarize.
    pub fn new(mut segments: Vec<IndexedSegmentReport>) -> Self {
        segments.sort_by_key(|s| s.index);
        let summary = BatchSummary::from_reports(&segments);
        Self { segments, summary }
    }

    pub fn report(&self, index: usize) -> Option<&SegmentReport> {
        self.segments
            .iter()
            .find(|s| s.index == index)
            .map(|s| &s.report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(size: u64, encrypted_audio: Option<bool>) -> SegmentReport {
        let mut report = SegmentReport::new(size);
        report.audio_track = encrypted_audio.map(|encrypted| AudioTrack {
            track_id: 2,
            codec: if encrypted { "enca" } else { "mp4a" }.to_string(),
            channels: None,
            sample_rate_hz: None,
            dolby_atmos: false,
            encrypted,
            protection_scheme: None,
            original_format: None,
        });
        report
    }

    #[test]
    fn test_summary_rollups() {
        let mut failed = SegmentReport::failed("Failed to fetch seg2");
        failed.issues.push("second".to_string());
        let batch = BatchReport::new(vec![
            IndexedSegmentReport {
                index: 2,
                report: failed,
            },
            IndexedSegmentReport {
                index: 0,
                report: report(100, Some(false)),
            },
            IndexedSegmentReport {
                index: 1,
                report: report(300, Some(true)),
            },
        ]);

        let indexes: Vec<usize> = batch.segments.iter().map(|s| s.index).collect();
        assert_eq!(indexes, vec![0, 1, 2]);
        let summary = &batch.summary;
        assert_eq!(summary.segment_count, 3);
        assert_eq!(summary.total_size_bytes, 400);
        assert_eq!(summary.average_size_bytes, Some(400.0 / 3.0));
        assert_eq!(summary.audio_track.as_ref().map(|a| a.codec.as_str()), Some("mp4a"));
        assert!(summary.video_track.is_none());
        assert!(summary.any_encrypted);
        assert_eq!(summary.issue_count, 2);
        assert_eq!(batch.report(1).map(|r| r.size_bytes), Some(300));
    }

    #[test]
    fn test_empty_batch() {
        let batch = BatchReport::new(Vec::new());
        assert_eq!(batch.summary.segment_count, 0);
        assert_eq!(batch.summary.average_size_bytes, None);
        assert!(!batch.summary.any_encrypted);
    }
}
