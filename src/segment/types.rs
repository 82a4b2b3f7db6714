use crate::mp4::BoxSummary;
use serde::Serialize;
use std::collections::BTreeMap;

/// Pixel dimensions from the track header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// Track kind declared by the `hdlr` handler type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
}

impl TrackKind {
    /// Map a handler type (`vide`, `soun`) to a track kind.
    pub fn from_handler(handler: &str) -> Option<Self> {
        match handler {
            "vide" => Some(TrackKind::Video),
            "soun" => Some(TrackKind::Audio),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoTrack {
    #[serde(rename = "trackID")]
    pub track_id: u32,
    pub codec: String,
    /// Codec configuration box found in the sample entry (`avcC`, `hvcC`, `dvvC`, ...)
    pub hdr_signal_box: Option<String>,
    pub resolution: Option<Resolution>,
    pub encrypted: bool,
    pub protection_scheme: Option<String>,
    pub original_format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioTrack {
    #[serde(rename = "trackID")]
    pub track_id: u32,
    pub codec: String,
    pub channels: Option<u32>,
    pub sample_rate_hz: Option<u32>,
    /// Reserved; nothing sets it yet
    pub dolby_atmos: bool,
    pub encrypted: bool,
    pub protection_scheme: Option<String>,
    pub original_format: Option<String>,
}

/// A decoded `trak`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Track {
    Video(VideoTrack),
    Audio(AudioTrack),
}

impl Track {
    pub fn track_id(&self) -> u32 {
        match self {
            Track::Video(v) => v.track_id,
            Track::Audio(a) => a.track_id,
        }
    }

    pub fn kind(&self) -> TrackKind {
        match self {
            Track::Video(_) => TrackKind::Video,
            Track::Audio(_) => TrackKind::Audio,
        }
    }

    pub fn is_encrypted(&self) -> bool {
        match self {
            Track::Video(v) => v.encrypted,
            Track::Audio(a) => a.encrypted,
        }
    }
}

/// Facts decoded from one `traf`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentFacts {
    #[serde(rename = "trackID")]
    pub track_id: Option<u32>,
    pub decode_time: Option<u64>,
    pub sample_count: u32,
}

/// Tracks known from an init segment, keyed by track ID
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InitContext {
    tracks: BTreeMap<u32, Track>,
}

impl InitContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, track: Track) {
        self.tracks.insert(track.track_id(), track);
    }

    /// Add every track of `other`, replacing tracks with the same ID.
    pub fn merge(&mut self, other: InitContext) {
        self.tracks.extend(other.tracks);
    }

    pub fn track(&self, track_id: u32) -> Option<&Track> {
        self.tracks.get(&track_id)
    }

    pub fn kind_of(&self, track_id: u32) -> Option<TrackKind> {
        self.track(track_id).map(Track::kind)
    }

    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }
}

/// Everything learned about one segment buffer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentReport {
    pub size_bytes: u64,
    pub video_track: Option<VideoTrack>,
    pub audio_track: Option<AudioTrack>,
    pub segment_duration_seconds: Option<f64>,
    /// Diagnostics in the order they were found; informational lines included
    pub issues: Vec<String>,
    pub fragments: Vec<FragmentFacts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_summary: Option<Vec<BoxSummary>>,
}

impl SegmentReport {
    pub fn new(size_bytes: u64) -> Self {
        Self {
            size_bytes,
            ..Default::default()
        }
    }

    /// Report for a segment that could not be analyzed at all
    pub fn failed(issue: impl Into<String>) -> Self {
        let mut report = Self::new(0);
        report.issues.push(issue.into());
        report
    }

    /// Store a decoded track in the matching slot.
    pub fn set_track(&mut self, track: Track) {
        match track {
            Track::Video(v) => self.video_track = Some(v),
            Track::Audio(a) => self.audio_track = Some(a),
        }
    }

    pub fn is_encrypted(&self) -> bool {
        self.video_track.as_ref().is_some_and(|v| v.encrypted)
            || self.audio_track.as_ref().is_some_and(|a| a.encrypted)
    }
}
