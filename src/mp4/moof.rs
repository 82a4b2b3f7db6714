use crate::mp4::traf::decode_traf;
use crate::mp4::Mp4Box;
use crate::segment::{AudioTrack, InitContext, SegmentReport, Track, VideoTrack};
use log::{debug, warn};

/// Track IDs assumed by the fixed mapping when no init segment is known
pub const FALLBACK_VIDEO_TRACK_ID: u32 = 1;
pub const FALLBACK_AUDIO_TRACK_ID: u32 = 2;
/// Codec names reported by the fixed mapping; the fragment itself does not carry them
pub const FALLBACK_VIDEO_CODEC: &str = "hvc1";
pub const FALLBACK_AUDIO_CODEC: &str = "ec-3";

/// Decode every traf of a moof into `report`.
///
/// Fragment track IDs are looked up in `context` when one is given. Without
/// it, track 1 is taken as video and track 2 as audio, with placeholder codecs.
pub fn decode_moof(moof: &Mp4Box<'_>, context: Option<&InitContext>, report: &mut SegmentReport) {
    for traf in moof.children_of_type(b"traf") {
        let facts = decode_traf(traf, &mut report.issues);
        report.fragments.push(facts);

        let track_id = match facts.track_id {
            Some(id) => id,
            None => {
                report.issues.push("No trackID found in tfhd.".to_string());
                continue;
            }
        };
        debug!(
            "traf track={} decode_time={:?} samples={}",
            track_id, facts.decode_time, facts.sample_count
        );

        let track = match context {
            Some(context) => context.track(track_id).cloned(),
            None => fallback_track(track_id),
        };
        match track {
            Some(track) => report.set_track(track),
            None => {
                warn!("fragment track {} has no known kind", track_id);
                report.issues.push(format!(
                    "Track ID = {} encountered but not mapped to video/audio.",
                    track_id
                ));
            }
        }
    }
}

/// Placeholder track for the fixed ID mapping
fn fallback_track(track_id: u32) -> Option<Track> {
    match track_id {
        FALLBACK_VIDEO_TRACK_ID => Some(Track::Video(VideoTrack {
            track_id,
            codec: FALLBACK_VIDEO_CODEC.to_string(),
            hdr_signal_box: None,
            resolution: None,
            encrypted: false,
            protection_scheme: None,
            original_format: None,
        })),
        FALLBACK_AUDIO_TRACK_ID => Some(Track::Audio(AudioTrack {
            track_id,
            codec: FALLBACK_AUDIO_CODEC.to_string(),
            channels: None,
            sample_rate_hz: None,
            dolby_atmos: false,
            encrypted: false,
            protection_scheme: None,
            original_format: None,
        })),
        _ => None,
    }
}
