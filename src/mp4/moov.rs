use crate::mp4::mvhd::parse_mvhd;
use crate::mp4::trak::decode_trak;
use crate::mp4::Mp4Box;
use crate::segment::{InitContext, SegmentReport};
use log::debug;

/// Decode movie timing and tracks from a moov box into `report`.
///
/// Returns every decoded track keyed by ID so later fragments can be
/// correlated with it. When several tracks share a kind, the report keeps the
/// last one.
pub fn decode_moov(moov: &Mp4Box<'_>, report: &mut SegmentReport) -> InitContext {
    let mut context = InitContext::new();

    for child in &moov.children {
        if child.box_type == *b"mvhd" {
            match parse_mvhd(child) {
                Ok(header) => match header.duration_seconds() {
                    Some(seconds) => {
                        report.segment_duration_seconds = Some(seconds);
                        report.issues.push(format!(
                            "Movie header: timescale={}, duration={} (~{:.3}s)",
                            header.timescale, header.duration, seconds
                        ));
                    }
                    None => report.issues.push("mvhd has zero timescale.".to_string()),
                },
                Err(e) => report.issues.push(e.to_string()),
            }
        } else if child.box_type == *b"trak" {
            if let Some(track) = decode_trak(child, &mut report.issues) {
                context.insert(track.clone());
                report.set_track(track);
            }
        }
    }

    debug!("moov decoded with {} track(s)", context.len());
    context
}
