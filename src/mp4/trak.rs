use crate::bits::reader::{be_u32_at, fixed_16_16_int, ByteCursor};
use crate::errors::Mp4Error;
use crate::mp4::stsd::{inspect_sample_entry, parse_stsd, SampleEntryDetails};
use crate::mp4::{FourCC, Mp4Box};
use crate::segment::{AudioTrack, Resolution, Track, TrackKind, VideoTrack};
use log::debug;

/// Track ID and presentation size from tkhd
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackHeader {
    pub track_id: u32,
    pub resolution: Resolution,
}

/// Parse tkhd box.
///
/// Width and height are the last 8 bytes of the payload as 16.16 fixed point;
/// only the integer part is kept.
pub fn parse_tkhd(tkhd: &Mp4Box<'_>) -> Result<TrackHeader, Mp4Error> {
    let data = tkhd.payload.ok_or(Mp4Error::MissingPayload {
        box_type: FourCC::new(*b"tkhd"),
    })?;
    if data.len() < 8 {
        return Err(Mp4Error::TooSmall {
            box_type: FourCC::new(*b"tkhd"),
            needed: 8,
            actual: data.len(),
        });
    }

    // version/flags, then creation + modification time (8 bytes each in v1, 4 in v0)
    let id_offset = if data[0] == 1 { 4 + 8 + 8 } else { 4 + 4 + 4 };
    let track_id = be_u32_at(data, id_offset).ok_or(Mp4Error::TooSmall {
        box_type: FourCC::new(*b"tkhd"),
        needed: id_offset + 4,
        actual: data.len(),
    })?;

    let dims = data.len() - 8;
    let width = be_u32_at(data, dims).map(fixed_16_16_int).unwrap_or(0);
    let height = be_u32_at(data, dims + 4).map(fixed_16_16_int).unwrap_or(0);

    Ok(TrackHeader {
        track_id,
        resolution: Resolution { width, height },
    })
}

/// Parse hdlr box to get the handler type (`vide`, `soun`, ...)
pub fn parse_hdlr(hdlr: &Mp4Box<'_>) -> Result<FourCC, Mp4Error> {
    let data = hdlr.payload.ok_or(Mp4Error::MissingPayload {
        box_type: FourCC::new(*b"hdlr"),
    })?;
    if data.len() < 12 {
        return Err(Mp4Error::TooSmall {
            box_type: FourCC::new(*b"hdlr"),
            needed: 12,
            actual: data.len(),
        });
    }
    let mut cursor = ByteCursor::new(&data[8..12]);
    Ok(cursor.read_fourcc()?)
}

/// Decode a trak box into a video or audio track.
///
/// Returns `None` when the track has no usable header or handler, or is
/// neither video nor audio; the reason is pushed to `issues`.
pub fn decode_trak(trak: &Mp4Box<'_>, issues: &mut Vec<String>) -> Option<Track> {
    let header = match trak.find_child(b"tkhd").map(parse_tkhd) {
        Some(Ok(header)) => Some(header),
        Some(Err(e)) => {
            issues.push(e.to_string());
            None
        }
        None => None,
    };

    let mdia = trak.find_child(b"mdia");
    let handler = match mdia.and_then(|m| m.find_child(b"hdlr")).map(parse_hdlr) {
        Some(Ok(handler)) => Some(handler),
        Some(Err(e)) => {
            issues.push(e.to_string());
            None
        }
        None => None,
    };

    let (header, handler) = match (header, handler) {
        (Some(header), Some(handler)) => (header, handler),
        _ => {
            issues.push("Track missing header (tkhd) or handler (hdlr).".to_string());
            return None;
        }
    };

    let kind = match TrackKind::from_handler(handler.as_str()) {
        Some(kind) => kind,
        None => {
            issues.push(format!(
                "Track {} has handler '{}', not video/audio; skipped.",
                header.track_id, handler
            ));
            return None;
        }
    };

    let details = match mdia.and_then(|m| m.find_path(&[b"minf", b"stbl", b"stsd"])) {
        Some(stsd) => match parse_stsd(stsd) {
            Ok(entry) => inspect_sample_entry(&entry, kind, issues),
            Err(e) => {
                issues.push(e.to_string());
                SampleEntryDetails::default()
            }
        },
        None => {
            issues.push(format!(
                "Track {} has no sample description (stsd).",
                header.track_id
            ));
            SampleEntryDetails::default()
        }
    };
    let codec = if details.codec.is_empty() {
        "unknown".to_string()
    } else {
        details.codec
    };
    let protection = details.protection.unwrap_or_default();

    debug!(
        "trak {}: handler={} codec={} encrypted={}",
        header.track_id, handler, codec, details.encrypted
    );

    Some(match kind {
        TrackKind::Video => Track::Video(VideoTrack {
            track_id: header.track_id,
            codec,
            hdr_signal_box: details.signal_box,
            resolution: Some(header.resolution),
            encrypted: details.encrypted,
            protection_scheme: protection.scheme_type,
            original_format: protection.original_format,
        }),
        TrackKind::Audio => Track::Audio(AudioTrack {
            track_id: header.track_id,
            codec,
            channels: details.channels,
            sample_rate_hz: details.sample_rate_hz,
            dolby_atmos: false,
            encrypted: details.encrypted,
            protection_scheme: protection.scheme_type,
            original_format: protection.original_format,
        }),
    })
}
