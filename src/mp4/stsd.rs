use crate::bits::reader::{be_u16_at, be_u32_at, fixed_16_16_int, ByteCursor};
use crate::errors::{BoxError, Mp4Error};
use crate::mp4::r#box::{scan_nested_boxes, NestedBoxes};
use crate::mp4::sinf::{parse_sinf, ProtectionInfo};
use crate::mp4::{FourCC, Mp4Box};
use crate::segment::TrackKind;

/// Fixed fields of an AudioSampleEntry before its nested boxes
pub const AUDIO_SAMPLE_ENTRY_HEADER: usize = 28;
/// Fixed fields of a VisualSampleEntry before its nested boxes
pub const VISUAL_SAMPLE_ENTRY_HEADER: usize = 78;

/// Codec configuration boxes recognised in video sample entries, Dolby Vision first
const SIGNAL_BOXES: [&[u8; 4]; 7] = [b"dvvC", b"dvcC", b"dvwC", b"hvcC", b"avcC", b"av1C", b"vpcC"];
const DOLBY_VISION_BOXES: [&[u8; 4]; 3] = [b"dvvC", b"dvcC", b"dvwC"];

/// First sample description of an `stsd`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleEntry<'a> {
    pub entry_count: u32,
    pub codec: FourCC,
    /// Everything after the entry's size and type, clamped to the stsd payload
    pub data: &'a [u8],
    /// Bytes the entry declares beyond the end of the stsd payload
    pub missing_bytes: usize,
}

/// What the sample entry says about codec, protection and audio layout
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleEntryDetails {
    pub codec: String,
    pub encrypted: bool,
    pub protection: Option<ProtectionInfo>,
    pub signal_box: Option<String>,
    pub channels: Option<u32>,
    pub sample_rate_hz: Option<u32>,
}

/// Parse the first sample entry of an stsd box
pub fn parse_stsd<'a>(stsd: &Mp4Box<'a>) -> Result<SampleEntry<'a>, Mp4Error> {
    let payload = stsd.payload.ok_or(Mp4Error::MissingPayload {
        box_type: FourCC::new(*b"stsd"),
    })?;
    let mut cursor = ByteCursor::new(payload);
    let stsd_error = |e: BoxError| Mp4Error::new(format!("Error parsing stsd: {}", e));

    // version (1) + flags (3)
    cursor.skip(4).map_err(stsd_error)?;
    let entry_count = cursor.read_u32_be().map_err(stsd_error)?;
    if entry_count == 0 {
        return Err(Mp4Error::new("stsd has no sample entries."));
    }

    let entry_size = cursor.read_u32_be().map_err(stsd_error)?;
    let codec = cursor.read_fourcc().map_err(stsd_error)?;
    let data_size = (entry_size as usize).saturating_sub(8);
    let available = cursor.bytes_remaining().min(data_size);
    let data = cursor.take(available).map_err(stsd_error)?;

    Ok(SampleEntry {
        entry_count,
        codec,
        data,
        missing_bytes: data_size - available,
    })
}

/// Find the nested boxes of a sample entry.
///
/// Looks after the codec-family fixed fields first, then from the start of the
/// entry data for minimal entries that carry boxes only. A chain that yields
/// boxes wins over an empty one.
pub fn nested_boxes(data: &[u8], fixed_header: usize) -> NestedBoxes<'_> {
    if data.len() < fixed_header {
        return scan_nested_boxes(data);
    }
    let scan = scan_nested_boxes(&data[fixed_header..]);
    if scan.is_well_formed() && !scan.boxes.is_empty() {
        return scan;
    }
    let fallback = scan_nested_boxes(data);
    if fallback.is_well_formed() && (!fallback.boxes.is_empty() || !scan.is_well_formed()) {
        return fallback;
    }
    scan
}

/// Decode codec facts from a sample entry of a track of the given kind
pub fn inspect_sample_entry(
    entry: &SampleEntry<'_>,
    kind: TrackKind,
    issues: &mut Vec<String>,
) -> SampleEntryDetails {
    let mut details = SampleEntryDetails {
        codec: entry.codec.to_string(),
        encrypted: entry.codec == *b"encv" || entry.codec == *b"enca",
        ..Default::default()
    };
    if entry.missing_bytes > 0 {
        issues.push(format!(
            "Sample entry {} truncated: {} declared bytes missing from stsd.",
            entry.codec, entry.missing_bytes
        ));
    }

    let fixed_header = match kind {
        TrackKind::Audio => AUDIO_SAMPLE_ENTRY_HEADER,
        TrackKind::Video => VISUAL_SAMPLE_ENTRY_HEADER,
    };
    let nested = nested_boxes(entry.data, fixed_header);
    if let Some(e) = &nested.error {
        issues.push(format!(
            "Sample entry {} nested atom scan stopped: {}",
            entry.codec, e
        ));
    }

    if let Some(sinf) = nested.find(b"sinf") {
        details.encrypted = true;
        details.protection = Some(parse_sinf(sinf.payload, issues));
    }

    match kind {
        TrackKind::Audio => {
            // AudioSampleEntry: channelcount @ 16, samplerate @ 24 (16.16 fixed)
            if entry.data.len() >= AUDIO_SAMPLE_ENTRY_HEADER {
                details.channels = be_u16_at(entry.data, 16).map(u32::from);
                details.sample_rate_hz = be_u32_at(entry.data, 24).map(fixed_16_16_int);
            } else {
                issues.push(format!(
                    "Audio sample entry {} too small for channel count and sample rate ({} bytes).",
                    entry.codec,
                    entry.data.len()
                ));
            }
        }
        TrackKind::Video => {
            details.signal_box = DOLBY_VISION_BOXES
                .iter()
                .find(|t| nested.contains(t))
                .map(|t| FourCC::new(**t).to_string())
                .or_else(|| {
                    nested
                        .boxes
                        .iter()
                        .find(|b| SIGNAL_BOXES.iter().any(|t| b.box_type == **t))
                        .map(|b| b.box_type.to_string())
                });
        }
    }

    details
}

/// Readable name for a sample entry fourcc
pub fn codec_display_name(fourcc: &str) -> &str {
    match fourcc {
        "avc1" | "avc3" => "H.264/AVC",
        "hev1" | "hvc1" => "H.265/HEVC",
        "dvh1" | "dvhe" => "Dolby Vision (HEVC)",
        "av01" => "AV1",
        "vp09" => "VP9",
        "mp4v" => "MPEG-4 Visual",
        "mp4a" => "AAC",
        "ac-3" => "AC-3",
        "ec-3" => "E-AC-3",
        "ac-4" => "AC-4",
        "Opus" => "Opus",
        "fLaC" => "FLAC",
        "encv" => "Encrypted video",
        "enca" => "Encrypted audio",
        "wvtt" => "WebVTT",
        "stpp" => "XML Subtitle",
        _ => fourcc,
    }
}
