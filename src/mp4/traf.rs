use crate::bits::reader::{be_u32_at, be_u64_at};
use crate::errors::Mp4Error;
use crate::mp4::Mp4Box;
use crate::segment::FragmentFacts;

/// Track ID from a tfhd payload, after version and flags
pub fn parse_tfhd(tfhd: &Mp4Box<'_>) -> Result<u32, Mp4Error> {
    tfhd.payload
        .and_then(|data| be_u32_at(data, 4))
        .ok_or_else(|| Mp4Error::new("tfhd atom too small or missing payload."))
}

/// Base media decode time from a tfdt payload; version 0 values are zero-extended
pub fn parse_tfdt(tfdt: &Mp4Box<'_>) -> Result<u64, Mp4Error> {
    let data = match tfdt.payload {
        Some(data) if data.len() >= 4 => data,
        _ => return Err(Mp4Error::new("tfdt atom too small.")),
    };
    if data[0] == 1 {
        be_u64_at(data, 4).ok_or_else(|| Mp4Error::new("tfdt version=1 but not enough bytes."))
    } else {
        be_u32_at(data, 4)
            .map(u64::from)
            .ok_or_else(|| Mp4Error::new("tfdt version=0 but not enough bytes."))
    }
}

/// Sample count from a trun payload, after version and flags
pub fn parse_trun(trun: &Mp4Box<'_>) -> Result<u32, Mp4Error> {
    trun.payload
        .and_then(|data| be_u32_at(data, 4))
        .ok_or_else(|| Mp4Error::new("trun atom too small."))
}

/// Decode one traf. A traf may carry several truns; their sample counts add up.
pub fn decode_traf(traf: &Mp4Box<'_>, issues: &mut Vec<String>) -> FragmentFacts {
    let mut facts = FragmentFacts::default();

    for child in &traf.children {
        let result = match child.box_type.as_bytes() {
            b"tfhd" => parse_tfhd(child).map(|id| facts.track_id = Some(id)),
            b"tfdt" => parse_tfdt(child).map(|time| facts.decode_time = Some(time)),
            b"trun" => parse_trun(child).map(|count| {
                facts.sample_count = facts.sample_count.saturating_add(count);
            }),
            _ => Ok(()),
        };
        if let Err(e) = result {
            issues.push(e.to_string());
        }
    }

    facts
}
