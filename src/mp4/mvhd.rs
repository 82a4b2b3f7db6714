use crate::bits::reader::{be_u32_at, be_u64_at};
use crate::errors::Mp4Error;
use crate::mp4::{FourCC, Mp4Box};

/// Timescale and duration from a movie header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovieHeader {
    pub version: u8,
    pub timescale: u32,
    pub duration: u64,
}

impl MovieHeader {
    /// Duration in seconds, `None` for a zero timescale
    pub fn duration_seconds(&self) -> Option<f64> {
        if self.timescale > 0 {
            Some(self.duration as f64 / self.timescale as f64)
        } else {
            None
        }
    }
}

/// Parse mvhd box to get timescale and duration
pub fn parse_mvhd(mvhd: &Mp4Box<'_>) -> Result<MovieHeader, Mp4Error> {
    let data = mvhd.payload.ok_or(Mp4Error::MissingPayload {
        box_type: FourCC::new(*b"mvhd"),
    })?;
    if data.len() < 12 {
        return Err(Mp4Error::new("mvhd atom too small."));
    }

    let version = data[0];
    if version == 1 {
        // Version 1: 64-bit creation/modification times and duration
        match (be_u32_at(data, 20), be_u64_at(data, 24)) {
            (Some(timescale), Some(duration)) => Ok(MovieHeader {
                version,
                timescale,
                duration,
            }),
            _ => Err(Mp4Error::new(
                "mvhd atom version=1 too small for timescale and duration.",
            )),
        }
    } else {
        // Version 0: 32-bit values
        match (be_u32_at(data, 12), be_u32_at(data, 16)) {
            (Some(timescale), Some(duration)) => Ok(MovieHeader {
                version,
                timescale,
                duration: duration as u64,
            }),
            _ => Err(Mp4Error::new(
                "mvhd atom version=0 too small for timescale and duration.",
            )),
        }
    }
}
