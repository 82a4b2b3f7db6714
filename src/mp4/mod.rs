pub mod r#box;
pub use r#box::{
    parse_boxes, scan_nested_boxes, BoxParseResult, BoxSummary, FourCC, Mp4Box, NestedBox,
    NestedBoxes,
};
pub mod mvhd;
pub use mvhd::{parse_mvhd, MovieHeader};
pub mod trak;
pub use trak::{decode_trak, parse_hdlr, parse_tkhd, TrackHeader};
pub mod stsd;
pub use stsd::{codec_display_name, inspect_sample_entry, parse_stsd, SampleEntry};
pub mod sinf;
pub use sinf::{parse_sinf, ProtectionInfo};
pub mod moov;
pub use moov::decode_moov;
pub mod traf;
pub use traf::{decode_traf, parse_tfdt, parse_tfhd, parse_trun};
pub mod moof;
pub use moof::decode_moof;

#[cfg(test)]
mod stsd_test;
