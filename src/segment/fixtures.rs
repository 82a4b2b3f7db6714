//! Synthetic init segments and fragments for unit tests.

use crate::mp4::r#box::write_box_header;

pub fn make_box(name: &str, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    write_box_header(&mut buf, name, (payload.len() + 8) as u32);
    buf.extend_from_slice(payload);
    buf
}

pub fn mvhd(timescale: u32, duration: u32) -> Vec<u8> {
    let mut payload = vec![0u8; 12];
    payload.extend_from_slice(&timescale.to_be_bytes());
    payload.extend_from_slice(&duration.to_be_bytes());
    payload.extend_from_slice(&[0u8; 80]);
    make_box("mvhd", &payload)
}

fn trak(track_id: u32, width: u32, height: u32, handler: &[u8; 4], sample_entry: &[u8]) -> Vec<u8> {
    let mut tkhd = vec![0u8; 12];
    tkhd.extend_from_slice(&track_id.to_be_bytes());
    tkhd.extend_from_slice(&[0u8; 60]);
    tkhd.extend_from_slice(&(width << 16).to_be_bytes());
    tkhd.extend_from_slice(&(height << 16).to_be_bytes());

    let mut hdlr = vec![0u8; 8];
    hdlr.extend_from_slice(handler);
    hdlr.extend_from_slice(&[0u8; 13]);

    let mut stsd = vec![0, 0, 0, 0, 0, 0, 0, 1];
    stsd.extend_from_slice(sample_entry);
    let stbl = make_box("stbl", &make_box("stsd", &stsd));
    let mdia = make_box("mdia", &[make_box("hdlr", &hdlr), make_box("minf", &stbl)].concat());
    make_box("trak", &[make_box("tkhd", &tkhd), mdia].concat())
}

pub fn video_trak(track_id: u32, codec: &str, encrypted: bool) -> Vec<u8> {
    let mut entry = vec![0u8; 78];
    entry.extend_from_slice(&make_box("hvcC", &[1u8; 23]));
    if encrypted {
        entry.extend_from_slice(&make_box("sinf", &make_box("frma", codec.as_bytes())));
    }
    trak(track_id, 1920, 1080, b"vide", &make_box(codec, &entry))
}

pub fn audio_trak(track_id: u32, codec: &str, channels: u16, sample_rate: u32) -> Vec<u8> {
    let mut entry = vec![0u8; 28];
    entry[16..18].copy_from_slice(&channels.to_be_bytes());
    entry[24..28].copy_from_slice(&(sample_rate << 16).to_be_bytes());
    trak(track_id, 0, 0, b"soun", &make_box(codec, &entry))
}

/// ftyp + moov with an hvc1 video track and an ec-3 audio track
pub fn init_segment(video_id: u32, audio_id: u32) -> Vec<u8> {
    let moov = make_box(
        "moov",
        &[
            mvhd(1000, 0),
            video_trak(video_id, "hvc1", false),
            audio_trak(audio_id, "ec-3", 6, 48000),
        ]
        .concat(),
    );
    [make_box("ftyp", b"iso6\0\0\0\0cmfc"), moov].concat()
}

pub fn traf(track_id: u32, decode_time: u64, sample_count: u32) -> Vec<u8> {
    let mut tfhd = vec![0, 2, 0, 0];
    tfhd.extend_from_slice(&track_id.to_be_bytes());
    let mut tfdt = vec![1, 0, 0, 0];
    tfdt.extend_from_slice(&decode_time.to_be_bytes());
    let mut trun = vec![0, 0, 0, 1];
    trun.extend_from_slice(&sample_count.to_be_bytes());
    make_box(
        "traf",
        &[make_box("tfhd", &tfhd), make_box("tfdt", &tfdt), make_box("trun", &trun)].concat(),
    )
}

/// styp + moof + mdat with one traf per track ID
pub fn media_segment(track_ids: &[u32], mdat_len: usize) -> Vec<u8> {
    let mut moof = make_box("mfhd", &[0, 0, 0, 0, 0, 0, 0, 1]);
    for (n, id) in track_ids.iter().enumerate() {
        moof.extend_from_slice(&traf(*id, 90_000 * n as u64, 48));
    }
    [
        make_box("styp", b"msdh\0\0\0\0msdhmsix"),
        make_box("moof", &moof),
        make_box("mdat", &vec![0u8; mdat_len]),
    ]
    .concat()
}
