#![allow(dead_code)]

use cmafparser::mp4::r#box::write_box_header;

pub fn make_box(name: &str, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    write_box_header(&mut buf, name, (payload.len() + 8) as u32);
    buf.extend_from_slice(payload);
    buf
}

fn trak(track_id: u32, handler: &[u8; 4], sample_entry: Vec<u8>, width: u32, height: u32) -> Vec<u8> {
    let mut tkhd = vec![0u8; 12];
    tkhd.extend_from_slice(&track_id.to_be_bytes());
    tkhd.extend_from_slice(&[0u8; 60]);
    tkhd.extend_from_slice(&(width << 16).to_be_bytes());
    tkhd.extend_from_slice(&(height << 16).to_be_bytes());

    let mut hdlr = vec![0u8; 8];
    hdlr.extend_from_slice(handler);
    hdlr.extend_from_slice(&[0u8; 12]);

    let mut stsd = vec![0, 0, 0, 0, 0, 0, 0, 1];
    stsd.extend_from_slice(&sample_entry);
    let minf = make_box("minf", &make_box("stbl", &make_box("stsd", &stsd)));
    let mdia = make_box("mdia", &[make_box("hdlr", &hdlr), minf].concat());
    make_box("trak", &[make_box("tkhd", &tkhd), mdia].concat())
}

/// Init segment: mvhd (90 kHz, 4 s), encrypted hvc1 video as track 1, mp4a stereo as track 2
pub fn init_segment() -> Vec<u8> {
    let mut mvhd = vec![0u8; 12];
    mvhd.extend_from_slice(&90_000u32.to_be_bytes());
    mvhd.extend_from_slice(&360_000u32.to_be_bytes());
    mvhd.extend_from_slice(&[0u8; 80]);

    let mut schm = vec![0u8; 4];
    schm.extend_from_slice(b"cbcs");
    schm.extend_from_slice(&[0, 1, 0, 0]);
    let sinf = make_box("sinf", &[make_box("frma", b"hvc1"), make_box("schm", &schm)].concat());
    let mut visual = vec![0u8; 78];
    visual.extend_from_slice(&make_box("hvcC", &[1u8; 23]));
    visual.extend_from_slice(&sinf);

    let mut audio = vec![0u8; 28];
    audio[16..18].copy_from_slice(&2u16.to_be_bytes());
    audio[24..28].copy_from_slice(&(48_000u32 << 16).to_be_bytes());

    let moov = make_box(
        "moov",
        &[
            make_box("mvhd", &mvhd),
            trak(1, b"vide", make_box("encv", &visual), 3840, 2160),
            trak(2, b"soun", make_box("mp4a", &audio), 0, 0),
        ]
        .concat(),
    );
    [make_box("ftyp", b"cmfc\0\0\0\0iso6cmfc"), moov].concat()
}

/// Media segment with one traf per track ID, version 1 tfdt
pub fn media_segment(track_ids: &[u32], decode_time: u64, mdat_len: usize) -> Vec<u8> {
    let mut moof = make_box("mfhd", &[0, 0, 0, 0, 0, 0, 0, 1]);
    for id in track_ids {
        let mut tfhd = vec![0, 2, 0, 0];
        tfhd.extend_from_slice(&id.to_be_bytes());
        let mut tfdt = vec![1, 0, 0, 0];
        tfdt.extend_from_slice(&decode_time.to_be_bytes());
        let mut trun = vec![0, 0, 0x0f, 0x01];
        trun.extend_from_slice(&96u32.to_be_bytes());
        moof.extend_from_slice(&make_box(
            "traf",
            &[make_box("tfhd", &tfhd), make_box("tfdt", &tfdt), make_box("trun", &trun)].concat(),
        ));
    }
    [make_box("moof", &moof), make_box("mdat", &vec![0u8; mdat_len])].concat()
}
