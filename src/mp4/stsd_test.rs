#[cfg(test)]
mod tests {
    use crate::mp4::r#box::write_box_header;
    use crate::mp4::stsd::*;
    use crate::mp4::Mp4Box;
    use crate::segment::TrackKind;

    fn make_box(name: &str, payload: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        write_box_header(&mut buf, name, (payload.len() + 8) as u32);
        buf.extend_from_slice(payload);
        buf
    }

    fn stsd_payload(codec: &[u8; 4], entry_data: &[u8]) -> Vec<u8> {
        let mut payload = vec![0, 0, 0, 0, 0, 0, 0, 1]; // version, flags, entry count
        payload.extend_from_slice(&((entry_data.len() + 8) as u32).to_be_bytes());
        payload.extend_from_slice(codec);
        payload.extend_from_slice(entry_data);
        payload
    }

    fn audio_entry_header(channels: u16, sample_rate: u32) -> Vec<u8> {
        let mut data = vec![0u8; AUDIO_SAMPLE_ENTRY_HEADER];
        data[16..18].copy_from_slice(&channels.to_be_bytes());
        data[24..28].copy_from_slice(&(sample_rate << 16).to_be_bytes());
        data
    }

    fn inspect(payload: &[u8], kind: TrackKind) -> (SampleEntryDetails, Vec<String>) {
        let stsd = Mp4Box::leaf(*b"stsd", payload);
        let entry = parse_stsd(&stsd).expect("sample entry");
        let mut issues = Vec::new();
        let details = inspect_sample_entry(&entry, kind, &mut issues);
        (details, issues)
    }

    #[test]
    fn test_audio_channels_and_sample_rate() {
        let payload = stsd_payload(b"mp4a", &audio_entry_header(2, 48000));
        let (details, issues) = inspect(&payload, TrackKind::Audio);
        assert!(issues.is_empty(), "{:?}", issues);
        assert_eq!(details.codec, "mp4a");
        assert_eq!(details.channels, Some(2));
        assert_eq!(details.sample_rate_hz, Some(48000));
        assert!(!details.encrypted);
    }

    #[test]
    fn test_short_audio_entry_is_an_issue() {
        let payload = stsd_payload(b"ec-3", &[0u8; 20]);
        let (details, issues) = inspect(&payload, TrackKind::Audio);
        assert_eq!(details.channels, None);
        assert_eq!(details.sample_rate_hz, None);
        assert!(issues.iter().any(|i| i.contains("too small for channel count")));
    }

    #[test]
    fn test_encrypted_audio_entry() {
        let mut data = audio_entry_header(6, 48000);
        data.extend_from_slice(&make_box("sinf", &[]));
        let payload = stsd_payload(b"enca", &data);
        let (details, issues) = inspect(&payload, TrackKind::Audio);
        assert!(issues.is_empty(), "{:?}", issues);
        assert!(details.encrypted);
        assert_eq!(details.channels, Some(6));
        assert_eq!(details.protection, Some(Default::default()));
    }

    #[test]
    fn test_minimal_video_entry_with_avcc_at_start() {
        let payload = stsd_payload(b"avc1", &make_box("avcC", &[1]));
        let (details, issues) = inspect(&payload, TrackKind::Video);
        assert!(issues.is_empty(), "{:?}", issues);
        assert_eq!(details.signal_box.as_deref(), Some("avcC"));
        assert!(!details.encrypted);
    }

    #[test]
    fn test_encrypted_video_entry() {
        let data = [make_box("avcC", &[1]), make_box("sinf", &[])].concat();
        let payload = stsd_payload(b"encv", &data);
        let (details, _) = inspect(&payload, TrackKind::Video);
        assert!(details.encrypted);
        assert_eq!(details.signal_box.as_deref(), Some("avcC"));
    }

    #[test]
    fn test_visual_entry_with_real_header() {
        let mut data = vec![0u8; VISUAL_SAMPLE_ENTRY_HEADER];
        data[24..26].copy_from_slice(&1920u16.to_be_bytes());
        data[26..28].copy_from_slice(&1080u16.to_be_bytes());
        data.extend_from_slice(&make_box("hvcC", &[1u8; 23]));
        data.extend_from_slice(&make_box("pasp", &[0, 0, 0, 1, 0, 0, 0, 1]));
        let payload = stsd_payload(b"hvc1", &data);
        let (details, issues) = inspect(&payload, TrackKind::Video);
        assert!(issues.is_empty(), "{:?}", issues);
        assert_eq!(details.codec, "hvc1");
        assert_eq!(details.signal_box.as_deref(), Some("hvcC"));
        assert!(!details.encrypted);
    }

    #[test]
    fn test_dolby_vision_box_wins() {
        let mut data = vec![0u8; VISUAL_SAMPLE_ENTRY_HEADER];
        data.extend_from_slice(&make_box("hvcC", &[1u8; 4]));
        data.extend_from_slice(&make_box("dvvC", &[0u8; 24]));
        let payload = stsd_payload(b"dvh1", &data);
        let (details, _) = inspect(&payload, TrackKind::Video);
        assert_eq!(details.signal_box.as_deref(), Some("dvvC"));
    }

    #[test]
    fn test_video_without_config_box() {
        let payload = stsd_payload(b"avc1", &[0u8; VISUAL_SAMPLE_ENTRY_HEADER]);
        let (details, issues) = inspect(&payload, TrackKind::Video);
        assert!(issues.is_empty(), "{:?}", issues);
        assert_eq!(details.signal_box, None);
    }

    #[test]
    fn test_empty_stsd() {
        let stsd = Mp4Box::leaf(*b"stsd", &[0, 0, 0, 0, 0, 0, 0, 0]);
        let err = parse_stsd(&stsd).unwrap_err();
        assert_eq!(err.to_string(), "stsd has no sample entries.");

        let truncated = stsd_payload(b"avc1", &[0u8; 10]);
        let stsd = Mp4Box::leaf(*b"stsd", &truncated[..14]);
        assert!(parse_stsd(&stsd)
            .unwrap_err()
            .to_string()
            .starts_with("Error parsing stsd"));
    }

    #[test]
    fn test_truncated_entry_keeps_partial_data() {
        let mut payload = vec![0, 0, 0, 0, 0, 0, 0, 1];
        payload.extend_from_slice(&200u32.to_be_bytes());
        payload.extend_from_slice(b"hvc1");
        payload.extend_from_slice(&[0u8; 30]);
        let stsd = Mp4Box::leaf(*b"stsd", &payload);
        let entry = parse_stsd(&stsd).expect("partial sample entry");
        assert_eq!(entry.codec, *b"hvc1");
        assert_eq!(entry.data.len(), 30);
        assert_eq!(entry.missing_bytes, 162);

        let mut audio = audio_entry_header(2, 48000);
        audio.extend_from_slice(&[0, 0]);
        let mut payload = vec![0, 0, 0, 0, 0, 0, 0, 1];
        payload.extend_from_slice(&200u32.to_be_bytes());
        payload.extend_from_slice(b"mp4a");
        payload.extend_from_slice(&audio);
        let (details, issues) = inspect(&payload, TrackKind::Audio);
        assert_eq!(details.codec, "mp4a");
        assert_eq!(details.channels, Some(2));
        assert_eq!(details.sample_rate_hz, Some(48000));
        assert_eq!(
            issues,
            vec!["Sample entry mp4a truncated: 162 declared bytes missing from stsd.".to_string()]
        );
    }

    #[test]
    fn test_sinf_found_at_any_size() {
        for size in 8..=120usize {
            let sinf = make_box("sinf", &vec![0u8; size - 8]);
            for (codec, kind) in [(b"enca", TrackKind::Audio), (b"encv", TrackKind::Video)] {
                let payload = stsd_payload(codec, &sinf);
                let (details, _) = inspect(&payload, kind);
                assert!(
                    details.encrypted && details.protection.is_some(),
                    "{:?} sinf of {} bytes not found",
                    kind,
                    size
                );
            }
        }
    }

    #[test]
    fn test_config_box_filling_visual_header_length() {
        let payload = stsd_payload(b"avc1", &make_box("avcC", &[0u8; 72]));
        let (details, _) = inspect(&payload, TrackKind::Video);
        assert_eq!(details.signal_box.as_deref(), Some("avcC"));

        let payload = stsd_payload(b"mp4a", &make_box("esds", &[0u8; 22]));
        let stsd = Mp4Box::leaf(*b"stsd", &payload);
        let entry = parse_stsd(&stsd).unwrap();
        assert!(nested_boxes(entry.data, AUDIO_SAMPLE_ENTRY_HEADER).contains(b"esds"));
    }

    #[test]
    fn test_codec_display_name() {
        assert_eq!(codec_display_name("avc1"), "H.264/AVC");
        assert_eq!(codec_display_name("ec-3"), "E-AC-3");
        assert_eq!(codec_display_name("zzzz"), "zzzz");
    }
}
