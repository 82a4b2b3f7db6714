use crate::bits::reader::ByteCursor;
use crate::mp4::r#box::scan_nested_boxes;

/// Protection scheme details from a `sinf` box
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtectionInfo {
    /// Codec of the clear content (`frma`)
    pub original_format: Option<String>,
    /// Scheme type (`schm`), e.g. `cenc` or `cbcs`
    pub scheme_type: Option<String>,
}

/// Decode frma and schm from a sinf payload. Problems become issues.
pub fn parse_sinf(payload: &[u8], issues: &mut Vec<String>) -> ProtectionInfo {
    let mut info = ProtectionInfo::default();
    let children = scan_nested_boxes(payload);
    if let Some(e) = &children.error {
        issues.push(format!("sinf atom scan stopped: {}", e));
    }

    if let Some(frma) = children.find(b"frma") {
        match ByteCursor::new(frma.payload).read_fourcc() {
            Ok(format) => info.original_format = Some(format.to_string()),
            Err(e) => issues.push(format!("frma atom unreadable: {}", e)),
        }
    }

    if let Some(schm) = children.find(b"schm") {
        let mut cursor = ByteCursor::new(schm.payload);
        // version (1) + flags (3)
        match cursor.skip(4).and_then(|_| cursor.read_fourcc()) {
            Ok(scheme) => info.scheme_type = Some(scheme.to_string()),
            Err(e) => issues.push(format!("schm atom unreadable: {}", e)),
        }
    }

    info
}
