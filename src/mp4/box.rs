use crate::bits::reader::ByteCursor;
use crate::errors::BoxError;
use serde::{Serialize, Serializer};
use std::fmt;

/// Size of a plain box header (32-bit size + type)
pub const BOX_HEADER_SIZE: usize = 8;
/// Size of a box header using the 64-bit largesize extension
pub const LARGE_BOX_HEADER_SIZE: usize = 16;
/// Nesting limit for container recursion
pub const MAX_BOX_DEPTH: usize = 32;

/// Box types whose content is a sequence of child boxes
pub const CONTAINER_TYPES: [FourCC; 9] = [
    FourCC::new(*b"moov"),
    FourCC::new(*b"trak"),
    FourCC::new(*b"mdia"),
    FourCC::new(*b"minf"),
    FourCC::new(*b"stbl"),
    FourCC::new(*b"moof"),
    FourCC::new(*b"traf"),
    FourCC::new(*b"mfra"),
    FourCC::new(*b"udta"),
];

/// Four character box or codec code
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCC([u8; 4]);

impl FourCC {
    pub const fn new(bytes: [u8; 4]) -> Self {
        FourCC(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Text form; codes read through `ByteCursor` are always ASCII.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("????")
    }

    pub fn is_container(&self) -> bool {
        CONTAINER_TYPES.contains(self)
    }
}

impl PartialEq<[u8; 4]> for FourCC {
    fn eq(&self, other: &[u8; 4]) -> bool {
        &self.0 == other
    }
}

impl From<[u8; 4]> for FourCC {
    fn from(bytes: [u8; 4]) -> Self {
        FourCC(bytes)
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCC({})", self.as_str())
    }
}

impl Serialize for FourCC {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A decoded box. Containers own their children; leaves borrow their payload
/// from the parsed buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Mp4Box<'a> {
    pub box_type: FourCC,
    /// Total size including the header, as declared or resolved
    pub size: u64,
    /// Offset of the box header in the parsed buffer
    pub offset: u64,
    pub children: Vec<Mp4Box<'a>>,
    pub payload: Option<&'a [u8]>,
}

impl<'a> Mp4Box<'a> {
    /// Build a leaf box around an existing payload.
    pub fn leaf(box_type: [u8; 4], payload: &'a [u8]) -> Self {
        Mp4Box {
            box_type: FourCC::new(box_type),
            size: (payload.len() + BOX_HEADER_SIZE) as u64,
            offset: 0,
            children: Vec::new(),
            payload: Some(payload),
        }
    }

    /// Build a container box; its size is the sum of its children plus a header.
    pub fn container(box_type: [u8; 4], children: Vec<Mp4Box<'a>>) -> Self {
        let size = children.iter().map(|c| c.size).sum::<u64>() + BOX_HEADER_SIZE as u64;
        Mp4Box {
            box_type: FourCC::new(box_type),
            size,
            offset: 0,
            children,
            payload: None,
        }
    }

    /// First direct child of the given type.
    pub fn find_child(&self, box_type: &[u8; 4]) -> Option<&Mp4Box<'a>> {
        self.children.iter().find(|c| c.box_type == *box_type)
    }

    /// Direct children of the given type in document order.
    pub fn children_of_type<'s>(
        &'s self,
        box_type: &'s [u8; 4],
    ) -> impl Iterator<Item = &'s Mp4Box<'a>> + 's {
        self.children.iter().filter(move |c| c.box_type == *box_type)
    }

    /// Follow a path of direct children, e.g. `[b"mdia", b"minf", b"stbl"]`.
    pub fn find_path(&self, path: &[&[u8; 4]]) -> Option<&Mp4Box<'a>> {
        let mut current = self;
        for box_type in path {
            current = current.find_child(box_type)?;
        }
        Some(current)
    }

    pub fn summarize(&self) -> BoxSummary {
        BoxSummary {
            box_type: self.box_type,
            size: self.size,
            offset: self.offset,
            children: self.children.iter().map(Mp4Box::summarize).collect(),
        }
    }
}

/// Payload-free view of a box tree, for debugging output only
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    #[serde(rename = "type")]
    pub box_type: FourCC,
    pub size: u64,
    pub offset: u64,
    pub children: Vec<BoxSummary>,
}

/// Top-level boxes of a buffer plus everything that went wrong reading them
#[derive(Debug, Clone, Default)]
pub struct BoxParseResult<'a> {
    pub boxes: Vec<Mp4Box<'a>>,
    pub issues: Vec<String>,
}

/// Parse the box tree of a whole buffer.
///
/// A failing box stops the scan but keeps every top-level box read before it;
/// the failure is reported in `issues`.
pub fn parse_boxes(data: &[u8]) -> BoxParseResult<'_> {
    let mut cursor = ByteCursor::new(data);
    let mut result = BoxParseResult::default();

    while cursor.bytes_remaining() >= BOX_HEADER_SIZE {
        let start = cursor.position();
        match read_box(&mut cursor, data.len(), 0) {
            Ok(mp4_box) => result.boxes.push(mp4_box),
            Err(e) => {
                log::debug!("box parse stopped at offset {}: {}", start, e);
                result
                    .issues
                    .push(format!("Error while parsing atom at offset {}: {}", start, e));
                return result;
            }
        }
    }

    let trailing = cursor.bytes_remaining();
    if trailing > 0 {
        result.issues.push(format!(
            "{} trailing bytes after last atom ignored (truncated header?)",
            trailing
        ));
    }
    result
}

fn read_box<'a>(
    cursor: &mut ByteCursor<'a>,
    end: usize,
    depth: usize,
) -> Result<Mp4Box<'a>, BoxError> {
    let start = cursor.position();
    if end - start < BOX_HEADER_SIZE {
        return Err(BoxError::OutOfData {
            needed: BOX_HEADER_SIZE,
            remaining: end - start,
        });
    }

    let size32 = cursor.read_u32_be()?;
    let box_type = cursor.read_fourcc()?;

    let mut header_size = BOX_HEADER_SIZE;
    let size = match size32 {
        1 => {
            if end - start < LARGE_BOX_HEADER_SIZE {
                return Err(BoxError::OutOfData {
                    needed: LARGE_BOX_HEADER_SIZE,
                    remaining: end - start,
                });
            }
            header_size = LARGE_BOX_HEADER_SIZE;
            cursor.read_u64_be()?
        }
        // Extends to the end of the enclosing container, so it is the last box there.
        0 => (end - start) as u64,
        n => n as u64,
    };

    let content_size = size.saturating_sub(header_size as u64);
    let available = end - cursor.position();
    if content_size > available as u64 {
        return Err(BoxError::InvalidSize {
            message: format!(
                "Atom {} size {} exceeds available data ({} bytes)",
                box_type,
                size,
                available + header_size
            ),
        });
    }
    let content_size = content_size as usize;

    let mut children = Vec::new();
    let mut payload = None;
    if box_type.is_container() {
        if depth >= MAX_BOX_DEPTH {
            return Err(BoxError::InvalidSize {
                message: format!("Atom {} nested deeper than {} levels", box_type, MAX_BOX_DEPTH),
            });
        }
        let container_end = cursor.position() + content_size;
        while cursor.position() < container_end {
            children.push(read_box(cursor, container_end, depth + 1)?);
        }
    } else {
        payload = Some(cursor.take(content_size)?);
    }

    Ok(Mp4Box {
        box_type,
        size,
        offset: start as u64,
        children,
        payload,
    })
}

/// A box found by a flat scan of nested bytes (sample entries, `sinf`)
#[derive(Debug, Clone, PartialEq)]
pub struct NestedBox<'a> {
    pub box_type: FourCC,
    pub payload: &'a [u8],
}

/// Result of a flat, size-aware scan over a run of sibling boxes
#[derive(Debug, Clone, Default)]
pub struct NestedBoxes<'a> {
    pub boxes: Vec<NestedBox<'a>>,
    /// Why the scan stopped early, if it did
    pub error: Option<BoxError>,
}

impl NestedBoxes<'_> {
    pub fn is_well_formed(&self) -> bool {
        self.error.is_none()
    }

    pub fn contains(&self, box_type: &[u8; 4]) -> bool {
        self.boxes.iter().any(|b| b.box_type == *box_type)
    }

    pub fn find(&self, box_type: &[u8; 4]) -> Option<&NestedBox<'_>> {
        self.boxes.iter().find(|b| b.box_type == *box_type)
    }
}

/// Walk sibling boxes in `data` without descending into them, advancing by each
/// declared size. Declared sizes below the header length are rejected; up to 7
/// trailing zero bytes (QuickTime terminators) are accepted.
pub fn scan_nested_boxes(data: &[u8]) -> NestedBoxes<'_> {
    let mut cursor = ByteCursor::new(data);
    let mut scan = NestedBoxes::default();

    while cursor.bytes_remaining() >= BOX_HEADER_SIZE {
        match read_nested_box(&mut cursor) {
            Ok(nested) => scan.boxes.push(nested),
            Err(e) => {
                scan.error = Some(e);
                return scan;
            }
        }
    }

    let rest = &data[cursor.position()..];
    if rest.iter().any(|b| *b != 0) {
        scan.error = Some(BoxError::InvalidSize {
            message: format!("{} stray bytes after last nested atom", rest.len()),
        });
    }
    scan
}

fn read_nested_box<'a>(cursor: &mut ByteCursor<'a>) -> Result<NestedBox<'a>, BoxError> {
    let size32 = cursor.read_u32_be()?;
    let box_type = cursor.read_fourcc()?;
    let (size, header_size) = if size32 == 1 {
        (cursor.read_u64_be()?, LARGE_BOX_HEADER_SIZE as u64)
    } else {
        (size32 as u64, BOX_HEADER_SIZE as u64)
    };
    if size < header_size || size - header_size > cursor.bytes_remaining() as u64 {
        return Err(BoxError::InvalidSize {
            message: format!(
                "Nested atom {} size {} does not fit {} remaining bytes",
                box_type,
                size,
                cursor.bytes_remaining()
            ),
        });
    }
    let payload = cursor.take((size - header_size) as usize)?;
    Ok(NestedBox { box_type, payload })
}

/// Write a box header to a vector
pub fn write_box_header(output: &mut Vec<u8>, name: &str, size: u32) {
    output.extend_from_slice(&size.to_be_bytes());
    output.extend_from_slice(name.as_bytes());
}
