use std::error::Error;
use std::fmt;
use std::io;

use crate::mp4::FourCC;

/// Enumeration of all possible errors that can occur in the segment parser
#[derive(Debug)]
pub enum CmafParserError {
    Box(BoxError),
    Mp4(Mp4Error),
    Source(SourceError),
    Other(io::Error),
}

/// Failures of the byte cursor and the box tree parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoxError {
    /// A read needed more bytes than remain in the buffer
    OutOfData { needed: usize, remaining: usize },
    /// The four bytes of a box type are not ASCII
    InvalidAtomType { bytes: [u8; 4] },
    /// The declared size of a box does not fit its container
    InvalidSize { message: String },
}

/// Decoder-level problems inside a single box payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mp4Error {
    /// A box that should carry a payload has none (container or synthetic box)
    MissingPayload { box_type: FourCC },
    /// A payload is shorter than the field layout requires
    TooSmall {
        box_type: FourCC,
        needed: usize,
        actual: usize,
    },
    /// Generic MP4 error with a descriptive message
    Error { message: String },
}

impl Mp4Error {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Mp4Error::Error {
            message: message.into(),
        }
    }
}

/// Byte source errors (file, HTTP)
#[derive(Debug)]
pub struct SourceError {
    pub message: String,
}

impl SourceError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CmafParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CmafParserError::Other(err) => write!(f, "I/O error: {}", err),
            CmafParserError::Box(err) => write!(f, "Box error: {}", err),
            CmafParserError::Mp4(err) => write!(f, "MP4 error: {}", err),
            CmafParserError::Source(err) => write!(f, "Source error: {}", err),
        }
    }
}

impl fmt::Display for BoxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoxError::OutOfData { needed, remaining } => write!(
                f,
                "out of data: needed {} bytes, {} remaining",
                needed, remaining
            ),
            BoxError::InvalidAtomType { bytes } => {
                write!(f, "invalid atom type {:02X?}", bytes)
            }
            BoxError::InvalidSize { message } => write!(f, "invalid size: {}", message),
        }
    }
}

impl fmt::Display for Mp4Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mp4Error::MissingPayload { box_type } => {
                write!(f, "{} atom missing payload", box_type)
            }
            Mp4Error::TooSmall {
                box_type,
                needed,
                actual,
            } => write!(
                f,
                "{} atom too small: expected at least {} bytes, got {}",
                box_type, needed, actual
            ),
            Mp4Error::Error { message } => write!(f, "{}", message),
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CmafParserError {}
impl Error for BoxError {}
impl Error for Mp4Error {}
impl Error for SourceError {}

// Conversion implementations
impl From<io::Error> for CmafParserError {
    fn from(err: io::Error) -> Self {
        CmafParserError::Other(err)
    }
}

impl From<BoxError> for CmafParserError {
    fn from(err: BoxError) -> Self {
        CmafParserError::Box(err)
    }
}

impl From<Mp4Error> for CmafParserError {
    fn from(err: Mp4Error) -> Self {
        CmafParserError::Mp4(err)
    }
}

impl From<SourceError> for CmafParserError {
    fn from(err: SourceError) -> Self {
        CmafParserError::Source(err)
    }
}

impl From<BoxError> for Mp4Error {
    fn from(err: BoxError) -> Self {
        Mp4Error::Error {
            message: err.to_string(),
        }
    }
}

// Conversion to io::Error for callers living in io::Result code
impl From<CmafParserError> for io::Error {
    fn from(err: CmafParserError) -> Self {
        io::Error::other(err)
    }
}

impl From<SourceError> for io::Error {
    fn from(err: SourceError) -> Self {
        io::Error::other(err)
    }
}

// Type alias for Result with CmafParserError
pub type CmafParserResult<T> = Result<T, CmafParserError>;
