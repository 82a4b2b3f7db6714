use super::HttpSegmentSource;
use crate::errors::{CmafParserResult, SourceError};
use async_trait::async_trait;
use std::io::SeekFrom;
use std::path::PathBuf;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// Byte range inside a larger resource (`EXT-X-BYTERANGE`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub offset: u64,
    pub length: u64,
}

impl ByteRange {
    pub fn new(offset: u64, length: u64) -> Self {
        Self { offset, length }
    }

    /// Value for an HTTP `Range` header, `None` for an empty range
    pub fn http_header(&self) -> Option<String> {
        if self.length == 0 {
            return None;
        }
        Some(format!(
            "bytes={}-{}",
            self.offset,
            self.offset + self.length - 1
        ))
    }
}

/// Something that can produce the bytes of one segment
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SegmentSource: Send + Sync {
    /// Load the whole segment into memory.
    async fn fetch(&self) -> CmafParserResult<Vec<u8>>;

    /// Short human-readable name used in issues and logs.
    fn describe(&self) -> String;
}

#[async_trait]
impl<T: SegmentSource + ?Sized> SegmentSource for Box<T> {
    async fn fetch(&self) -> CmafParserResult<Vec<u8>> {
        (**self).fetch().await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Segment bytes that are already loaded
#[derive(Debug, Clone)]
pub struct MemorySegmentSource {
    name: String,
    data: Vec<u8>,
}

impl MemorySegmentSource {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

#[async_trait]
impl SegmentSource for MemorySegmentSource {
    async fn fetch(&self) -> CmafParserResult<Vec<u8>> {
        Ok(self.data.clone())
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

/// Segment stored in a local file, optionally a sub-range of it
#[derive(Debug, Clone)]
pub struct LocalSegmentSource {
    path: PathBuf,
    range: Option<ByteRange>,
}

impl LocalSegmentSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            range: None,
        }
    }

    pub fn with_range(mut self, range: ByteRange) -> Self {
        self.range = Some(range);
        self
    }
}

#[async_trait]
impl SegmentSource for LocalSegmentSource {
    async fn fetch(&self) -> CmafParserResult<Vec<u8>> {
        let mut file = tokio::fs::File::open(&self.path).await?;
        match self.range {
            None => {
                let mut data = Vec::new();
                file.read_to_end(&mut data).await?;
                Ok(data)
            }
            Some(range) => {
                file.seek(SeekFrom::Start(range.offset)).await?;
                let mut data = Vec::new();
                file.take(range.length).read_to_end(&mut data).await?;
                if (data.len() as u64) < range.length {
                    return Err(SourceError::new(format!(
                        "Short read: expected {} bytes at offset {}, got {}",
                        range.length,
                        range.offset,
                        data.len()
                    ))
                    .into());
                }
                Ok(data)
            }
        }
    }

    fn describe(&self) -> String {
        match self.range {
            Some(range) => format!(
                "{} @{}+{}",
                self.path.display(),
                range.offset,
                range.length
            ),
            None => self.path.display().to_string(),
        }
    }
}

/// Pick an HTTP source for `http://`/`https://` URIs and a local file source otherwise.
pub fn segment_source_for(
    uri: &str,
    range: Option<ByteRange>,
) -> CmafParserResult<Box<dyn SegmentSource>> {
    if uri.starts_with("http://") || uri.starts_with("https://") {
        let mut source = HttpSegmentSource::new(uri)?;
        if let Some(range) = range {
            source = source.with_range(range);
        }
        Ok(Box::new(source))
    } else {
        let mut source = LocalSegmentSource::new(uri);
        if let Some(range) = range {
            source = source.with_range(range);
        }
        Ok(Box::new(source))
    }
}
