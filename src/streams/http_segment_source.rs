use super::segment_source::{ByteRange, SegmentSource};
use crate::errors::{CmafParserError, CmafParserResult, SourceError};
use async_trait::async_trait;
use log::info;
use reqwest::{header::RANGE, Client, StatusCode};
use std::time::Duration;

/// Segment fetched over HTTP(S) with a single GET, optionally limited to a byte range
#[derive(Debug, Clone)]
pub struct HttpSegmentSource {
    url: String,
    client: Client,
    range: Option<ByteRange>,
}

impl HttpSegmentSource {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(url: impl Into<String>) -> CmafParserResult<Self> {
        let client = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SourceError::new(e.to_string()))?;
        Ok(Self::with_client(url, client))
    }

    /// Share one connection pool between many segments.
    pub fn with_client(url: impl Into<String>, client: Client) -> Self {
        Self {
            url: url.into(),
            client,
            range: None,
        }
    }

    pub fn with_range(mut self, range: ByteRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SegmentSource for HttpSegmentSource {
    async fn fetch(&self) -> CmafParserResult<Vec<u8>> {
        let mut request = self.client.get(&self.url);
        if let Some(range_header) = self.range.and_then(|r| r.http_header()) {
            request = request.header(RANGE, range_header);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SourceError::new(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CmafParserError::Source(SourceError::new(format!(
                "HTTP error: {}",
                status
            ))));
        }
        if let Some(range) = self.range {
            if range.length > 0 && status != StatusCode::PARTIAL_CONTENT {
                info!(
                    "{} ignored Range header (status {}); slicing locally",
                    self.url, status
                );
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::new(e.to_string()))?;

        let data = match self.range {
            // A server that ignores Range sends the whole resource
            Some(range) if status == StatusCode::OK && range.length > 0 => {
                let start = range.offset as usize;
                let end = start.saturating_add(range.length as usize);
                if end > bytes.len() {
                    return Err(CmafParserError::Source(SourceError::new(format!(
                        "Short read: expected {} bytes at offset {}, resource has {}",
                        range.length,
                        range.offset,
                        bytes.len()
                    ))));
                }
                bytes[start..end].to_vec()
            }
            _ => bytes.to_vec(),
        };

        info!("📥 Fetched {} bytes from {}", data.len(), self.url);
        Ok(data)
    }

    fn describe(&self) -> String {
        match self.range {
            Some(range) => format!("{} @{}+{}", self.url, range.offset, range.length),
            None => self.url.clone(),
        }
    }
}
