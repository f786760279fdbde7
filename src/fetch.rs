use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, Url};

use crate::error::{Result, TryOnError};

const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl FetchedImage {
    /// Declared content type, else a guess from the leading bytes.
    pub fn mime_type(&self) -> String {
        self.content_type
            .as_deref()
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
            .filter(|ct| !ct.is_empty())
            .or_else(|| sniff_mime(&self.bytes).map(String::from))
            .unwrap_or_else(|| FALLBACK_MIME.to_string())
    }
}

pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

/// Source of the clothing image. Any failure is reported as
/// [`TryOnError::SourceImageUnavailable`].
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedImage>;
}

#[derive(Clone, Default)]
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedImage> {
        let uri = url.as_str();
        log::debug!("Fetching clothing image: {}", uri);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| TryOnError::source_unavailable(uri, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TryOnError::source_unavailable(
                uri,
                format!("HTTP status {}", status),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(String::from);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TryOnError::source_unavailable(uri, e.to_string()))?;
        if bytes.is_empty() {
            return Err(TryOnError::source_unavailable(uri, "empty body"));
        }

        log::debug!("Fetched {} bytes ({:?})", bytes.len(), content_type);
        Ok(FetchedImage {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];

    #[test]
    fn test_declared_content_type_wins() {
        let image = FetchedImage {
            bytes: PNG_HEADER.to_vec(),
            content_type: Some("Image/JPEG; charset=binary".into()),
        };
        assert_eq!(image.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_sniffing_when_undeclared() {
        let png = FetchedImage {
            bytes: PNG_HEADER.to_vec(),
            content_type: None,
        };
        assert_eq!(png.mime_type(), "image/png");

        let webp = FetchedImage {
            bytes: b"RIFF\x00\x00\x00\x00WEBPVP8 ".to_vec(),
            content_type: Some(String::new()),
        };
        assert_eq!(webp.mime_type(), "image/webp");

        let unknown = FetchedImage {
            bytes: b"hello".to_vec(),
            content_type: None,
        };
        assert_eq!(unknown.mime_type(), FALLBACK_MIME);
    }

    #[test]
    fn test_sniff_jpeg_and_gif() {
        assert_eq!(sniff_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), Some("image/jpeg"));
        assert_eq!(sniff_mime(b"GIF89a..."), Some("image/gif"));
        assert_eq!(sniff_mime(b""), None);
    }
}
