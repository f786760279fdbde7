use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TryOnError};

/// Generated images as self-contained URIs, in the order the API produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub images: Vec<String>,
}

impl GenerationResult {
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }
}

pub fn data_uri(mime_type: &str, base64_payload: &str) -> String {
    format!("data:{};base64,{}", mime_type, base64_payload)
}

/// Splits a `data:<mime>;base64,<payload>` URI into its MIME type and raw bytes.
pub fn decode_data_uri(uri: &str) -> Result<(String, Vec<u8>)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| TryOnError::SerializationError("not a data URI".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| TryOnError::SerializationError("data URI has no payload".into()))?;
    let mime_type = header.strip_suffix(";base64").ok_or_else(|| {
        TryOnError::SerializationError("only base64 data URIs are supported".into())
    })?;
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| TryOnError::SerializationError(e.to_string()))?;

    Ok((mime_type.to_string(), bytes))
}

pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_format() {
        assert_eq!(data_uri("image/png", "Zm9v"), "data:image/png;base64,Zm9v");
    }

    #[test]
    fn test_decode_data_uri() {
        let (mime, bytes) = decode_data_uri("data:image/jpeg;base64,Zm9v").unwrap();
        assert_eq!(mime, "image/jpeg");
        assert_eq!(bytes, b"foo");
    }

    #[test]
    fn test_decode_rejects_other_uris() {
        assert!(decode_data_uri("https://example.com/a.png").is_err());
        assert!(decode_data_uri("data:image/png,rawtext").is_err());
        assert!(decode_data_uri("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn test_extensions() {
        assert_eq!(extension_for_mime("image/png"), "png");
        assert_eq!(extension_for_mime("image/jpeg"), "jpg");
        assert_eq!(extension_for_mime("application/octet-stream"), "bin");
    }
}
