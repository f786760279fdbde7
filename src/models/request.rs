use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TryOnError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelGender {
    Male,
    Female,
}

impl ModelGender {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelGender::Male => "male",
            ModelGender::Female => "female",
        }
    }
}

impl fmt::Display for ModelGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelGender {
    type Err = TryOnError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(ModelGender::Male),
            "female" => Ok(ModelGender::Female),
            other => Err(TryOnError::InvalidInput(format!(
                "model gender must be 'male' or 'female', got '{}'",
                other
            ))),
        }
    }
}

/// What the caller asks for: one clothing image, one model, one background.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub clothing_image_uri: String,
    pub model_gender: Option<ModelGender>,
    pub background_descriptor: String,
}

impl GenerationRequest {
    pub fn new(
        clothing_image_uri: impl Into<String>,
        model_gender: ModelGender,
        background_descriptor: impl Into<String>,
    ) -> Self {
        Self {
            clothing_image_uri: clothing_image_uri.into(),
            model_gender: Some(model_gender),
            background_descriptor: background_descriptor.into(),
        }
    }

    /// Checks every field and returns the parsed image URL and gender.
    pub fn validate(&self) -> Result<(Url, ModelGender)> {
        let uri = self.clothing_image_uri.trim();
        if uri.is_empty() {
            return Err(TryOnError::InvalidInput(
                "clothing image URI is required".into(),
            ));
        }
        let gender = self
            .model_gender
            .ok_or_else(|| TryOnError::InvalidInput("model gender is required".into()))?;
        if self.background_descriptor.trim().is_empty() {
            return Err(TryOnError::InvalidInput(
                "background descriptor is required".into(),
            ));
        }

        let url = Url::parse(uri).map_err(|e| {
            TryOnError::InvalidInput(format!("clothing image URI '{}' is not a URL: {}", uri, e))
        })?;
        match url.scheme() {
            "http" | "https" => Ok((url, gender)),
            scheme => Err(TryOnError::InvalidInput(format!(
                "clothing image URI must be http(s), got '{}'",
                scheme
            ))),
        }
    }
}

/// Image bytes prepared for inline transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImagePart {
    pub mime_type: String,
    pub base64_payload: String,
}

impl EncodedImagePart {
    pub fn encode(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            base64_payload: STANDARD.encode(bytes),
        }
    }
}
