use async_trait::async_trait;
use reqwest::Client;

use crate::{
    config::GeminiConfig,
    error::{Result, TryOnError},
    gemini::GenerationApi,
    models::{GenerateContentRequest, GenerateContentResponse},
};

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| TryOnError::ConfigError("Gemini API key is required".into()))?;
        if config.model.trim().is_empty() {
            return Err(TryOnError::ConfigError("Gemini model name is required".into()));
        }

        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );

        Ok(Self {
            client,
            api_key,
            endpoint,
            model: config.model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GenerationApi for GeminiClient {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        log::info!("Generating image with model: {}", self.model);

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| TryOnError::TransportError(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TryOnError::TransportError(format!("Gemini body read failed: {}", e)))?;

        if !status.is_success() {
            log::error!("Gemini returned {}: {}", status, body);
            return Err(TryOnError::TransportError(format!(
                "Gemini returned {}: {}",
                status, body
            )));
        }

        serde_json::from_str(&body).map_err(|e| TryOnError::MalformedResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_api_key() {
        let result = GeminiClient::new(GeminiConfig::new());
        assert!(matches!(result, Err(TryOnError::ConfigError(_))));

        let result = GeminiClient::new(GeminiConfig::new().with_api_key("   "));
        assert!(matches!(result, Err(TryOnError::ConfigError(_))));
    }

    #[test]
    fn test_endpoint_layout() {
        let client = GeminiClient::new(
            GeminiConfig::new()
                .with_api_key("key")
                .with_base_url("http://localhost:8080/")
                .with_model("gemini-test"),
        )
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:8080/v1beta/models/gemini-test:generateContent"
        );
        assert_eq!(client.model(), "gemini-test");
    }
}
