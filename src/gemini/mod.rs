pub mod image_client;

use async_trait::async_trait;

use crate::{
    error::Result,
    models::{GenerateContentRequest, GenerateContentResponse},
};

pub use image_client::GeminiClient;

/// A hosted multimodal model that answers with candidates made of parts.
///
/// Implementations report connection problems as `TransportError` and
/// undecodable replies as `MalformedResponse`; deadlines are enforced by the
/// caller.
#[async_trait]
pub trait GenerationApi: Send + Sync {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse>;
}
