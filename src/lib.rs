pub mod config;
pub mod error;
pub mod fetch;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod orchestrator;

pub use config::{Config, GeminiConfig, GenerationSettings, RetryConfig};
pub use error::{Result, TryOnError};
pub use fetch::{FetchedImage, HttpImageFetcher, ImageFetcher};
pub use gemini::{GeminiClient, GenerationApi};
pub use models::{
    EncodedImagePart, GenerateContentRequest, GenerateContentResponse, GenerationRequest,
    GenerationResult, ModelGender,
};
pub use orchestrator::GenerationOrchestrator;
