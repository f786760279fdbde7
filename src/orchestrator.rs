//! Turns a [`GenerationRequest`] into generated images.
//!
//! One invocation validates the request, fetches the clothing image once,
//! then calls the Generation API under a per-attempt deadline with a bounded
//! number of sequential attempts.

use std::sync::Arc;

use tokio::time::{sleep, timeout};
use uuid::Uuid;

use crate::{
    config::{Config, RetryConfig},
    error::{Result, TryOnError},
    fetch::{HttpImageFetcher, ImageFetcher},
    gemini::{GeminiClient, GenerationApi},
    logger::Stopwatch,
    models::{
        data_uri, EncodedImagePart, GenerateContentRequest, GenerateContentResponse,
        GenerationConfig, GenerationRequest, GenerationResult, ModelGender, Part,
    },
};

pub fn compose_prompt(gender: ModelGender, background: &str) -> String {
    format!(
        "Generate a fashion model image wearing the cloth:\n\
         - The clothing from the image\n\
         - A {} model\n\
         - Background: {}",
        gender, background
    )
}

/// Collects every inline image part, candidate by candidate, as a data URI.
pub fn parse_response(response: &GenerateContentResponse) -> Result<GenerationResult> {
    let candidates = response.candidates.as_ref().ok_or_else(|| {
        let reason = response
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref());
        match reason {
            Some(reason) => TryOnError::MalformedResponse(format!(
                "candidates array missing (prompt blocked: {})",
                reason
            )),
            None => TryOnError::MalformedResponse("candidates array missing".into()),
        }
    })?;

    let images = candidates
        .iter()
        .filter_map(|candidate| candidate.content.as_ref()?.parts.as_ref())
        .flatten()
        .filter_map(Part::inline_image)
        .map(|(mime_type, payload)| data_uri(mime_type, payload))
        .collect();

    Ok(GenerationResult { images })
}

enum AttemptState {
    Attempting { attempt: u32 },
    BackingOff { attempt: u32, last_error: TryOnError },
    Succeeded(GenerateContentResponse),
    Exhausted { attempts: u32, last_error: TryOnError },
}

#[derive(Clone)]
pub struct GenerationOrchestrator {
    api: Arc<dyn GenerationApi>,
    fetcher: Arc<dyn ImageFetcher>,
    retry: RetryConfig,
    generation_config: GenerationConfig,
}

impl GenerationOrchestrator {
    pub fn new(
        api: Arc<dyn GenerationApi>,
        fetcher: Arc<dyn ImageFetcher>,
        config: &Config,
    ) -> Self {
        Self {
            api,
            fetcher,
            retry: config.retry.clone(),
            generation_config: GenerationConfig::from(&config.generation),
        }
    }

    /// Wires the Gemini client and the HTTP fetcher from startup configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api = GeminiClient::new(config.gemini.clone())?;
        Ok(Self::new(
            Arc::new(api),
            Arc::new(HttpImageFetcher::default()),
            config,
        ))
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let (url, gender) = request.validate()?;
        let request_id = Uuid::new_v4().simple().to_string();
        let request_id = &request_id[..8];

        log::info!(
            "[req:{}] Generation requested: image={} gender={} background={}",
            request_id,
            url,
            gender,
            request.background_descriptor
        );

        let fetched = self.fetcher.fetch(&url).await?;
        if fetched.bytes.is_empty() {
            return Err(TryOnError::source_unavailable(url.as_str(), "empty body"));
        }
        let image = EncodedImagePart::encode(fetched.mime_type(), &fetched.bytes);

        let prompt = compose_prompt(gender, &request.background_descriptor);
        log::debug!("[req:{}] Prompt:\n{}", request_id, prompt);

        let payload = Arc::new(GenerateContentRequest::user_turn(
            prompt,
            &image,
            self.generation_config.clone(),
        ));
        let response = self.invoke_with_retry(&payload, request_id).await?;
        let result = parse_response(&response)?;

        if result.is_empty() {
            log::warn!("[req:{}] Model replied without any image", request_id);
        } else {
            log::info!("[req:{}] Generated {} image(s)", request_id, result.len());
        }
        Ok(result)
    }

    async fn invoke_with_retry(
        &self,
        payload: &Arc<GenerateContentRequest>,
        request_id: &str,
    ) -> Result<GenerateContentResponse> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut state = AttemptState::Attempting { attempt: 1 };

        loop {
            state = match state {
                AttemptState::Attempting { attempt } => {
                    log::debug!(
                        "[req:{}] Calling Generation API (attempt {}/{})",
                        request_id,
                        attempt,
                        max_attempts
                    );
                    match self.attempt_once(payload).await {
                        Ok(response) => AttemptState::Succeeded(response),
                        Err(error) if !error.is_retryable() => return Err(error),
                        Err(error) if attempt >= max_attempts => AttemptState::Exhausted {
                            attempts: attempt,
                            last_error: error,
                        },
                        Err(error) => AttemptState::BackingOff {
                            attempt,
                            last_error: error,
                        },
                    }
                }
                AttemptState::BackingOff {
                    attempt,
                    last_error,
                } => {
                    log::warn!(
                        "[req:{}] Attempt {} failed ({} left): {}",
                        request_id,
                        attempt,
                        max_attempts - attempt,
                        last_error
                    );
                    sleep(self.retry.backoff).await;
                    AttemptState::Attempting {
                        attempt: attempt + 1,
                    }
                }
                AttemptState::Succeeded(response) => return Ok(response),
                AttemptState::Exhausted {
                    attempts,
                    last_error,
                } => {
                    log::error!(
                        "[req:{}] All {} Generation API attempts failed: {}",
                        request_id,
                        attempts,
                        last_error
                    );
                    return Err(TryOnError::GenerationFailed {
                        attempts,
                        source: Box::new(last_error),
                    });
                }
            };
        }
    }

    /// Runs one call on its own task and races it against the deadline.
    /// A call that loses the race keeps running detached; its output has
    /// no path back to this invocation.
    async fn attempt_once(
        &self,
        payload: &Arc<GenerateContentRequest>,
    ) -> Result<GenerateContentResponse> {
        let api = Arc::clone(&self.api);
        let payload = Arc::clone(payload);
        let stopwatch = Stopwatch::start("Generation API call");
        let call = tokio::spawn(async move { api.generate_content(&payload).await });

        match timeout(self.retry.timeout, call).await {
            Ok(Ok(outcome)) => {
                if outcome.is_ok() {
                    stopwatch.finish(self.retry.slow_response_threshold);
                }
                outcome
            }
            Ok(Err(join_error)) => Err(TryOnError::TransportError(format!(
                "generation task aborted: {}",
                join_error
            ))),
            Err(_) => Err(TryOnError::Timeout(self.retry.timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Candidate, Content, PromptFeedback};

    #[test]
    fn test_prompt_embeds_inputs_verbatim() {
        let prompt = compose_prompt(ModelGender::Female, "Model walking on a \"sunny\" beach");
        assert_eq!(
            prompt,
            "Generate a fashion model image wearing the cloth:\n\
             - The clothing from the image\n\
             - A female model\n\
             - Background: Model walking on a \"sunny\" beach"
        );
    }

    #[test]
    fn test_parse_single_image() {
        let response = GenerateContentResponse::from_candidates(vec![Candidate::with_parts(
            vec![Part::inline("image/png", "Zm9v")],
        )]);
        let result = parse_response(&response).unwrap();
        assert_eq!(result.images, vec!["data:image/png;base64,Zm9v"]);
    }

    #[test]
    fn test_parse_preserves_candidate_then_part_order() {
        let response = GenerateContentResponse::from_candidates(vec![
            Candidate::with_parts(vec![
                Part::inline("image/png", "AA=="),
                Part::inline("image/png", "AQ=="),
            ]),
            Candidate::with_parts(vec![
                Part::inline("image/jpeg", "Ag=="),
                Part::inline("image/jpeg", "AA=="),
            ]),
        ]);
        let result = parse_response(&response).unwrap();
        assert_eq!(
            result.images,
            vec![
                "data:image/png;base64,AA==",
                "data:image/png;base64,AQ==",
                "data:image/jpeg;base64,Ag==",
                "data:image/jpeg;base64,AA==",
            ]
        );
    }

    #[test]
    fn test_parse_skips_text_and_empty_candidates() {
        let response = GenerateContentResponse::from_candidates(vec![
            Candidate::default(),
            Candidate {
                content: Some(Content {
                    role: None,
                    parts: None,
                }),
                finish_reason: None,
            },
            Candidate::with_parts(vec![
                Part::text("Here is your image"),
                Part::inline("image/png", "Zm9v"),
            ]),
        ]);
        let result = parse_response(&response).unwrap();
        assert_eq!(result.images, vec!["data:image/png;base64,Zm9v"]);
    }

    #[test]
    fn test_parse_empty_candidates_is_not_an_error() {
        let response = GenerateContentResponse::from_candidates(vec![Candidate::with_parts(
            vec![Part::text("no image today")],
        )]);
        assert!(parse_response(&response).unwrap().is_empty());
    }

    #[test]
    fn test_parse_missing_candidates_is_malformed() {
        let response = GenerateContentResponse::default();
        assert!(matches!(
            parse_response(&response),
            Err(TryOnError::MalformedResponse(_))
        ));

        let blocked = GenerateContentResponse {
            candidates: None,
            prompt_feedback: Some(PromptFeedback {
                block_reason: Some("SAFETY".into()),
            }),
        };
        match parse_response(&blocked) {
            Err(TryOnError::MalformedResponse(msg)) => assert!(msg.contains("SAFETY")),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
