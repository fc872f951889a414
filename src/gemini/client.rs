use std::time::Duration;

use reqwest::{Client, Response};
use tracing::debug;

use super::error::GeminiError;
use super::types::{ErrorEnvelope, GenerateContentResponse, GenerationRequest, ModelInfo, ModelList};

const API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const MODEL_PAGE_SIZE: u32 = 1000;

/// Anything that can turn a [`GenerationRequest`] into generated text.
///
/// The retry wrapper and the pipeline are written against this trait so they
/// can be driven by a scripted fake in tests.
pub trait ContentGenerator {
    async fn generate(&self, req: &GenerationRequest) -> Result<String, GeminiError>;
}

impl<T: ContentGenerator> ContentGenerator for &T {
    async fn generate(&self, req: &GenerationRequest) -> Result<String, GeminiError> {
        (**self).generate(req).await
    }
}

pub struct GeminiClient {
    api_key: String,
    client: Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Result<Self, GeminiError> {
        Self::with_base_url(api_key, API_URL.to_string())
    }

    /// Create a client pointing at a custom base URL (useful for testing).
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, GeminiError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self {
            api_key,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn generate_content(
        &self,
        req: &GenerationRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, req.model());
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&req.to_body())
            .send()
            .await?;

        let response = check_status(response).await?;
        let body = response.json::<GenerateContentResponse>().await?;
        if let Some(usage) = &body.usage_metadata {
            debug!(
                model = req.model(),
                prompt_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                "generateContent succeeded"
            );
        }
        Ok(body)
    }

    /// Lists every model the key can see, following `nextPageToken`.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, GeminiError> {
        let url = format!("{}/models", self.base_url);
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .header("x-goog-api-key", &self.api_key)
                .query(&[("pageSize", MODEL_PAGE_SIZE.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = check_status(request.send().await?).await?;
            let page = response.json::<ModelList>().await?;
            models.extend(page.models);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(models)
    }
}

impl ContentGenerator for GeminiClient {
    async fn generate(&self, req: &GenerationRequest) -> Result<String, GeminiError> {
        let response = self.generate_content(req).await?;
        response.text().ok_or_else(|| GeminiError::EmptyResponse {
            finish_reason: response.finish_reason().map(str::to_string),
        })
    }
}

async fn check_status(response: Response) -> Result<Response, GeminiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    Err(GeminiError::from_status(status.as_u16(), message))
}
