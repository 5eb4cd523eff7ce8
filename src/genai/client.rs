// Generative Language API client with startup model resolution
// Author: kelexine (https://github.com/kelexine)

use super::models::{
    GenerateContentRequest, GenerateContentResponse, GenerateTextRequest, GenerateTextResponse,
    ListModelsResponse, ModelInfo, TextPrompt,
};
use super::{ApiKey, GenerationMethod, ModelRef};
use crate::assistant::AnswerGenerator;
use crate::config::ProviderConfig;
use crate::error::{ServiceError, Result};
use crate::utils::logging::sanitize;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client for the Google Generative Language API.
///
/// Handles:
/// - Model listing and selection (once, at startup)
/// - Text generation through `generateText` or `generateContent`
pub struct GenerativeClient {
    http_client: Client,
    config: ProviderConfig,
    api_key: ApiKey,
}

impl GenerativeClient {
    /// Create a new client with a pooled HTTP connection.
    pub fn new(config: &ProviderConfig, api_key: ApiKey) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .use_rustls_tls()
            .build()
            .map_err(|e| ServiceError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        debug!("Created HTTP client for {}", config.api_base_url);

        Ok(Self {
            http_client,
            config: config.clone(),
            api_key,
        })
    }

    /// Get the API base_url
    pub fn base_url(&self) -> &str {
        &self.config.api_base_url
    }

    /// Pick the first listed model advertising `method`.
    ///
    /// Walks every page of `GET /models` until a match is found. `Ok(None)`
    /// means the listing succeeded but nothing qualifies. Transient listing
    /// failures (429/5xx) are retried with backoff before giving up. A page
    /// token the upstream already handed out ends the walk.
    pub async fn resolve_model(&self) -> Result<Option<ModelRef>> {
        let method = self.config.generation_method;
        let mut page_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();

        loop {
            let page = self.list_models_page(page_token.as_deref()).await?;
            debug!("Listed {} models", page.models.len());

            if let Some(model) = select_model(&page.models, method) {
                info!("Selected model {} ({})", model, method);
                return Ok(Some(model));
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => {
                    if !seen_tokens.insert(token.clone()) {
                        warn!("Model listing repeated page token, stopping");
                        return Ok(None);
                    }
                    page_token = Some(token);
                }
                _ => return Ok(None),
            }
        }
    }

    async fn list_models_page(&self, page_token: Option<&str>) -> Result<ListModelsResponse> {
        let url = format!("{}/models", self.config.api_base_url);
        let mut query = vec![("pageSize", self.config.page_size.to_string())];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }

        let client = self.http_client.clone();
        let api_key = self.api_key.clone();

        crate::utils::retry::with_retry("List Models", self.config.max_retries, || async {
            let response = client
                .get(&url)
                .header(API_KEY_HEADER, api_key.expose())
                .query(&query)
                .send()
                .await
                .map_err(|e| (500, format!("HTTP error: {}", e)))?;

            let status = response.status();
            let response_text = response.text().await.unwrap_or_default();

            if !status.is_success() {
                return Err((status.as_u16(), response_text));
            }

            serde_json::from_str::<ListModelsResponse>(&response_text)
                .map_err(|e| (500, format!("Invalid response: {}", e)))
        })
        .await
        .map_err(|(status, body)| {
            let message = sanitize(&Self::extract_error_message(&body).unwrap_or(body));
            error!("Model listing failed: HTTP {} - {}", status, message);
            ServiceError::Provider(format!("Model listing failed (HTTP {}): {}", status, message))
        })
    }

    /// POST a JSON body to `{base}/{model}:{method}` and decode the reply.
    async fn post_model<B, R>(&self, model: &ModelRef, body: &B) -> Result<R>
    where
        B: serde::Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/{}:{}", self.config.api_base_url, model.name(), model.method());
        debug!("Calling {} for model {}", model.method(), model);

        let response = self
            .http_client
            .post(&url)
            .header(API_KEY_HEADER, self.api_key.expose())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            error!(
                "Generative API error: HTTP {} - Response body: {}",
                status,
                sanitize(&response_text)
            );
            // Upstream bodies can echo the key; errors may reach logs and clients
            let message = Self::extract_error_message(&response_text)
                .unwrap_or_else(|| format!("HTTP {}: {}", status, response_text));
            return Err(ServiceError::Provider(sanitize(&message)));
        }

        serde_json::from_str(&response_text).map_err(|e| {
            error!("Failed to parse generative API response: {}", e);
            ServiceError::Provider(format!("Response parsing error: {}", e))
        })
    }

    /// Extract error message from API response JSON
    fn extract_error_message(response_text: &str) -> Option<String> {
        #[derive(serde::Deserialize)]
        struct ErrorResponse {
            error: Option<ErrorDetail>,
        }

        #[derive(serde::Deserialize)]
        struct ErrorDetail {
            message: Option<String>,
            status: Option<String>,
        }

        if let Ok(error_resp) = serde_json::from_str::<ErrorResponse>(response_text) {
            if let Some(error) = error_resp.error {
                return error.message.or(error.status);
            }
        }
        None
    }
}

#[async_trait]
impl AnswerGenerator for GenerativeClient {
    async fn generate(
        &self,
        model: &ModelRef,
        prompt: &str,
        max_output_tokens: u32,
    ) -> Result<String> {
        let text = match model.method() {
            GenerationMethod::GenerateText => {
                let request = GenerateTextRequest {
                    prompt: TextPrompt {
                        text: prompt.to_string(),
                    },
                    max_output_tokens,
                };
                self.post_model::<_, GenerateTextResponse>(model, &request)
                    .await?
                    .into_text()
            }
            GenerationMethod::GenerateContent => {
                let request = GenerateContentRequest::from_prompt(prompt, max_output_tokens);
                self.post_model::<_, GenerateContentResponse>(model, &request)
                    .await?
                    .into_text()
            }
        };

        text.ok_or_else(|| ServiceError::Provider("Model returned no text".to_string()))
    }
}

/// First model in listing order that advertises `method`.
pub fn select_model(models: &[ModelInfo], method: GenerationMethod) -> Option<ModelRef> {
    models
        .iter()
        .find(|m| m.supports(method.as_str()))
        .map(|m| ModelRef::new(m.name.clone(), method))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(name: &str, methods: &[&str]) -> ModelInfo {
        ModelInfo {
            name: name.to_string(),
            display_name: None,
            supported_generation_methods: methods.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn test_select_first_supporting_model() {
        let models = vec![
            model("models/chat-bison-001", &["generateMessage"]),
            model("models/text-bison-001", &["generateText"]),
            model("models/text-bison-002", &["generateText"]),
        ];

        let selected = select_model(&models, GenerationMethod::GenerateText).unwrap();
        assert_eq!(selected.name(), "models/text-bison-001");
        assert_eq!(selected.method(), GenerationMethod::GenerateText);

        assert!(select_model(&models, GenerationMethod::GenerateContent).is_none());
    }

    #[test]
    fn test_extract_error_message() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(
            GenerativeClient::extract_error_message(body).as_deref(),
            Some("API key not valid.")
        );
        assert!(GenerativeClient::extract_error_message("not json").is_none());
    }
}
