//! Text and image generation services.
//!
//! The pipeline only talks to [`TextGenerator`] and [`ImageGenerator`];
//! [`OpenAiClient`] implements both against an OpenAI-compatible HTTP API.
//! Docs: https://platform.openai.com/docs/api-reference

use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::ComicError;

/// Who a chat message comes from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions framing the whole exchange.
    System,
    /// The request itself.
    User,
}

/// One role-tagged chat message.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ChatMessage {
    /// Sender role.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// A system-role message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// A user-role message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Optional output constraint for chat completions.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Force the reply to be a single valid JSON object.
    JsonObject,
}

/// Request body for POST /chat/completions
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ChatRequest {
    /// Model identifier.
    pub model: String,
    /// Conversation, oldest first.
    pub messages: Vec<ChatMessage>,
    /// Structured response mode, when asked for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

impl ChatRequest {
    /// A plain request with no response format.
    pub fn new(model: &str, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.to_string(),
            messages,
            response_format: None,
        }
    }

    /// The same request asking for structured JSON output.
    pub fn json_object(mut self) -> Self {
        self.response_format = Some(ResponseFormat::JsonObject);
        self
    }
}

/// Request body for POST /images/generations
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ImageRequest<'a> {
    /// Image model identifier.
    pub model: &'a str,
    /// What to draw.
    pub prompt: &'a str,
    /// How many images to produce.
    pub n: u8,
    /// Resolution such as `1024x1024`.
    pub size: &'a str,
}

/// Something that turns chat messages into text.
#[async_trait]
pub trait TextGenerator: Send + Sync + Debug {
    /// Returns the generated text of the first choice.
    ///
    /// When `request.response_format` is set and the service refuses that
    /// option, this returns [`ComicError::UnsupportedResponseFormat`].
    async fn complete(&self, request: &ChatRequest) -> Result<String, ComicError>;
}

/// Something that turns a prompt into hosted images.
#[async_trait]
pub trait ImageGenerator: Send + Sync + Debug {
    /// Returns the URLs of the generated images.
    async fn generate(&self, request: &ImageRequest<'_>) -> Result<Vec<String>, ComicError>;
}

#[derive(Deserialize, Debug)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize, Debug)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ImagesGenerateResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Deserialize, Debug)]
struct ImageData {
    url: Option<String>,
    revised_prompt: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize, Debug)]
struct ApiErrorBody {
    message: String,
}

/// Client for an OpenAI-compatible API.
#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: Url,
}

impl Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl OpenAiClient {
    /// Builds a client for `base_url` (for example `https://api.openai.com/v1`)
    /// authenticating with `api_key`.
    pub fn new(api_key: &str, base_url: &str) -> Result<Self, ComicError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            base_url,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ComicError> {
        Ok(self.base_url.join(path)?)
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(StatusCode, String), ComicError> {
        let url = self.endpoint(path)?;
        debug!("POST {}", url);
        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        Ok((status, body))
    }
}

/// Pulls the upstream `error.message` out of a failed response, or falls back to the raw body.
fn upstream_message(api: &str, status: StatusCode, body: &str) -> String {
    let message = serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    format!("OpenAI {api} API error {status}: {message}")
}

/// Statuses that mean "this request shape is not accepted" rather than auth, quota or outage.
fn rejects_request_option(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_REQUEST
            | StatusCode::NOT_FOUND
            | StatusCode::UNSUPPORTED_MEDIA_TYPE
            | StatusCode::UNPROCESSABLE_ENTITY
    )
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, ComicError> {
        let (status, body) = self.post("chat/completions", request).await?;
        if !status.is_success() {
            let message = upstream_message("Chat Completions", status, &body);
            if request.response_format.is_some() && rejects_request_option(status) {
                return Err(ComicError::UnsupportedResponseFormat(message));
            }
            return Err(ComicError::Upstream(message));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body).map_err(|err| {
            ComicError::Upstream(format!("Failed to parse chat completion JSON: {err}"))
        })?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ComicError::Upstream("Chat completion returned no content".to_string()))
    }
}

#[async_trait]
impl ImageGenerator for OpenAiClient {
    async fn generate(&self, request: &ImageRequest<'_>) -> Result<Vec<String>, ComicError> {
        let (status, body) = self.post("images/generations", request).await?;
        if !status.is_success() {
            return Err(ComicError::Upstream(upstream_message(
                "Images", status, &body,
            )));
        }

        let parsed: ImagesGenerateResponse = serde_json::from_str(&body).map_err(|err| {
            ComicError::Upstream(format!("Failed to parse image generation JSON: {err}"))
        })?;
        if parsed.data.is_empty() {
            return Err(ComicError::Upstream("No image data returned".to_string()));
        }

        parsed
            .data
            .into_iter()
            .map(|image| {
                if let Some(revised_prompt) = image.revised_prompt {
                    debug!("Revised prompt from OpenAI: {revised_prompt}");
                }
                image
                    .url
                    .ok_or_else(|| ComicError::Upstream("Image response missing url".to_string()))
            })
            .collect()
    }
}
