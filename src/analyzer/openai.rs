use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;

use super::Backend;

const API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// A backend that calls the OpenAI chat completions API.
pub struct OpenAiBackend {
    model: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiBackend {
    pub fn new(api_key: String) -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key,
            // One client for the life of the process; reqwest reuses connections.
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Backend for OpenAiBackend {
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        temperature: f64,
    ) -> Result<String, ApiError> {
        let messages = [
            Message {
                role: "system",
                content: system,
            },
            Message {
                role: "user",
                content: prompt,
            },
        ];
        let body = ApiRequest {
            model: &self.model,
            messages: &messages,
            temperature,
        };

        debug!("calling OpenAI model {}", self.model);

        let resp = self
            .client
            .post(API_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(ApiError::UpstreamCall(format!(
                "OpenAI API error ({status}): {text}"
            )));
        }

        let api_resp: ApiResponse = resp.json().await?;

        let text = api_resp
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ApiError::UpstreamCall(
                "OpenAI API returned empty response".to_string(),
            ));
        }

        Ok(text.trim().to_string())
    }
}

// --- API types ---

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: &'a [Message<'a>],
    temperature: f64,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}
