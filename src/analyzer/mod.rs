//! Sentiment extraction: prompt construction, backend invocation, and
//! tolerant parsing of the model's reply.
//!
//! The model is asked for a JSON object with exactly five fields. Its reply
//! is trusted as-is wherever it cooperates: present fields pass through
//! untouched, missing fields get defaults, and only an unparseable reply is
//! an error.

pub mod mock;
pub mod openai;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::ApiError;

/// System instruction sent with every request.
const SYSTEM_PROMPT: &str = "You are a sentiment analysis expert. Return only valid JSON.";

/// Sampling temperature: low, favoring consistent output over variation.
const TEMPERATURE: f64 = 0.3;

/// The five fields every result must carry.
const REQUIRED_FIELDS: [&str; 5] = ["sentiment", "emotion", "keywords", "intensity", "valence"];

/// Minimum accepted text length in chars, after trimming.
const MIN_TEXT_CHARS: usize = 2;

const PROMPT_HEADER: &str = "Analyze the emotional sentiment of the following text and return ONLY a JSON object with these exact fields:";
const RETURN_FORMAT: &str = r#"Return format:
{
    "sentiment": <float between -1.0 (very negative) and 1.0 (very positive)>,
    "emotion": "<primary emotion: joy, sadness, anger, fear, surprise, disgust, neutral>",
    "keywords": [<array of 3-5 key topics/words from the text>],
    "intensity": <float between 0.0 (calm) and 1.0 (intense)>,
    "valence": <float between -1.0 (unpleasant) and 1.0 (pleasant)>
}

Return ONLY the JSON, no other text."#;

/// An external text-generation API.
///
/// Takes a chat-style request (system instruction + user prompt + sampling
/// temperature) and returns the model's free-form text reply. Could be a
/// real API or a test script.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        temperature: f64,
    ) -> Result<String, ApiError>;
}

/// Reject text that is empty or shorter than [`MIN_TEXT_CHARS`] after
/// trimming. Runs before any backend work.
pub fn check_input(text: &str) -> Result<(), ApiError> {
    if text.trim().chars().count() < MIN_TEXT_CHARS {
        return Err(ApiError::InvalidInput);
    }
    Ok(())
}

/// Run the full pipeline: validate the input, build the prompt, call the
/// backend, strip fences, parse, and default-fill the result.
pub async fn process(backend: &dyn Backend, text: &str) -> Result<Value, ApiError> {
    check_input(text)?;
    let prompt = build_prompt(text);
    let reply = backend.complete(SYSTEM_PROMPT, &prompt, TEMPERATURE).await?;
    normalize_reply(&reply)
}

/// Embed the text in the analysis prompt, value-range guidance included.
/// The model is instructed to obey it but not guaranteed to.
fn build_prompt(text: &str) -> String {
    format!("{PROMPT_HEADER}\n\nText: \"{text}\"\n\n{RETURN_FORMAT}")
}

/// Extract JSON from text that may be wrapped in markdown code fences.
fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();

    // Try to strip ```json ... ``` fences
    if let Some(after) = trimmed.strip_prefix("```json")
        && let Some(json) = after.strip_suffix("```")
    {
        return json.trim();
    }
    if let Some(after) = trimmed.strip_prefix("```")
        && let Some(json) = after.strip_suffix("```")
    {
        return json.trim();
    }

    trimmed
}

/// Parse the model's reply and make sure all five fields exist.
///
/// Fields the model did supply pass through without type or range checks.
/// Missing numeric fields become `0.0`; a missing `keywords` becomes `[]`.
fn normalize_reply(raw: &str) -> Result<Value, ApiError> {
    let json_str = extract_json(raw);

    let mut value: Value =
        serde_json::from_str(json_str).map_err(|e| ApiError::UpstreamFormat(e.to_string()))?;

    let Some(object) = value.as_object_mut() else {
        return Err(ApiError::UpstreamFormat(
            "reply is not a JSON object".to_string(),
        ));
    };

    for field in REQUIRED_FIELDS {
        if !object.contains_key(field) {
            let default = if field == "keywords" {
                json!([])
            } else {
                json!(0.0)
            };
            object.insert(field.to_string(), default);
        }
    }

    Ok(value)
}
