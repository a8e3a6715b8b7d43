//! Process-start configuration, read once from the environment.
//!
//! Nothing here is re-read after startup: the credential and backend
//! selector are captured into an immutable [`Config`] that the server
//! state holds for the life of the process.

/// Named external text-generation services the selector can point at.
///
/// Only [`Provider::OpenAi`] is wired to an implementation; selecting
/// anything else leaves the service in the "not configured" state while
/// still echoing the selector in `/` and `/health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    #[default]
    OpenAi,
    Anthropic,
}

impl Provider {
    /// Wire name, as reported by the info and health endpoints.
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
        }
    }

    /// Environment variable holding this provider's credential.
    pub fn key_var(self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    /// Parse a selector value. Unknown values fall back to the default
    /// rather than failing startup.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "anthropic" => Provider::Anthropic,
            _ => Provider::OpenAi,
        }
    }
}

/// Immutable runtime configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Which backend the `USE_API` selector names.
    pub provider: Provider,
    /// Credential for the selected backend, if set and non-empty.
    pub api_key: Option<String>,
}

impl Config {
    /// Read configuration from the environment. An empty credential
    /// counts as unset.
    pub fn from_env() -> Self {
        let provider = std::env::var("USE_API")
            .map(|v| Provider::parse(&v))
            .unwrap_or_default();
        let api_key = std::env::var(provider.key_var())
            .ok()
            .filter(|key| !key.is_empty());
        Self { provider, api_key }
    }

    /// Whether a credential is present for the selected backend.
    pub fn api_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
