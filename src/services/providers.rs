// AI Provider Service
// Text generation through OpenAI and Anthropic APIs

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};

use super::ConfigStore;

const OPENAI_DEFAULT_URL: &str = "https://api.openai.com/v1/chat/completions";
const ANTHROPIC_DEFAULT_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4-turbo";
pub const ANTHROPIC_DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
const ANTHROPIC_VALIDATION_MODEL: &str = "claude-3-haiku-20240307";

const REQUEST_TIMEOUT_SECS: u64 = 120;
const DEFAULT_TEMPERATURE: f64 = 0.7;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },
    #[error("Missing content in response")]
    MissingContent,
    #[error("JSON parse error: {0}")]
    JsonError(String),
    #[error("API key not configured for {0}")]
    MissingApiKey(String),
    #[error("Unknown AI provider: {0}")]
    UnknownProvider(String),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
}

impl ProviderKind {
    pub fn parse(name: &str) -> Result<Self, ProviderError> {
        match name.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            other => Err(ProviderError::UnknownProvider(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAi => OPENAI_DEFAULT_MODEL,
            Self::Anthropic => ANTHROPIC_DEFAULT_MODEL,
        }
    }

    fn default_url(&self) -> String {
        match self {
            Self::OpenAi => env::var("OPENAI_API_URL").unwrap_or_else(|_| OPENAI_DEFAULT_URL.to_string()),
            Self::Anthropic => {
                env::var("ANTHROPIC_API_URL").unwrap_or_else(|_| ANTHROPIC_DEFAULT_URL.to_string())
            }
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSpec {
    pub name: String,
    pub model: String,
}

/// `"anthropic:claude-3-haiku-20240307"` or just `"openai"`.
pub fn parse_provider(spec: &str) -> ProviderSpec {
    let parts: Vec<&str> = spec.splitn(2, ':').collect();
    if parts.len() == 2 {
        ProviderSpec {
            name: parts[0].to_string(),
            model: parts[1].to_string(),
        }
    } else {
        ProviderSpec {
            name: spec.to_string(),
            model: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub model: Option<String>,
    pub max_tokens: u32,
    pub temperature: f64,
    pub system_prompt: Option<String>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: 4096,
            temperature: DEFAULT_TEMPERATURE,
            system_prompt: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub text: String,
    pub model: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Opaque "generate text from a prompt" capability.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &str;

    fn default_model(&self) -> &str;

    async fn generate_text(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<GenerationResult, ProviderError>;
}

pub struct ProviderClient {
    client: Client,
    kind: ProviderKind,
    api_key: String,
    url: String,
    default_model: String,
}

impl ProviderClient {
    pub fn new(kind: ProviderKind, api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            client,
            kind,
            api_key: api_key.into(),
            url: kind.default_url(),
            default_model: kind.default_model().to_string(),
        }
    }

    /// Resolve provider name, model and key the way the CLI and services do:
    /// explicit key, then environment, then config file.
    pub fn from_spec(spec: &str, api_key: Option<String>) -> Result<Self, ProviderError> {
        let parsed = parse_provider(spec);
        let kind = ProviderKind::parse(&parsed.name)?;
        let key = api_key
            .or_else(|| get_api_key(kind.as_str()))
            .ok_or_else(|| ProviderError::MissingApiKey(kind.as_str().to_string()))?;

        let mut client = Self::new(kind, key);
        if let Some(url) = configured_url(kind.as_str()) {
            client.url = url;
        }
        if !parsed.model.is_empty() {
            client.default_model = parsed.model;
        } else if let Some(model) = configured_model(kind.as_str()) {
            client.default_model = model;
        }
        Ok(client)
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// `false` only when the provider rejects the key outright.
    pub async fn validate_api_key(&self) -> bool {
        let options = GenerationOptions {
            model: Some(match self.kind {
                ProviderKind::OpenAi => self.default_model.clone(),
                ProviderKind::Anthropic => ANTHROPIC_VALIDATION_MODEL.to_string(),
            }),
            max_tokens: 1,
            ..GenerationOptions::default()
        };
        match self.generate_text("Hi", &options).await {
            Ok(_) => true,
            Err(ProviderError::ApiError { status, .. }) if status == 401 || status == 403 => false,
            Err(e) => {
                warn!(provider = %self.kind, error = %e, "provider.validate_inconclusive");
                true
            }
        }
    }

    async fn post_json(&self, body: &serde_json::Value) -> Result<serde_json::Value, ProviderError> {
        let request = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(body);
        let request = match self.kind {
            ProviderKind::OpenAi => request.header("Authorization", format!("Bearer {}", self.api_key)),
            ProviderKind::Anthropic => request
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION),
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::JsonError(e.to_string()))
    }
}

#[async_trait]
impl TextGenerator for ProviderClient {
    fn name(&self) -> &str {
        self.kind.as_str()
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    async fn generate_text(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<GenerationResult, ProviderError> {
        let model = options
            .model
            .clone()
            .unwrap_or_else(|| self.default_model.clone());

        let body = match self.kind {
            ProviderKind::OpenAi => openai_request_body(&model, prompt, options),
            ProviderKind::Anthropic => anthropic_request_body(&model, prompt, options),
        };

        let start = Instant::now();
        let data = self.post_json(&body).await?;
        let result = match self.kind {
            ProviderKind::OpenAi => parse_openai_response(&model, &data)?,
            ProviderKind::Anthropic => parse_anthropic_response(&model, &data)?,
        };

        info!(
            provider = %self.kind,
            model = %result.model,
            latency_ms = start.elapsed().as_millis() as u64,
            input_tokens = result.input_tokens,
            output_tokens = result.output_tokens,
            "provider.generated"
        );
        Ok(result)
    }
}

fn openai_request_body(model: &str, prompt: &str, options: &GenerationOptions) -> serde_json::Value {
    let mut messages = Vec::new();
    if let Some(system) = options.system_prompt.as_deref() {
        messages.push(serde_json::json!({"role": "system", "content": system}));
    }
    messages.push(serde_json::json!({"role": "user", "content": prompt}));

    serde_json::json!({
        "model": model,
        "messages": messages,
        "max_tokens": options.max_tokens,
        "temperature": options.temperature,
    })
}

fn anthropic_request_body(model: &str, prompt: &str, options: &GenerationOptions) -> serde_json::Value {
    let mut body = serde_json::json!({
        "model": model,
        "max_tokens": options.max_tokens,
        "messages": [{"role": "user", "content": prompt}],
    });
    if let Some(system) = options.system_prompt.as_deref() {
        body["system"] = serde_json::json!(system);
    }
    // Only sent when the caller moved away from the default.
    if options.temperature != DEFAULT_TEMPERATURE {
        body["temperature"] = serde_json::json!(options.temperature);
    }
    body
}

fn token_count(value: &serde_json::Value) -> u32 {
    value
        .as_u64()
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
        .unwrap_or(0)
}

fn parse_openai_response(model: &str, data: &serde_json::Value) -> Result<GenerationResult, ProviderError> {
    let choice = data["choices"]
        .get(0)
        .ok_or(ProviderError::MissingContent)?;
    let text = choice["message"]["content"].as_str().unwrap_or_default().to_string();

    Ok(GenerationResult {
        text,
        model: model.to_string(),
        input_tokens: token_count(&data["usage"]["prompt_tokens"]),
        output_tokens: token_count(&data["usage"]["completion_tokens"]),
    })
}

fn parse_anthropic_response(model: &str, data: &serde_json::Value) -> Result<GenerationResult, ProviderError> {
    let blocks = data["content"].as_array().ok_or(ProviderError::MissingContent)?;
    let text: String = blocks
        .iter()
        .filter_map(|block| block["text"].as_str())
        .collect();

    Ok(GenerationResult {
        text,
        model: model.to_string(),
        input_tokens: token_count(&data["usage"]["input_tokens"]),
        output_tokens: token_count(&data["usage"]["output_tokens"]),
    })
}

fn default_store() -> Option<ConfigStore> {
    ConfigStore::default_config_dir().map(ConfigStore::new)
}

fn configured_url(provider: &str) -> Option<String> {
    default_store().and_then(|store| store.get_provider_url(provider).ok().flatten())
}

fn configured_model(provider: &str) -> Option<String> {
    default_store().and_then(|store| store.get_provider_model(provider).ok().flatten())
}

/// Get API key from environment or config file
pub fn get_api_key(provider: &str) -> Option<String> {
    let env_keys: &[&str] = match provider {
        "openai" => &["OPENAI_API_KEY", "VOICE_CLONE_OPENAI_API_KEY"],
        "anthropic" | "claude" => &["ANTHROPIC_API_KEY", "VOICE_CLONE_ANTHROPIC_API_KEY"],
        _ => &[],
    };

    for key in env_keys {
        if let Ok(val) = env::var(key) {
            let v = val.trim();
            if !v.is_empty() {
                return Some(v.to_string());
            }
        }
    }

    default_store().and_then(|store| store.get_api_key(provider).ok().flatten())
}
