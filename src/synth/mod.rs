// src/synth/mod.rs
//! Synthesis gateway: provider abstraction over the LLM call.

pub mod gemini;
pub mod openai;
pub mod prompt;

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::curate::CurationInput;
use crate::error::SynthesisError;

pub use prompt::PromptConfig;

/// Everything one synthesis call needs.
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub curation: CurationInput,
    pub prompt: PromptConfig,
    pub run_date: NaiveDate,
}

impl SynthesisRequest {
    pub fn render_prompt(&self) -> String {
        prompt::render(&self.prompt, &self.curation, self.run_date)
    }
}

/// Opaque narrative text. Only its trimmed length is ever inspected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SynthesisResult(pub String);

impl SynthesisResult {
    pub fn text(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SynthesisResult {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[async_trait::async_trait]
pub trait SynthesisGateway: Send + Sync {
    async fn synthesize(&self, req: &SynthesisRequest) -> Result<SynthesisResult, SynthesisError>;
    fn provider_name(&self) -> &'static str;
}

pub type DynGateway = Arc<dyn SynthesisGateway>;

/// `[synthesis]` config section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// "gemini" | "openai" (case-insensitive)
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Provider default when absent.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider() -> String {
    "gemini".to_string()
}
fn default_timeout_secs() -> u64 {
    90
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SynthesisConfig {
    /// Env var holding the key for the configured provider.
    pub fn api_key_var(&self) -> &'static str {
        match self.provider.to_ascii_lowercase().as_str() {
            "openai" => "OPENAI_API_KEY",
            _ => "GEMINI_API_KEY",
        }
    }
}

/// Build the configured gateway.
pub fn build_gateway(cfg: &SynthesisConfig, api_key: String) -> Result<DynGateway, SynthesisError> {
    let timeout = Duration::from_secs(cfg.timeout_secs);
    match cfg.provider.to_ascii_lowercase().as_str() {
        "gemini" => Ok(Arc::new(gemini::GeminiGateway::new(
            api_key,
            cfg.model.as_deref(),
            timeout,
        )?)),
        "openai" => Ok(Arc::new(openai::OpenAiGateway::new(
            api_key,
            cfg.model.as_deref(),
            timeout,
        )?)),
        other => Err(SynthesisError::Rejected(format!(
            "unsupported synthesis provider: {other}"
        ))),
    }
}

pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, SynthesisError> {
    reqwest::Client::builder()
        .user_agent(concat!("tech-digest/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(4))
        .timeout(timeout)
        .build()
        .map_err(|e| SynthesisError::Unavailable(format!("http client: {e}")))
}

/// 4xx except 429 means the request itself was refused.
pub(crate) fn status_error(status: reqwest::StatusCode, body: &str) -> SynthesisError {
    let detail: String = body.chars().take(300).collect();
    if status.is_client_error() && status != reqwest::StatusCode::TOO_MANY_REQUESTS {
        SynthesisError::Rejected(format!("HTTP {status}: {detail}"))
    } else {
        SynthesisError::Unavailable(format!("HTTP {status}: {detail}"))
    }
}
