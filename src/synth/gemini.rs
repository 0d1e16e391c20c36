// src/synth/gemini.rs
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{SynthesisGateway, SynthesisRequest, SynthesisResult};
use crate::error::SynthesisError;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Serialize)]
struct Req<'a> {
    contents: Vec<ReqContent<'a>>,
}
#[derive(Serialize)]
struct ReqContent<'a> {
    role: &'a str,
    parts: Vec<ReqPart<'a>>,
}
#[derive(Serialize)]
struct ReqPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Resp {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}
#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<RespContent>,
}
#[derive(Debug, Deserialize)]
struct RespContent {
    #[serde(default)]
    parts: Vec<RespPart>,
}
#[derive(Debug, Deserialize)]
struct RespPart {
    #[serde(default)]
    text: Option<String>,
}
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

pub struct GeminiGateway {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiGateway {
    pub fn new(
        api_key: String,
        model_override: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, SynthesisError> {
        Ok(Self {
            http: super::http_client(timeout)?,
            api_key,
            model: model_override.unwrap_or(DEFAULT_MODEL).to_string(),
        })
    }

    /// Concatenated text parts of the first candidate.
    pub fn extract_text(body: &str) -> Result<SynthesisResult, SynthesisError> {
        let resp: Resp = serde_json::from_str(body)
            .map_err(|e| SynthesisError::Unavailable(format!("gemini response: {e}")))?;

        if let Some(reason) = resp.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(SynthesisError::Rejected(format!("prompt blocked: {reason}")));
        }
        let first = resp
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| SynthesisError::Rejected("gemini returned no candidates".into()))?;

        let text = first
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();
        Ok(SynthesisResult(text))
    }
}

#[async_trait]
impl SynthesisGateway for GeminiGateway {
    async fn synthesize(&self, req: &SynthesisRequest) -> Result<SynthesisResult, SynthesisError> {
        let prompt = req.render_prompt();
        let body = Req {
            contents: vec![ReqContent {
                role: "user",
                parts: vec![ReqPart { text: &prompt }],
            }],
        };

        let resp = self
            .http
            .post(format!("{ENDPOINT}/{}:generateContent", self.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SynthesisError::from_http(&e))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| SynthesisError::from_http(&e))?;
        if !status.is_success() {
            return Err(super::status_error(status, &text));
        }
        Self::extract_text(&text)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}
