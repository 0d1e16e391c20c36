// src/synth/openai.rs
//! OpenAI Chat Completions gateway.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{SynthesisGateway, SynthesisRequest, SynthesisResult};
use crate::error::SynthesisError;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}
#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    temperature: f32,
    max_tokens: u32,
}
#[derive(Deserialize)]
struct Resp {
    #[serde(default)]
    choices: Vec<Choice>,
}
#[derive(Deserialize)]
struct Choice {
    message: ChoiceMsg,
}
#[derive(Deserialize)]
struct ChoiceMsg {
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenAiGateway {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiGateway {
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

    pub fn extract_text(body: &str) -> Result<SynthesisResult, SynthesisError> {
        let resp: Resp = serde_json::from_str(body)
            .map_err(|e| SynthesisError::Unavailable(format!("openai response: {e}")))?;
        let choice = resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| SynthesisError::Rejected("openai returned no choices".into()))?;
        Ok(SynthesisResult(choice.message.content.unwrap_or_default()))
    }
}

#[async_trait]
impl SynthesisGateway for OpenAiGateway {
    async fn synthesize(&self, req: &SynthesisRequest) -> Result<SynthesisResult, SynthesisError> {
        let sys = format!(
            "You are {}. Follow the user's layout and rules exactly.",
            req.prompt.persona
        );
        let prompt = req.render_prompt();
        let body = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: &sys,
                },
                Msg {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: 0.4,
            max_tokens: 4096,
        };

        let resp = self
            .http
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&self.api_key)
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
        "openai"
    }
}
