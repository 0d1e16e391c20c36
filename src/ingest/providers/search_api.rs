// src/ingest/providers/search_api.rs
//! Tavily-style web search API (`POST /search`, JSON in and out).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SourceError;
use crate::ingest::normalize_text;
use crate::ingest::types::{QuerySpec, RawRecord, SourceProvider};

pub const DEFAULT_ENDPOINT: &str = "https://api.tavily.com/search";

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    topic: &'a str,
    max_results: usize,
    days: u32,
    search_depth: &'a str,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Option<Vec<SearchHit>>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    score: Option<f64>,
}

pub struct SearchApiProvider {
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http {
        client: reqwest::Client,
        endpoint: String,
        api_key: String,
    },
}

impl SearchApiProvider {
    pub fn from_fixture(json: &str) -> Self {
        Self {
            mode: Mode::Fixture(json.to_string()),
        }
    }

    pub fn http(api_key: String, timeout: Duration) -> Result<Self, SourceError> {
        Self::http_with_endpoint(api_key, DEFAULT_ENDPOINT, timeout)
    }

    pub fn http_with_endpoint(
        api_key: String,
        endpoint: &str,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let client = super::http_client(timeout)?;
        Ok(Self {
            mode: Mode::Http {
                client,
                endpoint: endpoint.to_string(),
                api_key,
            },
        })
    }

    /// Map a response body to records. A body without a `results` array is malformed.
    pub fn parse_response(body: &str, max: usize) -> Result<Vec<RawRecord>, SourceError> {
        let resp: SearchResponse = serde_json::from_str(body)
            .map_err(|e| SourceError::Malformed(format!("search response: {e}")))?;
        let hits = resp
            .results
            .ok_or_else(|| SourceError::Malformed("search response has no results".into()))?;

        Ok(hits
            .into_iter()
            .take(max)
            .map(|h| RawRecord {
                title: normalize_text(h.title.as_deref().unwrap_or_default()),
                source_url: h.url.unwrap_or_default().trim().to_string(),
                secondary_url: None,
                content: normalize_text(h.content.as_deref().unwrap_or_default()),
                rank_signal: h.score.filter(|s| s.is_finite()),
            })
            .collect())
    }
}

#[async_trait]
impl SourceProvider for SearchApiProvider {
    async fn search(&self, spec: &QuerySpec) -> Result<Vec<RawRecord>, SourceError> {
        let body = match &self.mode {
            Mode::Fixture(s) => s.clone(),
            Mode::Http {
                client,
                endpoint,
                api_key,
            } => {
                let req = SearchRequest {
                    query: &spec.query,
                    topic: "news",
                    max_results: spec.max_results,
                    days: spec.recency_days,
                    search_depth: "basic",
                };
                let resp = client
                    .post(endpoint.as_str())
                    .bearer_auth(api_key)
                    .json(&req)
                    .send()
                    .await
                    .map_err(|e| SourceError::from_http(&e))?;
                let status = resp.status();
                if !status.is_success() {
                    let detail = resp.text().await.unwrap_or_default();
                    return Err(SourceError::Unavailable(format!(
                        "search api HTTP {status}: {}",
                        detail.chars().take(200).collect::<String>()
                    )));
                }
                resp.text().await.map_err(|e| SourceError::from_http(&e))?
            }
        };
        Self::parse_response(&body, spec.max_results)
    }

    fn name(&self) -> &'static str {
        "search_api"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_results_is_malformed() {
        let err = SearchApiProvider::parse_response(r#"{"answer": null}"#, 5).unwrap_err();
        assert!(matches!(err, SourceError::Malformed(_)));
    }

    #[test]
    fn missing_score_stays_none() {
        let body = r#"{"results":[{"title":"t","url":"https://a.test","content":"c"}]}"#;
        let out = SearchApiProvider::parse_response(body, 5).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].rank_signal, None);
    }
}
