// src/ingest/providers/geeknews.rs
//! GeekNews (news.hada.io) daily listing scraper.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::SourceError;
use crate::ingest::normalize_text;
use crate::ingest::types::{QuerySpec, RawRecord, SourceProvider};

pub const GEEKNEWS_BASE: &str = "https://news.hada.io/";
pub const DEFAULT_LISTING_QUERY: &str = "past?day={date}";

pub struct GeekNewsProvider {
    mode: Mode,
    base: Url,
}

enum Mode {
    Fixture(String),
    Http { client: reqwest::Client },
}

impl GeekNewsProvider {
    pub fn from_fixture(html: &str) -> Self {
        Self {
            mode: Mode::Fixture(html.to_string()),
            base: default_base(),
        }
    }

    pub fn http(timeout: Duration) -> Result<Self, SourceError> {
        let client = super::http_client(timeout)?;
        Ok(Self {
            mode: Mode::Http { client },
            base: default_base(),
        })
    }

    pub fn with_base(mut self, base: Url) -> Self {
        self.base = base;
        self
    }

    /// Listing URL for `spec`, with `{date}` replaced by `date` (YYYY-MM-DD).
    pub fn listing_url(&self, spec: &QuerySpec, date: NaiveDate) -> Result<Url, SourceError> {
        let query = if spec.query.trim().is_empty() {
            DEFAULT_LISTING_QUERY
        } else {
            spec.query.trim()
        };
        let path = query.replace("{date}", &date.format("%Y-%m-%d").to_string());
        self.base
            .join(&path)
            .map_err(|e| SourceError::Malformed(format!("listing url {path}: {e}")))
    }

    /// Parse a listing page into records, at most `max` of them.
    ///
    /// Rows without a title or a link are skipped.
    pub fn parse_listing(html: &str, base: &Url, max: usize) -> Result<Vec<RawRecord>, SourceError> {
        let row_sel = selector(".topic_row")?;
        let title_sel = selector(".topictitle a h1")?;
        let link_sel = selector(".topictitle a")?;
        let score_sel = selector(r#".topicinfo span[id^="tp"]"#)?;
        let desc_sel = selector(".topicdesc a")?;
        let topic_sel = selector(".topicinfo a.u")?;

        let doc = Html::parse_document(html);
        let mut out = Vec::new();

        for row in doc.select(&row_sel) {
            if out.len() >= max {
                break;
            }
            let title = first_text(&row, &title_sel);
            let link = row
                .select(&link_sel)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(str::trim)
                .unwrap_or_default();
            if title.is_empty() || link.is_empty() {
                continue;
            }

            let source_url = resolve(base, link);
            let secondary_url = row
                .select(&topic_sel)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(|href| resolve(base, href.trim()));

            out.push(RawRecord {
                title,
                source_url,
                secondary_url,
                content: first_text(&row, &desc_sel),
                rank_signal: Some(parse_points(&first_text(&row, &score_sel))),
            });
        }

        Ok(out)
    }
}

#[async_trait]
impl SourceProvider for GeekNewsProvider {
    async fn search(&self, spec: &QuerySpec) -> Result<Vec<RawRecord>, SourceError> {
        let html = match &self.mode {
            Mode::Fixture(s) => s.clone(),
            Mode::Http { client } => {
                let url = self.listing_url(spec, Utc::now().date_naive())?;
                tracing::debug!(%url, "fetching geeknews listing");
                let resp = client
                    .get(url.clone())
                    .send()
                    .await
                    .map_err(|e| SourceError::from_http(&e))?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(SourceError::Unavailable(format!("{url}: HTTP {status}")));
                }
                resp.text().await.map_err(|e| SourceError::from_http(&e))?
            }
        };
        Self::parse_listing(&html, &self.base, spec.max_results)
    }

    fn name(&self) -> &'static str {
        "geeknews"
    }
}

fn default_base() -> Url {
    // Constant, always parses.
    Url::parse(GEEKNEWS_BASE).expect("valid base url")
}

fn selector(css: &'static str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::Malformed(format!("selector {css}: {e}")))
}

fn first_text(row: &ElementRef<'_>, sel: &Selector) -> String {
    row.select(sel)
        .next()
        .map(|el| normalize_text(&el.text().collect::<String>()))
        .unwrap_or_default()
}

fn resolve(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Leading integer of a points label ("12 points" -> 12). Missing -> 0.
fn parse_points(s: &str) -> f64 {
    let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<u64>().map(|n| n as f64).unwrap_or(0.0)
}
