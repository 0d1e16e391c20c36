// src/ingest/types.rs
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SourceError;

/// Which query group produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Global,
    Domestic,
    News,
    Community,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Global => "global",
            Category::Domestic => "domestic",
            Category::News => "news",
            Category::Community => "community",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discovery backend a query is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// HTML listing scrape of news.hada.io
    Geeknews,
    /// Tavily-style JSON search API
    SearchApi,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Geeknews => "geeknews",
            Backend::SearchApi => "search_api",
        }
    }
}

/// One unit of fan-out work. Built once before dispatch, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    pub backend: Backend,
    pub category: Category,
    pub query: String,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Recency window in days.
    #[serde(default = "default_recency_days")]
    pub recency_days: u32,
}

fn default_max_results() -> usize {
    10
}
fn default_recency_days() -> u32 {
    1
}

impl QuerySpec {
    pub fn new(backend: Backend, category: Category, query: impl Into<String>) -> Self {
        Self {
            backend,
            category,
            query: query.into(),
            max_results: default_max_results(),
            recency_days: default_recency_days(),
        }
    }

    pub fn with_max_results(mut self, n: usize) -> Self {
        self.max_results = n;
        self
    }

    pub fn with_recency_days(mut self, days: u32) -> Self {
        self.recency_days = days;
        self
    }
}

/// Untrusted record as emitted by an adapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub title: String,
    pub source_url: String,
    pub secondary_url: Option<String>,
    pub content: String,
    pub rank_signal: Option<f64>,
}

impl RawRecord {
    pub fn new(title: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source_url: source_url.into(),
            ..Default::default()
        }
    }

    pub fn with_rank(mut self, rank: f64) -> Self {
        self.rank_signal = Some(rank);
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_secondary(mut self, url: impl Into<String>) -> Self {
        self.secondary_url = Some(url.into());
        self
    }
}

/// Position of a record in the deterministic flattening order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Origin {
    /// Index of the QuerySpec in submission order.
    pub query: usize,
    /// Index within that adapter's emission order.
    pub position: usize,
}

/// A raw record tagged with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedRecord {
    pub origin: Origin,
    pub category: Category,
    pub record: RawRecord,
}

#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    async fn search(&self, spec: &QuerySpec) -> Result<Vec<RawRecord>, SourceError>;
    fn name(&self) -> &'static str;
}
