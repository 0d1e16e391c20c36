// src/ingest/mod.rs
pub mod providers;
pub mod types;

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;

use crate::error::{PipelineError, SourceError};
use crate::ingest::types::{Backend, Category, Origin, QuerySpec, SourceProvider, TaggedRecord};

/// One-time metrics registration.
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("digest_records_total", "Raw records returned by adapters.");
        describe_counter!(
            "digest_source_errors_total",
            "Adapter calls that failed (isolated per query)."
        );
        describe_counter!(
            "digest_invalid_total",
            "Records dropped for missing title and URL."
        );
        describe_counter!("digest_dedup_total", "Records dropped as duplicate URLs.");
        describe_counter!("digest_selected_total", "Candidates handed to synthesis.");
        describe_counter!("digest_runs_total", "Finished runs by outcome.");
    });
}

/// Normalize text: decode entities, strip tags, collapse whitespace, trim.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").expect("static regex"));
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").expect("static regex"));
    out = re_ws.replace_all(&out, " ").trim().to_string();

    // 4) Length cap: 1500 chars
    if out.chars().count() > 1500 {
        out = out.chars().take(1500).collect();
    }

    out
}

/// Adapters keyed by backend.
#[derive(Default, Clone)]
pub struct Sources {
    by_backend: HashMap<Backend, Arc<dyn SourceProvider>>,
}

impl Sources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, backend: Backend, provider: Arc<dyn SourceProvider>) -> Self {
        self.register(backend, provider);
        self
    }

    pub fn register(&mut self, backend: Backend, provider: Arc<dyn SourceProvider>) {
        self.by_backend.insert(backend, provider);
    }

    pub fn get(&self, backend: Backend) -> Option<&Arc<dyn SourceProvider>> {
        self.by_backend.get(&backend)
    }
}

/// A query whose adapter call failed.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryFailure {
    pub index: usize,
    pub category: Category,
    pub backend: Backend,
    pub error: SourceError,
}

/// Settled fan-out batch.
#[derive(Debug, Clone, Default)]
pub struct Collected {
    /// Records in submission order, then emission order.
    pub records: Vec<TaggedRecord>,
    pub failures: Vec<QueryFailure>,
    pub succeeded: usize,
}

/// Issue every query concurrently and merge what settles.
///
/// All calls are polled jointly on the current task; none can cancel another.
/// The merge runs after every call has settled and orders records by
/// submission index, so the result does not depend on completion order.
/// Fails with [`PipelineError::NoCandidates`] only when no query succeeded.
pub async fn collect(sources: &Sources, specs: &[QuerySpec]) -> Result<Collected, PipelineError> {
    ensure_metrics_described();

    let calls = specs.iter().enumerate().map(|(index, spec)| async move {
        let outcome = match sources.get(spec.backend) {
            Some(provider) => provider.search(spec).await,
            None => Err(SourceError::Unavailable(format!(
                "no adapter registered for {}",
                spec.backend.as_str()
            ))),
        };
        (index, outcome)
    });

    let mut settled = join_all(calls).await;
    settled.sort_by_key(|(index, _)| *index);

    let mut collected = Collected::default();
    for (index, outcome) in settled {
        let spec = &specs[index];
        match outcome {
            Ok(records) => {
                collected.succeeded += 1;
                counter!("digest_records_total").increment(records.len() as u64);
                tracing::debug!(
                    query = %spec.query,
                    category = %spec.category,
                    records = records.len(),
                    "source settled"
                );
                collected
                    .records
                    .extend(records.into_iter().enumerate().map(|(position, record)| {
                        TaggedRecord {
                            origin: Origin {
                                query: index,
                                position,
                            },
                            category: spec.category,
                            record,
                        }
                    }));
            }
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    query = %spec.query,
                    category = %spec.category,
                    backend = spec.backend.as_str(),
                    "source failed"
                );
                counter!("digest_source_errors_total").increment(1);
                collected.failures.push(QueryFailure {
                    index,
                    category: spec.category,
                    backend: spec.backend,
                    error,
                });
            }
        }
    }

    if collected.succeeded == 0 {
        return Err(PipelineError::NoCandidates);
    }
    Ok(collected)
}
