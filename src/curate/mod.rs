// src/curate/mod.rs
//! Curation: ingestion filter, URL dedup, ranked selection and the text
//! block handed to synthesis.

pub mod dedup;
pub mod digest;
pub mod select;

use serde::Serialize;

use crate::ingest::types::{Category, Origin};

pub use dedup::{canonical_key, dedup, ingest, DedupReport};
pub use digest::CurationInput;
pub use select::{select, CategoryFloor, SelectionPolicy};

/// One discovered item eligible for ranking. `source_url` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub title: String,
    pub source_url: String,
    pub secondary_url: Option<String>,
    pub content: String,
    /// 0.0 when the source gave none.
    pub rank_signal: f64,
    pub source_tag: Category,
    #[serde(skip)]
    pub origin: Origin,
}
