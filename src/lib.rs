// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod bootstrap;
pub mod config;
pub mod curate;
pub mod deliver;
pub mod error;
pub mod ingest;
pub mod pipeline;
pub mod synth;

// ---- Re-exports for stable public API ----
pub use crate::curate::{Candidate, CurationInput, SelectionPolicy};
pub use crate::error::{DeliveryError, PipelineError, SourceError, SynthesisError};
pub use crate::ingest::types::{Backend, Category, QuerySpec, RawRecord, SourceProvider};
pub use crate::pipeline::{Orchestrator, RunOutcome, SkipReason, Stage};
