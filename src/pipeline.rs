// src/pipeline.rs
//! One digest run, start to terminal outcome.
//!
//! `Idle -> Collecting -> Deduplicating -> Selecting -> Synthesizing -> Gating
//!  -> {Delivering -> Delivered} | SkippedEmpty | Failed`
//!
//! Strictly sequential and one-shot. A batch with no records at all skips
//! synthesis entirely; records that all fail ingestion end the run as
//! `NoCandidates`. The orchestrator never retries; it only maps stage failures to
//! a terminal [`RunOutcome`].

use std::fmt;

use chrono::NaiveDate;
use metrics::counter;
use tracing::{error, info, warn};

use crate::curate::{select, CurationInput, DedupReport, SelectionPolicy};
use crate::deliver::{self, DeliveryConfig, DynSink, GateDecision, MessageId};
use crate::error::PipelineError;
use crate::ingest::{self, types::QuerySpec, Sources};
use crate::synth::{DynGateway, PromptConfig, SynthesisRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Collecting,
    Deduplicating,
    Selecting,
    Synthesizing,
    Gating,
    Delivering,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::Collecting => "collecting",
            Stage::Deduplicating => "deduplicating",
            Stage::Selecting => "selecting",
            Stage::Synthesizing => "synthesizing",
            Stage::Gating => "gating",
            Stage::Delivering => "delivering",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Dedup/selection produced nothing; synthesis was not called.
    EmptySelection,
    /// Synthesized text was below the gate threshold.
    BelowThreshold { trimmed_chars: usize },
}

/// Terminal state of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Delivered { message_id: MessageId },
    SkippedEmpty(SkipReason),
    Failed { stage: Stage, reason: String },
}

impl RunOutcome {
    fn failed(stage: Stage, err: &PipelineError) -> Self {
        RunOutcome::Failed {
            stage,
            reason: err.to_string(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }

    /// Process exit status for this outcome.
    pub fn exit_code(&self) -> u8 {
        if self.is_failure() {
            1
        } else {
            0
        }
    }

    fn label(&self) -> &'static str {
        match self {
            RunOutcome::Delivered { .. } => "delivered",
            RunOutcome::SkippedEmpty(_) => "skipped_empty",
            RunOutcome::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Delivered { message_id } => write!(f, "delivered ({message_id})"),
            RunOutcome::SkippedEmpty(SkipReason::EmptySelection) => {
                f.write_str("skipped: no candidates selected")
            }
            RunOutcome::SkippedEmpty(SkipReason::BelowThreshold { trimmed_chars }) => write!(
                f,
                "skipped: synthesized text too short ({trimmed_chars} chars)"
            ),
            RunOutcome::Failed { stage, reason } => write!(f, "failed at {stage}: {reason}"),
        }
    }
}

/// Wires the collaborators for a run. Holds no state between runs.
pub struct Orchestrator {
    pub sources: Sources,
    pub queries: Vec<QuerySpec>,
    pub policy: SelectionPolicy,
    pub prompt: PromptConfig,
    pub gateway: DynGateway,
    pub sink: DynSink,
    pub recipient: String,
    pub delivery: DeliveryConfig,
    pub min_chars: usize,
}

impl Orchestrator {
    /// Execute one run for `date`. Always returns a terminal outcome.
    pub async fn run(&self, date: NaiveDate) -> RunOutcome {
        ingest::ensure_metrics_described();
        let outcome = self.run_stages(date).await;
        counter!("digest_runs_total", "outcome" => outcome.label()).increment(1);
        match &outcome {
            RunOutcome::Failed { .. } => error!(%outcome, "run finished"),
            _ => info!(%outcome, "run finished"),
        }
        outcome
    }

    async fn run_stages(&self, date: NaiveDate) -> RunOutcome {
        let mut stage = Stage::Idle;
        let mut advance = |next: Stage| {
            tracing::debug!(from = %stage, to = %next, "stage");
            stage = next;
            next
        };

        let s = advance(Stage::Collecting);
        let collected = match ingest::collect(&self.sources, &self.queries).await {
            Ok(c) => c,
            Err(e) => return RunOutcome::failed(s, &e),
        };
        if !collected.failures.is_empty() {
            warn!(
                failed = collected.failures.len(),
                succeeded = collected.succeeded,
                "partial fan-out"
            );
        }

        let s = advance(Stage::Deduplicating);
        let report = DedupReport::run(collected.records);
        info!(
            candidates = report.candidates.len(),
            invalid = report.invalid,
            duplicates = report.duplicates,
            "deduplicated"
        );
        // Records arrived but none was usable.
        if report.candidates.is_empty() && report.invalid > 0 {
            return RunOutcome::failed(s, &PipelineError::NoCandidates);
        }

        advance(Stage::Selecting);
        let selected = select(&report.candidates, &self.policy);
        if selected.is_empty() {
            return RunOutcome::SkippedEmpty(SkipReason::EmptySelection);
        }
        counter!("digest_selected_total").increment(selected.len() as u64);

        let s = advance(Stage::Synthesizing);
        let req = SynthesisRequest {
            curation: CurationInput::from_candidates(&selected),
            prompt: self.prompt.clone(),
            run_date: date,
        };
        info!(
            items = req.curation.items,
            provider = self.gateway.provider_name(),
            "synthesizing"
        );
        let result = match self.gateway.synthesize(&req).await {
            Ok(r) => r,
            Err(e) => return RunOutcome::failed(s, &PipelineError::from(e)),
        };

        advance(Stage::Gating);
        if let GateDecision::Skip { trimmed_chars } = deliver::evaluate(&result, self.min_chars) {
            return RunOutcome::SkippedEmpty(SkipReason::BelowThreshold { trimmed_chars });
        }

        let s = advance(Stage::Delivering);
        let subject = self.delivery.subject_for(date);
        match self
            .sink
            .deliver(&subject, result.text(), &self.recipient)
            .await
        {
            Ok(message_id) => RunOutcome::Delivered { message_id },
            Err(e) => RunOutcome::failed(s, &PipelineError::from(e)),
        }
    }
}
