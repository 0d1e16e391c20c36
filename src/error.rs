// src/error.rs
//! Error taxonomy for one digest run.
//!
//! Source errors are absorbed by the fan-out collector; everything else
//! surfaces as a [`PipelineError`] and is turned into a terminal
//! `RunOutcome` by the orchestrator.

use thiserror::Error;

/// One adapter call failed. Isolated to its query.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("source timed out: {0}")]
    Timeout(String),

    #[error("source returned malformed data: {0}")]
    Malformed(String),
}

impl SourceError {
    /// Classify a transport error from `reqwest`.
    pub fn from_http(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            SourceError::Timeout(e.to_string())
        } else if e.is_decode() {
            SourceError::Malformed(e.to_string())
        } else {
            SourceError::Unavailable(e.to_string())
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("synthesis unavailable: {0}")]
    Unavailable(String),

    #[error("synthesis rejected: {0}")]
    Rejected(String),
}

impl SynthesisError {
    /// Transport failures only; HTTP statuses are classified by the gateway.
    pub fn from_http(e: &reqwest::Error) -> Self {
        SynthesisError::Unavailable(e.to_string())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("delivery failed: {0}")]
pub struct DeliveryError(pub String);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variables: {}", .0.join(", "))]
    MissingEnv(Vec<String>),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("reading config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Failures that end a run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PipelineError {
    /// Every query in the fan-out batch failed, or every record it
    /// returned was filtered out.
    #[error("NoCandidates")]
    NoCandidates,

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesis_transport_error_is_unavailable() {
        let e = reqwest::Client::new().get("not a url").build().unwrap_err();
        assert!(matches!(
            SynthesisError::from_http(&e),
            SynthesisError::Unavailable(_)
        ));
    }
}
