// src/deliver/mod.rs
pub mod email;
pub mod gate;

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DeliveryError;

pub use gate::{evaluate, GateDecision, MIN_MEANINGFUL_CHARS};

pub type MessageId = String;

#[async_trait::async_trait]
pub trait DeliverySink: Send + Sync {
    async fn deliver(
        &self,
        subject: &str,
        body: &str,
        recipient: &str,
    ) -> Result<MessageId, DeliveryError>;
    fn name(&self) -> &'static str;
}

pub type DynSink = Arc<dyn DeliverySink>;

/// `[delivery]` config section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    pub smtp_host: String,
    pub from_name: String,
    pub subject_prefix: String,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".into(),
            from_name: "Tech Digest".into(),
            subject_prefix: "[Daily Insight]".into(),
        }
    }
}

impl DeliveryConfig {
    pub fn subject_for(&self, date: NaiveDate) -> String {
        format!("{} {} Tech Report", self.subject_prefix, date.format("%Y-%m-%d"))
    }
}

/// Prints instead of sending; used by `--dry-run`.
pub struct StdoutSink;

#[async_trait::async_trait]
impl DeliverySink for StdoutSink {
    async fn deliver(
        &self,
        subject: &str,
        body: &str,
        recipient: &str,
    ) -> Result<MessageId, DeliveryError> {
        tracing::info!(subject, recipient, "dry run, not sending");
        println!("Subject: {subject}\n\n{body}");
        Ok(format!("<dry-run.{}@localhost>", chrono::Utc::now().timestamp()))
    }

    fn name(&self) -> &'static str {
        "stdout"
    }
}
