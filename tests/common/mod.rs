// tests/common/mod.rs
// Shared mocks for integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tech_digest::deliver::{DeliveryConfig, DeliverySink, MessageId};
use tech_digest::error::{DeliveryError, SourceError, SynthesisError};
use tech_digest::ingest::types::{Backend, Category, QuerySpec, RawRecord, SourceProvider};
use tech_digest::ingest::Sources;
use tech_digest::synth::{PromptConfig, SynthesisGateway, SynthesisRequest, SynthesisResult};
use tech_digest::{Orchestrator, SelectionPolicy};

type Scripted = (Duration, Result<Vec<RawRecord>, SourceError>);

/// Answers by query string, optionally after a delay.
#[derive(Default)]
pub struct ScriptedSource {
    script: HashMap<String, Scripted>,
    pub calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(mut self, query: &str, records: Vec<RawRecord>) -> Self {
        self.script
            .insert(query.to_string(), (Duration::ZERO, Ok(records)));
        self
    }

    pub fn ok_after(mut self, query: &str, delay_ms: u64, records: Vec<RawRecord>) -> Self {
        self.script.insert(
            query.to_string(),
            (Duration::from_millis(delay_ms), Ok(records)),
        );
        self
    }

    pub fn fail(mut self, query: &str, err: SourceError) -> Self {
        self.script
            .insert(query.to_string(), (Duration::ZERO, Err(err)));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceProvider for ScriptedSource {
    async fn search(&self, spec: &QuerySpec) -> Result<Vec<RawRecord>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (delay, out) = self
            .script
            .get(&spec.query)
            .cloned()
            .unwrap_or_else(|| {
                (
                    Duration::ZERO,
                    Err(SourceError::Unavailable(format!("unscripted {}", spec.query))),
                )
            });
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        out
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Fixed reply; records every prompt it was given.
pub struct MockGateway {
    reply: Result<SynthesisResult, SynthesisError>,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl MockGateway {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(SynthesisResult(text.to_string())),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: SynthesisError) -> Self {
        Self {
            reply: Err(err),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SynthesisGateway for MockGateway {
    async fn synthesize(&self, req: &SynthesisRequest) -> Result<SynthesisResult, SynthesisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(req.curation.text.clone());
        self.reply.clone()
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    pub subject: String,
    pub body: String,
    pub recipient: String,
}

#[derive(Default)]
pub struct MockSink {
    pub fail: bool,
    pub sent: Mutex<Vec<Sent>>,
}

impl MockSink {
    pub fn failing() -> Self {
        Self {
            fail: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl DeliverySink for MockSink {
    async fn deliver(
        &self,
        subject: &str,
        body: &str,
        recipient: &str,
    ) -> Result<MessageId, DeliveryError> {
        if self.fail {
            return Err(DeliveryError("smtp connection refused".into()));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(Sent {
            subject: subject.into(),
            body: body.into(),
            recipient: recipient.into(),
        });
        Ok(format!("<mock-{}@test>", sent.len()))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

pub fn rec(url: &str, rank: f64) -> RawRecord {
    RawRecord::new(format!("Story {url}"), url)
        .with_rank(rank)
        .with_content(format!("About {url}"))
}

pub fn spec(category: Category, query: &str) -> QuerySpec {
    QuerySpec::new(Backend::SearchApi, category, query)
}

pub fn sources(src: Arc<ScriptedSource>) -> Sources {
    Sources::new().with(Backend::SearchApi, src)
}

pub fn orchestrator(
    src: Arc<ScriptedSource>,
    queries: Vec<QuerySpec>,
    cap: usize,
    gateway: Arc<MockGateway>,
    sink: Arc<MockSink>,
) -> Orchestrator {
    Orchestrator {
        sources: sources(src),
        queries,
        policy: SelectionPolicy::with_cap(cap),
        prompt: PromptConfig::default(),
        gateway,
        sink,
        recipient: "reader@example.com".into(),
        delivery: DeliveryConfig::default(),
        min_chars: tech_digest::deliver::MIN_MEANINGFUL_CHARS,
    }
}
