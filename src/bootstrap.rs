// src/bootstrap.rs
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::{DigestConfig, Secrets};
use crate::deliver::{email::EmailSender, DynSink, StdoutSink};
use crate::ingest::providers::{geeknews::GeekNewsProvider, search_api::SearchApiProvider};
use crate::ingest::types::Backend;
use crate::ingest::Sources;
use crate::pipeline::Orchestrator;
use crate::synth::build_gateway;

/// Build the real adapters for `cfg`. Only backends some query uses are created.
pub fn build_sources(cfg: &DigestConfig, secrets: &Secrets) -> Result<Sources> {
    let timeout = Duration::from_secs(cfg.sources.timeout_secs);
    let mut sources = Sources::new();

    if cfg.uses_backend(Backend::Geeknews) {
        let p = GeekNewsProvider::http(timeout).context("building geeknews adapter")?;
        sources.register(Backend::Geeknews, Arc::new(p));
    }
    if cfg.uses_backend(Backend::SearchApi) {
        let key = secrets.search_api_key.clone().unwrap_or_default();
        let p = match cfg.sources.search_api_endpoint.as_deref() {
            Some(endpoint) => SearchApiProvider::http_with_endpoint(key, endpoint, timeout),
            None => SearchApiProvider::http(key, timeout),
        }
        .context("building search api adapter")?;
        sources.register(Backend::SearchApi, Arc::new(p));
    }
    Ok(sources)
}

pub fn build_orchestrator(
    cfg: &DigestConfig,
    secrets: &Secrets,
    dry_run: bool,
) -> Result<Orchestrator> {
    let sources = build_sources(cfg, secrets)?;
    let gateway = build_gateway(&cfg.synthesis, secrets.synthesis_api_key.clone())
        .context("building synthesis gateway")?;

    let sink: DynSink = match (&secrets.smtp, dry_run) {
        (Some(smtp), false) => Arc::new(
            EmailSender::new(&cfg.delivery, &smtp.user, &smtp.password)
                .context("building smtp sink")?,
        ),
        _ => Arc::new(StdoutSink),
    };

    // Safe diagnostics: provider names and counts only
    info!(
        queries = cfg.queries.len(),
        cap = cfg.selection.cap,
        floors = cfg.selection.floors.len(),
        synthesis = gateway.provider_name(),
        sink = sink.name(),
        "orchestrator ready"
    );

    Ok(Orchestrator {
        sources,
        queries: cfg.queries.clone(),
        policy: cfg.selection.clone(),
        prompt: cfg.prompt.clone(),
        gateway,
        sink,
        recipient: secrets.recipient.clone(),
        delivery: cfg.delivery.clone(),
        min_chars: cfg.gate.min_chars,
    })
}
