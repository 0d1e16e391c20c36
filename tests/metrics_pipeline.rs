// tests/metrics_pipeline.rs
#![cfg(feature = "strict-metrics")]
mod common;

use std::sync::Arc;

use chrono::NaiveDate;
use common::{orchestrator, rec, spec, MockGateway, MockSink, ScriptedSource};
use metrics_exporter_prometheus::PrometheusBuilder;
use tech_digest::error::SourceError;
use tech_digest::Category;

#[tokio::test]
async fn run_exposes_pipeline_series() {
    let handle = PrometheusBuilder::new().install_recorder().expect("recorder");

    let src = Arc::new(
        ScriptedSource::new()
            .ok(
                "q1",
                vec![rec("https://a.test", 2.0), rec("https://a.test/", 1.0)],
            )
            .fail("q2", SourceError::Timeout("20s".into())),
    );
    let gateway = Arc::new(MockGateway::replying(
        "[Tech TOP 1]\n\nA story worth reading today.\nhttps://a.test",
    ));
    let orch = orchestrator(
        src,
        vec![spec(Category::Global, "q1"), spec(Category::News, "q2")],
        5,
        gateway,
        Arc::new(MockSink::default()),
    );
    let _ = orch.run(NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()).await;

    let out = handle.render();
    assert!(out.contains("digest_records_total"));
    assert!(out.contains("digest_source_errors_total"));
    assert!(out.contains("digest_invalid_total"));
    assert!(out.contains("digest_dedup_total"));
    assert!(out.contains("digest_selected_total"));
    assert!(out.contains(r#"digest_runs_total{outcome="delivered"}"#));
}
