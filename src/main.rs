//! Daily tech digest, one run per invocation.
//! Exit status is 0 for delivered/skipped runs and 1 for failed runs.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tech_digest::bootstrap::build_orchestrator;
use tech_digest::config::{secrets, DigestConfig, Secrets};

#[derive(Parser)]
#[command(name = "tech-digest")]
#[command(about = "Collect, curate and email the daily tech digest")]
struct Args {
    /// Path to digest.toml (default: $DIGEST_CONFIG_PATH, then config/digest.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the digest to stdout instead of sending email
    #[arg(long)]
    dry_run: bool,
}

/// RUST_LOG filter, default `tech_digest=info,warn`.
/// DIGEST_LOG_FORMAT=json switches to JSON lines.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tech_digest=info,warn"));

    let json = std::env::var("DIGEST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Load .env before anything reads the environment.
    secrets::load_dotenv();
    init_tracing();

    let cfg = match DigestConfig::load(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("tech-digest: config: {e}");
            return ExitCode::FAILURE;
        }
    };
    let secrets = match Secrets::from_env(&cfg, args.dry_run) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("tech-digest: config: {e}");
            return ExitCode::FAILURE;
        }
    };
    let orchestrator = match build_orchestrator(&cfg, &secrets, args.dry_run) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("tech-digest: setup: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let today = chrono::Local::now().date_naive();
    let outcome = orchestrator.run(today).await;
    if outcome.is_failure() {
        eprintln!("tech-digest: {outcome}");
    }
    ExitCode::from(outcome.exit_code())
}
