//! Version Matrix Action: CI entry point
//!
//! Reads the app manifest, resolves which server branches and PHP versions
//! the app supports, and publishes the resulting job matrices as action
//! outputs.
//!
//! # Example
//!
//! ```ignore
//! use vmatrix_action::{MatrixRunner, RunContext, HttpTransport, AptCache};
//! use vmatrix_core::MemorySink;
//!
//! let transport = HttpTransport::new()?;
//! let index = AptCache::default();
//! let mut sink = MemorySink::new();
//!
//! let report = MatrixRunner::new(&transport, &index)
//!     .run(&RunContext::new("appinfo/info.xml"), &mut sink)
//!     .await?;
//! println!("{}", sink.get("sparse-matrix").unwrap());
//! ```

pub mod config;
pub mod context;
pub mod manifest;
pub mod output;
pub mod runner;
pub mod transport;

pub use config::Cli;
pub use context::RunContext;
pub use output::GithubOutput;
pub use runner::{MatrixRunner, RunReport, StepTiming};
pub use transport::{AptCache, HttpTransport};

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vmatrix_core::OutputSink;

/// Install the stderr log subscriber; `RUST_LOG` overrides `verbose`.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Run against the real network and package index.
pub async fn run(cli: &Cli, sink: &mut dyn OutputSink) -> anyhow::Result<RunReport> {
    let ctx = RunContext::from_cli(cli).context("invalid action input")?;
    let transport = HttpTransport::new()?;
    let index = AptCache::default();

    let report = MatrixRunner::new(&transport, &index).run(&ctx, sink).await?;
    for step in &report.steps {
        tracing::debug!(step = step.id, latency_ms = step.latency_ms, "timing");
    }
    Ok(report)
}
