// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod feed;
pub mod gate;
pub mod logging;
pub mod report;
pub mod sink;
pub mod types;

use std::path::PathBuf;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::PipelineFile;
use crate::engine::{CoreRuntime, Runtime, RuntimeEvent, RuntimeOptions};
use crate::errors::Result;
use crate::gate::{GateAggregator, JobGraph, Verdict};
use crate::sink::ConsoleSink;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - pipeline definition loading
/// - the gate aggregator / core runtime
/// - the outcome event feed (file or stdin)
/// - Ctrl-C handling (host cancellation)
///
/// Returns the fixed [`Verdict`]; the caller maps it to a process exit code.
pub async fn run(args: CliArgs) -> Result<Verdict> {
    let pipeline_path = PathBuf::from(&args.pipeline);
    let cfg = load_and_validate(&pipeline_path)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(Verdict::Pass);
    }

    let aggregator = GateAggregator::from_pipeline(&cfg)?;

    // Runtime event channel.
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    // Outcome feed: JSON-lines from a file, or stdin until end of stream.
    let feed_handle = match &args.events {
        Some(path) => {
            info!(path = %path, "reading outcome events from file");
            let file = tokio::fs::File::open(path).await?;
            feed::spawn_feed(file, rt_tx.clone())
        }
        None => {
            info!("reading outcome events from stdin");
            feed::spawn_feed(tokio::io::stdin(), rt_tx.clone())
        }
    };

    // Ctrl-C → host cancellation: in-flight cells become `Cancelled`.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    let options = RuntimeOptions::default();

    // Construct the pure core runtime (single owner of the outcome state).
    let core = CoreRuntime::new(aggregator, options);

    // Construct the async IO shell around the core.
    let runtime = Runtime::new(core, rt_rx, ConsoleSink::new());
    let verdict = runtime.run().await;

    // The verdict may be fixed while the feed is still blocked on stdin.
    feed_handle.abort();

    verdict
}

/// Simple dry-run output: print the gate, its dependencies and the job graph.
fn print_dry_run(cfg: &PipelineFile) {
    let graph = JobGraph::from_pipeline(cfg);

    println!("pipegate dry-run");
    println!("  gate: {}", cfg.gate.name);
    println!("  needs: {:?}", cfg.gate.needs);
    println!(
        "  config.conflict_policy = {:?}",
        cfg.config.conflict_policy
    );
    println!();

    println!("jobs ({}):", cfg.job.len());
    for (name, job) in cfg.job.iter() {
        println!("  - {name}");
        if let Some(matrix) = &job.matrix {
            println!("      matrix: {:?}", matrix);
        }
        if !job.needs.is_empty() {
            println!("      needs: {:?}", job.needs);
        }
        let dependents = graph.dependents_of(name);
        if !dependents.is_empty() {
            println!("      needed by: {:?}", dependents);
        }
        if cfg.gate.needs.iter().any(|n| n == name) {
            println!("      gated: yes");
        }
    }

    debug!("dry-run complete (no aggregation)");
}
