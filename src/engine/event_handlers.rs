// src/engine/event_handlers.rs

//! Event handling logic for the core runtime.

use tracing::warn;

use crate::engine::{CellName, JobName, RuntimeOptions};
use crate::errors::GateError;
use crate::gate::{GateAggregator, JobOutcome};
use crate::report::VerdictReport;

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone)]
pub enum CoreCommand {
    /// Deliver the fixed verdict to the sink.
    PublishVerdict(VerdictReport),
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug, Clone)]
pub struct CoreStep {
    /// Commands the IO shell should execute.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    fn keep() -> Self {
        Self {
            commands: Vec::new(),
            keep_running: true,
        }
    }
}

/// Handle one outcome event.
///
/// Recording errors are internal-consistency signals for the host's logs,
/// not reasons to abort the run: a late report never revises the verdict, an
/// inconsistent write has already been resolved per the conflict policy, and
/// an unknown job/cell leaves state untouched. After recording, the verdict
/// is computed as soon as the aggregator becomes ready.
pub fn handle_outcome_reported(
    aggregator: &mut GateAggregator,
    job: JobName,
    cell: Option<CellName>,
    outcome: JobOutcome,
) -> CoreStep {
    match aggregator.record_outcome(&job, cell.as_deref(), outcome) {
        Ok(()) => {}
        Err(GateError::LateReport { .. }) => {
            // Logged by the aggregator; the verdict stays fixed.
            return CoreStep::keep();
        }
        Err(e @ GateError::InconsistentWrite { .. }) => {
            warn!(error = %e, "data inconsistency in outcome stream");
        }
        Err(e) => {
            warn!(error = %e, "outcome event rejected");
        }
    }

    maybe_finalize(aggregator)
}

/// Handle the event feed closing.
///
/// If every gate dependency has reported, the verdict is published; an
/// incomplete run stops without a verdict and is surfaced by the runtime as
/// an error, never as a silent `Fail`.
pub fn handle_feed_closed(aggregator: &mut GateAggregator) -> CoreStep {
    let mut step = maybe_finalize(aggregator);
    step.keep_running = false;
    step
}

/// Handle a host cancellation request.
///
/// The aggregator has no timeout logic of its own: cancellation surfaces as
/// a `Cancelled` outcome for every in-flight cell, which fails the gate once
/// readiness is reached.
pub fn handle_shutdown(aggregator: &mut GateAggregator, options: &RuntimeOptions) -> CoreStep {
    if options.cancel_in_flight_on_shutdown {
        aggregator.cancel_in_flight();
    }

    let mut step = maybe_finalize(aggregator);
    step.keep_running = false;
    step
}

/// Compute and publish the verdict if (and only if) the run just became
/// ready. A terminal run publishes nothing: the verdict went out when it was
/// fixed.
fn maybe_finalize(aggregator: &mut GateAggregator) -> CoreStep {
    if !aggregator.is_ready() || aggregator.verdict().is_some() {
        return CoreStep::keep();
    }

    match aggregator.compute_verdict().and_then(|_| aggregator.report()) {
        Ok(report) => CoreStep {
            commands: vec![CoreCommand::PublishVerdict(report)],
            keep_running: false,
        },
        Err(e) => {
            // Unreachable once is_ready() holds; surface it rather than hide it.
            warn!(error = %e, "verdict computation failed on a ready run");
            CoreStep::keep()
        }
    }
}
