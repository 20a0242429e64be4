// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! This module contains a synchronous, deterministic "core runtime" that
//! consumes [`RuntimeEvent`]s and produces:
//! - an updated aggregator state
//! - a list of "commands" describing what the IO shell should do next
//!
//! The async/IO-heavy shell (`engine::runtime::Runtime`) is responsible for:
//! - reading events from channels
//! - delivering the verdict to a sink
//! - handling Ctrl+C / shutdown
//!
//! The core is intended to be extensively unit tested without any Tokio,
//! channels, or processes.

use crate::engine::event_handlers::{
    handle_feed_closed, handle_outcome_reported, handle_shutdown, CoreStep,
};
use crate::engine::{RuntimeEvent, RuntimeOptions};
use crate::gate::{GateAggregator, RunPhase, Verdict};

/// Pure core runtime state.
///
/// This owns:
/// - the gate aggregator
/// - runtime options (e.g. shutdown behaviour)
///
/// It has **no** channels, no Tokio types, and does not perform any IO.
#[derive(Debug)]
pub struct CoreRuntime {
    aggregator: GateAggregator,
    options: RuntimeOptions,
}

impl CoreRuntime {
    pub fn new(aggregator: GateAggregator, options: RuntimeOptions) -> Self {
        Self {
            aggregator,
            options,
        }
    }

    /// Expose readiness (for tests and diagnostics).
    pub fn is_ready(&self) -> bool {
        self.aggregator.is_ready()
    }

    /// Expose the run phase (for tests and diagnostics).
    pub fn current_state(&self) -> RunPhase {
        self.aggregator.current_state()
    }

    /// Expose the fixed verdict, if any.
    pub fn verdict(&self) -> Option<Verdict> {
        self.aggregator.verdict()
    }

    /// Number of `(job, cell)` pairs still pending.
    pub fn pending_count(&self) -> usize {
        self.aggregator.run().pending_cells().len()
    }

    /// Handle a single runtime event, updating core state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::OutcomeReported { job, cell, outcome } => {
                handle_outcome_reported(&mut self.aggregator, job, cell, outcome)
            }
            RuntimeEvent::FeedClosed => handle_feed_closed(&mut self.aggregator),
            RuntimeEvent::ShutdownRequested => {
                handle_shutdown(&mut self.aggregator, &self.options)
            }
        }
    }
}
