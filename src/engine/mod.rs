// src/engine/mod.rs

//! Aggregation engine for pipegate.
//!
//! This module ties together:
//! - the gate outcome aggregator
//! - the main runtime event loop that reacts to:
//!   - outcome events from finishing jobs
//!   - the event feed closing
//!   - host cancellation (shutdown signals)
//!
//! Outcomes for distinct `(job, cell)` pairs may arrive concurrently from
//! many finishing jobs; they are serialized through an mpsc channel into a
//! single owner, so writes and verdict reads never race and the verdict is
//! always computed against a consistent snapshot.
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use crate::gate::JobOutcome;

/// Canonical job name type used throughout the engine.
pub type JobName = String;

/// Canonical matrix cell name type used throughout the engine.
pub type CellName = String;

/// Runtime options used by both the core and the async shell.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    /// If true, a shutdown request marks every still-pending cell as
    /// `Cancelled` and the verdict is computed from the resulting state
    /// (which fails the gate). If false, shutdown stops the runtime without
    /// a verdict.
    pub cancel_in_flight_on_shutdown: bool,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            cancel_in_flight_on_shutdown: true,
        }
    }
}

/// Events flowing into the runtime from the feed, signal handlers, etc.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// One upstream job finished (or progressed) in one matrix cell.
    OutcomeReported {
        job: JobName,
        /// May be omitted for non-matrix jobs.
        cell: Option<CellName>,
        outcome: JobOutcome,
    },
    /// The outcome event feed reached end of stream.
    FeedClosed,
    /// Host cancellation requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod core;
pub mod event_handlers;
pub mod runtime;

pub use core::CoreRuntime;
pub use event_handlers::{CoreCommand, CoreStep};
pub use runtime::Runtime;
