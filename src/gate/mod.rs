// src/gate/mod.rs

//! Gate state and verdict aggregation.
//!
//! - [`outcome`] defines the per-cell [`JobOutcome`] and final [`Verdict`].
//! - [`graph`] holds a simple adjacency view of the declared job graph.
//! - [`run`] contains the per-run outcome state machine
//!   (`Collecting → Ready → Terminal`).
//! - [`aggregator`] implements the strict-conjunction outcome aggregator
//!   behind the gating job.

pub mod aggregator;
pub mod graph;
pub mod outcome;
pub mod run;

pub use aggregator::GateAggregator;
pub use graph::JobGraph;
pub use outcome::{JobOutcome, Verdict};
pub use run::{NodeRun, PipelineRun, RunPhase, SINGLE_CELL};
