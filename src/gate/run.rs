// src/gate/run.rs

//! Per-run outcome state for the gate.

use std::collections::{BTreeMap, HashMap};

use crate::engine::{CellName, JobName};
use crate::gate::outcome::{JobOutcome, Verdict};

/// Cell name used for jobs that are not matrix-expanded.
pub const SINGLE_CELL: &str = "default";

/// Read-only phase of a pipeline run.
///
/// `Collecting` is entered at creation. `Ready` is an observation, not a
/// latch: the run is `Ready` the moment every declared cell has a terminal
/// outcome, and stays recordable until the verdict is computed. No transition
/// leaves `Terminal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Collecting,
    Ready,
    Terminal,
}

/// Outcome state for one declared gate dependency.
///
/// A matrix-expanded job holds one slot per declared cell; a plain job holds
/// a single slot named [`SINGLE_CELL`]. Cells that have never reported are
/// treated as `Pending` — the aggregator never collapses a node to a single
/// scalar, so a lone failing cell is always visible.
#[derive(Debug, Clone)]
pub struct NodeRun {
    name: JobName,
    cells: Vec<CellName>,
    outcomes: HashMap<CellName, JobOutcome>,
}

impl NodeRun {
    pub(crate) fn new(name: JobName, cells: Vec<CellName>) -> Self {
        Self {
            name,
            cells,
            outcomes: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared cells, in declaration order.
    pub fn cells(&self) -> &[CellName] {
        &self.cells
    }

    /// Whether this node has exactly one (implicit) cell.
    pub fn is_single(&self) -> bool {
        self.cells.len() == 1 && self.cells[0] == SINGLE_CELL
    }

    pub fn has_cell(&self, cell: &str) -> bool {
        self.cells.iter().any(|c| c == cell)
    }

    /// Current outcome of a cell; `Pending` if nothing has been recorded.
    pub fn outcome_of(&self, cell: &str) -> JobOutcome {
        self.outcomes
            .get(cell)
            .copied()
            .unwrap_or(JobOutcome::Pending)
    }

    pub(crate) fn set_outcome(&mut self, cell: &str, outcome: JobOutcome) {
        self.outcomes.insert(cell.to_string(), outcome);
    }

    /// Whether every declared cell has a terminal outcome.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|c| self.outcome_of(c).is_terminal())
    }

    fn pending_cells(&self) -> impl Iterator<Item = &CellName> {
        self.cells
            .iter()
            .filter(|c| !self.outcome_of(c).is_terminal())
    }
}

/// One pipeline execution: per-node outcome sets plus the (eventually fixed)
/// verdict.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    nodes: BTreeMap<JobName, NodeRun>,
    verdict: Option<Verdict>,
}

impl PipelineRun {
    pub(crate) fn new(nodes: BTreeMap<JobName, NodeRun>) -> Self {
        Self {
            nodes,
            verdict: None,
        }
    }

    pub fn node(&self, job: &str) -> Option<&NodeRun> {
        self.nodes.get(job)
    }

    pub(crate) fn node_mut(&mut self, job: &str) -> Option<&mut NodeRun> {
        self.nodes.get_mut(job)
    }

    /// Declared dependency nodes, in name order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeRun> {
        self.nodes.values()
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut NodeRun> {
        self.nodes.values_mut()
    }

    /// True exactly when every declared node has a terminal outcome for every
    /// one of its cells.
    pub fn is_ready(&self) -> bool {
        self.nodes.values().all(|n| n.is_complete())
    }

    /// `(job, cell)` pairs that have not yet reported a terminal outcome.
    pub fn pending_cells(&self) -> Vec<(JobName, CellName)> {
        self.nodes
            .values()
            .flat_map(|n| {
                n.pending_cells()
                    .map(|c| (n.name.clone(), c.clone()))
            })
            .collect()
    }

    pub fn phase(&self) -> RunPhase {
        if self.verdict.is_some() {
            RunPhase::Terminal
        } else if self.is_ready() {
            RunPhase::Ready
        } else {
            RunPhase::Collecting
        }
    }

    /// Fixed verdict, once the run is terminal.
    pub fn verdict(&self) -> Option<Verdict> {
        self.verdict
    }

    pub(crate) fn set_verdict(&mut self, verdict: Verdict) {
        debug_assert!(self.verdict.is_none());
        self.verdict = Some(verdict);
    }
}
