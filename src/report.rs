// src/report.rs

//! Human-readable verdict reporting.

use std::fmt;

use serde::Serialize;

use crate::engine::{CellName, JobName};
use crate::gate::outcome::{JobOutcome, Verdict};
use crate::gate::run::PipelineRun;

/// Outcome of one matrix cell, for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct CellReport {
    pub cell: CellName,
    pub outcome: JobOutcome,
}

/// Per-cell outcomes for one gate dependency.
#[derive(Debug, Clone, Serialize)]
pub struct NodeReport {
    pub job: JobName,
    pub cells: Vec<CellReport>,
}

/// The fixed verdict plus the full outcome table it was computed from.
#[derive(Debug, Clone, Serialize)]
pub struct VerdictReport {
    gate: String,
    verdict: Verdict,
    nodes: Vec<NodeReport>,
}

impl VerdictReport {
    pub(crate) fn from_run(gate: &str, verdict: Verdict, run: &PipelineRun) -> Self {
        let nodes = run
            .nodes()
            .map(|node| NodeReport {
                job: node.name().to_string(),
                cells: node
                    .cells()
                    .iter()
                    .map(|cell| CellReport {
                        cell: cell.clone(),
                        outcome: node.outcome_of(cell),
                    })
                    .collect(),
            })
            .collect();

        Self {
            gate: gate.to_string(),
            verdict,
            nodes,
        }
    }

    pub fn gate(&self) -> &str {
        &self.gate
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn nodes(&self) -> &[NodeReport] {
        &self.nodes
    }

    /// Every `(job, cell, outcome)` that gated the pipeline to fail.
    pub fn failing_cells(&self) -> Vec<(&str, &str, JobOutcome)> {
        self.nodes
            .iter()
            .flat_map(|node| {
                node.cells
                    .iter()
                    .filter(|c| c.outcome != JobOutcome::Succeeded)
                    .map(|c| (node.job.as_str(), c.cell.as_str(), c.outcome))
            })
            .collect()
    }
}

impl fmt::Display for VerdictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "gate '{}': {}",
            self.gate,
            match self.verdict {
                Verdict::Pass => "PASS",
                Verdict::Fail => "FAIL",
            }
        )?;

        for node in &self.nodes {
            writeln!(f, "  {}", node.job)?;
            for cell in &node.cells {
                writeln!(f, "    {:<24} {}", cell.cell, cell.outcome)?;
            }
        }

        let failing = self.failing_cells();
        if !failing.is_empty() {
            writeln!(f, "  {} gating cell(s) not successful:", failing.len())?;
            for (job, cell, outcome) in failing {
                writeln!(f, "    {job}/{cell} ({outcome})")?;
            }
        }

        Ok(())
    }
}
