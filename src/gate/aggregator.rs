// src/gate/aggregator.rs

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, info, warn};

use crate::config::model::PipelineFile;
use crate::engine::{CellName, JobName};
use crate::errors::{GateError, Result};
use crate::gate::outcome::{JobOutcome, Verdict};
use crate::gate::run::{NodeRun, PipelineRun, RunPhase, SINGLE_CELL};
use crate::report::VerdictReport;
use crate::types::ConflictPolicy;

/// The outcome aggregator behind one gating job.
///
/// It owns the per-run outcome state for every job the gate requires and is
/// responsible for:
/// - recording per-cell outcomes as upstream jobs finish
/// - deciding when the run is ready for aggregation (no `Pending` left)
/// - computing the verdict exactly once, with strict-conjunction semantics
/// - refusing writes once the verdict is fixed
#[derive(Debug)]
pub struct GateAggregator {
    gate_name: String,
    policy: ConflictPolicy,
    run: PipelineRun,
    /// Jobs declared in the pipeline but not required by the gate. Outcomes
    /// for these are acknowledged and ignored rather than treated as errors.
    non_gated: HashSet<JobName>,
}

impl GateAggregator {
    /// Construct an aggregator from a validated [`PipelineFile`].
    ///
    /// The required dependency set is the gate's `needs` list; per-node cell
    /// lists come from each job's `matrix` declaration.
    pub fn from_pipeline(cfg: &PipelineFile) -> Result<Self> {
        let deps = cfg
            .gate
            .needs
            .iter()
            .map(|name| {
                let cells = cfg
                    .job
                    .get(name)
                    .map(|j| j.cells())
                    .unwrap_or_else(|| vec![SINGLE_CELL.to_string()]);
                (name.clone(), cells)
            })
            .collect::<Vec<_>>();

        let non_gated = cfg
            .job
            .keys()
            .filter(|name| !cfg.gate.needs.contains(name))
            .cloned()
            .collect();

        let mut agg = Self::new(&cfg.gate.name, cfg.config.conflict_policy, deps)?;
        agg.non_gated = non_gated;
        Ok(agg)
    }

    /// Register the gate's dependency set directly.
    ///
    /// Each entry is a job name plus its declared matrix cells; an empty cell
    /// list means a plain (non-matrix) job. An empty dependency set is a
    /// configuration error: a gate with nothing to wait for gates nothing.
    pub fn new(
        gate_name: &str,
        policy: ConflictPolicy,
        deps: Vec<(JobName, Vec<CellName>)>,
    ) -> Result<Self> {
        if deps.is_empty() {
            return Err(GateError::ConfigError(format!(
                "gate '{gate_name}' declares no dependencies"
            )));
        }

        let mut nodes = BTreeMap::new();
        for (name, cells) in deps {
            let cells = if cells.is_empty() {
                vec![SINGLE_CELL.to_string()]
            } else {
                cells
            };
            if nodes
                .insert(name.clone(), NodeRun::new(name.clone(), cells))
                .is_some()
            {
                return Err(GateError::ConfigError(format!(
                    "gate '{gate_name}' lists dependency '{name}' more than once"
                )));
            }
        }

        debug!(
            gate = %gate_name,
            deps = nodes.len(),
            "gate dependencies registered"
        );

        Ok(Self {
            gate_name: gate_name.to_string(),
            policy,
            run: PipelineRun::new(nodes),
            non_gated: HashSet::new(),
        })
    }

    pub fn gate_name(&self) -> &str {
        &self.gate_name
    }

    /// Read-only view of the run state.
    pub fn run(&self) -> &PipelineRun {
        &self.run
    }

    /// Current phase: `Collecting`, `Ready` or `Terminal`.
    pub fn current_state(&self) -> RunPhase {
        self.run.phase()
    }

    /// True exactly when every required job has a terminal outcome for every
    /// one of its matrix cells.
    pub fn is_ready(&self) -> bool {
        self.run.is_ready()
    }

    /// The fixed verdict, if the run is terminal.
    pub fn verdict(&self) -> Option<Verdict> {
        self.run.verdict()
    }

    /// Store one outcome for one matrix cell of one job.
    ///
    /// `cell` may be omitted for non-matrix jobs. Recording is idempotent per
    /// `(job, cell)` pair; a recorded terminal outcome is only overwritten by
    /// another terminal outcome, and only under the last-write-wins conflict
    /// policy — the conflict is logged and surfaced either way. Recording
    /// after the verdict is fixed is a [`GateError::LateReport`]; the verdict
    /// is never revised.
    pub fn record_outcome(
        &mut self,
        job: &str,
        cell: Option<&str>,
        outcome: JobOutcome,
    ) -> Result<()> {
        if self.run.phase() == RunPhase::Terminal {
            warn!(
                gate = %self.gate_name,
                job,
                cell = cell.unwrap_or(SINGLE_CELL),
                %outcome,
                "outcome reported after the verdict was fixed; ignoring"
            );
            return Err(GateError::LateReport {
                job: job.to_string(),
                cell: cell.unwrap_or(SINGLE_CELL).to_string(),
            });
        }

        let Some(node) = self.run.node_mut(job) else {
            if self.non_gated.contains(job) {
                debug!(
                    gate = %self.gate_name,
                    job,
                    %outcome,
                    "outcome for job outside the gate's dependency set; acknowledged"
                );
                return Ok(());
            }
            return Err(GateError::UnknownJob(job.to_string()));
        };

        let cell = match cell {
            Some(c) if node.has_cell(c) => c,
            Some(c) => {
                return Err(GateError::UnknownCell {
                    job: job.to_string(),
                    cell: c.to_string(),
                });
            }
            None if node.is_single() => SINGLE_CELL,
            None => return Err(GateError::MissingCell(job.to_string())),
        };

        let previous = node.outcome_of(cell);

        if !previous.is_terminal() {
            node.set_outcome(cell, outcome);
            debug!(
                gate = %self.gate_name,
                job,
                cell,
                %outcome,
                "outcome recorded"
            );
            return Ok(());
        }

        if previous == outcome {
            debug!(
                gate = %self.gate_name,
                job,
                cell,
                %outcome,
                "identical outcome re-reported; no-op"
            );
            return Ok(());
        }

        // A terminal outcome is only replaced by another terminal outcome.
        if outcome.is_terminal() && self.policy == ConflictPolicy::LastWriteWins {
            node.set_outcome(cell, outcome);
            warn!(
                gate = %self.gate_name,
                job,
                cell,
                %previous,
                attempted = %outcome,
                "conflicting terminal outcomes; keeping the newer value"
            );
        } else {
            warn!(
                gate = %self.gate_name,
                job,
                cell,
                %previous,
                attempted = %outcome,
                "conflicting write refused; keeping the original outcome"
            );
        }

        Err(GateError::InconsistentWrite {
            job: job.to_string(),
            cell: cell.to_string(),
            previous,
            attempted: outcome,
        })
    }

    /// Mark every cell that has not reported a terminal outcome as
    /// `Cancelled`.
    ///
    /// Used when the host platform cancels the whole pipeline run: in-flight
    /// jobs surface as `Cancelled`, which yields a `Fail` verdict once
    /// readiness is reached. Returns the number of cells affected; a no-op on
    /// a terminal run.
    pub fn cancel_in_flight(&mut self) -> usize {
        if self.run.phase() == RunPhase::Terminal {
            return 0;
        }

        let mut cancelled = 0;
        for node in self.run.nodes_mut() {
            let cells: Vec<CellName> = node.cells().to_vec();
            for cell in cells {
                if !node.outcome_of(&cell).is_terminal() {
                    node.set_outcome(&cell, JobOutcome::Cancelled);
                    cancelled += 1;
                }
            }
        }

        if cancelled > 0 {
            info!(
                gate = %self.gate_name,
                cancelled,
                "pipeline cancellation: in-flight cells marked cancelled"
            );
        }

        cancelled
    }

    /// Compute the verdict from the completed run state.
    ///
    /// Strict conjunction: `Pass` iff every cell of every required job is
    /// `Succeeded`; `Failed`, `Skipped` and `Cancelled` all gate the pipeline
    /// to `Fail`. Requires readiness ([`GateError::NotReady`] otherwise).
    /// Idempotent on a terminal run: returns the stored verdict with no side
    /// effect.
    pub fn compute_verdict(&mut self) -> Result<Verdict> {
        if let Some(verdict) = self.run.verdict() {
            debug!(gate = %self.gate_name, %verdict, "verdict already fixed");
            return Ok(verdict);
        }

        let pending = self.run.pending_cells();
        if !pending.is_empty() {
            return Err(GateError::NotReady {
                pending: pending.len(),
            });
        }

        // Scan every cell of every node; a matrix node is never collapsed to
        // a single scalar first, so a lone failing cell is always seen.
        let mut verdict = Verdict::Pass;
        for node in self.run.nodes() {
            for cell in node.cells() {
                let outcome = node.outcome_of(cell);
                if outcome != JobOutcome::Succeeded {
                    warn!(
                        gate = %self.gate_name,
                        job = %node.name(),
                        cell = %cell,
                        %outcome,
                        "non-success outcome gates the pipeline to fail"
                    );
                    verdict = Verdict::Fail;
                }
            }
        }

        self.run.set_verdict(verdict);
        info!(gate = %self.gate_name, %verdict, "verdict fixed");
        Ok(verdict)
    }

    /// Build the per-node outcome report for a terminal run.
    pub fn report(&self) -> Result<VerdictReport> {
        let Some(verdict) = self.run.verdict() else {
            return Err(GateError::NotReady {
                pending: self.run.pending_cells().len(),
            });
        };
        Ok(VerdictReport::from_run(&self.gate_name, verdict, &self.run))
    }
}
