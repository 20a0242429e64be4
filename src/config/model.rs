// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::gate::SINGLE_CELL;
use crate::types::ConflictPolicy;

/// Top-level pipeline definition as read from a TOML file, before semantic
/// validation.
///
/// ```toml
/// [config]
/// conflict_policy = "last-write-wins"
///
/// [gate]
/// name = "tests-pass"
/// needs = ["test", "lint", "cross-check"]
///
/// [job.test]
/// matrix = ["ubuntu-stable", "ubuntu-beta", "macos-stable"]
///
/// [job.lint]
/// needs = ["test"]
///
/// [job.cross-check]
/// ```
///
/// Use [`PipelineFile::try_from`] (or `config::loader::load_and_validate`) to
/// obtain a validated [`PipelineFile`].
#[derive(Debug, Clone, Deserialize)]
pub struct RawPipelineFile {
    /// Global behaviour config from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// The gating job from `[gate]`.
    #[serde(default)]
    pub gate: GateSection,

    /// All upstream jobs from `[job.<name>]`.
    ///
    /// Keys are the job names (e.g. `"test"`, `"lint"`).
    #[serde(default)]
    pub job: BTreeMap<String, JobConfig>,
}

/// Validated pipeline definition.
///
/// Same shape as [`RawPipelineFile`]; constructing one outside of
/// `TryFrom<RawPipelineFile>` bypasses validation and is only meant for code
/// that has already established the invariants.
#[derive(Debug, Clone)]
pub struct PipelineFile {
    pub config: ConfigSection,
    pub gate: GateSection,
    pub job: BTreeMap<String, JobConfig>,
}

impl PipelineFile {
    pub fn new_unchecked(
        config: ConfigSection,
        gate: GateSection,
        job: BTreeMap<String, JobConfig>,
    ) -> Self {
        Self { config, gate, job }
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// What to do when two different terminal outcomes arrive for the same
    /// matrix cell. See [`ConflictPolicy`].
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            conflict_policy: ConflictPolicy::default(),
        }
    }
}

/// `[gate]` section: the final status job.
///
/// `needs` is the required dependency set — the jobs whose outcomes the gate
/// aggregates. It must be non-empty.
#[derive(Debug, Clone, Deserialize)]
pub struct GateSection {
    #[serde(default = "default_gate_name")]
    pub name: String,

    #[serde(default)]
    pub needs: Vec<String>,
}

fn default_gate_name() -> String {
    "gate".to_string()
}

impl Default for GateSection {
    fn default() -> Self {
        Self {
            name: default_gate_name(),
            needs: Vec::new(),
        }
    }
}

/// `[job.<name>]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobConfig {
    /// Jobs that must finish before this one starts (scheduling is the host
    /// platform's business; kept here for validation and diagnostics).
    #[serde(default)]
    pub needs: Vec<String>,

    /// Matrix cell identifiers this job fans out to.
    ///
    /// If `None`, the job is a single run. An explicit empty list is a
    /// configuration error.
    #[serde(default)]
    pub matrix: Option<Vec<String>>,
}

impl JobConfig {
    /// Whether this job is matrix-expanded.
    pub fn is_matrix(&self) -> bool {
        self.matrix.is_some()
    }

    /// Concrete cell identifiers this job produces outcomes for.
    ///
    /// A non-matrix job has a single implicit cell named
    /// [`SINGLE_CELL`](crate::gate::SINGLE_CELL).
    pub fn cells(&self) -> Vec<String> {
        match &self.matrix {
            Some(cells) => cells.clone(),
            None => vec![SINGLE_CELL.to_string()],
        }
    }
}
