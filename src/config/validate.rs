// src/config/validate.rs

use std::collections::HashSet;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{PipelineFile, RawPipelineFile};
use crate::errors::{GateError, Result};

impl TryFrom<RawPipelineFile> for PipelineFile {
    type Error = crate::errors::GateError;

    fn try_from(raw: RawPipelineFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_pipeline(&raw)?;
        Ok(PipelineFile::new_unchecked(raw.config, raw.gate, raw.job))
    }
}

fn validate_raw_pipeline(cfg: &RawPipelineFile) -> Result<()> {
    ensure_has_jobs(cfg)?;
    validate_gate(cfg)?;
    validate_job_dependencies(cfg)?;
    validate_matrices(cfg)?;
    validate_dag(cfg)?;
    Ok(())
}

fn ensure_has_jobs(cfg: &RawPipelineFile) -> Result<()> {
    if cfg.job.is_empty() {
        return Err(GateError::ConfigError(
            "pipeline must contain at least one [job.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_gate(cfg: &RawPipelineFile) -> Result<()> {
    if cfg.gate.needs.is_empty() {
        return Err(GateError::ConfigError(format!(
            "no dependencies declared: gate '{}' must list at least one job in `needs`",
            cfg.gate.name
        )));
    }

    let mut seen = HashSet::new();
    for dep in cfg.gate.needs.iter() {
        if !cfg.job.contains_key(dep) {
            return Err(GateError::ConfigError(format!(
                "gate '{}' needs unknown job '{}'",
                cfg.gate.name, dep
            )));
        }
        if !seen.insert(dep) {
            return Err(GateError::ConfigError(format!(
                "gate '{}' lists job '{}' more than once in `needs`",
                cfg.gate.name, dep
            )));
        }
    }
    Ok(())
}

fn validate_job_dependencies(cfg: &RawPipelineFile) -> Result<()> {
    for (name, job) in cfg.job.iter() {
        for dep in job.needs.iter() {
            if !cfg.job.contains_key(dep) {
                return Err(GateError::ConfigError(format!(
                    "job '{}' has unknown dependency '{}' in `needs`",
                    name, dep
                )));
            }
            if dep == name {
                return Err(GateError::ConfigError(format!(
                    "job '{}' cannot depend on itself in `needs`",
                    name
                )));
            }
        }
    }
    Ok(())
}

fn validate_matrices(cfg: &RawPipelineFile) -> Result<()> {
    for (name, job) in cfg.job.iter() {
        let Some(cells) = &job.matrix else { continue };

        if cells.is_empty() {
            return Err(GateError::ConfigError(format!(
                "job '{}' declares an empty matrix; omit `matrix` for a single run",
                name
            )));
        }

        let mut seen = HashSet::new();
        for cell in cells {
            if cell.trim().is_empty() {
                return Err(GateError::ConfigError(format!(
                    "job '{}' has an empty matrix cell identifier",
                    name
                )));
            }
            if !seen.insert(cell.as_str()) {
                return Err(GateError::ConfigError(format!(
                    "job '{}' lists matrix cell '{}' more than once",
                    name, cell
                )));
            }
        }
    }
    Ok(())
}

fn validate_dag(cfg: &RawPipelineFile) -> Result<()> {
    // Build a simple petgraph graph from the jobs and their dependencies.
    //
    // Edge direction: dep -> job
    // For:
    //   [job.lint]
    //   needs = ["test"]
    // we add edge test -> lint.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in cfg.job.keys() {
        graph.add_node(name.as_str());
    }

    for (name, job) in cfg.job.iter() {
        for dep in job.needs.iter() {
            graph.add_edge(dep.as_str(), name.as_str(), ());
        }
    }

    // A topological sort will fail if there is a cycle.
    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => {
            let node = cycle.node_id();
            Err(GateError::DagCycle(format!(
                "cycle detected in job graph involving job '{}'",
                node
            )))
        }
    }
}
