// src/gate/graph.rs

use std::collections::HashMap;

use crate::config::model::PipelineFile;

/// Internal node structure: stores immediate deps and dependents.
#[derive(Debug, Clone)]
struct JobGraphNode {
    /// Direct dependencies: jobs listed in this job's `needs`.
    needs: Vec<String>,
    /// Direct dependents: jobs that list this one in their `needs`.
    dependents: Vec<String>,
}

/// Simple in-memory adjacency view of the declared job graph.
///
/// This is intentionally lightweight; acyclicity is already validated in
/// `config::validate`, so here we just keep adjacency information for
/// diagnostics and dry-run output.
#[derive(Debug, Clone)]
pub struct JobGraph {
    nodes: HashMap<String, JobGraphNode>,
}

impl JobGraph {
    /// Build the adjacency view from a validated [`PipelineFile`].
    ///
    /// Assumes that:
    /// - all `needs` references are valid
    /// - there are no cycles
    pub fn from_pipeline(cfg: &PipelineFile) -> Self {
        let mut nodes: HashMap<String, JobGraphNode> = HashMap::new();

        // First pass: create nodes with their dependency lists.
        for (name, job) in cfg.job.iter() {
            nodes.insert(
                name.clone(),
                JobGraphNode {
                    needs: job.needs.clone(),
                    dependents: Vec::new(),
                },
            );
        }

        // Second pass: populate dependents based on needs.
        let job_names: Vec<String> = nodes.keys().cloned().collect();
        for job_name in job_names {
            let needs = nodes
                .get(&job_name)
                .map(|n| n.needs.clone())
                .unwrap_or_default();

            for dep in needs {
                if let Some(dep_node) = nodes.get_mut(&dep) {
                    dep_node.dependents.push(job_name.clone());
                }
            }
        }

        Self { nodes }
    }

    /// Return all job names.
    pub fn jobs(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|s| s.as_str())
    }

    /// Immediate dependencies of a job (the jobs listed in its `needs`).
    pub fn needs_of(&self, name: &str) -> &[String] {
        self.nodes
            .get(name)
            .map(|n| n.needs.as_slice())
            .unwrap_or(&[])
    }

    /// Immediate dependents of a job (jobs that list this one in their `needs`).
    pub fn dependents_of(&self, name: &str) -> &[String] {
        self.nodes
            .get(name)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }
}
