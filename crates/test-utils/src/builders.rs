#![allow(dead_code)]

use std::collections::BTreeMap;

use pipegate::config::{ConfigSection, GateSection, JobConfig, PipelineFile, RawPipelineFile};
use pipegate::types::ConflictPolicy;

/// Builder for `PipelineFile` to simplify test setup.
///
/// The gate's `needs` defaults to every added job, in insertion-independent
/// (name) order, unless overridden with [`PipelineFileBuilder::gate_needs`].
pub struct PipelineFileBuilder {
    raw: RawPipelineFile,
    explicit_needs: bool,
}

impl PipelineFileBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawPipelineFile {
                config: ConfigSection::default(),
                gate: GateSection::default(),
                job: BTreeMap::new(),
            },
            explicit_needs: false,
        }
    }

    pub fn with_job(mut self, name: &str, job: JobConfig) -> Self {
        self.raw.job.insert(name.to_string(), job);
        self
    }

    pub fn gate_name(mut self, name: &str) -> Self {
        self.raw.gate.name = name.to_string();
        self
    }

    pub fn gate_needs(mut self, needs: &[&str]) -> Self {
        self.raw.gate.needs = needs.iter().map(|s| s.to_string()).collect();
        self.explicit_needs = true;
        self
    }

    pub fn conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.raw.config.conflict_policy = policy;
        self
    }

    pub fn build_raw(mut self) -> RawPipelineFile {
        if !self.explicit_needs {
            self.raw.gate.needs = self.raw.job.keys().cloned().collect();
        }
        self.raw
    }

    pub fn build(self) -> PipelineFile {
        PipelineFile::try_from(self.build_raw())
            .expect("Failed to build valid pipeline from builder")
    }
}

impl Default for PipelineFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `JobConfig`.
pub struct JobConfigBuilder {
    job: JobConfig,
}

impl JobConfigBuilder {
    pub fn new() -> Self {
        Self {
            job: JobConfig {
                needs: vec![],
                matrix: None,
            },
        }
    }

    pub fn needs(mut self, dep: &str) -> Self {
        self.job.needs.push(dep.to_string());
        self
    }

    pub fn matrix(mut self, cells: &[&str]) -> Self {
        self.job.matrix = Some(cells.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn build(self) -> JobConfig {
        self.job
    }
}

impl Default for JobConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
