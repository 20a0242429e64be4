// src/errors.rs

//! Crate-wide error types and helpers.

use thiserror::Error;

use crate::gate::JobOutcome;

#[derive(Error, Debug)]
pub enum GateError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Cycle detected in job graph: {0}")]
    DagCycle(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("outcome reported for unknown job '{0}'")]
    UnknownJob(String),

    #[error("outcome reported for unknown matrix cell '{cell}' of job '{job}'")]
    UnknownCell { job: String, cell: String },

    #[error("outcome for matrix job '{0}' is missing a cell identifier")]
    MissingCell(String),

    #[error(
        "verdict requested before all gate dependencies reported ({pending} cells still pending)"
    )]
    NotReady { pending: usize },

    #[error("outcome for '{job}/{cell}' reported after the verdict was fixed")]
    LateReport { job: String, cell: String },

    #[error("conflicting terminal outcomes for '{job}/{cell}': {previous} then {attempted}")]
    InconsistentWrite {
        job: String,
        cell: String,
        previous: JobOutcome,
        attempted: JobOutcome,
    },

    #[error("event feed ended before all gate dependencies reported ({pending} cells still pending)")]
    IncompleteFeed { pending: usize },

    #[error("malformed outcome event: {0}")]
    MalformedEvent(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, GateError>;
