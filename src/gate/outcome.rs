// src/gate/outcome.rs

//! Outcome and verdict value types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Outcome of one concrete job run (one matrix cell).
///
/// `Pending` means the job is declared (or reported as in flight) but has not
/// finished yet. All other variants are terminal: once a job finishes, its
/// outcome never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobOutcome {
    Succeeded,
    Failed,
    Skipped,
    Cancelled,
    Pending,
}

impl JobOutcome {
    /// Whether this outcome is terminal (everything except `Pending`).
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobOutcome::Pending)
    }
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobOutcome::Succeeded => "succeeded",
            JobOutcome::Failed => "failed",
            JobOutcome::Skipped => "skipped",
            JobOutcome::Cancelled => "cancelled",
            JobOutcome::Pending => "pending",
        };
        f.write_str(s)
    }
}

impl FromStr for JobOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "succeeded" | "success" => Ok(JobOutcome::Succeeded),
            "failed" | "failure" => Ok(JobOutcome::Failed),
            "skipped" => Ok(JobOutcome::Skipped),
            "cancelled" | "canceled" => Ok(JobOutcome::Cancelled),
            "pending" => Ok(JobOutcome::Pending),
            other => Err(format!(
                "invalid outcome: {other} (expected succeeded, failed, skipped, cancelled or pending)"
            )),
        }
    }
}

/// Final result gating the whole pipeline.
///
/// `Pass` exactly when every outcome across every gate dependency (and every
/// matrix cell) is `Succeeded`. Any `Failed`, `Skipped` or `Cancelled`
/// outcome forces `Fail` — skip and cancel are deliberately *not* neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn is_pass(self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => f.write_str("pass"),
            Verdict::Fail => f.write_str("fail"),
        }
    }
}
