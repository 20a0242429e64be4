use std::str::FromStr;

use serde::Deserialize;

/// Behaviour when two *different* terminal outcomes are reported for the same
/// matrix cell.
///
/// - `LastWriteWins`: store the newer outcome (default behaviour). The
///   conflict is still logged and surfaced to the caller.
/// - `Reject`: keep the first terminal outcome; the conflicting write is
///   refused. The conflict is logged and surfaced either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    LastWriteWins,
    Reject,
}

impl Default for ConflictPolicy {
    fn default() -> Self {
        ConflictPolicy::LastWriteWins
    }
}

impl FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "last-write-wins" => Ok(ConflictPolicy::LastWriteWins),
            "reject" => Ok(ConflictPolicy::Reject),
            other => Err(format!(
                "invalid conflict_policy: {other} (expected \"last-write-wins\" or \"reject\")"
            )),
        }
    }
}
