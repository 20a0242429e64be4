// src/feed.rs

//! JSON-lines outcome event feed.
//!
//! The host scheduler reports job completions as one JSON object per line:
//!
//! ```json
//! {"job": "test", "cell": "ubuntu-stable", "outcome": "succeeded"}
//! {"job": "lint", "outcome": "skipped"}
//! ```
//!
//! `cell` may be omitted for non-matrix jobs. A reader task forwards parsed
//! events into the runtime channel; end of stream becomes
//! [`RuntimeEvent::FeedClosed`]. A malformed line is a feed error — no
//! outcome event is ever silently dropped.

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::engine::{CellName, JobName, RuntimeEvent};
use crate::errors::{GateError, Result};
use crate::gate::JobOutcome;

/// One outcome event as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeEvent {
    pub job: JobName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell: Option<CellName>,
    pub outcome: JobOutcome,
}

/// Parse one line of the event feed.
pub fn parse_event(line: &str) -> Result<OutcomeEvent> {
    serde_json::from_str(line)
        .map_err(|e| GateError::MalformedEvent(format!("{line:?}: {e}")))
}

/// Spawn a task that reads JSON-lines events from `reader` and forwards them
/// into the runtime channel.
///
/// Blank lines are skipped. On end of stream the task sends `FeedClosed` and
/// returns `Ok`; on a malformed line it sends `FeedClosed` and returns the
/// parse error so the caller can surface it.
pub fn spawn_feed<R>(reader: R, tx: mpsc::Sender<RuntimeEvent>) -> JoinHandle<Result<()>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "failed to read from event feed");
                    let _ = tx.send(RuntimeEvent::FeedClosed).await;
                    return Err(e.into());
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            let event = match parse_event(&line) {
                Ok(ev) => ev,
                Err(e) => {
                    warn!(error = %e, "malformed line in event feed");
                    let _ = tx.send(RuntimeEvent::FeedClosed).await;
                    return Err(e);
                }
            };

            debug!(job = %event.job, cell = ?event.cell, outcome = %event.outcome, "feed event");

            let forwarded = tx
                .send(RuntimeEvent::OutcomeReported {
                    job: event.job,
                    cell: event.cell,
                    outcome: event.outcome,
                })
                .await;

            if forwarded.is_err() {
                // Runtime already stopped (verdict fixed); nothing left to do.
                debug!("runtime channel closed; stopping feed reader");
                return Ok(());
            }
        }

        let _ = tx.send(RuntimeEvent::FeedClosed).await;
        Ok(())
    })
}
