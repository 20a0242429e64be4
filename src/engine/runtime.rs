// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::errors::{GateError, Result};
use crate::gate::Verdict;
use crate::sink::VerdictSink;

use super::core::CoreRuntime;
use super::{CoreCommand, RuntimeEvent};

/// Drives the gate aggregator in response to `RuntimeEvent`s, and delegates
/// verdict delivery to a `VerdictSink`.
///
/// This is a pure IO shell around `CoreRuntime`, which contains all the
/// aggregation semantics. This struct handles async IO: reading events from
/// channels and publishing the verdict.
pub struct Runtime<S: VerdictSink> {
    core: CoreRuntime,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    sink: S,
}

impl<S: VerdictSink> fmt::Debug for Runtime<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<S: VerdictSink> Runtime<S> {
    pub fn new(core: CoreRuntime, event_rx: mpsc::Receiver<RuntimeEvent>, sink: S) -> Self {
        Self {
            core,
            event_rx,
            sink,
        }
    }

    /// Main event loop.
    ///
    /// - Consumes `RuntimeEvent`s from `event_rx`.
    /// - Feeds them into the core runtime.
    /// - Executes commands returned by the core (publish verdict, exit).
    ///
    /// Returns the verdict once it is fixed. If the loop ends without one
    /// (feed closed or channel dropped while dependencies were still
    /// pending), this is an [`GateError::IncompleteFeed`] error — never a
    /// silent `Fail`.
    pub async fn run(mut self) -> Result<Verdict> {
        info!("pipegate runtime started");

        let mut verdict: Option<Verdict> = None;

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");

            // Feed the event into the pure core and get commands back.
            let step = self.core.step(event);

            // Execute the commands.
            for command in step.commands {
                match command {
                    CoreCommand::PublishVerdict(report) => {
                        verdict = Some(report.verdict());
                        self.sink.publish(report).await?;
                    }
                }
            }

            // If the core says to stop, break out of the loop.
            if !step.keep_running {
                info!("core requested exit; stopping runtime");
                break;
            }
        }

        info!("runtime exiting");

        match verdict {
            Some(v) => Ok(v),
            None => Err(GateError::IncompleteFeed {
                pending: self.core.pending_count(),
            }),
        }
    }
}
