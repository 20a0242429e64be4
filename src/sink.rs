// src/sink.rs

//! Pluggable verdict sink abstraction.
//!
//! The runtime talks to a `VerdictSink` instead of printing directly. This
//! makes it easy to swap in a fake sink in tests while keeping the
//! production console output here.
//!
//! - `ConsoleSink` is the default implementation used by `pipegate`. It
//!   renders the report to stdout (logs go to stderr).
//! - Tests can provide their own `VerdictSink` that, for example, records
//!   published reports for assertions.

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::report::VerdictReport;

/// Trait abstracting how the fixed verdict is delivered.
///
/// Production code uses [`ConsoleSink`]; tests can provide their own
/// implementation that captures the report instead.
pub trait VerdictSink: Send {
    /// Deliver the verdict report.
    ///
    /// The implementation is free to:
    /// - print to the console (production)
    /// - record the report for later assertions (tests)
    fn publish(
        &mut self,
        report: VerdictReport,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Console sink used in production.
///
/// Prints the full outcome table to stdout; the process exit code is derived
/// from the returned verdict in `main`, not here.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

impl VerdictSink for ConsoleSink {
    fn publish(
        &mut self,
        report: VerdictReport,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            print!("{report}");
            Ok(())
        })
    }
}
