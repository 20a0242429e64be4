use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use pipegate::errors::Result;
use pipegate::report::VerdictReport;
use pipegate::sink::VerdictSink;

/// A fake sink that records every published report for assertions.
pub struct FakeSink {
    published: Arc<Mutex<Vec<VerdictReport>>>,
}

impl FakeSink {
    pub fn new(published: Arc<Mutex<Vec<VerdictReport>>>) -> Self {
        Self { published }
    }
}

impl VerdictSink for FakeSink {
    fn publish(
        &mut self,
        report: VerdictReport,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let published = Arc::clone(&self.published);

        Box::pin(async move {
            let mut guard = published.lock().unwrap();
            guard.push(report);
            Ok(())
        })
    }
}
