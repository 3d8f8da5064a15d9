//! Upload step: the pluggable transfer behind `complete()`.
//!
//! Default: `SimulatedUploader` (no network, fixed latency, always succeeds).
//! A real transfer backend implements `Uploader` and is swapped in at startup;
//! the session and handler code stay untouched.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::selection::models::SelectedFile;

/// Latency of the simulated upload, matching what users saw in the browser widget.
pub const DEFAULT_UPLOAD_DELAY: Duration = Duration::from_millis(2000);

/// Carried by each `UploadSession` as `Arc<dyn Uploader>`.
///
/// Completion is unconditional: there is no failure path and no retry policy.
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, file: &SelectedFile);

    /// Short backend label for logs.
    fn backend(&self) -> &'static str;
}

/// Waits a fixed delay and reports success. Transfers no data.
#[derive(Debug, Clone)]
pub struct SimulatedUploader {
    delay: Duration,
}

impl SimulatedUploader {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedUploader {
    fn default() -> Self {
        Self::new(DEFAULT_UPLOAD_DELAY)
    }
}

#[async_trait]
impl Uploader for SimulatedUploader {
    async fn upload(&self, file: &SelectedFile) {
        debug!(name = %file.name, delay_ms = self.delay.as_millis() as u64, "Simulating upload");
        tokio::time::sleep(self.delay).await;
    }

    fn backend(&self) -> &'static str {
        "simulated"
    }
}
