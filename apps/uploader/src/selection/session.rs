use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::selection::controller::{FileSelectionController, SelectionError};
use crate::selection::models::{Candidate, UploadStatus};
use crate::selection::upload::Uploader;
use crate::selection::validation::ValidationRule;

/// One widget instance: a controller plus the deferred completion that turns
/// `Uploading` into `Success`.
///
/// The pending completion is aborted by `select`, `reset` and `shutdown`, and
/// on drop. The controller's upload ticket also rejects any completion that
/// slips past the abort, so a stale `Success` can never follow a reset.
pub struct UploadSession {
    controller: Arc<Mutex<FileSelectionController>>,
    uploader: Arc<dyn Uploader>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl UploadSession {
    pub fn new(rule: ValidationRule, uploader: Arc<dyn Uploader>) -> Self {
        Self {
            controller: Arc::new(Mutex::new(FileSelectionController::new(rule))),
            uploader,
            pending: Mutex::new(None),
        }
    }

    pub async fn status(&self) -> UploadStatus {
        self.controller.lock().await.status()
    }

    pub async fn select(&self, candidate: &Candidate) -> UploadStatus {
        let mut pending = self.pending.lock().await;
        abort_pending(&mut pending);
        self.controller.lock().await.select(candidate)
    }

    /// Starts the upload and returns the `Uploading` status straight away.
    /// `Success` is applied later by a spawned task once the uploader returns.
    pub async fn complete(&self) -> Result<UploadStatus, SelectionError> {
        let mut pending = self.pending.lock().await;

        let (ticket, status) = {
            let mut controller = self.controller.lock().await;
            let ticket = controller.begin_upload()?;
            (ticket, controller.status())
        };

        info!(
            name = %ticket.file().name,
            backend = self.uploader.backend(),
            "Dispatching upload"
        );

        let controller = Arc::clone(&self.controller);
        let uploader = Arc::clone(&self.uploader);
        let handle = tokio::spawn(async move {
            uploader.upload(ticket.file()).await;
            controller.lock().await.finish_upload(&ticket);
        });
        *pending = Some(handle);

        Ok(status)
    }

    pub async fn reset(&self) -> UploadStatus {
        let mut pending = self.pending.lock().await;
        abort_pending(&mut pending);
        self.controller.lock().await.reset()
    }

    /// Cancels any in-flight completion without changing state. Used when the
    /// session is discarded.
    pub async fn shutdown(&self) {
        abort_pending(&mut *self.pending.lock().await);
    }
}

impl Drop for UploadSession {
    fn drop(&mut self) {
        abort_pending(self.pending.get_mut());
    }
}

fn abort_pending(pending: &mut Option<JoinHandle<()>>) {
    if let Some(handle) = pending.take() {
        if !handle.is_finished() {
            debug!("Cancelling pending upload completion");
        }
        handle.abort();
    }
}
