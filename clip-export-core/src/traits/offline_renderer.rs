use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use std::sync::Arc;
use std::time::Duration;

use crate::models::audio_buffer::AudioBuffer;
use crate::models::error::ExportError;
use crate::session::cancellation::CancellationToken;

/// Re-renders a decoded buffer into a freshly materialized one.
///
/// Implemented by:
/// - `ThreadedOfflineRenderer` (worker-thread pass-through render)
///
/// The returned buffer must have the same channel count, sample rate and
/// length as `source`. Completion is delivered through the [`RenderJob`].
pub trait OfflineRenderer: Send + Sync {
    /// Start one render pass. Never blocks on the render itself.
    fn render(&self, source: Arc<AudioBuffer>) -> RenderJob;
}

pub type RenderOutcome = Result<AudioBuffer, ExportError>;

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Single-resolution handle for an in-flight render.
pub struct RenderJob {
    receiver: Receiver<RenderOutcome>,
}

/// Producer half of a [`RenderJob`]. Completing consumes it, so a job
/// resolves at most once; dropping it unresolved fails the job.
pub struct RenderCompletion {
    sender: SyncSender<RenderOutcome>,
}

impl RenderJob {
    /// Create a linked completion/job pair.
    pub fn pending() -> (RenderCompletion, RenderJob) {
        let (sender, receiver) = mpsc::sync_channel(1);
        (RenderCompletion { sender }, RenderJob { receiver })
    }

    /// A job that is already resolved.
    pub fn resolved(outcome: RenderOutcome) -> Self {
        let (completion, job) = Self::pending();
        completion.complete(outcome);
        job
    }

    /// Suspend until the render completes.
    ///
    /// Cancellation is checked between polls; a cancelled wait returns
    /// `Cancelled` and the rendered buffer, if any arrives later, is discarded.
    pub fn wait(self, cancel: &CancellationToken) -> RenderOutcome {
        loop {
            if cancel.is_cancelled() {
                return Err(ExportError::Cancelled);
            }
            match self.receiver.recv_timeout(POLL_INTERVAL) {
                Ok(outcome) => return outcome,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(ExportError::RenderFailure(
                        "renderer stopped without completing".into(),
                    ))
                }
            }
        }
    }
}

impl RenderCompletion {
    pub fn complete(self, outcome: RenderOutcome) {
        // The job may have been cancelled and dropped already.
        let _ = self.sender.send(outcome);
    }
}
