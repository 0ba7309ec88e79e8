//! Background task that evicts idle sessions.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::manager::SessionManager;
use crate::store::SessionStore;

/// Handle to a running reaper task.
///
/// Dropping the handle leaves the task running; call [`ReaperHandle::cancel`]
/// or [`ReaperHandle::shutdown`] to stop it.
#[derive(Debug)]
pub struct ReaperHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl ReaperHandle {
    /// Ask the reaper to stop after its current pass.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Stop the reaper and wait for it to exit.
    pub async fn shutdown(self) {
        self.token.cancel();
        if let Err(e) = self.task.await {
            warn!(error = %e, "Session reaper task failed");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl<S: SessionStore> SessionManager<S> {
    /// Spawn the reaper onto the current tokio runtime.
    ///
    /// Each cycle sleeps for the configured `gc_rate` and then evicts sessions
    /// idle for longer than `max_life`. Both values are re-read every cycle,
    /// so [`SessionManager::configure`] takes effect without a restart.
    pub fn spawn_reaper(&self) -> ReaperHandle {
        let token = CancellationToken::new();
        let manager = self.clone();
        let cancelled = token.clone();

        let task = tokio::spawn(async move {
            info!("Session reaper started");
            loop {
                let gc_rate = manager.gc_rate().await;
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = tokio::time::sleep(gc_rate) => {}
                }

                match manager.reap().await {
                    Ok(0) => {}
                    Ok(count) => debug!(count, "Reaper pass evicted sessions"),
                    Err(e) => warn!(error = %e, "Reaper pass failed"),
                }
            }
            info!("Session reaper stopped");
        });

        ReaperHandle { token, task }
    }
}
