//! Watch daemon and runtime logic.

use super::events::{ChangeEvent, WatchConfig};
use crate::encoding::{normalize_dir, normalize_file, NormalizeOutcome};
use crate::error::{ApiError, StorageError};
use notify::{RecursiveMode, Watcher};
use parking_lot::RwLock;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Watch mode daemon
pub struct WatchDaemon {
    config: WatchConfig,
    running: Arc<RwLock<bool>>,
}

/// Handle that stops a running [`WatchDaemon`] from another thread
#[derive(Clone)]
pub struct StopHandle {
    running: Arc<RwLock<bool>>,
}

impl StopHandle {
    pub fn stop(&self) {
        *self.running.write() = false;
    }
}

impl WatchDaemon {
    pub fn new(config: WatchConfig) -> Result<Self, ApiError> {
        if !config.data_dir.is_dir() {
            return Err(ApiError::WatchError(format!(
                "Data directory {} does not exist",
                config.data_dir.display()
            )));
        }
        Ok(Self {
            config,
            running: Arc::new(RwLock::new(true)),
        })
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            running: Arc::clone(&self.running),
        }
    }

    /// Run the watch loop on the current thread until stopped.
    ///
    /// A stopped daemon returns immediately; create a new one to watch again.
    pub fn start(&self) -> Result<(), ApiError> {
        if self.config.normalize_on_start {
            info!("Normalizing data directory before watching");
            normalize_dir(&self.config.data_dir)?;
        }

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            if let Err(e) = tx.send(res) {
                error!("Error sending watch event: {}", e);
            }
        })
        .map_err(|e| ApiError::WatchError(format!("Failed to create watcher: {}", e)))?;

        watcher
            .watch(&self.config.data_dir, RecursiveMode::Recursive)
            .map_err(|e| ApiError::WatchError(format!("Failed to watch directory: {}", e)))?;

        info!(data_dir = ?self.config.data_dir, "Watching data directory");

        let poll_interval = Duration::from_millis(self.config.poll_interval_ms.max(1));
        loop {
            if !*self.running.read() {
                break;
            }

            match rx.recv_timeout(poll_interval) {
                Ok(Ok(event)) => {
                    if let Some(change) = ChangeEvent::from_notify(&event) {
                        self.process_event(&change);
                    }
                }
                Ok(Err(e)) => {
                    warn!("Watch error: {}", e);
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    error!("Watcher channel disconnected");
                    break;
                }
            }
        }

        info!("Watch loop stopped");
        Ok(())
    }

    /// Stop the watch loop after its current iteration.
    pub fn stop(&self) {
        *self.running.write() = false;
    }

    /// Normalize the file named by `event`.
    ///
    /// Returns `None` for events the watcher does not act on. Failures are
    /// logged and returned; they never end the loop.
    pub fn process_event(
        &self,
        event: &ChangeEvent,
    ) -> Option<Result<NormalizeOutcome, StorageError>> {
        if !event.is_json() {
            return None;
        }

        if self.config.settle_ms > 0 {
            std::thread::sleep(Duration::from_millis(self.config.settle_ms));
        }

        // Editors often replace files, so the path may be gone by now
        if !event.path().is_file() {
            debug!(path = %event.path().display(), "Changed path is no longer a file");
            return None;
        }

        let result = normalize_file(event.path());
        match &result {
            Ok(NormalizeOutcome::Rewritten { from }) => {
                info!(
                    kind = event.kind(),
                    path = %event.path().display(),
                    from = %from,
                    "Normalized changed file"
                );
            }
            Ok(NormalizeOutcome::AlreadyNormalized) => {
                debug!(path = %event.path().display(), "Changed file already normalized");
            }
            Ok(NormalizeOutcome::Rejected { reason, .. }) => {
                warn!(
                    path = %event.path().display(),
                    reason = %reason,
                    "Changed file is not valid JSON; left untouched"
                );
            }
            Err(e) => {
                error!(
                    path = %event.path().display(),
                    error = %e,
                    "Failed to normalize changed file"
                );
            }
        }
        Some(result)
    }
}
