//! TTL Cleanup Task
//!
//! Background thread that periodically removes expired cache entries.

use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use tracing::{debug, info, warn};

// == Cleanup Handle ==
/// Owns a running cleanup thread. Stopping (or dropping) the handle
/// signals the thread and waits for it to exit.
#[derive(Debug)]
pub struct CleanupHandle {
    stop_tx: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl CleanupHandle {
    /// Signals the thread to stop and joins it. Idempotent.
    pub fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            // Receiver may already be gone if the thread exited on its own.
            let _ = tx.send(());
        }
        if let Some(handle) = self.thread.take() {
            if handle.thread().id() == thread::current().id() {
                return;
            }
            if handle.join().is_err() {
                warn!("TTL cleanup thread panicked during shutdown");
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, |h| h.is_finished())
    }
}

impl Drop for CleanupHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Spawns a thread that calls `sweep` every `interval`.
///
/// `sweep` returns the number of entries it removed, or `None` once the
/// store it cleans no longer exists, which ends the thread. A panic inside
/// one pass is logged and the loop keeps running.
///
/// # Example
/// ```ignore
/// let mut handle = spawn_cleanup_task(Duration::from_secs(60), move || {
///     weak_state.upgrade().map(|state| state.lock().purge_expired())
/// });
/// // Later, during shutdown:
/// handle.stop();
/// ```
pub fn spawn_cleanup_task<F>(interval: Duration, sweep: F) -> CleanupHandle
where
    F: Fn() -> Option<usize> + Send + 'static,
{
    let (stop_tx, stop_rx) = bounded::<()>(1);

    let spawned = thread::Builder::new()
        .name("cache-ttl-cleanup".to_string())
        .spawn(move || {
            info!(
                "Starting TTL cleanup task with interval of {} seconds",
                interval.as_secs()
            );

            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }

                match panic::catch_unwind(AssertUnwindSafe(&sweep)) {
                    Ok(Some(removed)) if removed > 0 => {
                        info!("TTL cleanup: removed {} expired entries", removed);
                    }
                    Ok(Some(_)) => debug!("TTL cleanup: no expired entries found"),
                    Ok(None) => break,
                    Err(_) => warn!("TTL cleanup pass panicked; continuing"),
                }
            }

            debug!("TTL cleanup task stopped");
        });

    match spawned {
        Ok(thread) => CleanupHandle {
            stop_tx: Some(stop_tx),
            thread: Some(thread),
        },
        Err(err) => {
            // Lazy eviction on read still applies without the thread.
            warn!("Failed to spawn TTL cleanup thread: {}", err);
            CleanupHandle {
                stop_tx: None,
                thread: None,
            }
        }
    }
}
