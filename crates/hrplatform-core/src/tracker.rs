//! Time-on-site tracking.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::progress::ProgressStore;

/// Counts seconds into a shared [`ProgressStore`] until stopped or dropped.
pub struct TimeTracker {
    handle: JoinHandle<()>,
}

impl TimeTracker {
    /// Start ticking once per second. Must be called inside a tokio runtime.
    pub fn spawn(progress: Arc<Mutex<ProgressStore>>) -> Self {
        let handle = tokio::spawn(run_tracker_loop(progress));
        Self { handle }
    }

    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for TimeTracker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run_tracker_loop(progress: Arc<Mutex<ProgressStore>>) {
    let second = Duration::from_secs(1);
    let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + second, second);
    loop {
        interval.tick().await;
        match progress.lock() {
            Ok(mut store) => store.tick(),
            Err(_) => {
                tracing::warn!("progress store poisoned, time tracking stopped");
                return;
            }
        }
    }
}
