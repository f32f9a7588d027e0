//! Supervision of detached background work.
//!
//! A detached task is started by a caller that does not wait for it (the
//! cache refresh after a successful remote read, for instance). Its
//! failures still need to land somewhere: the supervisor logs them.

use std::future::Future;
use std::sync::{Arc, Mutex};

use futures::future::join_all;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

#[derive(Default)]
pub struct DetachedTasks {
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl DetachedTasks {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Run `work` on the tokio runtime without awaiting it.
    ///
    /// An `Err` result is logged under `label`.
    pub fn spawn<F, E>(&self, label: &'static str, work: F)
    where
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: std::fmt::Display + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            match work.await {
                Ok(()) => debug!(task = label, "Detached task finished"),
                Err(e) => error!(task = label, error = %e, "Detached task failed"),
            }
        });

        match self.handles.lock() {
            Ok(mut handles) => {
                handles.retain(|h| !h.is_finished());
                handles.push(handle);
            }
            // Task still runs; it just can't be drained
            Err(_) => warn!(task = label, "Detached task registry poisoned"),
        }
    }

    /// Number of tasks that have not finished yet.
    pub fn pending(&self) -> usize {
        self.handles
            .lock()
            .map(|handles| handles.iter().filter(|h| !h.is_finished()).count())
            .unwrap_or(0)
    }

    /// Wait for every task spawned so far.
    pub async fn drain(&self) {
        let handles: Vec<_> = match self.handles.lock() {
            Ok(mut handles) => handles.drain(..).collect(),
            Err(_) => return,
        };
        if handles.is_empty() {
            return;
        }

        debug!(count = handles.len(), "Draining detached tasks");
        for result in join_all(handles).await {
            if let Err(e) = result {
                error!(error = %e, "Detached task panicked or was cancelled");
            }
        }
    }
}
