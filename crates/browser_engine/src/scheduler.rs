use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use browser_logging::browser_debug;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::PollKey;

/// A poll waiting for its delay to elapse, or already in flight.
///
/// Cancelling drops the work at whichever await point it has reached; no
/// event is emitted for a cancelled poll.
pub struct PollTask {
    key: PollKey,
    token: CancellationToken,
    join: JoinHandle<()>,
}

impl PollTask {
    pub fn spawn<F>(runtime: &Handle, key: PollKey, delay: Duration, work: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let join = runtime.spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {
                    browser_debug!("{key} poll cancelled");
                }
                _ = async {
                    tokio::time::sleep(delay).await;
                    work.await;
                } => {}
            }
        });
        Self { key, token, join }
    }

    pub fn key(&self) -> PollKey {
        self.key
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

/// Outstanding poll tasks, at most one per key.
#[derive(Default)]
pub struct PollRegistry {
    tasks: HashMap<PollKey, PollTask>,
}

impl PollRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks `task`, cancelling any older task registered under the same key.
    pub fn insert(&mut self, task: PollTask) {
        self.prune();
        if let Some(previous) = self.tasks.insert(task.key(), task) {
            previous.cancel();
        }
    }

    /// Cancels the task for `key`. Returns whether one was still pending.
    pub fn cancel(&mut self, key: PollKey) -> bool {
        match self.tasks.remove(&key) {
            Some(task) => {
                let pending = !task.is_finished();
                task.cancel();
                pending
            }
            None => false,
        }
    }

    pub fn pending(&self) -> usize {
        self.tasks.values().filter(|task| !task.is_finished()).count()
    }

    fn prune(&mut self) {
        self.tasks.retain(|_, task| !task.is_finished());
    }
}
