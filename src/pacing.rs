//! Delayed chat actions: the move to the next question and the removal of
//! "copied" acknowledgements. Each acknowledgement has a timer of its own, so
//! a second copy never keeps the first one on screen. Resetting a chat only
//! cancels its pending advance; shutdown cancels everything.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use log::debug;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    Advance,
    /// Removal of the acknowledgement with this message id.
    Toast(i32),
}

struct Scheduled {
    id: u64,
    handle: JoinHandle<()>,
}

struct Timers<K> {
    next_id: u64,
    tasks: HashMap<(K, TimerKind), Scheduled>,
}

pub struct PacingTimers<K> {
    inner: Mutex<Timers<K>>,
}

impl<K> Default for PacingTimers<K> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(Timers {
                next_id: 0,
                tasks: HashMap::new(),
            }),
        }
    }
}

impl<K> PacingTimers<K>
where
    K: Eq + Hash + Copy + Send + Sync + std::fmt::Debug + 'static,
{
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock(&self) -> MutexGuard<'_, Timers<K>> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Runs `task` after `delay`. A timer of the same kind already scheduled
    /// for `key` is cancelled.
    pub fn schedule<F>(self: &Arc<Self>, key: K, kind: TimerKind, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut timers = self.lock();
        let id = timers.next_id;
        timers.next_id += 1;

        let this = Arc::clone(self);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
            this.forget(key, kind, id);
        });

        if let Some(previous) = timers.tasks.insert((key, kind), Scheduled { id, handle }) {
            debug!("Replacing {:?} timer for {:?}", kind, key);
            previous.handle.abort();
        }
    }

    fn forget(&self, key: K, kind: TimerKind, id: u64) {
        let mut timers = self.lock();
        if timers.tasks.get(&(key, kind)).map(|s| s.id) == Some(id) {
            timers.tasks.remove(&(key, kind));
        }
    }

    pub fn cancel(&self, key: K, kind: TimerKind) {
        if let Some(scheduled) = self.lock().tasks.remove(&(key, kind)) {
            scheduled.handle.abort();
        }
    }

    pub fn cancel_all(&self) {
        let mut timers = self.lock();
        for (_, scheduled) in timers.tasks.drain() {
            scheduled.handle.abort();
        }
    }

    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.lock().tasks.len()
    }
}
