//! Call serializer for rate-limited external services
//!
//! A single FIFO queue drained by one worker task: at most one call runs at
//! a time, consecutive call starts are at least `min_interval` apart, and a
//! key that is already queued or running cannot be enqueued again.

use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, error, warn};

type CallTask = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

/// How a queued task ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Completed,
    Panicked,
    /// The worker stopped before reporting (runtime shutting down)
    Abandoned,
}

/// Completion notification for one accepted task
#[derive(Debug)]
pub struct TaskHandle {
    done: oneshot::Receiver<TaskOutcome>,
}

impl TaskHandle {
    pub async fn wait(self) -> TaskOutcome {
        self.done.await.unwrap_or(TaskOutcome::Abandoned)
    }
}

struct Job<K> {
    key: K,
    task: CallTask,
    done: oneshot::Sender<TaskOutcome>,
}

pub struct CallSerializer<K> {
    queue: mpsc::UnboundedSender<Job<K>>,
    in_flight: Arc<Mutex<HashSet<K>>>,
    pending: Arc<AtomicUsize>,
    min_interval: Duration,
}

impl<K> Clone for CallSerializer<K> {
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
            in_flight: self.in_flight.clone(),
            pending: self.pending.clone(),
            min_interval: self.min_interval,
        }
    }
}

impl<K> CallSerializer<K>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
{
    /// Start the worker; must be called from within a tokio runtime
    pub fn new(min_interval: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let in_flight = Arc::new(Mutex::new(HashSet::new()));
        let pending = Arc::new(AtomicUsize::new(0));

        tokio::spawn(drain_queue(rx, in_flight.clone(), pending.clone(), min_interval));

        Self {
            queue: tx,
            in_flight,
            pending,
            min_interval,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Queue `task` under `key`
    ///
    /// Returns `None` without queueing when `key` is already in flight. The
    /// closure runs only when the task reaches the head of the queue, so it
    /// sees state as of execution time rather than enqueue time.
    pub fn enqueue<F, Fut>(&self, key: K, task: F) -> Option<TaskHandle>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if !self.in_flight.lock().insert(key.clone()) {
            debug!("Call for {:?} already in flight, dropping duplicate", key);
            return None;
        }

        let (done_tx, done_rx) = oneshot::channel();
        let job = Job {
            key,
            task: Box::new(move || task().boxed()),
            done: done_tx,
        };

        self.pending.fetch_add(1, Ordering::SeqCst);
        if let Err(mpsc::error::SendError(job)) = self.queue.send(job) {
            warn!("Call serializer worker is gone, dropping {:?}", job.key);
            self.pending.fetch_sub(1, Ordering::SeqCst);
            self.in_flight.lock().remove(&job.key);
            return None;
        }

        Some(TaskHandle { done: done_rx })
    }

    pub fn in_flight(&self, key: &K) -> bool {
        self.in_flight.lock().contains(key)
    }

    /// Tasks accepted but not yet finished
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}

async fn drain_queue<K>(
    mut rx: mpsc::UnboundedReceiver<Job<K>>,
    in_flight: Arc<Mutex<HashSet<K>>>,
    pending: Arc<AtomicUsize>,
    min_interval: Duration,
) where
    K: Eq + Hash + Debug + Send + 'static,
{
    let mut last_start: Option<Instant> = None;

    while let Some(job) = rx.recv().await {
        if let Some(last) = last_start {
            let ready_at = last + min_interval;
            if Instant::now() < ready_at {
                debug!("Throttling {:?} for {:?}", job.key, ready_at - Instant::now());
                tokio::time::sleep_until(ready_at).await;
            }
        }
        last_start = Some(Instant::now());

        let task = job.task;
        let outcome = match AssertUnwindSafe(async move { task().await })
            .catch_unwind()
            .await
        {
            Ok(()) => TaskOutcome::Completed,
            Err(_) => {
                error!("Queued call for {:?} panicked", job.key);
                TaskOutcome::Panicked
            }
        };

        in_flight.lock().remove(&job.key);
        pending.fetch_sub(1, Ordering::SeqCst);
        let _ = job.done.send(outcome);
    }

    debug!("Call serializer queue closed");
}
