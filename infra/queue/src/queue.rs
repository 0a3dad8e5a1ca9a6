use crate::error::QueueError;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;
use tracing::{trace, warn};

#[derive(Debug)]
struct Inner<T> {
    name: &'static str,
    tasks: Mutex<VecDeque<T>>,
    notify: Notify,
    closed: AtomicBool,
}

/// A FIFO pull queue shared between producers and leasing workers.
#[derive(Debug)]
pub struct TaskQueue<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for TaskQueue<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T: Send> TaskQueue<T> {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            inner: Arc::new(Inner {
                name,
                tasks: Mutex::new(VecDeque::new()),
                notify: Notify::new(),
                closed: AtomicBool::new(false),
            }),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    /// Appends a task and wakes one waiting worker.
    ///
    /// # Errors
    /// [`QueueError::Closed`] once [`TaskQueue::close`] has been called.
    pub fn add(&self, task: T) -> Result<(), QueueError> {
        if self.inner.closed.load(Ordering::Acquire) {
            warn!(queue = self.inner.name, "Task rejected by closed queue");
            return Err(QueueError::Closed { message: self.inner.name.into(), context: None });
        }
        self.inner.tasks.lock().push_back(task);
        trace!(queue = self.inner.name, "Task added");
        self.inner.notify.notify_one();
        Ok(())
    }

    /// Removes and returns up to `max` tasks in FIFO order.
    pub fn lease(&self, max: usize) -> Vec<T> {
        let mut tasks = self.inner.tasks.lock();
        let n = max.min(tasks.len());
        tasks.drain(..n).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.tasks.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolves once the queue holds at least one task or has been closed.
    pub async fn wait_for_work(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if !self.is_empty() || self.is_closed() {
                return;
            }
            notified.await;
        }
    }

    /// Stops accepting tasks and wakes every waiter. Queued tasks stay leasable.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::Release);
        self.inner.notify.notify_waiters();
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }
}
