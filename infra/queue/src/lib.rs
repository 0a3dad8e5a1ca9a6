//! # Task queues
//!
//! Named FIFO pull queues connecting flows to background workers: committed transactions
//! enqueue DNS refreshes and deletion requests, workers lease them in batches.
//!
//! ```rust
//! use reg_queue::{DnsRefresh, TaskQueues};
//!
//! let queues = TaskQueues::new();
//! queues.dns.add(DnsRefresh::Host("ns1.example.tld".to_owned())).unwrap();
//! assert_eq!(queues.dns.lease(10), vec![DnsRefresh::Host("ns1.example.tld".to_owned())]);
//! ```

mod error;
mod queue;
mod tasks;

pub use crate::error::{QueueError, QueueErrorExt};
pub use crate::queue::TaskQueue;
pub use crate::tasks::{ASYNC_DELETE_QUEUE, DNS_PULL_QUEUE, DeletionRequest, DnsRefresh};

/// The queues a registry process owns.
#[derive(Debug, Clone)]
pub struct TaskQueues {
    pub dns: TaskQueue<DnsRefresh>,
    pub async_delete: TaskQueue<DeletionRequest>,
}

impl Default for TaskQueues {
    fn default() -> Self {
        Self {
            dns: TaskQueue::new(DNS_PULL_QUEUE),
            async_delete: TaskQueue::new(ASYNC_DELETE_QUEUE),
        }
    }
}

impl TaskQueues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Closes every queue.
    pub fn close(&self) {
        self.dns.close();
        self.async_delete.close();
    }
}
