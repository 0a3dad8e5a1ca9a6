use crate::host::HostDeletionJob;
use crate::job::{JobOutcome, ReferenceSafeDeleter};
use reg_queue::{DeletionRequest, TaskQueues};
use std::sync::Arc;
use tracing::{debug, info};

const DEFAULT_BATCH: usize = 16;

/// Leases deletion requests from the async-delete queue and runs them as host deletion jobs.
#[derive(Debug, Clone)]
pub struct AsyncDeleteWorker {
    deleter: ReferenceSafeDeleter,
    queues: TaskQueues,
    batch: usize,
}

impl AsyncDeleteWorker {
    #[must_use]
    pub const fn new(deleter: ReferenceSafeDeleter, queues: TaskQueues) -> Self {
        Self { deleter, queues, batch: DEFAULT_BATCH }
    }

    #[must_use]
    pub const fn batch(mut self, batch: usize) -> Self {
        self.batch = if batch == 0 { 1 } else { batch };
        self
    }

    pub async fn process(&self, request: DeletionRequest) -> JobOutcome {
        debug!(job_id = %request.job_id, repo_id = %request.target, "Processing deletion request");
        let job = Arc::new(HostDeletionJob::new(request, self.queues.dns.clone()));
        self.deleter.run(job).await
    }

    /// Processes everything queued right now, in order.
    pub async fn drain(&self) -> Vec<(DeletionRequest, JobOutcome)> {
        let mut results = Vec::new();
        loop {
            let leased = self.queues.async_delete.lease(self.batch);
            if leased.is_empty() {
                break;
            }
            for request in leased {
                let outcome = self.process(request.clone()).await;
                results.push((request, outcome));
            }
        }
        results
    }

    /// Runs until the async-delete queue is closed and empty.
    pub async fn run(self) {
        let queue = self.queues.async_delete.clone();
        info!(queue = queue.name(), batch = self.batch, "Async delete worker started");
        loop {
            queue.wait_for_work().await;
            if queue.is_empty() && queue.is_closed() {
                break;
            }
            self.drain().await;
        }
        info!(queue = queue.name(), "Async delete worker stopped");
    }
}
