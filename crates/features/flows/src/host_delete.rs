use crate::error::EppException;
use chrono::{DateTime, Utc};
use reg_datastore::{Datastore, ResourceReader};
use reg_domain::resources::{EppResource, HistoryEntry, HistoryType, StatusValues};
use reg_queue::{DeletionRequest, TaskQueues};
use tracing::{info, warn};

/// A registrar's request to delete a host.
#[derive(Debug, Clone, Copy)]
pub struct HostDeleteRequest<'a> {
    pub fully_qualified_host_name: &'a str,
    pub client_id: &'a str,
    pub is_superuser: bool,
    pub now: DateTime<Utc>,
}

/// Marks a host pending delete and hands it to the asynchronous deleter.
///
/// Whether the host is still referenced is not checked here; the deletion job decides that at
/// commit time.
#[derive(Debug, Clone)]
pub struct HostDeleteRequestFlow {
    store: Datastore,
    queues: TaskQueues,
}

impl HostDeleteRequestFlow {
    #[must_use]
    pub const fn new(store: Datastore, queues: TaskQueues) -> Self {
        Self { store, queues }
    }

    /// # Errors
    /// - [`EppException::ResourceDoesNotExist`] for an unknown or deleted host.
    /// - [`EppException::ResourceNotOwned`] when a non-superuser does not sponsor it.
    /// - [`EppException::ResourceStatusProhibitsOperation`] when already pending delete or delete
    ///   prohibited.
    pub fn run(&self, request: &HostDeleteRequest<'_>) -> Result<DeletionRequest, EppException> {
        let fqhn = request.fully_qualified_host_name;

        let job = self.store.transact(|tx| {
            let host = tx
                .host_by_name(fqhn, request.now)
                .ok_or_else(|| EppException::ResourceDoesNotExist { id: fqhn.to_owned() })?;
            if !request.is_superuser && host.current_sponsor != request.client_id {
                return Err(EppException::ResourceNotOwned);
            }
            let prohibited = StatusValues::PENDING_DELETE
                | StatusValues::CLIENT_DELETE_PROHIBITED
                | StatusValues::SERVER_DELETE_PROHIBITED;
            if host.is_pending_delete() || host.status.intersects(prohibited) {
                return Err(EppException::ResourceStatusProhibitsOperation);
            }

            let mut host = host.clone();
            host.status.insert(StatusValues::PENDING_DELETE);
            let job = DeletionRequest {
                job_id: reg_kernel::safe_nanoid!(),
                target: host.repo_id.clone(),
                requesting_client_id: request.client_id.to_owned(),
                is_superuser: request.is_superuser,
                requested_time: request.now,
            };

            tx.record_history(HistoryEntry {
                parent: host.repo_id.clone(),
                kind: HistoryType::HostPendingDelete,
                client_id: request.client_id.to_owned(),
                modification_time: request.now,
                by_superuser: request.is_superuser,
            });
            tx.put_host(host);

            let queue = self.queues.async_delete.clone();
            let task = job.clone();
            tx.after_commit(move || {
                if let Err(e) = queue.add(task) {
                    warn!(error = %e, "Deletion request not enqueued");
                }
            });
            Ok(job)
        })?;

        info!(fqhn, job_id = %job.job_id, target = %job.target, "Host pending delete");
        Ok(job)
    }
}
