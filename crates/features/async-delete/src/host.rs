use crate::job::{DeletionJob, JobOutcome};
use chrono::{DateTime, Utc};
use reg_datastore::{ResourceReader, Snapshot, Transaction};
use reg_domain::resources::{EppResource, HistoryEntry, HistoryType, PollMessage, StatusValues};
use reg_queue::{DeletionRequest, DnsRefresh, TaskQueue};
use tracing::warn;

/// Deletes a pending-delete host once no active domain lists it as a nameserver.
#[derive(Debug, Clone)]
pub struct HostDeletionJob {
    request: DeletionRequest,
    dns: TaskQueue<DnsRefresh>,
}

impl HostDeletionJob {
    #[must_use]
    pub const fn new(request: DeletionRequest, dns: TaskQueue<DnsRefresh>) -> Self {
        Self { request, dns }
    }

    #[must_use]
    pub const fn request(&self) -> &DeletionRequest {
        &self.request
    }

    fn is_referenced<R: ResourceReader + ?Sized>(&self, reader: &R, now: DateTime<Utc>) -> bool {
        reader
            .domains()
            .any(|d| d.is_active(now) && d.nameservers.contains(&self.request.target))
    }
}

impl DeletionJob for HostDeletionJob {
    fn target(&self) -> &str {
        &self.request.target
    }

    fn scan_partition(
        &self,
        snapshot: &Snapshot,
        partition: usize,
        partitions: usize,
        now: DateTime<Utc>,
    ) -> bool {
        snapshot
            .domain_partition(partition, partitions)
            .any(|d| d.is_active(now) && d.nameservers.contains(&self.request.target))
    }

    fn commit(&self, tx: &mut Transaction<'_>, referenced: bool, now: DateTime<Utc>) -> JobOutcome {
        let request = &self.request;
        let Some(host) = tx.host(&request.target) else {
            return JobOutcome::abandoned("host no longer exists");
        };
        if !host.is_active(now) {
            return JobOutcome::abandoned("host is already deleted");
        }
        if !host.is_pending_delete() {
            return JobOutcome::abandoned("host is not pending delete");
        }

        let referenced = referenced || self.is_referenced(&*tx, now);
        let authorized = request.is_superuser || host.current_sponsor == request.requesting_client_id;
        let mut host = host.clone();
        host.status.remove(StatusValues::PENDING_DELETE);

        let (outcome, kind, message) = match (referenced, authorized) {
            (false, true) => (
                JobOutcome::Deleted,
                HistoryType::HostDelete,
                format!("Deleted host {}.", host.fully_qualified_host_name),
            ),
            (true, _) => (
                JobOutcome::BlockedByReference,
                HistoryType::HostDeleteFailure,
                format!(
                    "Can't delete host {} because it is referenced by a domain.",
                    host.fully_qualified_host_name
                ),
            ),
            (false, false) => (
                JobOutcome::BlockedBySponsorship,
                HistoryType::HostDeleteFailure,
                format!(
                    "Can't delete host {} because it is not sponsored by the requesting registrar.",
                    host.fully_qualified_host_name
                ),
            ),
        };

        if outcome.is_deleted() {
            host.deletion_time = Some(now);
            if let Some(mut domain) =
                host.superordinate_domain.as_deref().and_then(|id| tx.domain(id)).cloned()
            {
                domain.subordinate_hosts.remove(&host.fully_qualified_host_name);
                tx.put_domain(domain);
            }
            let dns = self.dns.clone();
            let name = host.fully_qualified_host_name.clone();
            tx.after_commit(move || {
                if let Err(e) = dns.add(DnsRefresh::Host(name)) {
                    warn!(error = %e, "Host DNS refresh not enqueued");
                }
            });
        }

        tx.record_history(HistoryEntry {
            parent: host.repo_id.clone(),
            kind,
            client_id: request.requesting_client_id.clone(),
            modification_time: now,
            by_superuser: request.is_superuser,
        });
        tx.send_poll_message(PollMessage {
            client_id: request.requesting_client_id.clone(),
            parent: host.repo_id.clone(),
            event_time: now,
            message,
        });
        tx.put_host(host);
        outcome
    }
}
