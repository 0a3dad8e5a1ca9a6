use chrono::{DateTime, Utc};
use fxhash::FxHashMap;
use reg_domain::resources::{
    ContactResource, DomainResource, EppResource, HistoryEntry, HostResource, PollMessage,
};
use std::sync::Arc;

/// Read access shared by snapshots and open transactions.
///
/// Name lookups only return resources active at `now`.
pub trait ResourceReader {
    fn domain(&self, repo_id: &str) -> Option<&DomainResource>;
    fn host(&self, repo_id: &str) -> Option<&HostResource>;
    fn domain_by_name(&self, fqdn: &str, now: DateTime<Utc>) -> Option<&DomainResource>;
    fn host_by_name(&self, fqhn: &str, now: DateTime<Utc>) -> Option<&HostResource>;
    fn contact_by_id(&self, contact_id: &str, now: DateTime<Utc>) -> Option<&ContactResource>;
    /// Every stored domain, deleted ones included.
    fn domains(&self) -> Box<dyn Iterator<Item = &DomainResource> + '_>;
}

/// Committed state. Name indexes point at the most recent resource carrying the name.
#[derive(Debug, Clone, Default)]
pub(crate) struct Tables {
    pub(crate) domains: FxHashMap<String, DomainResource>,
    pub(crate) hosts: FxHashMap<String, HostResource>,
    pub(crate) contacts: FxHashMap<String, ContactResource>,
    pub(crate) domain_names: FxHashMap<String, String>,
    pub(crate) host_names: FxHashMap<String, String>,
    pub(crate) contact_ids: FxHashMap<String, String>,
    pub(crate) history: Vec<HistoryEntry>,
    pub(crate) poll_messages: Vec<PollMessage>,
}

impl Tables {
    pub(crate) fn insert_domain(&mut self, domain: DomainResource) {
        self.domain_names
            .insert(domain.fully_qualified_domain_name.clone(), domain.repo_id.clone());
        self.domains.insert(domain.repo_id.clone(), domain);
    }

    pub(crate) fn insert_host(&mut self, host: HostResource) {
        self.host_names.insert(host.fully_qualified_host_name.clone(), host.repo_id.clone());
        self.hosts.insert(host.repo_id.clone(), host);
    }

    pub(crate) fn insert_contact(&mut self, contact: ContactResource) {
        self.contact_ids.insert(contact.contact_id.clone(), contact.repo_id.clone());
        self.contacts.insert(contact.repo_id.clone(), contact);
    }
}

fn active<R: EppResource>(resource: Option<&R>, now: DateTime<Utc>) -> Option<&R> {
    resource.filter(|r| r.is_active(now))
}

impl ResourceReader for Tables {
    fn domain(&self, repo_id: &str) -> Option<&DomainResource> {
        self.domains.get(repo_id)
    }

    fn host(&self, repo_id: &str) -> Option<&HostResource> {
        self.hosts.get(repo_id)
    }

    fn domain_by_name(&self, fqdn: &str, now: DateTime<Utc>) -> Option<&DomainResource> {
        active(self.domain_names.get(fqdn).and_then(|id| self.domains.get(id)), now)
    }

    fn host_by_name(&self, fqhn: &str, now: DateTime<Utc>) -> Option<&HostResource> {
        active(self.host_names.get(fqhn).and_then(|id| self.hosts.get(id)), now)
    }

    fn contact_by_id(&self, contact_id: &str, now: DateTime<Utc>) -> Option<&ContactResource> {
        active(self.contact_ids.get(contact_id).and_then(|id| self.contacts.get(id)), now)
    }

    fn domains(&self) -> Box<dyn Iterator<Item = &DomainResource> + '_> {
        Box::new(self.domains.values())
    }
}

/// An immutable view of committed state at one instant.
///
/// Holds no lock; later commits are invisible to it.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub(crate) tables: Arc<Tables>,
}

impl Snapshot {
    /// Domains whose repo id hashes into `partition` of `partitions`.
    pub fn domain_partition(
        &self,
        partition: usize,
        partitions: usize,
    ) -> impl Iterator<Item = &DomainResource> {
        let partitions = partitions.max(1);
        self.tables.domains.values().filter(move |d| partition_of(&d.repo_id, partitions) == partition)
    }

    pub fn history_for<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = &'a HistoryEntry> {
        self.tables.history.iter().filter(move |h| h.parent == parent)
    }

    pub fn poll_messages_for<'a>(
        &'a self,
        client_id: &'a str,
    ) -> impl Iterator<Item = &'a PollMessage> {
        self.tables.poll_messages.iter().filter(move |p| p.client_id == client_id)
    }
}

impl ResourceReader for Snapshot {
    fn domain(&self, repo_id: &str) -> Option<&DomainResource> {
        self.tables.domain(repo_id)
    }

    fn host(&self, repo_id: &str) -> Option<&HostResource> {
        self.tables.host(repo_id)
    }

    fn domain_by_name(&self, fqdn: &str, now: DateTime<Utc>) -> Option<&DomainResource> {
        self.tables.domain_by_name(fqdn, now)
    }

    fn host_by_name(&self, fqhn: &str, now: DateTime<Utc>) -> Option<&HostResource> {
        self.tables.host_by_name(fqhn, now)
    }

    fn contact_by_id(&self, contact_id: &str, now: DateTime<Utc>) -> Option<&ContactResource> {
        self.tables.contact_by_id(contact_id, now)
    }

    fn domains(&self) -> Box<dyn Iterator<Item = &DomainResource> + '_> {
        self.tables.domains()
    }
}

/// Stable partition assignment for a repo id.
#[must_use]
pub fn partition_of(repo_id: &str, partitions: usize) -> usize {
    let partitions = partitions.max(1);
    // Truncation is fine: only the remainder matters.
    #[allow(clippy::cast_possible_truncation)]
    let hash = fxhash::hash64(repo_id.as_bytes()) as usize;
    hash % partitions
}
