use crate::tables::{ResourceReader, Tables};
use chrono::{DateTime, Utc};
use fxhash::FxHashMap;
use reg_domain::resources::{
    ContactResource, DomainResource, EppResource, HistoryEntry, HostResource, PollMessage,
};
use reg_kernel::ids::IdAllocator;
use std::fmt;

pub(crate) type AfterCommit = Box<dyn FnOnce() + Send>;

/// Writes buffered by an open transaction; nothing is visible outside it until commit.
#[derive(Debug, Default)]
pub(crate) struct Writes {
    pub(crate) domains: FxHashMap<String, DomainResource>,
    pub(crate) hosts: FxHashMap<String, HostResource>,
    pub(crate) contacts: FxHashMap<String, ContactResource>,
    pub(crate) history: Vec<HistoryEntry>,
    pub(crate) poll_messages: Vec<PollMessage>,
}

impl Writes {
    pub(crate) fn is_empty(&self) -> bool {
        self.domains.is_empty()
            && self.hosts.is_empty()
            && self.contacts.is_empty()
            && self.history.is_empty()
            && self.poll_messages.is_empty()
    }

    pub(crate) fn apply(self, tables: &mut Tables) {
        for domain in self.domains.into_values() {
            tables.insert_domain(domain);
        }
        for host in self.hosts.into_values() {
            tables.insert_host(host);
        }
        for contact in self.contacts.into_values() {
            tables.insert_contact(contact);
        }
        tables.history.extend(self.history);
        tables.poll_messages.extend(self.poll_messages);
    }
}

/// A serializable unit of work over the datastore.
///
/// Reads see committed state overlaid with this transaction's own writes.
pub struct Transaction<'a> {
    pub(crate) base: &'a Tables,
    pub(crate) ids: &'a IdAllocator,
    pub(crate) writes: Writes,
    pub(crate) after_commit: Vec<AfterCommit>,
}

impl fmt::Debug for Transaction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("writes", &self.writes)
            .field("after_commit", &self.after_commit.len())
            .finish_non_exhaustive()
    }
}

impl Transaction<'_> {
    pub fn put_domain(&mut self, domain: DomainResource) {
        self.writes.domains.insert(domain.repo_id.clone(), domain);
    }

    pub fn put_host(&mut self, host: HostResource) {
        self.writes.hosts.insert(host.repo_id.clone(), host);
    }

    pub fn put_contact(&mut self, contact: ContactResource) {
        self.writes.contacts.insert(contact.repo_id.clone(), contact);
    }

    pub fn record_history(&mut self, entry: HistoryEntry) {
        self.writes.history.push(entry);
    }

    pub fn send_poll_message(&mut self, message: PollMessage) {
        self.writes.poll_messages.push(message);
    }

    /// Runs `action` once the transaction has committed; dropped on rollback.
    pub fn after_commit(&mut self, action: impl FnOnce() + Send + 'static) {
        self.after_commit.push(Box::new(action));
    }

    /// A fresh repo id for a resource in `tld`.
    pub fn allocate_repo_id(&self, tld: &str) -> String {
        self.ids.repo_id(tld)
    }

    fn pending_by_name<'s, R: EppResource>(
        pending: &'s FxHashMap<String, R>,
        matches: impl Fn(&R) -> bool,
        now: DateTime<Utc>,
    ) -> Option<&'s R> {
        pending.values().find(|r| matches(r) && r.is_active(now))
    }
}

impl ResourceReader for Transaction<'_> {
    fn domain(&self, repo_id: &str) -> Option<&DomainResource> {
        self.writes.domains.get(repo_id).or_else(|| self.base.domain(repo_id))
    }

    fn host(&self, repo_id: &str) -> Option<&HostResource> {
        self.writes.hosts.get(repo_id).or_else(|| self.base.host(repo_id))
    }

    fn domain_by_name(&self, fqdn: &str, now: DateTime<Utc>) -> Option<&DomainResource> {
        Self::pending_by_name(&self.writes.domains, |d| d.fully_qualified_domain_name == fqdn, now)
            .or_else(|| {
                let committed = self.base.domain_by_name(fqdn, now)?;
                // A buffered write to the same resource supersedes the committed copy.
                match self.writes.domains.get(&committed.repo_id) {
                    Some(pending) => pending.is_active(now).then_some(pending),
                    None => Some(committed),
                }
            })
    }

    fn host_by_name(&self, fqhn: &str, now: DateTime<Utc>) -> Option<&HostResource> {
        Self::pending_by_name(&self.writes.hosts, |h| h.fully_qualified_host_name == fqhn, now)
            .or_else(|| {
                let committed = self.base.host_by_name(fqhn, now)?;
                match self.writes.hosts.get(&committed.repo_id) {
                    Some(pending) => pending.is_active(now).then_some(pending),
                    None => Some(committed),
                }
            })
    }

    fn contact_by_id(&self, contact_id: &str, now: DateTime<Utc>) -> Option<&ContactResource> {
        Self::pending_by_name(&self.writes.contacts, |c| c.contact_id == contact_id, now).or_else(
            || {
                let committed = self.base.contact_by_id(contact_id, now)?;
                match self.writes.contacts.get(&committed.repo_id) {
                    Some(pending) => pending.is_active(now).then_some(pending),
                    None => Some(committed),
                }
            },
        )
    }

    fn domains(&self) -> Box<dyn Iterator<Item = &DomainResource> + '_> {
        let committed = self
            .base
            .domains
            .values()
            .filter(|d| !self.writes.domains.contains_key(&d.repo_id));
        Box::new(self.writes.domains.values().chain(committed))
    }
}
