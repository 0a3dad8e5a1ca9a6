//! # Datastore
//!
//! In-memory storage for registry resources with the two access paths the flows rely on:
//!
//! - **Transactions** ([`Datastore::transact`]): serializable, writes are buffered and applied
//!   atomically when the closure returns `Ok`; an `Err` (or a panic) discards them. Actions
//!   registered with [`Transaction::after_commit`] run only after a successful commit.
//! - **Transactionless reads** ([`Datastore::load_domain_transactionless`]): served from a TTL
//!   cache and possibly stale. Only callers that tolerate staleness may use them.
//!
//! ```rust
//! use reg_datastore::{Datastore, ResourceReader};
//!
//! let store = Datastore::builder().build();
//! let committed = store.transact(|tx| {
//!     let _id = tx.allocate_repo_id("example");
//!     Ok::<_, std::convert::Infallible>(true)
//! });
//! assert_eq!(committed, Ok(true));
//! assert!(store.snapshot().domains().next().is_none());
//! ```

mod error;
mod fixtures;
mod tables;
mod transaction;

pub use crate::error::{DatastoreError, DatastoreErrorExt};
pub use crate::fixtures::Fixtures;
pub use crate::tables::{ResourceReader, Snapshot, partition_of};
pub use crate::transaction::Transaction;

use crate::tables::Tables;
use crate::transaction::Writes;
use chrono::{DateTime, Utc};
use moka::sync::Cache;
use parking_lot::{Mutex, RwLock};
use reg_domain::resources::{ContactResource, DomainResource, HostResource};
use reg_kernel::ids::IdAllocator;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

#[derive(Debug)]
pub struct DatastoreInner {
    committed: RwLock<Arc<Tables>>,
    /// Serializes transactions.
    writer: Mutex<()>,
    /// fqdn to the last committed domain carrying it.
    domain_cache: Option<Cache<String, Option<Arc<DomainResource>>>>,
    ids: IdAllocator,
}

/// Cheaply cloneable handle to the shared store.
#[derive(Debug, Clone)]
pub struct Datastore {
    inner: Arc<DatastoreInner>,
}

#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug)]
pub struct DatastoreBuilder {
    cache_ttl: Duration,
    cache_capacity: u64,
    first_id: u64,
}

impl Default for DatastoreBuilder {
    fn default() -> Self {
        Self { cache_ttl: Duration::from_secs(10), cache_capacity: 10_000, first_id: 1 }
    }
}

impl DatastoreBuilder {
    /// TTL of the transactionless domain cache; zero disables it.
    pub const fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub const fn cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// First numeric id handed out for repo ids.
    pub const fn first_id(mut self, id: u64) -> Self {
        self.first_id = id;
        self
    }

    pub fn build(self) -> Datastore {
        let domain_cache = (!self.cache_ttl.is_zero()).then(|| {
            Cache::builder().max_capacity(self.cache_capacity).time_to_live(self.cache_ttl).build()
        });
        Datastore {
            inner: Arc::new(DatastoreInner {
                committed: RwLock::new(Arc::default()),
                writer: Mutex::new(()),
                domain_cache,
                ids: IdAllocator::starting_at(self.first_id),
            }),
        }
    }
}

impl Datastore {
    pub fn builder() -> DatastoreBuilder {
        DatastoreBuilder::default()
    }

    /// Committed state as of now.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot { tables: Arc::clone(&*self.inner.committed.read()) }
    }

    /// Runs `work` as one serializable transaction.
    ///
    /// # Errors
    /// Returns whatever `work` returns; in that case nothing it wrote is kept.
    pub fn transact<T, E>(
        &self,
        work: impl FnOnce(&mut Transaction<'_>) -> Result<T, E>,
    ) -> Result<T, E> {
        let writer = self.inner.writer.lock();
        let base = self.snapshot();

        let mut tx = Transaction {
            base: &base.tables,
            ids: &self.inner.ids,
            writes: Writes::default(),
            after_commit: Vec::new(),
        };
        let value = work(&mut tx)?;
        let Transaction { writes, after_commit, .. } = tx;

        if !writes.is_empty() {
            let touched: Vec<String> =
                writes.domains.values().map(|d| d.fully_qualified_domain_name.clone()).collect();
            debug!(
                domains = writes.domains.len(),
                hosts = writes.hosts.len(),
                history = writes.history.len(),
                "Committing transaction"
            );

            drop(base);
            let mut committed = self.inner.committed.write();
            writes.apply(Arc::make_mut(&mut committed));
            drop(committed);

            if let Some(cache) = &self.inner.domain_cache {
                for name in touched {
                    cache.invalidate(&name);
                }
            }
        }

        drop(writer);
        for action in after_commit {
            action();
        }
        Ok(value)
    }

    /// Loads the domain currently carrying `fqdn` outside any transaction.
    ///
    /// May return a copy up to one cache TTL old. Deleted domains are filtered at `now`.
    #[must_use]
    pub fn load_domain_transactionless(
        &self,
        fqdn: &str,
        now: DateTime<Utc>,
    ) -> Option<Arc<DomainResource>> {
        let load = || {
            let snapshot = self.snapshot();
            let repo_id = snapshot.tables.domain_names.get(fqdn)?;
            snapshot.tables.domains.get(repo_id).cloned().map(Arc::new)
        };

        let domain = match &self.inner.domain_cache {
            Some(cache) => cache.get_with(fqdn.to_owned(), load),
            None => load(),
        };
        trace!(fqdn, cached = self.inner.domain_cache.is_some(), found = domain.is_some());
        domain.filter(|d| d.deletion_time.is_none_or(|t| t > now))
    }

    /// Writes resources straight into committed state, bypassing transactions.
    pub fn seed(&self, fixtures: Fixtures) {
        let _writer = self.inner.writer.lock();
        let names: Vec<String> =
            fixtures.domains.iter().map(|d| d.fully_qualified_domain_name.clone()).collect();
        {
            let mut committed = self.inner.committed.write();
            let tables = Arc::make_mut(&mut committed);
            fixtures.contacts.into_iter().for_each(|c| tables.insert_contact(c));
            fixtures.hosts.into_iter().for_each(|h| tables.insert_host(h));
            fixtures.domains.into_iter().for_each(|d| tables.insert_domain(d));
        }
        if let Some(cache) = &self.inner.domain_cache {
            names.iter().for_each(|name| cache.invalidate(name));
        }
    }

    pub fn seed_domain(&self, domain: DomainResource) {
        self.seed(Fixtures { domains: vec![domain], ..Fixtures::default() });
    }

    pub fn seed_host(&self, host: HostResource) {
        self.seed(Fixtures { hosts: vec![host], ..Fixtures::default() });
    }

    pub fn seed_contact(&self, contact: ContactResource) {
        self.seed(Fixtures { contacts: vec![contact], ..Fixtures::default() });
    }

    /// A fresh repo id outside any transaction.
    #[must_use]
    pub fn allocate_repo_id(&self, tld: &str) -> String {
        self.inner.ids.repo_id(tld)
    }
}
