//! Facade crate for the registry slices and shared modules.
//! Re-exports domain/kernel primitives and wires the slices together from one [`RegistryConfig`].
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `registry` (with `issuance` for tooling that mints test marks).
//! - Call [`Registry::bootstrap`] once; hand out clones of the flows it exposes.

use reg_async_delete::{AsyncDeleteWorker, ReferenceSafeDeleter};
use reg_datastore::Datastore;
use reg_domain::config::RegistryConfig;
use reg_flows::{DomainCreateAdmission, DomainCreateFlow, HostDeleteRequestFlow};
use reg_kernel::Clock;
use reg_labels::LabelCatalog;
use reg_queue::TaskQueues;
use reg_tmch::TmchVerifier;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub use reg_datastore as datastore;
pub use reg_domain as domain;
pub use reg_kernel as kernel;
pub use reg_queue as queue;

/// Feature slices and their build-time switches.
pub mod features {
    pub use reg_async_delete as async_delete;
    pub use reg_flows as flows;
    pub use reg_labels as labels;
    pub use reg_tmch as tmch;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        "flows",
        "labels",
        "tmch",
        "async-delete",
        #[cfg(feature = "issuance")]
        "issuance",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Failures while assembling the slices.
#[reg_derive::reg_error]
pub enum RegistryError {
    #[error("Label lists unavailable{}: {source}", format_context(.context))]
    Labels { source: reg_labels::LabelsError, context: Option<Cow<'static, str>> },

    #[error("TMCH trust material unavailable{}: {source}", format_context(.context))]
    Tmch { source: reg_tmch::TmchError, context: Option<Cow<'static, str>> },
}

/// Every long-lived piece of a running registry, built from one configuration.
#[derive(Debug, Clone)]
pub struct Registry {
    config: RegistryConfig,
    store: Datastore,
    queues: TaskQueues,
    create: DomainCreateFlow,
    host_delete: HostDeleteRequestFlow,
    deleter: ReferenceSafeDeleter,
}

impl Registry {
    /// Loads label lists and TMCH trust material, then wires flows, queues and the deleter
    /// around a fresh datastore.
    ///
    /// # Errors
    /// [`RegistryError::Labels`] or [`RegistryError::Tmch`] when configured files are missing or
    /// malformed.
    pub fn bootstrap(config: RegistryConfig, clock: Arc<dyn Clock>) -> Result<Self, RegistryError> {
        let labels = LabelCatalog::load(&config.lists).context("loading [lists]")?;
        let verifier = Arc::new(TmchVerifier::from_config(&config.tmch).context("loading [tmch]")?);
        Ok(Self::assemble(config, labels, verifier, clock))
    }

    /// Wires already loaded label data and verifier.
    #[must_use]
    pub fn assemble(
        config: RegistryConfig,
        labels: LabelCatalog,
        verifier: Arc<TmchVerifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let store = Datastore::builder()
            .cache_ttl(Duration::from_secs(config.caching.domain_ttl_seconds))
            .cache_capacity(config.caching.domain_capacity)
            .build();
        let queues = TaskQueues::new();

        let admission = DomainCreateAdmission::new(config.clone(), labels, verifier);
        let create = DomainCreateFlow::new(store.clone(), queues.clone(), admission);
        let host_delete = HostDeleteRequestFlow::new(store.clone(), queues.clone());
        let deleter =
            ReferenceSafeDeleter::new(store.clone(), clock, config.async_delete.scan_partitions);

        info!(
            tlds = config.tlds.len(),
            registrars = config.registrars.len(),
            partitions = config.async_delete.scan_partitions,
            "Registry assembled"
        );
        Self { config, store, queues, create, host_delete, deleter }
    }

    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &Datastore {
        &self.store
    }

    #[must_use]
    pub const fn queues(&self) -> &TaskQueues {
        &self.queues
    }

    #[must_use]
    pub const fn create_flow(&self) -> &DomainCreateFlow {
        &self.create
    }

    #[must_use]
    pub const fn host_delete_flow(&self) -> &HostDeleteRequestFlow {
        &self.host_delete
    }

    #[must_use]
    pub const fn deleter(&self) -> &ReferenceSafeDeleter {
        &self.deleter
    }

    /// A worker draining the async-delete queue through this registry's deleter.
    #[must_use]
    pub fn async_delete_worker(&self) -> AsyncDeleteWorker {
        AsyncDeleteWorker::new(self.deleter.clone(), self.queues.clone())
    }

    /// Closes all task queues; workers finish what is queued and stop.
    pub fn shutdown(&self) {
        self.queues.close();
        info!("Registry queues closed");
    }
}
