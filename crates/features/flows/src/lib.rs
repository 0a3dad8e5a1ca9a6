//! # Flows
//!
//! Registrar-facing commands that change registry state.
//!
//! ## Domain create
//!
//! 1.  **Fast gate ([`FastExistenceGate`]):** a transactionless, cacheable lookup that rejects
//!     names which are registered and outside their ADD grace period. It never approves.
//! 2.  **Admission ([`DomainCreateAdmission`]):** the ordered checks of [`AdmissionStep::ALL`],
//!     first failure wins, producing a [`DomainCreatePlan`] or an [`EppException`].
//! 3.  **Commit ([`DomainCreateFlow`]):** admission re-runs inside the transaction that persists
//!     the domain, so the existence check and the write see the same state.
//!
//! ## Host delete
//!
//! [`HostDeleteRequestFlow`] only marks the host pending delete and queues a deletion request;
//! the reference check happens later in the asynchronous deleter.

mod admission;
mod create;
pub mod dnssec;
mod error;
mod gate;
mod host_delete;
pub mod idn;
pub mod launch;
pub mod name;
mod observer;

pub use crate::admission::{AdmissionRequest, DomainCreateAdmission, DomainCreatePlan};
pub use crate::create::{DomainCreateFlow, DomainCreated};
pub use crate::error::EppException;
pub use crate::gate::FastExistenceGate;
pub use crate::host_delete::{HostDeleteRequest, HostDeleteRequestFlow};
pub use crate::observer::{AdmissionObserver, AdmissionStep, StepOutcome, TracingObserver};
