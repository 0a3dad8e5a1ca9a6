//! # Async Delete
//!
//! Reference-safe deletion of shared child resources. A host may be listed as a nameserver by any
//! number of domains, so deleting it is a two-phase job:
//!
//! 1.  **Scan:** every domain partition of one snapshot is checked concurrently for a reference
//!     to the target; the partition answers are OR-ed. Progress is checkpointed per partition in
//!     [`JobProgress`].
//! 2.  **Commit:** one transaction re-reads the target, re-checks references against current
//!     state, and either deletes it or clears its pending-delete status. The requesting registrar
//!     gets a poll message either way.
//!
//! Jobs never raise. Anything doubtful leaves the target untouched and ends as
//! [`JobOutcome::Abandoned`].

mod error;
mod host;
mod job;
mod worker;

pub use crate::error::{AsyncDeleteError, AsyncDeleteErrorExt};
pub use crate::host::HostDeletionJob;
pub use crate::job::{DeletionJob, JobOutcome, JobProgress, ReferenceSafeDeleter};
pub use crate::worker::AsyncDeleteWorker;
