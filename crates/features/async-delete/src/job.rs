use crate::error::{AsyncDeleteError, AsyncDeleteErrorExt};
use chrono::{DateTime, Utc};
use reg_datastore::{Datastore, Snapshot, Transaction};
use reg_kernel::Clock;
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt::{self, Debug};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// How a deletion job ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Deleted,
    /// An active parent still references the target; it stays, pending delete cleared.
    BlockedByReference,
    /// The requester neither sponsors the target nor is a superuser.
    BlockedBySponsorship,
    /// Nothing was changed.
    Abandoned { reason: Cow<'static, str> },
}

impl JobOutcome {
    pub fn abandoned(reason: impl Into<Cow<'static, str>>) -> Self {
        Self::Abandoned { reason: reason.into() }
    }

    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted)
    }
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deleted => f.write_str("deleted"),
            Self::BlockedByReference => f.write_str("blocked by reference"),
            Self::BlockedBySponsorship => f.write_str("blocked by sponsorship"),
            Self::Abandoned { reason } => write!(f, "abandoned: {reason}"),
        }
    }
}

/// A two-phase deletion: a read-only partitioned scan, then one committing transaction.
pub trait DeletionJob: Send + Sync + Debug + 'static {
    /// Repo id of the resource to delete.
    fn target(&self) -> &str;

    /// Whether any active parent in `partition` of `partitions` references the target.
    ///
    /// Must be pure over `snapshot`: partitions may run in any order, concurrently, and more
    /// than once.
    fn scan_partition(
        &self,
        snapshot: &Snapshot,
        partition: usize,
        partitions: usize,
        now: DateTime<Utc>,
    ) -> bool;

    /// Re-checks the target inside `tx` and acts on it. `referenced` is the scan result.
    fn commit(&self, tx: &mut Transaction<'_>, referenced: bool, now: DateTime<Utc>) -> JobOutcome;
}

/// Scan state of one job, enough to resume after an interruption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobProgress {
    pub target: String,
    pub partitions: usize,
    /// Partitions already scanned.
    pub completed: BTreeSet<usize>,
    /// OR of every completed partition.
    pub referenced: bool,
    pub outcome: Option<JobOutcome>,
}

impl JobProgress {
    #[must_use]
    pub fn new(target: impl Into<String>, partitions: usize) -> Self {
        Self {
            target: target.into(),
            partitions: partitions.max(1),
            completed: BTreeSet::new(),
            referenced: false,
            outcome: None,
        }
    }

    /// Whether the scan phase has an answer.
    #[must_use]
    pub fn scan_finished(&self) -> bool {
        self.referenced || self.completed.len() >= self.partitions
    }

    fn pending(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.partitions).filter(|p| !self.completed.contains(p))
    }
}

/// Runs [`DeletionJob`]s against a datastore.
#[derive(Debug, Clone)]
pub struct ReferenceSafeDeleter {
    store: Datastore,
    clock: Arc<dyn Clock>,
    partitions: usize,
}

impl ReferenceSafeDeleter {
    #[must_use]
    pub fn new(store: Datastore, clock: Arc<dyn Clock>, partitions: usize) -> Self {
        Self { store, clock, partitions: partitions.max(1) }
    }

    #[must_use]
    pub const fn store(&self) -> &Datastore {
        &self.store
    }

    /// Scans and commits `job` from scratch. Never fails: problems become [`JobOutcome::Abandoned`].
    pub async fn run<J: DeletionJob>(&self, job: Arc<J>) -> JobOutcome {
        let mut progress = JobProgress::new(job.target(), self.partitions);
        self.resume(job, &mut progress).await
    }

    /// Continues `job` from `progress`, skipping partitions it already covers.
    pub async fn resume<J: DeletionJob>(&self, job: Arc<J>, progress: &mut JobProgress) -> JobOutcome {
        if let Some(outcome) = &progress.outcome {
            return outcome.clone();
        }

        let outcome = match self.scan(Arc::clone(&job), progress).await {
            Ok(()) => self.commit(job.as_ref(), progress.referenced),
            Err(e) => {
                warn!(repo_id = %progress.target, error = %e, "Deletion scan failed, leaving target untouched");
                JobOutcome::abandoned(e.to_string())
            },
        };
        progress.outcome = Some(outcome.clone());
        outcome
    }

    /// Scans every pending partition of `progress` concurrently over one snapshot.
    ///
    /// Stops early at the first referencing partition. Completed partitions are recorded as they
    /// finish, so an interrupted scan resumes where it stopped.
    ///
    /// # Errors
    /// [`AsyncDeleteError::Join`] if a partition task panicked.
    pub async fn scan<J: DeletionJob>(
        &self,
        job: Arc<J>,
        progress: &mut JobProgress,
    ) -> Result<(), AsyncDeleteError> {
        if progress.scan_finished() {
            return Ok(());
        }
        let snapshot = self.store.snapshot();
        let now = self.clock.now();
        let partitions = progress.partitions;

        let mut tasks = JoinSet::new();
        for partition in progress.pending() {
            let job = Arc::clone(&job);
            let snapshot = snapshot.clone();
            tasks.spawn_blocking(move || {
                (partition, job.scan_partition(&snapshot, partition, partitions, now))
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let (partition, referenced) = joined.context("joining scan partition")?;
            progress.completed.insert(partition);
            if referenced {
                debug!(repo_id = %progress.target, partition, "Reference found, stopping scan");
                progress.referenced = true;
                tasks.shutdown().await;
                break;
            }
        }
        Ok(())
    }

    /// Runs the commit phase in one transaction.
    pub fn commit<J: DeletionJob + ?Sized>(&self, job: &J, referenced: bool) -> JobOutcome {
        let now = self.clock.now();
        let outcome = self
            .store
            .transact(|tx| Ok::<_, Infallible>(job.commit(tx, referenced, now)))
            .unwrap_or_else(|never| match never {});

        match &outcome {
            JobOutcome::Abandoned { reason } => warn!(repo_id = job.target(), %reason, "Deletion abandoned"),
            outcome => info!(repo_id = job.target(), %outcome, "Deletion job committed"),
        }
        outcome
    }
}
