use reg_domain::reservation::ReservationType;
use std::fmt::Debug;
use std::time::Duration;
use tracing::debug;

/// Outcome of checking one label against a zone's reserved lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservedListCheck<'a> {
    pub tld: &'a str,
    pub match_count: usize,
    /// `None` when nothing matched.
    pub most_severe_list: Option<&'a str>,
    pub most_severe_type: ReservationType,
    pub elapsed: Duration,
}

/// Receives every reserved-list classification.
pub trait ReservedListObserver: Send + Sync + Debug {
    fn record(&self, check: &ReservedListCheck<'_>);
}

/// Emits each check as a `debug` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingListObserver;

impl ReservedListObserver for TracingListObserver {
    fn record(&self, check: &ReservedListCheck<'_>) {
        debug!(
            tld = check.tld,
            matches = check.match_count,
            list = check.most_severe_list.unwrap_or("(none)"),
            reservation = %check.most_severe_type,
            elapsed_us = u64::try_from(check.elapsed.as_micros()).unwrap_or(u64::MAX),
            "Reserved list check"
        );
    }
}
