use crate::observer::{ReservedListCheck, ReservedListObserver, TracingListObserver};
use crate::reserved::ReservedList;
use fxhash::FxHashMap;
use reg_domain::reservation::ReservationType;
use reg_domain::tld::TldPolicy;
use std::sync::Arc;
use std::time::Instant;

/// One list that reserves a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationMatch {
    pub list: String,
    pub reservation_type: ReservationType,
}

/// Classifies labels against every reserved list bound to a zone.
#[derive(Debug, Clone)]
pub struct ReservationPolicy {
    lists: FxHashMap<String, Arc<ReservedList>>,
    observer: Arc<dyn ReservedListObserver>,
}

impl Default for ReservationPolicy {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ReservationPolicy {
    #[must_use]
    pub fn new(lists: impl IntoIterator<Item = ReservedList>) -> Self {
        Self {
            lists: lists.into_iter().map(|l| (l.name().to_owned(), Arc::new(l))).collect(),
            observer: Arc::new(TracingListObserver),
        }
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ReservedListObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Every list bound to `tld` that reserves `label`, in binding order.
    ///
    /// Lists named by the zone but not loaded are skipped.
    #[must_use]
    pub fn matches(&self, label: &str, tld: &TldPolicy) -> Vec<ReservationMatch> {
        let started = Instant::now();
        let matches: Vec<ReservationMatch> = tld
            .reserved_lists
            .iter()
            .filter_map(|name| self.lists.get(name))
            .filter_map(|list| {
                list.get(label).map(|entry| ReservationMatch {
                    list: list.name().to_owned(),
                    reservation_type: entry.reservation_type,
                })
            })
            .collect();

        let most_severe = matches.iter().max_by_key(|m| m.reservation_type.severity());
        self.observer.record(&ReservedListCheck {
            tld: &tld.name,
            match_count: matches.len(),
            most_severe_list: most_severe.map(|m| m.list.as_str()),
            most_severe_type: most_severe.map_or(ReservationType::Unreserved, |m| m.reservation_type),
            elapsed: started.elapsed(),
        });
        matches
    }

    /// The effective reservation of `label` in `tld`: the most severe match.
    #[must_use]
    pub fn reservation_type(&self, label: &str, tld: &TldPolicy) -> ReservationType {
        ReservationType::most_severe(self.matches(label, tld).into_iter().map(|m| m.reservation_type))
    }

    /// Whether `auth_code` unlocks an anchor tenant reservation for exactly (`label`, `tld`).
    #[must_use]
    pub fn matches_anchor_tenant(&self, label: &str, tld: &TldPolicy, auth_code: &str) -> bool {
        !auth_code.is_empty()
            && tld
                .reserved_lists
                .iter()
                .filter_map(|name| self.lists.get(name))
                .filter_map(|list| list.get(label))
                .any(|entry| {
                    entry.reservation_type == ReservationType::ReservedForAnchorTenant
                        && entry.auth_code.as_deref() == Some(auth_code)
                })
    }
}
