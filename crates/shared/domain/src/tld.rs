//! Per-zone registry policy.

use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Lifecycle state of a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TldState {
    Predelegation,
    Sunrise,
    Sunrush,
    Landrush,
    QuietPeriod,
    GeneralAvailability,
}

/// Launch phase named by the launch extension of a create command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchPhase {
    Sunrise,
    Sunrush,
    Landrush,
    Claims,
    Open,
}

impl TldState {
    /// Launch phases a command may name while the zone is in this state.
    #[must_use]
    pub const fn accepted_launch_phases(self) -> &'static [LaunchPhase] {
        match self {
            Self::Predelegation | Self::QuietPeriod => &[],
            Self::Sunrise => &[LaunchPhase::Sunrise],
            Self::Sunrush => &[LaunchPhase::Sunrush],
            Self::Landrush => &[LaunchPhase::Landrush],
            Self::GeneralAvailability => &[LaunchPhase::Claims, LaunchPhase::Open],
        }
    }

    /// States in which a create carrying signed marks is a sunrise registration.
    #[must_use]
    pub const fn accepts_signed_marks(self) -> bool {
        matches!(self, Self::Sunrise | Self::Sunrush)
    }
}

/// Policy snapshot for one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TldPolicy {
    /// Zone name without a leading dot, e.g. `example` or `co.uk`.
    pub name: String,
    /// State transitions keyed by the instant they take effect.
    pub state_transitions: BTreeMap<DateTime<Utc>, TldState>,
    pub claims_period_end: DateTime<Utc>,
    /// Standard one-year create cost; also fixes the zone currency.
    pub create_cost: Money,
    pub reserved_lists: Vec<String>,
    pub premium_list: Option<String>,
    /// Names of IDN tables a label may conform to.
    pub idn_tables: Vec<String>,
    /// When non-empty, only these contact ids may be registrants.
    pub allowed_registrant_contact_ids: BTreeSet<String>,
    /// When non-empty, only these hosts may be nameservers.
    pub allowed_fully_qualified_host_names: BTreeSet<String>,
    pub min_nameservers: usize,
    pub add_grace_period_days: u32,
}

impl Default for TldPolicy {
    fn default() -> Self {
        Self {
            name: String::new(),
            state_transitions: BTreeMap::from([(DateTime::<Utc>::UNIX_EPOCH, TldState::Predelegation)]),
            claims_period_end: DateTime::<Utc>::MAX_UTC,
            create_cost: Money::new("USD", 1300),
            reserved_lists: Vec::new(),
            premium_list: None,
            idn_tables: Vec::new(),
            allowed_registrant_contact_ids: BTreeSet::new(),
            allowed_fully_qualified_host_names: BTreeSet::new(),
            min_nameservers: 0,
            add_grace_period_days: 5,
        }
    }
}

impl TldPolicy {
    /// A zone that has been in general availability since the epoch.
    #[must_use]
    pub fn general_availability(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state_transitions: BTreeMap::from([(
                DateTime::<Utc>::UNIX_EPOCH,
                TldState::GeneralAvailability,
            )]),
            ..Self::default()
        }
    }

    /// State in effect at `now`: the latest transition at or before it.
    #[must_use]
    pub fn state_at(&self, now: DateTime<Utc>) -> TldState {
        self.state_transitions
            .range(..=now)
            .next_back()
            .map_or(TldState::Predelegation, |(_, state)| *state)
    }

    #[must_use]
    pub fn in_claims_period(&self, now: DateTime<Utc>) -> bool {
        now < self.claims_period_end
    }

    #[must_use]
    pub fn currency(&self) -> &str {
        self.create_cost.currency()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn state_follows_latest_transition() {
        let sunrise = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let ga = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let policy = TldPolicy {
            state_transitions: BTreeMap::from([
                (DateTime::<Utc>::UNIX_EPOCH, TldState::Predelegation),
                (sunrise, TldState::Sunrise),
                (ga, TldState::GeneralAvailability),
            ]),
            ..TldPolicy::default()
        };

        assert_eq!(policy.state_at(sunrise - chrono::Duration::seconds(1)), TldState::Predelegation);
        assert_eq!(policy.state_at(sunrise), TldState::Sunrise);
        assert_eq!(policy.state_at(ga + chrono::Duration::days(400)), TldState::GeneralAvailability);
    }

    #[test]
    fn claims_period_is_open_until_its_end() {
        let end = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let policy = TldPolicy { claims_period_end: end, ..TldPolicy::default() };
        assert!(policy.in_claims_period(end - chrono::Duration::milliseconds(1)));
        assert!(!policy.in_claims_period(end));
    }
}
