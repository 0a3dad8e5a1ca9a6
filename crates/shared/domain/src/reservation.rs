//! Reservation severity scale.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a label is reserved on a reserved list.
///
/// Ordering is driven by the explicit [`ReservationType::severity`] rank, never by declaration
/// order: when a label appears on several lists the most severe type supplies the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationType {
    Unreserved,
    NameserverRestricted,
    AllowedInSunrise,
    MistakenPremium,
    ReservedForAnchorTenant,
    NameCollision,
    FullyBlocked,
}

impl ReservationType {
    /// Every type, lowest severity first.
    pub const ALL: [Self; 7] = [
        Self::Unreserved,
        Self::NameserverRestricted,
        Self::AllowedInSunrise,
        Self::MistakenPremium,
        Self::ReservedForAnchorTenant,
        Self::NameCollision,
        Self::FullyBlocked,
    ];

    #[must_use]
    pub const fn severity(self) -> u8 {
        match self {
            Self::Unreserved => 0,
            Self::NameserverRestricted => 1,
            Self::AllowedInSunrise => 2,
            Self::MistakenPremium => 3,
            Self::ReservedForAnchorTenant => 4,
            Self::NameCollision => 5,
            Self::FullyBlocked => 6,
        }
    }

    /// Message shown to registrars for a label with this reservation, if any.
    #[must_use]
    pub const fn message_for_check(self) -> Option<&'static str> {
        match self {
            Self::Unreserved => None,
            Self::NameserverRestricted => Some("Nameserver restricted"),
            Self::AllowedInSunrise => Some("Reserved for non-sunrise"),
            Self::MistakenPremium | Self::ReservedForAnchorTenant | Self::FullyBlocked => {
                Some("Reserved")
            },
            Self::NameCollision => Some("Cannot be delegated"),
        }
    }

    /// The most severe type of `types`, [`ReservationType::Unreserved`] when empty.
    #[must_use]
    pub fn most_severe<I: IntoIterator<Item = Self>>(types: I) -> Self {
        types.into_iter().max_by_key(|t| t.severity()).unwrap_or(Self::Unreserved)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unreserved => "UNRESERVED",
            Self::NameserverRestricted => "NAMESERVER_RESTRICTED",
            Self::AllowedInSunrise => "ALLOWED_IN_SUNRISE",
            Self::MistakenPremium => "MISTAKEN_PREMIUM",
            Self::ReservedForAnchorTenant => "RESERVED_FOR_ANCHOR_TENANT",
            Self::NameCollision => "NAME_COLLISION",
            Self::FullyBlocked => "FULLY_BLOCKED",
        }
    }
}

impl PartialOrd for ReservationType {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ReservationType {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.severity().cmp(&other.severity())
    }
}

impl fmt::Display for ReservationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown reservation type '{s}'"))
    }
}
