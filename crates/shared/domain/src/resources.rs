//! Persisted registry resources and their audit records.

use crate::command::{DesignatedContact, DsData, LaunchNotice};
use bitflags::bitflags;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::net::IpAddr;

bitflags! {
    /// Grace periods a domain can be in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct GracePeriodSet: u8 {
        /// Only this one allows instantaneous reversal (delete refunds and frees the name).
        const ADD = 1 << 0;
        const RENEW = 1 << 1;
        const TRANSFER = 1 << 2;
        const AUTO_RENEW = 1 << 3;
        const REDEMPTION = 1 << 4;
    }
}

bitflags! {
    /// EPP status values relevant to the core.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct StatusValues: u16 {
        const PENDING_DELETE = 1 << 0;
        const PENDING_TRANSFER = 1 << 1;
        const CLIENT_HOLD = 1 << 2;
        const SERVER_HOLD = 1 << 3;
        const CLIENT_DELETE_PROHIBITED = 1 << 4;
        const SERVER_DELETE_PROHIBITED = 1 << 5;
        const INACTIVE = 1 << 6;
    }
}

/// A grace period attached to a domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GracePeriod {
    /// Exactly one flag.
    pub kind: GracePeriodSet,
    pub expiration_time: DateTime<Utc>,
    pub client_id: String,
}

/// Fields shared by every resource.
pub trait EppResource {
    fn repo_id(&self) -> &str;
    fn deletion_time(&self) -> Option<DateTime<Utc>>;
    fn status(&self) -> StatusValues;

    fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.deletion_time().is_none_or(|t| t > now)
    }

    fn is_pending_delete(&self) -> bool {
        self.status().contains(StatusValues::PENDING_DELETE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainResource {
    pub repo_id: String,
    pub fully_qualified_domain_name: String,
    pub tld: String,
    pub current_sponsor: String,
    pub creation_time: DateTime<Utc>,
    pub deletion_time: Option<DateTime<Utc>>,
    pub registration_expiration_time: DateTime<Utc>,
    pub registrant: Option<String>,
    pub contacts: Vec<DesignatedContact>,
    /// Repo ids of nameserver hosts.
    pub nameservers: BTreeSet<String>,
    /// Fully qualified names of hosts subordinate to this domain.
    pub subordinate_hosts: BTreeSet<String>,
    pub ds_data: Vec<DsData>,
    pub launch_notice: Option<LaunchNotice>,
    pub smd_id: Option<String>,
    pub idn_table: Option<String>,
    pub grace_periods: Vec<GracePeriod>,
    pub status: StatusValues,
}

impl DomainResource {
    /// Grace periods still running at `now`.
    #[must_use]
    pub fn grace_period_statuses(&self, now: DateTime<Utc>) -> GracePeriodSet {
        self.grace_periods
            .iter()
            .filter(|gp| gp.expiration_time > now)
            .fold(GracePeriodSet::empty(), |acc, gp| acc | gp.kind)
    }
}

impl EppResource for DomainResource {
    fn repo_id(&self) -> &str {
        &self.repo_id
    }

    fn deletion_time(&self) -> Option<DateTime<Utc>> {
        self.deletion_time
    }

    fn status(&self) -> StatusValues {
        self.status
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostResource {
    pub repo_id: String,
    pub fully_qualified_host_name: String,
    pub current_sponsor: String,
    #[serde(default)]
    pub inet_addresses: Vec<IpAddr>,
    /// Repo id of the registry domain this host is subordinate to.
    #[serde(default)]
    pub superordinate_domain: Option<String>,
    #[serde(default)]
    pub deletion_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: StatusValues,
}

impl EppResource for HostResource {
    fn repo_id(&self) -> &str {
        &self.repo_id
    }

    fn deletion_time(&self) -> Option<DateTime<Utc>> {
        self.deletion_time
    }

    fn status(&self) -> StatusValues {
        self.status
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResource {
    pub repo_id: String,
    pub contact_id: String,
    pub current_sponsor: String,
    #[serde(default)]
    pub deletion_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: StatusValues,
}

impl EppResource for ContactResource {
    fn repo_id(&self) -> &str {
        &self.repo_id
    }

    fn deletion_time(&self) -> Option<DateTime<Utc>> {
        self.deletion_time
    }

    fn status(&self) -> StatusValues {
        self.status
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryType {
    DomainCreate,
    HostPendingDelete,
    HostDelete,
    HostDeleteFailure,
}

/// Audit record written with every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Repo id of the resource this entry belongs to.
    pub parent: String,
    pub kind: HistoryType,
    pub client_id: String,
    pub modification_time: DateTime<Utc>,
    pub by_superuser: bool,
}

/// Asynchronous notice delivered to a registrar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollMessage {
    pub client_id: String,
    pub parent: String,
    pub event_time: DateTime<Utc>,
    pub message: String,
}
