//! The parsed domain create command and its extensions.
//!
//! Produced by the transport layer, immutable once received.

use crate::money::Money;
use crate::tld::LaunchPhase;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactRole {
    Admin,
    Billing,
    Tech,
}

/// A contact reference with its (possibly missing) role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignatedContact {
    #[serde(rename = "type")]
    pub role: Option<ContactRole>,
    pub contact_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodUnit {
    #[serde(rename = "y")]
    Years,
    #[serde(rename = "m")]
    Months,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub unit: PeriodUnit,
    pub value: u32,
}

impl Period {
    #[must_use]
    pub const fn years(value: u32) -> Self {
        Self { unit: PeriodUnit::Years, value }
    }
}

impl Default for Period {
    fn default() -> Self {
        Self::years(1)
    }
}

/// One delegation signer record; `digest` is hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DsData {
    pub key_tag: u16,
    pub algorithm: u8,
    pub digest_type: u8,
    pub digest: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecDnsCreate {
    pub ds_data: Vec<DsData>,
    pub max_sig_life: Option<u64>,
}

/// A signed mark as it arrived on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "form")]
pub enum SignedMarkEvidence {
    /// `encodedSignedMark`: armored, base64 encoded SMD.
    Encoded { encoding: String, data: String },
    /// An inline (unencoded) signed mark, identified by its id.
    Unencoded { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeMark {
    pub code: String,
}

/// Claims notice acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchNotice {
    pub tcn_id: String,
    pub validator_id: String,
    pub expiration_time: DateTime<Utc>,
    pub accepted_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchCreate {
    pub phase: LaunchPhase,
    #[serde(default)]
    pub signed_marks: Vec<SignedMarkEvidence>,
    #[serde(default)]
    pub code_marks: Vec<CodeMark>,
    #[serde(default)]
    pub notice: Option<LaunchNotice>,
}

impl LaunchCreate {
    #[must_use]
    pub fn has_signed_marks(&self) -> bool {
        !self.signed_marks.is_empty()
    }
}

/// Fee acknowledgement sent with the command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeCreate {
    pub fee: Money,
}

/// A domain create command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommand {
    pub fully_qualified_domain_name: String,
    #[serde(default)]
    pub period: Period,
    pub registrant: Option<String>,
    #[serde(default)]
    pub contacts: Vec<DesignatedContact>,
    /// Fully qualified host names.
    #[serde(default)]
    pub nameservers: Vec<String>,
    #[serde(default)]
    pub auth_password: String,
    #[serde(default)]
    pub sec_dns: Option<SecDnsCreate>,
    #[serde(default)]
    pub launch: Option<LaunchCreate>,
    #[serde(default)]
    pub fee: Option<FeeCreate>,
}

impl CreateCommand {
    /// Whether the command carries sunrise evidence (at least one signed mark).
    #[must_use]
    pub fn is_sunrise_create(&self) -> bool {
        self.launch.as_ref().is_some_and(LaunchCreate::has_signed_marks)
    }

    #[must_use]
    pub fn claims_notice(&self) -> Option<&LaunchNotice> {
        self.launch.as_ref().and_then(|l| l.notice.as_ref())
    }
}
