//! # Labels
//!
//! Per-label zone policy data: reserved lists, the trademark claims list and premium prices.
//! Lists are parsed once from text and then shared read-only between requests.
//!
//! [`LabelCatalog`] bundles the three and can be loaded from the `[lists]` config section.

mod claims;
mod error;
mod observer;
mod policy;
mod premium;
mod reserved;

pub use crate::claims::{ClaimsList, ClaimsRegistry};
pub use crate::error::{LabelsError, LabelsErrorExt};
pub use crate::observer::{ReservedListCheck, ReservedListObserver, TracingListObserver};
pub use crate::policy::{ReservationMatch, ReservationPolicy};
pub use crate::premium::{CreateCost, PremiumList, Pricing};
pub use crate::reserved::{ReservedList, ReservedListEntry};

use reg_domain::config::ListsConfig;
use std::path::Path;
use tracing::info;

/// All label data a create flow consults.
#[derive(Debug, Clone, Default)]
pub struct LabelCatalog {
    pub reservations: ReservationPolicy,
    pub claims: ClaimsRegistry,
    pub pricing: Pricing,
}

impl LabelCatalog {
    /// Reads every list named in `config`.
    ///
    /// # Errors
    /// [`LabelsError::Io`] for unreadable files, [`LabelsError::Parse`] for malformed ones.
    pub fn load(config: &ListsConfig) -> Result<Self, LabelsError> {
        let reserved = config
            .reserved
            .iter()
            .map(|(name, path)| ReservedList::parse(name, &read(path)?))
            .collect::<Result<Vec<_>, _>>()?;
        let premium = config
            .premium
            .iter()
            .map(|(name, path)| PremiumList::parse(name, &read(path)?))
            .collect::<Result<Vec<_>, _>>()?;
        let claims = match &config.claims {
            Some(path) => ClaimsRegistry::new(ClaimsList::parse(&read(path)?)?),
            None => ClaimsRegistry::default(),
        };

        info!(
            reserved = reserved.len(),
            premium = premium.len(),
            claims = claims.list().len(),
            "Label lists loaded"
        );
        Ok(Self {
            reservations: ReservationPolicy::new(reserved),
            claims,
            pricing: Pricing::new(premium),
        })
    }
}

fn read(path: &Path) -> Result<String, LabelsError> {
    std::fs::read_to_string(path).context(format!("reading {}", path.display()))
}

/// Splits a list line into its trimmed body and optional `#` comment.
pub(crate) fn split_comment(line: &str) -> (&str, Option<&str>) {
    match line.split_once('#') {
        Some((body, comment)) => (body.trim(), Some(comment.trim()).filter(|c| !c.is_empty())),
        None => (line.trim(), None),
    }
}
