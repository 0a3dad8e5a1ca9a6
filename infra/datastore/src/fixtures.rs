use crate::error::{DatastoreError, DatastoreErrorExt};
use reg_domain::resources::{ContactResource, DomainResource, HostResource};
use serde::Deserialize;
use std::path::Path;

/// Resources to preload, as read from a JSON document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Fixtures {
    pub domains: Vec<DomainResource>,
    pub hosts: Vec<HostResource>,
    pub contacts: Vec<ContactResource>,
}

impl Fixtures {
    /// # Errors
    /// [`DatastoreError::Io`] or [`DatastoreError::Decode`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatastoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .context(format!("reading fixtures from {}", path.display()))?;
        Self::from_json(&raw)
    }

    /// # Errors
    /// [`DatastoreError::Decode`] when `raw` does not describe fixtures.
    pub fn from_json(raw: &str) -> Result<Self, DatastoreError> {
        Ok(serde_json::from_str(raw).context("decoding fixtures")?)
    }
}
