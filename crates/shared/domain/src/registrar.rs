use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Registrar settings the create pipeline consults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Registrar {
    pub client_id: String,
    pub allowed_tlds: BTreeSet<String>,
    pub block_premium_names: bool,
}

impl Registrar {
    #[must_use]
    pub fn new(client_id: impl Into<String>) -> Self {
        Self { client_id: client_id.into(), ..Self::default() }
    }

    #[must_use]
    pub fn with_tld(mut self, tld: impl Into<String>) -> Self {
        self.allowed_tlds.insert(tld.into());
        self
    }
}
