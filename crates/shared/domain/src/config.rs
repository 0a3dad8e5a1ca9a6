use crate::registrar::Registrar;
use crate::tld::TldPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level registry configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistryConfigInner {
    pub tmch: TmchConfig,
    pub caching: CachingConfig,
    pub flows: FlowsConfig,
    pub async_delete: AsyncDeleteConfig,
    pub logging: LoggingConfig,
    pub lists: ListsConfig,
    /// Zone policies keyed by zone name.
    pub tlds: BTreeMap<String, TldPolicy>,
    /// Registrars keyed by client id.
    pub registrars: BTreeMap<String, Registrar>,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    #[serde(flatten, default)]
    inner: Arc<RegistryConfigInner>,
}

impl Deref for RegistryConfig {
    type Target = RegistryConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for RegistryConfig {
    fn deref_mut(&mut self) -> &mut RegistryConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

impl RegistryConfig {
    /// Zone policy by name, with the map key filled in as the policy name.
    #[must_use]
    pub fn tld(&self, name: &str) -> Option<TldPolicy> {
        self.tlds.get(name).map(|policy| {
            let mut policy = policy.clone();
            if policy.name.is_empty() {
                name.clone_into(&mut policy.name);
            }
            policy
        })
    }

    #[must_use]
    pub fn registrar(&self, client_id: &str) -> Option<Registrar> {
        self.registrars.get(client_id).map(|r| {
            let mut r = r.clone();
            if r.client_id.is_empty() {
                client_id.clone_into(&mut r.client_id);
            }
            r
        })
    }
}

/// Which trademark clearinghouse trust root signed marks must chain to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TmchCaMode {
    #[default]
    Production,
    Pilot,
}

/// Trademark clearinghouse trust material.
///
/// Root keys are base64 encoded Ed25519 public keys.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TmchConfig {
    pub mode: TmchCaMode,
    pub production_root: String,
    pub pilot_root: String,
    /// Certificate revocation list (JSON).
    pub crl_path: Option<PathBuf>,
    /// Signed mark revocation list (CSV).
    pub smdrl_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CachingConfig {
    /// TTL of transactionless domain loads. Zero disables the cache.
    pub domain_ttl_seconds: u64,
    pub domain_capacity: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FlowsConfig {
    pub max_registration_years: u32,
    pub max_nameservers: usize,
    pub max_ds_records: usize,
    pub claims_acceptance_window_hours: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AsyncDeleteConfig {
    pub scan_partitions: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub name: String,
    pub level: String,
    pub filter: Option<String>,
    /// Directory for rolling log files; console only when unset.
    pub path: Option<PathBuf>,
    pub json: bool,
}

/// Where list files are read from.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListsConfig {
    /// Reserved list name to file.
    pub reserved: BTreeMap<String, PathBuf>,
    /// Premium list name to file.
    pub premium: BTreeMap<String, PathBuf>,
    pub claims: Option<PathBuf>,
}

// --- Default ---

impl Default for CachingConfig {
    fn default() -> Self {
        Self { domain_ttl_seconds: 10, domain_capacity: 10_000 }
    }
}

impl Default for FlowsConfig {
    fn default() -> Self {
        Self {
            max_registration_years: 10,
            max_nameservers: 13,
            max_ds_records: 8,
            claims_acceptance_window_hours: 48,
        }
    }
}

impl Default for AsyncDeleteConfig {
    fn default() -> Self {
        Self { scan_partitions: 8 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            name: "registry".to_owned(),
            level: "info".to_owned(),
            filter: None,
            path: None,
            json: false,
        }
    }
}
