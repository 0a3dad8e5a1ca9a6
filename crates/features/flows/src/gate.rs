use crate::error::EppException;
use crate::name::find_tld;
use chrono::{DateTime, Utc};
use reg_datastore::Datastore;
use reg_domain::config::RegistryConfig;
use reg_domain::resources::GracePeriodSet;
use tracing::debug;

/// Transactionless pre-check for domain creates.
///
/// Reads through the datastore's domain cache, so the answer may be one TTL stale. A domain that
/// exists outside its ADD grace period cannot be freed before its deletion time, so a stale hit
/// is still a correct rejection. Everything else proceeds to the transactional path.
#[derive(Debug, Clone)]
pub struct FastExistenceGate {
    store: Datastore,
    config: RegistryConfig,
}

impl FastExistenceGate {
    #[must_use]
    pub const fn new(store: Datastore, config: RegistryConfig) -> Self {
        Self { store, config }
    }

    /// # Errors
    /// [`EppException::ResourceAlreadyExists`] when `fqdn` is registered and not in ADD grace.
    pub fn check(&self, fqdn: &str, now: DateTime<Utc>) -> Result<(), EppException> {
        let Some(domain) = self.store.load_domain_transactionless(fqdn, now) else {
            return Ok(());
        };
        if domain.grace_period_statuses(now).contains(GracePeriodSet::ADD) {
            debug!(fqdn, "Existing domain is in ADD grace, deferring to full validation");
            return Ok(());
        }
        debug!(fqdn, repo_id = %domain.repo_id, "Fast existence gate rejected create");
        Err(EppException::ResourceAlreadyExists { id: fqdn.to_owned() })
    }

    /// Allocates the repo id a create of `fqdn` would use.
    ///
    /// The name is not validated yet, so anything that does not resolve to a configured zone
    /// yields `None` and is left for full validation to reject.
    #[must_use]
    pub fn derive_repo_id(&self, fqdn: &str) -> Option<String> {
        if fqdn.is_empty() || fqdn.bytes().any(|b| b.is_ascii_uppercase() || b.is_ascii_whitespace()) {
            return None;
        }
        let tld = find_tld(fqdn, &self.config)?;
        Some(self.store.allocate_repo_id(&tld.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};
    use reg_domain::resources::{DomainResource, GracePeriod, StatusValues};
    use reg_domain::tld::TldPolicy;
    use reg_kernel::ids::parse_repo_id;
    use std::collections::BTreeSet;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
    }

    fn domain(fqdn: &str, grace: Option<DateTime<Utc>>) -> DomainResource {
        DomainResource {
            repo_id: "A-TLD".to_owned(),
            fully_qualified_domain_name: fqdn.to_owned(),
            tld: "tld".to_owned(),
            current_sponsor: "TheRegistrar".to_owned(),
            creation_time: now() - TimeDelta::days(1),
            deletion_time: None,
            registration_expiration_time: now() + TimeDelta::days(364),
            registrant: None,
            contacts: vec![],
            nameservers: BTreeSet::new(),
            subordinate_hosts: BTreeSet::new(),
            ds_data: vec![],
            launch_notice: None,
            smd_id: None,
            idn_table: None,
            grace_periods: grace
                .into_iter()
                .map(|expiration_time| GracePeriod {
                    kind: GracePeriodSet::ADD,
                    expiration_time,
                    client_id: "TheRegistrar".to_owned(),
                })
                .collect(),
            status: StatusValues::empty(),
        }
    }

    fn gate() -> FastExistenceGate {
        let mut config = RegistryConfig::default();
        config.tlds.insert("tld".to_owned(), TldPolicy::general_availability("tld"));
        FastExistenceGate::new(Datastore::builder().first_id(0x10).build(), config)
    }

    #[test]
    fn rejects_registered_names_outside_add_grace() {
        let gate = gate();
        gate.store.seed_domain(domain("taken.tld", None));
        assert_eq!(
            gate.check("taken.tld", now()),
            Err(EppException::ResourceAlreadyExists { id: "taken.tld".to_owned() })
        );
        assert_eq!(gate.check("free.tld", now()), Ok(()));
    }

    #[test]
    fn add_grace_proceeds_until_it_lapses() {
        let gate = gate();
        gate.store.seed_domain(domain("fresh.tld", Some(now() + TimeDelta::days(5))));
        assert_eq!(gate.check("fresh.tld", now()), Ok(()));
        assert!(gate.check("fresh.tld", now() + TimeDelta::days(6)).is_err());
    }

    #[test]
    fn repo_id_derivation_absorbs_bad_names() {
        let gate = gate();
        let id = gate.derive_repo_id("example.tld").unwrap();
        assert_eq!(parse_repo_id(&id), Some((0x10, "TLD")));

        assert_eq!(gate.derive_repo_id(""), None);
        assert_eq!(gate.derive_repo_id("Example.tld"), None);
        assert_eq!(gate.derive_repo_id("example.nope"), None);
        assert_eq!(gate.derive_repo_id("tld"), None);
    }
}
