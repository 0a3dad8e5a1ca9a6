use crate::admission::{AdmissionRequest, DomainCreateAdmission, DomainCreatePlan};
use crate::error::EppException;
use crate::gate::FastExistenceGate;
use chrono::{DateTime, Months, TimeDelta, Utc};
use reg_datastore::Datastore;
use reg_domain::resources::{
    DomainResource, GracePeriod, GracePeriodSet, HistoryEntry, HistoryType, StatusValues,
};
use reg_queue::{DnsRefresh, TaskQueues};
use std::collections::BTreeSet;
use tracing::{info, warn};

/// A committed domain create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainCreated {
    pub repo_id: String,
    pub creation_time: DateTime<Utc>,
    pub expiration_time: DateTime<Utc>,
    pub plan: DomainCreatePlan,
}

/// Fast gate, then admission and persistence inside one transaction.
#[derive(Debug, Clone)]
pub struct DomainCreateFlow {
    store: Datastore,
    queues: TaskQueues,
    gate: FastExistenceGate,
    admission: DomainCreateAdmission,
}

impl DomainCreateFlow {
    #[must_use]
    pub fn new(store: Datastore, queues: TaskQueues, admission: DomainCreateAdmission) -> Self {
        let gate = FastExistenceGate::new(store.clone(), admission.config().clone());
        Self { store, queues, gate, admission }
    }

    #[must_use]
    pub const fn admission(&self) -> &DomainCreateAdmission {
        &self.admission
    }

    /// Runs admission against the committed state without writing anything.
    ///
    /// # Errors
    /// The rejection the real create would return.
    pub fn dry_run(&self, request: &AdmissionRequest<'_>) -> Result<DomainCreatePlan, EppException> {
        let fqdn = &request.command.fully_qualified_domain_name;
        self.gate.check(fqdn, request.now)?;
        self.admission.admit(&self.store.snapshot(), request)
    }

    /// # Errors
    /// The first rejection of the fast gate or the admission pipeline. Nothing is written then.
    pub fn run(&self, request: &AdmissionRequest<'_>) -> Result<DomainCreated, EppException> {
        let fqdn = &request.command.fully_qualified_domain_name;
        let repo_id = self.gate.derive_repo_id(fqdn);
        self.gate.check(fqdn, request.now)?;

        let created = self.store.transact(|tx| {
            let plan = self.admission.admit(tx, request)?;
            let repo_id = repo_id.unwrap_or_else(|| tx.allocate_repo_id(&plan.tld));
            let domain = new_domain(repo_id, &plan, request)?;

            tx.record_history(HistoryEntry {
                parent: domain.repo_id.clone(),
                kind: HistoryType::DomainCreate,
                client_id: request.registrar.client_id.clone(),
                modification_time: request.now,
                by_superuser: request.is_superuser,
            });
            let dns = self.queues.dns.clone();
            let name = domain.fully_qualified_domain_name.clone();
            tx.after_commit(move || {
                if let Err(e) = dns.add(DnsRefresh::Domain(name)) {
                    warn!(error = %e, "Domain DNS refresh not enqueued");
                }
            });

            let created = DomainCreated {
                repo_id: domain.repo_id.clone(),
                creation_time: domain.creation_time,
                expiration_time: domain.registration_expiration_time,
                plan,
            };
            tx.put_domain(domain);
            Ok::<_, EppException>(created)
        })?;

        info!(
            fqdn = %created.plan.fully_qualified_domain_name,
            repo_id = %created.repo_id,
            registrar = %request.registrar.client_id,
            years = created.plan.years,
            cost = %created.plan.cost,
            "Domain created"
        );
        Ok(created)
    }
}

fn new_domain(
    repo_id: String,
    plan: &DomainCreatePlan,
    request: &AdmissionRequest<'_>,
) -> Result<DomainResource, EppException> {
    let now = request.now;
    let expiration = now
        .checked_add_months(Months::new(plan.years.saturating_mul(12)))
        .ok_or(EppException::ExpirationOutOfRange)?;
    let add_grace_end = TimeDelta::try_days(i64::from(plan.add_grace_period_days))
        .and_then(|grace| now.checked_add_signed(grace))
        .ok_or(EppException::ExpirationOutOfRange)?;

    Ok(DomainResource {
        repo_id,
        fully_qualified_domain_name: plan.fully_qualified_domain_name.clone(),
        tld: plan.tld.clone(),
        current_sponsor: request.registrar.client_id.clone(),
        creation_time: now,
        deletion_time: None,
        registration_expiration_time: expiration,
        registrant: Some(plan.registrant.clone()),
        contacts: plan.contacts.clone(),
        nameservers: plan.nameservers.clone(),
        subordinate_hosts: BTreeSet::new(),
        ds_data: plan.ds_data.clone(),
        launch_notice: plan.notice.clone(),
        smd_id: plan.smd_id.clone(),
        idn_table: plan.idn_table.clone(),
        grace_periods: vec![GracePeriod {
            kind: GracePeriodSet::ADD,
            expiration_time: add_grace_end,
            client_id: request.registrar.client_id.clone(),
        }],
        status: StatusValues::empty(),
    })
}
