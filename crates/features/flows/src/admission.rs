//! # Domain Create Admission
//!
//! Decides whether a create command may proceed. The checks run as an explicit ordered list
//! ([`AdmissionStep::ALL`]) and the first failure is the answer, so every rejection names the
//! most specific cause.
//!
//! Superusers skip registrar zone access, zone state, launch phase timing, claims windows,
//! reservation blocking and premium blocking. Name syntax, contact and nameserver structure,
//! DNSSEC structure, signed mark cryptography and fee mismatches apply to everyone.

use crate::dnssec::validate_sec_dns;
use crate::error::EppException;
use crate::launch::{LaunchContext, LaunchOutcome, validate_launch};
use crate::name::{DomainName, validate_domain_name};
use crate::observer::{AdmissionObserver, AdmissionStep, StepOutcome, TracingObserver};
use chrono::{DateTime, TimeDelta, Utc};
use reg_datastore::ResourceReader;
use reg_domain::command::{ContactRole, CreateCommand, DesignatedContact, DsData, LaunchNotice, PeriodUnit};
use reg_domain::config::RegistryConfig;
use reg_domain::money::Money;
use reg_domain::registrar::Registrar;
use reg_domain::reservation::ReservationType;
use reg_domain::resources::EppResource;
use reg_domain::tld::TldState;
use reg_labels::{CreateCost, LabelCatalog};
use reg_tmch::TmchVerifier;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Caller identity and time for one admission.
#[derive(Debug, Clone, Copy)]
pub struct AdmissionRequest<'a> {
    pub command: &'a CreateCommand,
    pub registrar: &'a Registrar,
    pub is_superuser: bool,
    pub now: DateTime<Utc>,
}

/// An accepted create, carrying everything needed to persist it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainCreatePlan {
    pub fully_qualified_domain_name: String,
    pub label: String,
    pub tld: String,
    pub years: u32,
    pub cost: Money,
    pub is_premium: bool,
    pub reservation_type: ReservationType,
    pub is_anchor_tenant: bool,
    pub is_sunrise: bool,
    pub idn_table: Option<String>,
    pub notice: Option<LaunchNotice>,
    pub smd_id: Option<String>,
    pub ds_data: Vec<DsData>,
    /// Contact id of the registrant.
    pub registrant: String,
    pub contacts: Vec<DesignatedContact>,
    /// Repo ids of the nameserver hosts.
    pub nameservers: BTreeSet<String>,
    pub add_grace_period_days: u32,
}

/// Working state threaded through the steps after the name is known.
#[derive(Debug)]
struct Draft {
    name: DomainName,
    years: u32,
    cost: Option<CreateCost>,
    nameservers: BTreeSet<String>,
    launch: LaunchOutcome,
    reservation_type: ReservationType,
    is_anchor_tenant: bool,
}

enum Verdict {
    Passed,
    Bypassed,
}

/// The admission pipeline and the read-only data it consults.
#[derive(Debug, Clone)]
pub struct DomainCreateAdmission {
    config: RegistryConfig,
    labels: LabelCatalog,
    verifier: Arc<TmchVerifier>,
    observer: Arc<dyn AdmissionObserver>,
}

impl DomainCreateAdmission {
    #[must_use]
    pub fn new(config: RegistryConfig, labels: LabelCatalog, verifier: Arc<TmchVerifier>) -> Self {
        Self { config, labels, verifier, observer: Arc::new(TracingObserver) }
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn AdmissionObserver>) -> Self {
        self.observer = observer;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Runs every step against `reader` and returns the plan or the first rejection.
    ///
    /// # Errors
    /// The [`EppException`] of the first failing step.
    pub fn admit<R: ResourceReader + ?Sized>(
        &self,
        reader: &R,
        request: &AdmissionRequest<'_>,
    ) -> Result<DomainCreatePlan, EppException> {
        let fqdn = request.command.fully_qualified_domain_name.as_str();

        self.observe(AdmissionStep::Existence, check_existence(reader, fqdn, request.now))?;
        let name = validate_domain_name(fqdn, &self.config);
        let name = self.observe(AdmissionStep::DomainName, name.map(|n| (n, Verdict::Passed)))?;

        let mut draft = Draft {
            name,
            years: 0,
            cost: None,
            nameservers: BTreeSet::new(),
            launch: LaunchOutcome::default(),
            reservation_type: ReservationType::Unreserved,
            is_anchor_tenant: false,
        };
        for step in &AdmissionStep::ALL[2..] {
            let verdict = self.run_step(*step, reader, request, &mut draft);
            self.observe(*step, verdict.map(|v| ((), v)))?;
        }

        let plan = draft.into_plan(request.command)?;
        debug!(
            fqdn = %plan.fully_qualified_domain_name,
            cost = %plan.cost,
            reservation = %plan.reservation_type,
            superuser = request.is_superuser,
            "Domain create admitted"
        );
        Ok(plan)
    }

    fn observe<T>(
        &self,
        step: AdmissionStep,
        result: Result<(T, Verdict), EppException>,
    ) -> Result<T, EppException> {
        match result {
            Ok((value, verdict)) => {
                let outcome = match verdict {
                    Verdict::Passed => StepOutcome::Passed,
                    Verdict::Bypassed => StepOutcome::Bypassed,
                };
                self.observer.on_step(step, outcome);
                Ok(value)
            },
            Err(err) => {
                self.observer.on_step(step, StepOutcome::Rejected(&err));
                Err(err)
            },
        }
    }

    fn run_step<R: ResourceReader + ?Sized>(
        &self,
        step: AdmissionStep,
        reader: &R,
        request: &AdmissionRequest<'_>,
        draft: &mut Draft,
    ) -> Result<Verdict, EppException> {
        match step {
            AdmissionStep::Existence | AdmissionStep::DomainName => Ok(Verdict::Passed),
            AdmissionStep::RegistrarAccess => check_registrar_access(request, &draft.name),
            AdmissionStep::TldState => check_tld_state(request, &draft.name),
            AdmissionStep::Period => self.check_period(request, draft),
            AdmissionStep::LinkedResources => check_linked_resources(reader, request, draft),
            AdmissionStep::Contacts => check_contacts(request.command, &draft.name),
            AdmissionStep::Nameservers => self.check_nameservers(reader, request, &draft.name),
            AdmissionStep::LaunchEvidence => self.check_launch(request, draft),
            AdmissionStep::Dnssec => match &request.command.sec_dns {
                Some(sec_dns) => {
                    validate_sec_dns(sec_dns, self.config.flows.max_ds_records).map(|()| Verdict::Passed)
                },
                None => Ok(Verdict::Passed),
            },
            AdmissionStep::Gating => self.check_gating(request, draft),
            AdmissionStep::Fee => check_fee(request, draft),
        }
    }

    fn check_period(
        &self,
        request: &AdmissionRequest<'_>,
        draft: &mut Draft,
    ) -> Result<Verdict, EppException> {
        let period = request.command.period;
        if period.unit != PeriodUnit::Years {
            return Err(EppException::BadPeriodUnit);
        }
        let max = self.config.flows.max_registration_years;
        if !(1..=max).contains(&period.value) {
            return Err(EppException::BadPeriod { max });
        }

        draft.years = period.value;
        let cost = self
            .labels
            .pricing
            .create_cost(&draft.name.label, &draft.name.tld, period.value)
            .map_err(|e| EppException::PricingUnavailable { message: e.to_string() })?;
        draft.cost = Some(cost);
        Ok(Verdict::Passed)
    }

    fn check_nameservers<R: ResourceReader + ?Sized>(
        &self,
        reader: &R,
        request: &AdmissionRequest<'_>,
        name: &DomainName,
    ) -> Result<Verdict, EppException> {
        let requested: BTreeSet<&str> = request.command.nameservers.iter().map(String::as_str).collect();
        let max = self.config.flows.max_nameservers;
        if requested.len() > max {
            return Err(EppException::TooManyNameservers { max });
        }
        if requested.len() < name.tld.min_nameservers {
            return Err(EppException::TooFewNameservers { min: name.tld.min_nameservers });
        }

        let allowed = &name.tld.allowed_fully_qualified_host_names;
        if !allowed.is_empty() {
            let rejected: Vec<&str> =
                requested.iter().copied().filter(|h| !allowed.contains(*h)).collect();
            if !rejected.is_empty() {
                return Err(EppException::NameserversNotAllowed { hosts: rejected.join(", ") });
            }
        }

        for fqhn in &requested {
            let glueless = reader
                .host_by_name(fqhn, request.now)
                .is_some_and(|h| h.superordinate_domain.is_some() && h.inet_addresses.is_empty());
            if glueless {
                return Err(EppException::NameserverMissingGlue { host: (*fqhn).to_owned() });
            }
        }
        Ok(Verdict::Passed)
    }

    fn check_launch(
        &self,
        request: &AdmissionRequest<'_>,
        draft: &mut Draft,
    ) -> Result<Verdict, EppException> {
        let window_hours = i64::from(self.config.flows.claims_acceptance_window_hours);
        let ctx = LaunchContext {
            label: &draft.name.label,
            state: draft.name.tld.state_at(request.now),
            is_superuser: request.is_superuser,
            now: request.now,
            acceptance_window: TimeDelta::try_hours(window_hours).unwrap_or(TimeDelta::MAX),
            verifier: &self.verifier,
        };
        draft.launch = validate_launch(request.command.launch.as_ref(), &ctx)?;
        Ok(Verdict::Passed)
    }

    fn check_gating(
        &self,
        request: &AdmissionRequest<'_>,
        draft: &mut Draft,
    ) -> Result<Verdict, EppException> {
        let command = request.command;
        let label = draft.name.label.as_str();
        let tld = &draft.name.tld;

        draft.is_anchor_tenant =
            self.labels.reservations.matches_anchor_tenant(label, tld, &command.auth_password);
        draft.reservation_type = self.labels.reservations.reservation_type(label, tld);
        if request.is_superuser {
            return Ok(Verdict::Bypassed);
        }

        let sunrise = command.is_sunrise_create();
        let exempt = sunrise
            && matches!(
                draft.reservation_type,
                ReservationType::AllowedInSunrise | ReservationType::NameCollision
            );
        if !draft.is_anchor_tenant && draft.reservation_type != ReservationType::Unreserved && !exempt {
            return Err(EppException::DomainReserved {
                label: label.to_owned(),
                reason: draft.reservation_type.message_for_check().unwrap_or("Reserved"),
            });
        }

        let notice = command.claims_notice();
        if tld.in_claims_period(request.now) {
            let on_list = self.labels.claims.is_on_claims_list(label);
            if on_list && !sunrise && notice.is_none() {
                return Err(EppException::MissingClaimsNotice { label: label.to_owned() });
            }
            if !on_list && notice.is_some() {
                return Err(EppException::UnexpectedClaimsNotice { label: label.to_owned() });
            }
        } else if notice.is_some() {
            return Err(EppException::ClaimsPeriodEnded { tld: tld.name.clone() });
        }

        if draft.cost.as_ref().is_some_and(|c| c.premium) && request.registrar.block_premium_names {
            return Err(EppException::PremiumNameBlocked);
        }
        Ok(Verdict::Passed)
    }
}

impl Draft {
    fn into_plan(self, command: &CreateCommand) -> Result<DomainCreatePlan, EppException> {
        let cost = self.cost.ok_or_else(|| EppException::PricingUnavailable {
            message: "create cost was never computed".to_owned(),
        })?;
        Ok(DomainCreatePlan {
            fully_qualified_domain_name: self.name.fully_qualified_domain_name,
            label: self.name.label,
            tld: self.name.tld.name,
            years: self.years,
            cost: cost.amount,
            is_premium: cost.premium,
            reservation_type: self.reservation_type,
            is_anchor_tenant: self.is_anchor_tenant,
            is_sunrise: command.is_sunrise_create(),
            idn_table: self.name.idn_table.map(str::to_owned),
            notice: self.launch.notice,
            smd_id: self.launch.signed_mark.map(|m| m.data.id),
            ds_data: command.sec_dns.as_ref().map(|s| s.ds_data.clone()).unwrap_or_default(),
            registrant: command.registrant.clone().unwrap_or_default(),
            contacts: command.contacts.clone(),
            nameservers: self.nameservers,
            add_grace_period_days: self.name.tld.add_grace_period_days,
        })
    }
}

fn check_existence<R: ResourceReader + ?Sized>(
    reader: &R,
    fqdn: &str,
    now: DateTime<Utc>,
) -> Result<((), Verdict), EppException> {
    match reader.domain_by_name(fqdn, now) {
        Some(_) => Err(EppException::ResourceAlreadyExists { id: fqdn.to_owned() }),
        None => Ok(((), Verdict::Passed)),
    }
}

fn check_registrar_access(
    request: &AdmissionRequest<'_>,
    name: &DomainName,
) -> Result<Verdict, EppException> {
    if request.is_superuser {
        return Ok(Verdict::Bypassed);
    }
    if request.registrar.allowed_tlds.contains(&name.tld.name) {
        Ok(Verdict::Passed)
    } else {
        Err(EppException::NotAuthorizedForTld { tld: name.tld.name.clone() })
    }
}

fn check_tld_state(request: &AdmissionRequest<'_>, name: &DomainName) -> Result<Verdict, EppException> {
    if request.is_superuser {
        return Ok(Verdict::Bypassed);
    }
    match name.tld.state_at(request.now) {
        TldState::Landrush | TldState::GeneralAvailability => Ok(Verdict::Passed),
        TldState::Sunrise | TldState::Sunrush if request.command.is_sunrise_create() => {
            Ok(Verdict::Passed)
        },
        _ => Err(EppException::NoGeneralRegistrationsInCurrentPhase),
    }
}

fn check_linked_resources<R: ResourceReader + ?Sized>(
    reader: &R,
    request: &AdmissionRequest<'_>,
    draft: &mut Draft,
) -> Result<Verdict, EppException> {
    let command = request.command;
    let contact_ids: BTreeSet<&str> = command
        .registrant
        .iter()
        .map(String::as_str)
        .chain(command.contacts.iter().map(|c| c.contact_id.as_str()))
        .collect();

    let mut missing = Vec::new();
    for id in &contact_ids {
        match reader.contact_by_id(id, request.now) {
            Some(contact) if contact.is_pending_delete() => {
                return Err(EppException::LinkedResourceInPendingDelete { id: (*id).to_owned() });
            },
            Some(_) => {},
            None => missing.push(*id),
        }
    }
    if !missing.is_empty() {
        return Err(EppException::LinkedResourcesDoNotExist { kind: "contacts", ids: missing.join(",") });
    }

    let mut nameservers = BTreeSet::new();
    for fqhn in command.nameservers.iter().collect::<BTreeSet<_>>() {
        match reader.host_by_name(fqhn, request.now) {
            Some(host) if host.is_pending_delete() => {
                return Err(EppException::LinkedResourceInPendingDelete { id: fqhn.clone() });
            },
            Some(host) => {
                nameservers.insert(host.repo_id.clone());
            },
            None => missing.push(fqhn.as_str()),
        }
    }
    if !missing.is_empty() {
        return Err(EppException::LinkedResourcesDoNotExist { kind: "hosts", ids: missing.join(",") });
    }

    draft.nameservers = nameservers;
    Ok(Verdict::Passed)
}

fn check_contacts(command: &CreateCommand, name: &DomainName) -> Result<Verdict, EppException> {
    let mut roles = BTreeSet::new();
    for contact in &command.contacts {
        let role = contact.role.ok_or(EppException::MissingContactType)?;
        if !roles.insert(role) {
            return Err(EppException::DuplicateContactForRole);
        }
    }

    let registrant = command.registrant.as_deref().ok_or(EppException::MissingRegistrant)?;
    if !roles.contains(&ContactRole::Admin) {
        return Err(EppException::MissingAdminContact);
    }
    if !roles.contains(&ContactRole::Tech) {
        return Err(EppException::MissingTechnicalContact);
    }

    let allowed = &name.tld.allowed_registrant_contact_ids;
    if !allowed.is_empty() && !allowed.contains(registrant) {
        return Err(EppException::RegistrantNotAllowed { id: registrant.to_owned() });
    }
    Ok(Verdict::Passed)
}

fn check_fee(request: &AdmissionRequest<'_>, draft: &Draft) -> Result<Verdict, EppException> {
    let Some(cost) = &draft.cost else {
        return Ok(Verdict::Passed);
    };
    match &request.command.fee {
        Some(fee) if fee.fee.currency() != cost.amount.currency() => {
            Err(EppException::CurrencyMismatch { expected: cost.amount.currency().to_owned() })
        },
        Some(fee) if fee.fee != cost.amount => {
            Err(EppException::FeesMismatch { expected: cost.amount.to_string() })
        },
        None if cost.premium && !request.is_superuser => Err(EppException::FeesRequiredForPremiumName),
        _ => Ok(Verdict::Passed),
    }
}
