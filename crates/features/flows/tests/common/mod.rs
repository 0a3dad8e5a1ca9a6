#![allow(dead_code)]

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use parking_lot::Mutex;
use reg_datastore::{Datastore, Fixtures};
use reg_domain::command::{
    ContactRole, CreateCommand, DesignatedContact, LaunchCreate, LaunchNotice, Period,
    SignedMarkEvidence,
};
use reg_domain::config::RegistryConfig;
use reg_domain::registrar::Registrar;
use reg_domain::resources::{ContactResource, HostResource, StatusValues};
use reg_domain::tld::{LaunchPhase, TldPolicy, TldState};
use reg_flows::{
    AdmissionObserver, AdmissionRequest, AdmissionStep, DomainCreateAdmission, DomainCreateFlow,
    StepOutcome,
};
use reg_labels::{ClaimsList, ClaimsRegistry, LabelCatalog, PremiumList, Pricing, ReservationPolicy, ReservedList};
use reg_queue::TaskQueues;
use reg_tmch::issuance::{issue_certificate, issue_mark, keypair_from_seed};
use reg_tmch::{CertificateData, MarkData, TmchCaMode, TmchVerifier};
use std::collections::BTreeMap;
use std::sync::Arc;

pub const REGISTRAR: &str = "TheRegistrar";

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

pub fn at(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
}

const RESERVED: &str = "\
blocked,FULLY_BLOCKED # trademark dispute
collision,NAME_COLLISION
sunny,ALLOWED_IN_SUNRISE
anchor,RESERVED_FOR_ANCHOR_TENANT,s3cret
";

const CLAIMS: &str = "\
1,2024-01-01T00:00:00.0Z
DNL,lookup-key,insertion-datetime
claimed,2013041500/2/6/9/rJ1NrDO92vDsAzf7EQzgjX4R0000000001,2010-07-14T00:00:00.0Z
";

const PREMIUM: &str = "rich,USD 100";

/// Zones: `tld` in general availability (claims period open), `sun` in sunrise.
pub fn config() -> RegistryConfig {
    let mut config = RegistryConfig::default();
    config.tlds.insert("tld".to_owned(), TldPolicy {
        reserved_lists: vec!["common".to_owned()],
        premium_list: Some("gold".to_owned()),
        idn_tables: vec!["extended_latin".to_owned()],
        ..TldPolicy::general_availability("tld")
    });
    config.tlds.insert("sun".to_owned(), TldPolicy {
        name: "sun".to_owned(),
        state_transitions: BTreeMap::from([
            (DateTime::<Utc>::UNIX_EPOCH, TldState::Predelegation),
            (at("2026-01-01T00:00:00Z"), TldState::Sunrise),
            (at("2026-06-01T00:00:00Z"), TldState::GeneralAvailability),
        ]),
        reserved_lists: vec!["common".to_owned()],
        ..TldPolicy::default()
    });
    config
}

pub fn catalog() -> LabelCatalog {
    LabelCatalog {
        reservations: ReservationPolicy::new([ReservedList::parse("common", RESERVED).unwrap()]),
        claims: ClaimsRegistry::new(ClaimsList::parse(CLAIMS).unwrap()),
        pricing: Pricing::new([PremiumList::parse("gold", PREMIUM).unwrap()]),
    }
}

pub fn verifier() -> TmchVerifier {
    let (_, root_public) = keypair_from_seed(&[1u8; 32]);
    TmchVerifier::new(TmchCaMode::Production, &root_public.to_bytes()).unwrap()
}

/// An encoded SMD for `labels`, signed under the production root.
pub fn encoded_mark(labels: &[&str]) -> String {
    let (root, _) = keypair_from_seed(&[1u8; 32]);
    let (agent, agent_public) = keypair_from_seed(&[3u8; 32]);
    let certificate = issue_certificate(&root, CertificateData {
        serial: 7,
        subject: "TMCH Agent".to_owned(),
        public_key: agent_public.to_bytes().to_vec(),
        not_before: at("2020-01-01T00:00:00Z"),
        not_after: at("2030-01-01T00:00:00Z"),
    })
    .unwrap();
    issue_mark(&agent, certificate, MarkData {
        id: "0000001761376042759136-65535".to_owned(),
        mark_name: "Sunny".to_owned(),
        holder: "Sunny Ltd.".to_owned(),
        labels: labels.iter().map(|l| (*l).to_owned()).collect(),
        not_before: at("2021-01-01T00:00:00Z"),
        not_after: at("2029-01-01T00:00:00Z"),
    })
    .unwrap()
    .encode()
    .unwrap()
}

pub fn sunrise_launch(labels: &[&str]) -> LaunchCreate {
    LaunchCreate {
        phase: LaunchPhase::Sunrise,
        signed_marks: vec![SignedMarkEvidence::Encoded {
            encoding: "base64".to_owned(),
            data: encoded_mark(labels),
        }],
        code_marks: vec![],
        notice: None,
    }
}

/// A claims notice for `label` accepted `accepted_ago` before [`now`].
pub fn claims_launch(label: &str, accepted_ago: TimeDelta) -> LaunchCreate {
    let expiration_time = now() + TimeDelta::days(2);
    let tcn_id = reg_tmch::tcnid::generate(label, expiration_time, "0000000000000000001").unwrap();
    LaunchCreate {
        phase: LaunchPhase::Claims,
        signed_marks: vec![],
        code_marks: vec![],
        notice: Some(LaunchNotice {
            tcn_id,
            validator_id: "tmch".to_owned(),
            expiration_time,
            accepted_time: now() - accepted_ago,
        }),
    }
}

pub fn command(fqdn: &str) -> CreateCommand {
    CreateCommand {
        fully_qualified_domain_name: fqdn.to_owned(),
        period: Period::years(2),
        registrant: Some("jd1234".to_owned()),
        contacts: vec![
            DesignatedContact { role: Some(ContactRole::Admin), contact_id: "sh8013".to_owned() },
            DesignatedContact { role: Some(ContactRole::Tech), contact_id: "sh8013".to_owned() },
        ],
        nameservers: vec!["ns1.example.net".to_owned(), "ns2.example.net".to_owned()],
        auth_password: "2fooBAR".to_owned(),
        sec_dns: None,
        launch: None,
        fee: None,
    }
}

pub fn registrar() -> Registrar {
    Registrar::new(REGISTRAR).with_tld("tld").with_tld("sun")
}

pub fn fixtures() -> Fixtures {
    let contact = |id: &str| ContactResource {
        repo_id: format!("{}-ROID", id.to_ascii_uppercase()),
        contact_id: id.to_owned(),
        current_sponsor: REGISTRAR.to_owned(),
        deletion_time: None,
        status: StatusValues::empty(),
    };
    let host = |fqhn: &str, repo_id: &str| HostResource {
        repo_id: repo_id.to_owned(),
        fully_qualified_host_name: fqhn.to_owned(),
        current_sponsor: REGISTRAR.to_owned(),
        inet_addresses: vec![],
        superordinate_domain: None,
        deletion_time: None,
        status: StatusValues::empty(),
    };
    Fixtures {
        domains: vec![],
        hosts: vec![host("ns1.example.net", "1-ROID"), host("ns2.example.net", "2-ROID")],
        contacts: vec![contact("jd1234"), contact("sh8013")],
    }
}

/// Records every step outcome.
#[derive(Debug, Default)]
pub struct Recorder {
    pub steps: Mutex<Vec<(AdmissionStep, String)>>,
}

impl AdmissionObserver for Recorder {
    fn on_step(&self, step: AdmissionStep, outcome: StepOutcome<'_>) {
        let outcome = match outcome {
            StepOutcome::Passed => "passed".to_owned(),
            StepOutcome::Bypassed => "bypassed".to_owned(),
            StepOutcome::Rejected(err) => format!("rejected: {err}"),
        };
        self.steps.lock().push((step, outcome));
    }
}

pub struct World {
    pub store: Datastore,
    pub queues: TaskQueues,
    pub admission: DomainCreateAdmission,
    pub recorder: Arc<Recorder>,
    pub registrar: Registrar,
}

impl World {
    pub fn new() -> Self {
        Self::with_config(config())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        let store = Datastore::builder().first_id(0x100).build();
        store.seed(fixtures());
        let recorder = Arc::new(Recorder::default());
        let admission = DomainCreateAdmission::new(config, catalog(), Arc::new(verifier()))
            .with_observer(recorder.clone());
        Self { store, queues: TaskQueues::new(), admission, recorder, registrar: registrar() }
    }

    pub fn request<'a>(&'a self, command: &'a CreateCommand, is_superuser: bool) -> AdmissionRequest<'a> {
        AdmissionRequest { command, registrar: &self.registrar, is_superuser, now: now() }
    }

    pub fn admit(&self, command: &CreateCommand) -> Result<reg_flows::DomainCreatePlan, reg_flows::EppException> {
        self.admission.admit(&self.store.snapshot(), &self.request(command, false))
    }

    pub fn admit_as_superuser(
        &self,
        command: &CreateCommand,
    ) -> Result<reg_flows::DomainCreatePlan, reg_flows::EppException> {
        self.admission.admit(&self.store.snapshot(), &self.request(command, true))
    }

    pub fn flow(&self) -> DomainCreateFlow {
        DomainCreateFlow::new(self.store.clone(), self.queues.clone(), self.admission.clone())
    }
}
