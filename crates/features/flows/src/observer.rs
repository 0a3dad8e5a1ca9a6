use crate::error::EppException;
use std::fmt::{self, Debug};
use tracing::debug;

/// The ordered checks of a domain create, first to last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AdmissionStep {
    Existence,
    DomainName,
    RegistrarAccess,
    TldState,
    Period,
    LinkedResources,
    Contacts,
    Nameservers,
    LaunchEvidence,
    Dnssec,
    Gating,
    Fee,
}

impl AdmissionStep {
    pub const ALL: [Self; 12] = [
        Self::Existence,
        Self::DomainName,
        Self::RegistrarAccess,
        Self::TldState,
        Self::Period,
        Self::LinkedResources,
        Self::Contacts,
        Self::Nameservers,
        Self::LaunchEvidence,
        Self::Dnssec,
        Self::Gating,
        Self::Fee,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Existence => "existence",
            Self::DomainName => "domain_name",
            Self::RegistrarAccess => "registrar_access",
            Self::TldState => "tld_state",
            Self::Period => "period",
            Self::LinkedResources => "linked_resources",
            Self::Contacts => "contacts",
            Self::Nameservers => "nameservers",
            Self::LaunchEvidence => "launch_evidence",
            Self::Dnssec => "dnssec",
            Self::Gating => "gating",
            Self::Fee => "fee",
        }
    }
}

impl fmt::Display for AdmissionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy)]
pub enum StepOutcome<'a> {
    Passed,
    /// Skipped for a superuser.
    Bypassed,
    Rejected(&'a EppException),
}

/// Called after every admission step.
pub trait AdmissionObserver: Send + Sync + Debug {
    fn on_step(&self, step: AdmissionStep, outcome: StepOutcome<'_>);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl AdmissionObserver for TracingObserver {
    fn on_step(&self, step: AdmissionStep, outcome: StepOutcome<'_>) {
        match outcome {
            StepOutcome::Passed => debug!(%step, "Admission step passed"),
            StepOutcome::Bypassed => debug!(%step, "Admission step bypassed for superuser"),
            StepOutcome::Rejected(err) => {
                debug!(%step, code = err.code(), reason = err.name(), "Admission step rejected");
            },
        }
    }
}
