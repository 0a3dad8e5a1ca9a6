use crate::error::EppException;
use chrono::{DateTime, TimeDelta, Utc};
use reg_domain::command::{LaunchCreate, LaunchNotice, SignedMarkEvidence};
use reg_domain::tld::TldState;
use reg_tmch::tcnid::{self, TcnidError};
use reg_tmch::{SignedMark, TmchVerifier};

/// The only claims notice validator this registry accepts.
pub const TMCH_VALIDATOR_ID: &str = "tmch";

/// What launch validation resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOutcome {
    pub notice: Option<LaunchNotice>,
    pub signed_mark: Option<SignedMark>,
}

/// Inputs shared by every launch check.
#[derive(Debug, Clone, Copy)]
pub struct LaunchContext<'a> {
    pub label: &'a str,
    pub state: TldState,
    pub is_superuser: bool,
    pub now: DateTime<Utc>,
    pub acceptance_window: TimeDelta,
    pub verifier: &'a TmchVerifier,
}

/// Validates the launch extension of a create.
///
/// # Errors
/// The first failing launch check.
pub fn validate_launch(
    launch: Option<&LaunchCreate>,
    ctx: &LaunchContext<'_>,
) -> Result<LaunchOutcome, EppException> {
    let Some(launch) = launch else {
        return Ok(LaunchOutcome::default());
    };

    if !ctx.is_superuser && !ctx.state.accepted_launch_phases().contains(&launch.phase) {
        return Err(EppException::LaunchPhaseMismatch);
    }
    if !launch.code_marks.is_empty()
        || launch.signed_marks.iter().any(|m| matches!(m, SignedMarkEvidence::Unencoded { .. }))
    {
        return Err(EppException::UnsupportedMarkType);
    }
    if launch.has_signed_marks() && !ctx.is_superuser && !ctx.state.accepts_signed_marks() {
        return Err(EppException::SignedMarksNotAcceptedInCurrentPhase);
    }

    if let Some(notice) = &launch.notice {
        validate_notice(notice, ctx)?;
    }
    let signed_mark = verify_signed_marks(&launch.signed_marks, ctx)?;

    Ok(LaunchOutcome { notice: launch.notice.clone(), signed_mark })
}

fn validate_notice(notice: &LaunchNotice, ctx: &LaunchContext<'_>) -> Result<(), EppException> {
    if notice.validator_id != TMCH_VALIDATOR_ID {
        return Err(EppException::InvalidClaimsNoticeValidator);
    }
    if !ctx.is_superuser {
        if notice.expiration_time < ctx.now {
            return Err(EppException::ExpiredClaim);
        }
        let earliest = ctx.now.checked_sub_signed(ctx.acceptance_window);
        if earliest.is_some_and(|earliest| notice.accepted_time < earliest) {
            return Err(EppException::AcceptedTooLongAgo { hours: ctx.acceptance_window.num_hours() });
        }
    }
    tcnid::validate(&notice.tcn_id, ctx.label, notice.expiration_time).map_err(|e| match e {
        TcnidError::Malformed { .. } => EppException::MalformedTcnid,
        TcnidError::Checksum { .. } => EppException::InvalidTcnidChecksum,
    })
}

fn verify_signed_marks(
    marks: &[SignedMarkEvidence],
    ctx: &LaunchContext<'_>,
) -> Result<Option<SignedMark>, EppException> {
    let [mark] = marks else {
        return if marks.is_empty() { Ok(None) } else { Err(EppException::TooManySignedMarks) };
    };
    let SignedMarkEvidence::Encoded { encoding, data } = mark else {
        return Err(EppException::UnsupportedMarkType);
    };
    if !encoding.eq_ignore_ascii_case("base64") {
        return Err(EppException::SignedMarkEncoding { message: format!("unsupported encoding '{encoding}'") });
    }

    let verified = ctx.verifier.verify(data, ctx.now).map_err(|e| {
        if e.is_encoding() {
            EppException::SignedMarkEncoding { message: e.to_string() }
        } else {
            EppException::SignedMarkInvalid { message: e.to_string() }
        }
    })?;
    if !verified.data.covers(ctx.label) {
        return Err(EppException::NoMarksFoundMatchingDomain);
    }
    Ok(Some(verified))
}
