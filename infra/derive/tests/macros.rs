use reg_derive::{epp_exception, reg_error};
use std::borrow::Cow;

#[reg_error]
pub enum SampleError {
    #[error("Parse error{}: {source}", format_context(.context))]
    Parse { source: std::num::ParseIntError, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EppErrorKind {
    StatusProhibitsOperation,
    ParameterValueSyntax,
}

impl EppErrorKind {
    pub const fn code(self) -> u16 {
        match self {
            Self::StatusProhibitsOperation => 2304,
            Self::ParameterValueSyntax => 2005,
        }
    }
}

#[epp_exception]
#[derive(Clone, PartialEq, Eq)]
pub enum SampleException {
    #[kind(StatusProhibitsOperation)]
    #[error("The claims period for {0} has ended")]
    ClaimsPeriodEnded(String),

    #[kind(ParameterValueSyntax)]
    #[error("The specified TCNID is malformed")]
    MalformedTcnId,
}

fn parse(raw: &str) -> Result<i64, SampleError> {
    raw.parse::<i64>().context("parsing claim count")
}

#[test]
fn ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/reg_error_pass.rs");
    t.pass("tests/ui/epp_exception_pass.rs");
}

#[test]
fn source_errors_pick_up_context() {
    let err = parse("x").unwrap_err();
    assert!(matches!(err, SampleError::Parse { context: Some(_), .. }));
    assert!(err.to_string().starts_with("Parse error (parsing claim count)"));
}

#[test]
fn internal_variant_converts_from_strings() {
    let err: SampleError = "boom".into();
    assert_eq!(err.to_string(), "Internal error: boom");

    let err = Err::<(), _>(SampleError::from(String::from("late"))).context("commit").unwrap_err();
    assert_eq!(err.to_string(), "Internal error (commit): late");
}

#[test]
fn exceptions_report_kind_code_and_name() {
    let err = SampleException::ClaimsPeriodEnded("example".into());
    assert_eq!(err.kind(), EppErrorKind::StatusProhibitsOperation);
    assert_eq!(err.code(), 2304);
    assert_eq!(err.name(), "ClaimsPeriodEnded");
    assert_eq!(err.to_string(), "The claims period for example has ended");

    assert_eq!(SampleException::MalformedTcnId.code(), 2005);
}
