use reg_derive::epp_exception;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EppErrorKind {
    StatusProhibitsOperation,
    UnimplementedOption,
}

impl EppErrorKind {
    pub const fn code(self) -> u16 {
        match self {
            Self::StatusProhibitsOperation => 2304,
            Self::UnimplementedOption => 2102,
        }
    }
}

#[epp_exception]
pub enum DemoException {
    #[kind(StatusProhibitsOperation)]
    #[error("{domain} requires a claims notice")]
    MissingClaimsNotice { domain: String },

    #[kind(UnimplementedOption)]
    #[error("The 'maxSigLife' setting is not supported")]
    MaxSigLifeNotSupported,
}

fn main() {
    let _ = DemoException::MaxSigLifeNotSupported.code();
}
