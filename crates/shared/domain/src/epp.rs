//! Protocol rejection categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a protocol rejection.
///
/// The transport layer maps each kind to the EPP result code returned by [`EppErrorKind::code`];
/// flows never pick codes themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EppErrorKind {
    CommandUse,
    RequiredParameterMissing,
    ParameterValueRange,
    ParameterValueSyntax,
    UnimplementedOption,
    Authorization,
    ObjectExists,
    ObjectDoesNotExist,
    StatusProhibitsOperation,
    ParameterValuePolicy,
    /// The signed mark failed a certificate or signature check.
    SignedMarkInvalid,
}

impl EppErrorKind {
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::CommandUse => 2002,
            Self::RequiredParameterMissing => 2003,
            Self::ParameterValueRange => 2004,
            Self::ParameterValueSyntax => 2005,
            Self::UnimplementedOption => 2102,
            Self::Authorization => 2201,
            Self::ObjectExists => 2302,
            Self::ObjectDoesNotExist => 2303,
            Self::StatusProhibitsOperation => 2304,
            Self::ParameterValuePolicy | Self::SignedMarkInvalid => 2306,
        }
    }
}

impl fmt::Display for EppErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?} ({})", self.code())
    }
}
