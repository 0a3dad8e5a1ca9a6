use reg_domain::epp::EppErrorKind;
use std::borrow::Cow;

/// A rejected command. Each variant maps onto one EPP result code through its kind.
#[reg_derive::epp_exception(EppErrorKind)]
#[derive(Clone, PartialEq, Eq)]
pub enum EppException {
    // --- Existence ---
    #[kind(ObjectExists)]
    #[error("Object with given ID ({id}) already exists")]
    ResourceAlreadyExists { id: String },

    #[kind(ObjectDoesNotExist)]
    #[error("Resource with given ID ({id}) does not exist")]
    ResourceDoesNotExist { id: String },

    // --- Domain name ---
    #[kind(ParameterValueSyntax)]
    #[error("{message}")]
    InvalidDomainName { message: Cow<'static, str> },

    #[kind(ParameterValueSyntax)]
    #[error("Domain name starts with xn-- but is not a valid IDN")]
    InvalidPunycode,

    #[kind(ParameterValuePolicy)]
    #[error("Domain label is not allowed by IDN table")]
    InvalidIdnDomainLabel,

    #[kind(ParameterValuePolicy)]
    #[error("Domain name is under tld {tld} which doesn't exist")]
    TldDoesNotExist { tld: String },

    // --- Registrar and zone state ---
    #[kind(Authorization)]
    #[error("Registrar is not authorized to access the TLD {tld}")]
    NotAuthorizedForTld { tld: String },

    #[kind(StatusProhibitsOperation)]
    #[error("The current registry phase does not allow for general registrations")]
    NoGeneralRegistrationsInCurrentPhase,

    // --- Period ---
    #[kind(ParameterValuePolicy)]
    #[error("Periods for domain registrations must be specified in years")]
    BadPeriodUnit,

    #[kind(ParameterValueRange)]
    #[error("Registration period must be between 1 and {max} years")]
    BadPeriod { max: u32 },

    #[kind(ParameterValueRange)]
    #[error("Registration period runs past the last representable date")]
    ExpirationOutOfRange,

    // --- Linked resources ---
    #[kind(ObjectDoesNotExist)]
    #[error("The {kind} with given IDs ({ids}) don't exist")]
    LinkedResourcesDoNotExist { kind: &'static str, ids: String },

    #[kind(StatusProhibitsOperation)]
    #[error("Linked resource in pending delete prohibits operation: {id}")]
    LinkedResourceInPendingDelete { id: String },

    // --- Contacts ---
    #[kind(ParameterValuePolicy)]
    #[error("The contact type is required")]
    MissingContactType,

    #[kind(ParameterValuePolicy)]
    #[error("More than one contact for a given role is not allowed")]
    DuplicateContactForRole,

    #[kind(RequiredParameterMissing)]
    #[error("Registrant is required")]
    MissingRegistrant,

    #[kind(RequiredParameterMissing)]
    #[error("Admin contact is required")]
    MissingAdminContact,

    #[kind(RequiredParameterMissing)]
    #[error("Technical contact is required")]
    MissingTechnicalContact,

    #[kind(StatusProhibitsOperation)]
    #[error("Registrant with id {id} is not whitelisted for TLD")]
    RegistrantNotAllowed { id: String },

    // --- Nameservers ---
    #[kind(ParameterValuePolicy)]
    #[error("Only {max} nameservers are allowed per domain")]
    TooManyNameservers { max: usize },

    #[kind(StatusProhibitsOperation)]
    #[error("At least {min} nameservers must be specified for this TLD")]
    TooFewNameservers { min: usize },

    #[kind(StatusProhibitsOperation)]
    #[error("Nameservers '{hosts}' are not whitelisted for this TLD")]
    NameserversNotAllowed { hosts: String },

    #[kind(ParameterValuePolicy)]
    #[error("Host {host} is subordinate to a registry domain and has no glue addresses")]
    NameserverMissingGlue { host: String },

    // --- Launch ---
    #[kind(ParameterValuePolicy)]
    #[error("The specified launch phase does not match the current registry phase")]
    LaunchPhaseMismatch,

    #[kind(ParameterValuePolicy)]
    #[error("Only encoded signed marks are supported")]
    UnsupportedMarkType,

    #[kind(StatusProhibitsOperation)]
    #[error("Signed marks are not accepted in the current registry phase")]
    SignedMarksNotAcceptedInCurrentPhase,

    #[kind(ParameterValuePolicy)]
    #[error("Only one signed mark is allowed per application")]
    TooManySignedMarks,

    #[kind(ParameterValueSyntax)]
    #[error("Signed mark data is improperly encoded: {message}")]
    SignedMarkEncoding { message: String },

    #[kind(SignedMarkInvalid)]
    #[error("{message}")]
    SignedMarkInvalid { message: String },

    #[kind(ParameterValuePolicy)]
    #[error("The provided mark does not match the desired domain label")]
    NoMarksFoundMatchingDomain,

    #[kind(ParameterValuePolicy)]
    #[error("The only supported validationID is 'tmch' for the ICANN Trademark Clearinghouse.")]
    InvalidClaimsNoticeValidator,

    #[kind(ParameterValueRange)]
    #[error("The expiration time specified in the claim notice has elapsed")]
    ExpiredClaim,

    #[kind(ParameterValueRange)]
    #[error("The acceptance time specified in the claim notice is more than {hours} hours in the past")]
    AcceptedTooLongAgo { hours: i64 },

    #[kind(ParameterValueSyntax)]
    #[error("The specified TCNID is malformed")]
    MalformedTcnid,

    #[kind(ParameterValueRange)]
    #[error("The checksum in the specified TCNID does not validate")]
    InvalidTcnidChecksum,

    // --- DNSSEC ---
    #[kind(ParameterValuePolicy)]
    #[error("At least one dsData is required when using the secDNS extension")]
    DsDataRequired,

    #[kind(UnimplementedOption)]
    #[error("The 'maxSigLife' setting is not supported")]
    MaxSigLifeNotSupported,

    #[kind(ParameterValuePolicy)]
    #[error("A maximum of {max} DS records are allowed per domain")]
    TooManyDsRecords { max: usize },

    #[kind(ParameterValuePolicy)]
    #[error("Domain contains an invalid DS record: {message}")]
    InvalidDsRecord { message: String },

    // --- Reservation, claims, premium ---
    #[kind(StatusProhibitsOperation)]
    #[error("{label} is reserved: {reason}")]
    DomainReserved { label: String, reason: &'static str },

    #[kind(StatusProhibitsOperation)]
    #[error("{label} requires a claims notice")]
    MissingClaimsNotice { label: String },

    #[kind(StatusProhibitsOperation)]
    #[error("{label} does not require a claims notice")]
    UnexpectedClaimsNotice { label: String },

    #[kind(StatusProhibitsOperation)]
    #[error("The claims period for {tld} has ended")]
    ClaimsPeriodEnded { tld: String },

    #[kind(StatusProhibitsOperation)]
    #[error("The requested domain name is on the premium price list, and this registrar has blocked premium registrations")]
    PremiumNameBlocked,

    // --- Fees ---
    #[kind(ParameterValuePolicy)]
    #[error("Currency specified in the fee extension does not match currency of the price ({expected})")]
    CurrencyMismatch { expected: String },

    #[kind(ParameterValueRange)]
    #[error("The fees passed in the transform command do not match the fees that will be charged ({expected})")]
    FeesMismatch { expected: String },

    #[kind(RequiredParameterMissing)]
    #[error("Fees must be explicitly acknowledged when creating domains with premium prices")]
    FeesRequiredForPremiumName,

    #[kind(CommandUse)]
    #[error("Unable to price the domain: {message}")]
    PricingUnavailable { message: String },

    // --- Resource mutation ---
    #[kind(Authorization)]
    #[error("The specified resource belongs to another client")]
    ResourceNotOwned,

    #[kind(StatusProhibitsOperation)]
    #[error("Resource status prohibits this operation")]
    ResourceStatusProhibitsOperation,
}
