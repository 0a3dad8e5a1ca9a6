use crate::error::EppException;
use crate::idn::{find_table, punycode};
use reg_domain::config::RegistryConfig;
use reg_domain::tld::TldPolicy;

const MAX_LABEL_LENGTH: usize = 63;
const ACE_PREFIX: &str = "xn--";

/// A syntactically valid second-level name under a configured zone.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainName {
    pub fully_qualified_domain_name: String,
    /// ASCII (A-label) form.
    pub label: String,
    /// Unicode form, equal to `label` for plain ASCII names.
    pub unicode_label: String,
    pub tld: TldPolicy,
    /// IDN table the label conforms to; `None` for plain ASCII names.
    pub idn_table: Option<&'static str>,
}

fn invalid(message: &'static str) -> EppException {
    EppException::InvalidDomainName { message: message.into() }
}

/// Resolves the zone a name belongs to: the longest configured suffix.
#[must_use]
pub fn find_tld(fqdn: &str, config: &RegistryConfig) -> Option<TldPolicy> {
    let mut rest = fqdn;
    loop {
        let (_, parent) = rest.split_once('.')?;
        if let Some(policy) = config.tld(parent) {
            return Some(policy);
        }
        rest = parent;
    }
}

/// Validates `fqdn` as a registrable name and resolves its zone and IDN table.
///
/// # Errors
/// [`EppException::InvalidDomainName`] and friends for syntax problems,
/// [`EppException::TldDoesNotExist`] when no configured zone contains the name.
pub fn validate_domain_name(fqdn: &str, config: &RegistryConfig) -> Result<DomainName, EppException> {
    if fqdn.is_empty() {
        return Err(invalid("Domain name cannot be empty"));
    }
    if fqdn.bytes().any(|b| b.is_ascii_uppercase()) {
        return Err(invalid("Domain name must be in lower case"));
    }
    if !fqdn.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'.') {
        return Err(invalid("Domain name contains invalid characters"));
    }
    if fqdn.split('.').any(str::is_empty) {
        return Err(invalid("No part of a domain name can be empty"));
    }
    if fqdn.split('.').count() < 2 {
        return Err(invalid("Domain name must have exactly one part above the TLD"));
    }
    if config.tld(fqdn).is_some() {
        return Err(invalid("Domain name must have exactly one part above the TLD"));
    }

    let tld = find_tld(fqdn, config).ok_or_else(|| EppException::TldDoesNotExist {
        tld: fqdn.split_once('.').map_or(fqdn, |(_, t)| t).to_owned(),
    })?;
    let label = fqdn
        .strip_suffix(&tld.name)
        .and_then(|rest| rest.strip_suffix('.'))
        .unwrap_or_default();
    if label.is_empty() || label.contains('.') {
        return Err(invalid("Domain name must have exactly one part above the TLD"));
    }

    validate_label(label)?;
    let (unicode_label, idn_table) = match label.strip_prefix(ACE_PREFIX) {
        Some(encoded) => {
            let unicode = punycode::decode(encoded)
                .filter(|u| !u.is_ascii() && punycode::encode(u).as_deref() == Some(encoded))
                .ok_or(EppException::InvalidPunycode)?;
            let table =
                find_table(&unicode, &tld.idn_tables).ok_or(EppException::InvalidIdnDomainLabel)?;
            (unicode, Some(table.name))
        },
        None => (label.to_owned(), None),
    };

    Ok(DomainName {
        fully_qualified_domain_name: fqdn.to_owned(),
        label: label.to_owned(),
        unicode_label,
        tld,
        idn_table,
    })
}

fn validate_label(label: &str) -> Result<(), EppException> {
    if label.len() > MAX_LABEL_LENGTH {
        return Err(invalid("Domain labels cannot be longer than 63 characters"));
    }
    if label.starts_with('-') {
        return Err(invalid("Domain labels cannot begin with a dash"));
    }
    if label.ends_with('-') {
        return Err(invalid("Domain labels cannot end with a dash"));
    }
    if label.get(2..4) == Some("--") && !label.starts_with(ACE_PREFIX) {
        return Err(invalid("Non-IDN domain names cannot contain dashes in the third or fourth position"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RegistryConfig {
        let mut config = RegistryConfig::default();
        config.tlds.insert("tld".to_owned(), TldPolicy {
            idn_tables: vec!["extended_latin".to_owned()],
            ..TldPolicy::general_availability("tld")
        });
        config.tlds.insert("co.uk".to_owned(), TldPolicy::general_availability("co.uk"));
        config
    }

    fn message(fqdn: &str) -> String {
        validate_domain_name(fqdn, &config()).unwrap_err().to_string()
    }

    #[test]
    fn resolves_longest_zone() {
        let name = validate_domain_name("example.co.uk", &config()).unwrap();
        assert_eq!(name.label, "example");
        assert_eq!(name.tld.name, "co.uk");
        assert_eq!(name.idn_table, None);
    }

    #[test]
    fn syntax_errors_are_specific() {
        assert_eq!(message("Example.tld"), "Domain name must be in lower case");
        assert_eq!(message("ex_ample.tld"), "Domain name contains invalid characters");
        assert_eq!(message("example..tld"), "No part of a domain name can be empty");
        assert_eq!(message("tld"), "Domain name must have exactly one part above the TLD");
        assert_eq!(message("a.b.tld"), "Domain name must have exactly one part above the TLD");
        assert_eq!(message("-example.tld"), "Domain labels cannot begin with a dash");
        assert_eq!(message("example-.tld"), "Domain labels cannot end with a dash");
        assert_eq!(
            message("ab--cd.tld"),
            "Non-IDN domain names cannot contain dashes in the third or fourth position"
        );
        assert_eq!(message(&format!("{}.tld", "a".repeat(64))), "Domain labels cannot be longer than 63 characters");
    }

    #[test]
    fn unknown_zone_is_a_validation_error() {
        assert_eq!(
            validate_domain_name("example.nope", &config()),
            Err(EppException::TldDoesNotExist { tld: "nope".to_owned() })
        );
    }

    #[test]
    fn idn_labels_need_a_zone_table() {
        let name = validate_domain_name("xn--bcher-kva.tld", &config()).unwrap();
        assert_eq!(name.unicode_label, "bücher");
        assert_eq!(name.idn_table, Some("extended_latin"));

        assert_eq!(validate_domain_name("xn--wgv71a119e.tld", &config()), Err(EppException::InvalidIdnDomainLabel));
        assert_eq!(validate_domain_name("xn--bcher-kva.co.uk", &config()), Err(EppException::InvalidIdnDomainLabel));
        assert_eq!(validate_domain_name("xn--99999999999.tld", &config()), Err(EppException::InvalidPunycode));
    }
}
