use crate::error::EppException;
use reg_domain::command::{DsData, SecDnsCreate};

/// DNSSEC algorithm numbers accepted in DS records.
const ALGORITHMS: [u8; 8] = [5, 7, 8, 10, 13, 14, 15, 16];

/// Digest length in bytes for each accepted digest type.
const fn digest_length(digest_type: u8) -> Option<usize> {
    match digest_type {
        1 => Some(20),
        2 => Some(32),
        4 => Some(48),
        _ => None,
    }
}

/// Checks the secDNS extension of a create: presence, option support, count, then each record.
///
/// # Errors
/// The first structural problem found, in that order.
pub fn validate_sec_dns(sec_dns: &SecDnsCreate, max_records: usize) -> Result<(), EppException> {
    if sec_dns.ds_data.is_empty() {
        return Err(EppException::DsDataRequired);
    }
    if sec_dns.max_sig_life.is_some() {
        return Err(EppException::MaxSigLifeNotSupported);
    }
    if sec_dns.ds_data.len() > max_records {
        return Err(EppException::TooManyDsRecords { max: max_records });
    }
    sec_dns.ds_data.iter().try_for_each(validate_ds_record)
}

fn validate_ds_record(ds: &DsData) -> Result<(), EppException> {
    let invalid = |message: String| EppException::InvalidDsRecord { message };

    if !ALGORITHMS.contains(&ds.algorithm) {
        return Err(invalid(format!("algorithm {} is not supported", ds.algorithm)));
    }
    let expected = digest_length(ds.digest_type)
        .ok_or_else(|| invalid(format!("digest type {} is not supported", ds.digest_type)))?;
    let digest = hex::decode(&ds.digest)
        .map_err(|e| invalid(format!("digest is not valid hex: {e}")))?;
    if digest.len() != expected {
        return Err(invalid(format!(
            "digest type {} requires {expected} bytes, got {}",
            ds.digest_type,
            digest.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ds(algorithm: u8, digest_type: u8, bytes: usize) -> DsData {
        DsData { key_tag: 12345, algorithm, digest_type, digest: "ab".repeat(bytes) }
    }

    fn sec_dns(ds_data: Vec<DsData>) -> SecDnsCreate {
        SecDnsCreate { ds_data, max_sig_life: None }
    }

    #[test]
    fn checks_run_in_order() {
        assert_eq!(validate_sec_dns(&sec_dns(vec![]), 8), Err(EppException::DsDataRequired));

        let with_sig_life = SecDnsCreate { max_sig_life: Some(86_400), ..sec_dns(vec![ds(99, 99, 1)]) };
        assert_eq!(validate_sec_dns(&with_sig_life, 8), Err(EppException::MaxSigLifeNotSupported));

        let nine = sec_dns(vec![ds(8, 2, 32); 9]);
        assert_eq!(validate_sec_dns(&nine, 8), Err(EppException::TooManyDsRecords { max: 8 }));
    }

    #[test]
    fn records_are_policy_checked() {
        validate_sec_dns(&sec_dns(vec![ds(8, 2, 32), ds(13, 4, 48), ds(5, 1, 20)]), 8).unwrap();

        for bad in [ds(3, 2, 32), ds(8, 3, 32), ds(8, 2, 20)] {
            assert!(matches!(
                validate_sec_dns(&sec_dns(vec![bad]), 8),
                Err(EppException::InvalidDsRecord { .. })
            ));
        }
        let not_hex = DsData { digest: "zz".repeat(32), ..ds(8, 2, 32) };
        assert!(matches!(
            validate_sec_dns(&sec_dns(vec![not_hex]), 8),
            Err(EppException::InvalidDsRecord { .. })
        ));
    }
}
