use crate::error::LabelsError;
use chrono::{DateTime, Utc};
use fxhash::FxHashMap;
use std::sync::Arc;

const LIST_NAME: &str = "claims";

/// The trademark clearinghouse domain name list (DNL).
#[derive(Debug, Clone)]
pub struct ClaimsList {
    creation_time: DateTime<Utc>,
    keys: FxHashMap<String, String>,
}

impl ClaimsList {
    /// Parses the DNL CSV:
    ///
    /// ```text
    /// 1,2024-01-01T00:00:00.0Z
    /// DNL,lookup-key,insertion-datetime
    /// example,2013041500/2/6/9/rJ1NrDO92vDsAzf7EQzgjX4R0000000001,2010-07-14T00:00:00.0Z
    /// ```
    ///
    /// # Errors
    /// [`LabelsError::Parse`] for a bad header, column line or row.
    pub fn parse(text: &str) -> Result<Self, LabelsError> {
        let mut lines = text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());

        let (_, header) =
            lines.next().ok_or_else(|| LabelsError::parse(LIST_NAME, 1, "empty claims list"))?;
        let creation_time = match header.split(',').map(str::trim).collect::<Vec<_>>()[..] {
            ["1", created] => parse_time(created, 1)?,
            _ => return Err(LabelsError::parse(LIST_NAME, 1, "expected header '1,<creation time>'")),
        };

        let (index, columns) =
            lines.next().ok_or_else(|| LabelsError::parse(LIST_NAME, 2, "missing column line"))?;
        if columns.trim() != "DNL,lookup-key,insertion-datetime" {
            return Err(LabelsError::parse(LIST_NAME, index + 1, "unexpected column line"));
        }

        let mut keys = FxHashMap::default();
        for (index, row) in lines {
            let line = index + 1;
            let [label, key, inserted] = row.split(',').map(str::trim).collect::<Vec<_>>()[..] else {
                return Err(LabelsError::parse(LIST_NAME, line, "expected 3 fields"));
            };
            parse_time(inserted, line)?;
            if label.is_empty() || key.is_empty() {
                return Err(LabelsError::parse(LIST_NAME, line, "empty label or key"));
            }
            keys.insert(label.to_ascii_lowercase(), key.to_owned());
        }

        Ok(Self { creation_time, keys })
    }

    #[must_use]
    pub const fn creation_time(&self) -> DateTime<Utc> {
        self.creation_time
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }
}

fn parse_time(raw: &str, line: usize) -> Result<DateTime<Utc>, LabelsError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| LabelsError::parse(LIST_NAME, line, format!("bad timestamp '{raw}': {e}")))
}

/// Label to claim key lookup over the current claims list.
///
/// Callers consult it only while the zone's claims period is running.
#[derive(Debug, Clone)]
pub struct ClaimsRegistry {
    list: Arc<ClaimsList>,
}

impl Default for ClaimsRegistry {
    fn default() -> Self {
        Self::new(ClaimsList { creation_time: DateTime::<Utc>::UNIX_EPOCH, keys: FxHashMap::default() })
    }
}

impl ClaimsRegistry {
    #[must_use]
    pub fn new(list: ClaimsList) -> Self {
        Self { list: Arc::new(list) }
    }

    #[must_use]
    pub fn claim_key(&self, label: &str) -> Option<&str> {
        self.list.keys.get(label).map(String::as_str)
    }

    #[must_use]
    pub fn is_on_claims_list(&self, label: &str) -> bool {
        self.claim_key(label).is_some()
    }

    #[must_use]
    pub fn list(&self) -> &ClaimsList {
        &self.list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DNL: &str = "1,2024-01-01T00:00:00.0Z\n\
                       DNL,lookup-key,insertion-datetime\n\
                       example,2013041500/2/6/9/rJ1NrDO92vDsAzf7EQzgjX4R0000000001,2010-07-14T00:00:00.0Z\n\
                       Another,2013041500/1/1/1/abc,2011-01-01T00:00:00Z\n";

    #[test]
    fn parses_dnl() {
        let registry = ClaimsRegistry::new(ClaimsList::parse(DNL).unwrap());
        assert_eq!(registry.list().len(), 2);
        assert!(registry.is_on_claims_list("another"));
        assert_eq!(
            registry.claim_key("example"),
            Some("2013041500/2/6/9/rJ1NrDO92vDsAzf7EQzgjX4R0000000001")
        );
        assert_eq!(registry.claim_key("missing"), None);
    }

    #[test]
    fn rejects_bad_headers() {
        assert!(ClaimsList::parse("2,2024-01-01T00:00:00Z\nDNL,lookup-key,insertion-datetime").is_err());
        assert!(ClaimsList::parse("1,2024-01-01T00:00:00Z\nlabel,key,time").is_err());
        assert!(ClaimsList::parse("1,2024-01-01T00:00:00Z\nDNL,lookup-key,insertion-datetime\na,b").is_err());
    }
}
