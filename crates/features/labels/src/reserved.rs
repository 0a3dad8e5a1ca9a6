use crate::error::LabelsError;
use crate::split_comment;
use fxhash::FxHashMap;
use reg_domain::reservation::ReservationType;

/// One reserved-list line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedListEntry {
    pub label: String,
    pub reservation_type: ReservationType,
    /// Only present for [`ReservationType::ReservedForAnchorTenant`].
    pub auth_code: Option<String>,
    pub comment: Option<String>,
}

/// A named reserved list, parsed from `label,TYPE[,authcode] # comment` lines.
#[derive(Debug, Clone, Default)]
pub struct ReservedList {
    name: String,
    entries: FxHashMap<String, ReservedListEntry>,
}

impl ReservedList {
    /// Parses list text.
    ///
    /// # Errors
    /// [`LabelsError::Parse`] for a missing or unknown type, an auth code on a type other than
    /// anchor tenant (or a missing one on anchor tenant), or a label listed twice.
    pub fn parse(name: &str, text: &str) -> Result<Self, LabelsError> {
        let mut entries = FxHashMap::default();

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let (body, comment) = split_comment(raw);
            if body.is_empty() {
                continue;
            }

            let mut parts = body.split(',').map(str::trim);
            let label = parts.next().unwrap_or_default().to_ascii_lowercase();
            let kind = parts
                .next()
                .ok_or_else(|| LabelsError::parse(name, line, "missing reservation type"))?;
            let reservation_type: ReservationType =
                kind.parse().map_err(|e: String| LabelsError::parse(name, line, e))?;
            let auth_code = parts.next().filter(|c| !c.is_empty()).map(str::to_owned);
            if parts.next().is_some() {
                return Err(LabelsError::parse(name, line, "too many fields"));
            }
            if label.is_empty() {
                return Err(LabelsError::parse(name, line, "empty label"));
            }

            let anchor = reservation_type == ReservationType::ReservedForAnchorTenant;
            match (anchor, auth_code.is_some()) {
                (true, false) => {
                    return Err(LabelsError::parse(name, line, "anchor tenant entry needs an auth code"));
                },
                (false, true) => {
                    return Err(LabelsError::parse(
                        name,
                        line,
                        "only anchor tenant entries may carry an auth code",
                    ));
                },
                _ => {},
            }

            if entries.contains_key(&label) {
                return Err(LabelsError::parse(name, line, format!("duplicate label '{label}'")));
            }
            entries.insert(
                label.clone(),
                ReservedListEntry {
                    label,
                    reservation_type,
                    auth_code,
                    comment: comment.map(str::to_owned),
                },
            );
        }

        Ok(Self { name: name.to_owned(), entries })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<&ReservedListEntry> {
        self.entries.get(label)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_entries_and_comments() {
        let list = ReservedList::parse(
            "common",
            "# reserved everywhere\n\
             Blocked,FULLY_BLOCKED # trademark dispute\n\
             sunrise,allowed_in_sunrise\n\
             anchor,RESERVED_FOR_ANCHOR_TENANT,s3cret\n",
        )
        .unwrap();

        assert_eq!(list.len(), 3);
        let blocked = list.get("blocked").unwrap();
        assert_eq!(blocked.reservation_type, ReservationType::FullyBlocked);
        assert_eq!(blocked.comment.as_deref(), Some("trademark dispute"));
        assert_eq!(list.get("anchor").and_then(|e| e.auth_code.as_deref()), Some("s3cret"));
    }

    #[test]
    fn rejects_duplicates_and_bad_types() {
        let dup = ReservedList::parse("l", "a,FULLY_BLOCKED\nA,NAME_COLLISION").unwrap_err();
        assert!(dup.to_string().contains("line 2"), "{dup}");

        assert!(ReservedList::parse("l", "a,SOMEWHAT_BLOCKED").is_err());
        assert!(ReservedList::parse("l", "a").is_err());
    }

    #[test]
    fn auth_codes_belong_to_anchor_tenants_only() {
        assert!(ReservedList::parse("l", "a,RESERVED_FOR_ANCHOR_TENANT").is_err());
        assert!(ReservedList::parse("l", "a,FULLY_BLOCKED,code").is_err());
    }
}
