//! Repository identifiers (`<HEX>-<SUFFIX>`).

use std::sync::atomic::{AtomicU64, Ordering};

/// Suffix a zone contributes to the repo ids of its domains: upper-cased, dots become underscores.
#[must_use]
pub fn repo_id_suffix(tld: &str) -> String {
    tld.trim_matches('.').to_ascii_uppercase().replace('.', "_")
}

#[must_use]
pub fn format_repo_id(id: u64, suffix: &str) -> String {
    format!("{id:X}-{suffix}")
}

/// Splits a repo id into its numeric id and suffix.
#[must_use]
pub fn parse_repo_id(repo_id: &str) -> Option<(u64, &str)> {
    let (hex, suffix) = repo_id.split_once('-')?;
    if suffix.is_empty() {
        return None;
    }
    u64::from_str_radix(hex, 16).ok().map(|id| (id, suffix))
}

/// Monotonic allocator of numeric ids.
#[derive(Debug)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdAllocator {
    #[must_use]
    pub const fn starting_at(first: u64) -> Self {
        Self { next: AtomicU64::new(first) }
    }

    pub fn allocate(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// A fresh repo id for a resource in `tld`.
    pub fn repo_id(&self, tld: &str) -> String {
        format_repo_id(self.allocate(), &repo_id_suffix(tld))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_ids_round_trip_through_parse() {
        let ids = IdAllocator::starting_at(0x2A);
        let id = ids.repo_id("co.uk");
        assert_eq!(id, "2A-CO_UK");
        assert_eq!(parse_repo_id(&id), Some((0x2A, "CO_UK")));
        assert_eq!(ids.allocate(), 0x2B);
    }

    #[test]
    fn malformed_repo_ids_do_not_parse() {
        assert_eq!(parse_repo_id("nohyphen"), None);
        assert_eq!(parse_repo_id("XYZ-EXAMPLE"), None);
        assert_eq!(parse_repo_id("1F-"), None);
    }
}
