//! Internationalized labels: Punycode and the IDN tables zones may adopt.

pub mod punycode;

/// A named set of code points a Unicode label may be drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdnTable {
    pub name: &'static str,
    ranges: &'static [(char, char)],
}

pub const EXTENDED_LATIN: IdnTable = IdnTable {
    name: "extended_latin",
    ranges: &[
        ('a', 'z'),
        ('0', '9'),
        ('-', '-'),
        ('\u{00DF}', '\u{00F6}'),
        ('\u{00F8}', '\u{00FF}'),
        ('\u{0100}', '\u{017F}'),
    ],
};

pub const JA: IdnTable = IdnTable {
    name: "ja",
    ranges: &[
        ('a', 'z'),
        ('0', '9'),
        ('-', '-'),
        ('\u{3005}', '\u{3005}'),
        ('\u{3041}', '\u{3096}'),
        ('\u{309D}', '\u{309E}'),
        ('\u{30A1}', '\u{30FA}'),
        ('\u{30FC}', '\u{30FE}'),
        ('\u{4E00}', '\u{9FFF}'),
    ],
};

/// Every built-in table.
pub const TABLES: [IdnTable; 2] = [EXTENDED_LATIN, JA];

impl IdnTable {
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        TABLES.into_iter().find(|t| t.name == name)
    }

    #[must_use]
    pub fn accepts(&self, label: &str) -> bool {
        label.chars().all(|c| self.ranges.iter().any(|(lo, hi)| (*lo..=*hi).contains(&c)))
    }
}

/// The first of `tables` (by name, in order) that accepts `label`.
///
/// Unknown table names are skipped.
pub fn find_table<'a>(label: &str, tables: impl IntoIterator<Item = &'a String>) -> Option<IdnTable> {
    tables.into_iter().filter_map(|name| IdnTable::by_name(name)).find(|t| t.accepts(label))
}
