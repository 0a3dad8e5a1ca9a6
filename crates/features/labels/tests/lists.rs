use parking_lot::Mutex;
use proptest::prelude::*;
use reg_domain::config::ListsConfig;
use reg_domain::reservation::ReservationType;
use reg_domain::tld::TldPolicy;
use reg_labels::{
    LabelCatalog, LabelsError, ReservationPolicy, ReservedList, ReservedListCheck, ReservedListObserver,
};
use std::sync::Arc;

fn zone(lists: &[&str]) -> TldPolicy {
    TldPolicy {
        reserved_lists: lists.iter().map(|l| (*l).to_owned()).collect(),
        ..TldPolicy::general_availability("tld")
    }
}

#[derive(Debug, Default)]
struct Recorder(Mutex<Vec<(String, usize, String, ReservationType)>>);

impl ReservedListObserver for Recorder {
    fn record(&self, check: &ReservedListCheck<'_>) {
        self.0.lock().push((
            check.tld.to_owned(),
            check.match_count,
            check.most_severe_list.unwrap_or("(none)").to_owned(),
            check.most_severe_type,
        ));
    }
}

#[test]
fn most_severe_list_wins_and_is_observed() {
    let soft = ReservedList::parse("soft", "foo,ALLOWED_IN_SUNRISE\nbar,NAME_COLLISION").unwrap();
    let hard = ReservedList::parse("hard", "foo,FULLY_BLOCKED # trademark dispute").unwrap();
    let recorder = Arc::new(Recorder::default());
    let policy = ReservationPolicy::new([soft, hard]).with_observer(recorder.clone());

    assert_eq!(policy.reservation_type("foo", &zone(&["soft", "hard"])), ReservationType::FullyBlocked);
    assert_eq!(policy.reservation_type("foo", &zone(&["soft"])), ReservationType::AllowedInSunrise);
    assert_eq!(policy.reservation_type("baz", &zone(&["soft", "hard"])), ReservationType::Unreserved);

    let seen = recorder.0.lock();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0], ("tld".to_owned(), 2, "hard".to_owned(), ReservationType::FullyBlocked));
    assert_eq!(seen[2], ("tld".to_owned(), 0, "(none)".to_owned(), ReservationType::Unreserved));
}

#[test]
fn unbound_lists_do_not_apply() {
    let list = ReservedList::parse("other", "foo,FULLY_BLOCKED").unwrap();
    let policy = ReservationPolicy::new([list]);
    assert_eq!(policy.reservation_type("foo", &zone(&[])), ReservationType::Unreserved);
}

#[test]
fn anchor_tenant_requires_exact_code() {
    let list = ReservedList::parse("anchors", "anchor,RESERVED_FOR_ANCHOR_TENANT,s3cret").unwrap();
    let policy = ReservationPolicy::new([list]);
    let tld = zone(&["anchors"]);

    assert!(policy.matches_anchor_tenant("anchor", &tld, "s3cret"));
    assert!(!policy.matches_anchor_tenant("anchor", &tld, "wrong"));
    assert!(!policy.matches_anchor_tenant("anchor", &tld, ""));
    assert!(!policy.matches_anchor_tenant("other", &tld, "s3cret"));
    assert!(!policy.matches_anchor_tenant("anchor", &zone(&[]), "s3cret"));
}

#[test]
fn catalog_loads_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let reserved = dir.path().join("reserved.txt");
    let premium = dir.path().join("premium.txt");
    let claims = dir.path().join("claims.csv");
    std::fs::write(&reserved, "blocked,FULLY_BLOCKED\n").unwrap();
    std::fs::write(&premium, "rich,USD 100\n").unwrap();
    std::fs::write(
        &claims,
        "1,2024-01-01T00:00:00Z\nDNL,lookup-key,insertion-datetime\nmark,2013041500/1/1/1/key,2011-01-01T00:00:00Z\n",
    )
    .unwrap();

    let config = ListsConfig {
        reserved: [("base".to_owned(), reserved)].into(),
        premium: [("gold".to_owned(), premium)].into(),
        claims: Some(claims),
    };
    let catalog = LabelCatalog::load(&config).unwrap();

    let tld = TldPolicy { premium_list: Some("gold".to_owned()), ..zone(&["base"]) };
    assert_eq!(catalog.reservations.reservation_type("blocked", &tld), ReservationType::FullyBlocked);
    assert!(catalog.pricing.is_premium("rich", &tld));
    assert!(catalog.claims.is_on_claims_list("mark"));
}

#[test]
fn missing_list_file_is_an_io_error() {
    let config = ListsConfig {
        reserved: [("base".to_owned(), "/nonexistent/reserved.txt".into())].into(),
        ..ListsConfig::default()
    };
    assert!(matches!(LabelCatalog::load(&config), Err(LabelsError::Io { .. })));
}

fn reservation_type() -> impl Strategy<Value = ReservationType> {
    prop::sample::select(
        ReservationType::ALL
            .into_iter()
            .filter(|t| *t != ReservationType::ReservedForAnchorTenant && *t != ReservationType::Unreserved)
            .collect::<Vec<_>>(),
    )
}

proptest! {
    #[test]
    fn effective_type_is_max_over_bound_lists(types in prop::collection::vec(reservation_type(), 0..6)) {
        let lists: Vec<ReservedList> = types
            .iter()
            .enumerate()
            .map(|(i, t)| ReservedList::parse(&format!("list{i}"), &format!("label,{t}")).unwrap())
            .collect();
        let names: Vec<String> = lists.iter().map(|l| l.name().to_owned()).collect();
        let tld = TldPolicy {
            reserved_lists: names,
            ..TldPolicy::general_availability("tld")
        };
        let policy = ReservationPolicy::new(lists);

        let expected = types.iter().copied().max().unwrap_or(ReservationType::Unreserved);
        prop_assert_eq!(policy.reservation_type("label", &tld), expected);
    }
}
