use proptest::prelude::*;
use reg_domain::reservation::ReservationType;

proptest! {
    #[test]
    fn severity_rank_strictly_increases(i in 0usize..6) {
        let lower = ReservationType::ALL[i];
        let higher = ReservationType::ALL[i + 1];
        prop_assert!(lower.severity() < higher.severity());
        prop_assert!(lower < higher);
    }

    #[test]
    fn most_severe_is_the_maximum(picks in proptest::collection::vec(0usize..7, 0..12)) {
        let types: Vec<_> = picks.iter().map(|&i| ReservationType::ALL[i]).collect();
        let expected = picks.iter().max().map_or(ReservationType::Unreserved, |&i| ReservationType::ALL[i]);
        prop_assert_eq!(ReservationType::most_severe(types), expected);
    }
}

#[test]
fn names_parse_case_insensitively() {
    assert_eq!("fully_blocked".parse::<ReservationType>(), Ok(ReservationType::FullyBlocked));
    assert_eq!(
        " Reserved_For_Anchor_Tenant ".parse::<ReservationType>(),
        Ok(ReservationType::ReservedForAnchorTenant)
    );
    assert!("SORT_OF_RESERVED".parse::<ReservationType>().is_err());
}

#[test]
fn messages_follow_the_reservation_type() {
    assert_eq!(ReservationType::Unreserved.message_for_check(), None);
    assert_eq!(ReservationType::AllowedInSunrise.message_for_check(), Some("Reserved for non-sunrise"));
    assert_eq!(ReservationType::NameCollision.message_for_check(), Some("Cannot be delegated"));
    assert_eq!(ReservationType::FullyBlocked.message_for_check(), Some("Reserved"));
}
