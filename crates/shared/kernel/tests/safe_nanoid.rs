use reg_kernel::SAFE_ALPHABET;
use reg_kernel::safe_nanoid;
use std::collections::HashSet;

#[test]
fn job_ids_avoid_ambiguous_characters() {
    for forbidden in ['I', 'O', 'l', '0', '1'] {
        assert!(!SAFE_ALPHABET.contains(&forbidden), "{forbidden} is ambiguous");
    }

    let id = safe_nanoid!();
    assert_eq!(id.len(), 12);
    assert!(id.chars().all(|c| SAFE_ALPHABET.contains(&c)), "unexpected character in {id}");
}

#[test]
fn job_ids_do_not_repeat_within_a_batch() {
    let ids: HashSet<String> = (0..1_000).map(|_| safe_nanoid!()).collect();
    assert_eq!(ids.len(), 1_000);
}

#[test]
fn longer_ids_take_a_custom_length() {
    assert_eq!(safe_nanoid!(20).len(), 20);
}
