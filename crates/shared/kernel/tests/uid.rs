use std::collections::HashSet;
use waitlist_kernel::{SAFE_ALPHABET, safe_nanoid};

#[test]
fn registration_uids_are_twelve_unambiguous_chars() {
    let uids: HashSet<String> = (0..1_000).map(|_| safe_nanoid!()).collect();

    assert_eq!(uids.len(), 1_000);
    for uid in &uids {
        assert_eq!(uid.chars().count(), 12);
        assert!(uid.chars().all(|ch| SAFE_ALPHABET.contains(&ch)), "{uid}");
        assert!(!uid.contains(['0', 'O', '1', 'I', 'l']), "{uid}");
    }
}

#[test]
fn explicit_length_overrides_the_default() {
    assert_eq!(safe_nanoid!(21).len(), 21);
}
