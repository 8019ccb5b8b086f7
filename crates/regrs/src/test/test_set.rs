// Tests for RegexSet multi-pattern search

use crate::*;

fn re(pattern: &str) -> Regex {
    Regex::new(pattern.as_bytes()).unwrap()
}

fn make_set(patterns: &[&str]) -> RegexSet {
    let mut set = RegexSet::new();
    for p in patterns {
        set.push(re(p)).unwrap();
    }
    set
}

#[test]
fn test_position_lead_leftmost() {
    let set = make_set(&["bc", "c", "ab"]);
    let found = set
        .search(b"zabc", 0..4, Lead::Position, SearchOptions::NONE, None)
        .unwrap();
    assert_eq!(found, Some((2, 1)));
}

#[test]
fn test_regex_lead_matches_position_lead() {
    // cross-check invariant: both leads report the same position
    let subjects: &[&[u8]] = &[b"zabc", b"ccc", b"ab", b"zzz", b"bcab"];
    let patterns = &["bc", "c", "ab"];
    for subject in subjects {
        let set = make_set(patterns);
        let by_position = set
            .search(subject, 0..subject.len(), Lead::Position, SearchOptions::NONE, None)
            .unwrap();
        let by_regex = set
            .search(subject, 0..subject.len(), Lead::Regex, SearchOptions::NONE, None)
            .unwrap();
        assert_eq!(
            by_position.map(|(_, pos)| pos),
            by_regex.map(|(_, pos)| pos),
            "lead disagreement on {:?}",
            String::from_utf8_lossy(subject)
        );
        assert_eq!(by_position, by_regex);
    }
}

#[test]
fn test_priority_lead_follows_registration_order() {
    let set = make_set(&["bc", "c", "ab"]);
    // "bc" is registered first and matches at 2, even though "ab"
    // matches earlier in the subject
    let found = set
        .search(b"zabc", 0..4, Lead::PriorityToRegexOrder, SearchOptions::NONE, None)
        .unwrap();
    assert_eq!(found, Some((0, 2)));
}

#[test]
fn test_set_fills_winner_region() {
    let set = make_set(&["b(c)", "(a)b"]);
    let mut regions = set.regions();
    let found = set
        .search(
            b"zab",
            0..3,
            Lead::Position,
            SearchOptions::NONE,
            Some(regions.as_mut_slice()),
        )
        .unwrap();
    assert_eq!(found, Some((1, 1)));
    assert_eq!(regions[1].range(0), Some((1, 3)));
    assert_eq!(regions[1].range(1), Some((1, 2)));
    assert!(regions[0].is_empty());
}

#[test]
fn test_set_rejects_encoding_mismatch() {
    let mut set = make_set(&["a"]);
    let ascii = Regex::with_options(
        b"b",
        Encoding::Ascii,
        Options::NONE,
        &Syntax::standard(),
    )
    .unwrap();
    assert!(matches!(
        set.push(ascii),
        Err(RegexError::EncodingMismatch)
    ));
    assert_eq!(set.len(), 1);
}

#[test]
fn test_set_rejects_find_longest() {
    let mut set = make_set(&["a"]);
    let longest = Regex::with_options(
        b"b",
        Encoding::Utf8,
        Options::FIND_LONGEST,
        &Syntax::standard(),
    )
    .unwrap();
    assert!(matches!(
        set.push(longest),
        Err(RegexError::FindLongestNotAllowed)
    ));
    assert_eq!(set.len(), 1);

    // replace is validated the same way and leaves the member alone
    let longest = Regex::with_options(
        b"b",
        Encoding::Utf8,
        Options::FIND_LONGEST,
        &Syntax::standard(),
    )
    .unwrap();
    assert!(set.replace(0, longest).is_err());
    assert_eq!(set.get(0).unwrap().pattern(), b"a");
}

#[test]
fn test_set_mutation() {
    let mut set = make_set(&["a", "b"]);
    set.insert(1, re("c")).unwrap();
    assert_eq!(set.len(), 3);
    assert_eq!(set.get(1).unwrap().pattern(), b"c");

    let old = set.replace(0, re("z")).unwrap();
    assert_eq!(old.pattern(), b"a");
    assert_eq!(set.get(0).unwrap().pattern(), b"z");

    let removed = set.remove(2).unwrap();
    assert_eq!(removed.pattern(), b"b");
    assert_eq!(set.len(), 2);
    assert!(set.remove(9).is_none());
}

#[test]
fn test_set_param_count_mismatch() {
    let set = make_set(&["a", "b", "c"]);
    let params = vec![MatchParam::default()];
    let result = set.search_with_params(
        b"abc",
        0..3,
        Lead::Position,
        SearchOptions::NONE,
        &params,
        None,
    );
    assert!(matches!(
        result,
        Err(RegexError::ParamCountMismatch {
            expected: 3,
            got: 1
        })
    ));

    let mut regions = vec![Region::new(); 2];
    let result = set.search(
        b"abc",
        0..3,
        Lead::Position,
        SearchOptions::NONE,
        Some(regions.as_mut_slice()),
    );
    assert!(matches!(result, Err(RegexError::ParamCountMismatch { .. })));
}

#[test]
fn test_empty_set() {
    let set = RegexSet::new();
    assert!(set.is_empty());
    let found = set
        .search(b"abc", 0..3, Lead::Position, SearchOptions::NONE, None)
        .unwrap();
    assert_eq!(found, None);
}

#[test]
fn test_set_no_match() {
    let set = make_set(&["x", "y"]);
    for lead in [Lead::Position, Lead::Regex, Lead::PriorityToRegexOrder] {
        let found = set
            .search(b"abc", 0..3, lead, SearchOptions::NONE, None)
            .unwrap();
        assert_eq!(found, None);
    }
}

#[test]
fn test_set_tie_on_same_position() {
    // both members match at the leftmost position; the reported position
    // must be that position in every leftmost-guaranteeing lead
    let set = make_set(&["ab", "a"]);
    let by_position = set
        .search(b"zab", 0..3, Lead::Position, SearchOptions::NONE, None)
        .unwrap();
    let by_regex = set
        .search(b"zab", 0..3, Lead::Regex, SearchOptions::NONE, None)
        .unwrap();
    assert_eq!(by_position.map(|(_, p)| p), Some(1));
    assert_eq!(by_regex.map(|(_, p)| p), Some(1));
}
