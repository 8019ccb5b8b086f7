// Tests for the search engine: candidate advance, ranges, anchors, scan

use crate::*;

fn re(pattern: &str) -> Regex {
    Regex::new(pattern.as_bytes()).unwrap()
}

#[test]
fn test_leftmost_search() {
    assert_eq!(re("ab").search(b"xxabyab").unwrap(), Some((2, 4)));
    assert_eq!(re("ab").search(b"zzz").unwrap(), None);
}

#[test]
fn test_empty_pattern() {
    assert_eq!(re("").search(b"abc").unwrap(), Some((0, 0)));
    assert_eq!(re("").search(b"").unwrap(), Some((0, 0)));
}

#[test]
fn test_search_in_subrange() {
    let subject = b"aa baa";
    assert_eq!(re("a+").search(subject).unwrap(), Some((0, 2)));
    let mut region = Region::new();
    let start = re("a+")
        .search_in(subject, 2..subject.len(), SearchOptions::NONE, Some(&mut region))
        .unwrap();
    assert_eq!(start, Some(4));
    assert_eq!(region.range(0), Some((4, 6)));
}

#[test]
fn test_anchors_use_full_subject_not_search_range() {
    // ^ at position 1 of "ab" is not a line begin even when the scan
    // range starts there
    let r = re("^b");
    assert_eq!(
        r.search_in(b"ab", 1..2, SearchOptions::NONE, None).unwrap(),
        None
    );
    // but after a real newline it is
    assert_eq!(
        r.search_in(b"a\nb", 2..3, SearchOptions::NONE, None).unwrap(),
        Some(2)
    );
    // \A only matches at the true subject start
    let r = re(r"\Ab");
    assert_eq!(
        r.search_in(b"ab", 1..2, SearchOptions::NONE, None).unwrap(),
        None
    );
}

#[test]
fn test_search_start_anchor() {
    let r = re(r"\Ga");
    // \G matches where this search started
    assert_eq!(
        r.search_in(b"ba", 1..2, SearchOptions::NONE, None).unwrap(),
        Some(1)
    );
    // but not at later candidate positions
    assert_eq!(
        r.search_in(b"bxa", 1..3, SearchOptions::NONE, None).unwrap(),
        None
    );
    assert_eq!(
        r.search_in(b"ba", 1..2, SearchOptions::NOT_BEGIN_POSITION, None)
            .unwrap(),
        None
    );
}

#[test]
fn test_not_bol_not_eol() {
    assert_eq!(
        re("^a").search_in(b"abc", 0..3, SearchOptions::NOT_BOL, None).unwrap(),
        None
    );
    assert_eq!(
        re("c$").search_in(b"abc", 0..3, SearchOptions::NOT_EOL, None).unwrap(),
        None
    );
    assert_eq!(
        re("^a").search_in(b"abc", 0..3, SearchOptions::NONE, None).unwrap(),
        Some(0)
    );
}

#[test]
fn test_line_vs_buffer_end() {
    assert_eq!(re("a$").search(b"a\nb").unwrap(), Some((0, 1)));
    assert_eq!(re(r"a\z").search(b"a\n").unwrap(), None);
    assert_eq!(re(r"a\Z").search(b"a\n").unwrap(), Some((0, 1)));
    assert_eq!(re(r"a\z").search(b"ba").unwrap(), Some((1, 2)));
}

#[test]
fn test_multiline_caret() {
    let r = re("^ab");
    assert_eq!(r.search(b"zab\nab").unwrap(), Some((4, 6)));
}

#[test]
fn test_prefix_optimization_is_transparent() {
    // same results whether or not the literal-prefix fast path fires
    let with_prefix = re("abc+");
    let without_prefix = re("[aA]bc+");
    let subject = b"zzabccc zzabc";
    assert_eq!(with_prefix.search(subject).unwrap(), Some((2, 7)));
    assert_eq!(without_prefix.search(subject).unwrap(), Some((2, 7)));
}

#[test]
fn test_invalid_ranges() {
    assert!(matches!(
        re("a").search_in(b"ab", 1..5, SearchOptions::NONE, None),
        Err(RegexError::InvalidRange { .. })
    ));
    assert!(matches!(
        re("a").match_at(b"ab", 9),
        Err(RegexError::InvalidRange { .. })
    ));
}

#[test]
fn test_scan() {
    let r = re("a+");
    let mut region = Region::new();
    let mut found = Vec::new();
    let count = r
        .scan(b"aa b aaa", SearchOptions::NONE, &mut region, |n, start, region| {
            found.push((n, start, region.range(0).unwrap()));
            true
        })
        .unwrap();
    assert_eq!(count, 2);
    assert_eq!(found, vec![(0, 0, (0, 2)), (1, 5, (5, 8))]);
}

#[test]
fn test_scan_empty_matches_advance() {
    let r = re("a*");
    let mut region = Region::new();
    let mut starts = Vec::new();
    let count = r
        .scan(b"ab", SearchOptions::NONE, &mut region, |_, start, _| {
            starts.push(start);
            true
        })
        .unwrap();
    assert_eq!(count, 3);
    assert_eq!(starts, vec![0, 1, 2]);
}

#[test]
fn test_scan_early_stop() {
    let r = re("a");
    let mut region = Region::new();
    let count = r
        .scan(b"aaaa", SearchOptions::NONE, &mut region, |n, _, _| n < 1)
        .unwrap();
    assert_eq!(count, 2);
}

#[test]
fn test_utf8_candidate_stepping() {
    // candidates advance by whole characters
    let r = re("b");
    let subject = "ééb".as_bytes();
    assert_eq!(r.search(subject).unwrap(), Some((4, 5)));
}
