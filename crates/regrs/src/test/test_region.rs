// Tests for the capture region: slots, absent-vs-empty, name queries

use crate::*;

fn re(pattern: &str) -> Regex {
    Regex::new(pattern.as_bytes()).unwrap()
}

#[test]
fn test_slot_zero_is_whole_match() {
    let r = re("b+");
    let mut region = Region::new();
    let start = r.search_with_region(b"abbc", &mut region).unwrap();
    assert_eq!(start, Some(1));
    assert_eq!(region.range(0), Some((1, 3)));
    assert_eq!(region.len(), 1);
}

#[test]
fn test_absent_vs_empty() {
    // (b)? did not participate: absent, not a zero-length range
    let r = re("(a)(b)?");
    let mut region = Region::new();
    assert_eq!(r.search_with_region(b"a", &mut region).unwrap(), Some(0));
    assert_eq!(region.range(1), Some((0, 1)));
    assert_eq!(region.range(2), None);

    // (b*) participated with an empty match: present, zero-length
    let r = re("(a)(b*)");
    assert_eq!(r.search_with_region(b"a", &mut region).unwrap(), Some(0));
    assert_eq!(region.range(1), Some((0, 1)));
    assert_eq!(region.range(2), Some((1, 1)));
}

#[test]
fn test_nested_groups() {
    let r = re("((a)(b))c");
    let mut region = Region::new();
    assert_eq!(r.search_with_region(b"abc", &mut region).unwrap(), Some(0));
    assert_eq!(region.range(0), Some((0, 3)));
    assert_eq!(region.range(1), Some((0, 2)));
    assert_eq!(region.range(2), Some((0, 1)));
    assert_eq!(region.range(3), Some((1, 2)));
}

#[test]
fn test_backtracked_captures_do_not_leak() {
    // the (x) branch fails after capturing; the final region must not
    // hold its stale range
    let r = re("(?:(x)y|xz)");
    let mut region = Region::new();
    assert_eq!(r.search_with_region(b"xz", &mut region).unwrap(), Some(0));
    assert_eq!(region.range(1), None);
}

#[test]
fn test_duplicate_names_resolve_to_participant() {
    let r = re("(?<a>x)|(?<a>y)");
    assert_eq!(r.group_numbers_by_name("a"), Some(&[1u16, 2u16][..]));
    assert_eq!(r.named_group_count(), 1);

    let mut region = Region::new();
    assert_eq!(r.search_with_region(b"y", &mut region).unwrap(), Some(0));
    assert_eq!(region.range(1), None);
    assert_eq!(region.range(2), Some((0, 1)));
    assert_eq!(r.backref_by_name("a", &region), Some(2));
    assert_eq!(
        r.name_ranges("a", &region),
        Some(vec![None, Some((0, 1))])
    );

    assert_eq!(r.search_with_region(b"x", &mut region).unwrap(), Some(0));
    assert_eq!(r.backref_by_name("a", &region), Some(1));
}

#[test]
fn test_multiplex_named_backref() {
    // \k<a> follows whichever "a" group matched
    let r = re(r"(?:(?<a>x)|(?<a>y))\k<a>");
    assert_eq!(r.match_at(b"xx", 0).unwrap(), Some(2));
    assert_eq!(r.match_at(b"yy", 0).unwrap(), Some(2));
    assert_eq!(r.match_at(b"xy", 0).unwrap(), None);
}

#[test]
fn test_foreach_name() {
    let r = re("(?<x>a)(?<y>b)(?<x>c)");
    let mut seen = Vec::new();
    let finished = r.foreach_name(|name, groups| {
        seen.push((name.to_string(), groups.to_vec()));
        true
    });
    assert!(finished);
    seen.sort();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], ("x".to_string(), vec![1, 3]));
    assert_eq!(seen[1], ("y".to_string(), vec![2]));

    let mut count = 0;
    let finished = r.foreach_name(|_, _| {
        count += 1;
        false
    });
    assert!(!finished);
    assert_eq!(count, 1);
}

#[test]
fn test_region_reuse() {
    let r = re("(a)+");
    let mut region = Region::new();
    assert_eq!(r.search_with_region(b"aa", &mut region).unwrap(), Some(0));
    assert_eq!(region.range(0), Some((0, 2)));
    // a failed search clears the previous result
    assert_eq!(r.search_with_region(b"zz", &mut region).unwrap(), None);
    assert!(region.is_empty());
}

#[test]
fn test_iter_in_index_order() {
    let r = re("(a)(b)?(c)");
    let mut region = Region::new();
    assert_eq!(r.search_with_region(b"ac", &mut region).unwrap(), Some(0));
    let slots: Vec<_> = region.iter().collect();
    assert_eq!(
        slots,
        vec![Some((0, 2)), Some((0, 1)), None, Some((1, 2))]
    );
}
