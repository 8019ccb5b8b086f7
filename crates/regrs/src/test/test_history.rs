// Tests for capture-history trees

use crate::*;

fn re(pattern: &str) -> Regex {
    Regex::new(pattern.as_bytes()).unwrap()
}

#[test]
fn test_no_history_without_markers() {
    let r = re("(a)(b)");
    let mut region = Region::new();
    assert_eq!(r.search_with_region(b"ab", &mut region).unwrap(), Some(0));
    assert!(region.history().is_none());
}

#[test]
fn test_history_tree_shape() {
    let r = re(r"(?@a+(?@b+))|(?@c+(?@d+))");
    let mut region = Region::new();
    let start = r
        .search_with_region(b"- cd aaabbb -", &mut region)
        .unwrap();
    assert_eq!(start, Some(2));

    let root = region.history().expect("history tree expected");
    assert_eq!(root.group, 0);
    assert_eq!((root.beg, root.end), (2, 4));
    assert_eq!(root.node_count(), 3);

    // the branch taken was (?@c+(?@d+)): groups 3 and 4
    assert_eq!(root.children().len(), 1);
    let child = &root.children()[0];
    assert_eq!(child.group, 3);
    assert_eq!((child.beg, child.end), (2, 4));
    assert_eq!(child.children().len(), 1);
    let inner = &child.children()[0];
    assert_eq!(inner.group, 4);
    assert_eq!((inner.beg, inner.end), (3, 4));
    assert!(inner.children().is_empty());
}

#[test]
fn test_history_repeat_iterations() {
    // each loop iteration of a history group adds its own node
    let r = re(r"(?@a)+");
    let mut region = Region::new();
    assert_eq!(r.search_with_region(b"aaa", &mut region).unwrap(), Some(0));
    let root = region.history().expect("history tree expected");
    assert_eq!(root.children().len(), 3);
    let ranges: Vec<_> = root.children().iter().map(|n| (n.beg, n.end)).collect();
    assert_eq!(ranges, vec![(0, 1), (1, 2), (2, 3)]);
    // the flat capture slot only keeps the last entry
    assert_eq!(region.range(1), Some((2, 3)));
}

#[test]
fn test_named_history_group() {
    let r = re(r"(?@<h>a+)");
    assert_eq!(r.history_count(), 1);
    assert_eq!(r.named_group_count(), 1);
    let mut region = Region::new();
    assert_eq!(r.search_with_region(b"baa", &mut region).unwrap(), Some(1));
    let root = region.history().expect("history tree expected");
    assert_eq!(root.children().len(), 1);
    assert_eq!((root.children()[0].beg, root.children()[0].end), (1, 3));
    assert_eq!(r.group_numbers_by_name("h"), Some(&[1u16][..]));
}

#[test]
fn test_history_with_recursion() {
    // every invocation of the called group appears in the tree
    let r = re(r"(?@<p>\((?:[^()]|\g<p>)*\))");
    let mut region = Region::new();
    assert_eq!(
        r.search_with_region(b"(a(b))", &mut region).unwrap(),
        Some(0)
    );
    let root = region.history().expect("history tree expected");
    assert_eq!(root.children().len(), 1);
    let outer = &root.children()[0];
    assert_eq!((outer.beg, outer.end), (0, 6));
    assert_eq!(outer.children().len(), 1);
    assert_eq!((outer.children()[0].beg, outer.children()[0].end), (2, 5));
}

#[test]
fn test_backtracked_history_nodes_are_discarded() {
    // the first branch's history entry must not survive its failure
    let r = re(r"(?@x)y|(?@x)z");
    let mut region = Region::new();
    assert_eq!(r.search_with_region(b"xz", &mut region).unwrap(), Some(0));
    let root = region.history().expect("history tree expected");
    assert_eq!(root.node_count(), 2);
    assert_eq!(root.children().len(), 1);
    assert_eq!(root.children()[0].group, 2);
}
