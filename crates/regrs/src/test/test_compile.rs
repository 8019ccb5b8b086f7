// Tests for the pattern compiler: error kinds, offsets, counts

use crate::error::CompileErrorKind as EK;
use crate::*;

fn compile_err(pattern: &str) -> CompileError {
    match Regex::new(pattern.as_bytes()) {
        Err(RegexError::Compile(e)) => e,
        other => panic!("expected compile error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_repeat_without_target() {
    let e = compile_err("+a");
    assert_eq!(e.kind, EK::TargetOfRepeatOperatorNotSpecified);
    assert_eq!(e.offset, 0);
    let e = compile_err("a|*b");
    assert_eq!(e.kind, EK::TargetOfRepeatOperatorNotSpecified);
    assert_eq!(e.offset, 2);
}

#[test]
fn test_repeat_on_anchor() {
    let e = compile_err("^*a");
    assert_eq!(e.kind, EK::TargetOfRepeatOperatorInvalid);
    assert_eq!(e.offset, 1);
}

#[test]
fn test_unmatched_parens() {
    let e = compile_err("(ab");
    assert_eq!(e.kind, EK::EndPatternWithUnmatchedParen);
    assert_eq!(e.offset, 0);
    let e = compile_err("ab)");
    assert_eq!(e.kind, EK::UnmatchedCloseParen);
    assert_eq!(e.offset, 2);
}

#[test]
fn test_interval_errors() {
    let e = compile_err("a{3,2}");
    assert_eq!(e.kind, EK::UpperSmallerThanLowerInRepeatRange);
    assert_eq!(e.offset, 2);
    let e = compile_err("a{200000}");
    assert_eq!(e.kind, EK::TooBigNumberForRepeatRange);
    assert_eq!(e.offset, 2);
}

#[test]
fn test_malformed_interval_is_literal() {
    // the default syntax allows invalid intervals as literal text
    let r = Regex::new(b"a{x}").unwrap();
    assert!(r.is_match(b"a{x}").unwrap());
    let r = Regex::new(b"a{").unwrap();
    assert!(r.is_match(b"a{").unwrap());
}

#[test]
fn test_char_class_errors() {
    let e = compile_err("[abc");
    assert_eq!(e.kind, EK::PrematureEndOfCharClass);
    assert_eq!(e.offset, 0);
    let e = compile_err("[]");
    assert_eq!(e.kind, EK::EmptyCharClass);
    let e = compile_err("[b-a]");
    assert_eq!(e.kind, EK::EmptyRangeInCharClass);
}

#[test]
fn test_group_name_errors() {
    let e = compile_err("(?<>x)");
    assert_eq!(e.kind, EK::EmptyGroupName);
    let e = compile_err("(?<1a>x)");
    assert_eq!(e.kind, EK::InvalidGroupName);
    assert_eq!(e.token.as_deref(), Some("1a"));
    let e = compile_err("(?<a b>x)");
    assert_eq!(e.kind, EK::InvalidCharInGroupName);
    assert_eq!(e.token.as_deref(), Some("a b"));
}

#[test]
fn test_reference_errors() {
    let e = compile_err(r"\k<nope>x");
    assert_eq!(e.kind, EK::UndefinedNameReference);
    assert_eq!(e.token.as_deref(), Some("nope"));
    let e = compile_err(r"\g<9>");
    assert_eq!(e.kind, EK::UndefinedGroupReference);
    let e = compile_err(r"(a)\5");
    assert_eq!(e.kind, EK::InvalidBackref);
}

#[test]
fn test_never_ending_recursion() {
    let e = compile_err(r"(?<a>\g<a>)");
    assert_eq!(e.kind, EK::NeverEndingRecursion);
    // consuming before the recursion is fine
    assert!(Regex::new(r"(?<a>x\g<a>?)".as_bytes()).is_ok());
    // mutual leading recursion is caught too
    let e = compile_err(r"(?<a>\g<b>)(?<b>\g<a>)");
    assert_eq!(e.kind, EK::NeverEndingRecursion);
}

#[test]
fn test_property_errors() {
    let e = compile_err(r"\p{Nope}");
    assert_eq!(e.kind, EK::InvalidCharPropertyName);
    assert_eq!(e.token.as_deref(), Some("Nope"));
}

#[test]
fn test_variable_length_lookbehind_rejected() {
    let e = compile_err("(?<=a+)b");
    assert_eq!(e.kind, EK::InvalidLookBehindPattern);
    let e = compile_err(r"(?<=\g<x>)b(?<x>c)");
    assert_eq!(e.kind, EK::InvalidLookBehindPattern);
}

#[test]
fn test_escape_at_end() {
    let e = compile_err("ab\\");
    assert_eq!(e.kind, EK::EndPatternAtEscape);
}

#[test]
fn test_counts_fixed_at_compile() {
    let r = Regex::new(b"(a)(b)(?:c)").unwrap();
    assert_eq!(r.group_count(), 2);
    assert_eq!(r.named_group_count(), 0);
    assert_eq!(r.history_count(), 0);

    let r = Regex::new(b"(?<x>a)(?<y>b)").unwrap();
    assert_eq!(r.group_count(), 2);
    assert_eq!(r.named_group_count(), 2);

    let r = Regex::new(b"(?@a)(?@<h>b)").unwrap();
    assert_eq!(r.history_count(), 2);
    assert_eq!(r.named_group_count(), 1);
}

#[test]
fn test_capture_only_named_groups() {
    // with a named group present, plain groups stop capturing
    let r = Regex::new(b"(?<n>a)(b)").unwrap();
    assert_eq!(r.group_count(), 1);
    // CAPTURE_GROUP restores plain-group capturing
    let r = Regex::with_options(
        b"(?<n>a)(b)",
        Encoding::Utf8,
        Options::CAPTURE_GROUP,
        &Syntax::standard(),
    )
    .unwrap();
    assert_eq!(r.group_count(), 2);
    // DONT_CAPTURE_GROUP drops plain-group capturing entirely
    let r = Regex::with_options(
        b"(a)(b)",
        Encoding::Utf8,
        Options::DONT_CAPTURE_GROUP,
        &Syntax::standard(),
    )
    .unwrap();
    assert_eq!(r.group_count(), 0);
}

#[test]
fn test_recompile_atomicity() {
    let mut r = Regex::new(b"a+").unwrap();
    assert_eq!(r.match_at(b"aaa", 0).unwrap(), Some(3));

    // a failed reset poisons the regex instead of keeping stale state
    assert!(r.reset(b"+++").is_err());
    assert!(matches!(
        r.match_at(b"aaa", 0),
        Err(RegexError::RegexInvalidated)
    ));
    assert!(matches!(
        r.search(b"aaa"),
        Err(RegexError::RegexInvalidated)
    ));

    // a successful reset brings it back
    assert!(r.reset(b"b+").is_ok());
    assert_eq!(r.match_at(b"bbb", 0).unwrap(), Some(3));
}

#[test]
fn test_disabled_operator_is_literal() {
    let mut s = Syntax::standard();
    s.disable_operators(syntax::op::QMARK_ZERO_ONE);
    let r = Regex::with_syntax(b"a?", &s).unwrap();
    assert!(r.is_match(b"a?").unwrap());
    assert!(!r.is_match(b"a").unwrap());
}

#[test]
fn test_too_big_wide_char() {
    let e = compile_err(r"\x{110000}");
    assert_eq!(e.kind, EK::TooBigWideCharValue);
}
