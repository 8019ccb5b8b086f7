// Tests for syntax dialects: presets, gating, meta chars, defaults

use crate::syntax::op;
use crate::*;

#[test]
fn test_syntax_value_semantics_end_to_end() {
    // a regex keeps its own snapshot: mutating the syntax afterwards
    // does not change compiled behavior
    let mut syntax = Syntax::standard();
    let r = Regex::with_syntax(b"a.c", &syntax).unwrap();
    syntax.disable_operators(op::DOT_ANYCHAR);
    assert!(r.is_match(b"abc").unwrap());

    // and a regex compiled from the mutated copy sees the change
    let literal_dot = Regex::with_syntax(b"a.c", &syntax).unwrap();
    assert!(!literal_dot.is_match(b"abc").unwrap());
    assert!(literal_dot.is_match(b"a.c").unwrap());
}

#[test]
fn test_asis_matches_everything_literally() {
    let r = Regex::with_syntax(b"a.*+(", &Syntax::asis()).unwrap();
    assert!(r.is_match(b"xa.*+(z").unwrap());
    assert!(!r.is_match(b"abc").unwrap());
}

#[test]
fn test_posix_basic_escaped_operators() {
    let syntax = Syntax::posix_basic();
    // bare parens are literals
    let r = Regex::with_syntax(b"(ab)", &syntax).unwrap();
    assert!(r.is_match(b"x(ab)y").unwrap());
    // escaped parens group, with backrefs
    let r = Regex::with_syntax(br"\(ab\)\1", &syntax).unwrap();
    assert_eq!(r.match_at(b"abab", 0).unwrap(), Some(4));
    assert_eq!(r.group_count(), 1);
    // escaped interval
    let r = Regex::with_syntax(br"a\{2,3\}", &syntax).unwrap();
    assert_eq!(r.match_at(b"aaaa", 0).unwrap(), Some(3));
    // leading star is a literal
    let r = Regex::with_syntax(b"*a", &syntax).unwrap();
    assert!(r.is_match(b"*a").unwrap());
    // + is not an operator in basic syntax
    let r = Regex::with_syntax(b"a+", &syntax).unwrap();
    assert!(r.is_match(b"a+").unwrap());
    assert!(!r.is_match(b"aa").unwrap());
}

#[test]
fn test_posix_extended_plain_operators() {
    let syntax = Syntax::posix_extended();
    let r = Regex::with_syntax(b"(a|b)+c", &syntax).unwrap();
    assert_eq!(r.match_at(b"abbac", 0).unwrap(), Some(5));
    // no perl escapes: \d is a literal 'd'
    let r = Regex::with_syntax(br"\d", &syntax).unwrap();
    assert!(r.is_match(b"d").unwrap());
    assert!(!r.is_match(b"5").unwrap());
    // POSIX brackets still work
    let r = Regex::with_syntax(b"[[:digit:]]+", &syntax).unwrap();
    assert!(r.is_match(b"42").unwrap());
}

#[test]
fn test_grep_escaped_alternation() {
    let r = Regex::with_syntax(br"a\|b", &Syntax::grep()).unwrap();
    assert!(r.is_match(b"b").unwrap());
    assert!(r.is_match(b"a").unwrap());
    assert!(!r.is_match(b"c").unwrap());
}

#[test]
fn test_single_line_default_of_posix() {
    // posix presets carry SINGLE_LINE: ^ anchors the subject, not lines
    let r = Regex::with_syntax(b"^a", &Syntax::posix_extended()).unwrap();
    assert_eq!(r.search(b"b\na").unwrap(), None);
    let r = Regex::with_syntax(b"^a", &Syntax::standard()).unwrap();
    assert_eq!(r.search(b"b\na").unwrap(), Some((2, 3)));
}

#[test]
fn test_negate_single_line_option() {
    let r = Regex::with_options(
        b"^a",
        Encoding::Utf8,
        Options::NEGATE_SINGLE_LINE,
        &Syntax::posix_extended(),
    )
    .unwrap();
    assert_eq!(r.search(b"b\na").unwrap(), Some((2, 3)));
}

#[test]
fn test_perl_lacks_ruby_extensions() {
    // capture history is not a Perl operator: (?@ is unknown there
    assert!(Regex::with_syntax(b"(?@a)", &Syntax::perl()).is_err());
    assert!(Regex::with_syntax(b"(?@a)", &Syntax::ruby()).is_ok());
    // possessive repeats are Java, not Ruby
    let ruby = Regex::with_syntax(b"a*+a", &Syntax::ruby()).unwrap();
    // parsed as (a*)+ then literal... a*+ without the operator is a
    // nested repeat, so the trailing a still matches
    assert!(ruby.is_match(b"aaa").unwrap());
    let java = Regex::with_syntax(b"a*+a", &Syntax::java()).unwrap();
    assert!(!java.is_match(b"aaa").unwrap());
}

#[test]
fn test_ruby_forbids_duplicate_names() {
    let err = Regex::with_syntax(b"(?<a>x)(?<a>y)", &Syntax::ruby());
    assert!(matches!(
        err,
        Err(RegexError::Compile(e))
            if e.kind == crate::error::CompileErrorKind::MultiplexDefinedName
    ));
    // the default dialect multiplexes them instead
    assert!(Regex::new(b"(?<a>x)(?<a>y)").is_ok());
}

#[test]
fn test_custom_escape_meta_char() {
    let mut syntax = Syntax::standard();
    assert!(syntax.set_meta_char(MetaCharRole::Escape, Some(b"%")));
    let r = Regex::with_syntax(b"%d+", &syntax).unwrap();
    assert!(r.is_match(b"123").unwrap());
    // backslash is now an ordinary character
    let r = Regex::with_syntax(br"\d", &syntax).unwrap();
    assert!(r.is_match(br"\d").unwrap());
}

#[test]
fn test_any_char_any_time_meta() {
    let mut syntax = Syntax::standard();
    syntax.enable_operators(op::VARIABLE_META_CHARACTERS);
    assert!(syntax.set_meta_char(MetaCharRole::AnyCharAnyTime, Some(b"@@")));
    let r = Regex::with_syntax(b"a@@b", &syntax).unwrap();
    assert!(r.is_match(b"axyzb").unwrap());
    assert!(r.is_match(b"ab").unwrap());
}

#[test]
fn test_process_wide_defaults() {
    // tests run in parallel, so only write back the values already there
    assert_eq!(default_encoding(), Encoding::Utf8);
    let snapshot = default_syntax();
    assert_eq!(snapshot, Syntax::standard());
    set_default_syntax(snapshot);
    set_default_encoding(Encoding::Utf8);
    assert_eq!(default_syntax(), Syntax::standard());

    // Regex::new picks the defaults up
    let r = Regex::new(br"\d").unwrap();
    assert!(r.is_match(b"5").unwrap());
    assert_eq!(r.encoding(), Encoding::Utf8);
}

#[test]
fn test_latin1_encoding() {
    let r = Regex::with_options(
        b"\xe9+",
        Encoding::Latin1,
        Options::NONE,
        &Syntax::standard(),
    )
    .unwrap();
    assert_eq!(r.match_at(b"\xe9\xe9x", 0).unwrap(), Some(2));
    let r = Regex::with_options(
        br"\w+",
        Encoding::Latin1,
        Options::NONE,
        &Syntax::standard(),
    )
    .unwrap();
    assert_eq!(r.match_at(b"a\xe9 b", 0).unwrap(), Some(2));
}
