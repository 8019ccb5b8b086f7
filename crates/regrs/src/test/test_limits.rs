// Tests for resource limits: every limit terminates with its own error

use crate::*;

#[test]
fn test_subexp_call_nest_limit() {
    let r = Regex::new(r"(?<a>a\g<a>)".as_bytes()).unwrap();
    let param = MatchParam {
        subexp_call_nest_limit: 2,
        ..MatchParam::default()
    };
    let result = r.match_at_with(b"aaaaaaaa", 0, SearchOptions::NONE, &param, None);
    assert!(matches!(result, Err(RegexError::SubexpCallNestLimitOver)));
}

#[test]
fn test_subexp_call_nest_limit_default_terminates() {
    // an unbounded recursive pattern stops at the default nest limit
    let r = Regex::new(r"(?<a>a\g<a>)".as_bytes()).unwrap();
    let subject = vec![b'a'; 100];
    let result = r.match_at(&subject, 0);
    assert!(matches!(result, Err(RegexError::SubexpCallNestLimitOver)));
}

#[test]
fn test_subexp_call_count_limit() {
    let r = Regex::new(r"(?<a>a\g<a>?)".as_bytes()).unwrap();
    let param = MatchParam {
        subexp_call_max_count: 1,
        ..MatchParam::default()
    };
    let result = r.match_at_with(b"aaaa", 0, SearchOptions::NONE, &param, None);
    assert!(matches!(result, Err(RegexError::SubexpCallCountLimitOver)));
}

#[test]
fn test_match_stack_limit() {
    let r = Regex::new(b"(?:a|b)+c").unwrap();
    let param = MatchParam {
        match_stack_limit: 10,
        ..MatchParam::default()
    };
    let subject = vec![b'a'; 100];
    let result = r.match_at_with(&subject, 0, SearchOptions::NONE, &param, None);
    assert!(matches!(result, Err(RegexError::StackLimitOver)));
}

#[test]
fn test_retry_limit_in_match() {
    let r = Regex::new(b"a*a*a*a*b").unwrap();
    let param = MatchParam {
        retry_limit_in_match: 20,
        ..MatchParam::default()
    };
    let subject = vec![b'a'; 40];
    let result = r.match_at_with(&subject, 0, SearchOptions::NONE, &param, None);
    assert!(matches!(result, Err(RegexError::RetryLimitInMatchOver)));
}

#[test]
fn test_retry_limit_in_search() {
    let r = Regex::new(b"a+b").unwrap();
    let param = MatchParam {
        retry_limit_in_match: 0,
        retry_limit_in_search: 10,
        ..MatchParam::default()
    };
    let subject = vec![b'a'; 60];
    let result = r.search_with_param(
        &subject,
        0..subject.len(),
        SearchOptions::NONE,
        &param,
        None,
    );
    assert!(matches!(result, Err(RegexError::RetryLimitInSearchOver)));
}

#[test]
fn test_failed_limit_leaves_regex_usable() {
    let r = Regex::new(r"(?<a>a\g<a>)".as_bytes()).unwrap();
    let param = MatchParam {
        subexp_call_nest_limit: 2,
        ..MatchParam::default()
    };
    assert!(r
        .match_at_with(b"aaaa", 0, SearchOptions::NONE, &param, None)
        .is_err());
    // the regex itself is unaffected by the aborted call
    assert_eq!(r.group_count(), 1);
    assert!(
        Regex::new(r"(?<a>a\g<a>?)".as_bytes())
            .unwrap()
            .match_at(b"aaa", 0)
            .unwrap()
            .is_some()
    );
}

#[test]
fn test_limits_within_defaults_pass() {
    // ordinary patterns never hit the default limits
    let r = Regex::new(b"(a+)+$").unwrap();
    let subject = b"aaaaaaaaaaaaaaaaaaaa";
    assert_eq!(r.match_at(subject, 0).unwrap(), Some(subject.len()));
}
