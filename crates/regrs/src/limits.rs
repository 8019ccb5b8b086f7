//! Centralized engine limits and configuration constants.
//!
//! All magic numbers that control compiler and matcher behavior are
//! collected here for easy tuning and configuration.

// ===== Match-time stack =====

/// Default maximum number of backtrack frames a single match may push.
/// Exceeding it aborts the match with `RegexError::StackLimitOver`.
pub const DEFAULT_MATCH_STACK_LIMIT: usize = 100_000;

/// Initial backtrack stack capacity. Grows on demand up to the limit.
pub const INIT_MATCH_STACK_SIZE: usize = 160;

// ===== Retry budgets =====

/// Default maximum number of backtrack retries inside one match attempt.
/// 0 means unlimited.
pub const DEFAULT_RETRY_LIMIT_IN_MATCH: usize = 10_000_000;

/// Default maximum number of backtrack retries accumulated across all
/// match attempts of one search call. 0 means unlimited.
pub const DEFAULT_RETRY_LIMIT_IN_SEARCH: usize = 0;

// ===== Subexpression calls =====

/// Default maximum nesting level for subexpression calls (`\g<name>`).
pub const DEFAULT_SUBEXP_CALL_NEST_LIMIT: usize = 24;

/// Default maximum total subexpression calls per match attempt.
/// 0 means unlimited.
pub const DEFAULT_SUBEXP_CALL_MAX_COUNT: usize = 0;

// ===== Compiler =====

/// Maximum value accepted for either bound of an interval quantifier
/// (`{n,m}`). Larger numbers are a compile error.
pub const MAX_REPEAT_NUM: u32 = 100_000;

/// Maximum number of capture groups in one pattern.
pub const MAX_CAPTURE_GROUPS: usize = 32_767;

/// Maximum compiled program length in instructions. Guards against
/// interval expansion blowing up memory.
pub const MAX_PROGRAM_SIZE: usize = 1_000_000;

/// Maximum parser recursion depth (group / class nesting).
pub const MAX_PARSE_DEPTH: usize = 200;

// ===== Syntax =====

/// Maximum byte length of one meta-character replacement sequence.
pub const MAX_META_CHAR_LEN: usize = 4;
