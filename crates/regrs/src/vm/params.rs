// Caller-tunable match limits.

use crate::limits::{
    DEFAULT_MATCH_STACK_LIMIT, DEFAULT_RETRY_LIMIT_IN_MATCH, DEFAULT_RETRY_LIMIT_IN_SEARCH,
    DEFAULT_SUBEXP_CALL_MAX_COUNT, DEFAULT_SUBEXP_CALL_NEST_LIMIT,
};

/// Per-invocation resource limits. Every field uses 0 to mean
/// "unlimited" except `match_stack_limit` and `subexp_call_nest_limit`,
/// which are always enforced.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchParam {
    /// Maximum number of backtrack frames held at once.
    pub match_stack_limit: usize,
    /// Maximum backtrack retries inside one match attempt.
    pub retry_limit_in_match: usize,
    /// Maximum backtrack retries across all attempts of one search call.
    pub retry_limit_in_search: usize,
    /// Maximum subexpression-call nesting level.
    pub subexp_call_nest_limit: usize,
    /// Maximum total subexpression calls per match attempt.
    pub subexp_call_max_count: usize,
}

impl Default for MatchParam {
    fn default() -> Self {
        MatchParam {
            match_stack_limit: DEFAULT_MATCH_STACK_LIMIT,
            retry_limit_in_match: DEFAULT_RETRY_LIMIT_IN_MATCH,
            retry_limit_in_search: DEFAULT_RETRY_LIMIT_IN_SEARCH,
            subexp_call_nest_limit: DEFAULT_SUBEXP_CALL_NEST_LIMIT,
            subexp_call_max_count: DEFAULT_SUBEXP_CALL_MAX_COUNT,
        }
    }
}
