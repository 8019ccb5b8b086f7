// Tests for the regex engine

mod test_compile;
mod test_history;
mod test_limits;
mod test_region;
mod test_search;
mod test_set;
mod test_syntax;
