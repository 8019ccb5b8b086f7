// Regex Engine
// A backtracking regular expression engine with configurable syntax
// dialects, capture-history trees and multi-pattern search

#[cfg(test)]
mod test;

pub mod compiler;
pub mod defaults;
pub mod encoding;
pub mod error;
pub mod history;
pub mod limits;
pub mod options;
pub mod regex;
pub mod regex_set;
pub mod region;
pub mod syntax;
pub mod vm;

pub use defaults::{default_encoding, default_syntax, set_default_encoding, set_default_syntax};
pub use encoding::Encoding;
pub use error::{CompileError, CompileErrorKind, RegexError, RegexResult};
pub use history::{CaptureTreeNode, TraverseAt};
pub use options::{Options, SearchOptions};
pub use regex::Regex;
pub use regex_set::{Lead, RegexSet};
pub use region::Region;
pub use syntax::{MetaChar, MetaCharRole, MetaCharTable, Syntax};
pub use vm::MatchParam;
