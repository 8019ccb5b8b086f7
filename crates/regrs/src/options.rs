// Compile-time and search-time option bitsets.
// The two are orthogonal: compile options shape the program, search
// options change anchor behavior per call without recompiling.

use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Compile-time options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Options(pub u32);

impl Options {
    pub const NONE: Options = Options(0);
    /// Case-insensitive matching (single-character simple fold).
    pub const IGNORECASE: Options = Options(1 << 0);
    /// Free-spacing mode: unescaped whitespace and `#` comments in the
    /// pattern are ignored.
    pub const EXTEND: Options = Options(1 << 1);
    /// `.` also matches newline.
    pub const MULTI_LINE: Options = Options(1 << 2);
    /// `^`/`$` match only at subject begin/end, not at line boundaries.
    pub const SINGLE_LINE: Options = Options(1 << 3);
    /// Among all matches starting at one position, prefer the longest.
    pub const FIND_LONGEST: Options = Options(1 << 4);
    /// Reject a zero-length overall match as if it were a mismatch.
    pub const FIND_NOT_EMPTY: Options = Options(1 << 5);
    /// Invert the SINGLE_LINE default of syntaxes that set it.
    pub const NEGATE_SINGLE_LINE: Options = Options(1 << 6);
    /// Only named groups consume capture slots; plain `(...)` does not
    /// capture.
    pub const DONT_CAPTURE_GROUP: Options = Options(1 << 7);
    /// Capture plain groups even when named groups are present.
    pub const CAPTURE_GROUP: Options = Options(1 << 8);

    #[inline]
    pub fn contains(self, other: Options) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Options {
    type Output = Options;
    #[inline]
    fn bitor(self, rhs: Options) -> Options {
        Options(self.0 | rhs.0)
    }
}

impl BitOrAssign for Options {
    #[inline]
    fn bitor_assign(&mut self, rhs: Options) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Options {
    type Output = Options;
    #[inline]
    fn bitand(self, rhs: Options) -> Options {
        Options(self.0 & rhs.0)
    }
}

/// Search-time options: anchoring suppression flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchOptions(pub u32);

impl SearchOptions {
    pub const NONE: SearchOptions = SearchOptions(0);
    /// The search-range start is not a beginning of line: `^` fails there.
    pub const NOT_BOL: SearchOptions = SearchOptions(1 << 0);
    /// The search-range end is not an end of line: `$` fails there.
    pub const NOT_EOL: SearchOptions = SearchOptions(1 << 1);
    /// `\A` never matches, even at the subject start.
    pub const NOT_BEGIN_STRING: SearchOptions = SearchOptions(1 << 2);
    /// `\z`/`\Z` never match, even at the subject end.
    pub const NOT_END_STRING: SearchOptions = SearchOptions(1 << 3);
    /// `\G` never matches, even at the search start position.
    pub const NOT_BEGIN_POSITION: SearchOptions = SearchOptions(1 << 4);

    #[inline]
    pub fn contains(self, other: SearchOptions) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for SearchOptions {
    type Output = SearchOptions;
    #[inline]
    fn bitor(self, rhs: SearchOptions) -> SearchOptions {
        SearchOptions(self.0 | rhs.0)
    }
}

impl BitOrAssign for SearchOptions {
    #[inline]
    fn bitor_assign(&mut self, rhs: SearchOptions) {
        self.0 |= rhs.0;
    }
}
