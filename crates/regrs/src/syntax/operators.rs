//! Operator and behavior bits for `Syntax`.
//!
//! Operator bits gate which constructs the pattern compiler recognizes; a
//! disabled operator's characters parse as literals. Behavior bits select
//! policies for ambiguous constructs.

/// Operator feature bits. Conceptually two 32-bit groups merged into one
/// 64-bit set: the low half covers the classic operators, the high half
/// the extended ones.
pub mod op {
    /// `.` matches any character.
    pub const DOT_ANYCHAR: u64 = 1 << 0;
    /// `*` zero-or-more repeat.
    pub const ASTERISK_ZERO_INF: u64 = 1 << 1;
    /// `+` one-or-more repeat.
    pub const PLUS_ONE_INF: u64 = 1 << 2;
    /// `?` zero-or-one repeat.
    pub const QMARK_ZERO_ONE: u64 = 1 << 3;
    /// `{n,m}` interval repeat.
    pub const BRACE_INTERVAL: u64 = 1 << 4;
    /// `\{n,m\}` interval repeat (escaped form).
    pub const ESC_BRACE_INTERVAL: u64 = 1 << 5;
    /// `|` alternation.
    pub const VBAR_ALT: u64 = 1 << 6;
    /// `\|` alternation (escaped form).
    pub const ESC_VBAR_ALT: u64 = 1 << 7;
    /// `(...)` grouping.
    pub const LPAREN_SUBEXP: u64 = 1 << 8;
    /// `\(...\)` grouping (escaped form).
    pub const ESC_LPAREN_SUBEXP: u64 = 1 << 9;
    /// `^` / `$` line anchors.
    pub const LINE_ANCHOR: u64 = 1 << 10;
    /// `[...]` character class.
    pub const BRACKET_CC: u64 = 1 << 11;
    /// `[:alpha:]` POSIX brackets inside a class.
    pub const POSIX_BRACKET: u64 = 1 << 12;
    /// `\1`-`\9` decimal backreferences.
    pub const DECIMAL_BACKREF: u64 = 1 << 13;
    /// `\A` / `\z` subject anchors.
    pub const ESC_AZ_BUF_ANCHOR: u64 = 1 << 14;
    /// `\Z` end-before-final-newline anchor.
    pub const ESC_CAPITAL_Z_BUF_ANCHOR: u64 = 1 << 15;
    /// `\G` search-start anchor.
    pub const ESC_G_BEGIN_ANCHOR: u64 = 1 << 16;
    /// `\b` / `\B` word boundary.
    pub const ESC_B_WORD_BOUND: u64 = 1 << 17;
    /// `\w` / `\W` word class shorthand.
    pub const ESC_W_WORD: u64 = 1 << 18;
    /// `\d` / `\D` digit class shorthand.
    pub const ESC_D_DIGIT: u64 = 1 << 19;
    /// `\s` / `\S` whitespace class shorthand.
    pub const ESC_S_WHITE_SPACE: u64 = 1 << 20;
    /// `\n \t \r \f \v \a \e \0` control escapes.
    pub const ESC_CONTROL_CHARS: u64 = 1 << 21;
    /// `\017` octal escapes.
    pub const ESC_OCTAL3: u64 = 1 << 22;
    /// `\xHH` hex escapes.
    pub const ESC_X_HEX2: u64 = 1 << 23;
    /// `\x{7HHHHHHH}` wide hex escapes.
    pub const ESC_X_BRACE_HEX8: u64 = 1 << 24;
    /// `(?:...)` non-capturing group.
    pub const QMARK_NON_CAPTURE_GROUP: u64 = 1 << 25;
    /// `(?i)` / `(?i:...)` inline option groups.
    pub const QMARK_OPTION_GROUP: u64 = 1 << 26;
    /// Consult the meta-char table for the one-char operators instead of
    /// the built-in `. * ? +`.
    pub const VARIABLE_META_CHARACTERS: u64 = 1 << 27;

    // ---- extended group ----

    /// `(?<name>...)` / `(?'name'...)` named capture groups.
    pub const QMARK_NAMED_GROUP: u64 = 1 << 32;
    /// `\k<name>` named backreferences.
    pub const ESC_K_NAMED_BACKREF: u64 = 1 << 33;
    /// `\g<name>` / `\g<n>` subexpression calls.
    pub const ESC_G_SUBEXP_CALL: u64 = 1 << 34;
    /// `(?@...)` / `(?@<name>...)` capture-history groups.
    pub const ATMARK_CAPTURE_HISTORY: u64 = 1 << 35;
    /// `(?>...)` atomic groups.
    pub const QMARK_ATOMIC_GROUP: u64 = 1 << 36;
    /// `(?=...)` / `(?!...)` lookahead.
    pub const QMARK_LOOKAHEAD: u64 = 1 << 37;
    /// `(?<=...)` / `(?<!...)` lookbehind.
    pub const QMARK_LOOKBEHIND: u64 = 1 << 38;
    /// `*?` `+?` `??` `{n,m}?` non-greedy repeats.
    pub const QMARK_NON_GREEDY: u64 = 1 << 39;
    /// `*+` `++` `?+` possessive repeats.
    pub const PLUS_POSSESSIVE_REPEAT: u64 = 1 << 40;
    /// `\h` / `\H` hex-digit class shorthand.
    pub const ESC_H_XDIGIT: u64 = 1 << 41;
    /// `\p{Name}` / `\P{Name}` character property.
    pub const ESC_P_BRACE_CHAR_PROPERTY: u64 = 1 << 42;
    /// `\Q...\E` literal quoting.
    pub const ESC_CAPITAL_Q_QUOTE: u64 = 1 << 43;
    /// `&&` character-class intersection.
    pub const CCLASS_SET_OP: u64 = 1 << 44;
}

/// Behavior policy bits.
pub mod behavior {
    /// `{,n}` is read as `{0,n}`.
    pub const ALLOW_INTERVAL_LOW_ABBREV: u32 = 1 << 0;
    /// A malformed `{...}` is a literal sequence, not an error.
    pub const ALLOW_INVALID_INTERVAL: u32 = 1 << 1;
    /// An unmatched `)` is a literal, not an error.
    pub const ALLOW_UNMATCHED_CLOSE_PAREN: u32 = 1 << 2;
    /// Defining the same group name twice is an error.
    pub const FORBID_MULTIPLEX_DEFINED_NAME: u32 = 1 << 3;
    /// When the pattern has named groups, plain `(...)` does not capture.
    pub const CAPTURE_ONLY_NAMED_GROUP: u32 = 1 << 4;
    /// `^` / `$` are anchors anywhere in the pattern, not only at its
    /// edges.
    pub const CONTEXT_INDEP_ANCHORS: u32 = 1 << 5;
    /// A repeat operator with no target is a literal, not an error.
    pub const REPEAT_OP_WITHOUT_TARGET_IS_LITERAL: u32 = 1 << 6;
    /// Escaped class shorthands (`\w` etc.) keep their meaning inside
    /// `[...]`.
    pub const BACKSLASH_ESCAPE_IN_CC: u32 = 1 << 7;
    /// A negated character class never matches newline.
    pub const NOT_NEWLINE_IN_NEGATIVE_CC: u32 = 1 << 8;
    /// Lookbehind alternatives may differ in length (still each fixed).
    pub const DIFFERENT_LEN_ALT_LOOK_BEHIND: u32 = 1 << 9;
    /// `]` directly after `[` (or `[^`) is a literal member rather than
    /// an empty-class error.
    pub const FIRST_RBRACKET_IN_CC_IS_LITERAL: u32 = 1 << 10;
}
