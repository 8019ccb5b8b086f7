// Structured error types for compilation, matching and configuration.
// "No match" is never an error: the engine reports it as Ok(None).

use smol_str::SmolStr;

/// Result alias used across the engine.
pub type RegexResult<T> = Result<T, RegexError>;

/// What went wrong while parsing or compiling a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompileErrorKind {
    /// A repeat operator (`*`, `+`, `?`, `{n,m}`) with nothing before it.
    TargetOfRepeatOperatorNotSpecified,
    /// A repeat operator applied to an anchor or another invalid target.
    TargetOfRepeatOperatorInvalid,
    /// `)` without a matching `(`.
    UnmatchedCloseParen,
    /// Pattern ended while a group was still open.
    EndPatternWithUnmatchedParen,
    /// Pattern ended right after the escape character.
    EndPatternAtEscape,
    /// Pattern ended inside a group construct such as `(?<`.
    EndPatternInGroup,
    /// Character class was not closed with `]`.
    PrematureEndOfCharClass,
    /// `[]` (or `[^]`) with no members where the syntax forbids it.
    EmptyCharClass,
    /// Range `[b-a]` whose upper end is below its lower end.
    EmptyRangeInCharClass,
    /// Malformed `{n,m}` where the syntax requires a valid interval.
    InvalidRepeatRange,
    /// Interval bound larger than `limits::MAX_REPEAT_NUM`.
    TooBigNumberForRepeatRange,
    /// `{m,n}` with n < m.
    UpperSmallerThanLowerInRepeatRange,
    /// `(?<>)` — a named group with an empty name.
    EmptyGroupName,
    /// Group name contains a character outside `[A-Za-z0-9_]`.
    InvalidCharInGroupName,
    /// Group name is malformed (e.g. starts with a digit).
    InvalidGroupName,
    /// Same name defined twice while the syntax forbids multiplex names.
    MultiplexDefinedName,
    /// `\k<name>` / `\g<name>` referring to an undefined name.
    UndefinedNameReference,
    /// `\g<n>` referring to a group number that does not exist.
    UndefinedGroupReference,
    /// Backreference to a group number that does not exist.
    InvalidBackref,
    /// A subexpression call cycle that can never terminate,
    /// e.g. `(?<a>\g<a>)` with no consuming alternative.
    NeverEndingRecursion,
    /// `\p{...}` with an unknown property name.
    InvalidCharPropertyName,
    /// `(?X...)` where `X` is not a known group construct.
    UndefinedGroupOption,
    /// `\x{...}` value beyond what the encoding can represent.
    TooBigWideCharValue,
    /// Lookbehind body whose byte length cannot be fixed at compile time.
    InvalidLookBehindPattern,
    /// More capture groups than `limits::MAX_CAPTURE_GROUPS`.
    TooManyCaptures,
    /// Compiled program exceeded `limits::MAX_PROGRAM_SIZE`.
    ProgramTooBig,
    /// Group/class nesting exceeded `limits::MAX_PARSE_DEPTH`.
    ParseDepthLimitOver,
}

impl CompileErrorKind {
    pub fn message(&self) -> &'static str {
        match self {
            Self::TargetOfRepeatOperatorNotSpecified => {
                "target of repeat operator is not specified"
            }
            Self::TargetOfRepeatOperatorInvalid => "target of repeat operator is invalid",
            Self::UnmatchedCloseParen => "unmatched close parenthesis",
            Self::EndPatternWithUnmatchedParen => "end pattern with unmatched parenthesis",
            Self::EndPatternAtEscape => "end pattern at escape",
            Self::EndPatternInGroup => "end pattern in group",
            Self::PrematureEndOfCharClass => "premature end of char-class",
            Self::EmptyCharClass => "empty char-class",
            Self::EmptyRangeInCharClass => "empty range in char class",
            Self::InvalidRepeatRange => "invalid repeat range",
            Self::TooBigNumberForRepeatRange => "too big number for repeat range",
            Self::UpperSmallerThanLowerInRepeatRange => {
                "upper is smaller than lower in repeat range"
            }
            Self::EmptyGroupName => "group name is empty",
            Self::InvalidCharInGroupName => "invalid char in group name",
            Self::InvalidGroupName => "invalid group name",
            Self::MultiplexDefinedName => "multiplex defined name",
            Self::UndefinedNameReference => "undefined name reference",
            Self::UndefinedGroupReference => "undefined group number reference",
            Self::InvalidBackref => "invalid backref number",
            Self::NeverEndingRecursion => "never ending recursion",
            Self::InvalidCharPropertyName => "invalid character property name",
            Self::UndefinedGroupOption => "undefined group option",
            Self::TooBigWideCharValue => "too big wide-char value",
            Self::InvalidLookBehindPattern => "invalid pattern in look-behind",
            Self::TooManyCaptures => "too many capture groups",
            Self::ProgramTooBig => "compiled pattern is too big",
            Self::ParseDepthLimitOver => "parse depth limit over",
        }
    }
}

/// A pattern compilation failure: what, where, and (when useful) the
/// offending token text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    pub kind: CompileErrorKind,
    /// Byte offset into the pattern where the problem was found.
    pub offset: usize,
    /// Offending token text, e.g. a bad group name.
    pub token: Option<SmolStr>,
}

impl CompileError {
    pub fn new(kind: CompileErrorKind, offset: usize) -> Self {
        CompileError {
            kind,
            offset,
            token: None,
        }
    }

    pub fn with_token(kind: CompileErrorKind, offset: usize, token: &str) -> Self {
        CompileError {
            kind,
            offset,
            token: Some(SmolStr::new(token)),
        }
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.token {
            Some(token) => write!(
                f,
                "{} at offset {}: {}",
                self.kind.message(),
                self.offset,
                token
            ),
            None => write!(f, "{} at offset {}", self.kind.message(), self.offset),
        }
    }
}

/// All failures the engine can report. Resource-limit variants abort one
/// match/search call and leave the Regex itself untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegexError {
    /// Pattern compilation failed.
    Compile(CompileError),
    /// Backtrack stack grew past the configured limit.
    StackLimitOver,
    /// Backtrack retry budget for one match attempt exhausted.
    RetryLimitInMatchOver,
    /// Backtrack retry budget for one search call exhausted.
    RetryLimitInSearchOver,
    /// Subexpression call nesting went past the configured level.
    SubexpCallNestLimitOver,
    /// Total subexpression call count went past the configured limit.
    SubexpCallCountLimitOver,
    /// A RegexSet member was compiled with a different encoding.
    EncodingMismatch,
    /// A RegexSet member was compiled with the find-longest option.
    FindLongestNotAllowed,
    /// Per-pattern parameter count does not equal the pattern count.
    ParamCountMismatch { expected: usize, got: usize },
    /// A byte range lies outside the subject.
    InvalidRange { pos: usize, len: usize },
    /// The Regex was poisoned by a failed recompile and cannot be used.
    RegexInvalidated,
}

impl std::fmt::Display for RegexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegexError::Compile(e) => write!(f, "{}", e),
            RegexError::StackLimitOver => write!(f, "match stack limit over"),
            RegexError::RetryLimitInMatchOver => write!(f, "retry limit in match over"),
            RegexError::RetryLimitInSearchOver => write!(f, "retry limit in search over"),
            RegexError::SubexpCallNestLimitOver => {
                write!(f, "subexp call nest limit over")
            }
            RegexError::SubexpCallCountLimitOver => {
                write!(f, "subexp call count limit over")
            }
            RegexError::EncodingMismatch => write!(f, "encoding mismatch"),
            RegexError::FindLongestNotAllowed => {
                write!(f, "find-longest option is not allowed here")
            }
            RegexError::ParamCountMismatch { expected, got } => {
                write!(f, "parameter count mismatch: expected {}, got {}", expected, got)
            }
            RegexError::InvalidRange { pos, len } => {
                write!(f, "position {} out of range (subject length {})", pos, len)
            }
            RegexError::RegexInvalidated => {
                write!(f, "regex was invalidated by a failed recompile")
            }
        }
    }
}

impl std::error::Error for RegexError {}

impl From<CompileError> for RegexError {
    fn from(e: CompileError) -> Self {
        RegexError::Compile(e)
    }
}
