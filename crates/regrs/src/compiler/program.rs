// Compiled matching program: a flat instruction vector plus side tables.

use ahash::AHashMap;
use smol_str::SmolStr;

use super::classes::CharClass;
use crate::encoding::Encoding;
use crate::options::Options;

/// One matching instruction. `u32` operands are instruction addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inst {
    /// Match literal bytes exactly.
    Str(Box<[u8]>),
    /// Match a case-folded scalar sequence.
    StrFold(Box<[u32]>),
    /// Match one character from the class table entry.
    Class { idx: u16, fold: bool },
    /// Any character except newline.
    AnyChar,
    /// Any character, newline included.
    AnyCharMl,
    LineBegin,
    LineEnd,
    BufBegin,
    BufEnd,
    /// Subject end, or just before a final newline (`\Z`).
    SemiBufEnd,
    /// The position the search started from (`\G`).
    SearchStart,
    WordBound,
    NotWordBound,
    /// Match the text a capture group captured.
    Backref { group: u16, fold: bool },
    /// Multiplex-name backref: the most recently matched of `groups`.
    BackrefMulti { groups: Box<[u16]>, fold: bool },
    /// Capture group entry.
    MemStart { group: u16, history: bool },
    /// Capture group exit.
    MemEnd { group: u16, history: bool },
    /// Push a backtrack alternative resuming at `alt`.
    Push { alt: u32 },
    Jump { to: u32 },
    /// Record the position for the empty-loop guard `id`.
    EmptyCheckStart { id: u16 },
    /// Break out to `out` when the loop body consumed nothing.
    EmptyCheckEnd { id: u16, out: u32 },
    AtomicStart,
    /// Discard backtrack alternatives made since the matching AtomicStart.
    AtomicEnd,
    /// Positive lookaround entry: remember the position.
    LookStart,
    /// Negative lookaround entry: `cont` resumes after the construct when
    /// the body cannot match.
    NegLookStart { cont: u32 },
    /// Positive lookahead exit: restore position, cut alternatives.
    LookAheadEnd,
    /// Positive lookbehind exit: the body must have ended exactly at the
    /// remembered position.
    LookBehindEnd,
    /// Negative lookaround exit: the body matched, so the assertion fails.
    /// `behind` additionally requires the body to have ended at the
    /// remembered position.
    NegLookEnd { behind: bool },
    /// Step back `chars` characters (lookbehind entry).
    MoveBack { chars: u32 },
    /// Invoke a group body as a subexpression.
    Call { addr: u32 },
    Return,
    /// Overall success.
    Match,
}

/// Start-position facts the search engine may exploit. Optimization only:
/// results never depend on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartAnchor {
    None,
    /// Match can only begin at the subject start (`\A`).
    Buf,
    /// Match can only begin at a line start (`^`).
    Line,
}

/// A compiled pattern program with its side tables.
#[derive(Debug, Clone)]
pub struct Program {
    pub(crate) insts: Vec<Inst>,
    pub(crate) classes: Vec<CharClass>,
    /// Capture groups, slot 0 excluded.
    pub(crate) group_count: u16,
    /// Distinct group names.
    pub(crate) named_group_count: u16,
    /// Capture-history groups.
    pub(crate) history_count: u16,
    /// name -> ascending group numbers (multiplex names map to several).
    pub(crate) names: AHashMap<SmolStr, Vec<u16>>,
    /// Empty-loop guard slots used by the program.
    pub(crate) empty_check_count: u16,
    /// Required literal prefix, when the program starts with one.
    pub(crate) prefix: Option<Vec<u8>>,
    /// Possible first bytes, when the program cannot match empty and the
    /// head is byte-determinable.
    pub(crate) first_bytes: Option<Box<[bool; 256]>>,
    pub(crate) start_anchor: StartAnchor,
    pub(crate) options: Options,
    pub(crate) encoding: Encoding,
}

impl Program {
    #[inline]
    pub fn group_count(&self) -> u16 {
        self.group_count
    }

    #[inline]
    pub fn named_group_count(&self) -> u16 {
        self.named_group_count
    }

    #[inline]
    pub fn history_count(&self) -> u16 {
        self.history_count
    }

    #[inline]
    pub fn has_history(&self) -> bool {
        self.history_count > 0
    }

    #[inline]
    pub fn options(&self) -> Options {
        self.options
    }

    #[inline]
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn group_numbers_by_name(&self, name: &str) -> Option<&[u16]> {
        self.names.get(name).map(|v| v.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = (&SmolStr, &[u16])> {
        self.names.iter().map(|(k, v)| (k, v.as_slice()))
    }
}
