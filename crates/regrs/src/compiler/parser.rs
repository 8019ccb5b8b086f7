// Pattern parser: pattern bytes -> Node tree, gated by the Syntax's
// operator set, behavior bits and meta-character table.
//
// Option-dependent choices (case folding, dot/newline, single-line
// anchors, free-spacing) are resolved here so codegen sees plain nodes.

use smol_str::SmolStr;

use super::ast::{AnchorKind, CallTarget, GroupKind, LookKind, Node};
use super::classes::{CharClass, CharProp};
use crate::encoding::Encoding;
use crate::error::{CompileError, CompileErrorKind as EK};
use crate::limits::{MAX_CAPTURE_GROUPS, MAX_PARSE_DEPTH, MAX_REPEAT_NUM};
use crate::options::Options;
use crate::syntax::{MetaCharRole, Syntax, behavior, op};

pub struct ParseOut {
    pub root: Node,
    pub group_count: u16,
    /// Name definitions in pattern order; one name may appear several
    /// times (multiplex names).
    pub names: Vec<(SmolStr, u16)>,
    pub history_groups: Vec<u16>,
}

type PResult<T> = Result<T, CompileError>;

pub fn parse(
    pat: &[u8],
    syntax: &Syntax,
    encoding: Encoding,
    options: Options,
) -> PResult<ParseOut> {
    let named_only = options.contains(Options::DONT_CAPTURE_GROUP)
        || (syntax.behavior(behavior::CAPTURE_ONLY_NAMED_GROUP)
            && !options.contains(Options::CAPTURE_GROUP)
            && has_named_group(pat, syntax));

    let mut parser = Parser {
        pat,
        pos: 0,
        syntax,
        encoding,
        group_count: 0,
        names: Vec::new(),
        history_groups: Vec::new(),
        depth: 0,
        named_only,
    };
    let root = parser.parse_alt(options, false)?;
    if parser.pos < pat.len() {
        // Only an unmatched `)` can stop the top-level parse early.
        return Err(CompileError::new(EK::UnmatchedCloseParen, parser.pos));
    }
    Ok(ParseOut {
        root,
        group_count: parser.group_count,
        names: parser.names,
        history_groups: parser.history_groups,
    })
}

/// Pre-scan for a named-group definition, skipping escapes and classes.
/// Decides the capture-only-named-groups policy before the main parse.
fn has_named_group(pat: &[u8], syntax: &Syntax) -> bool {
    if !syntax.enabled(op::QMARK_NAMED_GROUP) {
        return false;
    }
    let esc = syntax.escape();
    let mut i = 0;
    while i < pat.len() {
        if esc.matches_prefix(&pat[i..]) {
            let skip = esc.as_bytes().map(|s| s.len()).unwrap_or(1);
            i += skip + 1;
            continue;
        }
        match pat[i] {
            b'[' => {
                // skip the class body
                i += 1;
                if i < pat.len() && pat[i] == b'^' {
                    i += 1;
                }
                if i < pat.len() && pat[i] == b']' {
                    i += 1;
                }
                while i < pat.len() && pat[i] != b']' {
                    if esc.matches_prefix(&pat[i..]) {
                        i += 1;
                    }
                    i += 1;
                }
                i += 1;
            }
            b'(' => {
                let rest = &pat[i + 1..];
                if rest.first() == Some(&b'?') {
                    match rest.get(1) {
                        Some(b'<') => {
                            if !matches!(rest.get(2), Some(b'=') | Some(b'!')) {
                                return true;
                            }
                        }
                        Some(b'\'') => return true,
                        Some(b'@') => {
                            if matches!(rest.get(2), Some(b'<') | Some(b'\'')) {
                                return true;
                            }
                        }
                        _ => {}
                    }
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    false
}

struct Parser<'a> {
    pat: &'a [u8],
    pos: usize,
    syntax: &'a Syntax,
    encoding: Encoding,
    group_count: u16,
    names: Vec<(SmolStr, u16)>,
    history_groups: Vec<u16>,
    depth: usize,
    named_only: bool,
}

impl<'a> Parser<'a> {
    #[inline]
    fn rest(&self) -> &'a [u8] {
        &self.pat[self.pos..]
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.pat.get(self.pos).copied()
    }

    #[inline]
    fn at_end(&self) -> bool {
        self.pos >= self.pat.len()
    }

    fn err(&self, kind: EK) -> CompileError {
        CompileError::new(kind, self.pos)
    }

    /// Length of the escape sequence when the input here starts with it.
    fn escape_len(&self) -> Option<usize> {
        let esc = self.syntax.escape();
        if esc.matches_prefix(self.rest()) {
            esc.as_bytes().map(|s| s.len())
        } else {
            None
        }
    }

    /// Byte after the escape sequence, if the input starts with an escape.
    fn escaped_byte(&self) -> Option<(usize, u8)> {
        let len = self.escape_len()?;
        self.pat.get(self.pos + len).map(|&b| (len, b))
    }

    /// True when the input here is an alternation operator; consumes it.
    fn eat_alt(&mut self) -> bool {
        if self.syntax.enabled(op::VBAR_ALT) && self.peek() == Some(b'|') {
            self.pos += 1;
            return true;
        }
        if self.syntax.enabled(op::ESC_VBAR_ALT)
            && let Some((len, b'|')) = self.escaped_byte()
        {
            self.pos += len + 1;
            return true;
        }
        false
    }

    /// True when the input here is a group-close operator (not consumed).
    fn at_group_close(&self) -> Option<usize> {
        if self.syntax.enabled(op::LPAREN_SUBEXP) && self.peek() == Some(b')') {
            return Some(1);
        }
        if self.syntax.enabled(op::ESC_LPAREN_SUBEXP)
            && let Some((len, b')')) = self.escaped_byte()
        {
            return Some(len + 1);
        }
        None
    }

    /// True when the input here is a group-open operator; consumes it.
    fn eat_group_open(&mut self) -> bool {
        if self.syntax.enabled(op::LPAREN_SUBEXP) && self.peek() == Some(b'(') {
            self.pos += 1;
            return true;
        }
        if self.syntax.enabled(op::ESC_LPAREN_SUBEXP)
            && let Some((len, b'(')) = self.escaped_byte()
        {
            self.pos += len + 1;
            return true;
        }
        false
    }

    /// Skip free-spacing whitespace and `#` comments under EXTEND.
    fn skip_extend(&mut self, options: Options) {
        if !options.contains(Options::EXTEND) {
            return;
        }
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else if b == b'#' {
                while let Some(b) = self.peek() {
                    self.pos += 1;
                    if b == b'\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn parse_alt(&mut self, options: Options, in_group: bool) -> PResult<Node> {
        self.depth += 1;
        if self.depth > MAX_PARSE_DEPTH {
            return Err(self.err(EK::ParseDepthLimitOver));
        }
        let mut branches = vec![self.parse_seq(options, in_group)?];
        while self.eat_alt() {
            branches.push(self.parse_seq(options, in_group)?);
        }
        self.depth -= 1;
        Ok(if branches.len() == 1 {
            branches.pop().unwrap_or(Node::Empty)
        } else {
            Node::Alt(branches)
        })
    }

    fn parse_seq(&mut self, options: Options, in_group: bool) -> PResult<Node> {
        // Inline option groups like `(?i)` reshape the options for the
        // rest of this sequence.
        let mut options = options;
        let mut seq: Vec<Node> = Vec::new();
        loop {
            self.skip_extend(options);
            if self.at_end() {
                break;
            }
            // alternation ends the sequence (not consumed here)
            if self.at_alt_token() {
                break;
            }
            if let Some(close_len) = self.at_group_close() {
                if in_group {
                    break;
                }
                if self.syntax.behavior(behavior::ALLOW_UNMATCHED_CLOSE_PAREN) {
                    self.pos += close_len;
                    seq.push(self.literal_from_bytes(b")", options));
                    continue;
                }
                break; // top level reports UnmatchedCloseParen
            }
            let term = self.parse_term(&mut seq, &mut options, in_group)?;
            Node::seq_push(&mut seq, term);
        }
        Ok(Node::from_seq(seq))
    }

    fn at_alt_token(&self) -> bool {
        if self.syntax.enabled(op::VBAR_ALT) && self.peek() == Some(b'|') {
            return true;
        }
        if self.syntax.enabled(op::ESC_VBAR_ALT)
            && matches!(self.escaped_byte(), Some((_, b'|')))
        {
            return true;
        }
        false
    }

    /// Parse one term. Quantifiers apply to the last node already in
    /// `seq` when they appear with no fresh primary (e.g. after a group).
    fn parse_term(
        &mut self,
        seq: &mut Vec<Node>,
        options: &mut Options,
        _in_group: bool,
    ) -> PResult<Node> {
        // a quantifier right here has no fresh primary: its target is the
        // previous sequence node
        let mut node = if self.peek_quantifier(*options)?.is_some() {
            Node::Empty
        } else {
            self.parse_primary(seq, options)?
        };
        loop {
            self.skip_extend(*options);
            match self.peek_quantifier(*options)? {
                Some((min, max, greedy, possessive, consumed)) => {
                    let q_at = self.pos;
                    self.pos += consumed;
                    let target = match std::mem::replace(&mut node, Node::Empty) {
                        Node::Empty => match seq.pop() {
                            Some(prev) => prev,
                            None => {
                                if self
                                    .syntax
                                    .behavior(behavior::REPEAT_OP_WITHOUT_TARGET_IS_LITERAL)
                                {
                                    node = Node::Literal {
                                        bytes: self.pat[q_at..q_at + consumed].to_vec(),
                                        fold: options.contains(Options::IGNORECASE),
                                    };
                                    continue;
                                }
                                return Err(CompileError::new(
                                    EK::TargetOfRepeatOperatorNotSpecified,
                                    q_at,
                                ));
                            }
                        },
                        n => n,
                    };
                    if target.is_anchor() {
                        return Err(CompileError::new(EK::TargetOfRepeatOperatorInvalid, q_at));
                    }
                    node = Node::Repeat {
                        node: Box::new(target),
                        min,
                        max,
                        greedy,
                        possessive,
                    };
                }
                None => break,
            }
        }
        Ok(node)
    }

    /// Look ahead for a quantifier. Returns
    /// `(min, max, greedy, possessive, consumed_bytes)`.
    #[allow(clippy::type_complexity)]
    fn peek_quantifier(
        &mut self,
        _options: Options,
    ) -> PResult<Option<(u32, Option<u32>, bool, bool, usize)>> {
        let (base, mut len): (Option<(u32, Option<u32>)>, usize) = match self.peek() {
            Some(b'*') if self.op_zero_inf() => (Some((0, None)), 1),
            Some(b'+') if self.syntax.enabled(op::PLUS_ONE_INF) => (Some((1, None)), 1),
            Some(b'?') if self.op_zero_one() => (Some((0, Some(1))), 1),
            Some(b'{') if self.syntax.enabled(op::BRACE_INTERVAL) => {
                match self.scan_interval(self.pos + 1)? {
                    Some((min, max, end)) => (Some((min, max)), end - self.pos),
                    None => (None, 0),
                }
            }
            _ => {
                // escaped interval / variable meta quantifiers
                if self.syntax.enabled(op::ESC_BRACE_INTERVAL)
                    && let Some((elen, b'{')) = self.escaped_byte()
                {
                    match self.scan_interval_escaped(self.pos + elen + 1)? {
                        Some((min, max, end)) => (Some((min, max)), end - self.pos),
                        None => (None, 0),
                    }
                } else if self.syntax.enabled(op::VARIABLE_META_CHARACTERS) {
                    let mc = self.syntax.meta_chars();
                    if mc.get(MetaCharRole::ZeroOrMore).matches_prefix(self.rest()) {
                        let l = mc.get(MetaCharRole::ZeroOrMore).as_bytes().map_or(0, |s| s.len());
                        (Some((0, None)), l)
                    } else if mc.get(MetaCharRole::OneOrMore).matches_prefix(self.rest()) {
                        let l = mc.get(MetaCharRole::OneOrMore).as_bytes().map_or(0, |s| s.len());
                        (Some((1, None)), l)
                    } else if mc.get(MetaCharRole::ZeroOrOne).matches_prefix(self.rest()) {
                        let l = mc.get(MetaCharRole::ZeroOrOne).as_bytes().map_or(0, |s| s.len());
                        (Some((0, Some(1))), l)
                    } else {
                        (None, 0)
                    }
                } else {
                    (None, 0)
                }
            }
        };

        let (min, max) = match base {
            Some(mm) => mm,
            None => return Ok(None),
        };

        // greedy / lazy / possessive suffix
        let mut greedy = true;
        let mut possessive = false;
        match self.pat.get(self.pos + len) {
            Some(b'?') if self.syntax.enabled(op::QMARK_NON_GREEDY) => {
                greedy = false;
                len += 1;
            }
            Some(b'+') if self.syntax.enabled(op::PLUS_POSSESSIVE_REPEAT) => {
                possessive = true;
                len += 1;
            }
            _ => {}
        }
        Ok(Some((min, max, greedy, possessive, len)))
    }

    fn op_zero_inf(&self) -> bool {
        self.syntax.enabled(op::ASTERISK_ZERO_INF)
    }

    fn op_zero_one(&self) -> bool {
        self.syntax.enabled(op::QMARK_ZERO_ONE)
    }

    /// Scan `{n,m}` starting just after `{` at `from`. Returns the bounds
    /// and the offset just past `}`, or `None` when malformed and the
    /// syntax allows invalid intervals as literals.
    fn scan_interval(&self, from: usize) -> PResult<Option<(u32, Option<u32>, usize)>> {
        self.scan_interval_at(from, b'}', 1)
    }

    /// Escaped form: terminator is `\}`.
    fn scan_interval_escaped(&self, from: usize) -> PResult<Option<(u32, Option<u32>, usize)>> {
        let elen = self.syntax.escape().as_bytes().map_or(1, |s| s.len());
        self.scan_interval_at(from, b'}', elen + 1)
    }

    fn scan_interval_at(
        &self,
        from: usize,
        close: u8,
        close_len: usize,
    ) -> PResult<Option<(u32, Option<u32>, usize)>> {
        let allow_invalid = self.syntax.behavior(behavior::ALLOW_INVALID_INTERVAL);
        let mut i = from;

        let low_digits_start = i;
        let low = self.scan_decimal(&mut i)?;
        let mut upper: Option<Option<u32>> = None;

        if self.pat.get(i) == Some(&b',') {
            i += 1;
            let up = self.scan_decimal(&mut i)?;
            upper = Some(up);
        }

        let at_close = if close_len == 1 {
            self.pat.get(i) == Some(&close)
        } else {
            // escaped close: escape bytes then `}`
            self.syntax.escape().matches_prefix(&self.pat[i.min(self.pat.len())..])
                && self.pat.get(i + close_len - 1) == Some(&close)
        };

        if !at_close {
            if allow_invalid {
                return Ok(None);
            }
            return Err(CompileError::new(EK::InvalidRepeatRange, from - 1));
        }
        let end = i + close_len;

        let (min, max) = match (low, upper) {
            (Some(n), None) => (n, Some(n)),
            (Some(n), Some(Some(m))) => (n, Some(m)),
            (Some(n), Some(None)) => (n, None),
            (None, Some(up)) => {
                if !self.syntax.behavior(behavior::ALLOW_INTERVAL_LOW_ABBREV) {
                    if allow_invalid {
                        return Ok(None);
                    }
                    return Err(CompileError::new(EK::InvalidRepeatRange, from - 1));
                }
                match up {
                    Some(m) => (0, Some(m)),
                    // `{,}` has neither bound
                    None => {
                        if allow_invalid {
                            return Ok(None);
                        }
                        return Err(CompileError::new(EK::InvalidRepeatRange, from - 1));
                    }
                }
            }
            (None, None) => {
                if allow_invalid {
                    return Ok(None);
                }
                return Err(CompileError::new(EK::InvalidRepeatRange, from - 1));
            }
        };

        if let Some(m) = max
            && m < min
        {
            return Err(CompileError::new(
                EK::UpperSmallerThanLowerInRepeatRange,
                low_digits_start,
            ));
        }
        Ok(Some((min, max, end)))
    }

    /// Scan a decimal number at `*i`, erroring when it exceeds
    /// `MAX_REPEAT_NUM`. `None` when no digits.
    fn scan_decimal(&self, i: &mut usize) -> PResult<Option<u32>> {
        let start = *i;
        let mut value: u64 = 0;
        while let Some(&b) = self.pat.get(*i) {
            if !b.is_ascii_digit() {
                break;
            }
            value = value * 10 + (b - b'0') as u64;
            if value > MAX_REPEAT_NUM as u64 {
                return Err(CompileError::new(EK::TooBigNumberForRepeatRange, start));
            }
            *i += 1;
        }
        if *i == start {
            Ok(None)
        } else {
            Ok(Some(value as u32))
        }
    }

    fn parse_primary(&mut self, seq: &mut Vec<Node>, options: &mut Options) -> PResult<Node> {
        // group open has priority over a bare literal `(`
        let group_open_at = self.pos;
        if self.eat_group_open() {
            return self.parse_group(seq, options, group_open_at);
        }

        if let Some(b) = self.peek() {
            match b {
                b'.' if self.syntax.enabled(op::DOT_ANYCHAR) => {
                    self.pos += 1;
                    return Ok(Node::AnyChar {
                        multiline: options.contains(Options::MULTI_LINE),
                    });
                }
                b'[' if self.syntax.enabled(op::BRACKET_CC) => {
                    self.pos += 1;
                    let class = self.parse_class_body()?;
                    return Ok(Node::Class {
                        class,
                        fold: options.contains(Options::IGNORECASE),
                    });
                }
                b'^' if self.syntax.enabled(op::LINE_ANCHOR) && self.anchor_begin_ok(seq) => {
                    self.pos += 1;
                    return Ok(Node::Anchor(if options.contains(Options::SINGLE_LINE) {
                        AnchorKind::BufBegin
                    } else {
                        AnchorKind::LineBegin
                    }));
                }
                b'$' if self.syntax.enabled(op::LINE_ANCHOR) && self.anchor_end_ok() => {
                    self.pos += 1;
                    return Ok(Node::Anchor(if options.contains(Options::SINGLE_LINE) {
                        AnchorKind::SemiBufEnd
                    } else {
                        AnchorKind::LineEnd
                    }));
                }
                _ => {}
            }
        }

        // meta-character table: any-char and any-char-any-times
        if self.syntax.enabled(op::VARIABLE_META_CHARACTERS) {
            let mc = self.syntax.meta_chars();
            let any = mc.get(MetaCharRole::AnyChar);
            if any.matches_prefix(self.rest()) && any.as_bytes() != Some(b".") {
                self.pos += any.as_bytes().map_or(1, |s| s.len());
                return Ok(Node::AnyChar {
                    multiline: options.contains(Options::MULTI_LINE),
                });
            }
            let anytime = mc.get(MetaCharRole::AnyCharAnyTime);
            if anytime.matches_prefix(self.rest()) {
                self.pos += anytime.as_bytes().map_or(1, |s| s.len());
                return Ok(Node::Repeat {
                    node: Box::new(Node::AnyChar {
                        multiline: options.contains(Options::MULTI_LINE),
                    }),
                    min: 0,
                    max: None,
                    greedy: true,
                    possessive: false,
                });
            }
        }

        if self.escape_len().is_some() {
            return self.parse_escape(*options);
        }

        // plain literal character
        let (_, len) = self.encoding.decode_at(self.pat, self.pos);
        let bytes = self.pat[self.pos..(self.pos + len).min(self.pat.len())].to_vec();
        self.pos += len;
        Ok(Node::Literal {
            bytes,
            fold: options.contains(Options::IGNORECASE),
        })
    }

    /// `^` anchors everywhere under CONTEXT_INDEP_ANCHORS, otherwise only
    /// at the start of a branch.
    fn anchor_begin_ok(&self, seq: &[Node]) -> bool {
        self.syntax.behavior(behavior::CONTEXT_INDEP_ANCHORS) || seq.is_empty()
            || !self.syntax.enabled(op::ESC_LPAREN_SUBEXP)
    }

    /// `$` anchors everywhere under CONTEXT_INDEP_ANCHORS, otherwise only
    /// before a branch end.
    fn anchor_end_ok(&self) -> bool {
        if self.syntax.behavior(behavior::CONTEXT_INDEP_ANCHORS)
            || !self.syntax.enabled(op::ESC_LPAREN_SUBEXP)
        {
            return true;
        }
        let next = self.pos + 1;
        next >= self.pat.len()
            || self.pat.get(next) == Some(&b'|')
            || {
                let save = &self.pat[next..];
                self.syntax.escape().matches_prefix(save)
                    && matches!(
                        save.get(self.syntax.escape().as_bytes().map_or(1, |s| s.len())),
                        Some(b')') | Some(b'|')
                    )
            }
    }

    fn literal_from_bytes(&self, bytes: &[u8], options: Options) -> Node {
        Node::Literal {
            bytes: bytes.to_vec(),
            fold: options.contains(Options::IGNORECASE),
        }
    }

    // ===== escapes =====

    fn parse_escape(&mut self, options: Options) -> PResult<Node> {
        let esc_len = match self.escape_len() {
            Some(l) => l,
            None => return Err(self.err(EK::EndPatternAtEscape)),
        };
        let esc_at = self.pos;
        if self.pos + esc_len >= self.pat.len() {
            self.pos = self.pat.len();
            return Err(CompileError::new(EK::EndPatternAtEscape, esc_at));
        }
        self.pos += esc_len;
        let b = self.pat[self.pos];
        let fold = options.contains(Options::IGNORECASE);

        match b {
            b'1'..=b'9' if self.syntax.enabled(op::DECIMAL_BACKREF) => {
                let at = self.pos;
                let mut i = self.pos;
                let n = self.scan_decimal(&mut i)?.unwrap_or(0);
                self.pos = i;
                if self.named_only {
                    return Err(CompileError::new(EK::InvalidBackref, at));
                }
                Ok(Node::Backref {
                    group: n,
                    fold,
                    offset: at,
                })
            }
            b'0' if self.syntax.enabled(op::ESC_OCTAL3) => {
                self.pos += 1;
                let mut value: u32 = 0;
                let mut count = 0;
                while count < 2
                    && let Some(&d) = self.pat.get(self.pos)
                    && (b'0'..=b'7').contains(&d)
                {
                    value = value * 8 + (d - b'0') as u32;
                    self.pos += 1;
                    count += 1;
                }
                self.literal_from_scalar(value, fold)
            }
            b'A' if self.syntax.enabled(op::ESC_AZ_BUF_ANCHOR) => {
                self.pos += 1;
                Ok(Node::Anchor(AnchorKind::BufBegin))
            }
            b'z' if self.syntax.enabled(op::ESC_AZ_BUF_ANCHOR) => {
                self.pos += 1;
                Ok(Node::Anchor(AnchorKind::BufEnd))
            }
            b'Z' if self.syntax.enabled(op::ESC_CAPITAL_Z_BUF_ANCHOR) => {
                self.pos += 1;
                Ok(Node::Anchor(AnchorKind::SemiBufEnd))
            }
            b'G' if self.syntax.enabled(op::ESC_G_BEGIN_ANCHOR) => {
                self.pos += 1;
                Ok(Node::Anchor(AnchorKind::SearchStart))
            }
            b'b' if self.syntax.enabled(op::ESC_B_WORD_BOUND) => {
                self.pos += 1;
                Ok(Node::Anchor(AnchorKind::WordBound))
            }
            b'B' if self.syntax.enabled(op::ESC_B_WORD_BOUND) => {
                self.pos += 1;
                Ok(Node::Anchor(AnchorKind::NotWordBound))
            }
            b'w' | b'W' if self.syntax.enabled(op::ESC_W_WORD) => {
                self.pos += 1;
                Ok(Node::Class {
                    class: CharClass::from_prop(CharProp::Word, b == b'W'),
                    fold,
                })
            }
            b'd' | b'D' if self.syntax.enabled(op::ESC_D_DIGIT) => {
                self.pos += 1;
                Ok(Node::Class {
                    class: CharClass::from_prop(CharProp::Digit, b == b'D'),
                    fold,
                })
            }
            b's' | b'S' if self.syntax.enabled(op::ESC_S_WHITE_SPACE) => {
                self.pos += 1;
                Ok(Node::Class {
                    class: CharClass::from_prop(CharProp::Space, b == b'S'),
                    fold,
                })
            }
            b'h' | b'H' if self.syntax.enabled(op::ESC_H_XDIGIT) => {
                self.pos += 1;
                Ok(Node::Class {
                    class: CharClass::from_prop(CharProp::XDigit, b == b'H'),
                    fold,
                })
            }
            b'k' if self.syntax.enabled(op::ESC_K_NAMED_BACKREF) => {
                self.pos += 1;
                let at = self.pos;
                let (name, numeric) = self.read_angle_name()?;
                match numeric {
                    Some(n) => Ok(Node::Backref {
                        group: n,
                        fold,
                        offset: at,
                    }),
                    None => Ok(Node::BackrefName {
                        name,
                        fold,
                        offset: at,
                    }),
                }
            }
            b'g' if self.syntax.enabled(op::ESC_G_SUBEXP_CALL) => {
                self.pos += 1;
                let at = self.pos;
                let (name, numeric) = self.read_angle_name()?;
                let target = match numeric {
                    Some(n) => CallTarget::Number(n),
                    None => CallTarget::Name(name),
                };
                Ok(Node::Call { target, offset: at })
            }
            b'p' | b'P' if self.syntax.enabled(op::ESC_P_BRACE_CHAR_PROPERTY) => {
                let negate_outer = b == b'P';
                self.pos += 1;
                let class = self.parse_property(negate_outer)?;
                Ok(Node::Class { class, fold })
            }
            b'Q' if self.syntax.enabled(op::ESC_CAPITAL_Q_QUOTE) => {
                self.pos += 1;
                let mut bytes = Vec::new();
                while !self.at_end() {
                    if let Some((elen, b'E')) = self.escaped_byte() {
                        self.pos += elen + 1;
                        break;
                    }
                    bytes.push(self.pat[self.pos]);
                    self.pos += 1;
                }
                Ok(Node::Literal { bytes, fold })
            }
            b'x' if self.syntax.enabled(op::ESC_X_HEX2) => {
                self.pos += 1;
                if self.peek() == Some(b'{') && self.syntax.enabled(op::ESC_X_BRACE_HEX8) {
                    self.pos += 1;
                    let at = self.pos;
                    let mut value: u64 = 0;
                    let mut digits = 0;
                    while let Some(&d) = self.pat.get(self.pos) {
                        match (d as char).to_digit(16) {
                            Some(v) => {
                                value = value * 16 + v as u64;
                                digits += 1;
                                self.pos += 1;
                                if value > 0x7fff_ffff {
                                    return Err(CompileError::new(EK::TooBigWideCharValue, at));
                                }
                            }
                            None => break,
                        }
                    }
                    if digits == 0 || self.peek() != Some(b'}') {
                        return Err(CompileError::new(EK::EndPatternAtEscape, at));
                    }
                    self.pos += 1;
                    self.literal_from_scalar(value as u32, fold)
                } else {
                    let mut value: u32 = 0;
                    let mut digits = 0;
                    while digits < 2
                        && let Some(&d) = self.pat.get(self.pos)
                        && let Some(v) = (d as char).to_digit(16)
                    {
                        value = value * 16 + v;
                        digits += 1;
                        self.pos += 1;
                    }
                    self.literal_from_scalar(value, fold)
                }
            }
            b'n' | b't' | b'r' | b'f' | b'v' | b'a' | b'e'
                if self.syntax.enabled(op::ESC_CONTROL_CHARS) =>
            {
                self.pos += 1;
                let c = match b {
                    b'n' => 0x0a,
                    b't' => 0x09,
                    b'r' => 0x0d,
                    b'f' => 0x0c,
                    b'v' => 0x0b,
                    b'a' => 0x07,
                    _ => 0x1b,
                };
                Ok(Node::Literal {
                    bytes: vec![c],
                    fold,
                })
            }
            _ => {
                // escaped char matches itself
                let (_, len) = self.encoding.decode_at(self.pat, self.pos);
                let bytes = self.pat[self.pos..(self.pos + len).min(self.pat.len())].to_vec();
                self.pos += len;
                Ok(Node::Literal { bytes, fold })
            }
        }
    }

    /// Encode a scalar as a literal node in the pattern's encoding.
    fn literal_from_scalar(&self, value: u32, fold: bool) -> PResult<Node> {
        let bytes = match self.encoding {
            Encoding::Ascii | Encoding::Latin1 => {
                if value > 0xff {
                    return Err(self.err(EK::TooBigWideCharValue));
                }
                vec![value as u8]
            }
            Encoding::Utf8 => match char::from_u32(value) {
                Some(ch) => {
                    let mut buf = [0u8; 4];
                    ch.encode_utf8(&mut buf).as_bytes().to_vec()
                }
                None => return Err(self.err(EK::TooBigWideCharValue)),
            },
        };
        Ok(Node::Literal { bytes, fold })
    }

    /// Read `<name>` or `'name'`. All-digit names resolve numerically.
    fn read_angle_name(&mut self) -> PResult<(SmolStr, Option<u32>)> {
        let term = match self.peek() {
            Some(b'<') => b'>',
            Some(b'\'') => b'\'',
            _ => return Err(self.err(EK::InvalidGroupName)),
        };
        self.pos += 1;
        let (name, _) = self.read_name_until(term)?;
        if name.bytes().all(|b| b.is_ascii_digit()) && !name.is_empty() {
            let mut i = 0usize;
            let mut value: u32 = 0;
            let bytes = name.as_bytes();
            while i < bytes.len() {
                value = value.saturating_mul(10).saturating_add((bytes[i] - b'0') as u32);
                i += 1;
            }
            return Ok((name, Some(value)));
        }
        Ok((name, None))
    }

    /// Read a group name up to `term`, validating its characters.
    fn read_name_until(&mut self, term: u8) -> PResult<(SmolStr, usize)> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b == term {
                let raw = &self.pat[start..self.pos];
                self.pos += 1;
                if raw.is_empty() {
                    return Err(CompileError::new(EK::EmptyGroupName, start));
                }
                let all_digits = raw.iter().all(|b| b.is_ascii_digit());
                if !all_digits {
                    if raw[0].is_ascii_digit() {
                        return Err(CompileError::with_token(
                            EK::InvalidGroupName,
                            start,
                            &String::from_utf8_lossy(raw),
                        ));
                    }
                    for &c in raw {
                        if !(c.is_ascii_alphanumeric() || c == b'_') {
                            return Err(CompileError::with_token(
                                EK::InvalidCharInGroupName,
                                start,
                                &String::from_utf8_lossy(raw),
                            ));
                        }
                    }
                }
                return Ok((SmolStr::new(String::from_utf8_lossy(raw)), start));
            }
            self.pos += 1;
        }
        Err(CompileError::new(EK::EndPatternInGroup, start))
    }

    /// `\p{Name}` / `\p{^Name}`. `self.pos` is at `p`/`P`'s position + 1
    /// only after the caller consumed it; here it points at `{`.
    fn parse_property(&mut self, negate_outer: bool) -> PResult<CharClass> {
        if self.peek() != Some(b'{') {
            return Err(self.err(EK::InvalidCharPropertyName));
        }
        self.pos += 1;
        let start = self.pos;
        let mut negate_inner = false;
        if self.peek() == Some(b'^') {
            negate_inner = true;
            self.pos += 1;
        }
        let name_start = self.pos;
        while let Some(b) = self.peek() {
            if b == b'}' {
                let raw = &self.pat[name_start..self.pos];
                self.pos += 1;
                let name = String::from_utf8_lossy(raw);
                let prop = CharProp::by_name(&name).ok_or_else(|| {
                    CompileError::with_token(EK::InvalidCharPropertyName, start, &name)
                })?;
                return Ok(CharClass::from_prop(prop, negate_outer != negate_inner));
            }
            self.pos += 1;
        }
        Err(CompileError::new(EK::InvalidCharPropertyName, start))
    }

    // ===== groups =====

    fn parse_group(
        &mut self,
        seq: &mut Vec<Node>,
        options: &mut Options,
        open_at: usize,
    ) -> PResult<Node> {
        let _ = seq;
        if self.peek() == Some(b'?') && self.qmark_groups_enabled() {
            self.pos += 1;
            let b = match self.peek() {
                Some(b) => b,
                None => return Err(CompileError::new(EK::EndPatternInGroup, open_at)),
            };
            match b {
                b':' if self.syntax.enabled(op::QMARK_NON_CAPTURE_GROUP) => {
                    self.pos += 1;
                    let body = self.parse_alt(*options, true)?;
                    self.expect_group_close(open_at)?;
                    Ok(Node::Group {
                        kind: GroupKind::NonCapture,
                        node: Box::new(body),
                    })
                }
                b'>' if self.syntax.enabled(op::QMARK_ATOMIC_GROUP) => {
                    self.pos += 1;
                    let body = self.parse_alt(*options, true)?;
                    self.expect_group_close(open_at)?;
                    Ok(Node::Group {
                        kind: GroupKind::Atomic,
                        node: Box::new(body),
                    })
                }
                b'=' | b'!' if self.syntax.enabled(op::QMARK_LOOKAHEAD) => {
                    self.pos += 1;
                    let kind = if b == b'=' {
                        LookKind::Ahead
                    } else {
                        LookKind::AheadNeg
                    };
                    let body = self.parse_alt(*options, true)?;
                    self.expect_group_close(open_at)?;
                    Ok(Node::Look {
                        kind,
                        node: Box::new(body),
                        offset: open_at,
                    })
                }
                b'<' => {
                    match self.pat.get(self.pos + 1) {
                        Some(&n) if (n == b'=' || n == b'!')
                            && self.syntax.enabled(op::QMARK_LOOKBEHIND) =>
                        {
                            self.pos += 2;
                            let kind = if n == b'=' {
                                LookKind::Behind
                            } else {
                                LookKind::BehindNeg
                            };
                            let body = self.parse_alt(*options, true)?;
                            self.expect_group_close(open_at)?;
                            Ok(Node::Look {
                                kind,
                                node: Box::new(body),
                                offset: open_at,
                            })
                        }
                        _ if self.syntax.enabled(op::QMARK_NAMED_GROUP) => {
                            self.pos += 1;
                            let (name, _) = self.read_name_until(b'>')?;
                            self.named_capture_group(name, false, options, open_at)
                        }
                        _ => Err(CompileError::new(EK::UndefinedGroupOption, self.pos)),
                    }
                }
                b'\'' if self.syntax.enabled(op::QMARK_NAMED_GROUP) => {
                    self.pos += 1;
                    let (name, _) = self.read_name_until(b'\'')?;
                    self.named_capture_group(name, false, options, open_at)
                }
                b'@' if self.syntax.enabled(op::ATMARK_CAPTURE_HISTORY) => {
                    self.pos += 1;
                    match self.peek() {
                        Some(b'<') => {
                            self.pos += 1;
                            let (name, _) = self.read_name_until(b'>')?;
                            self.named_capture_group(name, true, options, open_at)
                        }
                        Some(b'\'') => {
                            self.pos += 1;
                            let (name, _) = self.read_name_until(b'\'')?;
                            self.named_capture_group(name, true, options, open_at)
                        }
                        _ => self.capture_group(None, true, options, open_at),
                    }
                }
                b'#' if self.syntax.enabled(op::QMARK_NON_CAPTURE_GROUP) => {
                    // (?#...) comment
                    while let Some(b) = self.peek() {
                        self.pos += 1;
                        if b == b')' {
                            return Ok(Node::Empty);
                        }
                    }
                    Err(CompileError::new(EK::EndPatternInGroup, open_at))
                }
                b'i' | b'm' | b'x' | b'-' if self.syntax.enabled(op::QMARK_OPTION_GROUP) => {
                    self.parse_option_group(options, open_at)
                }
                _ => Err(CompileError::new(EK::UndefinedGroupOption, self.pos)),
            }
        } else {
            // plain group
            if self.named_only {
                let body = self.parse_alt(*options, true)?;
                self.expect_group_close(open_at)?;
                Ok(Node::Group {
                    kind: GroupKind::NonCapture,
                    node: Box::new(body),
                })
            } else {
                self.capture_group(None, false, options, open_at)
            }
        }
    }

    fn qmark_groups_enabled(&self) -> bool {
        self.syntax.enabled(op::QMARK_NON_CAPTURE_GROUP)
            || self.syntax.enabled(op::QMARK_NAMED_GROUP)
            || self.syntax.enabled(op::QMARK_LOOKAHEAD)
            || self.syntax.enabled(op::QMARK_OPTION_GROUP)
    }

    fn named_capture_group(
        &mut self,
        name: SmolStr,
        history: bool,
        options: &mut Options,
        open_at: usize,
    ) -> PResult<Node> {
        // all-digit "names" are only meaningful as \k<1>/\g<1> references
        if name.as_bytes().first().is_some_and(|b| b.is_ascii_digit()) {
            return Err(CompileError::with_token(
                EK::InvalidGroupName,
                open_at,
                &name,
            ));
        }
        if self.syntax.behavior(behavior::FORBID_MULTIPLEX_DEFINED_NAME)
            && self.names.iter().any(|(n, _)| *n == name)
        {
            return Err(CompileError::with_token(
                EK::MultiplexDefinedName,
                open_at,
                &name,
            ));
        }
        self.capture_group(Some(name), history, options, open_at)
    }

    fn capture_group(
        &mut self,
        name: Option<SmolStr>,
        history: bool,
        options: &mut Options,
        open_at: usize,
    ) -> PResult<Node> {
        if self.group_count as usize >= MAX_CAPTURE_GROUPS {
            return Err(CompileError::new(EK::TooManyCaptures, open_at));
        }
        self.group_count += 1;
        let group = self.group_count;
        if let Some(name) = name {
            self.names.push((name, group));
        }
        if history {
            self.history_groups.push(group);
        }
        let body = self.parse_alt(*options, true)?;
        self.expect_group_close(open_at)?;
        Ok(Node::Group {
            kind: GroupKind::Capture { group, history },
            node: Box::new(body),
        })
    }

    /// `(?imx-imx)` or `(?imx-imx:...)`.
    fn parse_option_group(&mut self, options: &mut Options, open_at: usize) -> PResult<Node> {
        let mut on = Options::NONE;
        let mut off = Options::NONE;
        let mut negating = false;
        loop {
            let b = match self.peek() {
                Some(b) => b,
                None => return Err(CompileError::new(EK::EndPatternInGroup, open_at)),
            };
            let flag = match b {
                b'i' => Some(Options::IGNORECASE),
                b'm' => Some(Options::MULTI_LINE),
                b'x' => Some(Options::EXTEND),
                _ => None,
            };
            match (flag, b) {
                (Some(f), _) => {
                    if negating {
                        off |= f;
                    } else {
                        on |= f;
                    }
                    self.pos += 1;
                }
                (None, b'-') if !negating => {
                    negating = true;
                    self.pos += 1;
                }
                (None, b')') => {
                    self.pos += 1;
                    *options = Options((options.0 | on.0) & !off.0);
                    return Ok(Node::Empty);
                }
                (None, b':') => {
                    self.pos += 1;
                    let inner = Options((options.0 | on.0) & !off.0);
                    let body = self.parse_alt(inner, true)?;
                    self.expect_group_close(open_at)?;
                    return Ok(Node::Group {
                        kind: GroupKind::NonCapture,
                        node: Box::new(body),
                    });
                }
                _ => return Err(self.err(EK::UndefinedGroupOption)),
            }
        }
    }

    fn expect_group_close(&mut self, open_at: usize) -> PResult<()> {
        match self.at_group_close() {
            Some(len) => {
                self.pos += len;
                Ok(())
            }
            None => Err(CompileError::new(EK::EndPatternWithUnmatchedParen, open_at)),
        }
    }

    // ===== character classes =====

    /// Parse a class body after the opening `[` up to and including `]`.
    fn parse_class_body(&mut self) -> PResult<CharClass> {
        self.depth += 1;
        if self.depth > MAX_PARSE_DEPTH {
            return Err(self.err(EK::ParseDepthLimitOver));
        }
        let open_at = self.pos - 1;
        let mut cc = CharClass::new();
        let mut negated = false;
        if self.peek() == Some(b'^') {
            negated = true;
            self.pos += 1;
        }

        if self.peek() == Some(b']') {
            if self.syntax.behavior(behavior::FIRST_RBRACKET_IN_CC_IS_LITERAL) {
                cc.add_char(b']' as u32);
                self.pos += 1;
            } else {
                return Err(CompileError::new(EK::EmptyCharClass, open_at));
            }
        }

        // last single-char member, pending a possible range
        let mut pending: Option<u32> = None;

        loop {
            let b = match self.peek() {
                Some(b) => b,
                None => return Err(CompileError::new(EK::PrematureEndOfCharClass, open_at)),
            };

            if b == b']' {
                self.pos += 1;
                if let Some(c) = pending.take() {
                    cc.add_char(c);
                }
                break;
            }

            // `&&` intersection
            if b == b'&'
                && self.pat.get(self.pos + 1) == Some(&b'&')
                && self.syntax.enabled(op::CCLASS_SET_OP)
            {
                self.pos += 2;
                if let Some(c) = pending.take() {
                    cc.add_char(c);
                }
                let rhs = self.parse_class_tail(open_at)?;
                if negated {
                    cc.negate();
                    self.apply_negated_newline_rule(&mut cc);
                }
                cc.set_intersect(rhs);
                self.depth -= 1;
                return Ok(cc);
            }

            // POSIX bracket or nested class
            if b == b'[' {
                if self.syntax.enabled(op::POSIX_BRACKET)
                    && self.pat.get(self.pos + 1) == Some(&b':')
                    && let Some(prop_cc) = self.try_posix_bracket()?
                {
                    if let Some(c) = pending.take() {
                        cc.add_char(c);
                    }
                    cc.union(&prop_cc);
                    continue;
                }
                if self.syntax.enabled(op::CCLASS_SET_OP) {
                    if let Some(c) = pending.take() {
                        cc.add_char(c);
                    }
                    self.pos += 1;
                    let nested = self.parse_class_body()?;
                    if nested.is_plain() {
                        cc.union(&nested);
                    } else {
                        cc.add_sub(nested);
                    }
                    continue;
                }
            }

            // escape inside class
            if self.escape_len().is_some() {
                if !self.syntax.behavior(behavior::BACKSLASH_ESCAPE_IN_CC) {
                    // escape byte is an ordinary member
                    if let Some(c) = pending.take() {
                        cc.add_char(c);
                    }
                    pending = Some(b as u32);
                    self.pos += 1;
                    continue;
                }
                match self.parse_class_escape()? {
                    ClassMember::Char(c) => {
                        pending = self.member_char(&mut cc, pending, c)?;
                    }
                    ClassMember::Prop(prop, neg) => {
                        if let Some(c) = pending.take() {
                            cc.add_char(c);
                        }
                        cc.add_prop(prop, neg);
                    }
                }
                continue;
            }

            // plain member char
            let (c, len) = self.encoding.decode_at(self.pat, self.pos);
            self.pos += len;
            pending = self.member_char(&mut cc, pending, c)?;
        }

        if negated {
            cc.negate();
            self.apply_negated_newline_rule(&mut cc);
        }
        self.depth -= 1;
        Ok(cc)
    }

    /// The operand after `&&`, running to the closing `]` of the current
    /// class (which it consumes). A further `&&` chains another
    /// intersection.
    fn parse_class_tail(&mut self, open_at: usize) -> PResult<CharClass> {
        let mut cc = CharClass::new();
        let mut pending: Option<u32> = None;
        loop {
            let b = match self.peek() {
                Some(b) => b,
                None => return Err(CompileError::new(EK::PrematureEndOfCharClass, open_at)),
            };

            if b == b']' {
                self.pos += 1;
                if let Some(c) = pending.take() {
                    cc.add_char(c);
                }
                return Ok(cc);
            }

            if b == b'&' && self.pat.get(self.pos + 1) == Some(&b'&') {
                self.pos += 2;
                if let Some(c) = pending.take() {
                    cc.add_char(c);
                }
                let rhs = self.parse_class_tail(open_at)?;
                cc.set_intersect(rhs);
                return Ok(cc);
            }

            if b == b'[' {
                if self.syntax.enabled(op::POSIX_BRACKET)
                    && self.pat.get(self.pos + 1) == Some(&b':')
                    && let Some(prop_cc) = self.try_posix_bracket()?
                {
                    if let Some(c) = pending.take() {
                        cc.add_char(c);
                    }
                    cc.union(&prop_cc);
                    continue;
                }
                if let Some(c) = pending.take() {
                    cc.add_char(c);
                }
                self.pos += 1;
                let nested = self.parse_class_body()?;
                if nested.is_plain() {
                    cc.union(&nested);
                } else {
                    cc.add_sub(nested);
                }
                continue;
            }

            if self.escape_len().is_some()
                && self.syntax.behavior(behavior::BACKSLASH_ESCAPE_IN_CC)
            {
                match self.parse_class_escape()? {
                    ClassMember::Char(c) => {
                        pending = self.member_char(&mut cc, pending, c)?;
                    }
                    ClassMember::Prop(prop, neg) => {
                        if let Some(c) = pending.take() {
                            cc.add_char(c);
                        }
                        cc.add_prop(prop, neg);
                    }
                }
                continue;
            }

            let (c, len) = self.encoding.decode_at(self.pat, self.pos);
            self.pos += len;
            pending = self.member_char(&mut cc, pending, c)?;
        }
    }

    /// Handle a member char, forming a range when a `-` separates two
    /// single chars.
    fn member_char(
        &mut self,
        cc: &mut CharClass,
        pending: Option<u32>,
        c: u32,
    ) -> PResult<Option<u32>> {
        if c == b'-' as u32
            && let Some(lo) = pending
        {
            // possible range: look at what follows
            match self.peek() {
                Some(b']') | None => {
                    cc.add_char(lo);
                    return Ok(Some(b'-' as u32));
                }
                _ => {
                    let hi = if self.escape_len().is_some()
                        && self.syntax.behavior(behavior::BACKSLASH_ESCAPE_IN_CC)
                    {
                        match self.parse_class_escape()? {
                            ClassMember::Char(hc) => hc,
                            ClassMember::Prop(prop, neg) => {
                                // `[a-\d]`: the dash is a literal member
                                cc.add_char(lo);
                                cc.add_char(b'-' as u32);
                                cc.add_prop(prop, neg);
                                return Ok(None);
                            }
                        }
                    } else {
                        let (hc, len) = self.encoding.decode_at(self.pat, self.pos);
                        self.pos += len;
                        hc
                    };
                    if hi < lo {
                        return Err(CompileError::new(
                            EK::EmptyRangeInCharClass,
                            self.pos.saturating_sub(1),
                        ));
                    }
                    cc.add_range(lo, hi);
                    return Ok(None);
                }
            }
        }
        if let Some(prev) = pending {
            cc.add_char(prev);
        }
        Ok(Some(c))
    }

    /// `[:name:]` / `[:^name:]`; `None` when it is not a POSIX bracket.
    fn try_posix_bracket(&mut self) -> PResult<Option<CharClass>> {
        // self.pos is at '['
        let save = self.pos;
        let mut i = self.pos + 2;
        let mut neg = false;
        if self.pat.get(i) == Some(&b'^') {
            neg = true;
            i += 1;
        }
        let name_start = i;
        while let Some(&b) = self.pat.get(i) {
            if b == b':' {
                if self.pat.get(i + 1) == Some(&b']') {
                    let name = String::from_utf8_lossy(&self.pat[name_start..i]);
                    let prop = CharProp::by_name(&name).ok_or_else(|| {
                        CompileError::with_token(EK::InvalidCharPropertyName, save, &name)
                    })?;
                    self.pos = i + 2;
                    return Ok(Some(CharClass::from_prop(prop, neg)));
                }
                break;
            }
            if !b.is_ascii_alphabetic() {
                break;
            }
            i += 1;
        }
        Ok(None)
    }

    /// Parse an escape inside a character class.
    fn parse_class_escape(&mut self) -> PResult<ClassMember> {
        let esc_len = match self.escape_len() {
            Some(l) => l,
            None => return Err(self.err(EK::EndPatternAtEscape)),
        };
        if self.pos + esc_len >= self.pat.len() {
            self.pos = self.pat.len();
            return Err(self.err(EK::EndPatternAtEscape));
        }
        self.pos += esc_len;
        let b = self.pat[self.pos];
        match b {
            b'w' | b'W' if self.syntax.enabled(op::ESC_W_WORD) => {
                self.pos += 1;
                Ok(ClassMember::Prop(CharProp::Word, b == b'W'))
            }
            b'd' | b'D' if self.syntax.enabled(op::ESC_D_DIGIT) => {
                self.pos += 1;
                Ok(ClassMember::Prop(CharProp::Digit, b == b'D'))
            }
            b's' | b'S' if self.syntax.enabled(op::ESC_S_WHITE_SPACE) => {
                self.pos += 1;
                Ok(ClassMember::Prop(CharProp::Space, b == b'S'))
            }
            b'h' | b'H' if self.syntax.enabled(op::ESC_H_XDIGIT) => {
                self.pos += 1;
                Ok(ClassMember::Prop(CharProp::XDigit, b == b'H'))
            }
            b'n' | b't' | b'r' | b'f' | b'v' | b'a' | b'e'
                if self.syntax.enabled(op::ESC_CONTROL_CHARS) =>
            {
                self.pos += 1;
                Ok(ClassMember::Char(match b {
                    b'n' => 0x0a,
                    b't' => 0x09,
                    b'r' => 0x0d,
                    b'f' => 0x0c,
                    b'v' => 0x0b,
                    b'a' => 0x07,
                    _ => 0x1b,
                }))
            }
            b'x' if self.syntax.enabled(op::ESC_X_HEX2) => {
                self.pos += 1;
                let mut value: u32 = 0;
                let mut digits = 0;
                while digits < 2
                    && let Some(&d) = self.pat.get(self.pos)
                    && let Some(v) = (d as char).to_digit(16)
                {
                    value = value * 16 + v;
                    digits += 1;
                    self.pos += 1;
                }
                Ok(ClassMember::Char(value))
            }
            b'0' if self.syntax.enabled(op::ESC_OCTAL3) => {
                self.pos += 1;
                let mut value: u32 = 0;
                let mut count = 0;
                while count < 2
                    && let Some(&d) = self.pat.get(self.pos)
                    && (b'0'..=b'7').contains(&d)
                {
                    value = value * 8 + (d - b'0') as u32;
                    self.pos += 1;
                    count += 1;
                }
                Ok(ClassMember::Char(value))
            }
            _ => {
                let (c, len) = self.encoding.decode_at(self.pat, self.pos);
                self.pos += len;
                Ok(ClassMember::Char(c))
            }
        }
    }

    fn apply_negated_newline_rule(&self, cc: &mut CharClass) {
        if self.syntax.behavior(behavior::NOT_NEWLINE_IN_NEGATIVE_CC) && cc.is_negated() {
            // adding newline to the positive set excludes it from the
            // negated match
            cc.add_char(b'\n' as u32);
        }
    }
}

/// A single parsed class member.
enum ClassMember {
    Char(u32),
    Prop(CharProp, bool),
}
