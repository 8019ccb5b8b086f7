// The backtracking matcher: executes a Program against subject bytes
// with the match required to begin exactly at `start`.

use super::params::MatchParam;
use super::stack::Frame;
use crate::compiler::{Inst, Program};
use crate::error::{RegexError, RegexResult};
use crate::history::CaptureTreeNode;
use crate::limits::INIT_MATCH_STACK_SIZE;
use crate::options::{Options, SearchOptions};

/// Everything a successful match produced. Slot 0 is the whole match.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub len: usize,
    pub slots: Vec<Option<(usize, usize)>>,
    pub history: Option<CaptureTreeNode>,
}

/// Match `program` at exactly `start`. `origin` is the position `\G`
/// asserts (the search start). `retry_in_search` accumulates backtrack
/// retries across the attempts of one search call.
#[allow(clippy::too_many_arguments)]
pub(crate) fn match_at(
    program: &Program,
    subject: &[u8],
    full_begin: usize,
    full_end: usize,
    start: usize,
    origin: usize,
    opts: SearchOptions,
    param: &MatchParam,
    retry_in_search: &mut usize,
) -> RegexResult<Option<MatchOutcome>> {
    let mut exec = Executor {
        program,
        subject,
        full_begin,
        full_end,
        start,
        origin,
        opts,
        param,
        pc: 0,
        pos: start,
        caps_beg: vec![None; program.group_count() as usize + 1],
        caps_end: vec![None; program.group_count() as usize + 1],
        empty_pos: vec![None; program.empty_check_count as usize],
        stack: Vec::with_capacity(INIT_MATCH_STACK_SIZE),
        nest: 0,
        call_count: 0,
        retries: 0,
        retry_in_search,
        best: None,
    };
    exec.run()
}

struct Executor<'a> {
    program: &'a Program,
    subject: &'a [u8],
    full_begin: usize,
    full_end: usize,
    start: usize,
    origin: usize,
    opts: SearchOptions,
    param: &'a MatchParam,
    pc: usize,
    pos: usize,
    /// Capture boundaries indexed by group number (index 0 unused).
    caps_beg: Vec<Option<usize>>,
    caps_end: Vec<Option<usize>>,
    empty_pos: Vec<Option<usize>>,
    stack: Vec<Frame>,
    /// Active subexpression-call nesting level.
    nest: usize,
    call_count: usize,
    retries: usize,
    retry_in_search: &'a mut usize,
    /// Longest outcome so far under FIND_LONGEST.
    best: Option<MatchOutcome>,
}

impl Executor<'_> {
    fn run(&mut self) -> RegexResult<Option<MatchOutcome>> {
        loop {
            let matched = match &self.program.insts[self.pc] {
                Inst::Str(bytes) => {
                    if self.pos + bytes.len() <= self.full_end
                        && self.subject[self.pos..self.pos + bytes.len()] == **bytes
                    {
                        self.pos += bytes.len();
                        self.pc += 1;
                        true
                    } else {
                        false
                    }
                }
                Inst::StrFold(scalars) => {
                    let enc = self.program.encoding();
                    let mut p = self.pos;
                    let mut ok = true;
                    for &fc in scalars.iter() {
                        if p >= self.full_end {
                            ok = false;
                            break;
                        }
                        let (c, len) = enc.decode_at(self.subject, p);
                        if p + len > self.full_end || enc.simple_fold(c) != fc {
                            ok = false;
                            break;
                        }
                        p += len;
                    }
                    if ok {
                        self.pos = p;
                        self.pc += 1;
                    }
                    ok
                }
                Inst::Class { idx, fold } => {
                    let enc = self.program.encoding();
                    if self.pos < self.full_end {
                        let (c, len) = enc.decode_at(self.subject, self.pos);
                        let class = &self.program.classes[*idx as usize];
                        let hit = if *fold {
                            class.matches_fold(c, enc)
                        } else {
                            class.matches(c, enc)
                        };
                        if hit && self.pos + len <= self.full_end {
                            self.pos += len;
                            self.pc += 1;
                            true
                        } else {
                            false
                        }
                    } else {
                        false
                    }
                }
                Inst::AnyChar => {
                    let enc = self.program.encoding();
                    if self.pos < self.full_end {
                        let (c, len) = enc.decode_at(self.subject, self.pos);
                        if !enc.is_newline(c) && self.pos + len <= self.full_end {
                            self.pos += len;
                            self.pc += 1;
                            true
                        } else {
                            false
                        }
                    } else {
                        false
                    }
                }
                Inst::AnyCharMl => {
                    let enc = self.program.encoding();
                    if self.pos < self.full_end {
                        let len = enc.char_len_at(self.subject, self.pos);
                        if self.pos + len <= self.full_end {
                            self.pos += len;
                            self.pc += 1;
                            true
                        } else {
                            false
                        }
                    } else {
                        false
                    }
                }
                Inst::LineBegin => {
                    let at_begin = self.pos == self.full_begin
                        && !self.opts.contains(SearchOptions::NOT_BOL);
                    let after_nl =
                        self.pos > self.full_begin && self.subject[self.pos - 1] == b'\n';
                    self.zero_width(at_begin || after_nl)
                }
                Inst::LineEnd => {
                    let at_end =
                        self.pos == self.full_end && !self.opts.contains(SearchOptions::NOT_EOL);
                    let before_nl = self.pos < self.full_end && self.subject[self.pos] == b'\n';
                    self.zero_width(at_end || before_nl)
                }
                Inst::BufBegin => self.zero_width(
                    self.pos == self.full_begin
                        && !self.opts.contains(SearchOptions::NOT_BEGIN_STRING),
                ),
                Inst::BufEnd => self.zero_width(
                    self.pos == self.full_end
                        && !self.opts.contains(SearchOptions::NOT_END_STRING),
                ),
                Inst::SemiBufEnd => {
                    let ok = !self.opts.contains(SearchOptions::NOT_END_STRING)
                        && (self.pos == self.full_end
                            || (self.pos + 1 == self.full_end
                                && self.subject[self.pos] == b'\n'));
                    self.zero_width(ok)
                }
                Inst::SearchStart => self.zero_width(
                    self.pos == self.origin
                        && !self.opts.contains(SearchOptions::NOT_BEGIN_POSITION),
                ),
                Inst::WordBound => {
                    let b = self.at_word_bound();
                    self.zero_width(b)
                }
                Inst::NotWordBound => {
                    let b = self.at_word_bound();
                    self.zero_width(!b)
                }
                Inst::Backref { group, fold } => self.match_backref(*group, *fold),
                Inst::BackrefMulti { groups, fold } => {
                    let fold = *fold;
                    let picked = groups
                        .iter()
                        .rev()
                        .find(|&&g| {
                            self.caps_beg[g as usize].is_some()
                                && self.caps_end[g as usize].is_some()
                        })
                        .copied();
                    match picked {
                        Some(g) => self.match_backref(g, fold),
                        None => false,
                    }
                }
                Inst::MemStart { group, history } => {
                    let g = *group as usize;
                    let history = *history;
                    self.push(Frame::CapSave {
                        group: *group,
                        beg: self.caps_beg[g],
                        end: self.caps_end[g],
                    })?;
                    self.caps_beg[g] = Some(self.pos);
                    self.caps_end[g] = None;
                    if history {
                        let frame = Frame::HistOpen {
                            group: g as u16,
                            pos: self.pos,
                        };
                        self.push(frame)?;
                    }
                    self.pc += 1;
                    true
                }
                Inst::MemEnd { group, history } => {
                    let g = *group as usize;
                    let history = *history;
                    self.push(Frame::CapSave {
                        group: *group,
                        beg: self.caps_beg[g],
                        end: self.caps_end[g],
                    })?;
                    self.caps_end[g] = Some(self.pos);
                    if history {
                        let frame = Frame::HistClose {
                            group: g as u16,
                            beg: self.caps_beg[g].unwrap_or(self.pos),
                            end: self.pos,
                        };
                        self.push(frame)?;
                    }
                    self.pc += 1;
                    true
                }
                Inst::Push { alt } => {
                    let frame = Frame::Alt {
                        pc: *alt,
                        pos: self.pos,
                    };
                    self.push(frame)?;
                    self.pc += 1;
                    true
                }
                Inst::Jump { to } => {
                    self.pc = *to as usize;
                    true
                }
                Inst::EmptyCheckStart { id } => {
                    let i = *id as usize;
                    self.push(Frame::EmptySave {
                        id: *id,
                        prev: self.empty_pos[i],
                    })?;
                    self.empty_pos[i] = Some(self.pos);
                    self.pc += 1;
                    true
                }
                Inst::EmptyCheckEnd { id, out } => {
                    if self.empty_pos[*id as usize] == Some(self.pos) {
                        self.pc = *out as usize;
                    } else {
                        self.pc += 1;
                    }
                    true
                }
                Inst::AtomicStart => {
                    self.push(Frame::AtomicMark)?;
                    self.pc += 1;
                    true
                }
                Inst::AtomicEnd => {
                    self.cut_to_atomic_mark();
                    self.pc += 1;
                    true
                }
                Inst::LookStart => {
                    let frame = Frame::LookMark { pos: self.pos };
                    self.push(frame)?;
                    self.pc += 1;
                    true
                }
                Inst::NegLookStart { cont } => {
                    let frame = Frame::NegLook {
                        cont: *cont,
                        pos: self.pos,
                    };
                    self.push(frame)?;
                    self.pc += 1;
                    true
                }
                Inst::LookAheadEnd => {
                    if let Some(mark_pos) = self.cut_to_look_mark() {
                        self.pos = mark_pos;
                        self.pc += 1;
                        true
                    } else {
                        false
                    }
                }
                Inst::LookBehindEnd => {
                    match self.peek_look_mark() {
                        Some(mark_pos) if mark_pos == self.pos => {
                            self.cut_to_look_mark();
                            self.pc += 1;
                            true
                        }
                        // the body landed elsewhere: not a valid way to
                        // satisfy this lookbehind
                        _ => false,
                    }
                }
                Inst::NegLookEnd { behind } => {
                    // the body matched, so the negative assertion failed
                    let applies = if *behind {
                        matches!(self.peek_neg_look_pos(), Some(p) if p == self.pos)
                    } else {
                        true
                    };
                    if applies {
                        self.unwind_neg_look();
                    }
                    false
                }
                Inst::MoveBack { chars } => {
                    let enc = self.program.encoding();
                    match enc.step_back(self.subject, self.full_begin, self.pos, *chars as usize) {
                        Some(p) => {
                            self.pos = p;
                            self.pc += 1;
                            true
                        }
                        None => false,
                    }
                }
                Inst::Call { addr } => {
                    self.call_count += 1;
                    if self.param.subexp_call_max_count > 0
                        && self.call_count > self.param.subexp_call_max_count
                    {
                        return Err(RegexError::SubexpCallCountLimitOver);
                    }
                    if self.nest + 1 > self.param.subexp_call_nest_limit {
                        return Err(RegexError::SubexpCallNestLimitOver);
                    }
                    let frame = Frame::CallFrame { ret: self.pc as u32 + 1 };
                    self.push(frame)?;
                    self.nest += 1;
                    self.pc = *addr as usize;
                    true
                }
                Inst::Return => self.do_return()?,
                Inst::Match => {
                    let len = self.pos - self.start;
                    let find_longest =
                        self.program.options().contains(Options::FIND_LONGEST);
                    let reject_empty =
                        self.program.options().contains(Options::FIND_NOT_EMPTY);
                    if reject_empty && len == 0 {
                        false
                    } else if find_longest {
                        if self.best.as_ref().is_none_or(|b| len > b.len) {
                            self.best = Some(self.build_outcome(len));
                        }
                        false
                    } else {
                        return Ok(Some(self.build_outcome(len)));
                    }
                }
            };

            if !matched && !self.backtrack()? {
                return Ok(self.best.take());
            }
        }
    }

    #[inline]
    fn zero_width(&mut self, ok: bool) -> bool {
        if ok {
            self.pc += 1;
        }
        ok
    }

    fn push(&mut self, frame: Frame) -> RegexResult<()> {
        if self.stack.len() >= self.param.match_stack_limit {
            return Err(RegexError::StackLimitOver);
        }
        self.stack.push(frame);
        Ok(())
    }

    fn at_word_bound(&self) -> bool {
        let enc = self.program.encoding();
        let prev_word = match enc.prev_char_start(self.subject, self.full_begin, self.pos) {
            Some(p) => {
                let (c, _) = enc.decode_at(self.subject, p);
                enc.is_word(c)
            }
            None => false,
        };
        let cur_word = if self.pos < self.full_end {
            let (c, _) = enc.decode_at(self.subject, self.pos);
            enc.is_word(c)
        } else {
            false
        };
        prev_word != cur_word
    }

    fn match_backref(&mut self, group: u16, fold: bool) -> bool {
        let g = group as usize;
        let (beg, end) = match (self.caps_beg[g], self.caps_end[g]) {
            (Some(b), Some(e)) if b <= e => (b, e),
            _ => return false,
        };
        if !fold {
            let len = end - beg;
            if self.pos + len > self.full_end
                || self.subject[self.pos..self.pos + len] != self.subject[beg..end]
            {
                return false;
            }
            self.pos += len;
            self.pc += 1;
            return true;
        }
        // fold compare walks both sides character by character
        let enc = self.program.encoding();
        let mut rp = beg;
        let mut sp = self.pos;
        while rp < end {
            if sp >= self.full_end {
                return false;
            }
            let (rc, rlen) = enc.decode_at(self.subject, rp);
            let (sc, slen) = enc.decode_at(self.subject, sp);
            if enc.simple_fold(rc) != enc.simple_fold(sc) {
                return false;
            }
            rp += rlen;
            sp += slen;
        }
        self.pos = sp;
        self.pc += 1;
        true
    }

    /// Pop frames until a resume point, applying undo records.
    /// `Ok(false)` means the stack is exhausted: no way to match.
    fn backtrack(&mut self) -> RegexResult<bool> {
        loop {
            let frame = match self.stack.pop() {
                Some(f) => f,
                None => return Ok(false),
            };
            match frame {
                Frame::Alt { pc, pos } => {
                    self.count_retry()?;
                    self.pc = pc as usize;
                    self.pos = pos;
                    return Ok(true);
                }
                Frame::NegLook { cont, pos } => {
                    // every way for the body to match failed: the
                    // negative assertion holds
                    self.count_retry()?;
                    self.pc = cont as usize;
                    self.pos = pos;
                    return Ok(true);
                }
                Frame::CapSave { group, beg, end } => {
                    self.caps_beg[group as usize] = beg;
                    self.caps_end[group as usize] = end;
                }
                Frame::EmptySave { id, prev } => {
                    self.empty_pos[id as usize] = prev;
                }
                Frame::CallFrame { .. } => self.nest -= 1,
                Frame::ReturnMark => self.nest += 1,
                Frame::HistOpen { .. }
                | Frame::HistClose { .. }
                | Frame::AtomicMark
                | Frame::LookMark { .. } => {}
            }
        }
    }

    fn count_retry(&mut self) -> RegexResult<()> {
        self.retries += 1;
        if self.param.retry_limit_in_match > 0 && self.retries > self.param.retry_limit_in_match {
            return Err(RegexError::RetryLimitInMatchOver);
        }
        *self.retry_in_search += 1;
        if self.param.retry_limit_in_search > 0
            && *self.retry_in_search > self.param.retry_limit_in_search
        {
            return Err(RegexError::RetryLimitInSearchOver);
        }
        Ok(())
    }

    /// Resume after the body of a call: find the innermost call frame
    /// that has not returned yet.
    fn do_return(&mut self) -> RegexResult<bool> {
        let mut skip = 0usize;
        let mut ret = None;
        for i in (0..self.stack.len()).rev() {
            match &self.stack[i] {
                Frame::ReturnMark => skip += 1,
                Frame::CallFrame { ret: r } => {
                    if skip == 0 {
                        ret = Some(*r);
                        break;
                    }
                    skip -= 1;
                }
                _ => {}
            }
        }
        match ret {
            Some(ret) => {
                self.push(Frame::ReturnMark)?;
                self.nest -= 1;
                self.pc = ret as usize;
                Ok(true)
            }
            // Return without a live call frame: the program is malformed
            None => Ok(false),
        }
    }

    /// Drop resume points pushed since the innermost AtomicMark, keeping
    /// undo records in order. The mark itself is removed.
    fn cut_to_atomic_mark(&mut self) {
        let mut idx = None;
        for i in (0..self.stack.len()).rev() {
            if matches!(self.stack[i], Frame::AtomicMark) {
                idx = Some(i);
                break;
            }
        }
        let Some(idx) = idx else { return };
        self.drop_resume_points_above(idx);
    }

    fn peek_look_mark(&self) -> Option<usize> {
        for i in (0..self.stack.len()).rev() {
            if let Frame::LookMark { pos } = self.stack[i] {
                return Some(pos);
            }
        }
        None
    }

    fn peek_neg_look_pos(&self) -> Option<usize> {
        for i in (0..self.stack.len()).rev() {
            if let Frame::NegLook { pos, .. } = self.stack[i] {
                return Some(pos);
            }
        }
        None
    }

    /// Like `cut_to_atomic_mark` for the innermost LookMark; returns its
    /// saved position.
    fn cut_to_look_mark(&mut self) -> Option<usize> {
        let mut found = None;
        for i in (0..self.stack.len()).rev() {
            if let Frame::LookMark { pos } = self.stack[i] {
                found = Some((i, pos));
                break;
            }
        }
        let (idx, pos) = found?;
        self.drop_resume_points_above(idx);
        Some(pos)
    }

    /// Remove the mark at `idx` and every Alt/NegLook above it, keeping
    /// the undo frames in their original order.
    fn drop_resume_points_above(&mut self, idx: usize) {
        let tail: Vec<Frame> = self.stack.drain(idx..).collect();
        for frame in tail.into_iter().skip(1) {
            match frame {
                Frame::Alt { .. } | Frame::NegLook { .. } => {}
                other => self.stack.push(other),
            }
        }
    }

    /// The negative-lookaround body matched: unwind everything it did,
    /// including the NegLook resume point, then fail outward.
    fn unwind_neg_look(&mut self) {
        while let Some(frame) = self.stack.pop() {
            match frame {
                Frame::NegLook { .. } => break,
                Frame::CapSave { group, beg, end } => {
                    self.caps_beg[group as usize] = beg;
                    self.caps_end[group as usize] = end;
                }
                Frame::EmptySave { id, prev } => {
                    self.empty_pos[id as usize] = prev;
                }
                Frame::CallFrame { .. } => self.nest -= 1,
                Frame::ReturnMark => self.nest += 1,
                _ => {}
            }
        }
    }

    fn build_outcome(&self, len: usize) -> MatchOutcome {
        let group_count = self.program.group_count() as usize;
        let mut slots = vec![None; group_count + 1];
        slots[0] = Some((self.start, self.start + len));
        for g in 1..=group_count {
            if let (Some(b), Some(e)) = (self.caps_beg[g], self.caps_end[g])
                && b <= e
            {
                slots[g] = Some((b, e));
            }
        }
        let history = if self.program.has_history() {
            Some(self.build_history(len))
        } else {
            None
        };
        MatchOutcome {
            len,
            slots,
            history,
        }
    }

    /// Rebuild the capture-history tree from the surviving
    /// HistOpen/HistClose frames, which appear in document order and are
    /// properly nested.
    fn build_history(&self, len: usize) -> CaptureTreeNode {
        let mut root = CaptureTreeNode::new(0, self.start, self.start + len);
        let mut open: Vec<CaptureTreeNode> = Vec::new();
        for frame in &self.stack {
            match frame {
                Frame::HistOpen { group, pos } => {
                    open.push(CaptureTreeNode::new(*group, *pos, *pos));
                }
                Frame::HistClose { group, beg, end } => {
                    let node_idx = open.iter().rposition(|n| n.group == *group);
                    if let Some(i) = node_idx {
                        let mut node = open.remove(i);
                        node.beg = *beg;
                        node.end = *end;
                        match open.last_mut() {
                            Some(parent) => parent.push_child(node),
                            None => root.push_child(node),
                        }
                    }
                }
                _ => {}
            }
        }
        root
    }
}
