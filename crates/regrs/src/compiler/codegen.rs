// AST -> instruction vector. Backreference/call resolution happens here,
// since named targets may be defined after their use sites.

use ahash::{AHashMap, AHashSet};
use smol_str::SmolStr;

use super::ast::{AnchorKind, CallTarget, GroupKind, LookKind, Node};
use super::classes::CharClass;
use super::parser::ParseOut;
use super::program::{Inst, Program, StartAnchor};
use crate::encoding::Encoding;
use crate::error::{CompileError, CompileErrorKind as EK};
use crate::limits::MAX_PROGRAM_SIZE;
use crate::options::Options;

type GResult<T> = Result<T, CompileError>;

pub(crate) fn generate(
    parsed: &ParseOut,
    encoding: Encoding,
    options: Options,
    allow_diff_len_lookbehind: bool,
) -> GResult<Program> {
    let mut names: AHashMap<SmolStr, Vec<u16>> = AHashMap::new();
    for (name, group) in &parsed.names {
        names.entry(name.clone()).or_default().push(*group);
    }
    for indices in names.values_mut() {
        indices.sort_unstable();
    }

    let called = collect_called_groups(&parsed.root, parsed.group_count, &names)?;
    check_recursion(parsed, &names)?;

    let mut g = Gen {
        insts: Vec::new(),
        classes: Vec::new(),
        names: &names,
        group_count: parsed.group_count,
        called,
        group_entry: vec![None; parsed.group_count as usize + 1],
        call_patches: Vec::new(),
        empty_check_count: 0,
        encoding,
        allow_diff_len_lookbehind,
    };
    g.emit(&parsed.root)?;
    g.push(Inst::Match)?;

    // resolve forward subexpression calls
    for (idx, group) in std::mem::take(&mut g.call_patches) {
        match g.group_entry[group as usize] {
            Some(addr) => g.insts[idx] = Inst::Call { addr },
            // collect_called_groups validated targets, so the group body
            // was simply never emitted: impossible for a parsed tree
            None => {
                return Err(CompileError::new(EK::UndefinedGroupReference, 0));
            }
        }
    }

    let Gen {
        insts,
        classes,
        empty_check_count,
        ..
    } = g;

    Ok(Program {
        insts,
        classes,
        group_count: parsed.group_count,
        named_group_count: names.len() as u16,
        history_count: parsed.history_groups.len() as u16,
        names,
        empty_check_count,
        prefix: None,
        first_bytes: None,
        start_anchor: StartAnchor::None,
        options,
        encoding,
    })
}

/// Resolve every `\g<...>` target and return the set of called groups.
fn collect_called_groups(
    root: &Node,
    group_count: u16,
    names: &AHashMap<SmolStr, Vec<u16>>,
) -> GResult<AHashSet<u16>> {
    let mut called = AHashSet::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        match node {
            Node::Call { target, offset } => {
                called.insert(resolve_call(target, *offset, group_count, names)?);
            }
            Node::Seq(items) | Node::Alt(items) => stack.extend(items.iter()),
            Node::Repeat { node, .. } | Node::Group { node, .. } | Node::Look { node, .. } => {
                stack.push(node)
            }
            _ => {}
        }
    }
    Ok(called)
}

fn resolve_call(
    target: &CallTarget,
    offset: usize,
    group_count: u16,
    names: &AHashMap<SmolStr, Vec<u16>>,
) -> GResult<u16> {
    match target {
        CallTarget::Number(n) => {
            if *n == 0 || *n > group_count as u32 {
                Err(CompileError::new(EK::UndefinedGroupReference, offset))
            } else {
                Ok(*n as u16)
            }
        }
        CallTarget::Name(name) => match names.get(name.as_str()) {
            Some(indices) if indices.len() == 1 => Ok(indices[0]),
            Some(_) => Err(CompileError::with_token(
                EK::MultiplexDefinedName,
                offset,
                name,
            )),
            None => Err(CompileError::with_token(
                EK::UndefinedNameReference,
                offset,
                name,
            )),
        },
    }
}

/// Reject call cycles where every alternative of every group on the
/// cycle leads with a call: such a pattern can never consume input
/// before recursing and would only stop at the nest limit.
fn check_recursion(parsed: &ParseOut, names: &AHashMap<SmolStr, Vec<u16>>) -> GResult<()> {
    // group -> body
    let mut bodies: Vec<Option<&Node>> = vec![None; parsed.group_count as usize + 1];
    collect_bodies(&parsed.root, &mut bodies);

    // unconditional leading calls per group
    let mut edges: Vec<Vec<(u16, usize)>> = vec![Vec::new(); parsed.group_count as usize + 1];
    for g in 1..=parsed.group_count as usize {
        if let Some(body) = bodies[g]
            && let Some(calls) = leading_calls(body, parsed.group_count, names)?
        {
            edges[g] = calls;
        }
    }

    for start in 1..=parsed.group_count {
        let mut visiting = vec![false; parsed.group_count as usize + 1];
        let mut stack = vec![start];
        while let Some(g) = stack.pop() {
            if visiting[g as usize] {
                continue;
            }
            visiting[g as usize] = true;
            for &(t, off) in &edges[g as usize] {
                if t == start {
                    return Err(CompileError::new(EK::NeverEndingRecursion, off));
                }
                stack.push(t);
            }
        }
    }
    Ok(())
}

fn collect_bodies<'a>(node: &'a Node, bodies: &mut Vec<Option<&'a Node>>) {
    match node {
        Node::Seq(items) | Node::Alt(items) => {
            for item in items {
                collect_bodies(item, bodies);
            }
        }
        Node::Repeat { node, .. } | Node::Look { node, .. } => collect_bodies(node, bodies),
        Node::Group { kind, node } => {
            if let GroupKind::Capture { group, .. } = kind {
                bodies[*group as usize] = Some(node);
            }
            collect_bodies(node, bodies);
        }
        _ => {}
    }
}

/// The calls a node performs before consuming any input, when every path
/// through it leads with a call. `None` when some path can consume or
/// finish without calling.
fn leading_calls(
    node: &Node,
    group_count: u16,
    names: &AHashMap<SmolStr, Vec<u16>>,
) -> GResult<Option<Vec<(u16, usize)>>> {
    match node {
        Node::Call { target, offset } => {
            let g = resolve_call(target, *offset, group_count, names)?;
            Ok(Some(vec![(g, *offset)]))
        }
        Node::Seq(items) => {
            for item in items {
                match item {
                    // zero-width nodes cannot break the recursion
                    Node::Empty | Node::Anchor(_) | Node::Look { .. } => continue,
                    Node::Repeat { min: 0, .. } => continue,
                    other => return leading_calls(other, group_count, names),
                }
            }
            Ok(None)
        }
        Node::Alt(branches) => {
            let mut all = Vec::new();
            for branch in branches {
                match leading_calls(branch, group_count, names)? {
                    Some(calls) => all.extend(calls),
                    None => return Ok(None),
                }
            }
            Ok(Some(all))
        }
        Node::Group { node, .. } => leading_calls(node, group_count, names),
        Node::Repeat { node, min, .. } => {
            if *min == 0 {
                Ok(None)
            } else {
                leading_calls(node, group_count, names)
            }
        }
        _ => Ok(None),
    }
}

struct Gen<'a> {
    insts: Vec<Inst>,
    classes: Vec<CharClass>,
    names: &'a AHashMap<SmolStr, Vec<u16>>,
    group_count: u16,
    called: AHashSet<u16>,
    group_entry: Vec<Option<u32>>,
    call_patches: Vec<(usize, u16)>,
    empty_check_count: u16,
    encoding: Encoding,
    allow_diff_len_lookbehind: bool,
}

impl Gen<'_> {
    fn push(&mut self, inst: Inst) -> GResult<usize> {
        if self.insts.len() >= MAX_PROGRAM_SIZE {
            return Err(CompileError::new(EK::ProgramTooBig, 0));
        }
        self.insts.push(inst);
        Ok(self.insts.len() - 1)
    }

    #[inline]
    fn here(&self) -> u32 {
        self.insts.len() as u32
    }

    fn emit(&mut self, node: &Node) -> GResult<()> {
        match node {
            Node::Empty => Ok(()),
            Node::Literal { bytes, fold } => {
                if bytes.is_empty() {
                    return Ok(());
                }
                if *fold {
                    let mut scalars = Vec::new();
                    let mut i = 0;
                    while i < bytes.len() {
                        let (c, len) = self.encoding.decode_at(bytes, i);
                        scalars.push(self.encoding.simple_fold(c));
                        i += len;
                    }
                    self.push(Inst::StrFold(scalars.into_boxed_slice()))?;
                } else {
                    self.push(Inst::Str(bytes.clone().into_boxed_slice()))?;
                }
                Ok(())
            }
            Node::Class { class, fold } => {
                let idx = self.classes.len() as u16;
                self.classes.push(class.clone());
                self.push(Inst::Class { idx, fold: *fold })?;
                Ok(())
            }
            Node::AnyChar { multiline } => {
                self.push(if *multiline {
                    Inst::AnyCharMl
                } else {
                    Inst::AnyChar
                })?;
                Ok(())
            }
            Node::Anchor(kind) => {
                self.push(match kind {
                    AnchorKind::LineBegin => Inst::LineBegin,
                    AnchorKind::LineEnd => Inst::LineEnd,
                    AnchorKind::BufBegin => Inst::BufBegin,
                    AnchorKind::BufEnd => Inst::BufEnd,
                    AnchorKind::SemiBufEnd => Inst::SemiBufEnd,
                    AnchorKind::SearchStart => Inst::SearchStart,
                    AnchorKind::WordBound => Inst::WordBound,
                    AnchorKind::NotWordBound => Inst::NotWordBound,
                })?;
                Ok(())
            }
            Node::Seq(items) => {
                for item in items {
                    self.emit(item)?;
                }
                Ok(())
            }
            Node::Alt(branches) => self.emit_alt(branches),
            Node::Repeat {
                node,
                min,
                max,
                greedy,
                possessive,
            } => {
                if *possessive {
                    self.push(Inst::AtomicStart)?;
                    self.emit_repeat(node, *min, *max, *greedy)?;
                    self.push(Inst::AtomicEnd)?;
                    Ok(())
                } else {
                    self.emit_repeat(node, *min, *max, *greedy)
                }
            }
            Node::Group { kind, node } => match kind {
                GroupKind::NonCapture => self.emit(node),
                GroupKind::Atomic => {
                    self.push(Inst::AtomicStart)?;
                    self.emit(node)?;
                    self.push(Inst::AtomicEnd)?;
                    Ok(())
                }
                GroupKind::Capture { group, history } => {
                    self.emit_capture(*group, *history, node)
                }
            },
            Node::Backref {
                group,
                fold,
                offset,
            } => {
                if *group == 0 || *group > self.group_count as u32 {
                    return Err(CompileError::new(EK::InvalidBackref, *offset));
                }
                self.push(Inst::Backref {
                    group: *group as u16,
                    fold: *fold,
                })?;
                Ok(())
            }
            Node::BackrefName { name, fold, offset } => {
                match self.names.get(name.as_str()) {
                    Some(indices) if indices.len() == 1 => {
                        self.push(Inst::Backref {
                            group: indices[0],
                            fold: *fold,
                        })?;
                    }
                    Some(indices) => {
                        let groups = indices.clone().into_boxed_slice();
                        self.push(Inst::BackrefMulti {
                            groups,
                            fold: *fold,
                        })?;
                    }
                    None => {
                        return Err(CompileError::with_token(
                            EK::UndefinedNameReference,
                            *offset,
                            name,
                        ));
                    }
                }
                Ok(())
            }
            Node::Call { target, offset } => {
                let group = resolve_call(target, *offset, self.group_count, self.names)?;
                match self.group_entry[group as usize] {
                    Some(addr) => {
                        self.push(Inst::Call { addr })?;
                    }
                    None => {
                        let idx = self.push(Inst::Call { addr: 0 })?;
                        self.call_patches.push((idx, group));
                    }
                }
                Ok(())
            }
            Node::Look { kind, node, offset } => self.emit_look(*kind, node, *offset),
        }
    }

    fn emit_alt(&mut self, branches: &[Node]) -> GResult<()> {
        let mut jumps = Vec::new();
        for (i, branch) in branches.iter().enumerate() {
            if i + 1 < branches.len() {
                let push_idx = self.push(Inst::Push { alt: 0 })?;
                self.emit(branch)?;
                jumps.push(self.push(Inst::Jump { to: 0 })?);
                let next = self.here();
                self.insts[push_idx] = Inst::Push { alt: next };
            } else {
                self.emit(branch)?;
            }
        }
        let end = self.here();
        for idx in jumps {
            self.insts[idx] = Inst::Jump { to: end };
        }
        Ok(())
    }

    fn emit_repeat(
        &mut self,
        body: &Node,
        min: u32,
        max: Option<u32>,
        greedy: bool,
    ) -> GResult<()> {
        if *body == Node::Empty {
            return Ok(());
        }
        for _ in 0..min {
            self.emit(body)?;
        }
        match max {
            Some(m) => {
                let extra = m - min;
                if extra == 0 {
                    return Ok(());
                }
                if greedy {
                    let mut pushes = Vec::new();
                    for _ in 0..extra {
                        pushes.push(self.push(Inst::Push { alt: 0 })?);
                        self.emit(body)?;
                    }
                    let out = self.here();
                    for idx in pushes {
                        self.insts[idx] = Inst::Push { alt: out };
                    }
                } else {
                    let mut jumps = Vec::new();
                    for _ in 0..extra {
                        let push_idx = self.push(Inst::Push { alt: 0 })?;
                        jumps.push(self.push(Inst::Jump { to: 0 })?);
                        let b = self.here();
                        self.insts[push_idx] = Inst::Push { alt: b };
                        self.emit(body)?;
                    }
                    let out = self.here();
                    for idx in jumps {
                        self.insts[idx] = Inst::Jump { to: out };
                    }
                }
                Ok(())
            }
            None => {
                let id = self.empty_check_count;
                self.empty_check_count += 1;
                if greedy {
                    let loop_top = self.here();
                    let push_idx = self.push(Inst::Push { alt: 0 })?;
                    self.push(Inst::EmptyCheckStart { id })?;
                    self.emit(body)?;
                    let end_idx = self.push(Inst::EmptyCheckEnd { id, out: 0 })?;
                    self.push(Inst::Jump { to: loop_top })?;
                    let out = self.here();
                    self.insts[push_idx] = Inst::Push { alt: out };
                    self.insts[end_idx] = Inst::EmptyCheckEnd { id, out };
                } else {
                    let loop_top = self.here();
                    let push_idx = self.push(Inst::Push { alt: 0 })?;
                    let jump_idx = self.push(Inst::Jump { to: 0 })?;
                    let b = self.here();
                    self.insts[push_idx] = Inst::Push { alt: b };
                    self.push(Inst::EmptyCheckStart { id })?;
                    self.emit(body)?;
                    let end_idx = self.push(Inst::EmptyCheckEnd { id, out: 0 })?;
                    self.push(Inst::Jump { to: loop_top })?;
                    let out = self.here();
                    self.insts[jump_idx] = Inst::Jump { to: out };
                    self.insts[end_idx] = Inst::EmptyCheckEnd { id, out };
                }
                Ok(())
            }
        }
    }

    fn emit_capture(&mut self, group: u16, history: bool, body: &Node) -> GResult<()> {
        if self.called.contains(&group) && self.group_entry[group as usize].is_none() {
            let call_idx = self.push(Inst::Call { addr: 0 })?;
            let jump_idx = self.push(Inst::Jump { to: 0 })?;
            let entry = self.here();
            self.insts[call_idx] = Inst::Call { addr: entry };
            self.group_entry[group as usize] = Some(entry);
            self.push(Inst::MemStart { group, history })?;
            self.emit(body)?;
            self.push(Inst::MemEnd { group, history })?;
            self.push(Inst::Return)?;
            let after = self.here();
            self.insts[jump_idx] = Inst::Jump { to: after };
        } else {
            self.push(Inst::MemStart { group, history })?;
            self.emit(body)?;
            self.push(Inst::MemEnd { group, history })?;
        }
        Ok(())
    }

    fn emit_look(&mut self, kind: LookKind, body: &Node, offset: usize) -> GResult<()> {
        match kind {
            LookKind::Ahead => {
                self.push(Inst::LookStart)?;
                self.emit(body)?;
                self.push(Inst::LookAheadEnd)?;
                Ok(())
            }
            LookKind::AheadNeg => {
                let start_idx = self.push(Inst::NegLookStart { cont: 0 })?;
                self.emit(body)?;
                self.push(Inst::NegLookEnd { behind: false })?;
                let cont = self.here();
                self.insts[start_idx] = Inst::NegLookStart { cont };
                Ok(())
            }
            LookKind::Behind => {
                self.push(Inst::LookStart)?;
                self.emit_behind_body(body, offset)?;
                self.push(Inst::LookBehindEnd)?;
                Ok(())
            }
            LookKind::BehindNeg => {
                let start_idx = self.push(Inst::NegLookStart { cont: 0 })?;
                self.emit_behind_body(body, offset)?;
                self.push(Inst::NegLookEnd { behind: true })?;
                let cont = self.here();
                self.insts[start_idx] = Inst::NegLookStart { cont };
                Ok(())
            }
        }
    }

    /// Lookbehind bodies: each alternative must have a fixed character
    /// length; emit `MoveBack` + body per alternative.
    fn emit_behind_body(&mut self, body: &Node, offset: usize) -> GResult<()> {
        let branches: Vec<&Node> = match body {
            Node::Alt(items) => items.iter().collect(),
            other => vec![other],
        };
        let mut lens = Vec::with_capacity(branches.len());
        for branch in &branches {
            match fixed_char_len(branch, self.encoding) {
                Some(len) => lens.push(len),
                None => {
                    return Err(CompileError::new(EK::InvalidLookBehindPattern, offset));
                }
            }
        }
        if !self.allow_diff_len_lookbehind && lens.windows(2).any(|w| w[0] != w[1]) {
            return Err(CompileError::new(EK::InvalidLookBehindPattern, offset));
        }
        let mut jumps = Vec::new();
        let last = branches.len() - 1;
        for (i, branch) in branches.iter().enumerate() {
            if i < last {
                let push_idx = self.push(Inst::Push { alt: 0 })?;
                self.push(Inst::MoveBack { chars: lens[i] })?;
                self.emit(branch)?;
                jumps.push(self.push(Inst::Jump { to: 0 })?);
                let next = self.here();
                self.insts[push_idx] = Inst::Push { alt: next };
            } else {
                self.push(Inst::MoveBack { chars: lens[i] })?;
                self.emit(branch)?;
            }
        }
        let end = self.here();
        for idx in jumps {
            self.insts[idx] = Inst::Jump { to: end };
        }
        Ok(())
    }
}

/// Character length of a node when it is the same on every path.
fn fixed_char_len(node: &Node, enc: Encoding) -> Option<u32> {
    match node {
        Node::Empty | Node::Anchor(_) | Node::Look { .. } => Some(0),
        Node::Literal { bytes, .. } => {
            let mut n = 0u32;
            let mut i = 0;
            while i < bytes.len() {
                i += enc.char_len_at(bytes, i);
                n += 1;
            }
            Some(n)
        }
        Node::Class { .. } | Node::AnyChar { .. } => Some(1),
        Node::Seq(items) => {
            let mut total = 0u32;
            for item in items {
                total = total.checked_add(fixed_char_len(item, enc)?)?;
            }
            Some(total)
        }
        Node::Alt(branches) => {
            let mut len = None;
            for branch in branches {
                let l = fixed_char_len(branch, enc)?;
                match len {
                    None => len = Some(l),
                    Some(prev) if prev == l => {}
                    Some(_) => return None,
                }
            }
            len
        }
        Node::Repeat {
            node, min, max, ..
        } => {
            if *max == Some(*min) {
                fixed_char_len(node, enc)?.checked_mul(*min)
            } else {
                None
            }
        }
        Node::Group { node, .. } => fixed_char_len(node, enc),
        Node::Backref { .. } | Node::BackrefName { .. } | Node::Call { .. } => None,
    }
}
