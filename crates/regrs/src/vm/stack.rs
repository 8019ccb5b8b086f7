// Backtrack stack frames. All engine backtracking state lives here, on
// an explicit stack, never on the host call stack.

/// One backtrack-stack entry. `Alt`/`NegLook` are resume points; the
/// `*Save` frames undo state mutations while unwinding; the marks fence
/// stack segments for atomic groups and lookaround; `HistOpen`/`HistClose`
/// survive until match end and yield the capture-history tree.
#[derive(Debug, Clone)]
pub(crate) enum Frame {
    /// Resume at `pc` with `pos` when the path above fails.
    Alt { pc: u32, pos: usize },
    /// Negative lookaround entry: resuming here means the assertion held.
    NegLook { cont: u32, pos: usize },
    /// Undo a capture-slot write.
    CapSave {
        group: u16,
        beg: Option<usize>,
        end: Option<usize>,
    },
    /// Undo an empty-loop guard write.
    EmptySave { id: u16, prev: Option<usize> },
    /// A capture-history group was entered at `pos`.
    HistOpen { group: u16, pos: usize },
    /// A capture-history group was exited, covering `[beg, end)`.
    HistClose { group: u16, beg: usize, end: usize },
    /// A subexpression call is active; `Return` resumes at `ret`.
    CallFrame { ret: u32 },
    /// A call frame above already returned.
    ReturnMark,
    /// Fence for AtomicEnd's alternative cut.
    AtomicMark,
    /// Fence + saved position for positive lookaround.
    LookMark { pos: usize },
}
