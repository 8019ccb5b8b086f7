// Match-result region: one byte-range slot per capture group.
// Slot 0 is the whole match. An absent slot means the group did not
// participate in the match, which is distinct from an empty range.

use crate::history::CaptureTreeNode;
use crate::vm::MatchOutcome;

/// Capture slots of one match. Reusable across searches via `clear`.
#[derive(Debug, Clone, Default)]
pub struct Region {
    slots: Vec<Option<(usize, usize)>>,
    history: Option<CaptureTreeNode>,
}

impl Region {
    pub fn new() -> Region {
        Region::default()
    }

    /// Number of slots (capture groups + 1 for the whole match).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// `[begin, end)` of slot `i`, or `None` when the group did not
    /// participate (or `i` is out of bounds).
    pub fn range(&self, i: usize) -> Option<(usize, usize)> {
        self.slots.get(i).copied().flatten()
    }

    /// Begin offset of slot `i`.
    pub fn beg(&self, i: usize) -> Option<usize> {
        self.range(i).map(|(b, _)| b)
    }

    /// End offset of slot `i`.
    pub fn end(&self, i: usize) -> Option<usize> {
        self.range(i).map(|(_, e)| e)
    }

    /// Slots in index order; `None` entries are non-participating groups.
    pub fn iter(&self) -> impl Iterator<Item = Option<(usize, usize)>> + '_ {
        self.slots.iter().copied()
    }

    /// The capture-history tree, present only when the pattern used
    /// history groups.
    pub fn history(&self) -> Option<&CaptureTreeNode> {
        self.history.as_ref()
    }

    /// Forget the previous match, keeping the allocation.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.history = None;
    }

    pub(crate) fn fill(&mut self, outcome: &MatchOutcome) {
        self.slots.clear();
        self.slots.extend_from_slice(&outcome.slots);
        self.history = outcome.history.clone();
    }
}
