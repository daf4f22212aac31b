//! Per-non-terminal activation records for diagnostics.
//!
//! The stack is a reference-counted linked list so the expectation
//! tracker can snapshot the whole stack by cloning one `Rc`. Frames
//! referenced by a snapshot stay alive after the activation pops.

use std::rc::Rc;

use descent_core::{Symbol, TextPos};

/// One activation: which non-terminal was entered, and where.
pub(crate) struct Frame {
    pub nt: Symbol,
    pub at: TextPos,
    pub parent: Option<Rc<Frame>>,
}

/// A snapshot is just the top of the list at some moment.
pub(crate) type FrameSnapshot = Option<Rc<Frame>>;

#[derive(Default)]
pub(crate) struct FrameStack {
    top: FrameSnapshot,
}

impl FrameStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, nt: Symbol, at: TextPos) {
        self.top = Some(Rc::new(Frame {
            nt,
            at,
            parent: self.top.take(),
        }));
    }

    pub fn pop(&mut self) {
        self.top = self.top.take().and_then(|frame| frame.parent.clone());
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        self.top.clone()
    }
}

/// Two snapshots denote the same stack iff they share the same head.
pub(crate) fn same_stack(a: &FrameSnapshot, b: &FrameSnapshot) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => Rc::ptr_eq(x, y),
        _ => false,
    }
}

/// Walk a snapshot innermost-first.
pub(crate) fn trail(snapshot: &FrameSnapshot) -> Vec<(Symbol, TextPos)> {
    let mut out = Vec::new();
    let mut cursor = snapshot;
    while let Some(frame) = cursor {
        out.push((frame.nt, frame.at));
        cursor = &frame.parent;
    }
    out
}
