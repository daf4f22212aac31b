//! Memoization of per-(position, non-terminal) outcomes.
//!
//! The engine consults a pluggable [`Cache`] strategy around every
//! non-terminal application. Two contracts matter:
//!
//! - A [`Lookup::Success`] answer is reused verbatim: the stored value
//!   is returned and the cursor jumps to the stored end position
//!   without re-parsing.
//! - A [`Lookup::Unknown`] answer (a freshly allocated entry) is
//!   immediately overwritten with `Fail` before the engine descends
//!   into the non-terminal's rules. Any transitive re-entry at the same
//!   position then sees a definite failing answer instead of recursing
//!   forever; on ultimate success the entry is overwritten again.
//!
//! A strategy may also answer [`Lookup::Absent`] to decline tracking a
//! key entirely; the engine then parses uncached (and unprotected).

use descent_core::TextPos;

use crate::grammar::NtId;

/// Answer to a cache probe.
pub enum Lookup<V> {
    /// The strategy does not track this key.
    Absent,
    /// A fresh entry was allocated; its outcome is not yet decided.
    Unknown,
    Fail,
    Success { value: V, next: TextPos },
}

/// Outcome written back after (or before, see module docs) parsing.
pub enum Outcome<V> {
    Fail,
    Success { value: V, next: TextPos },
}

pub trait Cache<V> {
    fn lookup(&mut self, offset: usize, nt: NtId) -> Lookup<V>;
    fn store(&mut self, offset: usize, nt: NtId, outcome: Outcome<V>);
}

enum Entry<V> {
    Unknown,
    Fail,
    Success { value: V, next: TextPos },
}

/// The reference brute-force strategy: one slot per input offset, each
/// holding the list of non-terminals probed there. Everything is kept;
/// nothing is evicted.
pub struct PackratCache<V> {
    slots: Vec<Vec<(NtId, Entry<V>)>>,
}

impl<V> PackratCache<V> {
    /// `input_len` slots plus one for the end-of-input position.
    pub fn new(input_len: usize) -> Self {
        let mut slots = Vec::with_capacity(input_len + 1);
        slots.resize_with(input_len + 1, Vec::new);
        Self { slots }
    }

    fn slot(&mut self, offset: usize) -> &mut Vec<(NtId, Entry<V>)> {
        let last = self.slots.len() - 1;
        &mut self.slots[offset.min(last)]
    }
}

impl<V: Clone> Cache<V> for PackratCache<V> {
    fn lookup(&mut self, offset: usize, nt: NtId) -> Lookup<V> {
        let slot = self.slot(offset);
        match slot.iter().find(|(id, _)| *id == nt) {
            Some((_, Entry::Unknown)) => Lookup::Unknown,
            Some((_, Entry::Fail)) => Lookup::Fail,
            Some((_, Entry::Success { value, next })) => Lookup::Success {
                value: value.clone(),
                next: *next,
            },
            None => {
                slot.push((nt, Entry::Unknown));
                Lookup::Unknown
            }
        }
    }

    fn store(&mut self, offset: usize, nt: NtId, outcome: Outcome<V>) {
        let entry = match outcome {
            Outcome::Fail => Entry::Fail,
            Outcome::Success { value, next } => Entry::Success { value, next },
        };
        let slot = self.slot(offset);
        match slot.iter_mut().find(|(id, _)| *id == nt) {
            Some((_, existing)) => *existing = entry,
            None => slot.push((nt, entry)),
        }
    }
}
