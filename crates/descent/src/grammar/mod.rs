//! The grammar data model.
//!
//! A grammar is an insertion-ordered dictionary of non-terminals, each
//! holding two ordered lists of alternatives: `normal` rules and
//! `recursive` rules (direct left recursion, stored with the leading
//! self-reference already elided). A rule is an ordered list of
//! elements plus optional semantic hooks; an element is one step of a
//! rule, carrying a kind, four modifier flags, an optional chain rule
//! and its own hooks.
//!
//! Non-terminals reference each other (and themselves) by [`NtId`], a
//! stable index into the dictionary, so the cyclic grammar graph needs
//! no ownership cycles. Groupings and chain rules nest by value: they
//! are trees, not graphs.
//!
//! Everything is constructed programmatically; see the builder methods
//! on [`Grammar`], [`Rule`] and [`Element`]. Element construction
//! defaults to all flags false, all hooks absent, no chain.

pub mod hooks;

pub(crate) mod display;

#[cfg(test)]
mod grammar_tests;

use std::rc::Rc;

use indexmap::IndexMap;

use descent_core::{CharSet, Interner, Symbol, TextPos};

use self::hooks::{
    Add, AddChar, AddSeq, AddSkip, BeginSeq, Condition, EndHook, RecStart, Scan, SetPos,
};
use crate::value::Value;

/// Stable handle to a non-terminal inside one [`Grammar`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NtId(u32);

impl NtId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A named production slot with normal and left-recursive alternatives.
pub struct NonTerminal<V> {
    pub(crate) name: Symbol,
    pub(crate) normal: Vec<Rule<V>>,
    pub(crate) recursive: Vec<Rule<V>>,
}

/// One production alternative: an ordered element list plus hooks.
pub struct Rule<V> {
    pub(crate) elements: Vec<Element<V>>,
    pub(crate) end: Option<EndHook<V>>,
    pub(crate) rec_start: Option<RecStart<V>>,
}

impl<V: Value> Rule<V> {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            end: None,
            rec_start: None,
        }
    }

    /// Append an element to the rule.
    pub fn elem(mut self, element: Element<V>) -> Self {
        self.elements.push(element);
        self
    }

    /// Install the end hook, invoked once every element has matched to
    /// turn the final accumulator into the rule result.
    pub fn end(mut self, f: impl Fn(V) -> Option<V> + 'static) -> Self {
        self.end = Some(Rc::new(f));
        self
    }

    /// Install the left-recursive start hook, invoked before this rule's
    /// elements to seed the accumulator from the already-parsed prefix.
    /// Only meaningful on rules added with
    /// [`Grammar::add_recursive_rule`].
    pub fn on_rec_start(mut self, f: impl Fn(&V) -> Option<V> + 'static) -> Self {
        self.rec_start = Some(Rc::new(f));
        self
    }
}

impl<V: Value> Default for Rule<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// What an element matches.
pub enum ElemKind<V> {
    /// A reference to another (or the same) non-terminal.
    NonTerminal(NtId),
    /// An inline anonymous non-terminal: alternatives embedded as one element.
    Grouping(Vec<Rule<V>>),
    /// A single literal byte.
    Char(u8),
    /// Any byte from a set.
    CharSet(CharSet),
    /// Matches only at the end of the input, consuming nothing.
    End,
    /// A user-supplied scanner over the unconsumed tail.
    Terminal(Scan<V>),
}

/// One step of a rule.
pub struct Element<V> {
    pub(crate) kind: ElemKind<V>,
    pub(crate) optional: bool,
    pub(crate) sequence: bool,
    pub(crate) avoid: bool,
    pub(crate) greedy: bool,
    pub(crate) chain: Option<Box<Rule<V>>>,
    pub(crate) condition: Option<Condition<V>>,
    pub(crate) add_char: Option<AddChar<V>>,
    pub(crate) add: Option<Add<V>>,
    pub(crate) add_skip: Option<AddSkip<V>>,
    pub(crate) begin_seq: Option<BeginSeq<V>>,
    pub(crate) add_seq: Option<AddSeq<V>>,
    pub(crate) set_pos: Option<SetPos<V>>,
}

impl<V: Value> Element<V> {
    fn with_kind(kind: ElemKind<V>) -> Self {
        Self {
            kind,
            optional: false,
            sequence: false,
            avoid: false,
            greedy: false,
            chain: None,
            condition: None,
            add_char: None,
            add: None,
            add_skip: None,
            begin_seq: None,
            add_seq: None,
            set_pos: None,
        }
    }

    /// Reference to a non-terminal.
    pub fn nt(target: NtId) -> Self {
        Self::with_kind(ElemKind::NonTerminal(target))
    }

    /// Inline grouping of alternatives.
    pub fn group(rules: impl IntoIterator<Item = Rule<V>>) -> Self {
        Self::with_kind(ElemKind::Grouping(rules.into_iter().collect()))
    }

    /// A literal byte.
    pub fn ch(c: u8) -> Self {
        Self::with_kind(ElemKind::Char(c))
    }

    /// Any byte from `set`.
    pub fn set(set: CharSet) -> Self {
        Self::with_kind(ElemKind::CharSet(set))
    }

    /// End of input.
    pub fn end() -> Self {
        Self::with_kind(ElemKind::End)
    }

    /// User terminal scan function. The scanner receives the unconsumed
    /// tail and must consume at least one byte to count as a match.
    pub fn terminal(scan: impl Fn(&[u8]) -> Option<(usize, V)> + 'static) -> Self {
        Self::with_kind(ElemKind::Terminal(Rc::new(scan)))
    }

    /// The element may be skipped.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// The element repeats one or more times (zero or more when also
    /// optional).
    pub fn sequence(mut self) -> Self {
        self.sequence = true;
        self
    }

    /// Prefer skipping (or terminating the sequence) over matching.
    pub fn avoid(mut self) -> Self {
        self.avoid = true;
        self
    }

    /// Commit: once taken (and, for a sequence, once extended to its
    /// maximum), never back-track into this element. Overrides `avoid`.
    pub fn greedy(mut self) -> Self {
        self.greedy = true;
        self
    }

    /// Chain rule parsed between successive sequence items, its value
    /// discarded. Implies `sequence`.
    pub fn chain(mut self, rule: Rule<V>) -> Self {
        self.sequence = true;
        self.chain = Some(Box::new(rule));
        self
    }

    /// Condition checked against a matched non-terminal's value.
    pub fn when(mut self, f: impl Fn(&V) -> bool + 'static) -> Self {
        self.condition = Some(Rc::new(f));
        self
    }

    pub fn on_char(mut self, f: impl Fn(&V, u8) -> Option<V> + 'static) -> Self {
        self.add_char = Some(Rc::new(f));
        self
    }

    pub fn on_add(mut self, f: impl Fn(&V, V) -> Option<V> + 'static) -> Self {
        self.add = Some(Rc::new(f));
        self
    }

    pub fn on_skip(mut self, f: impl Fn(&V) -> Option<V> + 'static) -> Self {
        self.add_skip = Some(Rc::new(f));
        self
    }

    pub fn on_begin_seq(mut self, f: impl Fn(&V) -> V + 'static) -> Self {
        self.begin_seq = Some(Rc::new(f));
        self
    }

    pub fn on_add_seq(mut self, f: impl Fn(&V, V) -> Option<V> + 'static) -> Self {
        self.add_seq = Some(Rc::new(f));
        self
    }

    /// Annotate the accumulator with the element's start position.
    pub fn at_pos(mut self, f: impl Fn(&mut V, TextPos) + 'static) -> Self {
        self.set_pos = Some(Rc::new(f));
        self
    }
}

/// The grammar: an insertion-ordered, name-interned dictionary of
/// non-terminals. Rule element lists are fixed once added; the engine
/// only ever reads a grammar.
pub struct Grammar<V> {
    interner: Interner,
    nonterminals: IndexMap<Symbol, NonTerminal<V>>,
}

impl<V: Value> Grammar<V> {
    pub fn new() -> Self {
        Self {
            interner: Interner::new(),
            nonterminals: IndexMap::new(),
        }
    }

    /// Find a non-terminal by name, adding an empty one if absent.
    pub fn nonterminal(&mut self, name: &str) -> NtId {
        let sym = self.interner.intern(name);
        let entry = self.nonterminals.entry(sym);
        let id = NtId(entry.index() as u32);
        entry.or_insert_with(|| NonTerminal {
            name: sym,
            normal: Vec::new(),
            recursive: Vec::new(),
        });
        id
    }

    /// Look up a non-terminal by name without adding it.
    pub fn lookup(&self, name: &str) -> Option<NtId> {
        let sym = self.interner.get(name)?;
        self.nonterminals
            .get_index_of(&sym)
            .map(|i| NtId(i as u32))
    }

    /// Append a rule to the non-terminal's normal alternatives.
    pub fn add_rule(&mut self, nt: NtId, rule: Rule<V>) {
        self.get_mut(nt).normal.push(rule);
    }

    /// Append a rule to the non-terminal's left-recursive alternatives.
    /// The rule is stored with the leading self-reference elided: its
    /// elements describe only what follows the recursion.
    pub fn add_recursive_rule(&mut self, nt: NtId, rule: Rule<V>) {
        self.get_mut(nt).recursive.push(rule);
    }

    pub fn name(&self, nt: NtId) -> &str {
        self.interner.resolve(self.get(nt).name)
    }

    pub fn len(&self) -> usize {
        self.nonterminals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nonterminals.is_empty()
    }

    /// Handles of all non-terminals in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = NtId> {
        (0..self.nonterminals.len() as u32).map(NtId)
    }

    pub(crate) fn get(&self, nt: NtId) -> &NonTerminal<V> {
        self.nonterminals
            .get_index(nt.index())
            .map(|(_, n)| n)
            .expect("NtId does not belong to this grammar")
    }

    fn get_mut(&mut self, nt: NtId) -> &mut NonTerminal<V> {
        self.nonterminals
            .get_index_mut(nt.index())
            .map(|(_, n)| n)
            .expect("NtId does not belong to this grammar")
    }

    pub(crate) fn symbol(&self, nt: NtId) -> Symbol {
        self.get(nt).name
    }

    pub(crate) fn interner(&self) -> &Interner {
        &self.interner
    }
}

impl<V: Value> Default for Grammar<V> {
    fn default() -> Self {
        Self::new()
    }
}
