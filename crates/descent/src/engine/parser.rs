//! The recursive-descent engine.
//!
//! One [`Parser`] is one parse session: it owns the cursor, the cache,
//! the expectation tracker and the frame stack, and runs to completion
//! on the caller's thread. The procedures mirror the grammar model:
//!
//! - `parse_nt`: cache probe, normal alternatives in declared order,
//!   then the left-recursive growing loop.
//! - `parse_rule`: one alternative — a committed greedy prefix followed
//!   by the back-tracking tail over the remaining elements.
//! - `parse_seq`: the tail of a sequence element after its first item.
//! - `parse_element`: one occurrence of one element, ignoring its
//!   modifier flags.
//!
//! Failure is non-exceptional: a failing procedure restores the cursor
//! to its entry position and returns `Mismatch`. The only fatal variant
//! is the recursion guard.

use descent_core::{TextBuffer, TextPos};

use crate::grammar::{ElemKind, Element, Grammar, NtId, Rule};
use crate::value::Value;

use super::cache::{Cache, Lookup, Outcome, PackratCache};
use super::error::{Error, ParseFailure};
use super::expect::{Expectation, Expected, ExpectationTracker};
use super::frame::FrameStack;
use super::trace::{NoopTracer, Tracer};

/// Hard limits on a single parse.
#[derive(Clone, Copy, Debug)]
pub struct Limits {
    recursion_limit: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            recursion_limit: 1024,
        }
    }
}

impl Limits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum depth of nested non-terminal activations (default 1024).
    /// Exceeding it is fatal, not back-trackable.
    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn get_recursion_limit(&self) -> u32 {
        self.recursion_limit
    }
}

/// Back-trackable mismatch vs fatal guard trip, threaded internally.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Failure {
    Mismatch,
    Depth,
}

type Parsed<V> = Result<V, Failure>;

/// Turn a mismatch into `None` so callers can try the next choice, while
/// fatal failures keep propagating through `?`.
fn attempt<V>(result: Parsed<V>) -> Result<Option<V>, Failure> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(Failure::Mismatch) => Ok(None),
        Err(fatal) => Err(fatal),
    }
}

/// Convenience wrapper: parse `input` as `start`, requiring the whole
/// input to be consumed.
pub fn parse<V: Value>(grammar: &Grammar<V>, start: NtId, input: &str) -> Result<V, Error> {
    Parser::new(grammar, input).parse(start)
}

/// One parse session over one input.
pub struct Parser<'g, 's, V: Value> {
    grammar: &'g Grammar<V>,
    input: &'s str,
    text: TextBuffer<'s>,
    cache: Option<Box<dyn Cache<V>>>,
    expect: ExpectationTracker,
    frames: FrameStack,
    depth: u32,
    limits: Limits,
}

impl<'g, 's, V: Value> Parser<'g, 's, V> {
    pub fn new(grammar: &'g Grammar<V>, input: &'s str) -> Self {
        Self {
            grammar,
            input,
            text: TextBuffer::new(input),
            cache: None,
            expect: ExpectationTracker::new(),
            frames: FrameStack::new(),
            depth: 0,
            limits: Limits::default(),
        }
    }

    pub fn tab_width(mut self, width: u32) -> Self {
        self.text = TextBuffer::with_tab_width(self.input, width);
        self
    }

    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Attach a memoization strategy.
    pub fn cache(mut self, cache: impl Cache<V> + 'static) -> Self {
        self.cache = Some(Box::new(cache));
        self
    }

    /// Attach the reference brute-force strategy, sized to the input.
    pub fn packrat(self) -> Self {
        let cache = PackratCache::new(self.input.len());
        self.cache(cache)
    }

    /// Parse the input as `start`. Succeeds only if the whole input is
    /// consumed.
    pub fn parse(self, start: NtId) -> Result<V, Error> {
        self.parse_with(start, &mut NoopTracer)
    }

    /// Like [`Parser::parse`], reporting engine events to `tracer`.
    pub fn parse_with<T: Tracer>(mut self, start: NtId, tracer: &mut T) -> Result<V, Error> {
        match self.parse_nt(start, tracer) {
            Ok(value) => {
                if self.text.at_end() {
                    Ok(value)
                } else {
                    // Matched a prefix only; the unconsumed tail is the
                    // failure.
                    self.record_expectation(Expected::End);
                    Err(Error::Parse(self.into_failure()))
                }
            }
            Err(Failure::Mismatch) => Err(Error::Parse(self.into_failure())),
            Err(Failure::Depth) => Err(Error::RecursionLimitExceeded(
                self.limits.get_recursion_limit(),
            )),
        }
    }

    fn into_failure(self) -> ParseFailure {
        ParseFailure {
            pos: self.expect.farthest(),
            expected: self.expectations(),
        }
    }

    /// The expectations recorded at the farthest position so far.
    fn expectations(&self) -> Vec<Expectation> {
        self.expect.expectations(self.grammar)
    }

    fn record_expectation(&mut self, expected: Expected) {
        self.expect
            .record(self.text.save(), self.frames.snapshot(), expected);
    }

    /// Apply a non-terminal at the current position.
    fn parse_nt<T: Tracer>(&mut self, nt: NtId, tracer: &mut T) -> Parsed<V> {
        let grammar = self.grammar;
        let name = grammar.name(nt);
        let start = self.text.save();

        let mut tracked = false;
        if let Some(cache) = self.cache.as_mut() {
            match cache.lookup(start.offset, nt) {
                Lookup::Success { value, next } => {
                    tracer.cache_hit(name, start, true);
                    self.text.restore(next);
                    return Ok(value);
                }
                Lookup::Fail => {
                    tracer.cache_hit(name, start, false);
                    return Err(Failure::Mismatch);
                }
                Lookup::Unknown => {
                    // Pre-mark as failed: a transitive re-entry at this
                    // position must see a definite answer (indirect left
                    // recursion would otherwise never terminate).
                    cache.store(start.offset, nt, Outcome::Fail);
                    tracked = true;
                }
                Lookup::Absent => {}
            }
        }

        if self.depth >= self.limits.get_recursion_limit() {
            return Err(Failure::Depth);
        }
        self.depth += 1;
        self.frames.push(grammar.symbol(nt), start);
        tracer.enter_nonterminal(name, start);

        let result = self.parse_alternatives(nt, name, tracer);

        tracer.leave_nonterminal(name, result.is_ok());
        self.frames.pop();
        self.depth -= 1;

        match result {
            Ok(value) => {
                if tracked && let Some(cache) = self.cache.as_mut() {
                    cache.store(
                        start.offset,
                        nt,
                        Outcome::Success {
                            value: value.clone(),
                            next: self.text.save(),
                        },
                    );
                }
                Ok(value)
            }
            // The cache entry, if tracked, already says Fail.
            Err(failure) => Err(failure),
        }
    }

    fn parse_alternatives<T: Tracer>(
        &mut self,
        nt: NtId,
        name: &str,
        tracer: &mut T,
    ) -> Parsed<V> {
        let grammar = self.grammar;
        let nonterminal = grammar.get(nt);

        let mut current = None;
        for rule in &nonterminal.normal {
            if let Some(value) = attempt(self.parse_rule(&rule.elements, V::default(), rule, tracer))? {
                current = Some(value);
                break;
            }
        }
        let Some(mut current) = current else {
            return Err(Failure::Mismatch);
        };

        // Grow the result through the left-recursive alternatives until
        // none applies. Each recursive rule sees the current result as
        // its prefix; its start hook decides what to seed from it.
        'grow: loop {
            for rule in &nonterminal.recursive {
                let seed = match &rule.rec_start {
                    Some(f) => match f(&current) {
                        Some(seed) => seed,
                        // The hook refused to seed: skip this rule, the
                        // others still get their chance.
                        None => continue,
                    },
                    None => V::default(),
                };
                let before = self.text.offset();
                if let Some(value) = attempt(self.parse_rule(&rule.elements, seed, rule, tracer))? {
                    current = value;
                    tracer.grow_recursive(name);
                    if self.text.offset() == before {
                        // A non-consuming recursive rule would apply
                        // forever; adopt its result once and stop.
                        break 'grow;
                    }
                    continue 'grow;
                }
            }
            break;
        }
        Ok(current)
    }

    /// Parse one alternative (or the remainder of one). Restores the
    /// cursor on any failure path.
    fn parse_rule<T: Tracer>(
        &mut self,
        elements: &[Element<V>],
        acc: V,
        rule: &Rule<V>,
        tracer: &mut T,
    ) -> Parsed<V> {
        let entry = self.text.save();
        let result = self.parse_rule_tail(elements, acc, rule, tracer);
        if result.is_err() {
            self.text.restore(entry);
        }
        result
    }

    fn parse_rule_tail<T: Tracer>(
        &mut self,
        mut elements: &[Element<V>],
        mut acc: V,
        rule: &Rule<V>,
        tracer: &mut T,
    ) -> Parsed<V> {
        // Committed prefix: greedy elements consume as much as they can
        // and are never revisited, even if the tail fails afterwards.
        while let Some(element) = elements.first()
            && element.greedy
        {
            acc = self.parse_greedy(element, acc, tracer)?;
            elements = &elements[1..];
        }

        let Some(element) = elements.first() else {
            // All elements matched: finalize through the end hook.
            return match &rule.end {
                Some(end) => end(acc).ok_or(Failure::Mismatch),
                None => Ok(acc),
            };
        };
        let rest = &elements[1..];

        // Optional-and-avoided: prefer skipping before matching.
        if element.optional && element.avoid {
            let skipped = self.skip_fold(element, &acc).ok_or(Failure::Mismatch)?;
            if let Some(value) = attempt(self.parse_rule(rest, skipped, rule, tracer))? {
                return Ok(value);
            }
        }

        let saved = self.text.save();
        if element.sequence {
            let seed = match &element.begin_seq {
                Some(f) => f(&acc),
                None => V::default(),
            };
            if let Some(first) = attempt(self.parse_element(element, &seed, tracer))? {
                if let Some(value) =
                    attempt(self.parse_seq(element, rest, first, &acc, rule, tracer))?
                {
                    return Ok(value);
                }
            }
            self.text.restore(saved);
        } else {
            if let Some(folded) = attempt(self.parse_element(element, &acc, tracer))? {
                if let Some(value) = attempt(self.parse_rule(rest, folded, rule, tracer))? {
                    return Ok(value);
                }
            }
            self.text.restore(saved);
        }

        // Optional without avoid: matching was preferred and has failed;
        // now try skipping.
        if element.optional && !element.avoid {
            let skipped = self.skip_fold(element, &acc).ok_or(Failure::Mismatch)?;
            if let Some(value) = attempt(self.parse_rule(rest, skipped, rule, tracer))? {
                return Ok(value);
            }
        }

        Err(Failure::Mismatch)
    }

    /// The tail of a sequence element, after its first item matched.
    /// `seq` is the sequence accumulator, `prev` the rule accumulator
    /// from before the sequence.
    fn parse_seq<T: Tracer>(
        &mut self,
        element: &Element<V>,
        rest: &[Element<V>],
        seq: V,
        prev: &V,
        rule: &Rule<V>,
        tracer: &mut T,
    ) -> Parsed<V> {
        // Avoided sequence: try to terminate (fold and parse the rule
        // tail) before extending by another item.
        if element.avoid {
            let folded = self.fold_seq(element, prev, seq.clone()).ok_or(Failure::Mismatch)?;
            if let Some(value) = attempt(self.parse_rule(rest, folded, rule, tracer))? {
                return Ok(value);
            }
        }

        let saved = self.text.save();
        let chain_matched = match &element.chain {
            Some(chain) => {
                // The chain's own value is discarded.
                attempt(self.parse_rule(&chain.elements, V::default(), chain, tracer))?.is_some()
            }
            None => true,
        };
        if chain_matched {
            if let Some(extended) = attempt(self.parse_element(element, &seq, tracer))? {
                if let Some(value) =
                    attempt(self.parse_seq(element, rest, extended, prev, rule, tracer))?
                {
                    return Ok(value);
                }
            }
        }
        self.text.restore(saved);

        if !element.avoid {
            let folded = self.fold_seq(element, prev, seq).ok_or(Failure::Mismatch)?;
            if let Some(value) = attempt(self.parse_rule(rest, folded, rule, tracer))? {
                return Ok(value);
            }
        }

        Err(Failure::Mismatch)
    }

    /// A greedy element: match as much as possible, fold, never revisit.
    /// The avoid flag is ignored here.
    fn parse_greedy<T: Tracer>(
        &mut self,
        element: &Element<V>,
        acc: V,
        tracer: &mut T,
    ) -> Parsed<V> {
        if !element.sequence {
            return match attempt(self.parse_element(element, &acc, tracer))? {
                Some(folded) => Ok(folded),
                None if element.optional => self.skip_fold(element, &acc).ok_or(Failure::Mismatch),
                None => Err(Failure::Mismatch),
            };
        }

        let seed = match &element.begin_seq {
            Some(f) => f(&acc),
            None => V::default(),
        };
        let Some(mut seq) = attempt(self.parse_element(element, &seed, tracer))? else {
            // Not even one item.
            if element.optional {
                return self.skip_fold(element, &acc).ok_or(Failure::Mismatch);
            }
            return Err(Failure::Mismatch);
        };

        loop {
            let saved = self.text.save();
            let chain_matched = match &element.chain {
                Some(chain) => {
                    attempt(self.parse_rule(&chain.elements, V::default(), chain, tracer))?
                        .is_some()
                }
                None => true,
            };
            if !chain_matched {
                self.text.restore(saved);
                break;
            }
            match attempt(self.parse_element(element, &seq, tracer))? {
                Some(extended) => seq = extended,
                None => {
                    self.text.restore(saved);
                    break;
                }
            }
        }

        self.fold_seq(element, &acc, seq).ok_or(Failure::Mismatch)
    }

    /// One occurrence of one element, flags not considered. Restores the
    /// cursor on failure; annotates the folded value with the start
    /// position afterwards.
    fn parse_element<T: Tracer>(
        &mut self,
        element: &Element<V>,
        prev: &V,
        tracer: &mut T,
    ) -> Parsed<V> {
        let saved = self.text.save();
        let mut folded = match &element.kind {
            ElemKind::NonTerminal(target) => {
                let value = self.parse_nt(*target, tracer)?;
                if let Some(condition) = &element.condition
                    && !condition(&value)
                {
                    self.text.restore(saved);
                    return Err(Failure::Mismatch);
                }
                self.fold_add(element, prev, value, saved)?
            }
            ElemKind::Grouping(rules) => {
                let mut matched = None;
                for rule in rules {
                    if let Some(value) =
                        attempt(self.parse_rule(&rule.elements, V::default(), rule, tracer))?
                    {
                        matched = Some(value);
                        break;
                    }
                }
                let Some(value) = matched else {
                    return Err(Failure::Mismatch);
                };
                self.fold_add(element, prev, value, saved)?
            }
            ElemKind::End => {
                if !self.text.at_end() {
                    self.record_expectation(Expected::End);
                    return Err(Failure::Mismatch);
                }
                prev.clone()
            }
            ElemKind::Char(expected) => {
                if self.text.peek() != Some(*expected) {
                    self.record_expectation(Expected::Char(*expected));
                    return Err(Failure::Mismatch);
                }
                self.text.advance();
                self.fold_char(element, prev, *expected, saved)?
            }
            ElemKind::CharSet(set) => {
                let Some(byte) = self.text.peek().filter(|b| set.contains(*b)) else {
                    self.record_expectation(Expected::Set(*set));
                    return Err(Failure::Mismatch);
                };
                self.text.advance();
                self.fold_char(element, prev, byte, saved)?
            }
            ElemKind::Terminal(scan) => match scan(self.text.rest()) {
                // Consuming nothing does not count as a match.
                Some((consumed, value)) if consumed > 0 => {
                    self.text.advance_by(consumed);
                    self.fold_add(element, prev, value, saved)?
                }
                _ => {
                    self.record_expectation(Expected::Terminal);
                    return Err(Failure::Mismatch);
                }
            },
        };

        if let Some(set_pos) = &element.set_pos {
            set_pos(&mut folded, saved);
        }
        Ok(folded)
    }

    /// Fold a matched sub-value via the `add` hook; absent hook keeps
    /// the previous accumulator (the sub-value is discarded).
    fn fold_add(
        &mut self,
        element: &Element<V>,
        prev: &V,
        value: V,
        saved: TextPos,
    ) -> Parsed<V> {
        match &element.add {
            Some(f) => match f(prev, value) {
                Some(folded) => Ok(folded),
                None => {
                    self.text.restore(saved);
                    Err(Failure::Mismatch)
                }
            },
            None => Ok(prev.clone()),
        }
    }

    /// Fold a consumed byte via the `add_char` hook; absent hook keeps
    /// the previous accumulator.
    fn fold_char(
        &mut self,
        element: &Element<V>,
        prev: &V,
        byte: u8,
        saved: TextPos,
    ) -> Parsed<V> {
        match &element.add_char {
            Some(f) => match f(prev, byte) {
                Some(folded) => Ok(folded),
                None => {
                    self.text.restore(saved);
                    Err(Failure::Mismatch)
                }
            },
            None => Ok(prev.clone()),
        }
    }

    /// Account for a skipped optional element: `add_skip`, falling back
    /// to `add` with an empty value, falling back to identity.
    fn skip_fold(&self, element: &Element<V>, prev: &V) -> Option<V> {
        if let Some(f) = &element.add_skip {
            f(prev)
        } else if let Some(f) = &element.add {
            f(prev, V::default())
        } else {
            Some(prev.clone())
        }
    }

    /// Fold a finished sequence accumulator into the rule accumulator;
    /// absent hook keeps the rule accumulator.
    fn fold_seq(&self, element: &Element<V>, prev: &V, seq: V) -> Option<V> {
        match &element.add_seq {
            Some(f) => f(prev, seq),
            None => Some(prev.clone()),
        }
    }
}
