//! Informal readback rendering of a grammar, for documentation and
//! debugging. Not a parseable format.
//!
//! Element lists render with literal quoting. Sequence markers: greedy
//! sequences as plain `SEQ`, back-tracking ones as `SEQ BACK_TRACKING`,
//! chains as `CHAIN(...)`. Modifiers append as `OPT` and `AVOID`;
//! end-of-input renders as `<eof>`, user terminals as `<term>`.

use std::fmt::Write;

use super::{ElemKind, Element, Grammar, Rule};
use crate::value::Value;

/// Quote a byte the way a character literal is spelled in a grammar.
pub(crate) fn quote_char(c: u8) -> String {
    match c {
        b'\t' => "'\\t'".to_owned(),
        b'\n' => "'\\n'".to_owned(),
        b'\r' => "'\\r'".to_owned(),
        b'\'' => "'\\''".to_owned(),
        b'\\' => "'\\\\'".to_owned(),
        0x20..=0x7e => format!("'{}'", c as char),
        _ => format!("'\\x{c:02x}'"),
    }
}

impl<V: Value> Grammar<V> {
    /// Render every non-terminal, one block per name, alternatives
    /// indented below it. Left-recursive alternatives carry a `rec:`
    /// prefix (their leading self-reference is elided in storage).
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for nt in self.iter() {
            out.push_str(&self.dump_nonterminal(nt));
        }
        out
    }

    /// Render a single non-terminal block.
    pub fn dump_nonterminal(&self, nt: super::NtId) -> String {
        let nonterminal = self.get(nt);
        let mut out = String::new();
        writeln!(out, "{}:", self.interner().resolve(nonterminal.name)).unwrap();
        for rule in &nonterminal.normal {
            writeln!(out, "  {}", self.rule_text(rule)).unwrap();
        }
        for rule in &nonterminal.recursive {
            writeln!(out, "  rec: {}", self.rule_text(rule)).unwrap();
        }
        out
    }

    fn rule_text(&self, rule: &Rule<V>) -> String {
        if rule.elements.is_empty() {
            return "<empty>".to_owned();
        }
        let parts: Vec<String> = rule.elements.iter().map(|e| self.element_text(e)).collect();
        parts.join(" ")
    }

    fn element_text(&self, element: &Element<V>) -> String {
        let mut out = match &element.kind {
            ElemKind::NonTerminal(target) => self.name(*target).to_owned(),
            ElemKind::Grouping(rules) => {
                let alts: Vec<String> = rules.iter().map(|r| self.rule_text(r)).collect();
                format!("({})", alts.join(" | "))
            }
            ElemKind::Char(c) => quote_char(*c),
            ElemKind::CharSet(set) => set.to_string(),
            ElemKind::End => "<eof>".to_owned(),
            ElemKind::Terminal(_) => "<term>".to_owned(),
        };
        if element.sequence {
            match &element.chain {
                Some(chain) => {
                    write!(out, " CHAIN({})", self.rule_text(chain)).unwrap();
                }
                None => out.push_str(" SEQ"),
            }
            if !element.greedy {
                out.push_str(" BACK_TRACKING");
            }
        }
        if element.optional {
            out.push_str(" OPT");
        }
        if element.avoid {
            out.push_str(" AVOID");
        }
        out
    }
}
