//! descent: a grammar-driven, scannerless, back-tracking
//! recursive-descent parser engine.
//!
//! The grammar is an in-memory data structure — non-terminals, rules and
//! byte-level terminals — that the engine interprets directly; no code
//! or tables are generated, and there is no separate tokenizer. Semantic
//! values are opaque to the engine and composed through optional hooks
//! on elements and rules (see [`grammar::hooks`]).
//!
//! # Example
//!
//! A decimal number: a repeated digit set whose `add_char` hook folds
//! digits into an accumulator and whose `add_seq` hook lifts the
//! sequence result into the rule result.
//!
//! ```
//! use descent::CharSet;
//! use descent::grammar::{Element, Grammar, Rule};
//!
//! let mut grammar: Grammar<Option<i64>> = Grammar::new();
//! let number = grammar.nonterminal("number");
//! grammar.add_rule(
//!     number,
//!     Rule::new().elem(
//!         Element::set(CharSet::range(b'0', b'9'))
//!             .sequence()
//!             .on_char(|acc: &Option<i64>, b| Some(Some(acc.unwrap_or(0) * 10 + i64::from(b - b'0'))))
//!             .on_add_seq(|_, seq| Some(seq)),
//!     ),
//! );
//!
//! assert_eq!(descent::parse(&grammar, number, "123").unwrap(), Some(123));
//! assert!(descent::parse(&grammar, number, "12a").is_err());
//! ```
//!
//! Direct left recursion is supported through per-non-terminal
//! `recursive` rules ([`grammar::Grammar::add_recursive_rule`]); indirect
//! left recursion does not loop when a cache is attached
//! ([`engine::Parser::packrat`]), because a non-terminal entry is marked
//! failed before its rules are tried.

pub mod engine;
pub mod grammar;

mod value;

pub use descent_core::{CharSet, Interner, Symbol, TextBuffer, TextPos};

pub use engine::{Error, Limits, ParseFailure, Parser, parse};
pub use value::Value;
