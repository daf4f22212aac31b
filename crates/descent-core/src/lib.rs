//! Core data structures for the descent parser engine.
//!
//! Three small, dependency-free building blocks:
//! - [`Interner`] / [`Symbol`]: string interning with O(1) handle comparison
//! - [`CharSet`]: a 256-bit bitmap over byte values
//! - [`TextBuffer`] / [`TextPos`]: a byte cursor with line/column tracking

pub mod charset;
pub mod interner;
pub mod text;

pub use charset::CharSet;
pub use interner::{Interner, Symbol};
pub use text::{TextBuffer, TextPos};
