//! The parsing engine: session object, memoization, diagnostics.

pub mod cache;
pub mod error;
pub mod expect;
pub mod trace;

mod frame;
mod parser;

#[cfg(test)]
mod tests;

pub use cache::{Cache, Lookup, Outcome, PackratCache};
pub use error::{Error, ParseFailure};
pub use expect::{Expectation, Expected};
pub use parser::{Limits, Parser, parse};
pub use trace::{NoopTracer, PrintTracer, Tracer};
