//! The semantic-value contract.

use std::fmt;

/// Contract the engine requires of semantic values.
///
/// The engine never inspects a value; it only needs to create an empty one
/// (`Default`), duplicate one across back-tracking forks (`Clone`), move
/// one between result slots (plain Rust moves), drop one (`Drop`) and
/// print one for diagnostics (`Debug`). Callers that want shared
/// substructure can use `Rc` inside their value type; nothing is imposed
/// by the engine.
///
/// The trait is blanket-implemented, so any ordinary data type qualifies:
///
/// ```
/// fn assert_value<V: descent::Value>() {}
/// assert_value::<Option<i64>>();
/// assert_value::<String>();
/// assert_value::<Vec<u32>>();
/// ```
pub trait Value: Clone + Default + fmt::Debug + 'static {}

impl<T: Clone + Default + fmt::Debug + 'static> Value for T {}
