//! Hook signatures for the value-composition interface.
//!
//! Between elements the engine carries a single accumulator value for the
//! rule parsed so far. Hooks fold each element into that accumulator; the
//! rule's end hook finalizes it. Every hook is optional, and a missing
//! hook has a defined default:
//!
//! | hook        | called                              | default when absent                          |
//! |-------------|-------------------------------------|----------------------------------------------|
//! | `Condition` | after a non-terminal element matches| accept                                       |
//! | `AddChar`   | after a character is consumed       | keep the previous accumulator                |
//! | `Add`       | after a composite element matches   | keep the previous accumulator                |
//! | `AddSkip`   | when an optional element is skipped | `Add` with an empty value, else keep previous|
//! | `BeginSeq`  | before the first item of a sequence | seed with an empty value                     |
//! | `AddSeq`    | when a sequence terminates          | keep the previous accumulator                |
//! | `SetPos`    | after an element succeeds           | no-op                                        |
//! | `EndHook`   | when all elements of a rule matched | result is the final accumulator              |
//! | `RecStart`  | before a left-recursive rule        | discard the prefix, start from empty         |
//!
//! Hooks returning `Option` reject by returning `None`; rejection fails
//! the element locally, with the cursor restored. Within a sequence the
//! accumulator is the sequence's own; `AddChar`/`Add` there fold item
//! *i* onto item *i − 1*, not onto the surrounding rule's value.
//!
//! Hooks are `Rc<dyn Fn…>` so that grammars stay cloneable element-wise
//! and payloads (keyword names, interners, counters) ride along as
//! closure captures. Hooks must not touch the grammar, the cursor or the
//! cache; they see values only.

use std::rc::Rc;

use descent_core::TextPos;

/// Accept or reject a matched element's value.
pub type Condition<V> = Rc<dyn Fn(&V) -> bool>;

/// Fold one consumed byte into the accumulator.
pub type AddChar<V> = Rc<dyn Fn(&V, u8) -> Option<V>>;

/// Fold a matched sub-value (non-terminal, grouping, user terminal) into
/// the accumulator.
pub type Add<V> = Rc<dyn Fn(&V, V) -> Option<V>>;

/// Account for a skipped optional element.
pub type AddSkip<V> = Rc<dyn Fn(&V) -> Option<V>>;

/// Seed the sequence accumulator from the rule accumulator.
pub type BeginSeq<V> = Rc<dyn Fn(&V) -> V>;

/// Fold a finished sequence accumulator back into the rule accumulator.
pub type AddSeq<V> = Rc<dyn Fn(&V, V) -> Option<V>>;

/// Annotate a value with the position where its element started.
pub type SetPos<V> = Rc<dyn Fn(&mut V, TextPos)>;

/// Transform the rule's final accumulator into the rule result.
pub type EndHook<V> = Rc<dyn Fn(V) -> Option<V>>;

/// Seed a left-recursive rule's accumulator from the already-built
/// prefix value. Returning `None` refuses the seed; the engine then
/// skips this recursive rule and tries the next one.
pub type RecStart<V> = Rc<dyn Fn(&V) -> Option<V>>;

/// User terminal scanner: given the unconsumed tail, return how many
/// bytes were matched (must be at least one) and the produced value.
pub type Scan<V> = Rc<dyn Fn(&[u8]) -> Option<(usize, V)>>;
