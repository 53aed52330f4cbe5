//! Argument processing.
//!
//! Turns flat `field.sub.field=value` tokens into a typed [`crate::MessageValue`]
//! by walking a [`crate::Schema`]. Splitting and duplicate detection live in
//! `split`, leaf conversion in `scalar`, whole-message string encodings in
//! `shim`, and the recursive path walker in `engine`.

mod engine;
mod scalar;
mod shim;
mod split;

pub use engine::ArgsEngine;
pub use scalar::{coerce_enum, coerce_scalar, parse_index, parse_signed, parse_unsigned};
pub use shim::{Shim, ShimFn, ShimRegistry};
pub use split::{split_raw, SplitArg};
