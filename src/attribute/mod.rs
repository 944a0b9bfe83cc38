//! Attribute values that rules are evaluated against

mod value;

pub use value::*;
