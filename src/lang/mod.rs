//! # clox values
//!
//! The value representation shared by the compiler's constant pools and the
//! virtual machine's stack.

pub mod value;

pub use value::{Value, ValueArray};
