pub mod runtime_error;
pub mod vm;

pub use runtime_error::{InterpretError, RuntimeError};
pub use vm::{STACK_MAX, Vm, VmConfig};
