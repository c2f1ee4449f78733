//! # clox
//!
//! A bytecode interpreter for arithmetic expressions: a scanner feeding a
//! single-pass Pratt compiler that writes bytecode straight into a [`Chunk`],
//! and a stack [`Vm`] that runs it.
//!
//! ```
//! use clox::{Vm, VmConfig};
//!
//! let mut vm = Vm::with_output(VmConfig::default(), Vec::new());
//! vm.interpret("-(1 + 2)").unwrap();
//! assert_eq!(vm.output().as_slice(), b"-3\n");
//! ```

pub mod bytecode;
pub mod exit_code;
pub mod frontend;
pub mod lang;
pub mod memory;
pub mod runtime;

pub use bytecode::compile::compile;
pub use bytecode::disasm::{disassemble, disassemble_instruction};
pub use bytecode::{Chunk, OpCode};
pub use lang::value::Value;
pub use runtime::{InterpretError, RuntimeError, Vm, VmConfig};

/// Compiles and runs `source` on a fresh VM that prints to stdout.
pub fn interpret(source: &str) -> Result<(), InterpretError> {
    Vm::new().interpret(source)
}
