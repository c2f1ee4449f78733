use crate::bytecode::compile_error::CompileError;
use crate::exit_code;

/// Execution stopped on a chunk that does not follow the compiler's
/// encoding, or the result could not be written.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("runtime error: stack underflow at offset {offset}")]
    StackUnderflow { offset: usize },

    #[error("runtime error: unknown opcode {byte} at offset {offset}")]
    UnknownOpcode { byte: u8, offset: usize },

    #[error("runtime error: truncated instruction at offset {offset}")]
    TruncatedInstruction { offset: usize },

    #[error("runtime error: constant {index} out of range at offset {offset}")]
    ConstantOutOfRange { index: usize, offset: usize },

    #[error("runtime error: reached end of chunk without RETURN")]
    MissingReturn,

    #[error("runtime error: cannot write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Outcome of a failed top-level interpretation.
#[derive(Debug, thiserror::Error)]
pub enum InterpretError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl InterpretError {
    /// Process exit status the CLI reports for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            InterpretError::Compile(_) => exit_code::COMPILE_ERROR,
            InterpretError::Runtime(_) => exit_code::RUNTIME_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = RuntimeError::UnknownOpcode {
            byte: 99,
            offset: 4,
        };
        assert_eq!(err.to_string(), "runtime error: unknown opcode 99 at offset 4");
        assert_eq!(
            RuntimeError::MissingReturn.to_string(),
            "runtime error: reached end of chunk without RETURN"
        );
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let compile = InterpretError::Compile(CompileError {
            diagnostics: Vec::new(),
        });
        let runtime = InterpretError::Runtime(RuntimeError::MissingReturn);

        assert_eq!(compile.exit_code(), exit_code::COMPILE_ERROR);
        assert_eq!(runtime.exit_code(), exit_code::RUNTIME_ERROR);
        assert_ne!(compile.exit_code(), runtime.exit_code());
        assert_ne!(compile.exit_code(), exit_code::OK);
    }
}
