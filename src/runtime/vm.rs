use std::io::{self, Write};

use log::{debug, error, trace};

use crate::bytecode::compile::compile;
use crate::bytecode::disasm::{render_chunk, render_instruction};
use crate::bytecode::{Chunk, OpCode};
use crate::lang::value::Value;
use crate::runtime::runtime_error::{InterpretError, RuntimeError};

/// Slots in the value stack. Pushing past this is fatal.
pub const STACK_MAX: usize = 256;

#[derive(Debug, Clone, Default)]
pub struct VmConfig {
    /// Disassemble each successfully compiled chunk before running it.
    pub print_code: bool,
    /// Dump the stack and the current instruction before every dispatch.
    pub trace_execution: bool,
}

/// Stack machine that compiles and runs one source unit at a time.
///
/// Results, disassembly and traces go to `out`.
pub struct Vm<W: Write = io::Stdout> {
    stack: Vec<Value>,
    ip: usize,
    config: VmConfig,
    out: W,
}

impl Vm {
    pub fn new() -> Self {
        Self::with_config(VmConfig::default())
    }

    pub fn with_config(config: VmConfig) -> Self {
        Self::with_output(config, io::stdout())
    }
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Vm<W> {
    pub fn with_output(config: VmConfig, out: W) -> Self {
        Self {
            stack: Vec::with_capacity(STACK_MAX),
            ip: 0,
            config,
            out,
        }
    }

    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn reset_stack(&mut self) {
        self.stack.clear();
    }

    /// Compiles `source` into a fresh chunk and runs it.
    ///
    /// Execution never starts if compilation reported an error.
    pub fn interpret(&mut self, source: &str) -> Result<(), InterpretError> {
        let mut chunk = Chunk::new();
        compile(source, &mut chunk)?;

        if self.config.print_code {
            write!(self.out, "{}", render_chunk(&chunk, "code")).map_err(RuntimeError::from)?;
        }

        self.run(&chunk)?;
        Ok(())
    }

    /// Executes `chunk` from its first byte until `RETURN`.
    pub fn run(&mut self, chunk: &Chunk) -> Result<(), RuntimeError> {
        self.reset_stack();
        self.ip = 0;
        debug!("executing chunk of {} bytes", chunk.len());

        let result = self.execute(chunk);
        if let Err(e) = &result {
            debug!("execution stopped: {}", e);
        }
        result
    }

    // Execution

    fn execute(&mut self, chunk: &Chunk) -> Result<(), RuntimeError> {
        loop {
            if self.config.trace_execution {
                self.trace_instruction(chunk)?;
            }

            let offset = self.ip;
            let byte = self.read_byte(chunk).ok_or(RuntimeError::MissingReturn)?;
            let op = OpCode::try_from(byte)
                .map_err(|byte| RuntimeError::UnknownOpcode { byte, offset })?;
            trace!("0x{:04x} {}", offset, op.mnemonic());

            match op {
                OpCode::Constant => {
                    let index = self
                        .read_byte(chunk)
                        .ok_or(RuntimeError::TruncatedInstruction { offset })?;
                    let value = Self::constant(chunk, usize::from(index), offset)?;
                    self.push(value);
                }
                OpCode::ConstantLong => {
                    let index = chunk
                        .read_u16(self.ip)
                        .ok_or(RuntimeError::TruncatedInstruction { offset })?;
                    self.ip += 2;
                    let value = Self::constant(chunk, usize::from(index), offset)?;
                    self.push(value);
                }
                OpCode::Add => self.binary_op(offset, |a, b| a + b)?,
                OpCode::Subtract => self.binary_op(offset, |a, b| a - b)?,
                OpCode::Multiply => self.binary_op(offset, |a, b| a * b)?,
                OpCode::Divide => self.binary_op(offset, |a, b| a / b)?,
                OpCode::Negate => {
                    let value = self.pop(offset)?;
                    self.push(Value::Number(-value.as_number()));
                }
                OpCode::Return => {
                    let value = self.pop(offset)?;
                    writeln!(self.out, "{}", value)?;
                    return Ok(());
                }
            }
        }
    }

    fn read_byte(&mut self, chunk: &Chunk) -> Option<u8> {
        let byte = chunk.read_u8(self.ip)?;
        self.ip += 1;
        Some(byte)
    }

    fn constant(chunk: &Chunk, index: usize, offset: usize) -> Result<Value, RuntimeError> {
        chunk
            .constant(index)
            .ok_or(RuntimeError::ConstantOutOfRange { index, offset })
    }

    /// Pops the right operand, then the left, and pushes `f(left, right)`.
    fn binary_op(&mut self, offset: usize, f: impl Fn(f64, f64) -> f64) -> Result<(), RuntimeError> {
        let b = self.pop(offset)?;
        let a = self.pop(offset)?;
        self.push(Value::Number(f(a.as_number(), b.as_number())));
        Ok(())
    }

    fn trace_instruction(&mut self, chunk: &Chunk) -> Result<(), RuntimeError> {
        let mut line = String::from("          ");
        for value in &self.stack {
            line.push_str(&format!("[ {} ]", value));
        }
        writeln!(self.out, "{}", line)?;

        let (instruction, _) = render_instruction(chunk, self.ip);
        writeln!(self.out, "{}", instruction)?;
        Ok(())
    }

    // Stack operations

    /// Overflowing the stack means the compiler emitted an unbalanced
    /// sequence; there is no recovering from that.
    fn push(&mut self, value: Value) {
        if self.stack.len() == STACK_MAX {
            error!("value stack overflow at offset {}", self.ip);
            panic!("stack overflow: the value stack holds {} values", STACK_MAX);
        }
        self.stack.push(value);
    }

    fn pop(&mut self, offset: usize) -> Result<Value, RuntimeError> {
        self.stack
            .pop()
            .ok_or(RuntimeError::StackUnderflow { offset })
    }
}
