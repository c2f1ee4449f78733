use serde::{Deserialize, Serialize};

use crate::bytecode::OpCode;
use crate::lang::value::{Value, ValueArray};
use crate::memory::grow_capacity;

/// Largest pool index an instruction can address (long form).
pub const MAX_CONSTANT_INDEX: usize = u16::MAX as usize;

/// One compiled unit: instruction bytes, the source line of every byte, and
/// the constant pool the instructions index into.
///
/// `code` and `lines` always have the same length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    code: Vec<u8>,
    lines: Vec<usize>,
    constants: ValueArray,
    #[serde(skip)]
    capacity: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ChunkDecodeError {
    #[error("malformed chunk encoding: {0}")]
    Encoding(#[from] postcard::Error),

    #[error("chunk has {code} code bytes but {lines} line entries")]
    LineTableMismatch { code: usize, lines: usize },
}

impl Chunk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one byte, recording the source line it came from.
    pub fn write(&mut self, byte: u8, line: usize) {
        if self.code.len() == self.capacity {
            self.capacity = grow_capacity(self.capacity);
            let additional = self.capacity - self.code.len();
            self.code.reserve_exact(additional);
            self.lines.reserve_exact(additional);
        }
        self.code.push(byte);
        self.lines.push(line);
    }

    pub fn write_op(&mut self, op: OpCode, line: usize) {
        self.write(op.into(), line);
    }

    /// Emits a constant load, picking the short form for indices up to 255
    /// and the long big-endian form above that.
    pub fn write_constant(&mut self, index: u16, line: usize) {
        match u8::try_from(index) {
            Ok(short) => {
                self.write_op(OpCode::Constant, line);
                self.write(short, line);
            }
            Err(_) => {
                let [high, low] = index.to_be_bytes();
                self.write_op(OpCode::ConstantLong, line);
                self.write(high, line);
                self.write(low, line);
            }
        }
    }

    /// Appends `value` to the constant pool and returns its index.
    ///
    /// Equal values are not shared; every call takes a new slot.
    pub fn add_constant(&mut self, value: Value) -> usize {
        self.constants.write(value)
    }

    pub fn code(&self) -> &[u8] {
        &self.code
    }

    pub fn lines(&self) -> &[usize] {
        &self.lines
    }

    pub fn constants(&self) -> &ValueArray {
        &self.constants
    }

    pub fn constant(&self, index: usize) -> Option<Value> {
        self.constants.get(index)
    }

    pub fn line(&self, offset: usize) -> Option<usize> {
        self.lines.get(offset).copied()
    }

    pub fn read_u8(&self, offset: usize) -> Option<u8> {
        self.code.get(offset).copied()
    }

    /// Reads a big-endian operand starting at `offset`.
    pub fn read_u16(&self, offset: usize) -> Option<u16> {
        let high = self.read_u8(offset)?;
        let low = self.read_u8(offset + 1)?;
        Some(u16::from_be_bytes([high, low]))
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Compact binary form of the chunk.
    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        postcard::to_allocvec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Chunk, ChunkDecodeError> {
        let mut chunk: Chunk = postcard::from_bytes(bytes)?;
        if chunk.code.len() != chunk.lines.len() {
            return Err(ChunkDecodeError::LineTableMismatch {
                code: chunk.code.len(),
                lines: chunk.lines.len(),
            });
        }
        chunk.capacity = chunk.code.len();
        chunk.constants.settle_capacity();
        Ok(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_keeps_lines_parallel() {
        let mut chunk = Chunk::new();
        chunk.write_op(OpCode::Return, 1);
        chunk.write(0x2a, 2);
        chunk.write_op(OpCode::Negate, 2);
        assert_eq!(chunk.code(), &[7, 0x2a, 6]);
        assert_eq!(chunk.lines(), &[1, 2, 2]);
        assert_eq!(chunk.len(), chunk.lines().len());
    }

    #[test]
    fn test_growth_policy() {
        let mut chunk = Chunk::new();
        assert_eq!(chunk.capacity(), 0);
        assert!(chunk.is_empty());

        chunk.write(0, 1);
        assert_eq!(chunk.capacity(), 8);

        for _ in 1..8 {
            chunk.write(0, 1);
        }
        assert_eq!(chunk.capacity(), 8);

        chunk.write(0, 1);
        assert_eq!(chunk.capacity(), 16);

        for _ in 9..17 {
            chunk.write(0, 1);
        }
        assert_eq!(chunk.len(), 17);
        assert_eq!(chunk.capacity(), 32);
    }

    #[test]
    fn test_add_constant_never_deduplicates() {
        let mut chunk = Chunk::new();
        assert_eq!(chunk.add_constant(Value::Number(1.0)), 0);
        assert_eq!(chunk.add_constant(Value::Number(1.0)), 1);
        assert_eq!(chunk.constants().len(), 2);
    }

    #[test]
    fn test_write_constant_short_form() {
        for index in [0u16, 1, 200, 255] {
            let mut chunk = Chunk::new();
            chunk.write_constant(index, 3);
            assert_eq!(chunk.code(), &[u8::from(OpCode::Constant), index as u8]);
            assert_eq!(chunk.lines(), &[3, 3]);
        }
    }

    #[test]
    fn test_write_constant_long_form() {
        for index in [256u16, 300, 0x1234, u16::MAX] {
            let mut chunk = Chunk::new();
            chunk.write_constant(index, 4);
            assert_eq!(chunk.len(), 3);
            assert_eq!(chunk.read_u8(0), Some(u8::from(OpCode::ConstantLong)));
            assert_eq!(chunk.read_u16(1), Some(index));
        }

        let mut chunk = Chunk::new();
        chunk.write_constant(0x1234, 1);
        assert_eq!(chunk.code(), &[u8::from(OpCode::ConstantLong), 0x12, 0x34]);
    }

    #[test]
    fn test_read_past_end() {
        let mut chunk = Chunk::new();
        chunk.write(1, 1);
        assert_eq!(chunk.read_u8(1), None);
        assert_eq!(chunk.read_u16(0), None);
        assert_eq!(chunk.line(5), None);
    }

    #[test]
    fn test_binary_encoding_preserves_chunk() {
        let mut chunk = Chunk::new();
        let index = chunk.add_constant(Value::Number(1.5));
        chunk.write_constant(index as u16, 1);
        chunk.write_op(OpCode::Return, 2);

        let bytes = chunk.to_bytes().unwrap();
        let decoded = Chunk::from_bytes(&bytes).unwrap();

        assert_eq!(decoded.code(), chunk.code());
        assert_eq!(decoded.lines(), chunk.lines());
        assert_eq!(decoded.constant(0), Some(Value::Number(1.5)));
        assert_eq!(decoded.capacity(), decoded.len());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            Chunk::from_bytes(&[0xff, 0xff, 0xff]),
            Err(ChunkDecodeError::Encoding(_))
        ));
    }

    #[test]
    fn test_decode_rejects_missing_lines() {
        // code = [RETURN], lines = [], constants = []
        assert!(matches!(
            Chunk::from_bytes(&[1, 7, 0, 0]),
            Err(ChunkDecodeError::LineTableMismatch { code: 1, lines: 0 })
        ));
    }
}
