// =============================================================================
// OPCODE - one-byte instruction tags
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    // literals
    /// Push constant: 1-byte pool index follows.
    Constant,
    /// Push constant: 2-byte big-endian pool index follows.
    ConstantLong,

    // arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Negate,

    /// Pop and print the result, ending the chunk.
    Return,
}

impl OpCode {
    pub fn mnemonic(self) -> &'static str {
        match self {
            OpCode::Constant => "CONSTANT",
            OpCode::ConstantLong => "CONSTANT_LONG",
            OpCode::Add => "ADD",
            OpCode::Subtract => "SUBTRACT",
            OpCode::Multiply => "MULTIPLY",
            OpCode::Divide => "DIVIDE",
            OpCode::Negate => "NEGATE",
            OpCode::Return => "RETURN",
        }
    }

    /// Encoded length in bytes, opcode included.
    pub fn width(self) -> usize {
        match self {
            OpCode::Constant => 2,
            OpCode::ConstantLong => 3,
            OpCode::Add
            | OpCode::Subtract
            | OpCode::Multiply
            | OpCode::Divide
            | OpCode::Negate
            | OpCode::Return => 1,
        }
    }
}

impl From<OpCode> for u8 {
    fn from(op: OpCode) -> u8 {
        op as u8
    }
}

impl TryFrom<u8> for OpCode {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, u8> {
        Ok(match byte {
            0 => OpCode::Constant,
            1 => OpCode::ConstantLong,
            2 => OpCode::Add,
            3 => OpCode::Subtract,
            4 => OpCode::Multiply,
            5 => OpCode::Divide,
            6 => OpCode::Negate,
            7 => OpCode::Return,
            other => return Err(other),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [OpCode; 8] = [
        OpCode::Constant,
        OpCode::ConstantLong,
        OpCode::Add,
        OpCode::Subtract,
        OpCode::Multiply,
        OpCode::Divide,
        OpCode::Negate,
        OpCode::Return,
    ];

    #[test]
    fn test_byte_tags_decode() {
        for op in ALL {
            assert_eq!(OpCode::try_from(u8::from(op)), Ok(op));
        }
    }

    #[test]
    fn test_unknown_byte() {
        assert_eq!(OpCode::try_from(8), Err(8));
        assert_eq!(OpCode::try_from(0xff), Err(0xff));
    }

    #[test]
    fn test_widths() {
        assert_eq!(OpCode::Constant.width(), 2);
        assert_eq!(OpCode::ConstantLong.width(), 3);
        assert_eq!(OpCode::Negate.width(), 1);
        assert_eq!(OpCode::Return.width(), 1);
    }
}
