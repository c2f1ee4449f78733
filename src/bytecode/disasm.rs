use crate::bytecode::{Chunk, OpCode};

/// Print disassembly of a whole chunk under a `== name ==` header.
pub fn disassemble(chunk: &Chunk, name: &str) {
    print!("{}", render_chunk(chunk, name));
}

/// Print the instruction at `offset` and return the offset of the next one.
pub fn disassemble_instruction(chunk: &Chunk, offset: usize) -> usize {
    let (line, next) = render_instruction(chunk, offset);
    println!("{}", line);
    next
}

/// Render every instruction in `chunk`, one per line.
pub fn render_chunk(chunk: &Chunk, name: &str) -> String {
    let mut out = format!("== {} ==\n", name);
    let mut offset = 0;

    while offset < chunk.len() {
        let (line, next) = render_instruction(chunk, offset);
        out.push_str(&line);
        out.push('\n');
        offset = next;
    }

    out
}

/// Render the instruction at `offset`, without a trailing newline.
///
/// Returns the text and the next instruction's offset. Instructions are 1,
/// 2 or 3 bytes wide, so callers must step by the returned offset.
pub fn render_instruction(chunk: &Chunk, offset: usize) -> (String, usize) {
    let Some(byte) = chunk.read_u8(offset) else {
        return (format!("0x{:04x} <end of chunk>", offset), chunk.len());
    };

    let mut out = format!("0x{:04x} ", offset);
    out.push_str(&line_column(chunk, offset));

    let next = match OpCode::try_from(byte) {
        Ok(op @ OpCode::Constant) => {
            let index = chunk.read_u8(offset + 1).map(usize::from);
            out.push_str(&constant_operand(chunk, op, index, 2));
            offset + op.width()
        }
        Ok(op @ OpCode::ConstantLong) => {
            let index = chunk.read_u16(offset + 1).map(usize::from);
            out.push_str(&constant_operand(chunk, op, index, 4));
            offset + op.width()
        }
        Ok(op) => {
            out.push_str(op.mnemonic());
            offset + op.width()
        }
        Err(byte) => {
            out.push_str(&format!("Unknown opcode {}", byte));
            offset + 1
        }
    };

    (out, next.min(chunk.len()))
}

/// Source line, or `|` when unchanged from the previous byte.
fn line_column(chunk: &Chunk, offset: usize) -> String {
    let line = chunk.line(offset);
    if offset > 0 && line == chunk.line(offset - 1) {
        "   | ".to_string()
    } else {
        format!("{:4} ", line.unwrap_or(0))
    }
}

fn constant_operand(chunk: &Chunk, op: OpCode, index: Option<usize>, digits: usize) -> String {
    let Some(index) = index else {
        return format!("{:<16} <truncated>", op.mnemonic());
    };

    match chunk.constant(index) {
        Some(value) => format!(
            "{:<16} 0x{:0width$x} '{}'",
            op.mnemonic(),
            index,
            value,
            width = digits
        ),
        None => format!(
            "{:<16} 0x{:0width$x} <no such constant>",
            op.mnemonic(),
            index,
            width = digits
        ),
    }
}
