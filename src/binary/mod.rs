//! Binary parsing layer: cursor, LEB128, list helpers, and section decoding.
//! Errors at this layer are byte-level and carry the offset of the failing
//! read; the module decoder wraps them per section.

pub mod cursor;
pub mod leb128;
pub mod reader;
pub mod sections;

use thiserror::Error;

/// Result alias for byte-level reads.
pub type Result<T> = core::result::Result<T, ReadError>;

/// Errors raised while reading the raw byte stream.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("unexpected EOF at offset {offset}")]
    UnexpectedEof { offset: usize },

    #[error("LEB128 value exceeds {bits} bits at offset {offset}")]
    Leb128Overflow { bits: u8, offset: usize },

    #[error("over-long LEB128 encoding at offset {offset}")]
    Leb128TooLong { offset: usize },

    #[error("invalid UTF-8 string at offset {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("unknown value type 0x{byte:02X} at offset {offset}")]
    UnknownType { byte: u8, offset: usize },

    #[error("unknown instruction opcode 0x{opcode:02X} at offset {offset}")]
    UnknownInstruction { opcode: u8, offset: usize },

    #[error("malformed binary at offset {offset}: {msg}")]
    Malformed { offset: usize, msg: &'static str },
}
