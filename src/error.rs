//! Crate-level error types, layered the same way the pipeline is: decoding,
//! store construction (linking), and execution each get their own enum.

use thiserror::Error;

use crate::binary::ReadError;

/// Module decoding failures. Section payload errors wrap the byte-level
/// cause so the failing offset survives to the surface.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid module header (bad magic or version)")]
    InvalidModuleHeader,

    #[error("malformed section header")]
    InvalidHeader(#[source] ReadError),

    #[error("unknown section id 0x{id:02X}")]
    UnknownSection { id: u8 },

    #[error("section id 0x{id:02X} appears more than once")]
    DuplicateSection { id: u8 },

    #[error("malformed type section")]
    InvalidTypeSection(#[source] ReadError),

    #[error("malformed import section")]
    InvalidImportSection(#[source] ReadError),

    #[error("malformed function section")]
    InvalidFunctionSection(#[source] ReadError),

    #[error("malformed memory section")]
    InvalidMemorySection(#[source] ReadError),

    #[error("malformed export section")]
    InvalidExportSection(#[source] ReadError),

    #[error("malformed code section")]
    InvalidCodeSection(#[source] ReadError),

    #[error("malformed function body")]
    InvalidCode(#[source] ReadError),

    #[error("malformed data section")]
    InvalidDataSection(#[source] ReadError),

    #[error(transparent)]
    Read(#[from] ReadError),
}

/// Store-construction failures: index-space resolution and segment placement.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("type index {index} is out of range")]
    NoSuchFuncType { index: u32 },

    #[error("code entry {index} has no function-section entry")]
    NoSuchFunc { index: usize },

    #[error("data segment targets missing memory {index}")]
    NoSuchMemory { index: u32 },

    #[error("data segment [{offset}, {end}) overflows memory of {len} bytes")]
    MemoryAddressOutOfRange {
        offset: usize,
        end: usize,
        len: usize,
    },

    #[error("module requires a type section")]
    MissingTypeSection,

    #[error("module requires a function section")]
    MissingFunctionSection,

    #[error("module requires an export section")]
    MissingExportSection,

    #[error("module requires a code section")]
    MissingCodeSection,
}

/// Failures reported by a host-provided extern function.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("extern function rejected its arguments")]
    InvalidArgs,

    #[error("extern function failed: {0}")]
    Failure(String),
}

/// Execution failures. Any of these leaves the runtime with empty operand
/// and frame stacks, so a later call starts clean.
#[derive(Debug, Error)]
pub enum Trap {
    #[error("no local at index {index}")]
    MissingLocal { index: u32 },

    #[error("operand stack is empty")]
    StackEmpty,

    #[error("frame stack is empty")]
    FramesEmpty,

    #[error("no export named {name:?}")]
    NoSuchExport { name: String },

    #[error("no extern registered for {module}.{name}")]
    NoSuchExtern { module: String, name: String },

    #[error("function index {index} is out of range")]
    NoSuchFunction { index: usize },

    #[error("operand type mismatch: expected {expected}")]
    TypeMismatch { expected: &'static str },

    #[error("module has no linear memory")]
    NoMemory,

    #[error("memory access at address {addr} is out of bounds")]
    MemoryOutOfBounds { addr: u32 },

    #[error("extern function error")]
    Host(#[from] HostError),
}

/// Umbrella error for the public embedding API.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Link(#[from] LinkError),

    #[error(transparent)]
    Trap(#[from] Trap),
}
