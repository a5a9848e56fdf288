//! Decoded-module data model.

pub mod module;
pub mod types;

pub use module::{CodeBody, DataSegment, Instruction, LocalDecl, Module};
pub use types::{
    Export, ExportDesc, FuncIdx, FuncType, Import, ImportDesc, Limits, MemIdx, TypeIdx, ValType,
    Value,
};
