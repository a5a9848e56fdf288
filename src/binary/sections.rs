//! Wasm sections: ids, typed payload decoders, and the module decoder.

use super::{
    cursor::Cursor,
    leb128,
    reader::{read_name, read_payload, read_vec},
    ReadError, Result,
};
use crate::error::DecodeError;
use crate::model::{
    CodeBody, DataSegment, Export, ExportDesc, FuncType, Import, ImportDesc, Instruction, Limits,
    LocalDecl, Module, ValType,
};

/// Opcode bytes of the supported instruction subset.
mod op {
    pub const END: u8 = 0x0B;
    pub const CALL: u8 = 0x10;
    pub const LOCAL_GET: u8 = 0x20;
    pub const LOCAL_SET: u8 = 0x21;
    pub const I32_STORE: u8 = 0x36;
    pub const I32_CONST: u8 = 0x41;
    pub const I32_ADD: u8 = 0x6A;
}

/// Section identifiers recognized by this decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionId {
    Custom = 0x00,
    Type = 0x01,
    Import = 0x02,
    Function = 0x03,
    Memory = 0x05,
    Export = 0x07,
    Code = 0x0A,
    Data = 0x0B,
}

impl SectionId {
    pub fn from_byte(b: u8) -> Option<Self> {
        Some(match b {
            0x00 => SectionId::Custom,
            0x01 => SectionId::Type,
            0x02 => SectionId::Import,
            0x03 => SectionId::Function,
            0x05 => SectionId::Memory,
            0x07 => SectionId::Export,
            0x0A => SectionId::Code,
            0x0B => SectionId::Data,
            _ => return None,
        })
    }
}

/* ---------- Typed payload decoders ---------- */

fn read_val_type(cur: &mut Cursor) -> Result<ValType> {
    let byte = cur.read_u8()?;
    match byte {
        0x7F => Ok(ValType::I32),
        0x7E => Ok(ValType::I64),
        0x7D => Ok(ValType::F32),
        0x7C => Ok(ValType::F64),
        _ => Err(ReadError::UnknownType {
            byte,
            offset: cur.offset(),
        }),
    }
}

fn read_func_type(cur: &mut Cursor) -> Result<FuncType> {
    let form = cur.read_u8()?;
    if form != 0x60 {
        return Err(ReadError::Malformed {
            offset: cur.offset(),
            msg: "expected functype marker (0x60)",
        });
    }
    let params = read_vec(cur, read_val_type)?;
    let results = read_vec(cur, read_val_type)?;
    Ok(FuncType { params, results })
}

fn read_limits(cur: &mut Cursor) -> Result<Limits> {
    let flag = cur.read_u8()?;
    let min = leb128::read_u32(cur)?;
    let max = if flag == 0 {
        None
    } else {
        Some(leb128::read_u32(cur)?)
    };
    Ok(Limits { min, max })
}

fn read_import(cur: &mut Cursor) -> Result<Import> {
    let module = read_name(cur)?;
    let name = read_name(cur)?;
    let kind = cur.read_u8()?;
    if kind != 0x00 {
        return Err(ReadError::Malformed {
            offset: cur.offset(),
            msg: "unsupported import kind (function only)",
        });
    }
    let type_idx = leb128::read_u32(cur)?;
    Ok(Import {
        module,
        name,
        desc: ImportDesc::Func(type_idx),
    })
}

fn read_export(cur: &mut Cursor) -> Result<Export> {
    let name = read_name(cur)?;
    let kind = cur.read_u8()?;
    if kind != 0x00 {
        return Err(ReadError::Malformed {
            offset: cur.offset(),
            msg: "unsupported export kind (function only)",
        });
    }
    let index = leb128::read_u32(cur)?;
    Ok(Export {
        name,
        desc: ExportDesc::Func(index),
    })
}

fn read_local_decl(cur: &mut Cursor) -> Result<LocalDecl> {
    let count = leb128::read_u32(cur)?;
    let val_type = read_val_type(cur)?;
    Ok(LocalDecl { count, val_type })
}

fn read_instruction(cur: &mut Cursor) -> Result<Instruction> {
    let opcode = cur.read_u8()?;
    match opcode {
        op::LOCAL_GET => Ok(Instruction::LocalGet(leb128::read_u32(cur)?)),
        op::LOCAL_SET => Ok(Instruction::LocalSet(leb128::read_u32(cur)?)),
        op::I32_STORE => {
            let align = leb128::read_u32(cur)?;
            let offset = leb128::read_u32(cur)?;
            Ok(Instruction::I32Store { align, offset })
        }
        op::I32_CONST => Ok(Instruction::I32Const(leb128::read_i32(cur)?)),
        op::I32_ADD => Ok(Instruction::I32Add),
        op::CALL => Ok(Instruction::Call(leb128::read_u32(cur)?)),
        op::END => Ok(Instruction::End),
        _ => Err(ReadError::UnknownInstruction {
            opcode,
            offset: cur.offset(),
        }),
    }
}

/// Read one size-prefixed code body: local declarations, then instructions
/// until the body bytes are exhausted. The size prefix bounds a sub-cursor,
/// so a body cannot read past its own frame.
fn read_code_body(cur: &mut Cursor) -> Result<CodeBody> {
    let body_size = leb128::read_u32(cur)? as usize;
    let bytes = cur.read_bytes(body_size)?;
    let mut sub = Cursor::new(bytes);

    let locals = read_vec(&mut sub, read_local_decl)?;
    let mut body = Vec::new();
    while !sub.is_eof() {
        body.push(read_instruction(&mut sub)?);
    }
    if body.last() != Some(&Instruction::End) {
        return Err(ReadError::Malformed {
            offset: sub.offset(),
            msg: "function body missing terminating end",
        });
    }
    Ok(CodeBody { locals, body })
}

/// Read one data segment. The offset is the constant expression
/// `i32.const <n>; end`, the only shape emitters produce for active
/// segments in this subset.
fn read_data_segment(cur: &mut Cursor) -> Result<DataSegment> {
    let memory = leb128::read_u32(cur)?;
    if cur.read_u8()? != op::I32_CONST {
        return Err(ReadError::Malformed {
            offset: cur.offset(),
            msg: "data offset must be an i32.const expression",
        });
    }
    let offset = leb128::read_i32(cur)?;
    if offset < 0 {
        return Err(ReadError::Malformed {
            offset: cur.offset(),
            msg: "negative data segment offset",
        });
    }
    if cur.read_u8()? != op::END {
        return Err(ReadError::Malformed {
            offset: cur.offset(),
            msg: "data offset expression missing end",
        });
    }
    let init = read_payload(cur)?;
    Ok(DataSegment {
        memory,
        offset: offset as u32,
        init,
    })
}

/* ---------- Module decoder ---------- */

const MAGIC: &[u8; 4] = b"\0asm";
const VERSION: u32 = 1;

/// Decode a complete module. Custom sections are skipped; any other section
/// id may appear at most once. Section order is not enforced.
pub fn decode_module(bytes: &[u8]) -> core::result::Result<Module, DecodeError> {
    let mut cur = Cursor::new(bytes);

    let magic = cur
        .read_bytes(4)
        .map_err(|_| DecodeError::InvalidModuleHeader)?;
    if magic != MAGIC {
        return Err(DecodeError::InvalidModuleHeader);
    }
    let version = cur
        .read_u32_le()
        .map_err(|_| DecodeError::InvalidModuleHeader)?;
    if version != VERSION {
        return Err(DecodeError::InvalidModuleHeader);
    }

    let mut module = Module {
        version,
        ..Module::default()
    };
    let mut seen = [false; 12];

    while cur.peek_u8().is_some() {
        let id = cur.read_u8().map_err(DecodeError::InvalidHeader)?;
        let payload_len = leb128::read_u32(&mut cur).map_err(DecodeError::InvalidHeader)? as usize;
        let payload = cur
            .read_bytes(payload_len)
            .map_err(DecodeError::InvalidHeader)?;
        let mut pcur = Cursor::new(payload);

        let section = SectionId::from_byte(id).ok_or(DecodeError::UnknownSection { id })?;
        if section == SectionId::Custom {
            continue;
        }
        if seen[id as usize] {
            return Err(DecodeError::DuplicateSection { id });
        }
        seen[id as usize] = true;

        match section {
            SectionId::Type => {
                module.types = Some(
                    read_vec(&mut pcur, read_func_type).map_err(DecodeError::InvalidTypeSection)?,
                );
            }
            SectionId::Import => {
                module.imports = Some(
                    read_vec(&mut pcur, read_import).map_err(DecodeError::InvalidImportSection)?,
                );
            }
            SectionId::Function => {
                module.funcs = Some(
                    read_vec(&mut pcur, leb128::read_u32)
                        .map_err(DecodeError::InvalidFunctionSection)?,
                );
            }
            SectionId::Memory => {
                module.memories = Some(
                    read_vec(&mut pcur, read_limits).map_err(DecodeError::InvalidMemorySection)?,
                );
            }
            SectionId::Export => {
                module.exports = Some(
                    read_vec(&mut pcur, read_export).map_err(DecodeError::InvalidExportSection)?,
                );
            }
            SectionId::Code => {
                let count = leb128::read_u32(&mut pcur)
                    .map_err(DecodeError::InvalidCodeSection)? as usize;
                let mut codes = Vec::with_capacity(count);
                for _ in 0..count {
                    codes.push(read_code_body(&mut pcur).map_err(DecodeError::InvalidCode)?);
                }
                module.codes = Some(codes);
            }
            SectionId::Data => {
                module.data = Some(
                    read_vec(&mut pcur, read_data_segment)
                        .map_err(DecodeError::InvalidDataSection)?,
                );
            }
            SectionId::Custom => unreachable!(),
        }

        if !pcur.is_eof() {
            return Err(DecodeError::Read(ReadError::Malformed {
                offset: pcur.offset(),
                msg: "section payload not fully consumed",
            }));
        }
    }

    Ok(module)
}
