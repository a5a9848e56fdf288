//! Store construction: the function index space, materialized memories,
//! applied data segments, and the export map.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::LinkError;
use crate::model::{ExportDesc, FuncType, ImportDesc, Module};
use crate::runtime::funcs::{FuncInst, HostFunc, WasmFunc};
use crate::runtime::memory::MemoryInstance;

/// Runtime counterpart of a decoded module: resolved functions (imports
/// first, then definitions, forming the Wasm function index space),
/// materialized memories, and exports by name.
#[derive(Debug, Default)]
pub struct Store {
    pub funcs: Vec<FuncInst>,
    pub memories: Vec<MemoryInstance>,
    pub exports: HashMap<String, usize>,
}

impl Store {
    pub fn new(module: &Module) -> Result<Self, LinkError> {
        let mut funcs: Vec<FuncInst> = Vec::new();

        if let Some(imports) = &module.imports {
            for import in imports {
                let ImportDesc::Func(type_idx) = import.desc;
                funcs.push(FuncInst::Host(HostFunc {
                    module: import.module.clone(),
                    name: import.name.clone(),
                    ty: func_type(module, type_idx)?,
                }));
            }
        }

        if let Some(codes) = &module.codes {
            let type_indices = module
                .funcs
                .as_ref()
                .ok_or(LinkError::MissingFunctionSection)?;
            for (index, code) in codes.iter().enumerate() {
                let type_idx = *type_indices
                    .get(index)
                    .ok_or(LinkError::NoSuchFunc { index })?;
                funcs.push(FuncInst::Wasm(WasmFunc {
                    ty: func_type(module, type_idx)?,
                    code: Arc::new(code.clone()),
                }));
            }
        } else if module.funcs.is_some() {
            return Err(LinkError::MissingCodeSection);
        }

        let mut memories: Vec<MemoryInstance> = module
            .memories
            .iter()
            .flatten()
            .map(MemoryInstance::new)
            .collect();

        let mut exports = HashMap::new();
        match &module.exports {
            Some(entries) => {
                for export in entries {
                    let ExportDesc::Func(index) = export.desc;
                    exports.insert(export.name.clone(), index as usize);
                }
            }
            None if !funcs.is_empty() => return Err(LinkError::MissingExportSection),
            None => {}
        }

        if let Some(segments) = &module.data {
            for seg in segments {
                let mem = memories
                    .get_mut(seg.memory as usize)
                    .ok_or(LinkError::NoSuchMemory { index: seg.memory })?;
                let offset = seg.offset as usize;
                if mem.write(offset, &seg.init).is_err() {
                    return Err(LinkError::MemoryAddressOutOfRange {
                        offset,
                        end: offset + seg.init.len(),
                        len: mem.len(),
                    });
                }
            }
        }

        Ok(Self {
            funcs,
            memories,
            exports,
        })
    }
}

fn func_type(module: &Module, type_idx: u32) -> Result<FuncType, LinkError> {
    let types = module.types.as_ref().ok_or(LinkError::MissingTypeSection)?;
    types
        .get(type_idx as usize)
        .cloned()
        .ok_or(LinkError::NoSuchFuncType { index: type_idx })
}
