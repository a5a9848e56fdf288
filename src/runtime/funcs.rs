//! Resolved function entries in the store.

use std::sync::Arc;

use crate::model::{CodeBody, FuncType};

/// A function in the combined index space: defined by the module, or an
/// import to be satisfied by the host at call time.
#[derive(Debug, Clone)]
pub enum FuncInst {
    Wasm(WasmFunc),
    Host(HostFunc),
}

impl FuncInst {
    pub fn ty(&self) -> &FuncType {
        match self {
            FuncInst::Wasm(f) => &f.ty,
            FuncInst::Host(f) => &f.ty,
        }
    }
}

/// Module-defined function: its signature and shared code body. Frames hold
/// the body by `Arc`, so the decoded module is not needed after linking.
#[derive(Debug, Clone)]
pub struct WasmFunc {
    pub ty: FuncType,
    pub code: Arc<CodeBody>,
}

/// Imported function, resolved against the externs table when called.
#[derive(Debug, Clone)]
pub struct HostFunc {
    pub module: String,
    pub name: String,
    pub ty: FuncType,
}
