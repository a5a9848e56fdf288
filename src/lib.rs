//! picowasm: a minimal WebAssembly runtime.
//!
//! Decodes a binary module, instantiates it into a [`runtime::Store`], and
//! interprets exported functions over a typed value stack. The executable
//! subset covers i32 arithmetic, locals, memory stores, and calls (including
//! imported host functions); all four MVP value types decode.
//!
//! ```no_run
//! use picowasm::{Externs, Runtime, Value};
//!
//! # fn main() -> Result<(), picowasm::Error> {
//! let wasm = std::fs::read("add.wasm").unwrap();
//! let mut runtime = Runtime::new(&wasm, Externs::new())?;
//! let sum = runtime.call("add", vec![Value::I32(1), Value::I32(2)])?;
//! assert_eq!(sum, Some(Value::I32(3)));
//! # Ok(())
//! # }
//! ```

pub mod binary;
pub mod error;
pub mod host;
pub mod model;
pub mod runtime;
pub mod vm;

pub use error::{Error, HostError};
pub use host::Externs;
pub use model::{Module, ValType, Value};
pub use vm::Runtime;

/// Decode a binary module without instantiating it.
pub fn decode(bytes: impl AsRef<[u8]>) -> Result<Module, error::DecodeError> {
    binary::sections::decode_module(bytes.as_ref())
}
