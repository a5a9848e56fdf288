//! The interpreter: export invocation, the dispatch loop, and the host-call
//! bridge.

use crate::binary;
use crate::error::{Error, Trap};
use crate::host::Externs;
use crate::model::{Instruction, Value};
use crate::runtime::funcs::{FuncInst, HostFunc, WasmFunc};
use crate::runtime::Store;
use crate::vm::frames::Frame;
use crate::vm::stack::ValueStack;

/// An instantiated module ready to service exported calls.
///
/// Not shareable across threads: each thread that needs to invoke functions
/// holds its own `Runtime`.
#[derive(Debug)]
pub struct Runtime {
    pub store: Store,
    externs: Externs,
    stack: ValueStack,
    frames: Vec<Frame>,
}

impl Runtime {
    /// Decode `bytes` and build the executable store.
    pub fn new(bytes: impl AsRef<[u8]>, externs: Externs) -> Result<Self, Error> {
        let module = binary::sections::decode_module(bytes.as_ref())?;
        let store = Store::new(&module)?;
        Ok(Self {
            store,
            externs,
            stack: ValueStack::new(),
            frames: Vec::new(),
        })
    }

    /// Invoke the exported function `name` with `args`.
    ///
    /// Returns the single result for a one-result callee, `None` otherwise.
    /// On any failure the operand and frame stacks are emptied before the
    /// error is returned, so the runtime stays usable.
    pub fn call(
        &mut self,
        name: impl AsRef<str>,
        args: Vec<Value>,
    ) -> Result<Option<Value>, Error> {
        match self.dispatch_export(name.as_ref(), args) {
            Ok(ret) => Ok(ret),
            Err(e) => {
                self.stack.clear();
                self.frames.clear();
                Err(e)
            }
        }
    }

    fn dispatch_export(&mut self, name: &str, args: Vec<Value>) -> Result<Option<Value>, Error> {
        let index = *self
            .store
            .exports
            .get(name)
            .ok_or_else(|| Trap::NoSuchExport {
                name: name.to_string(),
            })?;
        let func = self
            .store
            .funcs
            .get(index)
            .ok_or(Trap::NoSuchFunction { index })?
            .clone();

        for arg in args {
            self.stack.push(arg);
        }

        match func {
            FuncInst::Host(decl) => Ok(self.invoke_host(&decl)?),
            FuncInst::Wasm(func) => Ok(self.invoke_wasm(&func)?),
        }
    }

    fn invoke_wasm(&mut self, func: &WasmFunc) -> Result<Option<Value>, Trap> {
        let arity = func.ty.results.len();
        self.push_frame(func)?;
        self.run()?;
        if arity > 0 {
            Ok(Some(self.stack.pop()?))
        } else {
            Ok(None)
        }
    }

    /// Pop the arguments into locals (original order preserved), append the
    /// zero-initialized declared locals, and activate the frame.
    fn push_frame(&mut self, func: &WasmFunc) -> Result<(), Trap> {
        let mut locals = self.stack.pop_n(func.ty.params.len())?;
        for decl in &func.code.locals {
            for _ in 0..decl.count {
                locals.push(decl.val_type.zero());
            }
        }
        let frame = Frame::new(
            func.code.clone(),
            self.stack.len(),
            func.ty.results.len(),
            locals,
        );
        self.frames.push(frame);
        Ok(())
    }

    /// Pre-increment dispatch loop; runs until the frame stack drains.
    fn run(&mut self) -> Result<(), Trap> {
        loop {
            let ins = {
                let Some(frame) = self.frames.last_mut() else {
                    break;
                };
                frame.pc += 1;
                match frame.code.body.get(frame.pc as usize) {
                    Some(ins) => *ins,
                    None => break,
                }
            };

            match ins {
                Instruction::LocalGet(index) => {
                    let frame = self.frames.last().ok_or(Trap::FramesEmpty)?;
                    let value = *frame
                        .locals
                        .get(index as usize)
                        .ok_or(Trap::MissingLocal { index })?;
                    self.stack.push(value);
                }
                Instruction::LocalSet(index) => {
                    let value = self.stack.pop()?;
                    let frame = self.frames.last_mut().ok_or(Trap::FramesEmpty)?;
                    let slot = frame
                        .locals
                        .get_mut(index as usize)
                        .ok_or(Trap::MissingLocal { index })?;
                    *slot = value;
                }
                Instruction::I32Const(v) => self.stack.push(Value::I32(v)),
                Instruction::I32Add => {
                    let rhs = self.pop_i32()?;
                    let lhs = self.pop_i32()?;
                    self.stack.push(Value::I32(lhs.wrapping_add(rhs)));
                }
                Instruction::I32Store { align: _, offset } => {
                    let value = self.pop_i32()?;
                    let addr = self.pop_i32()?;
                    let ea = (addr as u32).wrapping_add(offset);
                    let mem = self.store.memories.get_mut(0).ok_or(Trap::NoMemory)?;
                    mem.store_u32(ea, value as u32)
                        .map_err(|_| Trap::MemoryOutOfBounds { addr: ea })?;
                }
                Instruction::Call(index) => {
                    let index = index as usize;
                    let func = self
                        .store
                        .funcs
                        .get(index)
                        .ok_or(Trap::NoSuchFunction { index })?
                        .clone();
                    match func {
                        FuncInst::Wasm(func) => self.push_frame(&func)?,
                        FuncInst::Host(decl) => {
                            if let Some(value) = self.invoke_host(&decl)? {
                                self.stack.push(value);
                            }
                        }
                    }
                }
                Instruction::End => {
                    let frame = self.frames.pop().ok_or(Trap::FramesEmpty)?;
                    self.stack.unwind(frame.sp, frame.arity)?;
                }
            }
        }
        Ok(())
    }

    /// Bridge to a host function: resolve it in the externs table, hand it
    /// the popped arguments, surface its result or error.
    fn invoke_host(&mut self, decl: &HostFunc) -> Result<Option<Value>, Trap> {
        let f = self
            .externs
            .resolve(&decl.module, &decl.name)
            .cloned()
            .ok_or_else(|| Trap::NoSuchExtern {
                module: decl.module.clone(),
                name: decl.name.clone(),
            })?;
        let args = self.stack.pop_n(decl.ty.params.len())?;
        Ok(f(&args)?)
    }

    fn pop_i32(&mut self) -> Result<i32, Trap> {
        match self.stack.pop()? {
            Value::I32(v) => Ok(v),
            _ => Err(Trap::TypeMismatch { expected: "i32" }),
        }
    }
}
