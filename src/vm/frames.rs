//! Activation records for in-progress calls.

use std::sync::Arc;

use crate::model::{CodeBody, Value};

/// One call frame. `pc` starts at -1 so the dispatch loop can pre-increment
/// before every fetch; `sp` is the operand-stack height at entry and the
/// floor the stack shrinks back to at teardown.
#[derive(Debug)]
pub struct Frame {
    pub pc: isize,
    pub sp: usize,
    pub code: Arc<CodeBody>,
    pub arity: usize,
    pub locals: Vec<Value>,
}

impl Frame {
    pub fn new(code: Arc<CodeBody>, sp: usize, arity: usize, locals: Vec<Value>) -> Self {
        Self {
            pc: -1,
            sp,
            code,
            arity,
            locals,
        }
    }
}
