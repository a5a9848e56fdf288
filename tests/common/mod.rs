//! Hand-assembled module binaries shared by the integration tests.

#![allow(dead_code)]

pub const SEC_TYPE: u8 = 0x01;
pub const SEC_IMPORT: u8 = 0x02;
pub const SEC_FUNCTION: u8 = 0x03;
pub const SEC_MEMORY: u8 = 0x05;
pub const SEC_EXPORT: u8 = 0x07;
pub const SEC_CODE: u8 = 0x0A;
pub const SEC_DATA: u8 = 0x0B;

pub const I32: u8 = 0x7F;
pub const I64: u8 = 0x7E;
pub const F32: u8 = 0x7D;
pub const F64: u8 = 0x7C;

pub const I32_ADD: u8 = 0x6A;
pub const END: u8 = 0x0B;

pub fn uleb(mut v: u32) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        let mut b = (v & 0x7F) as u8;
        v >>= 7;
        if v != 0 {
            b |= 0x80;
        }
        out.push(b);
        if v == 0 {
            break;
        }
    }
    out
}

pub fn sleb(mut v: i32) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        let b = (v & 0x7F) as u8;
        v >>= 7;
        let done = (v == 0 && b & 0x40 == 0) || (v == -1 && b & 0x40 != 0);
        out.push(if done { b } else { b | 0x80 });
        if done {
            break;
        }
    }
    out
}

pub fn concat(parts: &[Vec<u8>]) -> Vec<u8> {
    parts.iter().flatten().copied().collect()
}

/// ULEB count prefix followed by the encoded items.
pub fn counted(items: &[Vec<u8>]) -> Vec<u8> {
    let mut out = uleb(items.len() as u32);
    out.extend(concat(items));
    out
}

pub fn name(s: &str) -> Vec<u8> {
    let mut out = uleb(s.len() as u32);
    out.extend_from_slice(s.as_bytes());
    out
}

pub fn section(id: u8, payload: Vec<u8>) -> Vec<u8> {
    let mut out = vec![id];
    out.extend(uleb(payload.len() as u32));
    out.extend(payload);
    out
}

/// Magic + version 1 followed by the given sections.
pub fn module(sections: &[Vec<u8>]) -> Vec<u8> {
    let mut out = vec![0x00, 0x61, 0x73, 0x6D, 0x01, 0x00, 0x00, 0x00];
    out.extend(concat(sections));
    out
}

pub fn func_type(params: &[u8], results: &[u8]) -> Vec<u8> {
    let mut out = vec![0x60];
    out.extend(uleb(params.len() as u32));
    out.extend_from_slice(params);
    out.extend(uleb(results.len() as u32));
    out.extend_from_slice(results);
    out
}

pub fn import_func(module: &str, item: &str, type_idx: u32) -> Vec<u8> {
    let mut out = name(module);
    out.extend(name(item));
    out.push(0x00);
    out.extend(uleb(type_idx));
    out
}

pub fn export_func(item: &str, func_idx: u32) -> Vec<u8> {
    let mut out = name(item);
    out.push(0x00);
    out.extend(uleb(func_idx));
    out
}

/// Size-prefixed code body: local declarations, then raw instruction bytes.
pub fn body(locals: &[(u32, u8)], code: &[u8]) -> Vec<u8> {
    let mut inner = uleb(locals.len() as u32);
    for &(count, ty) in locals {
        inner.extend(uleb(count));
        inner.push(ty);
    }
    inner.extend_from_slice(code);
    let mut out = uleb(inner.len() as u32);
    out.extend(inner);
    out
}

pub fn local_get(i: u32) -> Vec<u8> {
    let mut out = vec![0x20];
    out.extend(uleb(i));
    out
}

pub fn local_set(i: u32) -> Vec<u8> {
    let mut out = vec![0x21];
    out.extend(uleb(i));
    out
}

pub fn i32_const(v: i32) -> Vec<u8> {
    let mut out = vec![0x41];
    out.extend(sleb(v));
    out
}

pub fn i32_store(align: u32, offset: u32) -> Vec<u8> {
    let mut out = vec![0x36];
    out.extend(uleb(align));
    out.extend(uleb(offset));
    out
}

pub fn call(i: u32) -> Vec<u8> {
    let mut out = vec![0x10];
    out.extend(uleb(i));
    out
}

pub fn data_segment(memory: u32, offset: i32, bytes: &[u8]) -> Vec<u8> {
    let mut out = uleb(memory);
    out.extend(i32_const(offset));
    out.push(END);
    out.extend(uleb(bytes.len() as u32));
    out.extend_from_slice(bytes);
    out
}

/// `(func (export "add") (param i32 i32) (result i32) local.get 0; local.get 1; i32.add)`
pub fn add_module() -> Vec<u8> {
    module(&[
        section(SEC_TYPE, counted(&[func_type(&[I32, I32], &[I32])])),
        section(SEC_FUNCTION, counted(&[uleb(0)])),
        section(SEC_EXPORT, counted(&[export_func("add", 0)])),
        section(
            SEC_CODE,
            counted(&[body(
                &[],
                &concat(&[local_get(0), local_get(1), vec![I32_ADD], vec![END]]),
            )]),
        ),
    ])
}

/// Exports `call_doubler`, which forwards its argument to local function 1
/// (`x + x`).
pub fn doubler_module() -> Vec<u8> {
    module(&[
        section(SEC_TYPE, counted(&[func_type(&[I32], &[I32])])),
        section(SEC_FUNCTION, counted(&[uleb(0), uleb(0)])),
        section(SEC_EXPORT, counted(&[export_func("call_doubler", 0)])),
        section(
            SEC_CODE,
            counted(&[
                body(&[], &concat(&[local_get(0), call(1), vec![END]])),
                body(
                    &[],
                    &concat(&[local_get(0), local_get(0), vec![I32_ADD], vec![END]]),
                ),
            ]),
        ),
    ])
}

/// Imports `env.add : (i32) -> i32` and exports `call_add`, which forwards
/// its argument to the import.
pub fn host_call_module() -> Vec<u8> {
    module(&[
        section(SEC_TYPE, counted(&[func_type(&[I32], &[I32])])),
        section(SEC_IMPORT, counted(&[import_func("env", "add", 0)])),
        section(SEC_FUNCTION, counted(&[uleb(0)])),
        section(SEC_EXPORT, counted(&[export_func("call_add", 1)])),
        section(
            SEC_CODE,
            counted(&[body(&[], &concat(&[local_get(0), call(0), vec![END]]))]),
        ),
    ])
}

/// One page of memory plus one data segment at offset 16.
pub fn data_module() -> Vec<u8> {
    module(&[
        section(SEC_MEMORY, counted(&[vec![0x00, 0x01]])),
        section(
            SEC_DATA,
            counted(&[data_segment(0, 16, &[0xDE, 0xAD, 0xBE, 0xEF])]),
        ),
    ])
}

/// One page of memory; exports `poke(addr, value)` (i32.store) and
/// `add(a, b) -> a + b`.
pub fn memory_module() -> Vec<u8> {
    module(&[
        section(
            SEC_TYPE,
            counted(&[
                func_type(&[I32, I32], &[]),
                func_type(&[I32, I32], &[I32]),
            ]),
        ),
        section(SEC_FUNCTION, counted(&[uleb(0), uleb(1)])),
        section(SEC_MEMORY, counted(&[vec![0x00, 0x01]])),
        section(
            SEC_EXPORT,
            counted(&[export_func("poke", 0), export_func("add", 1)]),
        ),
        section(
            SEC_CODE,
            counted(&[
                body(
                    &[],
                    &concat(&[local_get(0), local_get(1), i32_store(2, 0), vec![END]]),
                ),
                body(
                    &[],
                    &concat(&[local_get(0), local_get(1), vec![I32_ADD], vec![END]]),
                ),
            ]),
        ),
    ])
}

/// Exports `echo`, which copies its argument through a declared local.
pub fn local_set_module() -> Vec<u8> {
    module(&[
        section(SEC_TYPE, counted(&[func_type(&[I32], &[I32])])),
        section(SEC_FUNCTION, counted(&[uleb(0)])),
        section(SEC_EXPORT, counted(&[export_func("echo", 0)])),
        section(
            SEC_CODE,
            counted(&[body(
                &[(1, I32)],
                &concat(&[local_get(0), local_set(1), local_get(1), vec![END]]),
            )]),
        ),
    ])
}

/// Exports `konst() -> i32` returning the given constant.
pub fn const_module(v: i32) -> Vec<u8> {
    module(&[
        section(SEC_TYPE, counted(&[func_type(&[], &[I32])])),
        section(SEC_FUNCTION, counted(&[uleb(0)])),
        section(SEC_EXPORT, counted(&[export_func("konst", 0)])),
        section(
            SEC_CODE,
            counted(&[body(&[], &concat(&[i32_const(v), vec![END]]))]),
        ),
    ])
}
