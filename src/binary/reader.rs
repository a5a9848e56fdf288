//! Prefix-counted vectors, names, and owned byte payloads.

use super::{cursor::Cursor, leb128, ReadError, Result};

/// Read a vector of `T` using the provided element reader. The length is a
/// ULEB128 u32 prefix, as in every Wasm section list.
pub fn read_vec<T, F>(cur: &mut Cursor, mut elem: F) -> Result<Vec<T>>
where
    F: FnMut(&mut Cursor) -> Result<T>,
{
    let len = leb128::read_u32(cur)? as usize;
    let mut out = Vec::with_capacity(len);
    for _ in 0..len {
        out.push(elem(cur)?);
    }
    Ok(out)
}

/// Read a length-prefixed byte payload into an owned buffer.
pub fn read_payload(cur: &mut Cursor) -> Result<Vec<u8>> {
    let len = leb128::read_u32(cur)? as usize;
    Ok(cur.read_bytes(len)?.to_vec())
}

/// Read a length-prefixed UTF-8 name.
pub fn read_name(cur: &mut Cursor) -> Result<String> {
    let bytes = read_payload(cur)?;
    String::from_utf8(bytes).map_err(|_| ReadError::InvalidUtf8 {
        offset: cur.offset(),
    })
}
