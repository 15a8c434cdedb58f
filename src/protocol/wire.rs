//! Wire primitives: identifiers, strings and entry values.
//!
//! Decoders read from any [`Buf`] and report [`CodecError::Incomplete`] when
//! the buffer runs out, leaving the caller to retry once more bytes arrive. A
//! long string cut short reports [`CodecError::OpenString`] instead, since
//! only a terminator can complete it.

use bytes::{Buf, BufMut};

use super::{CODE_BOOL_FALSE, CODE_BOOL_TRUE, CODE_DOUBLE, CODE_INT};
use crate::core::{CodecError, Entry, Id};

/// Leading byte of a long, null-terminated string
pub const BEGIN_STRING: u8 = 0xff;
/// Terminator of a long string
pub const END_STRING: u8 = 0x00;

type Result<T> = std::result::Result<T, CodecError>;

fn get_u8<B: Buf>(src: &mut B) -> Result<u8> {
    if !src.has_remaining() {
        return Err(CodecError::Incomplete);
    }
    Ok(src.get_u8())
}

/// Writes `id` in the namespace selected by `mask`.
///
/// Small IDs fit in the leading byte itself. Larger ones use a leading byte
/// whose low two bits give the number of trailing big-endian bytes, minus one.
pub fn put_id<B: BufMut>(dst: &mut B, mask: u8, id: Id) {
    if id < Id::from(mask - 4) {
        dst.put_u8(mask | id as u8);
        return;
    }

    let len: u8 = match id {
        0..=0xff => 1,
        0x100..=0xffff => 2,
        0x1_0000..=0xff_ffff => 3,
        _ => 4,
    };
    dst.put_u8(mask | ((mask - 1) & !0x03) | (len - 1));
    dst.put_uint(u64::from(id), usize::from(len));
}

/// Reads an ID in the namespace selected by `mask`
pub fn get_id<B: Buf>(src: &mut B, mask: u8) -> Result<Id> {
    let lead = get_u8(src)? & !mask;
    if lead < mask - 4 {
        return Ok(Id::from(lead));
    }

    let len = usize::from(lead & 0x03) + 1;
    if src.remaining() < len {
        return Err(CodecError::Incomplete);
    }
    Ok(src.get_uint(len) as Id)
}

/// Writes `s`, refusing strings with an embedded null before emitting anything
pub fn put_string<B: BufMut>(dst: &mut B, s: &str) -> Result<()> {
    check_string(s)?;

    let bytes = s.as_bytes();
    if bytes.len() < usize::from(BEGIN_STRING) {
        dst.put_u8(bytes.len() as u8);
        dst.put_slice(bytes);
    } else {
        dst.put_u8(BEGIN_STRING);
        dst.put_slice(bytes);
        dst.put_u8(END_STRING);
    }
    Ok(())
}

/// Rejects strings the wire format cannot represent
pub fn check_string(s: &str) -> Result<()> {
    if s.as_bytes().contains(&0) {
        return Err(CodecError::NullInString);
    }
    Ok(())
}

/// Reads a string in either the short or the long form
pub fn get_string<B: Buf>(src: &mut B) -> Result<String> {
    let len = get_u8(src)?;
    if len < BEGIN_STRING {
        let len = usize::from(len);
        if src.remaining() < len {
            return Err(CodecError::Incomplete);
        }
        let bytes = src.copy_to_bytes(len);
        return Ok(String::from_utf8_lossy(&bytes).into_owned());
    }

    let mut buf = Vec::new();
    loop {
        if !src.has_remaining() {
            return Err(CodecError::OpenString);
        }
        match src.get_u8() {
            END_STRING => break,
            b => buf.push(b),
        }
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Writes an entry with its tag byte
pub fn put_entry<B: BufMut>(dst: &mut B, entry: &Entry) {
    match *entry {
        Entry::Bool(false) => dst.put_u8(CODE_BOOL_FALSE),
        Entry::Bool(true) => dst.put_u8(CODE_BOOL_TRUE),
        Entry::Int(i) => {
            dst.put_u8(CODE_INT);
            dst.put_i32(i);
        }
        Entry::Double(n) => {
            dst.put_u8(CODE_DOUBLE);
            dst.put_f64(n);
        }
    }
}

/// Reads a tagged entry
pub fn get_entry<B: Buf>(src: &mut B) -> Result<Entry> {
    match get_u8(src)? {
        CODE_BOOL_FALSE => Ok(Entry::Bool(false)),
        CODE_BOOL_TRUE => Ok(Entry::Bool(true)),
        CODE_INT => {
            if src.remaining() < 4 {
                return Err(CodecError::Incomplete);
            }
            Ok(Entry::Int(src.get_i32()))
        }
        CODE_DOUBLE => {
            if src.remaining() < 8 {
                return Err(CodecError::Incomplete);
            }
            Ok(Entry::Double(src.get_f64()))
        }
        code => Err(CodecError::UnrecognizedEntryCode(code)),
    }
}
