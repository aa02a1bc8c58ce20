//! A small, order-preserving MessagePack encoder for a restricted type set.
//!
//! Only encoding is in scope — no decoder. The accepted type set is
//! exactly `Nil | Bool | Int | Bytes | Str | Array | Map`; anything else is an
//! `Error::Unsupported`. Map order is always the caller's insertion order —
//! `Value::Map` is backed by `indexmap::IndexMap` for exactly this property.

use indexmap::IndexMap;

use crate::error::{Error, Result};

/// The accepted MessagePack input type set.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    /// Covers both the signed and unsigned MessagePack integer families; the
    /// wire width is chosen from the numeric value, not from how the caller
    /// constructed this variant.
    Int(i128),
    Bytes(Vec<u8>),
    Str(String),
    Array(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v as i128)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Int(v as i128)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

/// Encodes `value` into its MessagePack wire representation.
///
/// Bool is matched before the integer branch — in some languages a boolean
/// compares equal to an integer branch guard, so the dispatch order matters
/// even though Rust's `enum` match makes the ambiguity moot here.
#[tracing::instrument(level = "trace", skip(value))]
pub fn pack(value: &Value) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    pack_into(value, &mut out)?;
    Ok(out)
}

fn pack_into(value: &Value, out: &mut Vec<u8>) -> Result<()> {
    match value {
        Value::Nil => out.push(0xc0),
        Value::Bool(b) => out.push(if *b { 0xc3 } else { 0xc2 }),
        Value::Int(i) => pack_int(*i, out)?,
        Value::Bytes(b) => pack_str_like(b, out),
        Value::Str(s) => pack_str_like(s.as_bytes(), out),
        Value::Array(items) => {
            pack_len(items.len(), [0x90, 0xdc, 0xdd], out)?;
            for item in items {
                pack_into(item, out)?;
            }
        }
        Value::Map(pairs) => {
            pack_len(pairs.len(), [0x80, 0xde, 0xdf], out)?;
            for (k, v) in pairs {
                pack_str_like(k.as_bytes(), out);
                pack_into(v, out)?;
            }
        }
    }
    Ok(())
}

fn pack_int(v: i128, out: &mut Vec<u8>) -> Result<()> {
    if (0..=127).contains(&v) {
        out.push(v as u8);
    } else if (-32..0).contains(&v) {
        out.push(((0x100 + v) & 0xFF) as u8);
    } else if v >= 0 {
        let v = v as u64;
        if v <= u8::MAX as u64 {
            out.push(0xcc);
            out.push(v as u8);
        } else if v <= u16::MAX as u64 {
            out.push(0xcd);
            out.extend_from_slice(&(v as u16).to_be_bytes());
        } else if v <= u32::MAX as u64 {
            out.push(0xce);
            out.extend_from_slice(&(v as u32).to_be_bytes());
        } else {
            out.push(0xcf);
            out.extend_from_slice(&v.to_be_bytes());
        }
    } else {
        if v < i64::MIN as i128 {
            return Err(Error::InputRange("integer below i64::MIN is unsupported"));
        }
        let v = v as i64;
        if v >= i8::MIN as i64 {
            out.push(0xd0);
            out.push(v as i8 as u8);
        } else if v >= i16::MIN as i64 {
            out.push(0xd1);
            out.extend_from_slice(&(v as i16).to_be_bytes());
        } else if v >= i32::MIN as i64 {
            out.push(0xd2);
            out.extend_from_slice(&(v as i32).to_be_bytes());
        } else {
            out.push(0xd3);
            out.extend_from_slice(&v.to_be_bytes());
        }
    }
    Ok(())
}

/// Strings and byte-strings share a wire encoding in this subset encoder —
/// the dedicated bin family (`C4/C5/C6`) is not used here.
fn pack_str_like(bytes: &[u8], out: &mut Vec<u8>) {
    let len = bytes.len();
    if len <= 31 {
        out.push(0xa0 | len as u8);
    } else if len <= 0xFFFF {
        out.push(0xda);
        out.extend_from_slice(&(len as u16).to_be_bytes());
    } else {
        out.push(0xdb);
        out.extend_from_slice(&(len as u32).to_be_bytes());
    }
    out.extend_from_slice(bytes);
}

fn pack_len(len: usize, tags: [u8; 3], out: &mut Vec<u8>) -> Result<()> {
    if len <= 15 {
        out.push(tags[0] | len as u8);
    } else if len <= 0xFFFF {
        out.push(tags[1]);
        out.extend_from_slice(&(len as u16).to_be_bytes());
    } else if len <= u32::MAX as usize {
        out.push(tags[2]);
        out.extend_from_slice(&(len as u32).to_be_bytes());
    } else {
        return Err(Error::InputShape("container length exceeds u32::MAX"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: Vec<(&str, Value)>) -> Value {
        let mut m = IndexMap::new();
        for (k, v) in pairs {
            m.insert(k.to_owned(), v);
        }
        Value::Map(m)
    }

    #[test]
    fn empty_map() {
        assert_eq!(pack(&map(vec![])).unwrap(), vec![0x80]);
    }

    #[test]
    fn single_key_map() {
        assert_eq!(
            pack(&map(vec![("a", Value::Int(1))])).unwrap(),
            vec![0x81, 0xa1, 0x61, 0x01]
        );
    }

    #[test]
    fn mixed_array() {
        assert_eq!(
            pack(&Value::Array(vec![Value::Int(1), Value::Str("x".into())])).unwrap(),
            vec![0x92, 0x01, 0xa1, 0x78]
        );
    }

    #[test]
    fn negative_one() {
        assert_eq!(pack(&Value::Int(-1)).unwrap(), vec![0xff]);
    }

    #[test]
    fn uint8_boundary() {
        assert_eq!(pack(&Value::Int(128)).unwrap(), vec![0xcc, 0x80]);
    }

    #[test]
    fn uint16_boundary() {
        assert_eq!(pack(&Value::Int(256)).unwrap(), vec![0xcd, 0x01, 0x00]);
    }

    #[test]
    fn bool_is_not_confused_with_int() {
        assert_eq!(pack(&Value::Bool(false)).unwrap(), vec![0xc2]);
        assert_eq!(pack(&Value::Bool(true)).unwrap(), vec![0xc3]);
    }

    #[test]
    fn map_preserves_insertion_order() {
        let forward = map(vec![("z", Value::Int(1)), ("a", Value::Int(2))]);
        let reversed = map(vec![("a", Value::Int(2)), ("z", Value::Int(1))]);
        assert_ne!(pack(&forward).unwrap(), pack(&reversed).unwrap());
    }

    #[test]
    fn long_string_uses_str16() {
        let s = "x".repeat(32);
        let encoded = pack(&Value::Str(s.clone())).unwrap();
        assert_eq!(encoded[0], 0xda);
        assert_eq!(&encoded[3..], s.as_bytes());
    }
}
