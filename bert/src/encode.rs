//! Encoder producing external term format bytes from a [`Value`].

use crate::decode::TermError;
use crate::tag;
use crate::value::Value;
use crate::Result;

/// Encode a complete term, including the leading version magic byte.
pub fn encode(value: &Value) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(64);
    out.push(tag::VERSION_MAGIC);
    write_value(value, &mut out)?;
    Ok(out)
}

fn write_value(value: &Value, out: &mut Vec<u8>) -> Result<()> {
    match value {
        Value::Int(v) => write_int(*v, out),
        Value::Float(v) => {
            out.push(tag::NEW_FLOAT);
            out.extend_from_slice(&v.to_be_bytes());
        }
        Value::Atom(name) => write_atom(name, out)?,
        Value::Binary(bytes) => {
            if bytes.len() > u32::MAX as usize {
                return Err(TermError::Invalid("binary too long"));
            }
            out.push(tag::BINARY);
            out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
            out.extend_from_slice(bytes);
        }
        Value::Tuple(fields) => {
            write_tuple_header(fields.len(), out)?;
            for f in fields {
                write_value(f, out)?;
            }
        }
        Value::List(elems) => {
            if elems.is_empty() {
                out.push(tag::NIL);
            } else {
                if elems.len() > u32::MAX as usize {
                    return Err(TermError::Invalid("list too long"));
                }
                out.push(tag::LIST);
                out.extend_from_slice(&(elems.len() as u32).to_be_bytes());
                for e in elems {
                    write_value(e, out)?;
                }
                out.push(tag::NIL);
            }
        }
        Value::Bool(b) => {
            write_tuple_header(2, out)?;
            write_atom("bert", out)?;
            write_atom(if *b { "true" } else { "false" }, out)?;
        }
        Value::Nil => {
            write_tuple_header(2, out)?;
            write_atom("bert", out)?;
            write_atom("nil", out)?;
        }
    }
    Ok(())
}

fn write_tuple_header(arity: usize, out: &mut Vec<u8>) -> Result<()> {
    if arity <= u8::MAX as usize {
        out.push(tag::SMALL_TUPLE);
        out.push(arity as u8);
    } else if arity <= u32::MAX as usize {
        out.push(tag::LARGE_TUPLE);
        out.extend_from_slice(&(arity as u32).to_be_bytes());
    } else {
        return Err(TermError::Invalid("tuple arity too large"));
    }
    Ok(())
}

fn write_atom(name: &str, out: &mut Vec<u8>) -> Result<()> {
    let bytes = name.as_bytes();
    if bytes.len() <= u8::MAX as usize {
        out.push(tag::SMALL_ATOM_UTF8);
        out.push(bytes.len() as u8);
    } else if bytes.len() <= u16::MAX as usize {
        out.push(tag::ATOM_UTF8);
        out.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
    } else {
        return Err(TermError::Invalid("atom name too long"));
    }
    out.extend_from_slice(bytes);
    Ok(())
}

fn write_int(v: i64, out: &mut Vec<u8>) {
    if (0..=255).contains(&v) {
        out.push(tag::SMALL_INTEGER);
        out.push(v as u8);
    } else if (i32::MIN as i64..=i32::MAX as i64).contains(&v) {
        out.push(tag::INTEGER);
        out.extend_from_slice(&(v as i32).to_be_bytes());
    } else {
        // SMALL_BIG: digit count, sign, little-endian magnitude
        let sign = if v < 0 { 1u8 } else { 0u8 };
        let mag = v.unsigned_abs();
        let mut digits = mag.to_le_bytes().to_vec();
        while digits.len() > 1 && digits.last() == Some(&0) {
            digits.pop();
        }
        out.push(tag::SMALL_BIG);
        out.push(digits.len() as u8);
        out.push(sign);
        out.extend_from_slice(&digits);
    }
}
