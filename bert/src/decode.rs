//! Decoder turning external term format bytes back into a [`Value`].
//!
//! Decoding is strict: unknown tags, truncated payloads, improper lists
//! and out-of-range bignums are all reported as errors rather than
//! coerced. The decoder bounds recursion so adversarial nesting cannot
//! overflow the stack.

use std::fmt;

use crate::tag;
use crate::value::Value;

/// Maximum nesting depth accepted by the decoder.
const MAX_DEPTH: usize = 200;

/// Errors that can arise when decoding external term format bytes.
#[derive(Debug)]
pub enum TermError {
    /// Underlying I/O error (framing helpers only).
    Io(std::io::Error),
    /// Structural problem with the term or an unsupported feature.
    Invalid(&'static str),
    /// The input ended before the term was complete.
    Truncated,
    /// A tag byte this crate does not recognize.
    BadTag(u8),
    /// Nesting deeper than [`MAX_DEPTH`].
    TooDeep,
}

impl fmt::Display for TermError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermError::Io(e) => write!(f, "{}", e),
            TermError::Invalid(m) => write!(f, "{}", m),
            TermError::Truncated => write!(f, "truncated term"),
            TermError::BadTag(t) => write!(f, "unrecognized tag byte {}", t),
            TermError::TooDeep => write!(f, "term nesting too deep"),
        }
    }
}
impl std::error::Error for TermError {}
impl From<std::io::Error> for TermError {
    fn from(e: std::io::Error) -> Self {
        TermError::Io(e)
    }
}

type Result<T> = std::result::Result<T, TermError>;

struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).ok_or(TermError::Truncated)?;
        if end > self.buf.len() {
            return Err(TermError::Truncated);
        }
        let s = &self.buf[self.pos..end];
        self.pos = end;
        Ok(s)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn u16_be(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32_be(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }
}

/// Decode a complete term, expecting the leading version magic byte and
/// consuming the whole input.
pub fn decode(buf: &[u8]) -> Result<Value> {
    let mut cur = Cursor { buf, pos: 0 };
    if cur.u8()? != tag::VERSION_MAGIC {
        return Err(TermError::Invalid("missing version magic"));
    }
    let v = read_value(&mut cur, 0)?;
    if cur.pos != buf.len() {
        return Err(TermError::Invalid("trailing bytes after term"));
    }
    Ok(v)
}

fn read_value(cur: &mut Cursor<'_>, depth: usize) -> Result<Value> {
    if depth > MAX_DEPTH {
        return Err(TermError::TooDeep);
    }
    let t = cur.u8()?;
    match t {
        tag::SMALL_INTEGER => Ok(Value::Int(cur.u8()? as i64)),
        tag::INTEGER => {
            let b = cur.take(4)?;
            Ok(Value::Int(i32::from_be_bytes([b[0], b[1], b[2], b[3]]) as i64))
        }
        tag::SMALL_BIG | tag::LARGE_BIG => {
            let n = if t == tag::SMALL_BIG {
                cur.u8()? as usize
            } else {
                cur.u32_be()? as usize
            };
            let sign = cur.u8()?;
            read_big(cur.take(n)?, sign)
        }
        tag::NEW_FLOAT => {
            let b = cur.take(8)?;
            let mut raw = [0u8; 8];
            raw.copy_from_slice(b);
            Ok(Value::Float(f64::from_be_bytes(raw)))
        }
        tag::FLOAT => {
            // Legacy 31-byte NUL-padded decimal string.
            let b = cur.take(31)?;
            let end = b.iter().position(|&c| c == 0).unwrap_or(31);
            let s = std::str::from_utf8(&b[..end])
                .map_err(|_| TermError::Invalid("legacy float not ASCII"))?;
            s.trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| TermError::Invalid("legacy float unparsable"))
        }
        tag::ATOM | tag::SMALL_ATOM => {
            let n = if t == tag::ATOM {
                cur.u16_be()? as usize
            } else {
                cur.u8()? as usize
            };
            // Latin-1: each byte maps directly to the same code point.
            let name: String = cur.take(n)?.iter().map(|&b| b as char).collect();
            Ok(Value::Atom(name))
        }
        tag::ATOM_UTF8 | tag::SMALL_ATOM_UTF8 => {
            let n = if t == tag::ATOM_UTF8 {
                cur.u16_be()? as usize
            } else {
                cur.u8()? as usize
            };
            let name = std::str::from_utf8(cur.take(n)?)
                .map_err(|_| TermError::Invalid("atom not UTF-8"))?;
            Ok(Value::Atom(name.to_string()))
        }
        tag::BINARY => {
            let n = cur.u32_be()? as usize;
            Ok(Value::Binary(cur.take(n)?.to_vec()))
        }
        tag::SMALL_TUPLE | tag::LARGE_TUPLE => {
            let arity = if t == tag::SMALL_TUPLE {
                cur.u8()? as usize
            } else {
                cur.u32_be()? as usize
            };
            let mut fields = Vec::with_capacity(arity.min(64));
            for _ in 0..arity {
                fields.push(read_value(cur, depth + 1)?);
            }
            Ok(fold_complex(fields))
        }
        tag::NIL => Ok(Value::List(Vec::new())),
        tag::STRING => {
            let n = cur.u16_be()? as usize;
            let elems = cur.take(n)?.iter().map(|&b| Value::Int(b as i64)).collect();
            Ok(Value::List(elems))
        }
        tag::LIST => {
            let n = cur.u32_be()? as usize;
            let mut elems = Vec::with_capacity(n.min(1024));
            for _ in 0..n {
                elems.push(read_value(cur, depth + 1)?);
            }
            match read_value(cur, depth + 1)? {
                Value::List(tail) if tail.is_empty() => Ok(Value::List(elems)),
                _ => Err(TermError::Invalid("improper list tail")),
            }
        }
        other => Err(TermError::BadTag(other)),
    }
}

/// Interpret a little-endian bignum magnitude, rejecting values outside
/// the i64 range.
fn read_big(digits: &[u8], sign: u8) -> Result<Value> {
    let mut mag: u64 = 0;
    for (i, &d) in digits.iter().enumerate() {
        if d != 0 {
            if i >= 8 {
                return Err(TermError::Invalid("bignum exceeds 64 bits"));
            }
            mag |= (d as u64) << (8 * i);
        }
    }
    let v = if sign == 0 {
        i64::try_from(mag).map_err(|_| TermError::Invalid("bignum exceeds i64 range"))?
    } else {
        // -(i64::MIN) has no i64 representation, so negate in i128.
        i64::try_from(-(mag as i128))
            .map_err(|_| TermError::Invalid("bignum exceeds i64 range"))?
    };
    Ok(Value::Int(v))
}

/// Collapse the BERT complex-type tuples into their dedicated variants.
fn fold_complex(fields: Vec<Value>) -> Value {
    if fields.len() == 2 {
        if let (Some("bert"), Some(name)) = (fields[0].as_atom(), fields[1].as_atom()) {
            match name {
                "nil" => return Value::Nil,
                "true" => return Value::Bool(true),
                "false" => return Value::Bool(false),
                _ => {}
            }
        }
    }
    Value::Tuple(fields)
}
