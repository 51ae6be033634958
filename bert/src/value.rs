//! The in-memory representation of a decoded BERT term.

use std::fmt;

/// A single BERT term.
///
/// `Bool` and `Nil` correspond to the BERT complex types
/// `{bert, true}`, `{bert, false}` and `{bert, nil}`; they are folded
/// into dedicated variants on decode so callers never pattern-match the
/// `bert` marker atom themselves.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Signed integer. Encodes as the smallest of
    /// `SMALL_INTEGER`/`INTEGER`/`SMALL_BIG` that fits.
    Int(i64),
    /// 64-bit float; always `NEW_FLOAT` on the wire.
    Float(f64),
    /// Atom (interned symbol).
    Atom(String),
    /// Opaque byte sequence. Strings travel as binaries in BERT.
    Binary(Vec<u8>),
    /// Fixed-arity ordered sequence.
    Tuple(Vec<Value>),
    /// Proper list.
    List(Vec<Value>),
    /// `{bert, true}` / `{bert, false}`.
    Bool(bool),
    /// `{bert, nil}`.
    Nil,
}

impl Value {
    /// Atom constructor accepting anything stringly.
    pub fn atom<S: Into<String>>(name: S) -> Self {
        Value::Atom(name.into())
    }

    /// Binary constructor from a UTF-8 string.
    pub fn string<S: AsRef<str>>(s: S) -> Self {
        Value::Binary(s.as_ref().as_bytes().to_vec())
    }

    /// The atom's name, if this is an atom.
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Value::Atom(name) => Some(name),
            _ => None,
        }
    }

    /// The binary's bytes interpreted as UTF-8, if this is a binary.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Binary(bytes) => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }

    /// The integer value, if this is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The tuple's fields, if this is a tuple.
    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(fields) => Some(fields),
            _ => None,
        }
    }

    /// The list's elements, if this is a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(elems) => Some(elems),
            _ => None,
        }
    }

    /// The boolean value, if this is `{bert, true}` or `{bert, false}`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// True for `{bert, nil}`.
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Atom(name) => write!(f, "{}", name),
            Value::Binary(bytes) => match std::str::from_utf8(bytes) {
                Ok(s) => write!(f, "{:?}", s),
                Err(_) => write!(f, "<<{} bytes>>", bytes.len()),
            },
            Value::Tuple(fields) => {
                write!(f, "{{")?;
                for (i, v) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "}}")
            }
            Value::List(elems) => {
                write!(f, "[")?;
                for (i, v) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
            Value::Bool(b) => write!(f, "{}", b),
            Value::Nil => write!(f, "nil"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::string(v)
    }
}
