//! bert-term: BERT (Binary ERlang Term) encoding for Rust.
//!
//! This crate provides a small encoder and decoder for the subset of the
//! Erlang external term format used by BERT and BERT-RPC: integers,
//! floats, atoms, binaries, tuples, and proper lists, plus the BERT
//! complex types `{bert, nil}`, `{bert, true}` and `{bert, false}`. It
//! also provides BERP framing (4-byte big-endian length prefix) over
//! arbitrary byte streams.
//!
//! Quick start: encode a term
//!
//! ```
//! use bert_term::{encode, decode, Value};
//!
//! let term = Value::Tuple(vec![
//!     Value::atom("reply"),
//!     Value::List(vec![Value::Int(1), Value::Int(2)]),
//! ]);
//! let bytes = encode(&term).expect("encode ok");
//! assert_eq!(decode(&bytes).expect("decode ok"), term);
//! ```
//!
//! Floats always encode as the 8-byte big-endian IEEE-754 `NEW_FLOAT`
//! representation; the legacy 31-byte string float is accepted on decode
//! only.
//!
//! See <https://www.erlang.org/doc/apps/erts/erl_ext_dist.html> for the
//! format and <http://bert-rpc.org/> for the BERT conventions.

pub mod berp;
pub mod decode;
pub mod encode;
pub mod tag;
pub mod value;

pub use berp::{read_frame, write_frame, MAX_FRAME_LEN};
pub use decode::{decode, TermError};
pub use encode::encode;
pub use value::Value;

/// Crate-level result type using the decode error.
pub type Result<T> = std::result::Result<T, TermError>;
