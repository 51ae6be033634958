//! Error taxonomy shared by the codec, protocol, server, and client.

use std::fmt;

/// Errors raised by this crate.
///
/// Boolean-returning protocol operations never produce an error for
/// "value not found": absence is `false` or an empty list. Only
/// protocol-level violations surface here.
#[derive(Debug)]
pub enum Error {
    /// A tagged term had a shape the codec does not recognize.
    InvalidTermEncoding(String),
    /// An operation that only supports whole-store semantics was
    /// invoked with a named-graph restriction.
    UnsupportedScope(&'static str),
    /// The dispatcher received an operation name with no handler.
    UnknownOperation(String),
    /// A failure reported by the remote peer.
    Remote {
        kind: String,
        code: i64,
        class: String,
        detail: String,
    },
    /// Underlying I/O error on the transport.
    Io(std::io::Error),
    /// The generic term layer rejected the bytes.
    Term(bert_term::TermError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidTermEncoding(m) => write!(f, "invalid term encoding: {}", m),
            Error::UnsupportedScope(op) => {
                write!(f, "{}: named-graph scoping is not supported", op)
            }
            Error::UnknownOperation(name) => write!(f, "unknown operation: {}", name),
            Error::Remote {
                kind,
                code,
                class,
                detail,
            } => write!(f, "remote {} error {} ({}): {}", kind, code, class, detail),
            Error::Io(e) => write!(f, "{}", e),
            Error::Term(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Term(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<bert_term::TermError> for Error {
    fn from(e: bert_term::TermError) -> Self {
        Error::Term(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
