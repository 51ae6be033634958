//! BERP framing: 4-byte big-endian length prefix ahead of each term.

use std::io::{Read, Write};

use crate::decode::TermError;
use crate::Result;

/// Upper bound on a single frame's payload, to keep a malformed or
/// hostile peer from forcing an enormous allocation.
pub const MAX_FRAME_LEN: usize = 64 * 1024 * 1024;

/// Read one length-prefixed frame, returning its payload bytes.
pub fn read_frame<R: Read>(r: &mut R) -> Result<Vec<u8>> {
    let mut len_buf = [0u8; 4];
    r.read_exact(&mut len_buf)?;
    let len = u32::from_be_bytes(len_buf) as usize;
    if len > MAX_FRAME_LEN {
        return Err(TermError::Invalid("frame exceeds maximum length"));
    }
    let mut payload = vec![0u8; len];
    r.read_exact(&mut payload)?;
    Ok(payload)
}

/// Write one length-prefixed frame.
pub fn write_frame<W: Write>(w: &mut W, payload: &[u8]) -> Result<()> {
    if payload.len() > MAX_FRAME_LEN {
        return Err(TermError::Invalid("frame exceeds maximum length"));
    }
    w.write_all(&(payload.len() as u32).to_be_bytes())?;
    w.write_all(payload)?;
    w.flush()?;
    Ok(())
}
