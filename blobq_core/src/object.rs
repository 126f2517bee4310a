//! Canonical object framing.
//!
//! Every object is hashed and stored as:
//!
//! ```text
//! <kind> SP <decimal size> NUL <payload>
//! ```
//!
//! e.g. `blob 3\0hi\n`. The header is ASCII; the payload is raw bytes whose
//! length must equal the declared size.

use crate::error::{Error, Result};
use std::fmt;

/// Separator between kind and size.
const SPACE: u8 = b' ';

/// Terminator of the header.
const NUL: u8 = 0;

/// Object kinds produced by this store.
///
/// Framing itself is tag-generic and accepts any kind string; this enum only
/// names the kinds the store creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// A blob (file content).
    Blob,
}

impl ObjectKind {
    /// Get the string tag of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Blob => "blob",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded object: kind, declared size and payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    /// Kind tag from the header (e.g. "blob").
    pub kind: String,
    /// Declared payload size; always equal to `payload.len()`.
    pub size: usize,
    /// Raw payload bytes.
    pub payload: Vec<u8>,
}

/// Check that a kind can appear in a header.
fn validate_kind(kind: &str) -> Result<()> {
    if kind.is_empty() || kind.bytes().any(|b| b == SPACE || b == NUL) {
        return Err(Error::invalid_kind(kind));
    }
    Ok(())
}

/// Encode the `<kind> <size>\0` header alone.
pub fn encode_header(kind: &str, size: usize) -> Result<Vec<u8>> {
    validate_kind(kind)?;
    let mut header = Vec::with_capacity(kind.len() + 22);
    header.extend_from_slice(kind.as_bytes());
    header.push(SPACE);
    header.extend_from_slice(size.to_string().as_bytes());
    header.push(NUL);
    Ok(header)
}

/// Build the full framed bytes for an object.
pub fn encode(kind: &str, payload: &[u8]) -> Result<Vec<u8>> {
    let header = encode_header(kind, payload.len())?;
    let mut framed = Vec::with_capacity(header.len() + payload.len());
    framed.extend_from_slice(&header);
    framed.extend_from_slice(payload);
    Ok(framed)
}

/// Parse framed bytes back into an [`Object`].
pub fn decode(framed: &[u8]) -> Result<Object> {
    let nul = framed
        .iter()
        .position(|&b| b == NUL)
        .ok_or_else(|| Error::malformed_object("missing NUL after header"))?;
    let (header, rest) = framed.split_at(nul);
    let payload = &rest[1..];

    let header = std::str::from_utf8(header)
        .map_err(|_| Error::malformed_object("header is not valid ASCII"))?;
    let (kind, size_str) = header
        .split_once(' ')
        .ok_or_else(|| Error::malformed_object(format!("header {:?} has no size", header)))?;

    if kind.is_empty() {
        return Err(Error::malformed_object("empty kind in header"));
    }

    // str::parse would also accept a leading '+'
    if size_str.is_empty() || !size_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::malformed_object(format!(
            "invalid size {:?} in header",
            size_str
        )));
    }
    let size: usize = size_str
        .parse()
        .map_err(|_| Error::malformed_object(format!("size {} out of range", size_str)))?;

    if payload.len() != size {
        return Err(Error::malformed_object(format!(
            "size mismatch: header declares {}, payload has {}",
            size,
            payload.len()
        )));
    }

    Ok(Object {
        kind: kind.to_string(),
        size,
        payload: payload.to_vec(),
    })
}
