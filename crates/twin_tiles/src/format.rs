//! Shared layout primitives of the binary tile formats
//!
//! Every tile starts with the same 12 bytes: a four-byte ASCII magic, a
//! little-endian version, and the total tile byte length. Formats differ
//! only in the fields that follow and in how the body is sliced.

use std::borrow::Cow;

use serde_json::Value;

use crate::error::{Result, TileError};

/// Read a little-endian u32, bounds-checked
pub(crate) fn read_u32_le(data: &[u8], offset: usize) -> Result<u32> {
    let end = offset.checked_add(4).ok_or(TileError::Truncated {
        offset,
        needed: 4,
        len: data.len(),
    })?;
    let bytes = data.get(offset..end).ok_or(TileError::Truncated {
        offset,
        needed: 4,
        len: data.len(),
    })?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Slice `len` bytes starting at `offset`, bounds-checked
pub(crate) fn section(data: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    let end = offset.checked_add(len).ok_or(TileError::Truncated {
        offset,
        needed: len,
        len: data.len(),
    })?;
    data.get(offset..end).ok_or(TileError::Truncated {
        offset,
        needed: len,
        len: data.len(),
    })
}

/// Four-byte magic of the tile at the head of `data`
pub fn tile_magic(data: &[u8]) -> Result<&[u8]> {
    section(data, 0, 4)
}

/// The 12-byte prelude common to every tile format
#[derive(Clone, Copy, Debug)]
pub struct TileHeader {
    pub version: u32,
    pub byte_length: usize,
}

impl TileHeader {
    /// Parse the prelude and verify magic and version
    pub fn read(data: &[u8], expected_magic: &[u8; 4]) -> Result<Self> {
        let magic = tile_magic(data)?;
        if magic != expected_magic {
            return Err(TileError::InvalidMagic {
                expected: String::from_utf8_lossy(expected_magic).into_owned(),
                actual: String::from_utf8_lossy(magic).into_owned(),
            });
        }
        let version = read_u32_le(data, 4)?;
        if version != 1 {
            return Err(TileError::InvalidVersion(version));
        }
        let byte_length = read_u32_le(data, 8)? as usize;
        Ok(Self {
            version,
            byte_length,
        })
    }
}

/// A feature or batch table: the JSON chunk and its binary companion
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableSection<'a> {
    pub json: Cow<'a, [u8]>,
    pub binary: &'a [u8],
}

impl<'a> TableSection<'a> {
    pub(crate) fn new(json: &'a [u8], binary: &'a [u8]) -> Self {
        Self {
            json: Cow::Borrowed(json),
            binary,
        }
    }

    pub(crate) fn synthesized(json: Vec<u8>) -> Self {
        Self {
            json: Cow::Owned(json),
            binary: &[],
        }
    }

    /// Parse the JSON chunk; an empty section parses as `{}`
    pub fn json_value(&self) -> Result<Value> {
        if self.json.is_empty() {
            return Ok(Value::Object(Default::default()));
        }
        Ok(serde_json::from_slice(&self.json)?)
    }
}

/// Slice the glTF body, copying when its start offset breaks `align`.
///
/// Consumers index typed views relative to the buffer start, so a body
/// whose offset is not a multiple of the required alignment is copied out
/// to offset zero.
pub(crate) fn aligned_body(data: &[u8], start: usize, end: usize, align: usize) -> Result<Cow<'_, [u8]>> {
    let body = section(data, start, end.saturating_sub(start))?;
    if start % align == 0 {
        Ok(Cow::Borrowed(body))
    } else {
        Ok(Cow::Owned(body.to_vec()))
    }
}
