//! Error types for tile parsing

use thiserror::Error;

/// Errors raised while parsing a binary tile
#[derive(Debug, Error)]
pub enum TileError {
    /// The buffer does not start with the expected four-byte magic
    #[error("invalid tile magic: expected {expected:?}, got {actual:?}")]
    InvalidMagic { expected: String, actual: String },

    /// Tile version this parser does not read
    #[error("unsupported tile version {0}, only version 1 is supported")]
    InvalidVersion(u32),

    /// i3dm with an external glTF reference; only embedded binary glTF is
    /// supported
    #[error("unsupported gltfFormat {0}, only embedded binary glTF is supported")]
    UnsupportedGltfFormat(u32),

    /// i3dm whose glTF section is empty
    #[error("glTF byte length is zero, i3dm must have a glTF to instance")]
    EmptyGltf,

    /// The buffer ends before a declared section
    #[error("tile truncated: need {needed} bytes at offset {offset}, buffer has {len}")]
    Truncated {
        offset: usize,
        needed: usize,
        len: usize,
    },

    /// A cmpt inner tile declares a length of zero or one past the buffer
    #[error("inner tile at offset {offset} declares invalid byte length {byte_length}")]
    InvalidInnerTileLength { offset: usize, byte_length: usize },

    /// A feature or batch table JSON section is not valid JSON
    #[error("malformed table JSON: {0}")]
    TableJson(#[from] serde_json::Error),
}

/// Result type for tile parsing
pub type Result<T> = std::result::Result<T, TileError>;
