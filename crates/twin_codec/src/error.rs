//! Error types for the scene codec

use thiserror::Error;
use twin_scene::SceneError;

/// Errors raised while encoding or decoding a scene document
#[derive(Debug, Error)]
pub enum CodecError {
    /// Document spec/version does not match what this codec reads
    #[error(
        "cannot deserialize scene: expected specVersion {expected_spec_version} and version \
         {expected_version}, got specVersion {actual_spec_version} and version {actual_version}"
    )]
    VersionMismatch {
        expected_spec_version: String,
        expected_version: String,
        actual_spec_version: String,
        actual_version: String,
    },

    /// A `children` or `rootNodeIndexes` entry points outside the node array
    #[error("node index {index} is out of range, document has {len} nodes")]
    NodeIndexOutOfRange { index: usize, len: usize },

    /// A node index was revisited while resolving children
    #[error("node index {0} revisited while resolving children, document is cyclic")]
    CyclicChildIndexes(usize),

    /// Malformed JSON or a document shape serde cannot map
    #[error("malformed scene document: {0}")]
    Json(#[from] serde_json::Error),

    /// A structural invariant of the scene model was violated
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;
