//! Object storage abstraction for scene documents
//!
//! The codec never talks to a backend directly; [`SceneFactory`] goes
//! through this trait, so tests run against an in-memory map and production
//! plugs in a real object store.
//!
//! [`SceneFactory`]: crate::factory::SceneFactory

use thiserror::Error;

/// Errors raised by a storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested object does not exist in the bucket
    #[error("object {key:?} not found in bucket {bucket:?}")]
    NotFound { bucket: String, key: String },

    /// Any other backend failure
    #[error("storage backend error: {0}")]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// A bucket-addressed object store holding scene documents
pub trait SceneStorage {
    /// Fetch the object at `key` in `bucket`
    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Store `body` at `key` in `bucket`, replacing any existing object
    fn put_object(&mut self, bucket: &str, key: &str, body: &[u8]) -> Result<(), StorageError>;
}
