//! # Twin Codec
//!
//! Bidirectional codec between the in-memory [`twin_scene::TwinScene`] and
//! the persisted JSON scene document consumed by the external viewer.
//!
//! The document stores the node tree as a flat, index-addressed array:
//! nodes appear in pre-order, `children` holds indexes into that array, and
//! `rootNodeIndexes` points at the roots. [`Serializer`] flattens the tree
//! into that layout; [`Deserializer`] rebuilds the tree from it.
//!
//! Storage is a collaborator, not a concern of the codec: the
//! [`SceneStorage`] trait describes the object store and [`SceneFactory`]
//! wires it to the codec for load/save.

pub mod constants;
pub mod deserializer;
pub mod document;
pub mod error;
pub mod factory;
pub mod serializer;
pub mod storage;

pub use constants::{deserialize_target, serialize_target};
pub use deserializer::Deserializer;
pub use error::{CodecError, Result};
pub use factory::{FactoryError, SceneFactory};
pub use serializer::Serializer;
pub use storage::{SceneStorage, StorageError};
