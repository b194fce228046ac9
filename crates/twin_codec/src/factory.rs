//! Scene lifecycle against a storage backend
//!
//! The factory owns the storage handle and the bucket, derives object keys
//! from scene ids, and routes documents through the codec on the way in
//! and out.

use std::path::Path;

use thiserror::Error;
use twin_scene::TwinScene;

use crate::deserializer::Deserializer;
use crate::error::CodecError;
use crate::serializer::Serializer;
use crate::storage::{SceneStorage, StorageError};

/// Errors raised while loading or saving scenes
#[derive(Debug, Error)]
pub enum FactoryError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to write scene file: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document is not valid UTF-8
    #[error("scene document for {scene_id:?} is not valid utf-8")]
    InvalidUtf8 { scene_id: String },
}

/// Creates, loads, and saves scenes backed by an object store
pub struct SceneFactory<S: SceneStorage> {
    storage: S,
    workspace_id: String,
    bucket_name: String,
}

impl<S: SceneStorage> SceneFactory<S> {
    pub fn new(
        storage: S,
        workspace_id: impl Into<String>,
        bucket_name: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            workspace_id: workspace_id.into(),
            bucket_name: bucket_name.into(),
        }
    }

    /// Object key of a scene's document
    fn scene_key(scene_id: &str) -> String {
        format!("{scene_id}.json")
    }

    /// A fresh scene with no nodes, rules, or properties
    pub fn create_empty_scene(&self, scene_id: &str) -> TwinScene {
        TwinScene::new(&self.workspace_id, scene_id, &self.bucket_name)
    }

    /// Load the scene's document from storage
    pub fn load_scene(&self, scene_id: &str) -> Result<TwinScene, FactoryError> {
        let body = self
            .storage
            .get_object(&self.bucket_name, &Self::scene_key(scene_id))?;
        let content = String::from_utf8(body).map_err(|_| FactoryError::InvalidUtf8 {
            scene_id: scene_id.to_string(),
        })?;
        let scene = Deserializer::deserialize_scene(
            &self.workspace_id,
            scene_id,
            &self.bucket_name,
            &content,
        )?;
        Ok(scene)
    }

    /// Load the scene if its document exists, otherwise start an empty one
    pub fn load_or_create_scene(&self, scene_id: &str) -> Result<TwinScene, FactoryError> {
        match self.load_scene(scene_id) {
            Ok(scene) => Ok(scene),
            Err(FactoryError::Storage(StorageError::NotFound { bucket, key })) => {
                log::info!("scene document {key} not found in {bucket}, starting empty");
                Ok(self.create_empty_scene(scene_id))
            }
            Err(err) => Err(err),
        }
    }

    /// Serialize the scene and write its document to storage
    pub fn save(&mut self, scene: &TwinScene) -> Result<(), FactoryError> {
        let content = Serializer::serialize_scene(scene)?;
        self.storage.put_object(
            &self.bucket_name,
            &Self::scene_key(scene.scene_id()),
            content.as_bytes(),
        )?;
        Ok(())
    }

    /// Serialize the scene and write its document to a local file
    pub fn save_local(&self, scene: &TwinScene, path: &Path) -> Result<(), FactoryError> {
        let content = Serializer::serialize_scene(scene)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
