//! Error types for scene graph mutation

use thiserror::Error;

/// Errors raised when a structural invariant of the scene graph is violated
#[derive(Debug, Error)]
pub enum SceneError {
    /// A node may hold at most one component that is not a model shader
    #[error("node '{node}' already holds a non-ModelShader component, cannot add '{component}'")]
    ComponentConflict {
        node: String,
        component: &'static str,
    },

    /// Data binding component name requires a target entity id
    #[error("component name cannot be set without a target entity")]
    ComponentNameWithoutEntity,

    /// Data binding property requires both a target entity id and component name
    #[error("property cannot be set without a target entity or component name")]
    PropertyWithoutComponent,

    /// A node is reachable through more than one path from the scene roots
    #[error("cycle detected at node '{0}'")]
    CycleDetected(String),
}

/// Result type for scene operations
pub type Result<T> = std::result::Result<T, SceneError>;
