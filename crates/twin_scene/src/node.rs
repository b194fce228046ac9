//! Scene nodes and node handles
//!
//! Nodes live in an arena owned by the scene; children are referenced by
//! [`NodeId`] handles instead of owned pointers, matching the persisted
//! document's index addressing.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::component::{
    Component, ComponentType, Light, ModelRef, ModelShader, MotionIndicator, Tag,
};
use crate::error::{Result, SceneError};
use crate::math::{Transform, Vector3};

/// Handle to a node in a scene's arena.
///
/// Handles are minted by [`TwinScene::add_node`](crate::TwinScene::add_node)
/// and are only meaningful for the scene that created them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Raw arena index
    #[inline]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// A node of the scene tree: name, transform, constraint map, components,
/// and child handles.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    pub name: String,
    transform: Transform,
    transform_constraint: BTreeMap<String, Value>,
    components: Vec<Component>,
    children: Vec<NodeId>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::new(),
            transform_constraint: BTreeMap::new(),
            components: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Node pre-loaded with a model reference component
    pub fn with_model_ref(name: impl Into<String>, model_ref: ModelRef) -> Self {
        let mut node = Self::new(name);
        node.components.push(Component::ModelRef(model_ref));
        node
    }

    /// Node pre-loaded with a tag component
    pub fn with_tag(name: impl Into<String>, tag: Tag) -> Self {
        let mut node = Self::new(name);
        node.components.push(Component::Tag(tag));
        node
    }

    /// Node pre-loaded with a light component
    pub fn with_light(name: impl Into<String>, light: Light) -> Self {
        let mut node = Self::new(name);
        node.components.push(Component::Light(light));
        node
    }

    /// Node pre-loaded with a motion indicator component
    pub fn with_motion_indicator(name: impl Into<String>, indicator: MotionIndicator) -> Self {
        let mut node = Self::new(name);
        node.components.push(Component::MotionIndicator(indicator));
        node
    }

    pub fn with_position(mut self, position: Vector3) -> Self {
        self.transform.set_position(position);
        self
    }

    pub fn with_rotation(mut self, rotation: Vector3) -> Self {
        self.transform.set_rotation(rotation);
        self
    }

    pub fn with_scale(mut self, scale: Vector3) -> Self {
        self.transform.set_scale(scale);
        self
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn transform_constraint(&self) -> &BTreeMap<String, Value> {
        &self.transform_constraint
    }

    pub fn set_snap_to_floor(&mut self, snap_to_floor: bool) -> &mut Self {
        self.transform_constraint
            .insert("snapToFloor".to_string(), Value::Bool(snap_to_floor));
        self
    }

    pub fn snap_to_floor(&self) -> Option<bool> {
        self.transform_constraint
            .get("snapToFloor")
            .and_then(Value::as_bool)
    }

    /// Attach a component.
    ///
    /// At most one non-ModelShader component may be attached per node; model
    /// shaders may be added without limit.
    pub fn add_component(&mut self, component: Component) -> Result<()> {
        if self.contains_non_model_shader_component()
            && component.component_type() != ComponentType::ModelShader
        {
            return Err(SceneError::ComponentConflict {
                node: self.name.clone(),
                component: component.type_name(),
            });
        }
        self.components.push(component);
        Ok(())
    }

    /// Attach a model shader, bypassing the single-component check
    pub fn add_model_shader(&mut self, shader: ModelShader) {
        self.components.push(Component::ModelShader(shader));
    }

    fn contains_non_model_shader_component(&self) -> bool {
        self.components
            .iter()
            .any(|c| c.component_type() != ComponentType::ModelShader)
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut [Component] {
        &mut self.components
    }

    pub fn has_component_type(&self, component_type: ComponentType) -> bool {
        self.components
            .iter()
            .any(|c| c.component_type() == component_type)
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<NodeId> {
        &mut self.children
    }
}
