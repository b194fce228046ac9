//! Document → scene deserialization
//!
//! Rebuilds the node tree from the flat index-addressed array. Child
//! resolution is guarded: an index past the node array or one revisited on
//! the current path fails the load instead of recursing forever.

use std::collections::HashSet;

use serde_json::Value;
use twin_scene::{
    Component, DataBinding, Light, ModelRef, ModelShader, ModelType, MotionIndicator,
    MotionIndicatorDataBinding, NavLink, NodeId, Rule, SceneNode, Statement, Tag, TwinScene,
};

use crate::constants::deserialize_target;
use crate::document::{
    BindingEntryDocument, ComponentDocument, DataBindingDocument, LightDocument,
    ModelRefDocument, ModelShaderDocument, MotionIndicatorDocument, NavLinkDocument, NodeDocument,
    RuleDocument, SceneDocument, TagDocument,
};
use crate::error::{CodecError, Result};

/// Deserializer for the persisted scene document
pub struct Deserializer;

impl Deserializer {
    /// Deserialize scene document JSON into a [`TwinScene`].
    ///
    /// Some writers store the document JSON-encoded a second time, as one
    /// big JSON string; both encodings are accepted.
    pub fn deserialize_scene(
        workspace_id: &str,
        scene_id: &str,
        bucket_name: &str,
        content: &str,
    ) -> Result<TwinScene> {
        let mut raw: Value = serde_json::from_str(content)?;
        if let Value::String(inner) = &raw {
            raw = serde_json::from_str(inner)?;
        }
        Self::check_version(&raw)?;
        let document: SceneDocument = serde_json::from_value(raw)?;

        let mut scene = TwinScene::new(workspace_id, scene_id, bucket_name);
        scene.set_unit(document.unit);
        scene.set_properties(document.properties.clone());

        for (rule_id, rule) in &document.rules {
            scene.add_rule(rule_id.clone(), Self::deserialize_rule(rule));
        }

        // Handles into the rebuilt arena, one per document index
        let ids: Vec<NodeId> = document
            .nodes
            .iter()
            .map(|node| scene.add_node(Self::deserialize_node(node)))
            .collect();

        let mut visiting = HashSet::new();
        for &root_index in &document.root_node_indexes {
            Self::link_children(&mut scene, &document, &ids, root_index, &mut visiting)?;
            let id = *ids
                .get(root_index)
                .ok_or(CodecError::NodeIndexOutOfRange {
                    index: root_index,
                    len: ids.len(),
                })?;
            scene.add_root_node(id);
        }

        for (index, node) in document.nodes.iter().enumerate() {
            Self::attach_components(&mut scene, ids[index], node)?;
        }

        Ok(scene)
    }

    fn check_version(raw: &Value) -> Result<()> {
        let actual_spec_version = raw
            .get("specVersion")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();
        let actual_version = raw
            .get("version")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();
        if actual_spec_version != TwinScene::SPEC_VERSION || actual_version != TwinScene::VERSION {
            return Err(CodecError::VersionMismatch {
                expected_spec_version: TwinScene::SPEC_VERSION.to_string(),
                expected_version: TwinScene::VERSION.to_string(),
                actual_spec_version,
                actual_version,
            });
        }
        Ok(())
    }

    fn deserialize_node(document: &NodeDocument) -> SceneNode {
        let mut node = SceneNode::new(document.name.clone())
            .with_position(document.transform.position.into())
            .with_rotation(document.transform.rotation.into())
            .with_scale(document.transform.scale.into());
        if let Some(snap) = document
            .transform_constraint
            .get("snapToFloor")
            .and_then(Value::as_bool)
        {
            node.set_snap_to_floor(snap);
        }
        node
    }

    fn link_children(
        scene: &mut TwinScene,
        document: &SceneDocument,
        ids: &[NodeId],
        index: usize,
        visiting: &mut HashSet<usize>,
    ) -> Result<()> {
        let node = document
            .nodes
            .get(index)
            .ok_or(CodecError::NodeIndexOutOfRange {
                index,
                len: document.nodes.len(),
            })?;
        if !visiting.insert(index) {
            return Err(CodecError::CyclicChildIndexes(index));
        }
        for &child_index in &node.children {
            Self::link_children(scene, document, ids, child_index, visiting)?;
            scene.add_child_node(ids[index], ids[child_index]);
        }
        Ok(())
    }

    fn attach_components(scene: &mut TwinScene, id: NodeId, node: &NodeDocument) -> Result<()> {
        for raw in &node.components {
            let type_name = raw.get("type").and_then(Value::as_str).unwrap_or("");
            match serde_json::from_value::<ComponentDocument>(raw.clone()) {
                Ok(ComponentDocument::ModelRef(model_ref)) => {
                    scene.add_component(id, Component::ModelRef(Self::deserialize_model_ref(&model_ref)))?;
                }
                Ok(ComponentDocument::Tag(tag)) => {
                    scene.add_component(id, Component::Tag(Self::deserialize_tag(&tag)))?;
                }
                Ok(ComponentDocument::MotionIndicator(indicator)) => {
                    scene.add_component(
                        id,
                        Component::MotionIndicator(Self::deserialize_motion_indicator(&indicator)),
                    )?;
                }
                Ok(ComponentDocument::Light(light)) => {
                    scene.add_component(id, Component::Light(Self::deserialize_light(&light)))?;
                }
                Ok(ComponentDocument::ModelShader(shader)) => {
                    scene.add_model_shader(id, Self::deserialize_model_shader(&shader));
                }
                Err(_) => {
                    log::warn!(
                        "skipping unrecognized component type {:?} on node {:?}",
                        type_name,
                        node.name
                    );
                }
            }
        }
        Ok(())
    }

    fn deserialize_model_ref(document: &ModelRefDocument) -> ModelRef {
        let mut model_ref = ModelRef::new(Self::model_file_name(document), document.model_type);
        if let Some(unit) = document.unit_of_measure {
            model_ref = model_ref.with_unit_of_measure(unit);
        }
        if let Some(cast_shadow) = document.cast_shadow {
            model_ref = model_ref.with_cast_shadow(cast_shadow);
        }
        if let Some(receive_shadow) = document.receive_shadow {
            model_ref = model_ref.with_receive_shadow(receive_shadow);
        }
        model_ref
    }

    /// Recover the bucket-relative file name from the stored uri.
    ///
    /// Tileset uris keep their directory path (the tileset json sits next
    /// to its tile payloads); single-file models keep only the base name.
    fn model_file_name(document: &ModelRefDocument) -> String {
        let uri = &document.uri;
        match document.model_type {
            ModelType::Tiles3D => {
                // Drop the scheme and bucket, keep the object key
                let key = uri
                    .split_once("://")
                    .and_then(|(_, rest)| rest.split_once('/'))
                    .map(|(_, key)| key)
                    .unwrap_or(uri);
                key.to_string()
            }
            _ => uri.rsplit('/').next().unwrap_or(uri).to_string(),
        }
    }

    fn deserialize_tag(document: &TagDocument) -> Tag {
        let mut tag = Tag::new();
        tag.set_target(deserialize_target(document.icon.as_deref()));
        if let Some(rule_id) = &document.rule_based_map_id {
            tag.set_rule_id(rule_id.clone());
        }
        if let Some(binding) = document
            .value_data_binding
            .as_ref()
            .and_then(Self::deserialize_binding)
        {
            tag.set_data_binding(binding);
        }
        if let Some(nav_link) = document.nav_link.as_ref().and_then(Self::deserialize_nav_link) {
            tag.set_nav_link(nav_link);
        }
        tag
    }

    fn deserialize_motion_indicator(document: &MotionIndicatorDocument) -> MotionIndicator {
        let mut indicator = MotionIndicator::new();
        indicator.set_shape(document.shape);

        let speed = Self::deserialize_binding_entry(&document.value_data_bindings.speed);
        indicator.value_data_bindings.speed = speed;
        let foreground_color =
            Self::deserialize_binding_entry(&document.value_data_bindings.foreground_color);
        indicator.value_data_bindings.foreground_color = foreground_color;

        if let Some(num) = document.config.num_of_repeat_in_y {
            indicator.set_num_of_repeat_in_y(num);
        }
        if let Some(opacity) = document.config.background_color_opacity {
            indicator.set_background_color_opacity(opacity);
        }
        if let Some(color) = document.config.default_foreground_color {
            indicator.set_default_foreground_color(color);
        }
        if let Some(speed) = document.config.default_speed {
            indicator.set_default_speed(speed);
        }
        indicator
    }

    fn deserialize_binding_entry(document: &BindingEntryDocument) -> MotionIndicatorDataBinding {
        MotionIndicatorDataBinding {
            value_data_binding: document
                .value_data_binding
                .as_ref()
                .and_then(Self::deserialize_binding),
            rule_based_map_id: document.rule_based_map_id.clone(),
        }
    }

    fn deserialize_light(document: &LightDocument) -> Light {
        let mut light = Light::new(document.light_type);
        if let Some(settings) = &document.light_settings {
            if let Some(color) = settings.color {
                light = light.with_color(color);
            }
            if let Some(intensity) = settings.intensity {
                light = light.with_intensity(intensity);
            }
            if let Some(ground_color) = settings.ground_color {
                light = light.with_ground_color(ground_color);
            }
        }
        light
    }

    fn deserialize_model_shader(document: &ModelShaderDocument) -> ModelShader {
        let mut shader = ModelShader::new();
        if let Some(binding) = document
            .value_data_binding
            .as_ref()
            .and_then(Self::deserialize_binding)
        {
            shader = shader.with_value_data_binding(binding);
        }
        if let Some(rule_id) = &document.rule_based_map_id {
            shader = shader.with_rule_id(rule_id.clone());
        }
        shader
    }

    /// Rebuild a binding through the ordered builders. An empty context
    /// yields `None`; a context that skips a level keeps only the prefix
    /// the builders accept, and the dropped fields are logged.
    fn deserialize_binding(document: &DataBindingDocument) -> Option<DataBinding> {
        let context = &document.data_binding_context;
        let mut binding = DataBinding::new();
        if let Some(entity_id) = &context.entity_id {
            binding = binding.with_target_entity_id(entity_id.clone());
        }
        if let Some(component_name) = &context.component_name {
            match binding.clone().with_target_component_name(component_name.clone()) {
                Ok(next) => binding = next,
                Err(err) => {
                    log::warn!("dropping binding componentName {component_name:?}: {err}");
                }
            }
        }
        if let Some(property_name) = &context.property_name {
            match binding.clone().with_target_property(property_name.clone()) {
                Ok(next) => binding = next,
                Err(err) => {
                    log::warn!("dropping binding propertyName {property_name:?}: {err}");
                }
            }
        }
        if let Some(entity_path) = &context.entity_path {
            binding = binding.with_entity_path(entity_path.clone());
        }
        if binding.is_empty() {
            None
        } else {
            Some(binding)
        }
    }

    fn deserialize_nav_link(document: &NavLinkDocument) -> Option<NavLink> {
        if document.destination.is_none() && document.params.is_none() {
            return None;
        }
        let mut nav_link = NavLink::new();
        if let Some(destination) = &document.destination {
            nav_link = nav_link.with_destination(destination.clone());
        }
        if let Some(params) = &document.params {
            nav_link = nav_link.with_params(params.clone());
        }
        Some(nav_link)
    }

    fn deserialize_rule(document: &RuleDocument) -> Rule {
        let mut rule = Rule::new();
        for statement in &document.statements {
            rule.add_statement(Statement::new(
                statement.expression.clone(),
                deserialize_target(statement.target.as_deref()),
            ));
        }
        rule
    }
}
