//! Scene → document serialization
//!
//! Flattens the node tree into the document's index-addressed array using
//! pre-order traversal: a node's index is assigned before any of its
//! children's, and roots are visited in scene order.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;
use twin_scene::{
    Component, DataBinding, Light, ModelRef, ModelShader, MotionIndicator, MotionIndicatorDataBinding,
    NavLink, NodeId, Rule, SceneNode, Tag, TwinScene,
};

use crate::constants::serialize_target;
use crate::document::{
    BindingEntryDocument, ComponentDocument, DataBindingContextDocument, DataBindingDocument,
    LightDocument, LightSettingsDocument, ModelRefDocument, ModelShaderDocument,
    MotionIndicatorBindingsDocument, MotionIndicatorConfigDocument, MotionIndicatorDocument,
    NavLinkDocument, NodeDocument, RuleDocument, SceneDocument, StatementDocument, TagDocument,
    TransformDocument,
};
use crate::error::Result;

/// Serializer for the persisted scene document
pub struct Serializer;

impl Serializer {
    /// Serialize a scene to the pretty-printed document JSON.
    ///
    /// Runs the scene's cycle self-check first; a scene that fails it is
    /// never serialized.
    pub fn serialize_scene(scene: &TwinScene) -> Result<String> {
        scene.self_check()?;

        let mut index_map = HashMap::new();
        let mut next_index = 0;
        for &root in scene.root_nodes() {
            Self::assign_indexes(scene, root, &mut index_map, &mut next_index);
        }

        let mut nodes = Vec::with_capacity(next_index);
        for &root in scene.root_nodes() {
            Self::serialize_subtree(scene, root, &index_map, &mut nodes)?;
        }

        let document = SceneDocument {
            version: TwinScene::VERSION.to_string(),
            spec_version: TwinScene::SPEC_VERSION.to_string(),
            unit: scene.unit(),
            properties: scene.properties().clone(),
            nodes,
            root_node_indexes: scene.root_nodes().iter().map(|r| index_map[r]).collect(),
            rules: scene
                .rules()
                .iter()
                .map(|(id, rule)| (id.clone(), Self::serialize_rule(rule)))
                .collect(),
        };

        Ok(serde_json::to_string_pretty(&document)?)
    }

    fn assign_indexes(
        scene: &TwinScene,
        id: NodeId,
        index_map: &mut HashMap<NodeId, usize>,
        next_index: &mut usize,
    ) {
        index_map.insert(id, *next_index);
        *next_index += 1;
        for &child in scene.node(id).children() {
            Self::assign_indexes(scene, child, index_map, next_index);
        }
    }

    fn serialize_subtree(
        scene: &TwinScene,
        id: NodeId,
        index_map: &HashMap<NodeId, usize>,
        out: &mut Vec<NodeDocument>,
    ) -> Result<()> {
        out.push(Self::serialize_node(scene, scene.node(id), index_map)?);
        for &child in scene.node(id).children() {
            Self::serialize_subtree(scene, child, index_map, out)?;
        }
        Ok(())
    }

    fn serialize_node(
        scene: &TwinScene,
        node: &SceneNode,
        index_map: &HashMap<NodeId, usize>,
    ) -> Result<NodeDocument> {
        let components = node
            .components()
            .iter()
            .map(|c| Self::serialize_component(c, scene.bucket_name()))
            .collect::<Result<Vec<Value>>>()?;

        Ok(NodeDocument {
            name: node.name.clone(),
            transform: TransformDocument {
                position: node.transform().position().into(),
                rotation: node.transform().rotation().into(),
                scale: node.transform().scale().into(),
            },
            transform_constraint: node.transform_constraint().clone(),
            components,
            children: node.children().iter().map(|c| index_map[c]).collect(),
            properties: BTreeMap::new(),
        })
    }

    fn serialize_component(component: &Component, bucket_name: &str) -> Result<Value> {
        let document = match component {
            Component::ModelRef(model_ref) => {
                ComponentDocument::ModelRef(Self::serialize_model_ref(model_ref, bucket_name))
            }
            Component::Tag(tag) => ComponentDocument::Tag(Self::serialize_tag(tag)),
            Component::MotionIndicator(indicator) => {
                ComponentDocument::MotionIndicator(Self::serialize_motion_indicator(indicator))
            }
            Component::Light(light) => ComponentDocument::Light(Self::serialize_light(light)),
            Component::ModelShader(shader) => {
                ComponentDocument::ModelShader(Self::serialize_model_shader(shader))
            }
        };
        Ok(serde_json::to_value(document)?)
    }

    fn serialize_model_ref(model_ref: &ModelRef, bucket_name: &str) -> ModelRefDocument {
        // Shadow flags are scene-local and stay out of the document.
        ModelRefDocument {
            uri: format!("s3://{}/{}", bucket_name, model_ref.model_file_name),
            model_type: model_ref.model_type,
            unit_of_measure: Some(model_ref.unit_of_measure),
            cast_shadow: None,
            receive_shadow: None,
        }
    }

    fn serialize_tag(tag: &Tag) -> TagDocument {
        TagDocument {
            icon: serialize_target(tag.target).map(str::to_string),
            rule_based_map_id: tag.rule_based_map_id.clone(),
            value_data_binding: tag.value_data_binding.as_ref().map(Self::serialize_binding),
            nav_link: Some(Self::serialize_nav_link(tag.nav_link.as_ref())),
        }
    }

    fn serialize_motion_indicator(indicator: &MotionIndicator) -> MotionIndicatorDocument {
        MotionIndicatorDocument {
            shape: indicator.shape,
            value_data_bindings: MotionIndicatorBindingsDocument {
                speed: Self::serialize_binding_entry(&indicator.value_data_bindings.speed),
                foreground_color: Self::serialize_binding_entry(
                    &indicator.value_data_bindings.foreground_color,
                ),
            },
            config: MotionIndicatorConfigDocument {
                num_of_repeat_in_y: Some(indicator.config.num_of_repeat_in_y),
                background_color_opacity: Some(indicator.config.background_color_opacity),
                default_foreground_color: Some(indicator.config.default_foreground_color),
                default_speed: Some(indicator.config.default_speed),
            },
        }
    }

    fn serialize_binding_entry(entry: &MotionIndicatorDataBinding) -> BindingEntryDocument {
        BindingEntryDocument {
            value_data_binding: entry.value_data_binding.as_ref().map(Self::serialize_binding),
            rule_based_map_id: entry.rule_based_map_id.clone(),
        }
    }

    fn serialize_light(light: &Light) -> LightDocument {
        LightDocument {
            light_type: light.light_type,
            light_settings: Some(LightSettingsDocument {
                color: Some(light.color),
                intensity: Some(light.intensity),
                ground_color: light.ground_color,
            }),
        }
    }

    fn serialize_model_shader(shader: &ModelShader) -> ModelShaderDocument {
        ModelShaderDocument {
            value_data_binding: shader.value_data_binding.as_ref().map(Self::serialize_binding),
            rule_based_map_id: shader.rule_based_map_id.clone(),
        }
    }

    fn serialize_binding(binding: &DataBinding) -> DataBindingDocument {
        let context = binding.context();
        DataBindingDocument {
            data_binding_context: DataBindingContextDocument {
                entity_id: context.entity_id.clone(),
                component_name: context.component_name.clone(),
                property_name: context.property_name.clone(),
                entity_path: context.entity_path.clone(),
            },
        }
    }

    fn serialize_nav_link(nav_link: Option<&NavLink>) -> NavLinkDocument {
        match nav_link {
            // An unset nav link still serializes, as an empty object.
            None => NavLinkDocument::default(),
            Some(nav_link) => NavLinkDocument {
                destination: nav_link.destination.clone(),
                params: Some(nav_link.params.clone()),
            },
        }
    }

    fn serialize_rule(rule: &Rule) -> RuleDocument {
        RuleDocument {
            statements: rule
                .statements()
                .iter()
                .map(|statement| StatementDocument {
                    expression: statement.expression().to_string(),
                    target: serialize_target(statement.target()).map(str::to_string),
                })
                .collect(),
        }
    }
}
