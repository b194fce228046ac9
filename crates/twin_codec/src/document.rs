//! Wire structs of the persisted scene document
//!
//! Field names and nesting follow the external viewer's format exactly;
//! the codec maps between these and the `twin_scene` model types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use twin_scene::{
    DistanceUnit, LightType, ModelType, MotionIndicatorShape, SceneProperties,
};

/// Top-level scene document
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDocument {
    pub version: String,
    pub spec_version: String,
    #[serde(default)]
    pub unit: DistanceUnit,
    #[serde(default)]
    pub properties: SceneProperties,
    #[serde(default)]
    pub nodes: Vec<NodeDocument>,
    #[serde(default)]
    pub root_node_indexes: Vec<usize>,
    #[serde(default)]
    pub rules: BTreeMap<String, RuleDocument>,
}

/// One entry of the flat node array
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDocument {
    pub name: String,
    pub transform: TransformDocument,
    #[serde(default)]
    pub transform_constraint: BTreeMap<String, Value>,
    /// Component objects; kept as raw values so unknown types survive
    /// inspection without failing the whole document
    #[serde(default)]
    pub components: Vec<Value>,
    /// Indexes into the flat node array
    #[serde(default)]
    pub children: Vec<usize>,
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransformDocument {
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RuleDocument {
    #[serde(default)]
    pub statements: Vec<StatementDocument>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatementDocument {
    pub expression: String,
    /// Icon or color constant; absent for `Target::Empty`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// Component object, dispatched on the `type` field
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ComponentDocument {
    ModelRef(ModelRefDocument),
    Tag(TagDocument),
    MotionIndicator(MotionIndicatorDocument),
    Light(LightDocument),
    ModelShader(ModelShaderDocument),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRefDocument {
    pub uri: String,
    pub model_type: ModelType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_of_measure: Option<DistanceUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cast_shadow: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receive_shadow: Option<bool>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_based_map_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_data_binding: Option<DataBindingDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nav_link: Option<NavLinkDocument>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataBindingDocument {
    #[serde(default)]
    pub data_binding_context: DataBindingContextDocument,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataBindingContextDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_path: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavLinkDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<BTreeMap<String, Value>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotionIndicatorDocument {
    pub shape: MotionIndicatorShape,
    #[serde(default)]
    pub value_data_bindings: MotionIndicatorBindingsDocument,
    #[serde(default)]
    pub config: MotionIndicatorConfigDocument,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotionIndicatorBindingsDocument {
    #[serde(default)]
    pub speed: BindingEntryDocument,
    #[serde(default)]
    pub foreground_color: BindingEntryDocument,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingEntryDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_data_binding: Option<DataBindingDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_based_map_id: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotionIndicatorConfigDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_of_repeat_in_y: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color_opacity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_foreground_color: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_speed: Option<f32>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelShaderDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_data_binding: Option<DataBindingDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_based_map_id: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightDocument {
    pub light_type: LightType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light_settings: Option<LightSettingsDocument>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightSettingsDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground_color: Option<u32>,
}
