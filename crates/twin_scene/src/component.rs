//! Scene node components
//!
//! Components are a closed sum over five kinds. Serialization dispatches on
//! [`Component::component_type`]; the enum keeps the dispatch exhaustive at
//! compile time.

use serde::{Deserialize, Serialize};

use crate::binding::{DataBinding, NavLink};
use crate::rule::Target;

/// Model file format referenced by a [`ModelRef`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelType {
    #[serde(rename = "GLTF")]
    Gltf,
    #[serde(rename = "GLB")]
    Glb,
    Tiles3D,
}

/// Distance unit of a scene or model
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    Millimeters,
    Centimeters,
    Decimeters,
    #[default]
    Meters,
    Kilometers,
    Inches,
    Feet,
    Yards,
    Miles,
}

/// Light variant carried by a [`Light`] component
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightType {
    Ambient,
    Directional,
    Hemisphere,
    Point,
}

/// Geometry of a motion indicator
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionIndicatorShape {
    LinearPlane,
    #[default]
    LinearCylinder,
    CircularCylinder,
}

/// Reference to a model file stored in the workspace bucket.
///
/// The shadow flags are scene-local state; they are not part of the
/// persisted document.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelRef {
    pub model_file_name: String,
    pub model_type: ModelType,
    pub unit_of_measure: DistanceUnit,
    pub cast_shadow: Option<bool>,
    pub receive_shadow: Option<bool>,
}

impl ModelRef {
    pub fn new(model_file_name: impl Into<String>, model_type: ModelType) -> Self {
        Self {
            model_file_name: model_file_name.into(),
            model_type,
            unit_of_measure: DistanceUnit::Meters,
            cast_shadow: None,
            receive_shadow: None,
        }
    }

    pub fn with_unit_of_measure(mut self, unit: DistanceUnit) -> Self {
        self.unit_of_measure = unit;
        self
    }

    pub fn with_cast_shadow(mut self, cast_shadow: bool) -> Self {
        self.cast_shadow = Some(cast_shadow);
        self
    }

    pub fn with_receive_shadow(mut self, receive_shadow: bool) -> Self {
        self.receive_shadow = Some(receive_shadow);
        self
    }
}

/// Annotation anchored in the scene, driven by a rule and a data binding
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tag {
    pub target: Target,
    pub rule_based_map_id: Option<String>,
    pub value_data_binding: Option<DataBinding>,
    pub nav_link: Option<NavLink>,
}

impl Tag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_target(&mut self, target: Target) -> &mut Self {
        self.target = target;
        self
    }

    pub fn set_rule_id(&mut self, rule_id: impl Into<String>) -> &mut Self {
        self.rule_based_map_id = Some(rule_id.into());
        self
    }

    pub fn set_data_binding(&mut self, binding: DataBinding) -> &mut Self {
        self.value_data_binding = Some(binding);
        self
    }

    pub fn set_nav_link(&mut self, nav_link: NavLink) -> &mut Self {
        self.nav_link = Some(nav_link);
        self
    }
}

/// Light source. `ground_color` is only meaningful for hemisphere lights.
#[derive(Clone, Debug, PartialEq)]
pub struct Light {
    pub light_type: LightType,
    pub color: u32,
    pub intensity: f32,
    pub ground_color: Option<u32>,
}

impl Light {
    pub fn new(light_type: LightType) -> Self {
        Self {
            light_type,
            color: 0xffffff,
            intensity: 1.0,
            ground_color: None,
        }
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_ground_color(mut self, ground_color: u32) -> Self {
        self.ground_color = Some(ground_color);
        self
    }
}

/// Rule-driven recoloring of the model a node references
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelShader {
    pub value_data_binding: Option<DataBinding>,
    pub rule_based_map_id: Option<String>,
}

impl ModelShader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value_data_binding(mut self, binding: DataBinding) -> Self {
        self.value_data_binding = Some(binding);
        self
    }

    pub fn with_rule_id(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_based_map_id = Some(rule_id.into());
        self
    }
}

/// Animated flow indicator with speed and color bindings
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MotionIndicator {
    pub shape: MotionIndicatorShape,
    pub value_data_bindings: MotionIndicatorDataBindings,
    pub config: MotionIndicatorConfig,
}

/// Per-channel bindings of a motion indicator
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MotionIndicatorDataBindings {
    pub speed: MotionIndicatorDataBinding,
    pub foreground_color: MotionIndicatorDataBinding,
}

/// One bound channel: a data binding plus the rule that interprets it
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MotionIndicatorDataBinding {
    pub value_data_binding: Option<DataBinding>,
    pub rule_based_map_id: Option<String>,
}

/// Numeric configuration of a motion indicator
#[derive(Clone, Debug, PartialEq)]
pub struct MotionIndicatorConfig {
    pub num_of_repeat_in_y: u32,
    pub background_color_opacity: u32,
    pub default_foreground_color: u32,
    pub default_speed: f32,
}

impl Default for MotionIndicatorConfig {
    fn default() -> Self {
        Self {
            num_of_repeat_in_y: 3,
            background_color_opacity: 0xffffff,
            default_foreground_color: 0xff00ff,
            default_speed: 1.0,
        }
    }
}

impl MotionIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_shape(&mut self, shape: MotionIndicatorShape) -> &mut Self {
        self.shape = shape;
        self
    }

    pub fn set_default_speed(&mut self, speed: f32) -> &mut Self {
        self.config.default_speed = speed;
        self
    }

    pub fn set_num_of_repeat_in_y(&mut self, num_of_repeat_in_y: u32) -> &mut Self {
        self.config.num_of_repeat_in_y = num_of_repeat_in_y;
        self
    }

    pub fn set_background_color_opacity(&mut self, opacity: u32) -> &mut Self {
        self.config.background_color_opacity = opacity;
        self
    }

    pub fn set_default_foreground_color(&mut self, color: u32) -> &mut Self {
        self.config.default_foreground_color = color;
        self
    }

    pub fn set_speed_value_data_binding(&mut self, binding: DataBinding) -> &mut Self {
        self.value_data_bindings.speed.value_data_binding = Some(binding);
        self
    }

    pub fn set_speed_rule_id(&mut self, rule_id: impl Into<String>) -> &mut Self {
        self.value_data_bindings.speed.rule_based_map_id = Some(rule_id.into());
        self
    }

    pub fn set_foreground_color_value_data_binding(&mut self, binding: DataBinding) -> &mut Self {
        self.value_data_bindings.foreground_color.value_data_binding = Some(binding);
        self
    }

    pub fn set_foreground_color_rule_id(&mut self, rule_id: impl Into<String>) -> &mut Self {
        self.value_data_bindings.foreground_color.rule_based_map_id = Some(rule_id.into());
        self
    }
}

/// The closed set of component kinds a node can carry
#[derive(Clone, Debug, PartialEq)]
pub enum Component {
    ModelRef(ModelRef),
    Tag(Tag),
    Light(Light),
    ModelShader(ModelShader),
    MotionIndicator(MotionIndicator),
}

impl Component {
    pub fn component_type(&self) -> ComponentType {
        match self {
            Component::ModelRef(_) => ComponentType::ModelRef,
            Component::Tag(_) => ComponentType::Tag,
            Component::Light(_) => ComponentType::Light,
            Component::ModelShader(_) => ComponentType::ModelShader,
            Component::MotionIndicator(_) => ComponentType::MotionIndicator,
        }
    }

    /// Wire discriminant of this component
    pub fn type_name(&self) -> &'static str {
        self.component_type().as_str()
    }
}

/// Discriminant used for component lookup and serialization dispatch
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComponentType {
    Light,
    ModelRef,
    ModelShader,
    MotionIndicator,
    Tag,
}

impl ComponentType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Light => "Light",
            ComponentType::ModelRef => "ModelRef",
            ComponentType::ModelShader => "ModelShader",
            ComponentType::MotionIndicator => "MotionIndicator",
            ComponentType::Tag => "Tag",
        }
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
