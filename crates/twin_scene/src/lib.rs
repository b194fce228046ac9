//! # Twin Scene
//!
//! In-memory scene graph model for digital-twin scenes.
//!
//! A [`TwinScene`] owns an arena of [`SceneNode`]s addressed by [`NodeId`]
//! handles, mirroring the index-addressed layout of the persisted scene
//! document. Nodes carry a transform, a transform constraint map, and typed
//! [`Component`]s (model reference, tag, light, model shader, motion
//! indicator). Scene-level state covers the rule map, scene properties, and
//! the distance unit.
//!
//! ## Example
//!
//! ```
//! use twin_scene::{ModelRef, ModelType, SceneNode, Tag, Target, TwinScene};
//!
//! let mut scene = TwinScene::new("factory", "floor-1", "scene-bucket");
//! let line = scene.add_node(SceneNode::with_model_ref(
//!     "Line1",
//!     ModelRef::new("line.glb", ModelType::Glb),
//! ));
//! scene.add_root_node(line);
//!
//! let mut tag = Tag::default();
//! tag.set_target(Target::Info);
//! let alarm = scene.add_node(SceneNode::with_tag("Alarm", tag));
//! scene.add_child_node(line, alarm);
//!
//! assert_eq!(scene.find_all_nodes_by_name("Alarm"), vec![alarm]);
//! scene.self_check().unwrap();
//! ```

pub mod binding;
pub mod component;
pub mod error;
pub mod math;
pub mod node;
pub mod rule;
pub mod scene;

pub use binding::{DataBinding, DataBindingContext, NavLink};
pub use component::{
    Component, ComponentType, DistanceUnit, Light, LightType, ModelRef, ModelShader, ModelType,
    MotionIndicator, MotionIndicatorConfig, MotionIndicatorDataBinding,
    MotionIndicatorDataBindings, MotionIndicatorShape, Tag,
};
pub use error::{Result, SceneError};
pub use math::{Transform, Vector3};
pub use node::{NodeId, SceneNode};
pub use rule::{Rule, Statement, Target};
pub use scene::{
    DataBindingConfig, EnvironmentPreset, FieldMapping, SceneProperties, Template, TwinScene,
};
