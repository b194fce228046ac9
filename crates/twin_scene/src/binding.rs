//! Data bindings and navigation links
//!
//! A data binding points a scene component at a live telemetry property on
//! an external entity/component. The binding context is filled in a fixed
//! order: entity id first, then component name, then property name. The
//! ordering is enforced at mutation time.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{Result, SceneError};

/// Reference from a component to an external telemetry property
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataBinding {
    context: DataBindingContext,
}

/// Target fields of a data binding
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataBindingContext {
    pub entity_id: Option<String>,
    pub component_name: Option<String>,
    pub property_name: Option<String>,
    pub entity_path: Option<String>,
}

impl DataBinding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target_entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.context.entity_id = Some(entity_id.into());
        self
    }

    /// Fails unless a target entity id has been set first.
    pub fn with_target_component_name(mut self, component_name: impl Into<String>) -> Result<Self> {
        if is_unset(&self.context.entity_id) {
            return Err(SceneError::ComponentNameWithoutEntity);
        }
        self.context.component_name = Some(component_name.into());
        Ok(self)
    }

    /// Fails unless both a target entity id and a component name are set.
    pub fn with_target_property(mut self, property_name: impl Into<String>) -> Result<Self> {
        if is_unset(&self.context.entity_id) || is_unset(&self.context.component_name) {
            return Err(SceneError::PropertyWithoutComponent);
        }
        self.context.property_name = Some(property_name.into());
        Ok(self)
    }

    pub fn with_entity_path(mut self, entity_path: impl Into<String>) -> Self {
        self.context.entity_path = Some(entity_path.into());
        self
    }

    pub fn context(&self) -> &DataBindingContext {
        &self.context
    }

    /// True when no context field has been set
    pub fn is_empty(&self) -> bool {
        self.context == DataBindingContext::default()
    }
}

fn is_unset(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, str::is_empty)
}

/// Optional navigation destination attached to a tag
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NavLink {
    pub destination: Option<String>,
    pub params: BTreeMap<String, Value>,
}

impl NavLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn with_params(mut self, params: BTreeMap<String, Value>) -> Self {
        self.params = params;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_order_is_enforced() {
        assert!(matches!(
            DataBinding::new().with_target_component_name("alarm"),
            Err(SceneError::ComponentNameWithoutEntity)
        ));
        assert!(matches!(
            DataBinding::new()
                .with_target_entity_id("Mixer_1")
                .with_target_property("alarm_status"),
            Err(SceneError::PropertyWithoutComponent)
        ));
    }

    #[test]
    fn test_binding_builds_in_order() {
        let binding = DataBinding::new()
            .with_target_entity_id("Mixer_1")
            .with_target_component_name("AlarmComponent")
            .unwrap()
            .with_target_property("alarm_status")
            .unwrap()
            .with_entity_path("Factory/Mixer_1");

        let context = binding.context();
        assert_eq!(context.entity_id.as_deref(), Some("Mixer_1"));
        assert_eq!(context.property_name.as_deref(), Some("alarm_status"));
        assert!(!binding.is_empty());
    }

    #[test]
    fn test_empty_entity_id_counts_as_unset() {
        let binding = DataBinding::new().with_target_entity_id("");
        assert!(binding.with_target_component_name("alarm").is_err());
    }
}
