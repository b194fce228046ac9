//! Scene container: node arena, roots, rules, and scene-level properties

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::component::{Component, ComponentType, DistanceUnit, ModelShader};
use crate::error::{Result, SceneError};
use crate::node::{NodeId, SceneNode};
use crate::rule::Rule;

/// Environment preset applied by the viewer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentPreset {
    Neutral,
    Directional,
    Chromatic,
}

/// Scene-level properties
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_preset: Option<EnvironmentPreset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_binding_config: Option<DataBindingConfig>,
}

/// Scene-wide data binding configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataBindingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_mapping: Option<FieldMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<Template>,
}

/// Field mapping of a data binding configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<Vec<String>>,
}

/// Selection template of a data binding configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sel_entity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sel_comp: Option<String>,
}

/// A digital-twin scene: an arena of nodes, the root handles, the rule map,
/// and scene-level properties.
///
/// The arena is append-only; deleting a node detaches it from the tree but
/// keeps its slot, so handles stay valid for the scene's lifetime.
/// Single-writer: no concurrent mutation is supported.
#[derive(Clone, Debug)]
pub struct TwinScene {
    workspace_id: String,
    scene_id: String,
    bucket_name: String,
    unit: DistanceUnit,
    properties: SceneProperties,
    nodes: Vec<SceneNode>,
    root_nodes: Vec<NodeId>,
    rules: BTreeMap<String, Rule>,
}

impl TwinScene {
    /// Document spec version this model reads and writes
    pub const SPEC_VERSION: &'static str = "1.0";
    /// Document version this model reads and writes
    pub const VERSION: &'static str = "1";

    pub fn new(
        workspace_id: impl Into<String>,
        scene_id: impl Into<String>,
        bucket_name: impl Into<String>,
    ) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            scene_id: scene_id.into(),
            bucket_name: bucket_name.into(),
            unit: DistanceUnit::Meters,
            properties: SceneProperties::default(),
            nodes: Vec::new(),
            root_nodes: Vec::new(),
            rules: BTreeMap::new(),
        }
    }

    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    pub fn scene_id(&self) -> &str {
        &self.scene_id
    }

    /// Storage bucket backing the scene's model files; not serialized
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    pub fn unit(&self) -> DistanceUnit {
        self.unit
    }

    pub fn set_unit(&mut self, unit: DistanceUnit) {
        self.unit = unit;
    }

    pub fn properties(&self) -> &SceneProperties {
        &self.properties
    }

    pub fn set_properties(&mut self, properties: SceneProperties) {
        self.properties = properties;
    }

    pub fn set_environment_preset(&mut self, preset: EnvironmentPreset) {
        self.properties.environment_preset = Some(preset);
    }

    // Nodes

    /// Insert a node into the arena and return its handle. The node is not
    /// attached to the tree until it becomes a root or a child.
    pub fn add_node(&mut self, node: SceneNode) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn node(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut SceneNode {
        &mut self.nodes[id.index()]
    }

    pub fn root_nodes(&self) -> &[NodeId] {
        &self.root_nodes
    }

    pub fn add_root_node(&mut self, id: NodeId) {
        self.root_nodes.push(id);
    }

    pub fn add_root_node_if_name_not_exist(&mut self, id: NodeId) {
        let name = &self.nodes[id.index()].name;
        let exists = self
            .root_nodes
            .iter()
            .any(|&root| self.nodes[root.index()].name == *name);
        if !exists {
            self.root_nodes.push(id);
        }
    }

    pub fn add_child_node(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.index()].children_mut().push(child);
    }

    pub fn add_child_node_if_name_not_exist(&mut self, parent: NodeId, child: NodeId) {
        let name = &self.nodes[child.index()].name;
        let exists = self.nodes[parent.index()]
            .children()
            .iter()
            .any(|&c| self.nodes[c.index()].name == *name);
        if !exists {
            self.nodes[parent.index()].children_mut().push(child);
        }
    }

    pub fn add_component(&mut self, id: NodeId, component: Component) -> Result<()> {
        self.nodes[id.index()].add_component(component)
    }

    pub fn add_model_shader(&mut self, id: NodeId, shader: ModelShader) {
        self.nodes[id.index()].add_model_shader(shader);
    }

    // Lookup

    pub fn find_root_nodes_by_name(&self, name: &str) -> Vec<NodeId> {
        self.root_nodes
            .iter()
            .copied()
            .filter(|&id| self.nodes[id.index()].name == name)
            .collect()
    }

    pub fn find_root_nodes_by_type(&self, component_type: ComponentType) -> Vec<NodeId> {
        self.root_nodes
            .iter()
            .copied()
            .filter(|&id| self.nodes[id.index()].has_component_type(component_type))
            .collect()
    }

    /// Immediate children of `parent` with a matching name
    pub fn find_child_nodes_by_name(&self, parent: NodeId, name: &str) -> Vec<NodeId> {
        self.nodes[parent.index()]
            .children()
            .iter()
            .copied()
            .filter(|&id| self.nodes[id.index()].name == name)
            .collect()
    }

    /// Immediate children of `parent` carrying a component of the given type
    pub fn find_child_nodes_by_type(
        &self,
        parent: NodeId,
        component_type: ComponentType,
    ) -> Vec<NodeId> {
        self.nodes[parent.index()]
            .children()
            .iter()
            .copied()
            .filter(|&id| self.nodes[id.index()].has_component_type(component_type))
            .collect()
    }

    /// All matching nodes in the scene, pre-order over the roots
    pub fn find_all_nodes_by_name(&self, name: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        for &root in &self.root_nodes {
            self.collect_by_name(root, name, &mut out);
        }
        out
    }

    /// All matching nodes in the subtree rooted at `node`, itself included
    pub fn find_all_nodes_by_name_under(&self, node: NodeId, name: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_by_name(node, name, &mut out);
        out
    }

    pub fn find_all_nodes_by_type(&self, component_type: ComponentType) -> Vec<NodeId> {
        let mut out = Vec::new();
        for &root in &self.root_nodes {
            self.collect_by_type(root, component_type, &mut out);
        }
        out
    }

    pub fn find_all_nodes_by_type_under(
        &self,
        node: NodeId,
        component_type: ComponentType,
    ) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_by_type(node, component_type, &mut out);
        out
    }

    fn collect_by_name(&self, id: NodeId, name: &str, out: &mut Vec<NodeId>) {
        if self.nodes[id.index()].name == name {
            out.push(id);
        }
        for &child in self.nodes[id.index()].children() {
            self.collect_by_name(child, name, out);
        }
    }

    fn collect_by_type(&self, id: NodeId, component_type: ComponentType, out: &mut Vec<NodeId>) {
        if self.nodes[id.index()].has_component_type(component_type) {
            out.push(id);
        }
        for &child in self.nodes[id.index()].children() {
            self.collect_by_type(child, component_type, out);
        }
    }

    // Structure edits

    /// Detach the first structural occurrence of `target`, searching roots
    /// first and then each root's subtree depth-first. Returns whether the
    /// node was found. The arena slot is kept.
    pub fn delete_node(&mut self, target: NodeId) -> bool {
        for i in 0..self.root_nodes.len() {
            if self.root_nodes[i] == target {
                self.root_nodes.remove(i);
                return true;
            }
            if self.delete_in_subtree(self.root_nodes[i], target) {
                return true;
            }
        }
        false
    }

    fn delete_in_subtree(&mut self, parent: NodeId, target: NodeId) -> bool {
        if let Some(pos) = self.nodes[parent.index()]
            .children()
            .iter()
            .position(|&c| c == target)
        {
            self.nodes[parent.index()].children_mut().remove(pos);
            return true;
        }
        let children = self.nodes[parent.index()].children().to_vec();
        for child in children {
            if self.delete_in_subtree(child, target) {
                return true;
            }
        }
        false
    }

    pub fn clear_all_children_nodes(&mut self, id: NodeId) {
        self.nodes[id.index()].children_mut().clear();
    }

    /// Drop all roots. Arena slots are kept; handles stay valid but the
    /// tree is empty.
    pub fn clear(&mut self) {
        self.root_nodes.clear();
    }

    /// Verify the tree is acyclic and no node is reachable twice.
    ///
    /// Must pass before every save.
    pub fn self_check(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for &root in &self.root_nodes {
            self.self_check_inner(root, &mut seen)?;
        }
        Ok(())
    }

    fn self_check_inner(&self, id: NodeId, seen: &mut HashSet<NodeId>) -> Result<()> {
        if !seen.insert(id) {
            return Err(SceneError::CycleDetected(self.nodes[id.index()].name.clone()));
        }
        for &child in self.nodes[id.index()].children() {
            self.self_check_inner(child, seen)?;
        }
        Ok(())
    }

    // Rules

    /// Insert a rule, overwriting any rule with the same id
    pub fn add_rule(&mut self, rule_id: impl Into<String>, rule: Rule) {
        self.rules.insert(rule_id.into(), rule);
    }

    pub fn add_rules(&mut self, rules: impl IntoIterator<Item = (String, Rule)>) {
        for (id, rule) in rules {
            self.rules.insert(id, rule);
        }
    }

    pub fn rules(&self) -> &BTreeMap<String, Rule> {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{ModelRef, ModelType, Tag};
    use crate::rule::{Statement, Target};

    fn scene_with_line() -> (TwinScene, NodeId, NodeId, NodeId) {
        let mut scene = TwinScene::new("factory", "floor-1", "bucket");
        let line = scene.add_node(SceneNode::with_model_ref(
            "Line1",
            ModelRef::new("line.glb", ModelType::Glb),
        ));
        scene.add_root_node(line);
        let alarm = scene.add_node(SceneNode::with_tag("Alarm", Tag::new()));
        scene.add_child_node(line, alarm);
        let inner = scene.add_node(SceneNode::with_tag("Alarm", Tag::new()));
        scene.add_child_node(alarm, inner);
        (scene, line, alarm, inner)
    }

    #[test]
    fn test_find_all_nodes_preorder() {
        let (scene, line, alarm, inner) = scene_with_line();
        assert_eq!(scene.find_all_nodes_by_name("Alarm"), vec![alarm, inner]);
        assert_eq!(
            scene.find_all_nodes_by_type(ComponentType::Tag),
            vec![alarm, inner]
        );
        assert_eq!(
            scene.find_all_nodes_by_type(ComponentType::ModelRef),
            vec![line]
        );
    }

    #[test]
    fn test_find_child_nodes_stops_at_immediate_children() {
        let (scene, line, alarm, _) = scene_with_line();
        assert_eq!(scene.find_child_nodes_by_name(line, "Alarm"), vec![alarm]);
        assert!(scene.find_child_nodes_by_name(line, "Missing").is_empty());
        assert_eq!(
            scene.find_child_nodes_by_type(line, ComponentType::Tag),
            vec![alarm]
        );
    }

    #[test]
    fn test_add_child_node_if_name_not_exist() {
        let (mut scene, line, _, _) = scene_with_line();
        let duplicate = scene.add_node(SceneNode::new("Alarm"));
        scene.add_child_node_if_name_not_exist(line, duplicate);
        assert_eq!(scene.node(line).children().len(), 1);

        let fresh = scene.add_node(SceneNode::new("Gauge"));
        scene.add_child_node_if_name_not_exist(line, fresh);
        assert_eq!(scene.node(line).children().len(), 2);
    }

    #[test]
    fn test_add_root_node_if_name_not_exist() {
        let (mut scene, _, _, _) = scene_with_line();
        let duplicate = scene.add_node(SceneNode::new("Line1"));
        scene.add_root_node_if_name_not_exist(duplicate);
        assert_eq!(scene.root_nodes().len(), 1);
    }

    #[test]
    fn test_delete_node_detaches_nested_node() {
        let (mut scene, line, alarm, inner) = scene_with_line();
        assert!(scene.delete_node(inner));
        assert!(scene.node(alarm).children().is_empty());
        assert!(!scene.delete_node(inner));
        assert!(scene.delete_node(line));
        assert!(scene.root_nodes().is_empty());
    }

    #[test]
    fn test_clear_all_children_nodes() {
        let (mut scene, line, _, _) = scene_with_line();
        scene.clear_all_children_nodes(line);
        assert!(scene.node(line).children().is_empty());
    }

    #[test]
    fn test_self_check_detects_shared_node() {
        let (mut scene, line, _, inner) = scene_with_line();
        // inner is now reachable both through alarm and directly from line
        scene.add_child_node(line, inner);
        let err = scene.self_check().unwrap_err();
        assert!(matches!(err, SceneError::CycleDetected(name) if name == "Alarm"));
    }

    #[test]
    fn test_self_check_detects_child_cycle() {
        let mut scene = TwinScene::new("w", "s", "b");
        let a = scene.add_node(SceneNode::new("a"));
        let b = scene.add_node(SceneNode::new("b"));
        scene.add_root_node(a);
        scene.add_child_node(a, b);
        scene.add_child_node(b, a);
        assert!(scene.self_check().is_err());
    }

    #[test]
    fn test_rules_overwrite_on_collision() {
        let mut scene = TwinScene::new("w", "s", "b");
        let mut first = Rule::new();
        first.add_statement(Statement::new("value > 1", Target::Warning));
        scene.add_rule("alarm", first);

        let mut second = Rule::new();
        second.add_statement(Statement::new("value > 2", Target::Error));
        scene.add_rule("alarm", second);

        assert_eq!(scene.rules().len(), 1);
        assert_eq!(
            scene.rules()["alarm"].statements()[0].target(),
            Target::Error
        );
    }

    #[test]
    fn test_clear_empties_roots() {
        let (mut scene, _, _, _) = scene_with_line();
        scene.clear();
        assert!(scene.root_nodes().is_empty());
        assert!(scene.find_all_nodes_by_name("Alarm").is_empty());
    }
}
