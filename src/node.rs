//! Workflow map nodes
//!
//! Three stage kinds arranged as a tree:
//! - `CollectWorkflowMapNode`: root stage, metric namespaces + children
//! - `ProcessWorkflowMapNode`: intermediate stage, recursive children
//! - `PublishWorkflowMapNode`: leaf stage, no children
//!
//! Child sequences are append-only. They are readable through slices and
//! only grow through `add` / `try_add`.

use std::fmt;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use tracing::{debug, trace};

use crate::error::{Result, WmapError};
use crate::namespace::MetricNamespace;
use crate::payload::{value_kind, Format};

/// A child of a collect or process node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkflowMapNode {
    #[serde(rename = "process")]
    Process(ProcessWorkflowMapNode),
    #[serde(rename = "publish")]
    Publish(PublishWorkflowMapNode),
}

impl WorkflowMapNode {
    pub fn kind(&self) -> &'static str {
        match self {
            WorkflowMapNode::Process(_) => "process",
            WorkflowMapNode::Publish(_) => "publish",
        }
    }

    /// Decode an untyped child.
    ///
    /// Accepts `{"process": {...}}` or `{"publish": {...}}`; anything else
    /// is an `UnsupportedChildType` for `parent`.
    pub fn from_value(value: Value, parent: &'static str) -> Result<Self> {
        let tag = match &value {
            Value::Object(map) if map.len() == 1 => map.keys().next().cloned(),
            _ => None,
        };

        match tag.as_deref() {
            Some("process") | Some("publish") => {
                serde_json::from_value(value).map_err(|e| WmapError::decode(Format::Json, e))
            }
            Some(other) => Err(WmapError::UnsupportedChildType {
                kind: format!("object '{other}'"),
                parent,
            }),
            None => Err(WmapError::UnsupportedChildType {
                kind: value_kind(&value).to_string(),
                parent,
            }),
        }
    }
}

impl From<ProcessWorkflowMapNode> for WorkflowMapNode {
    fn from(node: ProcessWorkflowMapNode) -> Self {
        WorkflowMapNode::Process(node)
    }
}

impl From<PublishWorkflowMapNode> for WorkflowMapNode {
    fn from(node: PublishWorkflowMapNode) -> Self {
        WorkflowMapNode::Publish(node)
    }
}

fn append(
    parent: &'static str,
    process_nodes: &mut Vec<ProcessWorkflowMapNode>,
    publish_nodes: &mut Vec<PublishWorkflowMapNode>,
    child: WorkflowMapNode,
) {
    trace!(parent_kind = parent, child = child.kind(), "appending child node");
    match child {
        WorkflowMapNode::Process(node) => process_nodes.push(node),
        WorkflowMapNode::Publish(node) => publish_nodes.push(node),
    }
}

fn decode_child(value: Value, parent: &'static str) -> Result<WorkflowMapNode> {
    WorkflowMapNode::from_value(value, parent).inspect_err(|e| {
        debug!(parent_kind = parent, error = %e, "rejected child node");
    })
}

/// A `null` field decodes like a missing one
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Opaque config decoder.
///
/// Builds a `Value` like serde_json does, but fails on input with no JSON
/// form (`.nan`, `.inf`, tagged YAML) instead of turning it into `null`.
fn json_config<'de, D>(deserializer: D) -> std::result::Result<Value, D::Error>
where
    D: Deserializer<'de>,
{
    JsonConfig::deserialize(deserializer).map(|c| c.0)
}

struct JsonConfig(Value);

impl<'de> Deserialize<'de> for JsonConfig {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(JsonConfigVisitor).map(JsonConfig)
    }
}

struct JsonConfigVisitor;

impl<'de> Visitor<'de> for JsonConfigVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a config value representable as JSON")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Value, E> {
        Number::from_f64(v)
            .map(Value::Number)
            .ok_or_else(|| E::custom(format!("non-finite number {v} has no JSON form")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> std::result::Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        json_config(deserializer)
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> std::result::Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        json_config(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(JsonConfig(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Map::new();
        while let Some((key, JsonConfig(value))) = map.next_entry::<String, JsonConfig>()? {
            entries.insert(key, value);
        }
        Ok(Value::Object(entries))
    }
}

// ============================================================================
// COLLECT
// ============================================================================

/// Root stage: metric namespaces to gather plus downstream stages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectWorkflowMapNode {
    #[serde(rename = "metric_namespaces", default, deserialize_with = "null_as_default")]
    metric_namespaces: Vec<MetricNamespace>,

    #[serde(rename = "process", default, deserialize_with = "null_as_default")]
    process_nodes: Vec<ProcessWorkflowMapNode>,

    #[serde(rename = "publish", default, deserialize_with = "null_as_default")]
    publish_nodes: Vec<PublishWorkflowMapNode>,
}

impl CollectWorkflowMapNode {
    pub const KIND: &'static str = "collect";

    pub fn new() -> Self {
        Self::default()
    }

    /// Append a process or publish child
    pub fn add(&mut self, child: impl Into<WorkflowMapNode>) {
        append(
            Self::KIND,
            &mut self.process_nodes,
            &mut self.publish_nodes,
            child.into(),
        );
    }

    /// Append an untyped child; the node is unchanged on error
    pub fn try_add(&mut self, value: Value) -> Result<()> {
        let child = decode_child(value, Self::KIND)?;
        self.add(child);
        Ok(())
    }

    /// Builder form of `add`
    pub fn with_child(mut self, child: impl Into<WorkflowMapNode>) -> Self {
        self.add(child);
        self
    }

    /// Validate and append a metric namespace
    pub fn add_metric_namespace(&mut self, ns: impl Into<String>) -> Result<()> {
        let ns = MetricNamespace::new(ns)?;
        trace!(namespace = %ns, "appending metric namespace");
        self.metric_namespaces.push(ns);
        Ok(())
    }

    pub fn metric_namespaces(&self) -> &[MetricNamespace] {
        &self.metric_namespaces
    }

    pub fn process_nodes(&self) -> &[ProcessWorkflowMapNode] {
        &self.process_nodes
    }

    pub fn publish_nodes(&self) -> &[PublishWorkflowMapNode] {
        &self.publish_nodes
    }

    /// Number of process and publish nodes below this one, at any depth
    pub fn node_count(&self) -> usize {
        self.process_nodes
            .iter()
            .map(|p| 1 + p.node_count())
            .sum::<usize>()
            + self.publish_nodes.len()
    }
}

// ============================================================================
// PROCESS
// ============================================================================

/// Intermediate transformation stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessWorkflowMapNode {
    #[serde(rename = "plugin_name", default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(rename = "plugin_version", default, deserialize_with = "null_as_default")]
    pub version: i64,

    #[serde(rename = "process", default, deserialize_with = "null_as_default")]
    process_nodes: Vec<ProcessWorkflowMapNode>,

    #[serde(rename = "publish", default, deserialize_with = "null_as_default")]
    publish_nodes: Vec<PublishWorkflowMapNode>,

    /// Opaque processor configuration, passed through as-is
    #[serde(
        rename = "processor_config",
        default,
        deserialize_with = "json_config",
        skip_serializing_if = "Value::is_null"
    )]
    pub config: Value,
}

impl ProcessWorkflowMapNode {
    pub const KIND: &'static str = "process";

    pub fn new(name: impl Into<String>, version: i64) -> Self {
        Self {
            name: name.into(),
            version,
            ..Self::default()
        }
    }

    pub fn with_config(mut self, config: Value) -> Self {
        self.config = config;
        self
    }

    /// Append a process or publish child
    pub fn add(&mut self, child: impl Into<WorkflowMapNode>) {
        append(
            Self::KIND,
            &mut self.process_nodes,
            &mut self.publish_nodes,
            child.into(),
        );
    }

    /// Append an untyped child; the node is unchanged on error
    pub fn try_add(&mut self, value: Value) -> Result<()> {
        let child = decode_child(value, Self::KIND)?;
        self.add(child);
        Ok(())
    }

    /// Builder form of `add`
    pub fn with_child(mut self, child: impl Into<WorkflowMapNode>) -> Self {
        self.add(child);
        self
    }

    pub fn process_nodes(&self) -> &[ProcessWorkflowMapNode] {
        &self.process_nodes
    }

    pub fn publish_nodes(&self) -> &[PublishWorkflowMapNode] {
        &self.publish_nodes
    }

    /// Number of process and publish nodes below this one, at any depth
    pub fn node_count(&self) -> usize {
        self.process_nodes
            .iter()
            .map(|p| 1 + p.node_count())
            .sum::<usize>()
            + self.publish_nodes.len()
    }
}

// ============================================================================
// PUBLISH
// ============================================================================

/// Terminal stage; never has children
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublishWorkflowMapNode {
    #[serde(rename = "plugin_name", default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(rename = "plugin_version", default, deserialize_with = "null_as_default")]
    pub version: i64,

    /// Opaque publisher configuration, passed through as-is
    #[serde(
        rename = "publisher_config",
        default,
        deserialize_with = "json_config",
        skip_serializing_if = "Value::is_null"
    )]
    pub config: Value,
}

impl PublishWorkflowMapNode {
    pub const KIND: &'static str = "publish";

    pub fn new(name: impl Into<String>, version: i64) -> Self {
        Self {
            name: name.into(),
            version,
            config: Value::Null,
        }
    }

    pub fn with_config(mut self, config: Value) -> Self {
        self.config = config;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn add_routes_by_kind() {
        let mut collect = CollectWorkflowMapNode::new();
        collect.add(PublishWorkflowMapNode::new("rabbitmq", 5));
        collect.add(ProcessWorkflowMapNode::new("learn", 3));
        collect.add(PublishWorkflowMapNode::new("file", 1));

        assert_eq!(collect.process_nodes().len(), 1);
        assert_eq!(collect.publish_nodes().len(), 2);
        assert_eq!(collect.publish_nodes()[0].name, "rabbitmq");
        assert_eq!(collect.publish_nodes()[1].name, "file");
    }

    #[test]
    fn duplicates_are_kept() {
        let mut process = ProcessWorkflowMapNode::new("learn", 3);
        process.add(PublishWorkflowMapNode::new("rabbitmq", 5));
        process.add(PublishWorkflowMapNode::new("rabbitmq", 5));
        assert_eq!(process.publish_nodes().len(), 2);
        assert_eq!(process.publish_nodes()[0], process.publish_nodes()[1]);
    }

    #[test]
    fn try_add_accepts_tagged_values() {
        let mut collect = CollectWorkflowMapNode::new();
        collect
            .try_add(json!({"publish": {"plugin_name": "rabbitmq", "plugin_version": 5}}))
            .unwrap();
        collect
            .try_add(json!({"process": {"plugin_name": "learn", "plugin_version": 3}}))
            .unwrap();

        assert_eq!(collect.publish_nodes()[0].version, 5);
        assert_eq!(collect.process_nodes()[0].name, "learn");
    }

    #[test]
    fn try_add_rejects_other_kinds_without_mutation() {
        let mut collect = CollectWorkflowMapNode::new();
        collect.add(PublishWorkflowMapNode::new("rabbitmq", 5));

        for value in [
            json!("rabbitmq"),
            json!(5),
            json!([{"publish": {}}]),
            json!({"collect": {}}),
            json!({"plugin_name": "rabbitmq", "plugin_version": 5}),
        ] {
            let err = collect.try_add(value).unwrap_err();
            assert!(
                matches!(err, WmapError::UnsupportedChildType { parent: "collect", .. }),
                "unexpected error: {err:?}"
            );
        }

        assert_eq!(collect.process_nodes().len(), 0);
        assert_eq!(collect.publish_nodes().len(), 1);
    }

    #[test]
    fn try_add_reports_string_kind() {
        let mut process = ProcessWorkflowMapNode::new("learn", 3);
        match process.try_add(json!("oops")) {
            Err(WmapError::UnsupportedChildType { kind, parent }) => {
                assert_eq!(kind, "string");
                assert_eq!(parent, "process");
            }
            other => panic!("Expected UnsupportedChildType, got {other:?}"),
        }
    }

    #[test]
    fn try_add_malformed_tagged_child_is_decode_error() {
        let mut collect = CollectWorkflowMapNode::new();
        let err = collect
            .try_add(json!({"publish": {"plugin_version": "five"}}))
            .unwrap_err();
        assert!(matches!(err, WmapError::Deserialization { .. }));
        assert!(collect.publish_nodes().is_empty());
    }

    #[test]
    fn add_metric_namespace_validates() {
        let mut collect = CollectWorkflowMapNode::new();
        collect.add_metric_namespace("/foo/bar").unwrap();
        let err = collect.add_metric_namespace("foo/bar").unwrap_err();

        assert!(matches!(err, WmapError::InvalidNamespaceFormat { .. }));
        assert_eq!(collect.metric_namespaces().len(), 1);
        assert_eq!(collect.metric_namespaces()[0], "/foo/bar");
    }

    #[test]
    fn node_count_is_recursive() {
        let inner = ProcessWorkflowMapNode::new("average", 1)
            .with_child(PublishWorkflowMapNode::new("influx", 2));
        let outer = ProcessWorkflowMapNode::new("learn", 3)
            .with_child(inner)
            .with_child(PublishWorkflowMapNode::new("file", 1));
        let collect = CollectWorkflowMapNode::new()
            .with_child(outer)
            .with_child(PublishWorkflowMapNode::new("rabbitmq", 5));

        assert_eq!(collect.node_count(), 5);
    }

    #[test]
    fn null_fields_decode_as_empty() {
        let collect: CollectWorkflowMapNode = serde_json::from_str(
            r#"{"metric_namespaces": null, "process": null, "publish": null}"#,
        )
        .unwrap();
        assert_eq!(collect, CollectWorkflowMapNode::new());

        let publish: PublishWorkflowMapNode =
            serde_json::from_str(r#"{"plugin_name": null, "plugin_version": null}"#).unwrap();
        assert_eq!(publish, PublishWorkflowMapNode::new("", 0));
    }

    #[test]
    fn config_is_opaque_and_omitted_when_null() {
        let publish = PublishWorkflowMapNode::new("file", 1)
            .with_config(json!({"path": "/tmp/out", "rotate": [1, 2, {"x": null}]}));
        let encoded = serde_json::to_value(&publish).unwrap();
        assert_eq!(
            encoded["publisher_config"],
            json!({"path": "/tmp/out", "rotate": [1, 2, {"x": null}]})
        );

        let bare = serde_json::to_value(PublishWorkflowMapNode::new("file", 1)).unwrap();
        assert!(bare.get("publisher_config").is_none());
    }
}
