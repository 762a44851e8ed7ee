//! Workflow map root and its format adapters
//!
//! ```yaml
//! collect:
//!   metric_namespaces: [/intel/cpu/load]
//!   process:
//!     - plugin_name: learn
//!       plugin_version: 3
//!       publish:
//!         - plugin_name: rabbitmq
//!           plugin_version: 5
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{Result, WmapError};
use crate::node::CollectWorkflowMapNode;
use crate::payload::{Format, Payload};

/// A map of a desired workflow, handed to the scheduler for instantiation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowMap {
    #[serde(rename = "collect", default, skip_serializing_if = "Option::is_none")]
    collect_node: Option<CollectWorkflowMapNode>,
}

impl WorkflowMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collect(collect: CollectWorkflowMapNode) -> Self {
        Self {
            collect_node: Some(collect),
        }
    }

    /// Decode a JSON document (string or bytes)
    pub fn from_json<'a>(payload: impl Into<Payload<'a>>) -> Result<Self> {
        decode(Format::Json, payload.into())
    }

    /// Decode a YAML document (string or bytes)
    pub fn from_yaml<'a>(payload: impl Into<Payload<'a>>) -> Result<Self> {
        decode(Format::Yaml, payload.into())
    }

    /// Decode in the given format
    pub fn from_payload<'a>(format: Format, payload: impl Into<Payload<'a>>) -> Result<Self> {
        decode(format, payload.into())
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| WmapError::encode(Format::Json, e))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| WmapError::encode(Format::Json, e))
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| WmapError::encode(Format::Yaml, e))
    }

    /// Encode in the given format (JSON is compact)
    pub fn encode(&self, format: Format) -> Result<String> {
        match format {
            Format::Json => self.to_json(),
            Format::Yaml => self.to_yaml(),
        }
    }

    pub fn collect(&self) -> Option<&CollectWorkflowMapNode> {
        self.collect_node.as_ref()
    }

    pub fn collect_mut(&mut self) -> Option<&mut CollectWorkflowMapNode> {
        self.collect_node.as_mut()
    }

    /// Install the collect node, returning the one it replaces
    pub fn set_collect(
        &mut self,
        collect: CollectWorkflowMapNode,
    ) -> Option<CollectWorkflowMapNode> {
        self.collect_node.replace(collect)
    }

    /// Collect node, created empty on first use
    pub fn collect_or_default(&mut self) -> &mut CollectWorkflowMapNode {
        self.collect_node.get_or_insert_with(CollectWorkflowMapNode::default)
    }

    pub fn is_empty(&self) -> bool {
        self.collect_node.is_none()
    }
}

#[instrument(level = "debug", skip(payload), fields(kind = payload.kind(), bytes = payload.len()))]
fn decode(format: Format, payload: Payload<'_>) -> Result<WorkflowMap> {
    let bytes = payload.as_bytes();
    let decoded = match format {
        Format::Json => serde_json::from_slice::<Option<WorkflowMap>>(bytes)
            .map_err(|e| WmapError::decode(format, e)),
        Format::Yaml => serde_yaml::from_slice::<Option<WorkflowMap>>(bytes)
            .map_err(|e| WmapError::decode(format, e)),
    }
    // A null document is the empty map
    .map(Option::unwrap_or_default);

    match &decoded {
        Ok(wmap) => debug!(
            has_collect = !wmap.is_empty(),
            nodes = wmap.collect().map_or(0, |c| c.node_count()),
            "decoded workflow map"
        ),
        Err(e) => debug!(error = %e, "failed to decode workflow map"),
    }
    decoded
}
