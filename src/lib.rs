//! wmap - workflow map model for collect/process/publish pipelines

pub mod error;
pub mod namespace;
pub mod node;
pub mod payload;
pub mod render;
pub mod sample;
pub mod workflow_map;

pub use error::{FixSuggestion, Result, WmapError};
pub use namespace::{MetricNamespace, NamespaceError};
pub use node::{
    CollectWorkflowMapNode, ProcessWorkflowMapNode, PublishWorkflowMapNode, WorkflowMapNode,
};
pub use payload::{Format, Payload};
pub use sample::{sample_workflow_map, sample_workflow_map_json};
pub use workflow_map::WorkflowMap;
