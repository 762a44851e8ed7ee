//! Canonical sample workflow map
//!
//! One collect node gathering `/foo/bar` and publishing to `rabbitmq` v5.

use crate::error::Result;
use crate::node::{CollectWorkflowMapNode, PublishWorkflowMapNode};
use crate::workflow_map::WorkflowMap;

pub const SAMPLE_NAMESPACE: &str = "/foo/bar";
pub const SAMPLE_PUBLISHER: &str = "rabbitmq";
pub const SAMPLE_PUBLISHER_VERSION: i64 = 5;

pub fn sample_workflow_map() -> Result<WorkflowMap> {
    let mut collect = CollectWorkflowMapNode::new();
    collect.add(PublishWorkflowMapNode::new(
        SAMPLE_PUBLISHER,
        SAMPLE_PUBLISHER_VERSION,
    ));
    collect.add_metric_namespace(SAMPLE_NAMESPACE)?;

    Ok(WorkflowMap::with_collect(collect))
}

/// Sample map as compact JSON
pub fn sample_workflow_map_json() -> Result<String> {
    sample_workflow_map()?.to_json()
}
