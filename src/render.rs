//! Diagnostic text rendering
//!
//! Output is for humans, not a wire format. Children render with the
//! parent's pad; publish fields sit one tab deeper.
//!
//! ```text
//! Workflow
//! 	Collect:
//! 		Metric Namespaces:
//! 				/foo/bar
//!
//! 		Process Nodes:
//!
//! 		Publish Nodes:
//! 			Name: rabbitmq
//! 			Version: 5
//!
//! ```

use std::fmt;

use crate::node::{CollectWorkflowMapNode, ProcessWorkflowMapNode, PublishWorkflowMapNode};
use crate::workflow_map::WorkflowMap;

/// Pad used for the collect node under the `Collect:` header
pub const COLLECT_PAD: &str = "\t\t";

impl WorkflowMap {
    pub fn render(&self) -> String {
        let mut out = String::from("Workflow\n\tCollect:\n");
        match self.collect() {
            Some(collect) => out.push_str(&collect.render(COLLECT_PAD)),
            None => out.push('\n'),
        }
        out
    }
}

impl fmt::Display for WorkflowMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl CollectWorkflowMapNode {
    pub fn render(&self, pad: &str) -> String {
        let mut out = format!("{pad}Metric Namespaces:\n");
        for ns in self.metric_namespaces() {
            out.push_str(&format!("{pad}\t\t{ns}\n"));
        }
        out.push('\n');

        out.push_str(&format!("{pad}Process Nodes:\n"));
        for node in self.process_nodes() {
            out.push_str(&node.render(pad));
        }
        out.push('\n');

        out.push_str(&format!("{pad}Publish Nodes:\n"));
        for node in self.publish_nodes() {
            out.push_str(&node.render(pad));
        }
        out.push('\n');
        out
    }
}

impl ProcessWorkflowMapNode {
    pub fn render(&self, pad: &str) -> String {
        let mut out = format!("{pad}Name: {}\n{pad}Version: {}\n", self.name, self.version);

        out.push_str(&format!("{pad}Process Nodes:\n"));
        for node in self.process_nodes() {
            out.push_str(&node.render(pad));
        }

        out.push_str(&format!("{pad}Publish Nodes:\n"));
        for node in self.publish_nodes() {
            out.push_str(&node.render(pad));
        }
        out
    }
}

impl PublishWorkflowMapNode {
    pub fn render(&self, pad: &str) -> String {
        format!("{pad}\tName: {}\n{pad}\tVersion: {}\n", self.name, self.version)
    }
}
