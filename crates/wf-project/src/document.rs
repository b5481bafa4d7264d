//! JSON import/export document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use wf_graph::{Edge, Graph, Node};

use crate::{ProjectError, ProjectResult};

pub const EXPORT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub exported_at: DateTime<Utc>,
}

/// `{ nodes, edges, metadata }` as written by export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportDocument {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub metadata: ExportMetadata,
}

/// A file ready to be offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub contents: String,
}

pub fn export_document(
    graph: &Graph,
    created_at: DateTime<Utc>,
    exported_at: DateTime<Utc>,
) -> ExportDocument {
    ExportDocument {
        nodes: graph.nodes().to_vec(),
        edges: graph.edges().to_vec(),
        metadata: ExportMetadata {
            version: EXPORT_VERSION.to_string(),
            created_at,
            exported_at,
        },
    }
}

/// Serialize `graph` into a timestamped `workflow-<stamp>.json` file.
pub fn export_file(
    graph: &Graph,
    created_at: DateTime<Utc>,
    exported_at: DateTime<Utc>,
) -> ProjectResult<ExportFile> {
    let document = export_document(graph, created_at, exported_at);
    let contents = serde_json::to_string_pretty(&document)?;
    let file_name = format!("workflow-{}.json", exported_at.format("%Y%m%d-%H%M%S"));
    info!(file = %file_name, nodes = document.nodes.len(), "exported workflow");
    Ok(ExportFile {
        file_name,
        contents,
    })
}

/// Parse a user-supplied workflow file.
///
/// Accepts any JSON object with `nodes` and `edges` arrays; other top-level
/// fields (such as export metadata) are ignored.
pub fn import_json(text: &str) -> ProjectResult<Graph> {
    let value: Value = serde_json::from_str(text).map_err(|e| {
        warn!(error = %e, "import parse failed");
        ProjectError::ParseFailed(e)
    })?;

    let invalid = |reason: String| {
        warn!(%reason, "import rejected");
        ProjectError::InvalidFormat { reason }
    };

    let Value::Object(mut fields) = value else {
        return Err(invalid("expected a JSON object".to_string()));
    };
    let (Some(nodes), Some(edges)) = (fields.remove("nodes"), fields.remove("edges")) else {
        return Err(invalid("both 'nodes' and 'edges' are required".to_string()));
    };

    let nodes: Vec<Node> =
        serde_json::from_value(nodes).map_err(|e| invalid(format!("nodes: {}", e)))?;
    let edges: Vec<Edge> =
        serde_json::from_value(edges).map_err(|e| invalid(format!("edges: {}", e)))?;

    let graph = Graph::from_parts(nodes, edges).map_err(|e| invalid(e.to_string()))?;
    info!(
        nodes = graph.nodes().len(),
        edges = graph.edges().len(),
        "imported workflow"
    );
    Ok(graph)
}
