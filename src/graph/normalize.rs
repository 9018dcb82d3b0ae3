use log::warn;
use serde_json::Value;
use thiserror::Error;

use super::record::{EntityRecord, id_text};
use crate::api::{BackendEdge, Subgraph};
use crate::components::force_graph::{GraphData, GraphEdge, GraphNode};

/// How to treat nodes with no identifying field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnidentifiedPolicy {
	/// Drop the node and log it.
	#[default]
	Reject,
	/// Give the node a random 7 character id. The id changes on every
	/// fetch, so edges can never point at it.
	Ephemeral,
}

/// Failure to turn a backend record into a graph element.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GraphError {
	/// None of `_uid`, `uid`, `stix_id`, `misp_id`, `name` is set.
	#[error("node has no identifier (fields: {})", .fields.join(", "))]
	UnidentifiedEntity { fields: Vec<String> },
}

/// Builds the canvas node for one backend record.
pub fn normalize_node(record: &EntityRecord) -> Result<GraphNode, GraphError> {
	let shape = record.shape();
	let id = shape.id().ok_or_else(|| GraphError::UnidentifiedEntity {
		fields: record.fields().keys().cloned().collect(),
	})?;
	Ok(GraphNode {
		id: id.to_string(),
		label: record.label_or(id),
		classes: record.classes(),
	})
}

fn ephemeral_node(record: &EntityRecord) -> GraphNode {
	let mut id = uuid::Uuid::new_v4().simple().to_string();
	id.truncate(7);
	GraphNode {
		label: record.label_or(&id),
		classes: record.classes(),
		id,
	}
}

/// Edge at position `index` of the backend list. Endpoints follow the same
/// string-or-number rule as node ids. Edges without both endpoints are
/// skipped but still consume their index.
pub fn normalize_edge(index: usize, edge: &BackendEdge) -> Option<GraphEdge> {
	let (source, target) = (id_text(&edge.start)?, id_text(&edge.end)?);
	Some(GraphEdge {
		id: format!("e{index}"),
		source,
		target,
		label: edge_label(&edge.kind),
	})
}

fn edge_label(kind: &Value) -> String {
	match kind {
		Value::String(s) => s.clone(),
		Value::Object(attrs) => attrs
			.get("key")
			.and_then(Value::as_str)
			.unwrap_or_default()
			.to_string(),
		_ => String::new(),
	}
}

/// Converts a whole subgraph. No referential checks between edges and nodes.
pub fn to_graph_data(subgraph: &Subgraph, policy: UnidentifiedPolicy) -> GraphData {
	let nodes = subgraph
		.nodes
		.iter()
		.filter_map(|record| match normalize_node(record) {
			Ok(node) => Some(node),
			Err(err) => match policy {
				UnidentifiedPolicy::Reject => {
					warn!("dropping graph node: {err}");
					None
				}
				UnidentifiedPolicy::Ephemeral => Some(ephemeral_node(record)),
			},
		})
		.collect();
	let edges = subgraph
		.edges
		.iter()
		.enumerate()
		.filter_map(|(i, e)| normalize_edge(i, e))
		.collect();
	GraphData { nodes, edges }
}
