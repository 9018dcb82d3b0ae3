use serde::Serialize;

/// A node as the canvas draws it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GraphNode {
	/// Unique within one [`GraphData`].
	pub id: String,
	/// Text drawn next to the node.
	pub label: String,
	/// Space separated style classes; the first one picks the color.
	pub classes: String,
}

/// A directed edge. Endpoints are node ids and may name nodes that are
/// not in the same [`GraphData`]; such edges are not drawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
	/// Positional id, `e0`, `e1`, ...
	pub id: String,
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
	/// Relationship type, possibly empty.
	pub label: String,
}

/// Everything the canvas shows at once.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GraphData {
	/// Nodes in backend order.
	pub nodes: Vec<GraphNode>,
	/// Edges in backend order.
	pub edges: Vec<GraphEdge>,
}

/// What a node click reports. Classes and backend fields stay behind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SelectedNode {
	/// Node id.
	pub id: String,
	/// Node label.
	pub label: String,
}
