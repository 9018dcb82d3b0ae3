use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::graph::EntityRecord;

#[derive(Serialize, Debug)]
pub(crate) struct LoginRequest<'a> {
	pub username: &'a str,
	pub password: &'a str,
}

/// `/auth/login` response.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct TokenResponse {
	/// Bearer credential for subsequent requests.
	pub access_token: String,
	/// Always `bearer` on the current backend.
	#[serde(default)]
	pub token_type: Option<String>,
}

/// Counts reported by both ingestion endpoints.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct IngestResult {
	/// Nodes created or merged.
	pub ingested_nodes: u64,
	/// Relationships created.
	pub ingested_rels: u64,
}

/// Which bundle format an upload is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IngestFormat {
	/// STIX 2 bundle.
	Stix,
	/// MISP event export.
	Misp,
}

impl IngestFormat {
	pub(crate) fn path(self) -> &'static str {
		match self {
			IngestFormat::Stix => "stix",
			IngestFormat::Misp => "misp",
		}
	}

	/// Short name used in notices.
	pub fn label(self) -> &'static str {
		match self {
			IngestFormat::Stix => "Stix",
			IngestFormat::Misp => "MISP",
		}
	}
}

/// A file picked by the user, already read into memory.
#[derive(Clone, Debug)]
pub struct UploadFile {
	/// Original file name, sent as the part's filename.
	pub name: String,
	/// Raw contents. Not validated client-side.
	pub bytes: Vec<u8>,
}

/// `/graph/{id}` response.
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct Subgraph {
	/// Node records in backend order.
	#[serde(default)]
	pub nodes: Vec<EntityRecord>,
	/// Relationships in backend order.
	#[serde(default)]
	pub edges: Vec<BackendEdge>,
}

/// One relationship as the backend reports it.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct BackendEdge {
	/// Source node id, a string or a number depending on the store.
	#[serde(default)]
	pub start: serde_json::Value,
	/// Target node id.
	#[serde(default)]
	pub end: serde_json::Value,
	/// Relationship type. A string from graph databases, an attribute map
	/// from the in-memory store.
	#[serde(rename = "type", default)]
	pub kind: serde_json::Value,
}

/// One row of `/ml/anomaly/{id}`, highest centrality first.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct AnomalyScore {
	/// Node id.
	pub node: Option<String>,
	/// Degree centrality within the subgraph.
	pub centrality: f64,
}

/// `/ml/cluster/{id}`: node id to cluster label (`-1` is noise).
pub type ClusterAssignments = BTreeMap<String, i64>;

/// `/health` response.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Health {
	/// `ok` when the backend is up.
	pub status: String,
	/// Backend application name.
	#[serde(default)]
	pub app: Option<String>,
}
