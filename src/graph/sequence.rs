use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, error};

use super::normalize::{UnidentifiedPolicy, to_graph_data};
use crate::api::{ApiError, Subgraph};
use crate::components::force_graph::GraphData;

/// Orders overlapping fetches so only the newest one may publish.
#[derive(Clone, Debug, Default)]
pub struct RequestSequence {
	latest: Arc<AtomicU64>,
}

/// Handed out by [`RequestSequence::begin`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

impl RequestSequence {
	/// New sequence with nothing in flight.
	pub fn new() -> Self {
		Self::default()
	}

	/// Starts a request, superseding every earlier ticket.
	pub fn begin(&self) -> Ticket {
		Ticket(self.latest.fetch_add(1, Ordering::Relaxed) + 1)
	}

	/// Whether `ticket` is still the newest request.
	pub fn is_current(&self, ticket: Ticket) -> bool {
		self.latest.load(Ordering::Relaxed) == ticket.0
	}
}

/// What a finished fetch does to the displayed elements: `Some` replaces
/// them, `None` keeps whatever is on screen. Stale and failed fetches
/// both keep it.
pub fn resolve(
	sequence: &RequestSequence,
	ticket: Ticket,
	root: &str,
	result: Result<Subgraph, ApiError>,
	policy: UnidentifiedPolicy,
) -> Option<GraphData> {
	match result {
		Ok(_) if !sequence.is_current(ticket) => {
			debug!("discarding stale subgraph for {root}");
			None
		}
		Ok(subgraph) => Some(to_graph_data(&subgraph, policy)),
		Err(err) => {
			error!("Graph fetch error for {root}: {err}");
			None
		}
	}
}

#[cfg(test)]
mod tests {
	use reqwest::StatusCode;
	use serde_json::json;

	use super::*;

	fn one_node(id: &str) -> Subgraph {
		serde_json::from_value(json!({"nodes": [{"_uid": id}], "edges": []})).unwrap()
	}

	#[test]
	fn late_response_is_stale() {
		let seq = RequestSequence::new();
		let slow = seq.begin();
		let fast = seq.begin();
		// fast resolves first, then slow
		assert!(seq.is_current(fast));
		assert!(!seq.is_current(slow));
	}

	#[test]
	fn clones_share_the_counter() {
		let seq = RequestSequence::new();
		let other = seq.clone();
		let t = seq.begin();
		other.begin();
		assert!(!seq.is_current(t));
	}

	#[test]
	fn stale_response_keeps_current_elements() {
		let seq = RequestSequence::new();
		let slow = seq.begin();
		let _fast = seq.begin();
		let out = resolve(&seq, slow, "n1", Ok(one_node("n1")), UnidentifiedPolicy::Reject);
		assert_eq!(out, None);
	}

	#[test]
	fn failed_fetch_keeps_current_elements() {
		let seq = RequestSequence::new();
		let t = seq.begin();
		let err = ApiError::Status {
			status: StatusCode::INTERNAL_SERVER_ERROR,
			detail: None,
		};
		assert_eq!(resolve(&seq, t, "n1", Err(err), UnidentifiedPolicy::Reject), None);
	}

	#[test]
	fn current_response_replaces_elements() {
		let seq = RequestSequence::new();
		let t = seq.begin();
		let out = resolve(&seq, t, "n2", Ok(one_node("n2")), UnidentifiedPolicy::Reject)
			.unwrap();
		assert_eq!(out.nodes.len(), 1);
		assert_eq!(out.nodes[0].id, "n2");
	}
}
