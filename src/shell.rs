//! Outcomes of the shell's user actions, kept free of DOM so they can be
//! tested natively. The page turns these into signal updates.

use crate::api::{ApiError, IngestFormat, IngestResult, Session, TokenResponse};
use crate::graph::EntityRecord;

/// Severity of a [`Notice`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
	/// Neutral outcome, such as an empty search.
	Info,
	/// The action went through.
	Success,
	/// The action failed.
	Error,
}

/// A message for the notice list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
	/// Severity.
	pub level: NoticeLevel,
	/// Text shown to the user.
	pub message: String,
}

impl Notice {
	/// Neutral notice.
	pub fn info(message: impl Into<String>) -> Self {
		Self {
			level: NoticeLevel::Info,
			message: message.into(),
		}
	}

	/// Success notice.
	pub fn success(message: impl Into<String>) -> Self {
		Self {
			level: NoticeLevel::Success,
			message: message.into(),
		}
	}

	/// Failure notice.
	pub fn error(message: impl Into<String>) -> Self {
		Self {
			level: NoticeLevel::Error,
			message: message.into(),
		}
	}

	/// Class list for the rendered item.
	pub fn css_class(&self) -> &'static str {
		match self.level {
			NoticeLevel::Info => "notice notice-info",
			NoticeLevel::Success => "notice notice-success",
			NoticeLevel::Error => "notice notice-error",
		}
	}
}

/// Oldest notices are dropped past this many.
pub const MAX_NOTICES: usize = 20;

/// Appends `notice`, keeping only the newest [`MAX_NOTICES`].
pub fn push_notice(notices: &mut Vec<Notice>, notice: Notice) {
	notices.push(notice);
	if notices.len() > MAX_NOTICES {
		notices.drain(..notices.len() - MAX_NOTICES);
	}
}

/// Stores the token on success. Returns whether the user is now logged in.
pub fn apply_login(session: &Session, result: Result<TokenResponse, ApiError>) -> (bool, Notice) {
	match result {
		Ok(token) => {
			session.set(token.access_token);
			(true, Notice::success("Logged in"))
		}
		Err(err) => (
			false,
			Notice::error(format!("Login failed: {}", err.user_message())),
		),
	}
}

/// What a search does to the displayed graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
	/// Show the subgraph rooted here.
	Open(String),
	/// Leave the graph alone and tell the user why.
	Stay(Notice),
}

/// Only the first hit is opened; the rest are ignored.
pub fn search_outcome(result: Result<Vec<EntityRecord>, ApiError>) -> SearchOutcome {
	let hits = match result {
		Ok(hits) => hits,
		Err(err) => return SearchOutcome::Stay(Notice::error(format!("Search error: {err}"))),
	};
	let Some(first) = hits.first() else {
		return SearchOutcome::Stay(Notice::info("No nodes found"));
	};
	match first.shape().business_id() {
		Some(id) => SearchOutcome::Open(id.to_string()),
		None => SearchOutcome::Stay(Notice::error(
			"First match has no identifier and cannot be opened",
		)),
	}
}

/// Notice for an upload, quoting the backend's counts unchanged.
pub fn ingest_notice(format: IngestFormat, result: Result<IngestResult, ApiError>) -> Notice {
	match result {
		Ok(counts) => Notice::success(format!(
			"{} ingested. nodes: {}, rels: {}",
			format.label(),
			counts.ingested_nodes,
			counts.ingested_rels
		)),
		Err(err) => Notice::error(format!("Ingest error: {err}")),
	}
}
