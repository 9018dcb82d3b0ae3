//! Build-time configuration.
//!
//! Values are baked in by `trunk build` from the environment, so changing
//! the backend origin means rebuilding the bundle.

use crate::graph::UnidentifiedPolicy;

/// Backend origin used when `THREATVERSE_API_BASE` is not set.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
/// Traversal depth of the subgraph shown after a search.
pub const DEFAULT_GRAPH_DEPTH: u32 = 1;

/// Settings shared by the whole component tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
	/// Origin every API path is resolved against. Not validated here.
	pub api_base: String,
	/// Depth passed to `/graph/{id}`.
	pub graph_depth: u32,
	/// What to do with graph nodes that carry no identifier.
	pub unidentified: UnidentifiedPolicy,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			api_base: DEFAULT_API_BASE.into(),
			graph_depth: DEFAULT_GRAPH_DEPTH,
			unidentified: UnidentifiedPolicy::Reject,
		}
	}
}

impl Config {
	/// Reads the compile-time environment.
	pub fn from_env() -> Self {
		Self::from_vars(
			option_env!("THREATVERSE_API_BASE"),
			option_env!("THREATVERSE_GRAPH_DEPTH"),
			option_env!("THREATVERSE_UNIDENTIFIED"),
		)
	}

	fn from_vars(base: Option<&str>, depth: Option<&str>, unidentified: Option<&str>) -> Self {
		let defaults = Self::default();
		let api_base = match base.map(str::trim) {
			Some(b) if !b.is_empty() => b.to_string(),
			_ => defaults.api_base,
		};
		let graph_depth = depth
			.and_then(|d| d.trim().parse().ok())
			.unwrap_or(defaults.graph_depth);
		let unidentified = match unidentified.map(|u| u.trim().to_ascii_lowercase()) {
			Some(u) if u == "ephemeral" => UnidentifiedPolicy::Ephemeral,
			_ => defaults.unidentified,
		};
		Self {
			api_base,
			graph_depth,
			unidentified,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unset_environment_uses_local_backend() {
		let config = Config::from_vars(None, None, None);
		assert_eq!(config, Config::default());
		assert_eq!(config.api_base, "http://localhost:8000");
	}

	#[test]
	fn origin_is_taken_verbatim() {
		let config = Config::from_vars(Some("not a url"), None, None);
		assert_eq!(config.api_base, "not a url");
	}

	#[test]
	fn bad_depth_falls_back() {
		assert_eq!(Config::from_vars(None, Some("3"), None).graph_depth, 3);
		assert_eq!(Config::from_vars(None, Some("deep"), None).graph_depth, 1);
	}

	#[test]
	fn unidentified_policy() {
		assert_eq!(
			Config::from_vars(None, None, Some("Ephemeral")).unidentified,
			UnidentifiedPolicy::Ephemeral
		);
		assert_eq!(
			Config::from_vars(None, None, Some("whatever")).unidentified,
			UnidentifiedPolicy::Reject
		);
	}
}
