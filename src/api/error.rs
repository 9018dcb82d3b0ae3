use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Everything that can go wrong talking to the backend.
#[derive(Error, Debug)]
pub enum ApiError {
	/// The configured origin could not be turned into a request URL.
	#[error("invalid backend origin: {0}")]
	InvalidOrigin(#[from] url::ParseError),

	/// The request never got a response (network, DNS, CORS).
	#[error("network error: {0}")]
	Transport(#[source] reqwest::Error),

	/// The backend answered with a non-2xx status.
	#[error("HTTP {status}{}", .detail.as_ref().map(|d| format!(": {d}")).unwrap_or_default())]
	Status {
		/// Response status.
		status: StatusCode,
		/// `detail` field of the error body, when the backend sent one.
		detail: Option<String>,
	},

	/// A 2xx body did not have the expected shape.
	#[error("unexpected response body: {0}")]
	Decode(#[source] reqwest::Error),

	/// The selected file could not be read before upload.
	#[error("could not read file: {0}")]
	FileRead(String),
}

impl ApiError {
	/// Text suitable for a notice: the backend's own `detail` when present.
	pub fn user_message(&self) -> String {
		match self {
			ApiError::Status {
				detail: Some(detail),
				..
			} => detail.clone(),
			other => other.to_string(),
		}
	}

	/// Status code for [`ApiError::Status`].
	pub fn status(&self) -> Option<StatusCode> {
		match self {
			ApiError::Status { status, .. } => Some(*status),
			_ => None,
		}
	}
}

#[derive(Deserialize)]
struct ErrorBody {
	detail: serde_json::Value,
}

/// Pulls `detail` out of a FastAPI-style error body. Validation errors
/// carry a list there, which is kept as compact JSON.
pub(crate) fn parse_detail(body: &str) -> Option<String> {
	let parsed: ErrorBody = serde_json::from_str(body).ok()?;
	match parsed.detail {
		serde_json::Value::String(s) => Some(s),
		serde_json::Value::Null => None,
		other => Some(other.to_string()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn detail_string() {
		assert_eq!(
			parse_detail(r#"{"detail":"Invalid credentials"}"#).as_deref(),
			Some("Invalid credentials")
		);
	}

	#[test]
	fn detail_missing_or_not_json() {
		assert_eq!(parse_detail("Internal Server Error"), None);
		assert_eq!(parse_detail(r#"{"error":"x"}"#), None);
	}

	#[test]
	fn user_message_prefers_detail() {
		let err = ApiError::Status {
			status: StatusCode::UNAUTHORIZED,
			detail: Some("Invalid credentials".into()),
		};
		assert_eq!(err.user_message(), "Invalid credentials");
		assert_eq!(err.to_string(), "HTTP 401 Unauthorized: Invalid credentials");

		let bare = ApiError::Status {
			status: StatusCode::BAD_GATEWAY,
			detail: None,
		};
		assert_eq!(bare.user_message(), "HTTP 502 Bad Gateway");
	}
}
