//! HTTP client for the ThreatVerse backend.

mod client;
mod error;
mod session;
mod types;

pub use client::{ApiClient, DEFAULT_ANALYSIS_DEPTH};
pub use error::ApiError;
pub use session::Session;
pub use types::{
	AnomalyScore, BackendEdge, ClusterAssignments, Health, IngestFormat, IngestResult, Subgraph,
	TokenResponse, UploadFile,
};
