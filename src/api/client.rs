use log::debug;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

use super::error::{ApiError, parse_detail};
use super::session::Session;
use super::types::{
	AnomalyScore, ClusterAssignments, Health, IngestFormat, IngestResult, LoginRequest, Subgraph,
	TokenResponse, UploadFile,
};
use crate::graph::EntityRecord;

/// Depth used by the analysis endpoints when the caller has no opinion.
pub const DEFAULT_ANALYSIS_DEPTH: u32 = 2;

/// Typed client for the ThreatVerse backend.
///
/// Every call is a single request: no retries, no timeouts beyond the
/// platform's own, and failures are handed back unchanged.
#[derive(Clone, Debug)]
pub struct ApiClient {
	base: String,
	session: Session,
}

impl ApiClient {
	/// Client for `base`, authenticating with whatever `session` holds at
	/// request time.
	pub fn new(base: impl Into<String>, session: Session) -> Self {
		Self {
			base: base.into(),
			session,
		}
	}

	/// The configured origin.
	pub fn base(&self) -> &str {
		&self.base
	}

	/// The session credentials are read from.
	pub fn session(&self) -> &Session {
		&self.session
	}

	/// `POST /auth/login`. Storing the returned token is the caller's job.
	pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
		let url = self.url(&["auth", "login"])?;
		let req = self.request(Method::POST, url).json(&LoginRequest { username, password });
		self.send(req).await
	}

	/// `POST /ingest/stix`.
	pub async fn ingest_stix(&self, file: UploadFile) -> Result<IngestResult, ApiError> {
		self.ingest(IngestFormat::Stix, file).await
	}

	/// `POST /ingest/misp`.
	pub async fn ingest_misp(&self, file: UploadFile) -> Result<IngestResult, ApiError> {
		self.ingest(IngestFormat::Misp, file).await
	}

	/// Uploads one file as the multipart field `file`.
	pub async fn ingest(
		&self,
		format: IngestFormat,
		file: UploadFile,
	) -> Result<IngestResult, ApiError> {
		let url = self.url(&["ingest", format.path()])?;
		let part = Part::bytes(file.bytes).file_name(file.name);
		let req = self
			.request(Method::POST, url)
			.multipart(Form::new().part("file", part));
		self.send(req).await
	}

	/// `GET /search?q=`. Results keep backend order.
	pub async fn search(&self, query: &str) -> Result<Vec<EntityRecord>, ApiError> {
		let url = self.url(&["search"])?;
		let req = self.request(Method::GET, url).query(&[("q", query)]);
		self.send(req).await
	}

	/// `GET /graph/{id}?depth=`.
	pub async fn fetch_graph(&self, id: &str, depth: u32) -> Result<Subgraph, ApiError> {
		self.get_with_depth(&["graph", id], depth).await
	}

	/// `GET /ml/anomaly/{id}?depth=`.
	pub async fn fetch_anomaly_analysis(
		&self,
		id: &str,
		depth: u32,
	) -> Result<Vec<AnomalyScore>, ApiError> {
		self.get_with_depth(&["ml", "anomaly", id], depth).await
	}

	/// `GET /ml/cluster/{id}?depth=`.
	pub async fn fetch_cluster_analysis(
		&self,
		id: &str,
		depth: u32,
	) -> Result<ClusterAssignments, ApiError> {
		self.get_with_depth(&["ml", "cluster", id], depth).await
	}

	/// `GET /health`.
	pub async fn health(&self) -> Result<Health, ApiError> {
		let url = self.url(&["health"])?;
		self.send(self.request(Method::GET, url)).await
	}

	async fn get_with_depth<T: DeserializeOwned>(
		&self,
		segments: &[&str],
		depth: u32,
	) -> Result<T, ApiError> {
		let url = self.url(segments)?;
		let req = self.request(Method::GET, url).query(&[("depth", depth)]);
		self.send(req).await
	}

	/// Appends `segments` to the origin's path, percent-escaping each one.
	fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
		let mut url = Url::parse(&self.base)?;
		url.path_segments_mut()
			.map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
			.pop_if_empty()
			.extend(segments);
		Ok(url)
	}

	fn request(&self, method: Method, url: Url) -> RequestBuilder {
		debug!("{method} {url}");
		let req = reqwest::Client::new().request(method, url);
		match self.session.get() {
			Some(token) => req.header(AUTHORIZATION, format!("Bearer {token}")),
			None => req,
		}
	}

	async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
		let resp = req.send().await.map_err(ApiError::Transport)?;
		let status = resp.status();
		if !status.is_success() {
			let body = resp.text().await.unwrap_or_default();
			return Err(ApiError::Status {
				status,
				detail: parse_detail(&body),
			});
		}
		resp.json().await.map_err(ApiError::Decode)
	}
}
