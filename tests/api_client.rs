//! Contract tests for the backend client against an in-process server.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use threatverse_ui::api::{ApiClient, ApiError, IngestFormat, Session, UploadFile};

#[derive(Clone, Debug, PartialEq)]
struct Upload {
	field: String,
	file_name: Option<String>,
	body: String,
}

#[derive(Clone, Default)]
struct Seen {
	auth: Arc<Mutex<Vec<(String, Option<String>)>>>,
	uploads: Arc<Mutex<Vec<Upload>>>,
	queries: Arc<Mutex<Vec<(String, HashMap<String, String>)>>>,
}

impl Seen {
	fn record(&self, path: &str, headers: &HeaderMap) {
		let auth = headers
			.get(AUTHORIZATION)
			.and_then(|v| v.to_str().ok())
			.map(str::to_string);
		self.auth.lock().unwrap().push((path.to_string(), auth));
	}

	fn last_auth(&self) -> Option<String> {
		self.auth.lock().unwrap().last().and_then(|(_, a)| a.clone())
	}
}

fn unauthorized(detail: &str) -> Response {
	(StatusCode::UNAUTHORIZED, Json(json!({ "detail": detail }))).into_response()
}

async fn login(State(seen): State<Seen>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
	seen.record("/auth/login", &headers);
	if body["username"] == "admin" && body["password"] == "ChangeMe123" {
		Json(json!({"access_token": "tok-1", "token_type": "bearer"})).into_response()
	} else {
		unauthorized("Invalid credentials")
	}
}

async fn ingest(
	State(seen): State<Seen>,
	Path(kind): Path<String>,
	headers: HeaderMap,
	mut multipart: Multipart,
) -> Response {
	seen.record(&format!("/ingest/{kind}"), &headers);
	if headers.get(AUTHORIZATION).is_none() {
		return unauthorized("Authorization header missing");
	}
	while let Ok(Some(field)) = multipart.next_field().await {
		let upload = Upload {
			field: field.name().unwrap_or_default().to_string(),
			file_name: field.file_name().map(str::to_string),
			body: String::new(),
		};
		let bytes = field.bytes().await.unwrap_or_default();
		seen.uploads.lock().unwrap().push(Upload {
			body: String::from_utf8_lossy(&bytes).into_owned(),
			..upload
		});
	}
	let (nodes, rels) = if kind == "stix" { (5, 3) } else { (2, 1) };
	Json(json!({"ingested_nodes": nodes, "ingested_rels": rels})).into_response()
}

async fn search(
	State(seen): State<Seen>,
	headers: HeaderMap,
	Query(params): Query<HashMap<String, String>>,
) -> Response {
	seen.record("/search", &headers);
	seen.queries
		.lock()
		.unwrap()
		.push(("/search".into(), params.clone()));
	match params.get("q").map(String::as_str) {
		Some("8.8.8.8") => Json(json!([
			{"_uid": "n1", "name": "8.8.8.8"},
			{"_uid": "n7", "name": "8.8.8.8/32"}
		]))
		.into_response(),
		Some("broken") => Json(json!({"not": "a list"})).into_response(),
		_ => Json(json!([])).into_response(),
	}
}

async fn graph(
	State(seen): State<Seen>,
	Path(id): Path<String>,
	headers: HeaderMap,
	Query(params): Query<HashMap<String, String>>,
) -> Response {
	seen.record("/graph", &headers);
	seen.queries.lock().unwrap().push((id.clone(), params));
	Json(json!({
		"nodes": [
			{"_uid": id, "name": "8.8.8.8", "stix_type": "ipv4-addr"},
			{"_uid": "n2", "name": "evil.example", "labels": ["Indicator"]}
		],
		"edges": [{"start": id, "end": "n2", "type": "RESOLVES_TO"}]
	}))
	.into_response()
}

async fn anomaly(
	State(seen): State<Seen>,
	Path(id): Path<String>,
	Query(params): Query<HashMap<String, String>>,
) -> Response {
	seen.queries.lock().unwrap().push((id.clone(), params));
	Json(json!([
		{"node": id, "centrality": 1.0},
		{"node": "n2", "centrality": 0.5}
	]))
	.into_response()
}

async fn cluster(Path(id): Path<String>) -> Response {
	let mut labels = serde_json::Map::new();
	labels.insert(id, json!(0));
	labels.insert("n2".into(), json!(0));
	labels.insert("n3".into(), json!(-1));
	Json(Value::Object(labels)).into_response()
}

async fn health() -> Json<Value> {
	Json(json!({"status": "ok", "app": "ThreatVerse Local"}))
}

async fn serve() -> (String, Seen) {
	let seen = Seen::default();
	let app = Router::new()
		.route("/health", get(health))
		.route("/auth/login", post(login))
		.route("/ingest/{kind}", post(ingest))
		.route("/search", get(search))
		.route("/graph/{id}", get(graph))
		.route("/ml/anomaly/{id}", get(anomaly))
		.route("/ml/cluster/{id}", get(cluster))
		.with_state(seen.clone());
	let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	tokio::spawn(async move {
		axum::serve(listener, app).await.unwrap();
	});
	(format!("http://{addr}"), seen)
}

fn upload(name: &str, body: &str) -> UploadFile {
	UploadFile {
		name: name.into(),
		bytes: body.as_bytes().to_vec(),
	}
}

#[tokio::test]
async fn no_authorization_header_before_login() {
	let (base, seen) = serve().await;
	let client = ApiClient::new(base, Session::new());

	let hits = client.search("nothing").await.unwrap();
	assert!(hits.is_empty());
	assert_eq!(seen.last_auth(), None);
}

#[tokio::test]
async fn login_then_bearer_on_every_request() {
	let (base, seen) = serve().await;
	let session = Session::new();
	let client = ApiClient::new(base, session.clone());

	let token = client.login("admin", "ChangeMe123").await.unwrap();
	assert_eq!(token.access_token, "tok-1");
	assert!(!session.is_set(), "client must not store the token itself");

	session.set(token.access_token);
	client.search("8.8.8.8").await.unwrap();
	assert_eq!(seen.last_auth().as_deref(), Some("Bearer tok-1"));
	client.fetch_graph("n1", 1).await.unwrap();
	assert_eq!(seen.last_auth().as_deref(), Some("Bearer tok-1"));

	session.clear();
	client.search("8.8.8.8").await.unwrap();
	assert_eq!(seen.last_auth(), None);
}

#[tokio::test]
async fn rejected_login_carries_backend_detail() {
	let (base, _seen) = serve().await;
	let client = ApiClient::new(base, Session::new());

	let err = client.login("admin", "wrong").await.unwrap_err();
	assert_eq!(err.status(), Some(reqwest::StatusCode::UNAUTHORIZED));
	assert_eq!(err.user_message(), "Invalid credentials");
}

#[tokio::test]
async fn ingest_posts_one_file_field() {
	let (base, seen) = serve().await;
	let session = Session::new();
	session.set("tok-1");
	let client = ApiClient::new(base, session);

	let stix = client
		.ingest_stix(upload("bundle.json", r#"{"objects":[]}"#))
		.await
		.unwrap();
	assert_eq!((stix.ingested_nodes, stix.ingested_rels), (5, 3));

	let misp = client
		.ingest(IngestFormat::Misp, upload("event.json", r#"{"Event":[]}"#))
		.await
		.unwrap();
	assert_eq!((misp.ingested_nodes, misp.ingested_rels), (2, 1));

	let uploads = seen.uploads.lock().unwrap().clone();
	assert_eq!(
		uploads,
		vec![
			Upload {
				field: "file".into(),
				file_name: Some("bundle.json".into()),
				body: r#"{"objects":[]}"#.into(),
			},
			Upload {
				field: "file".into(),
				file_name: Some("event.json".into()),
				body: r#"{"Event":[]}"#.into(),
			},
		]
	);
}

#[tokio::test]
async fn ingest_without_login_is_a_status_error() {
	let (base, _seen) = serve().await;
	let client = ApiClient::new(base, Session::new());

	let err = client
		.ingest_misp(upload("event.json", "{}"))
		.await
		.unwrap_err();
	assert!(matches!(
		err,
		ApiError::Status {
			status: reqwest::StatusCode::UNAUTHORIZED,
			..
		}
	));
}

#[tokio::test]
async fn search_keeps_backend_order() {
	let (base, seen) = serve().await;
	let client = ApiClient::new(base, Session::new());

	let hits = client.search("8.8.8.8").await.unwrap();
	let ids: Vec<_> = hits.iter().map(|h| h.text("_uid").unwrap()).collect();
	assert_eq!(ids, ["n1", "n7"]);

	let queries = seen.queries.lock().unwrap();
	assert_eq!(queries[0].1.get("q").map(String::as_str), Some("8.8.8.8"));
}

#[tokio::test]
async fn malformed_search_body_is_a_decode_error() {
	let (base, _seen) = serve().await;
	let client = ApiClient::new(base, Session::new());

	let err = client.search("broken").await.unwrap_err();
	assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn graph_id_is_escaped_and_depth_sent() {
	let (base, seen) = serve().await;
	let client = ApiClient::new(base, Session::new());

	let id = "misp-attr-1-url-http://x/y?z";
	let sub = client.fetch_graph(id, 2).await.unwrap();
	assert_eq!(sub.nodes.len(), 2);
	assert_eq!(sub.edges[0].start, json!(id));
	assert_eq!(sub.edges[0].end, json!("n2"));

	let queries = seen.queries.lock().unwrap();
	let (seen_id, params) = queries.last().unwrap();
	assert_eq!(seen_id, id);
	assert_eq!(params.get("depth").map(String::as_str), Some("2"));
}

#[tokio::test]
async fn analysis_endpoints() {
	let (base, seen) = serve().await;
	let client = ApiClient::new(base, Session::new());

	let scores = client
		.fetch_anomaly_analysis("n1", threatverse_ui::api::DEFAULT_ANALYSIS_DEPTH)
		.await
		.unwrap();
	assert_eq!(scores[0].node.as_deref(), Some("n1"));
	assert_eq!(scores[1].centrality, 0.5);
	assert_eq!(
		seen.queries.lock().unwrap().last().unwrap().1.get("depth").map(String::as_str),
		Some("2")
	);

	let clusters = client.fetch_cluster_analysis("n1", 2).await.unwrap();
	assert_eq!(clusters.get("n3"), Some(&-1));
	assert_eq!(clusters.len(), 3);
}

#[tokio::test]
async fn health_reports_app_name() {
	let (base, _seen) = serve().await;
	let client = ApiClient::new(base, Session::new());

	let health = client.health().await.unwrap();
	assert_eq!(health.status, "ok");
	assert_eq!(health.app.as_deref(), Some("ThreatVerse Local"));
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
	let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	drop(listener);
	let client = ApiClient::new(format!("http://{addr}"), Session::new());

	let err = client.health().await.unwrap_err();
	assert!(matches!(err, ApiError::Transport(_)));
}
