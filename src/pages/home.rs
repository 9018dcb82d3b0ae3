use leptos::ev::{MouseEvent, SubmitEvent};
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::info;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Event, HtmlInputElement};

use crate::api::{ApiClient, ApiError, IngestFormat, UploadFile};
use crate::components::force_graph::SelectedNode;
use crate::components::graph_view::GraphView;
use crate::components::node_detail::NodeDetail;
use crate::components::notices::Notices;
use crate::config::Config;
use crate::shell::{self, Notice, SearchOutcome};

async fn read_file(file: web_sys::File) -> Result<UploadFile, ApiError> {
	let buffer = JsFuture::from(file.array_buffer())
		.await
		.map_err(|e| ApiError::FileRead(format!("{e:?}")))?;
	Ok(UploadFile {
		name: file.name(),
		bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
	})
}

/// Picks the single selected file off a change event.
fn chosen_file(ev: &Event) -> Option<web_sys::File> {
	ev.target()?
		.dyn_into::<HtmlInputElement>()
		.ok()?
		.files()?
		.get(0)
}

/// Root shown by the graph. Only a different id refetches; searching for
/// the same first hit again leaves the graph alone.
fn graph_root_memo(graph_root: ReadSignal<Option<String>>) -> Memo<String> {
	Memo::new(move |_| graph_root.get().unwrap_or_default())
}

#[component]
fn IngestInput(format: IngestFormat, description: &'static str) -> impl IntoView {
	let api = expect_context::<ApiClient>();
	let set_notices = expect_context::<WriteSignal<Vec<Notice>>>();

	let on_change = move |ev: Event| {
		let Some(file) = chosen_file(&ev) else {
			return;
		};
		let api = api.clone();
		spawn_local(async move {
			let result = match read_file(file).await {
				Ok(upload) => api.ingest(format, upload).await,
				Err(err) => Err(err),
			};
			let notice = shell::ingest_notice(format, result);
			set_notices.update(|n| shell::push_notice(n, notice));
		});
	};

	view! {
		<div class="ingest-input">
			<label>{description}</label>
			<input type="file" accept=".json" on:change=on_change />
		</div>
	}
}

/// Application shell: login, ingestion, search, graph and details.
#[component]
pub fn Home() -> impl IntoView {
	let api = expect_context::<ApiClient>();
	let config = expect_context::<Config>();
	let (notices, set_notices) = signal(Vec::<Notice>::new());
	provide_context(set_notices);

	let (logged_in, set_logged_in) = signal(api.session().is_set());
	let (username, set_username) = signal(String::from("admin"));
	let (password, set_password) = signal(String::from("ChangeMe123"));
	let (query, set_query) = signal(String::new());
	let (graph_root, set_graph_root) = signal(None::<String>);
	let (selected, set_selected) = signal(None::<SelectedNode>);
	let (backend, set_backend) = signal(None::<Result<String, String>>);

	let api_health = api.clone();
	spawn_local(async move {
		let status = match api_health.health().await {
			Ok(h) => Ok(h.app.unwrap_or(h.status)),
			Err(err) => Err(err.to_string()),
		};
		set_backend.set(Some(status));
	});

	let api_login = api.clone();
	let do_login = move |ev: SubmitEvent| {
		ev.prevent_default();
		let api = api_login.clone();
		let (user, pass) = (username.get_untracked(), password.get_untracked());
		spawn_local(async move {
			let result = api.login(&user, &pass).await;
			let (ok, notice) = shell::apply_login(api.session(), result);
			if ok {
				info!("logged in as {user}");
				set_logged_in.set(true);
			}
			set_notices.update(|n| shell::push_notice(n, notice));
		});
	};

	let api_logout = api.clone();
	let do_logout = move |_: MouseEvent| {
		api_logout.session().clear();
		set_logged_in.set(false);
		set_notices.update(|n| shell::push_notice(n, Notice::info("Logged out")));
	};

	let api_search = api.clone();
	let do_search = move |ev: SubmitEvent| {
		ev.prevent_default();
		let api = api_search.clone();
		let q = query.get_untracked();
		spawn_local(async move {
			match shell::search_outcome(api.search(&q).await) {
				SearchOutcome::Open(root) => set_graph_root.set(Some(root)),
				SearchOutcome::Stay(notice) => set_notices.update(|n| shell::push_notice(n, notice)),
			}
		});
	};

	let depth = config.graph_depth;
	let root = graph_root_memo(graph_root);
	let on_select = Callback::new(move |node: SelectedNode| set_selected.set(Some(node)));

	view! {
		<div class="shell">
			<header>
				<h1>"ThreatVerse (Local)"</h1>
				<p class="backend-status">
					{move || match backend.get() {
						None => "Backend: checking…".to_string(),
						Some(Ok(app)) => format!("Backend: {app}"),
						Some(Err(err)) => format!("Backend unreachable: {err}"),
					}}
				</p>
			</header>

			<Notices notices=notices set_notices=set_notices />

			<Show
				when=move || !logged_in.get()
				fallback=move || view! {
					<button class="logout" on:click=do_logout.clone()>"Log out"</button>
				}
			>
				<form class="login" on:submit=do_login.clone()>
					<h3>"Login"</h3>
					<input
						name="username"
						placeholder="username"
						prop:value=username
						on:input=move |ev| set_username.set(event_target_value(&ev))
					/>
					<input
						name="password"
						type="password"
						placeholder="password"
						prop:value=password
						on:input=move |ev| set_password.set(event_target_value(&ev))
					/>
					<button>"Login"</button>
				</form>
			</Show>

			<section class="ingest">
				<h3>"Ingest"</h3>
				<IngestInput format=IngestFormat::Stix description="Upload STIX bundle (JSON):" />
				<IngestInput format=IngestFormat::Misp description="Upload MISP export (JSON):" />
			</section>

			<section class="search">
				<h3>"Search & Explore"</h3>
				<form on:submit=do_search>
					<input
						prop:value=query
						on:input=move |ev| set_query.set(event_target_value(&ev))
						placeholder="Search by name/IP/domain..."
					/>
					<button>"Search and open subgraph"</button>
				</form>
			</section>

			<div class="workspace">
				<div class="graph-column">
					<h3>"Graph"</h3>
					<Show
						when=move || graph_root.get().is_some()
						fallback=|| view! {
							<div class="placeholder">"Search or ingest sample data to see graph."</div>
						}
					>
						<GraphView root=root depth=depth on_select=on_select />
					</Show>
				</div>
				<div class="detail-column">
					<h3>"Details"</h3>
					<NodeDetail node=selected />
				</div>
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::sync::atomic::{AtomicUsize, Ordering};

	use super::*;

	#[test]
	fn same_root_does_not_notify() {
		Owner::new().with(|| {
			let (graph_root, set_graph_root) = signal(None::<String>);
			let root = graph_root_memo(graph_root);
			let runs = Arc::new(AtomicUsize::new(0));
			let counted = {
				let runs = runs.clone();
				Memo::new(move |_| {
					root.track();
					runs.fetch_add(1, Ordering::SeqCst)
				})
			};

			counted.get();
			assert_eq!(runs.load(Ordering::SeqCst), 1);
			set_graph_root.set(Some("n1".into()));
			counted.get();
			assert_eq!(runs.load(Ordering::SeqCst), 2);
			set_graph_root.set(Some("n1".into()));
			counted.get();
			assert_eq!(runs.load(Ordering::SeqCst), 2);
			set_graph_root.set(Some("n2".into()));
			counted.get();
			assert_eq!(runs.load(Ordering::SeqCst), 3);
		});
	}
}
