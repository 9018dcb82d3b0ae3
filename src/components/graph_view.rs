//! Subgraph fetching around a root entity.

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::force_graph::{ForceGraphCanvas, GraphData, SelectedNode};
use crate::api::ApiClient;
use crate::config::Config;
use crate::graph::{RequestSequence, resolve};

/// Subgraph around `root`, refetched in full whenever `root` changes.
///
/// A failed fetch keeps whatever was on screen. A response that arrives
/// after a newer request was started is dropped.
#[component]
pub fn GraphView(
	#[prop(into)] root: Signal<String>,
	depth: u32,
	#[prop(into)] on_select: Callback<SelectedNode>,
) -> impl IntoView {
	let api = expect_context::<ApiClient>();
	let policy = expect_context::<Config>().unidentified;
	let (elements, set_elements) = signal(GraphData::default());
	let sequence = RequestSequence::new();

	Effect::new(move |_| {
		let root = root.get();
		let (api, sequence) = (api.clone(), sequence.clone());
		let ticket = sequence.begin();
		spawn_local(async move {
			let result = api.fetch_graph(&root, depth).await;
			if let Some(elements) = resolve(&sequence, ticket, &root, result, policy) {
				set_elements.set(elements);
			}
		});
	});

	view! {
		<div class="graph-panel">
			<ForceGraphCanvas data=elements on_select=on_select />
		</div>
	}
}
