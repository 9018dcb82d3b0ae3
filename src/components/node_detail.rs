//! Read-only view of the selected node.

use leptos::prelude::*;

use super::force_graph::SelectedNode;

/// Heading plus a JSON dump of the selection, or a placeholder.
#[component]
pub fn NodeDetail(#[prop(into)] node: Signal<Option<SelectedNode>>) -> impl IntoView {
	move || match node.get() {
		None => view! { <div class="node-detail empty">"No node selected"</div> }.into_any(),
		Some(node) => {
			let heading = if node.label.is_empty() {
				node.id.clone()
			} else {
				node.label.clone()
			};
			let dump = serde_json::to_string_pretty(&node).unwrap_or_default();
			view! {
				<div class="node-detail">
					<h4>{heading}</h4>
					<pre style="white-space: pre-wrap;">{dump}</pre>
				</div>
			}
			.into_any()
		}
	}
}
