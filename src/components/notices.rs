//! Notice list replacing blocking alerts.

use leptos::prelude::*;

use crate::shell::Notice;

/// Outcome messages, newest last. Each can be dismissed.
#[component]
pub fn Notices(notices: ReadSignal<Vec<Notice>>, set_notices: WriteSignal<Vec<Notice>>) -> impl IntoView {
	view! {
		<ul class="notices">
			{move || {
				notices
					.get()
					.into_iter()
					.enumerate()
					.map(|(i, notice)| {
						view! {
							<li class=notice.css_class()>
								<span>{notice.message.clone()}</span>
								<button
									class="dismiss"
									on:click=move |_| set_notices.update(|n| {
										if i < n.len() {
											n.remove(i);
										}
									})
								>
									"×"
								</button>
							</li>
						}
					})
					.collect_view()
			}}
		</ul>
	}
}
