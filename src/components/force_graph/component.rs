use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent, WheelEvent};

use super::render;
use super::state::ForceGraphState;
use super::types::{GraphData, SelectedNode};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn request_frame(cb: &FrameCallback) {
	if let (Some(window), Some(cb)) = (web_sys::window(), cb.borrow().as_ref()) {
		let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
	}
}

fn pointer_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn touch_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &TouchEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let touch = ev.changed_touches().get(0)?;
	let rect = canvas.get_bounding_client_rect();
	Some((
		touch.client_x() as f64 - rect.left(),
		touch.client_y() as f64 - rect.top(),
	))
}

/// Force-directed canvas. Every new `data` value reseeds the simulation;
/// clicking a node reports `{id, label}` through `on_select`.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(into)] on_select: Callback<SelectedNode>,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<ForceGraphState>>> = Rc::new(RefCell::new(None));
	let animate: FrameCallback = Rc::new(RefCell::new(None));
	let (state_init, animate_init) = (state.clone(), animate.clone());

	Effect::new(move |_| {
		let data = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		let (w, h) = (
			width.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_width() as f64)
					.unwrap_or(800.0)
			}),
			height.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_height() as f64)
					.unwrap_or(600.0)
			}),
		);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		debug!(
			"seeding layout with {} nodes, {} edges",
			data.nodes.len(),
			data.edges.len()
		);
		*state_init.borrow_mut() = Some(ForceGraphState::new(&data, w, h));

		// one animation loop per canvas, whatever the number of reseeds
		if animate_init.borrow().is_some() {
			return;
		}
		let ctx = match canvas.get_context("2d") {
			Ok(Some(ctx)) => ctx.dyn_into::<CanvasRenderingContext2d>(),
			_ => {
				error!("canvas has no 2d context");
				return;
			}
		};
		let Ok(ctx) = ctx else {
			error!("2d context has an unexpected type");
			return;
		};

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.animation_running {
					s.tick(0.016);
				}
				render::render(s, &ctx);
			}
			request_frame(&animate_inner);
		}));
		request_frame(&animate_init);
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.press(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.drag_to(x, y);
		}
	};

	let release = {
		let state = state.clone();
		move || {
			let tapped = state.borrow_mut().as_mut().and_then(ForceGraphState::release);
			// state is released before running caller code
			if let Some(node) = tapped {
				on_select.run(node);
			}
		}
	};

	let release_mu = release.clone();
	let on_mouseup = move |_: MouseEvent| release_mu();

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.leave();
		}
	};

	// touch: no synthesized mouse events, so taps are not reported twice
	let state_ts = state.clone();
	let on_touchstart = move |ev: TouchEvent| {
		ev.prevent_default();
		let Some((x, y)) = touch_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_ts.borrow_mut() {
			s.press(x, y);
		}
	};

	let state_tm = state.clone();
	let on_touchmove = move |ev: TouchEvent| {
		ev.prevent_default();
		let Some((x, y)) = touch_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_tm.borrow_mut() {
			s.drag_to(x, y);
		}
	};

	let on_touchend = move |ev: TouchEvent| {
		ev.prevent_default();
		release();
	};

	let state_tc = state.clone();
	let on_touchcancel = move |_: TouchEvent| {
		if let Some(ref mut s) = *state_tc.borrow_mut() {
			s.leave();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};

		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (s.transform.k * factor).clamp(0.1, 10.0);
			let ratio = new_k / s.transform.k;
			s.transform.x = x - (x - s.transform.x) * ratio;
			s.transform.y = y - (y - s.transform.y) * ratio;
			s.transform.k = new_k;
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:touchstart=on_touchstart
			on:touchmove=on_touchmove
			on:touchend=on_touchend
			on:touchcancel=on_touchcancel
			style="display: block; cursor: grab; touch-action: none;"
		/>
	}
}
