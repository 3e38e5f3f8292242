use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::interact::PointerInput;
use super::render;
use super::state::NetworkState;
use super::types::{NetworkSnapshot, ResearcherNode};

/// Screen-space pointer travel below which a press still counts as a click.
const CLICK_SLOP: f64 = 3.0;

fn build_state(snapshot: &NetworkSnapshot, w: f64, h: f64) -> Option<NetworkState> {
	match NetworkState::new(snapshot, w, h) {
		Ok(s) => Some(s),
		Err(err) => {
			// Recoverable empty state: render nothing, keep running.
			warn!("collaboration network unavailable: {err}");
			None
		}
	}
}

/// Canvas host for the collaboration network.
///
/// Replacing `data` rebuilds the graph, layout and selection wholesale; stale
/// coordinates or highlight sets are never shown. `query` drives the live
/// search filter and `on_matches` reports its hits back for a results list;
/// setting `activate` selects a node as if it had been clicked.
/// `on_select`/`on_highlight` feed an external detail panel and summary
/// display.
#[component]
pub fn NetworkGraphCanvas(
	#[prop(into)] data: Signal<NetworkSnapshot>,
	#[prop(optional, into)] query: Option<Signal<String>>,
	#[prop(optional, into)] activate: Option<Signal<Option<String>>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional, into)] on_select: Option<Callback<Option<ResearcherNode>>>,
	#[prop(optional, into)] on_highlight: Option<Callback<(usize, usize)>>,
	#[prop(optional, into)] on_matches: Option<Callback<Vec<ResearcherNode>>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<NetworkState>>> = Rc::new(RefCell::new(None));
	let size: Rc<RefCell<(f64, f64)>> = Rc::new(RefCell::new((0.0, 0.0)));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, size_init, animate_init, resize_cb_init) = (
		state.clone(),
		size.clone(),
		animate.clone(),
		resize_cb.clone(),
	);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
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
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		*size_init.borrow_mut() = (w, h);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();
		*state_init.borrow_mut() = build_state(&data.get_untracked(), w, h);

		if fullscreen {
			let (state_resize, canvas_resize, size_resize) =
				(state_init.clone(), canvas.clone(), size_init.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				*size_resize.borrow_mut() = (nw, nh);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.animation_running {
					s.tick(0.016);
				}
				render::render(s, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// Snapshot replacement: rebuild the whole core, never patch in place.
	let (state_data, size_data) = (state.clone(), size.clone());
	Effect::new(move |prev: Option<()>| {
		let snapshot = data.get();
		if prev.is_none() {
			// Initial build happens in the canvas-init effect.
			return;
		}
		let (w, h) = *size_data.borrow();
		if w <= 0.0 {
			return;
		}
		*state_data.borrow_mut() = build_state(&snapshot, w, h);
		if let Some(cb) = on_select {
			cb.run(None);
		}
		if let Some(cb) = on_highlight {
			cb.run((0, 0));
		}
	});

	let emit_selection = move |s: &NetworkState| {
		if let Some(cb) = on_select {
			cb.run(s.selected_detail().cloned());
		}
		if let Some(cb) = on_highlight {
			cb.run(s.interact.highlight_counts());
		}
	};

	if let Some(query) = query {
		let state_q = state.clone();
		Effect::new(move |_| {
			let q = query.get();
			if let Some(ref mut s) = *state_q.borrow_mut() {
				s.interact.set_query(&q);
				if let Some(cb) = on_matches {
					let hits: Vec<ResearcherNode> =
						s.interact.matches(s.layout.graph()).into_iter().cloned().collect();
					cb.run(hits);
				}
			}
		});
	}

	// Programmatic activation, e.g. clicking a search result. Same path as a
	// canvas click, so re-activating the selection toggles back to idle.
	if let Some(activate) = activate {
		let state_a = state.clone();
		Effect::new(move |prev: Option<()>| {
			let target = activate.get();
			if prev.is_none() {
				return;
			}
			if let Some(id) = target {
				if let Some(ref mut s) = *state_a.borrow_mut() {
					s.pointer(PointerInput::NodeActivate(id));
					emit_selection(s);
				}
			}
		});
	}

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut s) = *state_md.borrow_mut() {
			if let Some(id) = s.node_at_position(x, y) {
				s.drag.active = true;
				s.drag.node_id = Some(id);
				s.drag.start_x = x;
				s.drag.start_y = y;
				s.drag.moved = false;
			} else {
				s.pan.active = true;
				s.pan.start_x = x;
				s.pan.start_y = y;
				s.pan.transform_start_x = s.transform.x;
				s.pan.transform_start_y = s.transform.y;
				s.pan.moved = false;
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if !s.drag.active && !s.pan.active {
				let hovered = s.node_at_position(x, y);
				s.interact.set_hovered(hovered);
			}

			if s.drag.active {
				let (dx, dy) = (x - s.drag.start_x, y - s.drag.start_y);
				if (dx * dx + dy * dy).sqrt() > CLICK_SLOP {
					s.drag.moved = true;
				}
				if s.drag.moved {
					if let Some(id) = s.drag.node_id.clone() {
						let (gx, gy) = s.screen_to_graph(x, y);
						s.layout.pin(&id, gx, gy);
					}
				}
			} else if s.pan.active {
				let (dx, dy) = (x - s.pan.start_x, y - s.pan.start_y);
				if (dx * dx + dy * dy).sqrt() > CLICK_SLOP {
					s.pan.moved = true;
				}
				if s.pan.moved {
					s.transform.x = s.pan.transform_start_x + dx;
					s.transform.y = s.pan.transform_start_y + dy;
				}
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			if s.drag.active {
				// A press that never travelled is an activation; a real drag
				// leaves the node pinned where the user dropped it.
				if !s.drag.moved {
					if let Some(id) = s.drag.node_id.clone() {
						s.pointer(PointerInput::NodeActivate(id));
						emit_selection(s);
					}
				}
			} else if s.pan.active && !s.pan.moved {
				s.pointer(PointerInput::BackgroundActivate);
				emit_selection(s);
			}
			s.drag.active = false;
			s.drag.node_id = None;
			s.pan.active = false;
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.drag.active = false;
			s.drag.node_id = None;
			s.pan.active = false;
			s.interact.set_hovered(None);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

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
			class="network-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
