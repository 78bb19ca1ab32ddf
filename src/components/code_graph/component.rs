use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::CodeGraphState;
use crate::graph::{Graph, LayoutOptions, LayoutStrategy, layout_with};

/// Pointer travel, in screen pixels, below which a press counts as a click.
const CLICK_SLOP: f64 = 3.0;

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn local_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Canvas view of a code-dependency graph. Clicking a node paints its blast
/// radius up to `max_hops` dependency hops away.
///
/// When `selected` is given it mirrors the selected node id both ways:
/// clicks write it, and writes from elsewhere move the highlight.
#[component]
pub fn CodeGraphCanvas(
	#[prop(into)] graph: Signal<Graph>,
	#[prop(into)] strategy: Signal<LayoutStrategy>,
	#[prop(optional)] options: LayoutOptions,
	#[prop(optional)] selected: Option<RwSignal<Option<String>>>,
	#[prop(default = 3)] max_hops: u32,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<CodeGraphState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let (graph, strategy) = (graph.get(), strategy.get());
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
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

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			log::error!("canvas has no 2d context");
			return;
		};

		match layout_with(&graph, strategy, &options) {
			Ok(positions) => {
				log::info!(
					"showing {} nodes and {} edges ({strategy})",
					graph.nodes.len(),
					graph.edges.len()
				);
				let mut scene = CodeGraphState::new(graph, &positions, strategy, max_hops, w, h);
				if let Some(id) = selected.and_then(|s| s.get_untracked()) {
					if let Err(err) = scene.select_id(Some(&id)) {
						log::warn!("cannot restore selection '{id}': {err}");
					}
				}
				*state_init.borrow_mut() = Some(scene);
			}
			Err(err) => {
				log::error!("cannot lay out code graph: {err}");
				*state_init.borrow_mut() = None;
			}
		}

		if fullscreen && resize_cb_init.borrow().is_none() {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		// One frame loop per component; later runs only swap the state.
		if animate_init.borrow().is_some() {
			return;
		}
		let (state_anim, animate_inner, canvas_anim) =
			(state_init.clone(), animate_init.clone(), canvas.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			match *state_anim.borrow_mut() {
				Some(ref mut s) => {
					s.tick(0.016);
					render::render(s, &ctx);
				}
				None => ctx.clear_rect(
					0.0,
					0.0,
					canvas_anim.width() as f64,
					canvas_anim.height() as f64,
				),
			}
			if let (Some(window), Some(cb)) = (web_sys::window(), &*animate_inner.borrow()) {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	if let Some(selected) = selected {
		let state_sel = state.clone();
		Effect::new(move |_| {
			let id = selected.get();
			if let Some(ref mut s) = *state_sel.borrow_mut() {
				if let Err(err) = s.select_id(id.as_deref()) {
					log::error!("cannot compute blast radius: {err}");
				}
			}
		});
	}

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);

		if let Some(ref mut s) = *state_md.borrow_mut() {
			if let Some(idx) = s.node_at_position(x, y) {
				s.drag.active = true;
				s.drag.moved = false;
				s.drag.node_idx = Some(idx);
				s.drag.start_x = x;
				s.drag.start_y = y;
				let (mut nx, mut ny) = (0.0, 0.0);
				s.graph.visit_nodes(|node| {
					if node.index() == idx {
						(nx, ny) = (node.x(), node.y());
					}
				});
				s.drag.node_start_x = nx;
				s.drag.node_start_y = ny;
			} else {
				s.pan.active = true;
				s.pan.moved = false;
				s.pan.start_x = x;
				s.pan.start_y = y;
				s.pan.transform_start_x = s.transform.x;
				s.pan.transform_start_y = s.transform.y;
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);

		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if !s.drag.active {
				s.hovered = s.node_at_position(x, y);
			}

			if s.drag.active {
				if let Some(idx) = s.drag.node_idx {
					let (sdx, sdy) = (x - s.drag.start_x, y - s.drag.start_y);
					if sdx.hypot(sdy) > CLICK_SLOP {
						s.drag.moved = true;
					}
					if !s.drag.moved {
						return;
					}
					let (nx, ny) = (
						s.drag.node_start_x + (sdx / s.transform.k) as f32,
						s.drag.node_start_y + (sdy / s.transform.k) as f32,
					);
					s.graph.visit_nodes_mut(|node| {
						if node.index() == idx {
							node.data.x = nx;
							node.data.y = ny;
							node.data.is_anchor = true;
						}
					});
				}
			} else if s.pan.active {
				let (sdx, sdy) = (x - s.pan.start_x, y - s.pan.start_y);
				if sdx.hypot(sdy) > CLICK_SLOP {
					s.pan.moved = true;
				}
				s.transform.x = s.pan.transform_start_x + sdx;
				s.transform.y = s.pan.transform_start_y + sdy;
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		// The state borrow ends before `selected` is written, since its
		// effect borrows the state again.
		let picked = {
			let mut guard = state_mu.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			let clicked = if s.drag.active && !s.drag.moved {
				Some(s.drag.node_idx)
			} else if s.pan.active && !s.pan.moved {
				Some(None)
			} else {
				None
			};
			let picked = clicked.map(|target| {
				if let Err(err) = s.select(target) {
					log::error!("cannot compute blast radius: {err}");
				}
				s.selected_id()
			});
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;
			picked
		};
		if let (Some(id), Some(selected)) = (picked, selected) {
			selected.set(id);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;
			s.hovered = None;
		}
	};

	let state_dc = state.clone();
	let on_dblclick = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_dc.borrow_mut() {
			s.fit_view();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);

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
			class="code-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:dblclick=on_dblclick
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
