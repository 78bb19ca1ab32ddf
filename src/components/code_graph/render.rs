use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::DefaultNodeIdx;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::CodeGraphState;
use super::style::{BACKGROUND, NODE_RADIUS};

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &CodeGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_edges(state: &CodeGraphState, ctx: &CanvasRenderingContext2d) {
	let mut positions: HashMap<DefaultNodeIdx, (f64, f64)> = HashMap::new();
	state.graph.visit_nodes(|node| {
		positions.insert(node.index(), (node.x() as f64, node.y() as f64));
	});

	let k = state.transform.k;
	let (dash, gap, arrow_size) = (8.0 / k, 4.0 / k, 8.0 / k);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);
	let t = ease_out_cubic(state.selection.highlight_t);
	let has_highlight = state.has_active_highlight();

	for edge in &state.edges {
		let (Some(&(x1, y1)), Some(&(x2, y2))) =
			(positions.get(&edge.source), positions.get(&edge.target))
		else {
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		let in_radius = state.impact_level(edge.source).is_some()
			&& state.impact_level(edge.target).is_some();
		let (alpha, width) = match (has_highlight, in_radius) {
			(false, _) => (0.7, edge.width / k),
			(true, true) => (0.7 + 0.3 * t, edge.width * (1.0 + 0.3 * t) / k),
			(true, false) => (0.7 - 0.55 * t, edge.width * (1.0 - 0.3 * t) / k),
		};

		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(edge.color);
		ctx.set_line_width(width);
		if edge.animated {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(dash),
				&JsValue::from_f64(gap),
			));
			ctx.set_line_dash_offset(dash_offset);
		}

		let (ux, uy) = (dx / dist, dy / dist);
		ctx.begin_path();
		ctx.move_to(x1 + ux * NODE_RADIUS, y1 + uy * NODE_RADIUS);
		ctx.line_to(
			x2 - ux * (NODE_RADIUS + arrow_size),
			y2 - uy * (NODE_RADIUS + arrow_size),
		);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());

		ctx.set_fill_style_str(edge.color);
		let (tip_x, tip_y) = (x2 - ux * NODE_RADIUS, y2 - uy * NODE_RADIUS);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}
	ctx.set_global_alpha(1.0);
}

fn draw_nodes(state: &CodeGraphState, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t, k) = (
		state.has_active_highlight(),
		ease_out_cubic(state.selection.highlight_t),
		state.transform.k,
	);
	let font = format!("{}px sans-serif", 11.0 / k.max(0.5));

	// Nodes outside the blast radius first, so impacted ones draw on top.
	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if state.impact_level(idx).is_some() {
			return;
		}
		let (x, y) = (node.x() as f64, node.y() as f64);
		let (alpha, radius) = if has_highlight {
			(1.0 - 0.7 * t, NODE_RADIUS * (1.0 - 0.15 * t))
		} else {
			(1.0, NODE_RADIUS)
		};

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node.data.user_data.color);
		ctx.fill();

		if state.hovered == Some(idx) {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str("white");
			ctx.set_line_width(1.0 / k);
			ctx.stroke();
		}

		ctx.set_fill_style_str("rgba(255, 255, 255, 0.8)");
		ctx.set_font(&font);
		let _ = ctx.fill_text(&node.data.user_data.label, x + radius + 3.0, y + 3.0);
		ctx.set_global_alpha(1.0);
	});

	if !has_highlight {
		return;
	}

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		let Some(level) = state.impact_level(idx) else {
			return;
		};
		let (x, y) = (node.x() as f64, node.y() as f64);
		let radius = if state.is_selected(idx) {
			NODE_RADIUS * (1.0 + 0.35 * t)
		} else {
			NODE_RADIUS * (1.0 + 0.2 * t)
		};
		let glow_radius = NODE_RADIUS * level.glow() * t.max(0.5);

		if t > 0.01 {
			if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow_radius)
			{
				let _ = gradient.add_color_stop(0.0, level.color());
				let _ = gradient.add_color_stop(1.0, "rgba(0, 0, 0, 0)");
				ctx.set_global_alpha(0.45 * t);
				ctx.begin_path();
				let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
				ctx.set_global_alpha(1.0);
			}
		}

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node.data.user_data.color);
		ctx.fill();

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius + 2.0 / k, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(level.color());
		ctx.set_line_width(2.0 / k);
		ctx.stroke();

		ctx.set_fill_style_str("white");
		ctx.set_font(&font);
		let _ = ctx.fill_text(&node.data.user_data.label, x + radius + 3.0, y + 3.0);
	});
}
