//! Canvas drawing of the per-frame draw list. All visual decisions are made
//! by the encoding pipeline; this module only executes them against a
//! `CanvasRenderingContext2d`.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::NetworkState;

const BACKGROUND: &str = "#1a1a2e";
const LABEL_COLOR: &str = "#ffffff";

pub fn render(state: &NetworkState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	let list = state.frame();
	let graph = state.graph();
	let k = state.transform.k;

	for (idx, encoding) in &list.edges {
		let edge = &graph.edges[*idx];
		let (a, b) = (&graph.nodes[edge.source_idx], &graph.nodes[edge.target_idx]);
		ctx.set_global_alpha(encoding.opacity);
		ctx.set_stroke_style_str(encoding.color);
		ctx.set_line_width(encoding.width / k);
		ctx.begin_path();
		ctx.move_to(a.x, a.y);
		ctx.line_to(b.x, b.y);
		ctx.stroke();
	}
	ctx.set_global_alpha(1.0);

	for (idx, encoding) in &list.nodes {
		let node = &graph.nodes[*idx];

		if encoding.glow > 0.0 {
			if let Ok(gradient) = ctx.create_radial_gradient(
				node.x,
				node.y,
				encoding.radius * 0.3,
				node.x,
				node.y,
				encoding.radius + encoding.glow,
			) {
				let _ = gradient.add_color_stop(0.0, "rgba(255, 255, 255, 0.3)");
				let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0.0)");
				ctx.begin_path();
				let _ = ctx.arc(
					node.x,
					node.y,
					encoding.radius + encoding.glow,
					0.0,
					2.0 * PI,
				);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		ctx.set_global_alpha(encoding.opacity);
		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, encoding.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(encoding.fill);
		ctx.fill();

		// Unconfirmed invitations get a dashed outline on top of their dimming.
		if node.is_pending {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(4.0 / k),
				&JsValue::from_f64(3.0 / k),
			));
			ctx.set_stroke_style_str(encoding.fill);
			ctx.set_line_width(1.5 / k);
			ctx.begin_path();
			let _ = ctx.arc(node.x, node.y, encoding.radius + 3.0 / k, 0.0, 2.0 * PI);
			ctx.stroke();
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}

		if let Some(stroke) = encoding.stroke {
			ctx.set_stroke_style_str(stroke);
			ctx.set_line_width(encoding.stroke_width / k);
			ctx.begin_path();
			let _ = ctx.arc(node.x, node.y, encoding.radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.stroke();
		}

		if encoding.show_label {
			ctx.set_fill_style_str(LABEL_COLOR);
			ctx.set_font(&format!("{}px sans-serif", 12.0 / k.max(0.5)));
			let _ = ctx.fill_text(&node.name, node.x + encoding.radius + 4.0, node.y + 4.0);
		}
		ctx.set_global_alpha(1.0);
	}

	ctx.restore();
}
