use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{MapViewState, NODE_RADIUS};
use crate::types::LatLng;

const ROUTE_COLOR: &str = "#39ff88";
const START_COLOR: &str = "#2ecc71";
const END_COLOR: &str = "#e74c3c";

pub fn render(state: &MapViewState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	draw_graticule(state, ctx);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	draw_route(state, ctx);
	draw_markers(state, ctx);
}

/// Base layer: lat/lng grid lines at a spacing that keeps roughly 80px apart.
fn draw_graticule(state: &MapViewState, ctx: &CanvasRenderingContext2d) {
	let raw = 80.0 / state.transform.k;
	let step = 10f64.powf(raw.log10().ceil());
	let top_left = state.to_geo(0.0, 0.0);
	let bottom_right = state.to_geo(state.width, state.height);

	ctx.set_stroke_style_str("rgba(255, 255, 255, 0.06)");
	ctx.set_line_width(1.0);
	ctx.begin_path();
	let mut lng = (top_left.lng / step).floor() * step;
	while lng <= bottom_right.lng {
		let (x, _) = state.to_screen(LatLng::new(0.0, lng));
		ctx.move_to(x, 0.0);
		ctx.line_to(x, state.height);
		lng += step;
	}
	let mut lat = (bottom_right.lat / step).floor() * step;
	while lat <= top_left.lat {
		let (_, y) = state.to_screen(LatLng::new(lat, 0.0));
		ctx.move_to(0.0, y);
		ctx.line_to(state.width, y);
		lat += step;
	}
	ctx.stroke();
}

fn draw_edges(state: &MapViewState, ctx: &CanvasRenderingContext2d) {
	ctx.set_line_cap("round");
	for edge in &state.scene.edges {
		let (x1, y1) = state.to_screen(edge.from);
		let (x2, y2) = state.to_screen(edge.to);
		if (x2 - x1).hypot(y2 - y1) < 0.001 {
			continue;
		}
		ctx.set_stroke_style_str(edge.class.color());
		ctx.set_line_width(edge.class.width());
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();
	}
}

fn draw_nodes(state: &MapViewState, ctx: &CanvasRenderingContext2d) {
	for node in &state.scene.nodes {
		let (x, y) = state.to_screen(node.at);
		let hovered = state.hover.as_ref() == Some(&node.id);
		let radius = if hovered { NODE_RADIUS * 1.6 } else { NODE_RADIUS };

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(if hovered { "#ffffff" } else { "#8fa3c0" });
		ctx.fill();

		if hovered {
			ctx.set_fill_style_str("white");
			ctx.set_font("12px sans-serif");
			let _ = ctx.fill_text(node.id.as_str(), x + radius + 4.0, y + 4.0);
		}
	}
}

fn draw_route(state: &MapViewState, ctx: &CanvasRenderingContext2d) {
	let Some((first, rest)) = state.scene.route.split_first() else {
		return;
	};
	let (dash, gap) = (10.0, 6.0);

	ctx.set_stroke_style_str(ROUTE_COLOR);
	ctx.set_line_width(5.0);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(dash),
		&JsValue::from_f64(gap),
	));
	ctx.set_line_dash_offset(-(state.flow_time * 30.0) % (dash + gap));

	ctx.begin_path();
	let (x, y) = state.to_screen(*first);
	ctx.move_to(x, y);
	for p in rest {
		let (x, y) = state.to_screen(*p);
		ctx.line_to(x, y);
	}
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_markers(state: &MapViewState, ctx: &CanvasRenderingContext2d) {
	let markers = [(state.scene.start(), START_COLOR, "A"), (state.scene.end(), END_COLOR, "B")];
	for (point, color, label) in markers {
		let Some(point) = point else {
			continue;
		};
		let (x, y) = state.to_screen(point);
		ctx.begin_path();
		let _ = ctx.arc(x, y, 9.0, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(color);
		ctx.fill();
		ctx.set_stroke_style_str("white");
		ctx.set_line_width(2.0);
		ctx.stroke();

		ctx.set_fill_style_str("white");
		ctx.set_font("bold 11px sans-serif");
		ctx.set_text_align("center");
		let _ = ctx.fill_text(label, x, y + 4.0);
		ctx.set_text_align("start");
	}
}
