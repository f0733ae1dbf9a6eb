use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::controller::ViewController;
use super::state::{CanvasState, toggle_rect};
use super::types::GraphNode;
use super::viewport::{Rect, ease_out_cubic};

const BACKGROUND: &str = "#1a1a2e";
const ACCENT: &str = "100, 180, 255";
const DOT_GAP: f64 = 24.0;
const CORNER_RADIUS: f64 = 10.0;

pub fn render(state: &CanvasState, ctl: &ViewController, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	draw_dots(state, ctl, ctx);

	let t = ctl.viewport();
	ctx.save();
	let _ = ctx.translate(t.x, t.y);
	let _ = ctx.scale(t.k, t.k);
	draw_edges(state, ctl, ctx);
	draw_nodes(state, ctl, ctx);
	ctx.restore();

	draw_minimap(state, ctl, ctx);
}

fn draw_dots(state: &CanvasState, ctl: &ViewController, ctx: &CanvasRenderingContext2d) {
	let t = ctl.viewport();
	let gap = DOT_GAP * t.k;
	if gap < 6.0 {
		return;
	}
	ctx.set_fill_style_str("rgba(255, 255, 255, 0.08)");
	let mut x = t.x.rem_euclid(gap);
	while x < state.width {
		let mut y = t.y.rem_euclid(gap);
		while y < state.height {
			ctx.fill_rect(x, y, 1.0, 1.0);
			y += gap;
		}
		x += gap;
	}
}

fn is_lit(state: &CanvasState, ctl: &ViewController, id: &str) -> bool {
	state.hover.as_deref() == Some(id) || ctl.view().selected_unit.as_deref() == Some(id)
}

fn draw_edges(state: &CanvasState, ctl: &ViewController, ctx: &CanvasRenderingContext2d) {
	let k = ctl.viewport().k;
	let (line_width, dash, gap) = (1.6 / k, 8.0 / k, 4.0 / k);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(dash),
		&JsValue::from_f64(gap),
	));
	ctx.set_line_dash_offset(dash_offset);

	for edge in &ctl.graph().edges {
		let (Some(from), Some(to)) = (ctl.node_rect(&edge.source), ctl.node_rect(&edge.target))
		else {
			continue;
		};
		let lit = is_lit(state, ctl, &edge.source) || is_lit(state, ctl, &edge.target);
		let alpha = if lit { 0.95 } else { 0.55 };
		ctx.set_stroke_style_str(&format!("rgba({ACCENT}, {alpha})"));
		ctx.set_line_width(if lit { line_width * 1.4 } else { line_width });

		// tree edges leave the parent's bottom and enter the child's top
		let ((x1, y1), (x2, y2)) = if to.y >= from.y + from.height {
			(
				(from.x + from.width / 2.0, from.y + from.height),
				(to.x + to.width / 2.0, to.y),
			)
		} else {
			(from.center(), to.center())
		};
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, r: &Rect, radius: f64) {
	let radius = radius.min(r.width / 2.0).min(r.height / 2.0);
	let (x0, y0, x1, y1) = (r.x, r.y, r.x + r.width, r.y + r.height);
	ctx.begin_path();
	ctx.move_to(x0 + radius, y0);
	let _ = ctx.arc_to(x1, y0, x1, y1, radius);
	let _ = ctx.arc_to(x1, y1, x0, y1, radius);
	let _ = ctx.arc_to(x0, y1, x0, y0, radius);
	let _ = ctx.arc_to(x0, y0, x1, y0, radius);
	ctx.close_path();
}

fn draw_glow(state: &CanvasState, rect: &Rect, ctx: &CanvasRenderingContext2d) {
	let t = ease_out_cubic(state.glow.t.clamp(0.0, 1.0));
	if t <= 0.01 {
		return;
	}
	let (x, y) = rect.center();
	let outer = rect.width * 0.9;
	let Ok(gradient) = ctx.create_radial_gradient(x, y, rect.height * 0.3, x, y, outer) else {
		return;
	};
	let _ = gradient.add_color_stop(0.0, &format!("rgba({ACCENT}, {})", 0.45 * t));
	let _ = gradient.add_color_stop(0.6, &format!("rgba({ACCENT}, {})", 0.15 * t));
	let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
	ctx.begin_path();
	let _ = ctx.arc(x, y, outer, 0.0, 2.0 * PI);
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill();
}

fn draw_nodes(state: &CanvasState, ctl: &ViewController, ctx: &CanvasRenderingContext2d) {
	let k = ctl.viewport().k;
	let selected = ctl.view().selected_unit.as_deref();

	for node in &ctl.graph().nodes {
		let Some(rect) = ctl.node_rect(&node.id) else {
			continue;
		};
		if state.glow.unit.as_deref() == Some(node.id.as_str()) {
			draw_glow(state, &rect, ctx);
		}

		let style = node.display.kind.style();
		rounded_rect(ctx, &rect, CORNER_RADIUS);
		ctx.set_fill_style_str(BACKGROUND);
		ctx.fill();
		ctx.set_fill_style_str(style.fill);
		ctx.fill();
		ctx.set_stroke_style_str(style.border);
		ctx.set_line_width(style.border_width);
		ctx.stroke();

		if selected == Some(node.id.as_str()) || state.hover.as_deref() == Some(node.id.as_str()) {
			let ring = Rect {
				x: rect.x - 4.0,
				y: rect.y - 4.0,
				width: rect.width + 8.0,
				height: rect.height + 8.0,
			};
			rounded_rect(ctx, &ring, CORNER_RADIUS + 4.0);
			let alpha = if selected == Some(node.id.as_str()) { 0.9 } else { 0.4 };
			ctx.set_stroke_style_str(&format!("rgba({ACCENT}, {alpha})"));
			ctx.set_line_width(2.0 / k.max(0.5));
			ctx.stroke();
		}

		draw_label(node, &rect, ctx);
	}
}

fn draw_label(node: &GraphNode, rect: &Rect, ctx: &CanvasRenderingContext2d) {
	let display = &node.display;
	let style = display.kind.style();
	let text_x = rect.x + 42.0;
	let text_width = rect.width - 42.0 - 12.0 - if display.expandable { 24.0 } else { 0.0 };

	ctx.set_font("18px sans-serif");
	ctx.set_fill_style_str(style.text);
	let _ = ctx.fill_text(display.icon.glyph(), rect.x + 12.0, rect.y + 30.0);

	ctx.set_font(&format!("{} 13px sans-serif", style.font_weight));
	let _ = ctx.fill_text_with_max_width(&display.title(), text_x, rect.y + 24.0, text_width);

	let counts = match display.team_label() {
		Some(teams) => format!("{teams} \u{00B7} {}", display.member_label()),
		None => display.member_label(),
	};
	ctx.set_font("11px sans-serif");
	ctx.set_fill_style_str("rgba(226, 232, 240, 0.65)");
	let _ = ctx.fill_text_with_max_width(&counts, text_x, rect.y + 42.0, text_width);

	if let Some(description) = &display.description {
		let _ = ctx.fill_text_with_max_width(
			description,
			rect.x + 12.0,
			rect.y + rect.height - 14.0,
			rect.width - 24.0,
		);
	}

	if display.expandable {
		let toggle = toggle_rect(rect);
		rounded_rect(ctx, &toggle, 4.0);
		ctx.set_fill_style_str("rgba(255, 255, 255, 0.06)");
		ctx.fill();
		ctx.set_font("12px sans-serif");
		ctx.set_fill_style_str(style.text);
		let chevron = if display.expanded { "\u{25BE}" } else { "\u{25B8}" };
		let _ = ctx.fill_text(chevron, toggle.x + 7.0, toggle.y + 15.0);
	}
}

fn draw_minimap(state: &CanvasState, ctl: &ViewController, ctx: &CanvasRenderingContext2d) {
	let Some(map) = state.minimap(ctl) else {
		return;
	};

	rounded_rect(ctx, &map.frame, 6.0);
	ctx.set_fill_style_str("rgba(10, 10, 25, 0.8)");
	ctx.fill();
	ctx.set_stroke_style_str(&format!("rgba({ACCENT}, 0.35)"));
	ctx.set_line_width(1.0);
	ctx.stroke();

	for node in &ctl.graph().nodes {
		if let Some(rect) = ctl.node_rect(&node.id) {
			let r = map.project(rect);
			ctx.set_fill_style_str(node.display.kind.style().border);
			ctx.fill_rect(r.x, r.y, r.width.max(1.0), r.height.max(1.0));
		}
	}

	let view = ctl.viewport();
	let (vx0, vy0) = view.screen_to_world(0.0, 0.0);
	let (vx1, vy1) = view.screen_to_world(state.width, state.height);
	let v = map.project(Rect {
		x: vx0,
		y: vy0,
		width: vx1 - vx0,
		height: vy1 - vy0,
	});
	ctx.set_stroke_style_str("rgba(255, 255, 255, 0.7)");
	ctx.stroke_rect(v.x, v.y, v.width, v.height);
}
