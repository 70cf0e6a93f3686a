use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::DefaultNodeIdx;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::ForceGraphState;
use super::types::CanvasLink;
use crate::graph::{LinkTier, LinkWeight, NodeType, RiskTier};

const BACKGROUND: &str = "#1a1a2e";
const LINK_RGB: &str = "100, 180, 255";
const ALERT_RGB: &str = "255, 117, 76";

fn type_color(kind: NodeType) -> &'static str {
	match kind {
		NodeType::Event => "#d62728",
		NodeType::Network => "#1f77b4",
		NodeType::Account => "#9467bd",
		NodeType::Device => "#2ca02c",
		NodeType::Media => "#ff7f0e",
		NodeType::Other => "#7f7f7f",
	}
}

fn risk_color(risk: RiskTier) -> &'static str {
	match risk {
		RiskTier::High => "#FF754C",
		RiskTier::Elevated => "#F2C94C",
		RiskTier::Low => "#33D69F",
	}
}

/// Alpha and width multiplier for a link tier.
fn tier_style(tier: LinkTier) -> (f64, f64) {
	match tier {
		LinkTier::Emphasized => (0.95, 1.6),
		LinkTier::Unfolded => (0.6, 1.0),
		LinkTier::Pending => (0.12, 0.7),
	}
}

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let (dash, gap, arrow_size) = (8.0 / k, 4.0 / k, 8.0 / k);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);
	let positions = state.positions();
	let radii = node_radii(state);

	for (src, tgt, link) in &state.links {
		let (Some(&(x1, y1)), Some(&(x2, y2))) = (positions.get(src), positions.get(tgt)) else {
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let (r1, r2) = (
			radii.get(src).copied().unwrap_or(0.0),
			radii.get(tgt).copied().unwrap_or(0.0),
		);

		let (alpha, width_scale) = tier_style(link.tier);
		let base_width = if link.weight == LinkWeight::Strong { 2.5 } else { 1.5 };
		let rgb = link_rgb(link);

		ctx.set_stroke_style_str(&format!("rgba({rgb}, {alpha})"));
		ctx.set_line_width(base_width * width_scale / k);
		match link.weight {
			LinkWeight::Faint => {
				let _ = ctx.set_line_dash(&js_sys::Array::of2(
					&JsValue::from_f64(dash),
					&JsValue::from_f64(gap),
				));
				ctx.set_line_dash_offset(0.0);
			}
			LinkWeight::Strong => {
				let _ = ctx.set_line_dash(&js_sys::Array::of2(
					&JsValue::from_f64(dash),
					&JsValue::from_f64(gap * 0.5),
				));
				ctx.set_line_dash_offset(dash_offset);
			}
			LinkWeight::Normal => {
				let _ = ctx.set_line_dash(&js_sys::Array::new());
			}
		}

		let (ux, uy) = (dx / dist, dy / dist);
		ctx.begin_path();
		ctx.move_to(x1 + ux * r1, y1 + uy * r1);
		ctx.line_to(x2 - ux * (r2 + arrow_size), y2 - uy * (r2 + arrow_size));
		ctx.stroke();

		let _ = ctx.set_line_dash(&js_sys::Array::new());
		ctx.set_fill_style_str(&format!("rgba({rgb}, {})", (alpha + 0.2).min(1.0)));
		let (tip_x, tip_y) = (x2 - ux * r2, y2 - uy * r2);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn link_rgb(link: &CanvasLink) -> &'static str {
	if link.alert { ALERT_RGB } else { LINK_RGB }
}

fn node_radii(state: &ForceGraphState) -> HashMap<DefaultNodeIdx, f64> {
	let mut out = HashMap::new();
	state.graph.visit_nodes(|node| {
		out.insert(node.index(), node.data.user_data.radius());
	});
	out
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;

	// Dimmed nodes first so emphasized ones paint on top.
	for pass_highlighted in [false, true] {
		state.graph.visit_nodes(|node| {
			let info = &node.data.user_data;
			if info.node.highlighted != pass_highlighted {
				return;
			}
			let (x, y) = (node.x() as f64, node.y() as f64);
			let radius = info.radius();
			let alpha = info.alpha.clamp(0.0, 1.0);

			if info.node.highlighted && alpha > 0.01 {
				let glow_radius = radius * 2.2;
				if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow_radius)
				{
					let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", 0.35 * alpha));
					let _ = gradient.add_color_stop(0.6, &format!("rgba(200, 220, 255, {})", 0.1 * alpha));
					let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
					ctx.begin_path();
					let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
					#[allow(deprecated)]
					ctx.set_fill_style(&gradient);
					ctx.fill();
				}
			}

			ctx.set_global_alpha(alpha);
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
			ctx.set_fill_style_str(type_color(info.node.kind));
			ctx.fill();
			let border = if info.node.selected { 4.0 } else { 2.0 };
			ctx.set_line_width(border / k.max(0.5));
			ctx.set_stroke_style_str(if info.node.selected {
				"#6C5DD3"
			} else {
				risk_color(info.node.risk)
			});
			ctx.stroke();

			ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", alpha * 0.9));
			ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
			let _ = ctx.fill_text(&info.node.label, x + radius + 3.0, y + 3.0);
			ctx.set_global_alpha(1.0);
		});
	}
}
