use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::{CanvasData, CanvasLink, CanvasNode};

/// Dataset radii are in "page" units; the canvas draws them at this scale.
pub const RADIUS_SCALE: f64 = 0.5;
/// Extra world-space slack around a node for hit testing.
pub const HIT_SLACK: f64 = 4.0;

const FADE_SPEED: f64 = 6.0;

#[derive(Clone, Debug)]
pub struct NodeInfo {
	pub node: CanvasNode,
	pub alpha: f64,
}

impl NodeInfo {
	pub fn radius(&self) -> f64 {
		self.node.radius * RADIUS_SCALE
	}
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub moved: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

struct Placed {
	x: f32,
	y: f32,
	anchored: bool,
	alpha: f64,
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub links: Vec<(DefaultNodeIdx, DefaultNodeIdx, CanvasLink)>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hovered: Option<DefaultNodeIdx>,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
	ids: HashMap<DefaultNodeIdx, String>,
}

fn new_graph() -> ForceGraph<NodeInfo, ()> {
	ForceGraph::new(SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	})
}

impl ForceGraphState {
	pub fn new(data: &CanvasData, width: f64, height: f64) -> Self {
		let mut state = Self {
			graph: new_graph(),
			links: Vec::new(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hovered: None,
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
			ids: HashMap::new(),
		};
		state.sync(data);
		state
	}

	/// Rebuild the simulation for new data, keeping positions, pins and fades
	/// of nodes that survive.
	pub fn sync(&mut self, data: &CanvasData) {
		let mut placed: HashMap<String, Placed> = HashMap::new();
		self.graph.visit_nodes(|node| {
			placed.insert(
				node.data.user_data.node.id.clone(),
				Placed {
					x: node.x(),
					y: node.y(),
					anchored: node.data.is_anchor,
					alpha: node.data.user_data.alpha,
				},
			);
		});
		let hovered_id = self.hovered.and_then(|idx| self.ids.get(&idx).cloned());
		let dragged_id = self.drag.node_idx.and_then(|idx| self.ids.get(&idx).cloned());

		self.graph = new_graph();
		self.links.clear();
		self.ids.clear();

		let mut id_to_idx = HashMap::new();
		let count = data.nodes.len().max(1) as f64;
		for (i, node) in data.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / count;
			let prev = placed.get(&node.id);
			let (x, y) = prev.map(|p| (p.x, p.y)).unwrap_or((
				(100.0 * angle.cos()) as f32,
				(100.0 * angle.sin()) as f32,
			));

			let idx = self.graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: prev.is_some_and(|p| p.anchored),
				user_data: NodeInfo {
					node: node.clone(),
					alpha: prev.map(|p| p.alpha).unwrap_or(0.0),
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
			self.ids.insert(idx, node.id.clone());
		}

		for link in &data.links {
			if let (Some(&src), Some(&tgt)) =
				(id_to_idx.get(&link.source), id_to_idx.get(&link.target))
			{
				self.graph.add_edge(src, tgt, EdgeData::default());
				self.links.push((src, tgt, link.clone()));
			}
		}

		self.hovered = hovered_id.and_then(|id| id_to_idx.get(&id).copied());
		self.drag.node_idx = dragged_id.and_then(|id| id_to_idx.get(&id).copied());
		if self.drag.node_idx.is_none() {
			self.drag.active = false;
		}
	}

	pub fn id_of(&self, idx: DefaultNodeIdx) -> Option<&str> {
		self.ids.get(&idx).map(String::as_str)
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// hit radius is in world-space, scales with zoom like nodes
			if (dx * dx + dy * dy).sqrt() < node.data.user_data.radius() + HIT_SLACK {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn node_position(&self, idx: DefaultNodeIdx) -> Option<(f64, f64)> {
		let mut pos = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				pos = Some((node.x() as f64, node.y() as f64));
			}
		});
		pos
	}

	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut out = HashMap::new();
		self.graph.visit_nodes(|node| {
			out.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		out
	}

	/// Returns whether the hovered node changed.
	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) -> bool {
		if self.hovered == node {
			return false;
		}
		self.hovered = node;
		true
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.flow_time += dt as f64;

		let step = (FADE_SPEED * dt as f64).min(1.0);
		self.graph.visit_nodes_mut(|node| {
			let info = &mut node.data.user_data;
			info.alpha += (info.node.opacity - info.alpha) * step;
		});
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}
