use crate::graph::{ExplorerView, LinkTier, LinkWeight, NodeType, RiskTier};

#[derive(Clone, Debug, PartialEq)]
pub struct CanvasNode {
	pub id: String,
	pub label: String,
	pub kind: NodeType,
	pub risk: RiskTier,
	pub radius: f64,
	pub opacity: f64,
	pub highlighted: bool,
	pub selected: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CanvasLink {
	pub source: String,
	pub target: String,
	pub tier: LinkTier,
	pub weight: LinkWeight,
	pub alert: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CanvasData {
	pub nodes: Vec<CanvasNode>,
	pub links: Vec<CanvasLink>,
}

impl From<&ExplorerView> for CanvasData {
	fn from(view: &ExplorerView) -> Self {
		let nodes = view
			.nodes
			.iter()
			.map(|n| CanvasNode {
				id: n.node.id.clone(),
				label: n.node.label.clone(),
				kind: n.node.kind,
				risk: n.risk,
				radius: n.node.display_radius(),
				opacity: n.emphasis.opacity,
				highlighted: n.emphasis.highlighted || n.hovered,
				selected: n.selected,
			})
			.collect();
		let links = view
			.links
			.iter()
			.map(|l| CanvasLink {
				source: l.link.source.clone(),
				target: l.link.target.clone(),
				tier: l.tier,
				weight: l.weight,
				alert: l.alert,
			})
			.collect();
		Self { nodes, links }
	}
}
