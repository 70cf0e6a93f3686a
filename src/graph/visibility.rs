//! Type filters and the final node/link selection handed to the renderer.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use super::model::{GraphLink, GraphNode, GraphSnapshot, NodeType};

/// Which node types are currently displayed. Every type starts enabled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeFilters(BTreeMap<NodeType, bool>);

impl Default for TypeFilters {
	fn default() -> Self {
		Self(NodeType::ALL.iter().map(|&kind| (kind, true)).collect())
	}
}

impl TypeFilters {
	/// Whether nodes of `kind` are shown.
	pub fn is_enabled(&self, kind: NodeType) -> bool {
		self.0.get(&kind).copied().unwrap_or(true)
	}

	/// Flip one type.
	pub fn toggle(&mut self, kind: NodeType) {
		let enabled = self.is_enabled(kind);
		self.0.insert(kind, !enabled);
	}
}

/// Nodes and links eligible for drawing, in display order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisibleGraph {
	/// Surviving nodes, sorted by [`display_order`].
	pub nodes: Vec<GraphNode>,
	/// Links whose endpoints both survived, in dataset order.
	pub links: Vec<GraphLink>,
}

/// Display order: type rank, then timestamp (timeless last), then label.
pub fn display_order(a: &GraphNode, b: &GraphNode) -> Ordering {
	a.kind
		.rank()
		.cmp(&b.kind.rank())
		.then_with(|| match (a.time(), b.time()) {
			(Some(x), Some(y)) => x.cmp(&y),
			(Some(_), None) => Ordering::Less,
			(None, Some(_)) => Ordering::Greater,
			(None, None) => Ordering::Equal,
		})
		.then_with(|| a.label.cmp(&b.label))
}

/// Keep nodes that are in `visible` and of an enabled type, then the links
/// whose two endpoints both survived.
pub fn filter_visible(
	snapshot: &GraphSnapshot,
	filters: &TypeFilters,
	visible: &HashSet<String>,
) -> VisibleGraph {
	let mut nodes: Vec<GraphNode> = snapshot
		.nodes()
		.iter()
		.filter(|n| visible.contains(&n.id) && filters.is_enabled(n.kind))
		.cloned()
		.collect();
	nodes.sort_by(display_order);

	let kept: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
	let links = snapshot
		.links()
		.iter()
		.filter(|l| kept.contains(l.source.as_str()) && kept.contains(l.target.as_str()))
		.cloned()
		.collect();

	VisibleGraph { nodes, links }
}

#[cfg(test)]
mod tests {
	use super::*;

	fn snapshot() -> GraphSnapshot {
		GraphSnapshot::new(
			vec![
				GraphNode::new("m", NodeType::Media, "Clip").at("2023-10-27T10:10:00Z"),
				GraphNode::new("a2", NodeType::Account, "Zed"),
				GraphNode::new("a1", NodeType::Account, "Bot").at("2023-10-27T09:50:00Z"),
				GraphNode::new("a0", NodeType::Account, "Alpha"),
				GraphNode::new("ip", NodeType::Network, "45.22.11.12").at("2023-10-27T09:55:00Z"),
				GraphNode::new("e", NodeType::Event, "Campaign").at("2023-10-27T10:00:00Z"),
			],
			vec![
				GraphLink::new("l1", "a1", "e", "initiated"),
				GraphLink::new("l2", "a1", "ip", "login"),
				GraphLink::new("l3", "e", "m", "shared"),
				GraphLink::new("l4", "e", "ghost", "dangling"),
			],
		)
	}

	fn all_ids(s: &GraphSnapshot) -> HashSet<String> {
		s.nodes().iter().map(|n| n.id.clone()).collect()
	}

	fn ids(nodes: &[GraphNode]) -> Vec<&str> {
		nodes.iter().map(|n| n.id.as_str()).collect()
	}

	#[test]
	fn nodes_sort_by_rank_time_then_label() {
		let s = snapshot();
		let out = filter_visible(&s, &TypeFilters::default(), &all_ids(&s));
		assert_eq!(ids(&out.nodes), ["e", "ip", "a1", "a0", "a2", "m"]);
	}

	#[test]
	fn disabled_types_and_hidden_ids_are_dropped_with_their_links() {
		let s = snapshot();
		let mut filters = TypeFilters::default();
		filters.toggle(NodeType::Media);

		let mut visible = all_ids(&s);
		visible.remove("ip");

		let out = filter_visible(&s, &filters, &visible);
		assert_eq!(ids(&out.nodes), ["e", "a1", "a0", "a2"]);
		let link_ids: Vec<&str> = out.links.iter().map(|l| l.id.as_str()).collect();
		assert_eq!(link_ids, ["l1"]);
	}

	#[test]
	fn dangling_links_never_reach_the_renderer() {
		let s = snapshot();
		let mut visible = all_ids(&s);
		visible.insert("ghost".into());
		let out = filter_visible(&s, &TypeFilters::default(), &visible);
		assert!(out.links.iter().all(|l| l.id != "l4"));
	}

	#[test]
	fn filtering_is_idempotent() {
		let s = snapshot();
		let visible = all_ids(&s);
		let first = filter_visible(&s, &TypeFilters::default(), &visible);
		let second = filter_visible(&s, &TypeFilters::default(), &visible);
		assert_eq!(first, second);
	}

	#[test]
	fn toggle_flips_back() {
		let mut filters = TypeFilters::default();
		filters.toggle(NodeType::Device);
		assert!(!filters.is_enabled(NodeType::Device));
		filters.toggle(NodeType::Device);
		assert_eq!(filters, TypeFilters::default());
	}
}
