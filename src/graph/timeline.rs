//! Time bounds and time-gated reachability ("unfolding") over a snapshot.
//!
//! [`propagate`] is recomputed from scratch for every cursor value. Starting from
//! the origin nodes it walks links breadth-first, crossing a link only when both
//! the link and the node on the far side are timeless or not later than the
//! cursor. Advancing the cursor only ever opens more gates, so the reachable sets
//! grow monotonically.

use std::collections::{HashMap, HashSet, VecDeque};

use chrono::Utc;

use super::model::{GraphSnapshot, NodeType};

/// Inclusive range of every finite node and link timestamp, in epoch millis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeBounds {
	/// Earliest instant.
	pub min: i64,
	/// Latest instant.
	pub max: i64,
}

impl TimeBounds {
	/// Bounds of the snapshot, `None` when nothing carries a parseable timestamp.
	pub fn of(snapshot: &GraphSnapshot) -> Option<Self> {
		let times = snapshot
			.nodes()
			.iter()
			.filter_map(|n| n.time())
			.chain(snapshot.links().iter().filter_map(|l| l.time()));

		times.fold(None, |acc, t| match acc {
			None => Some(Self { min: t, max: t }),
			Some(b) => Some(Self {
				min: b.min.min(t),
				max: b.max.max(t),
			}),
		})
	}

	/// Bounds of the snapshot, collapsing to the current instant when it has no timestamps.
	pub fn or_now(snapshot: &GraphSnapshot) -> Self {
		Self::of(snapshot).unwrap_or_else(|| {
			let now = Utc::now().timestamp_millis();
			Self { min: now, max: now }
		})
	}

	/// Pull `t` into the range.
	pub fn clamp(&self, t: i64) -> i64 {
		t.clamp(self.min, self.max)
	}

	/// Length of the range in millis.
	pub fn span(&self) -> i64 {
		self.max - self.min
	}
}

/// What the timeline has unfolded at one cursor position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TimelineReach {
	/// Seeds of the propagation.
	pub origins: HashSet<String>,
	/// Reachable node ids; always contains every origin.
	pub nodes: HashSet<String>,
	/// Reachable link ids.
	pub links: HashSet<String>,
}

/// Earliest network nodes; else nodes at the snapshot-wide minimum; else the first node.
///
/// Never empty for a non-empty snapshot.
pub fn origin_nodes(snapshot: &GraphSnapshot) -> HashSet<String> {
	let earliest_network = snapshot
		.nodes_of(NodeType::Network)
		.filter_map(|n| n.time())
		.min();
	if let Some(min) = earliest_network {
		return snapshot
			.nodes_of(NodeType::Network)
			.filter(|n| n.time() == Some(min))
			.map(|n| n.id.clone())
			.collect();
	}

	if let Some(bounds) = TimeBounds::of(snapshot) {
		let at_min: HashSet<String> = snapshot
			.nodes()
			.iter()
			.filter(|n| n.time() == Some(bounds.min))
			.map(|n| n.id.clone())
			.collect();
		if !at_min.is_empty() {
			return at_min;
		}
	}

	snapshot
		.nodes()
		.first()
		.map(|n| n.id.clone())
		.into_iter()
		.collect()
}

struct Incident<'a> {
	link: &'a str,
	neighbor: &'a str,
	time: Option<i64>,
}

/// Per-node incident links, limited to links whose endpoints both exist.
fn timed_adjacency(snapshot: &GraphSnapshot) -> HashMap<&str, Vec<Incident<'_>>> {
	let mut out: HashMap<&str, Vec<Incident<'_>>> = HashMap::new();
	for link in snapshot.links() {
		if !snapshot.contains(&link.source) || !snapshot.contains(&link.target) {
			continue;
		}
		let time = link.time();
		out.entry(link.source.as_str()).or_default().push(Incident {
			link: &link.id,
			neighbor: &link.target,
			time,
		});
		if link.source != link.target {
			out.entry(link.target.as_str()).or_default().push(Incident {
				link: &link.id,
				neighbor: &link.source,
				time,
			});
		}
	}
	out
}

/// Nodes and links unfolded at `cursor`.
pub fn propagate(snapshot: &GraphSnapshot, cursor: i64) -> TimelineReach {
	let origins = origin_nodes(snapshot);
	let adjacency = timed_adjacency(snapshot);
	let open = |t: Option<i64>| t.is_none_or(|t| t <= cursor);

	let mut nodes = origins.clone();
	let mut links = HashSet::new();
	let mut queue: VecDeque<&str> = snapshot
		.nodes()
		.iter()
		.filter(|n| origins.contains(&n.id))
		.map(|n| n.id.as_str())
		.collect();

	while let Some(current) = queue.pop_front() {
		let Some(incident) = adjacency.get(current) else {
			continue;
		};
		for edge in incident {
			let neighbor_time = snapshot.node(edge.neighbor).and_then(|n| n.time());
			if !open(edge.time) || !open(neighbor_time) {
				continue;
			}
			links.insert(edge.link.to_string());
			if nodes.insert(edge.neighbor.to_string()) {
				queue.push_back(edge.neighbor);
			}
		}
	}

	TimelineReach {
		origins,
		nodes,
		links,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::model::{GraphLink, GraphNode};

	const T0: &str = "2023-10-27T09:45:00Z";
	const T1: &str = "2023-10-27T09:50:00Z";
	const T2: &str = "2023-10-27T10:00:00Z";
	const T3: &str = "2023-10-27T10:10:00Z";

	fn ms(s: &str) -> i64 {
		crate::graph::model::Timestamp::parse(s)
			.millis()
			.unwrap_or_default()
	}

	fn chain() -> GraphSnapshot {
		GraphSnapshot::new(
			vec![
				GraphNode::new("ip", NodeType::Network, "10.0.0.1").at(T0),
				GraphNode::new("acct", NodeType::Account, "Mule").at(T1),
				GraphNode::new("evt", NodeType::Event, "Transfer").at(T2),
				GraphNode::new("media", NodeType::Media, "Clip").at(T3),
				GraphNode::new("island", NodeType::Device, "Lost phone"),
			],
			vec![
				GraphLink::new("l1", "ip", "acct", "login").at(T1),
				GraphLink::new("l2", "acct", "evt", "initiated").at(T2),
				GraphLink::new("l3", "evt", "media", "shared").at(T3),
			],
		)
	}

	#[test]
	fn bounds_cover_nodes_and_links() {
		let snapshot = GraphSnapshot::new(
			vec![GraphNode::new("a", NodeType::Event, "A").at(T1)],
			vec![GraphLink::new("l", "a", "a", "r").at(T3)],
		);
		assert_eq!(
			TimeBounds::of(&snapshot),
			Some(TimeBounds {
				min: ms(T1),
				max: ms(T3)
			})
		);
		assert_eq!(TimeBounds::of(&GraphSnapshot::default()), None);
	}

	#[test]
	fn clamp_pulls_cursor_into_range() {
		let bounds = TimeBounds::or_now(&chain());
		assert_eq!(bounds.clamp(ms(T0) - 1), ms(T0));
		assert_eq!(bounds.clamp(ms(T2)), ms(T2));
		assert_eq!(bounds.clamp(i64::MAX), ms(T3));
	}

	#[test]
	fn earliest_network_nodes_are_origins() {
		let snapshot = chain();
		assert_eq!(origin_nodes(&snapshot), HashSet::from(["ip".to_string()]));
	}

	#[test]
	fn origin_falls_back_to_global_minimum() {
		let snapshot = GraphSnapshot::new(
			vec![
				GraphNode::new("b", NodeType::Account, "B").at(T2),
				GraphNode::new("a", NodeType::Account, "A").at(T1),
				GraphNode::new("c", NodeType::Account, "C").at(T1),
				GraphNode::new("n", NodeType::Network, "no time"),
			],
			Vec::new(),
		);
		assert_eq!(
			origin_nodes(&snapshot),
			HashSet::from(["a".to_string(), "c".to_string()])
		);
	}

	#[test]
	fn origin_falls_back_to_first_node() {
		// Earliest instant belongs to a link, so no node sits at the minimum.
		let snapshot = GraphSnapshot::new(
			vec![
				GraphNode::new("first", NodeType::Account, "A").at(T2),
				GraphNode::new("second", NodeType::Device, "B"),
			],
			vec![GraphLink::new("l", "first", "second", "r").at(T0)],
		);
		assert_eq!(origin_nodes(&snapshot), HashSet::from(["first".to_string()]));

		let timeless = GraphSnapshot::new(vec![GraphNode::new("x", NodeType::Media, "X")], Vec::new());
		assert_eq!(origin_nodes(&timeless), HashSet::from(["x".to_string()]));
		assert!(origin_nodes(&GraphSnapshot::default()).is_empty());
	}

	#[test]
	fn unfolds_as_cursor_advances() {
		let snapshot = chain();

		let start = propagate(&snapshot, ms(T0));
		assert_eq!(start.nodes, start.origins);
		assert!(start.links.is_empty());

		let mid = propagate(&snapshot, ms(T2));
		assert!(mid.nodes.contains("acct") && mid.nodes.contains("evt"));
		assert!(!mid.nodes.contains("media"));
		assert!(mid.links.contains("l2") && !mid.links.contains("l3"));

		let end = propagate(&snapshot, ms(T3));
		assert_eq!(end.nodes.len(), 4);
		assert_eq!(end.links.len(), 3);
		assert!(!end.nodes.contains("island"));
	}

	#[test]
	fn cursor_outside_bounds_is_tolerated() {
		let snapshot = chain();
		let before = propagate(&snapshot, i64::MIN);
		assert_eq!(before.nodes, before.origins);
		let after = propagate(&snapshot, i64::MAX);
		assert_eq!(after.nodes.len(), 4);
	}

	#[test]
	fn timeless_elements_pass_the_gate() {
		let snapshot = GraphSnapshot::new(
			vec![
				GraphNode::new("ip", NodeType::Network, "ip").at(T0),
				GraphNode::new("dev", NodeType::Device, "dev").at("unknown"),
			],
			vec![GraphLink::new("l", "ip", "dev", "r").at("pending")],
		);
		let reach = propagate(&snapshot, ms(T0));
		assert!(reach.nodes.contains("dev"));
		assert!(reach.links.contains("l"));
	}

	#[test]
	fn dangling_links_are_ignored() {
		let snapshot = GraphSnapshot::new(
			vec![GraphNode::new("ip", NodeType::Network, "ip").at(T0)],
			vec![GraphLink::new("l", "ip", "ghost", "r")],
		);
		let reach = propagate(&snapshot, ms(T3));
		assert_eq!(reach.nodes, HashSet::from(["ip".to_string()]));
		assert!(reach.links.is_empty());
	}
}
