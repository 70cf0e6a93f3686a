//! Search matching and per-node / per-link emphasis classification.
//!
//! The resolver never picks colors. It tells the renderer how strongly to draw
//! something and why; the canvas layer maps that onto pixels.

use std::collections::HashSet;

use super::adjacency::AdjacencyMap;
use super::model::{GraphLink, GraphNode, GraphSnapshot};
use super::timeline::TimelineReach;
use super::traversal::{connected_component, direct_neighbors};

/// Opacity multipliers for each dimming reason. Smaller means stronger dimming.
#[derive(Clone, Debug, PartialEq)]
pub struct EmphasisConfig {
	/// Node does not match an active search.
	pub search_miss: f64,
	/// Node is outside the hover or selection scope.
	pub unfocused: f64,
	/// Node is not reached by the timeline propagation.
	pub unreached: f64,
	/// Node's own timestamp is after the cursor.
	pub future: f64,
}

impl Default for EmphasisConfig {
	fn default() -> Self {
		Self {
			search_miss: 0.35,
			unfocused: 0.3,
			unreached: 0.16,
			future: 0.1,
		}
	}
}

/// Case-insensitive substring match on label or id. Blank terms match nothing.
pub fn matches_search(node: &GraphNode, term: &str) -> bool {
	let term = term.trim().to_lowercase();
	!term.is_empty()
		&& (node.label.to_lowercase().contains(&term) || node.id.to_lowercase().contains(&term))
}

/// Ids of every node matching `term`. Empty means no search is in effect.
pub fn search_hits(snapshot: &GraphSnapshot, term: &str) -> HashSet<String> {
	if term.trim().is_empty() {
		return HashSet::new();
	}
	snapshot
		.nodes()
		.iter()
		.filter(|n| matches_search(n, term))
		.map(|n| n.id.clone())
		.collect()
}

/// Node ids used for focus emphasis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FocusScope {
	/// Hovered node and its direct neighbors.
	Hover {
		/// The hovered node.
		anchor: String,
		/// The anchor plus its neighbors.
		members: HashSet<String>,
	},
	/// Selected node and its whole connected component.
	Selection {
		/// The selected node.
		anchor: String,
		/// Everything connected to the anchor.
		members: HashSet<String>,
	},
}

impl FocusScope {
	/// Hover wins over selection; `None` when neither is set.
	pub fn resolve(
		adjacency: &AdjacencyMap,
		hovered: Option<&str>,
		selected: Option<&str>,
	) -> Option<Self> {
		if let Some(id) = hovered {
			return Some(FocusScope::Hover {
				anchor: id.to_string(),
				members: direct_neighbors(adjacency, id),
			});
		}
		selected.map(|id| FocusScope::Selection {
			anchor: id.to_string(),
			members: connected_component(adjacency, id),
		})
	}

	/// The hovered or selected node itself.
	pub fn anchor(&self) -> &str {
		match self {
			FocusScope::Hover { anchor, .. } | FocusScope::Selection { anchor, .. } => anchor,
		}
	}

	/// Whether `id` is in focus.
	pub fn contains(&self, id: &str) -> bool {
		match self {
			FocusScope::Hover { members, .. } | FocusScope::Selection { members, .. } => {
				members.contains(id)
			}
		}
	}
}

/// Why and how strongly a node is emphasized.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeEmphasis {
	/// Opacity multiplier in `(0, 1]`.
	pub opacity: f64,
	/// Search hit or focus anchor.
	pub highlighted: bool,
	/// An active search did not match this node.
	pub search_miss: bool,
	/// Outside the current focus scope.
	pub unfocused: bool,
	/// Not unfolded by the timeline yet.
	pub unreached: bool,
	/// Timestamped after the cursor.
	pub future: bool,
}

/// Exactly one tier per link, in priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkTier {
	/// Touches the hovered or selected node.
	Emphasized,
	/// Unfolded by the timeline at the current cursor.
	Unfolded,
	/// Not reachable yet.
	Pending,
}

/// Everything emphasis depends on for one frame.
pub struct EmphasisContext<'a> {
	/// Dimming factors.
	pub config: &'a EmphasisConfig,
	/// Search hits; empty when no search is active.
	pub hits: &'a HashSet<String>,
	/// Resolved hover or selection scope.
	pub focus: Option<&'a FocusScope>,
	/// Hovered node id.
	pub hovered: Option<&'a str>,
	/// Selected node id.
	pub selected: Option<&'a str>,
	/// What the timeline has unfolded.
	pub reach: &'a TimelineReach,
	/// Timeline cursor in epoch millis.
	pub cursor: i64,
}

impl EmphasisContext<'_> {
	/// Compound every dimming reason that applies to `node`.
	pub fn node(&self, node: &GraphNode) -> NodeEmphasis {
		let search_miss = !self.hits.is_empty() && !self.hits.contains(&node.id);
		let unfocused = self.focus.is_some_and(|scope| !scope.contains(&node.id));
		let unreached = !self.reach.nodes.contains(&node.id);
		let future = node.time().is_some_and(|t| t > self.cursor);

		let mut opacity = 1.0;
		if search_miss {
			opacity *= self.config.search_miss;
		}
		if unfocused {
			opacity *= self.config.unfocused;
		}
		if unreached {
			opacity *= self.config.unreached;
		}
		if future {
			opacity *= self.config.future;
		}

		let highlighted = self.hits.contains(&node.id)
			|| self.focus.is_some_and(|scope| scope.anchor() == node.id);

		NodeEmphasis {
			opacity,
			highlighted,
			search_miss,
			unfocused,
			unreached,
			future,
		}
	}

	/// Classify `link` into its single tier.
	pub fn link(&self, link: &GraphLink) -> LinkTier {
		let anchored = |id: Option<&str>| id.is_some_and(|id| link.touches(id));
		if anchored(self.hovered) || anchored(self.selected) {
			LinkTier::Emphasized
		} else if self.reach.links.contains(&link.id) {
			LinkTier::Unfolded
		} else {
			LinkTier::Pending
		}
	}
}
