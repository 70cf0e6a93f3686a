//! Undirected neighbor index built from a link list.

use std::collections::{HashMap, HashSet};

use super::model::GraphLink;

/// `node id -> neighbor ids`, symmetric by construction.
///
/// Endpoints are stored whether or not a node with that id exists; consumers
/// that hand data to the renderer drop dangling ids themselves.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdjacencyMap {
	neighbors: HashMap<String, HashSet<String>>,
}

impl AdjacencyMap {
	/// Index every link in one pass. Self-loops make a node its own neighbor.
	pub fn build<'a>(links: impl IntoIterator<Item = &'a GraphLink>) -> Self {
		let mut neighbors: HashMap<String, HashSet<String>> = HashMap::new();
		for link in links {
			neighbors
				.entry(link.source.clone())
				.or_default()
				.insert(link.target.clone());
			neighbors
				.entry(link.target.clone())
				.or_default()
				.insert(link.source.clone());
		}
		Self { neighbors }
	}

	/// Neighbors of `id`, or `None` when no link touches it.
	pub fn neighbors(&self, id: &str) -> Option<&HashSet<String>> {
		self.neighbors.get(id)
	}

	/// Whether any link touches `id`.
	pub fn contains(&self, id: &str) -> bool {
		self.neighbors.contains_key(id)
	}

	/// Number of indexed endpoints.
	pub fn len(&self) -> usize {
		self.neighbors.len()
	}

	/// True when the link list was empty.
	pub fn is_empty(&self) -> bool {
		self.neighbors.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn link(id: &str, s: &str, t: &str) -> GraphLink {
		GraphLink::new(id, s, t, "rel")
	}

	#[test]
	fn links_are_indexed_both_ways() {
		let links = [link("l1", "a", "b"), link("l2", "b", "c")];
		let adj = AdjacencyMap::build(&links);

		assert!(adj.neighbors("a").is_some_and(|n| n.contains("b")));
		assert!(adj.neighbors("b").is_some_and(|n| n.contains("a") && n.contains("c")));
		assert!(adj.neighbors("c").is_some_and(|n| n.contains("b")));
		assert_eq!(adj.len(), 3);
	}

	#[test]
	fn self_loop_is_its_own_neighbor() {
		let links = [link("l1", "a", "a")];
		let adj = AdjacencyMap::build(&links);
		assert_eq!(adj.neighbors("a").map(HashSet::len), Some(1));
		assert!(adj.neighbors("a").is_some_and(|n| n.contains("a")));
	}

	#[test]
	fn dangling_endpoints_are_kept() {
		let links = [link("l1", "a", "ghost")];
		let adj = AdjacencyMap::build(&links);
		assert!(adj.contains("ghost"));
		assert!(adj.neighbors("unlinked").is_none());
	}
}
