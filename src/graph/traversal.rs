//! Breadth-first reachability over an [`AdjacencyMap`].

use std::collections::{HashSet, VecDeque};

use super::adjacency::AdjacencyMap;

/// Every node reachable from `seed` through any path, `seed` included.
///
/// A seed that no link touches yields `{seed}`.
pub fn connected_component(adjacency: &AdjacencyMap, seed: &str) -> HashSet<String> {
	let mut seen = HashSet::from([seed.to_string()]);
	let mut queue = VecDeque::from([seed.to_string()]);

	while let Some(current) = queue.pop_front() {
		let Some(neighbors) = adjacency.neighbors(&current) else {
			continue;
		};
		for next in neighbors {
			if seen.insert(next.clone()) {
				queue.push_back(next.clone());
			}
		}
	}
	seen
}

/// `seed` plus its immediate neighbors.
pub fn direct_neighbors(adjacency: &AdjacencyMap, seed: &str) -> HashSet<String> {
	let mut out = HashSet::from([seed.to_string()]);
	if let Some(neighbors) = adjacency.neighbors(seed) {
		out.extend(neighbors.iter().cloned());
	}
	out
}
