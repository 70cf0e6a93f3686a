//! Structural sanity check run once per snapshot.
//!
//! A case is expected to have at least two events that all lead back to one
//! shared network node. Failures are advisory: the page shows a banner and
//! keeps working.

use thiserror::Error;

use super::adjacency::AdjacencyMap;
use super::model::{GraphSnapshot, NodeType};
use super::traversal::connected_component;

/// A dataset that does not look like a coordinated case.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DatasetIssue {
	/// Fewer than two event nodes.
	#[error("expected at least 2 event nodes, found {found}")]
	EventCount {
		/// Number of event nodes in the snapshot.
		found: usize,
	},

	/// No network node at all.
	#[error("no network node present in the dataset")]
	IpMissing,

	/// No network node is connected to every event.
	#[error(
		"no network node is shared by all {} events ({} candidates checked)",
		.event_ids.len(),
		.ip_ids.len()
	)]
	SharedIpMissing {
		/// Every event node, in snapshot order.
		event_ids: Vec<String>,
		/// Every network node that was tried as the shared one.
		ip_ids: Vec<String>,
	},
}

/// Ids that were considered when looking for shared infrastructure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IssueDetails<'a> {
	/// Event node ids.
	pub event_ids: &'a [String],
	/// Candidate network node ids.
	pub ip_ids: &'a [String],
}

impl DatasetIssue {
	/// Stable machine-readable code.
	pub fn code(&self) -> &'static str {
		match self {
			DatasetIssue::EventCount { .. } => "EVENT_COUNT",
			DatasetIssue::IpMissing => "IP_MISSING",
			DatasetIssue::SharedIpMissing { .. } => "SHARED_IP_MISSING",
		}
	}

	/// Ids behind a `SHARED_IP_MISSING` result.
	pub fn details(&self) -> Option<IssueDetails<'_>> {
		match self {
			DatasetIssue::SharedIpMissing { event_ids, ip_ids } => Some(IssueDetails {
				event_ids,
				ip_ids,
			}),
			_ => None,
		}
	}
}

/// `None` when the snapshot passes every check.
pub fn validate(snapshot: &GraphSnapshot, adjacency: &AdjacencyMap) -> Option<DatasetIssue> {
	let event_ids: Vec<String> = snapshot
		.nodes_of(NodeType::Event)
		.map(|n| n.id.clone())
		.collect();
	if event_ids.len() < 2 {
		return Some(DatasetIssue::EventCount {
			found: event_ids.len(),
		});
	}

	let ip_ids: Vec<String> = snapshot
		.nodes_of(NodeType::Network)
		.map(|n| n.id.clone())
		.collect();
	if ip_ids.is_empty() {
		return Some(DatasetIssue::IpMissing);
	}

	let shared = ip_ids.iter().any(|ip| {
		let component = connected_component(adjacency, ip);
		event_ids.iter().all(|evt| component.contains(evt))
	});
	if shared {
		None
	} else {
		Some(DatasetIssue::SharedIpMissing { event_ids, ip_ids })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::model::{GraphLink, GraphNode};

	fn check(nodes: Vec<GraphNode>, links: Vec<GraphLink>) -> Option<DatasetIssue> {
		let snapshot = GraphSnapshot::new(nodes, links);
		let adjacency = AdjacencyMap::build(snapshot.links());
		validate(&snapshot, &adjacency)
	}

	fn event(id: &str) -> GraphNode {
		GraphNode::new(id, NodeType::Event, id)
	}

	fn ip(id: &str) -> GraphNode {
		GraphNode::new(id, NodeType::Network, id)
	}

	#[test]
	fn single_event_fails_event_count() {
		let issue = check(vec![event("e1"), ip("ip")], vec![GraphLink::new("l", "e1", "ip", "r")]);
		assert_eq!(issue, Some(DatasetIssue::EventCount { found: 1 }));
		assert_eq!(issue.map(|i| i.code()), Some("EVENT_COUNT"));
	}

	#[test]
	fn missing_network_node() {
		let issue = check(vec![event("e1"), event("e2")], Vec::new());
		assert_eq!(issue.as_ref().map(DatasetIssue::code), Some("IP_MISSING"));
		assert!(issue.is_some_and(|i| i.details().is_none()));
	}

	#[test]
	fn events_sharing_an_ip_through_a_path_pass() {
		let issue = check(
			vec![
				event("e1"),
				event("e2"),
				GraphNode::new("a", NodeType::Account, "a"),
				ip("ip"),
			],
			vec![
				GraphLink::new("l1", "e1", "a", "r"),
				GraphLink::new("l2", "a", "ip", "r"),
				GraphLink::new("l3", "ip", "e2", "r"),
			],
		);
		assert_eq!(issue, None);
	}

	#[test]
	fn separate_ips_fail_with_details() {
		let issue = check(
			vec![event("e1"), event("e2"), ip("ip1"), ip("ip2")],
			vec![
				GraphLink::new("l1", "e1", "ip1", "r"),
				GraphLink::new("l2", "e2", "ip2", "r"),
			],
		);
		let Some(issue) = issue else {
			panic!("expected an issue");
		};
		assert_eq!(issue.code(), "SHARED_IP_MISSING");
		let details = issue.details();
		assert_eq!(
			details.map(|d| d.event_ids.to_vec()),
			Some(vec!["e1".to_string(), "e2".to_string()])
		);
		assert_eq!(details.map(|d| d.ip_ids.len()), Some(2));
		assert_eq!(
			issue.to_string(),
			"no network node is shared by all 2 events (2 candidates checked)"
		);
	}
}
