//! Built-in case datasets.

use log::{error, warn};

use super::loader;
use super::model::{GraphLink, GraphNode, GraphSnapshot, NodeType};

/// A named dataset the page can switch to.
pub struct Scenario {
	/// Stable id used by the scenario picker.
	pub id: &'static str,
	/// Title shown in the picker.
	pub title: &'static str,
	build: fn() -> GraphSnapshot,
}

impl Scenario {
	/// Build a fresh snapshot.
	pub fn snapshot(&self) -> GraphSnapshot {
		(self.build)()
	}
}

/// Every built-in scenario; the first one is the default.
pub static SCENARIOS: &[Scenario] = &[
	Scenario {
		id: "harassment",
		title: "Harassment campaign",
		build: harassment,
	},
	Scenario {
		id: "romance-scam",
		title: "Romance scam payouts",
		build: romance_scam,
	},
	Scenario {
		id: "sim-swap",
		title: "SIM swap takeover",
		build: sim_swap,
	},
];

/// Look up a scenario, falling back to the first one for unknown ids.
pub fn find(id: &str) -> &'static Scenario {
	SCENARIOS
		.iter()
		.find(|s| s.id == id)
		.unwrap_or_else(|| {
			warn!("unknown scenario '{id}', using '{}'", SCENARIOS[0].id);
			&SCENARIOS[0]
		})
}

fn harassment() -> GraphSnapshot {
	let nodes = vec![
		GraphNode::new("evt_root", NodeType::Event, "Harassment Campaign #4")
			.risk(95.0)
			.attr("status", "Active")
			.attr("detected_at", "2023-10-27T10:00:00Z")
			.at("2023-10-27T10:00:00Z")
			.radius(40.0),
		GraphNode::new("evt_dox", NodeType::Event, "Doxxing Thread")
			.risk(81.0)
			.attr("status", "Escalated")
			.attr("platform", "Telegram")
			.at("2023-10-27T10:20:00Z")
			.radius(32.0),
		GraphNode::new("usr_a", NodeType::Account, "Scammer Account A")
			.risk(88.0)
			.attr("platform", "Instagram")
			.attr("username", "@bad_actor")
			.attr("account_age_days", 2i64)
			.at("2023-10-27T09:55:00Z"),
		GraphNode::new("usr_b", NodeType::Account, "Botnet Helper")
			.risk(62.0)
			.attr("platform", "Telegram")
			.attr("username", "@helper_bot")
			.at("2023-10-27T09:50:00Z"),
		GraphNode::new("dev_iphone", NodeType::Device, "Grandma's iPhone")
			.risk(10.0)
			.attr("model", "iPhone 13")
			.attr("os", "iOS 16.4")
			.at("2023-10-27T10:06:00Z"),
		GraphNode::new("ip_45", NodeType::Network, "45.22.11.12")
			.risk(75.0)
			.attr("geolocation", "Lagos, NG")
			.attr("is_vpn", true)
			.at("2023-10-27T09:55:00Z"),
		GraphNode::new("ip_91", NodeType::Network, "91.200.10.34")
			.risk(48.0)
			.attr("geolocation", "Klaipeda, LT")
			.attr("is_vpn", false)
			.at("2023-10-27T09:45:00Z"),
		GraphNode::new("media_clip", NodeType::Media, "Instagram Reel")
			.risk(55.0)
			.attr("duration", "1:10")
			.attr("reported", "4x")
			.at("2023-10-27T10:10:00Z"),
		GraphNode::new("media_album", NodeType::Media, "Camera Roll Dump")
			.risk(20.0)
			.attr("count", 8i64)
			.attr("sensitive", false)
			.at("2023-10-27T10:07:00Z"),
	];
	let links = vec![
		GraphLink::new("rel_1", "usr_a", "evt_root", "initiated").at("2023-10-27T10:05:00Z"),
		GraphLink::new("rel_2", "evt_root", "dev_iphone", "targeted").at("2023-10-27T10:06:00Z"),
		GraphLink::new("rel_3", "usr_a", "ip_45", "logged_in_from")
			.weight(0.5)
			.at("2023-10-27T09:55:00Z"),
		GraphLink::new("rel_4", "evt_root", "media_clip", "shared_media")
			.weight(0.3)
			.at("2023-10-27T10:10:00Z"),
		GraphLink::new("rel_5", "usr_a", "usr_b", "coordinated_with")
			.weight(0.6)
			.at("2023-10-27T09:51:00Z"),
		GraphLink::new("rel_6", "usr_b", "ip_91", "posted_from")
			.weight(0.4)
			.at("2023-10-27T09:46:00Z"),
		GraphLink::new("rel_7", "dev_iphone", "media_album", "synced_to")
			.weight(0.2)
			.at("2023-10-27T10:07:00Z"),
		GraphLink::new("rel_8", "usr_b", "evt_dox", "initiated")
			.weight(0.9)
			.at("2023-10-27T10:20:00Z"),
	];
	GraphSnapshot::new(nodes, links)
}

fn romance_scam() -> GraphSnapshot {
	let nodes = vec![
		GraphNode::new("evt_wire", NodeType::Event, "Wire Transfer Request")
			.risk(92.0)
			.attr("amount_usd", 14_500i64)
			.attr("status", "Pending review")
			.at("2024-03-02T18:30:00Z")
			.radius(36.0),
		GraphNode::new("evt_giftcard", NodeType::Event, "Gift Card Demand")
			.risk(84.0)
			.attr("amount_usd", 2_000i64)
			.attr("status", "Paid")
			.at("2024-03-04T21:05:00Z")
			.radius(30.0),
		GraphNode::new("acct_persona", NodeType::Account, "Persona 'Daniel'")
			.risk(90.0)
			.attr("platform", "Dating app")
			.attr("account_age_days", 11i64)
			.at("2024-02-20T08:00:00Z"),
		GraphNode::new("acct_alpha", NodeType::Account, "Alpha Cashout")
			.risk(71.0)
			.attr("bank", "Neo Bank Ltd")
			.attr("role", "money mule")
			.at("2024-03-02T18:45:00Z"),
		GraphNode::new("ip_vpn", NodeType::Network, "185.199.40.7")
			.risk(77.0)
			.attr("geolocation", "Amsterdam, NL")
			.attr("is_vpn", true)
			.at("2024-02-20T07:58:00Z"),
		GraphNode::new("ip_home", NodeType::Network, "73.14.201.9")
			.risk(5.0)
			.attr("geolocation", "Denver, US")
			.attr("is_vpn", false)
			.at("2024-02-25T19:00:00Z"),
		GraphNode::new("dev_victim", NodeType::Device, "Victim's Android")
			.risk(8.0)
			.attr("model", "Pixel 7")
			.at("2024-02-25T19:01:00Z"),
		GraphNode::new("media_selfie", NodeType::Media, "Stolen Profile Photo")
			.risk(60.0)
			.attr("reverse_image_hits", 37i64)
			.at("2024-02-20T08:05:00Z"),
		GraphNode::new("media_receipt", NodeType::Media, "Unlinked Receipt Screenshot")
			.attr("source", "victim upload"),
	];
	let links = vec![
		GraphLink::new("r1", "acct_persona", "ip_vpn", "logged_in_from")
			.weight(0.7)
			.at("2024-02-20T08:00:00Z"),
		GraphLink::new("r2", "acct_persona", "media_selfie", "posted")
			.weight(0.5)
			.at("2024-02-20T08:05:00Z"),
		GraphLink::new("r3", "dev_victim", "ip_home", "connected_via")
			.weight(0.3)
			.at("2024-02-25T19:01:00Z"),
		GraphLink::new("r4", "acct_persona", "dev_victim", "messaged")
			.weight(0.8)
			.at("2024-02-26T22:10:00Z"),
		GraphLink::new("r5", "acct_persona", "evt_wire", "requested")
			.at("2024-03-02T18:30:00Z"),
		GraphLink::new("r6", "evt_wire", "acct_alpha", "paid_to")
			.at("2024-03-02T18:45:00Z"),
		GraphLink::new("r7", "acct_alpha", "ip_vpn", "logged_in_from")
			.weight(0.6)
			.at("2024-03-03T09:12:00Z"),
		GraphLink::new("r8", "acct_persona", "evt_giftcard", "requested")
			.weight(0.95)
			.at("2024-03-04T21:05:00Z"),
	];
	GraphSnapshot::new(nodes, links)
}

fn sim_swap() -> GraphSnapshot {
	loader::from_json(include_str!("../../data/sim_swap.json")).unwrap_or_else(|err| {
		error!("sim-swap scenario failed to load: {err}");
		GraphSnapshot::default()
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unknown_id_falls_back_to_first() {
		assert_eq!(find("romance-scam").id, "romance-scam");
		assert_eq!(find("does-not-exist").id, SCENARIOS[0].id);
		assert_eq!(find("").id, SCENARIOS[0].id);
	}

	#[test]
	fn every_scenario_builds_with_unique_ids() {
		for scenario in SCENARIOS {
			let snapshot = scenario.snapshot();
			assert!(!snapshot.is_empty(), "{} is empty", scenario.id);

			let mut node_ids: Vec<&str> = snapshot.nodes().iter().map(|n| n.id.as_str()).collect();
			node_ids.sort_unstable();
			node_ids.dedup();
			assert_eq!(node_ids.len(), snapshot.nodes().len(), "{}", scenario.id);

			for link in snapshot.links() {
				assert!(snapshot.contains(&link.source), "{} {}", scenario.id, link.id);
				assert!(snapshot.contains(&link.target), "{} {}", scenario.id, link.id);
			}
		}
	}
}
