//! End-to-end checks against the built-in case datasets.

use std::collections::HashSet;

use graph_lens::graph::scenarios::{self, SCENARIOS};
use graph_lens::graph::{
	Action, AdjacencyMap, EmphasisConfig, Explorer, LinkTier, NodeType, TimeBounds, propagate,
	validate,
};

fn ids(set: &HashSet<String>) -> Vec<&str> {
	let mut out: Vec<&str> = set.iter().map(String::as_str).collect();
	out.sort_unstable();
	out
}

#[test]
fn validator_results_per_scenario() {
	let harassment = scenarios::find("harassment").snapshot();
	assert_eq!(validate(&harassment, &AdjacencyMap::build(harassment.links())), None);

	let romance = scenarios::find("romance-scam").snapshot();
	assert_eq!(validate(&romance, &AdjacencyMap::build(romance.links())), None);

	let sim = scenarios::find("sim-swap").snapshot();
	let issue = validate(&sim, &AdjacencyMap::build(sim.links()));
	let Some(issue) = issue else {
		panic!("sim-swap should not share a network node");
	};
	assert_eq!(issue.code(), "SHARED_IP_MISSING");
	let details = issue.details();
	assert_eq!(
		details.map(|d| d.event_ids.to_vec()),
		Some(vec!["evt_port".to_string(), "evt_drain".to_string()])
	);
	assert_eq!(
		details.map(|d| d.ip_ids.to_vec()),
		Some(vec!["ip_tor".to_string(), "ip_hosting".to_string()])
	);
}

#[test]
fn harassment_timeline_unfolds_from_first_ip() {
	let snapshot = scenarios::find("harassment").snapshot();
	let bounds = TimeBounds::or_now(&snapshot);

	let start = propagate(&snapshot, bounds.min);
	assert_eq!(ids(&start.origins), ["ip_91"]);
	assert_eq!(start.nodes, start.origins);

	let end = propagate(&snapshot, bounds.max);
	assert_eq!(end.nodes.len(), snapshot.nodes().len());
	assert_eq!(end.links.len(), snapshot.links().len());
}

#[test]
fn disconnected_pieces_never_unfold() {
	let romance = scenarios::find("romance-scam").snapshot();
	let end = propagate(&romance, i64::MAX);
	assert!(!end.nodes.contains("media_receipt"));
	assert_eq!(end.nodes.len(), romance.nodes().len() - 1);

	let sim = scenarios::find("sim-swap").snapshot();
	let end = propagate(&sim, i64::MAX);
	assert_eq!(ids(&end.nodes), ["acct_carrier", "evt_port", "ip_tor"]);
}

#[test]
fn sim_swap_keeps_unparsable_timestamps_timeless() {
	let sim = scenarios::find("sim-swap").snapshot();
	let note = sim.node("media_note");
	assert!(note.is_some_and(|n| n.time().is_none() && n.kind == NodeType::Media));
	let bounds = TimeBounds::or_now(&sim);
	assert_eq!(
		bounds.span(),
		61 * 60_000,
		"bounds should ignore the unparsable note and pending link"
	);
}

#[test]
fn search_marks_matches_and_ignores_misses() {
	let mut explorer = Explorer::from_scenario("romance-scam");
	explorer.dispatch(Action::SetCursor(i64::MAX));
	explorer.dispatch(Action::Search("alpha".into()));
	let view = explorer.view();
	let highlighted: Vec<&str> = view
		.nodes
		.iter()
		.filter(|n| n.emphasis.highlighted)
		.map(|n| n.node.id.as_str())
		.collect();
	assert_eq!(highlighted, ["acct_alpha"]);

	explorer.dispatch(Action::Search("zzz".into()));
	let view = explorer.view();
	assert!(view.nodes.iter().all(|n| !n.emphasis.highlighted && !n.emphasis.search_miss));
}

#[test]
fn select_then_expand_on_an_isolated_node() {
	let mut explorer = Explorer::from_scenario("romance-scam");
	explorer.dispatch(Action::Select("media_receipt".into()));
	assert_eq!(ids(&explorer.state().visible), ["media_receipt"]);
	explorer.dispatch(Action::Expand("media_receipt".into()));
	assert_eq!(ids(&explorer.state().visible), ["media_receipt"]);

	explorer.dispatch(Action::ResetView);
	assert_eq!(explorer.state().visible.len(), 9);
}

#[test]
fn hover_emphasizes_incident_links() {
	let mut explorer = Explorer::from_scenario("harassment");
	explorer.dispatch(Action::Hover(Some("usr_b".into())));
	let view = explorer.view();
	for link in &view.links {
		let touches = link.link.touches("usr_b");
		assert_eq!(link.tier == LinkTier::Emphasized, touches, "{}", link.link.id);
	}
	let alert: Vec<&str> = view
		.links
		.iter()
		.filter(|l| l.alert)
		.map(|l| l.link.id.as_str())
		.collect();
	// strong weight or high-risk target
	assert_eq!(alert, ["rel_1", "rel_2", "rel_8"]);
}

#[test]
fn custom_emphasis_factors_apply() {
	let config = EmphasisConfig {
		search_miss: 0.5,
		unfocused: 0.4,
		unreached: 0.2,
		future: 0.05,
	};
	let mut explorer = Explorer::from_scenario("harassment").with_config(config);
	explorer.dispatch(Action::Search("botnet".into()));
	let view = explorer.view();
	let reel = view.nodes.iter().find(|n| n.node.id == "media_clip");
	// search miss, not unfolded, and in the future at the starting cursor
	assert!(reel.is_some_and(|n| (n.emphasis.opacity - 0.5 * 0.2 * 0.05).abs() < 1e-12));
}

#[test]
fn every_scenario_opens_with_everything_visible() {
	for scenario in SCENARIOS {
		let explorer = Explorer::from_scenario(scenario.id);
		let view = explorer.view();
		assert_eq!(view.nodes.len(), explorer.graph().snapshot().nodes().len());
		assert_eq!(view.cursor, view.bounds.min);
		assert_eq!(view.nodes[0].node.kind, NodeType::Event, "{}", scenario.id);
	}
}
