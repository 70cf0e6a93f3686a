//! Central explorer state and its transitions.
//!
//! [`IndexedGraph`] holds one snapshot plus everything derived from it; it is
//! rebuilt wholesale when the scenario changes. [`ExplorerState`] is the
//! user-controlled part and only changes through [`ExplorerState::apply`].

use std::collections::HashSet;

use log::{debug, info, warn};

use super::adjacency::AdjacencyMap;
use super::emphasis::{
	EmphasisConfig, EmphasisContext, FocusScope, LinkTier, NodeEmphasis, search_hits,
};
use super::model::{GraphLink, GraphNode, GraphSnapshot, LinkWeight, NodeType, RiskTier};
use super::scenarios;
use super::timeline::{TimeBounds, TimelineReach, propagate};
use super::traversal::{connected_component, direct_neighbors};
use super::validate::{DatasetIssue, validate};
use super::visibility::{TypeFilters, filter_visible};

/// A snapshot with its adjacency, time bounds and validation result.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexedGraph {
	snapshot: GraphSnapshot,
	adjacency: AdjacencyMap,
	bounds: TimeBounds,
	issue: Option<DatasetIssue>,
}

impl IndexedGraph {
	/// Index `snapshot` and run the dataset check once.
	pub fn new(snapshot: GraphSnapshot) -> Self {
		let adjacency = AdjacencyMap::build(snapshot.links());
		let bounds = TimeBounds::or_now(&snapshot);
		let issue = validate(&snapshot, &adjacency);
		if let Some(issue) = &issue {
			warn!("dataset check failed [{}]: {issue}", issue.code());
		}
		Self {
			snapshot,
			adjacency,
			bounds,
			issue,
		}
	}

	/// The underlying snapshot.
	pub fn snapshot(&self) -> &GraphSnapshot {
		&self.snapshot
	}

	/// Neighbor index built from the snapshot links.
	pub fn adjacency(&self) -> &AdjacencyMap {
		&self.adjacency
	}

	/// Timeline range.
	pub fn bounds(&self) -> TimeBounds {
		self.bounds
	}

	/// Validator result for this snapshot.
	pub fn issue(&self) -> Option<&DatasetIssue> {
		self.issue.as_ref()
	}

	fn all_ids(&self) -> HashSet<String> {
		self.snapshot.nodes().iter().map(|n| n.id.clone()).collect()
	}
}

/// One user interaction.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
	/// Select a node and narrow the view to its connected component.
	Select(String),
	/// Pointer entered a node, or left all nodes.
	Hover(Option<String>),
	/// Add a node's direct neighbors to the view.
	Expand(String),
	/// Drop the selection, keeping the visible set.
	ClearSelection,
	/// Show or hide one node type.
	ToggleFilter(NodeType),
	/// Raw search box contents.
	Search(String),
	/// Timeline cursor in epoch millis.
	SetCursor(i64),
	/// Show everything, clear focus, rewind the timeline.
	ResetView,
}

/// User-controlled view state for one snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExplorerState {
	/// Node ids eligible for display before type filtering.
	pub visible: HashSet<String>,
	/// Enabled node types.
	pub filters: TypeFilters,
	/// Selected node id.
	pub selected: Option<String>,
	/// Hovered node id; wins over the selection for emphasis.
	pub hovered: Option<String>,
	/// Timeline cursor in epoch millis.
	pub cursor: i64,
	/// Search box contents, untrimmed.
	pub search: String,
}

impl ExplorerState {
	/// Everything visible, nothing focused, cursor at the start of the timeline.
	pub fn initial(graph: &IndexedGraph) -> Self {
		Self {
			visible: graph.all_ids(),
			filters: TypeFilters::default(),
			selected: None,
			hovered: None,
			cursor: graph.bounds().min,
			search: String::new(),
		}
	}

	/// Apply one action against `graph`.
	pub fn apply(mut self, action: Action, graph: &IndexedGraph) -> Self {
		debug!("explorer action: {action:?}");
		match action {
			Action::Select(id) => {
				self.visible = connected_component(graph.adjacency(), &id);
				self.selected = Some(id);
			}
			Action::Hover(id) => self.hovered = id,
			Action::Expand(id) => {
				self.visible.extend(direct_neighbors(graph.adjacency(), &id));
			}
			Action::ClearSelection => self.selected = None,
			Action::ToggleFilter(kind) => self.filters.toggle(kind),
			Action::Search(term) => self.search = term,
			Action::SetCursor(t) => self.cursor = t,
			Action::ResetView => {
				let filters = std::mem::take(&mut self.filters);
				let search = std::mem::take(&mut self.search);
				self = Self {
					filters,
					search,
					..Self::initial(graph)
				};
			}
		}
		self
	}
}

/// A node ready for drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewNode {
	/// The dataset node.
	pub node: GraphNode,
	/// Opacity and dimming reasons.
	pub emphasis: NodeEmphasis,
	/// Risk band for the stroke color.
	pub risk: RiskTier,
	/// This is the selected node.
	pub selected: bool,
	/// This is the hovered node.
	pub hovered: bool,
}

/// A link ready for drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewLink {
	/// The dataset link.
	pub link: GraphLink,
	/// Emphasis tier.
	pub tier: LinkTier,
	/// Weight class for the stroke style.
	pub weight: LinkWeight,
	/// Strong link, or one pointing at a high-risk node.
	pub alert: bool,
}

/// Everything the page and canvas need for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct ExplorerView {
	/// Visible nodes in display order.
	pub nodes: Vec<ViewNode>,
	/// Links between visible nodes.
	pub links: Vec<ViewLink>,
	/// Timeline unfolding at `cursor`.
	pub reach: TimelineReach,
	/// Timeline range of the snapshot.
	pub bounds: TimeBounds,
	/// Timeline cursor as last set.
	pub cursor: i64,
	/// Dataset check result.
	pub issue: Option<DatasetIssue>,
}

/// Snapshot, derived indexes and view state, switched as a unit.
#[derive(Clone, Debug, PartialEq)]
pub struct Explorer {
	scenario: &'static str,
	graph: IndexedGraph,
	state: ExplorerState,
	config: EmphasisConfig,
}

impl Explorer {
	/// Open a built-in scenario; unknown ids open the first one.
	pub fn from_scenario(id: &str) -> Self {
		let scenario = scenarios::find(id);
		let mut explorer = Self::new(scenario.snapshot());
		explorer.scenario = scenario.id;
		explorer
	}

	/// Open an arbitrary snapshot.
	pub fn new(snapshot: GraphSnapshot) -> Self {
		let graph = IndexedGraph::new(snapshot);
		let state = ExplorerState::initial(&graph);
		Self {
			scenario: "",
			graph,
			state,
			config: EmphasisConfig::default(),
		}
	}

	/// Override the dimming factors.
	pub fn with_config(mut self, config: EmphasisConfig) -> Self {
		self.config = config;
		self
	}

	/// Id of the active built-in scenario, empty for ad-hoc snapshots.
	pub fn scenario(&self) -> &'static str {
		self.scenario
	}

	/// Active snapshot and its indexes.
	pub fn graph(&self) -> &IndexedGraph {
		&self.graph
	}

	/// Current view state.
	pub fn state(&self) -> &ExplorerState {
		&self.state
	}

	/// Replace the snapshot and reset every piece of derived and user state.
	pub fn switch_scenario(&mut self, id: &str) {
		let scenario = scenarios::find(id);
		info!("switching to scenario '{}'", scenario.id);
		self.scenario = scenario.id;
		self.graph = IndexedGraph::new(scenario.snapshot());
		self.state = ExplorerState::initial(&self.graph);
	}

	/// Apply one user action.
	pub fn dispatch(&mut self, action: Action) {
		self.state = std::mem::take(&mut self.state).apply(action, &self.graph);
	}

	/// Currently selected node, if it exists in the snapshot.
	pub fn selected_node(&self) -> Option<&GraphNode> {
		self.state
			.selected
			.as_deref()
			.and_then(|id| self.graph.snapshot().node(id))
	}

	/// Recompute the drawable graph from the current state.
	pub fn view(&self) -> ExplorerView {
		let snapshot = self.graph.snapshot();
		let state = &self.state;

		let visible = filter_visible(snapshot, &state.filters, &state.visible);
		let reach = propagate(snapshot, state.cursor);
		let hits = search_hits(snapshot, &state.search);
		let focus = FocusScope::resolve(
			self.graph.adjacency(),
			state.hovered.as_deref(),
			state.selected.as_deref(),
		);
		let ctx = EmphasisContext {
			config: &self.config,
			hits: &hits,
			focus: focus.as_ref(),
			hovered: state.hovered.as_deref(),
			selected: state.selected.as_deref(),
			reach: &reach,
			cursor: state.cursor,
		};

		let links = visible
			.links
			.into_iter()
			.map(|link| {
				let target_risk = snapshot.node(&link.target).map(GraphNode::risk_tier);
				let weight = link.weight_class();
				ViewLink {
					tier: ctx.link(&link),
					alert: weight == LinkWeight::Strong || target_risk == Some(RiskTier::High),
					weight,
					link,
				}
			})
			.collect();
		let nodes = visible
			.nodes
			.into_iter()
			.map(|node| ViewNode {
				emphasis: ctx.node(&node),
				risk: node.risk_tier(),
				selected: state.selected.as_deref() == Some(node.id.as_str()),
				hovered: state.hovered.as_deref() == Some(node.id.as_str()),
				node,
			})
			.collect();

		ExplorerView {
			nodes,
			links,
			reach,
			bounds: self.graph.bounds(),
			cursor: state.cursor,
			issue: self.graph.issue().cloned(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ids(set: &HashSet<String>) -> Vec<&str> {
		let mut out: Vec<&str> = set.iter().map(String::as_str).collect();
		out.sort_unstable();
		out
	}

	fn two_islands() -> GraphSnapshot {
		GraphSnapshot::new(
			vec![
				GraphNode::new("ip", NodeType::Network, "10.0.0.1").at("2024-01-01T00:00:00Z"),
				GraphNode::new("a", NodeType::Account, "A").at("2024-01-01T01:00:00Z"),
				GraphNode::new("e", NodeType::Event, "E").at("2024-01-01T02:00:00Z"),
				GraphNode::new("x", NodeType::Device, "X"),
				GraphNode::new("y", NodeType::Media, "Y"),
			],
			vec![
				GraphLink::new("l1", "ip", "a", "login").at("2024-01-01T01:00:00Z"),
				GraphLink::new("l2", "a", "e", "initiated").at("2024-01-01T02:00:00Z"),
				GraphLink::new("l3", "x", "y", "stored"),
			],
		)
	}

	#[test]
	fn select_narrows_to_component() {
		let mut explorer = Explorer::new(two_islands());
		explorer.dispatch(Action::Select("x".into()));
		assert_eq!(ids(&explorer.state().visible), ["x", "y"]);
		assert_eq!(explorer.selected_node().map(|n| n.label.as_str()), Some("X"));

		explorer.dispatch(Action::ClearSelection);
		assert!(explorer.state().selected.is_none());
		assert_eq!(ids(&explorer.state().visible), ["x", "y"]);
	}

	#[test]
	fn expand_is_additive_and_idempotent() {
		let mut explorer = Explorer::new(two_islands());
		explorer.dispatch(Action::Select("ip".into()));
		explorer.dispatch(Action::Expand("x".into()));
		let once = explorer.state().visible.clone();
		explorer.dispatch(Action::Expand("x".into()));
		assert_eq!(explorer.state().visible, once);
		assert_eq!(ids(&once), ["a", "e", "ip", "x", "y"]);
	}

	#[test]
	fn reset_restores_everything_but_filters_and_search() {
		let mut explorer = Explorer::new(two_islands());
		let start = explorer.state().cursor;
		explorer.dispatch(Action::ToggleFilter(NodeType::Media));
		explorer.dispatch(Action::Search("alpha".into()));
		explorer.dispatch(Action::Select("x".into()));
		explorer.dispatch(Action::Hover(Some("y".into())));
		explorer.dispatch(Action::SetCursor(start + 10_000_000));
		explorer.dispatch(Action::ResetView);

		let state = explorer.state();
		assert_eq!(state.visible.len(), 5);
		assert!(state.selected.is_none() && state.hovered.is_none());
		assert_eq!(state.cursor, start);
		assert!(!state.filters.is_enabled(NodeType::Media));
		assert_eq!(state.search, "alpha");
	}

	#[test]
	fn switching_scenario_resets_state() {
		let mut explorer = Explorer::from_scenario("harassment");
		explorer.dispatch(Action::Select("dev_iphone".into()));
		explorer.dispatch(Action::ToggleFilter(NodeType::Event));
		explorer.switch_scenario("romance-scam");

		assert_eq!(explorer.scenario(), "romance-scam");
		let fresh = ExplorerState::initial(explorer.graph());
		assert_eq!(explorer.state(), &fresh);
		assert!(explorer.graph().snapshot().contains("acct_alpha"));

		explorer.switch_scenario("nope");
		assert_eq!(explorer.scenario(), "harassment");
	}

	#[test]
	fn view_filters_and_classifies() {
		let mut explorer = Explorer::new(two_islands());
		let bounds = explorer.graph().bounds();
		explorer.dispatch(Action::SetCursor(bounds.max));
		explorer.dispatch(Action::ToggleFilter(NodeType::Media));
		explorer.dispatch(Action::Hover(Some("a".into())));

		let view = explorer.view();
		let order: Vec<&str> = view.nodes.iter().map(|n| n.node.id.as_str()).collect();
		assert_eq!(order, ["e", "ip", "a", "x"]);
		assert!(view.links.iter().all(|l| l.link.id != "l3"));
		assert!(view.links.iter().all(|l| l.tier == LinkTier::Emphasized));

		let x = view.nodes.iter().find(|n| n.node.id == "x");
		assert!(x.is_some_and(|x| x.emphasis.unreached && x.emphasis.unfocused));
		let a = view.nodes.iter().find(|n| n.node.id == "a");
		assert!(a.is_some_and(|a| a.hovered && a.emphasis.highlighted && a.emphasis.opacity == 1.0));
		assert_eq!(view.issue.as_ref().map(DatasetIssue::code), Some("EVENT_COUNT"));
	}

	#[test]
	fn unknown_node_selection_degrades_to_empty_view() {
		let mut explorer = Explorer::new(two_islands());
		explorer.dispatch(Action::Select("ghost".into()));
		assert_eq!(ids(&explorer.state().visible), ["ghost"]);
		let view = explorer.view();
		assert!(view.nodes.is_empty());
		assert!(view.links.is_empty());
	}
}
