//! Snapshot data model: typed nodes, links and the immutable graph they form.
//!
//! Everything here is plain data. Timestamps are parsed once when a node or link
//! is built so the engine never has to re-parse strings while sorting or gating.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Radius used when a node carries no `visual.radius`.
pub const DEFAULT_NODE_RADIUS: f64 = 18.0;

/// Entity kind of a node. Declaration order is the canonical display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
	/// A case event (campaign, transfer, takeover...).
	Event,
	/// An IP address or other network endpoint.
	#[serde(alias = "ip")]
	Network,
	/// A user or platform account.
	#[serde(alias = "person")]
	Account,
	/// A physical or virtual device.
	Device,
	/// A media artifact.
	Media,
	/// Anything the dataset did not classify.
	#[serde(other)]
	Other,
}

impl NodeType {
	/// Every node type, in canonical order.
	pub const ALL: [NodeType; 6] = [
		NodeType::Event,
		NodeType::Network,
		NodeType::Account,
		NodeType::Device,
		NodeType::Media,
		NodeType::Other,
	];

	/// Position in the canonical display order.
	pub fn rank(self) -> u8 {
		match self {
			NodeType::Event => 0,
			NodeType::Network => 1,
			NodeType::Account => 2,
			NodeType::Device => 3,
			NodeType::Media => 4,
			NodeType::Other => 5,
		}
	}

	/// Plural label used on filter controls.
	pub fn label(self) -> &'static str {
		match self {
			NodeType::Event => "Events",
			NodeType::Network => "Networks",
			NodeType::Account => "Accounts",
			NodeType::Device => "Devices",
			NodeType::Media => "Media",
			NodeType::Other => "Other",
		}
	}
}

/// Offset-carrying forms RFC 3339 rejects: no seconds, or `+hhmm` offsets.
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M%#z"];

/// Local date-times, read as UTC.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

fn parse_millis(text: &str) -> Option<i64> {
	if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
		return Some(dt.timestamp_millis());
	}
	OFFSET_FORMATS
		.iter()
		.find_map(|f| DateTime::parse_from_str(text, f).ok())
		.map(|dt| dt.timestamp_millis())
		.or_else(|| {
			NAIVE_FORMATS
				.iter()
				.find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
				.map(|dt| dt.and_utc().timestamp_millis())
		})
		.or_else(|| {
			NaiveDate::parse_from_str(text, "%Y-%m-%d")
				.ok()
				.and_then(|d| d.and_hms_opt(0, 0, 0))
				.map(|dt| dt.and_utc().timestamp_millis())
		})
}

/// A raw timestamp string together with its parsed instant.
///
/// Strings that do not parse are kept verbatim and treated as timeless.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Timestamp {
	raw: String,
	millis: Option<i64>,
}

impl Timestamp {
	/// Parse an ISO-8601 instant. Seconds are optional, a missing offset means
	/// UTC, and a bare `YYYY-MM-DD` date is midnight UTC.
	pub fn parse(raw: impl Into<String>) -> Self {
		let raw = raw.into();
		let millis = parse_millis(raw.trim());
		Self { raw, millis }
	}

	/// The string as it appeared in the dataset.
	pub fn raw(&self) -> &str {
		&self.raw
	}

	/// Milliseconds since the epoch, `None` when the string is unparsable.
	pub fn millis(&self) -> Option<i64> {
		self.millis
	}
}

impl From<String> for Timestamp {
	fn from(raw: String) -> Self {
		Self::parse(raw)
	}
}

impl From<Timestamp> for String {
	fn from(ts: Timestamp) -> Self {
		ts.raw
	}
}

/// Scalar attribute value attached to a node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
	/// Boolean flag.
	Bool(bool),
	/// Any JSON number.
	Number(f64),
	/// Free text.
	Text(String),
}

impl fmt::Display for AttrValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			AttrValue::Bool(b) => write!(f, "{b}"),
			AttrValue::Number(n) => write!(f, "{n}"),
			AttrValue::Text(s) => f.write_str(s),
		}
	}
}

impl From<&str> for AttrValue {
	fn from(s: &str) -> Self {
		AttrValue::Text(s.to_string())
	}
}

impl From<f64> for AttrValue {
	fn from(n: f64) -> Self {
		AttrValue::Number(n)
	}
}

impl From<i64> for AttrValue {
	fn from(n: i64) -> Self {
		AttrValue::Number(n as f64)
	}
}

impl From<bool> for AttrValue {
	fn from(b: bool) -> Self {
		AttrValue::Bool(b)
	}
}

/// Rendering hints carried by the dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeVisual {
	/// Preferred node radius.
	pub radius: f64,
}

/// Risk classification derived from `risk_score`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RiskTier {
	/// Score below 50 (or absent).
	Low,
	/// Score in `[50, 80)`.
	Elevated,
	/// Score of 80 or more.
	High,
}

impl RiskTier {
	/// Classify a score; a missing score counts as zero.
	pub fn of(score: Option<f64>) -> Self {
		let score = score.unwrap_or(0.0);
		if score >= 80.0 {
			RiskTier::High
		} else if score >= 50.0 {
			RiskTier::Elevated
		} else {
			RiskTier::Low
		}
	}
}

/// A graph entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
	/// Unique id within a snapshot.
	pub id: String,
	/// Entity kind.
	#[serde(rename = "type")]
	pub kind: NodeType,
	/// Human label.
	pub label: String,
	/// Risk score in `0..=100`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub risk_score: Option<f64>,
	/// Scalar attributes in dataset order.
	#[serde(default, skip_serializing_if = "IndexMap::is_empty")]
	pub attributes: IndexMap<String, AttrValue>,
	/// When the entity was observed.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub timestamp: Option<Timestamp>,
	/// Rendering hints.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub visual: Option<NodeVisual>,
}

impl GraphNode {
	/// Start a node with no score, attributes, timestamp or visual hints.
	pub fn new(id: impl Into<String>, kind: NodeType, label: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			kind,
			label: label.into(),
			risk_score: None,
			attributes: IndexMap::new(),
			timestamp: None,
			visual: None,
		}
	}

	/// Set the risk score.
	pub fn risk(mut self, score: f64) -> Self {
		self.risk_score = Some(score);
		self
	}

	/// Set the timestamp from an ISO-8601 string.
	pub fn at(mut self, timestamp: &str) -> Self {
		self.timestamp = Some(Timestamp::parse(timestamp));
		self
	}

	/// Append an attribute.
	pub fn attr(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
		self.attributes.insert(key.to_string(), value.into());
		self
	}

	/// Set the preferred radius.
	pub fn radius(mut self, radius: f64) -> Self {
		self.visual = Some(NodeVisual { radius });
		self
	}

	/// Parsed timestamp in epoch milliseconds.
	pub fn time(&self) -> Option<i64> {
		self.timestamp.as_ref().and_then(Timestamp::millis)
	}

	/// Risk band of the score.
	pub fn risk_tier(&self) -> RiskTier {
		RiskTier::of(self.risk_score)
	}

	/// Radius to draw, falling back to [`DEFAULT_NODE_RADIUS`].
	pub fn display_radius(&self) -> f64 {
		self.visual
			.as_ref()
			.map(|v| v.radius)
			.filter(|r| r.is_finite() && *r > 0.0)
			.unwrap_or(DEFAULT_NODE_RADIUS)
	}
}

/// Strength class of a link, derived from its weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkWeight {
	/// `weight < 0.6`, drawn dashed.
	Faint,
	/// Everything in between.
	Normal,
	/// `weight >= 0.9`, drawn thick with a moving flow.
	Strong,
}

impl LinkWeight {
	/// Classify a raw weight.
	pub fn of(weight: f64) -> Self {
		if weight >= 0.9 {
			LinkWeight::Strong
		} else if weight < 0.6 {
			LinkWeight::Faint
		} else {
			LinkWeight::Normal
		}
	}
}

fn default_weight() -> f64 {
	1.0
}

/// A relation between two nodes. Ordered for display, undirected for traversal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
	/// Unique id within a snapshot.
	pub id: String,
	/// Source node id.
	#[serde(deserialize_with = "super::loader::endpoint_id")]
	pub source: String,
	/// Target node id.
	#[serde(deserialize_with = "super::loader::endpoint_id")]
	pub target: String,
	/// Free-form relation label.
	#[serde(rename = "type", default)]
	pub relation: String,
	/// Strength in `[0, 1]`.
	#[serde(default = "default_weight")]
	pub weight: f64,
	/// When the relation was observed.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub timestamp: Option<Timestamp>,
}

impl GraphLink {
	/// Start a full-weight link with no timestamp.
	pub fn new(
		id: impl Into<String>,
		source: impl Into<String>,
		target: impl Into<String>,
		relation: impl Into<String>,
	) -> Self {
		Self {
			id: id.into(),
			source: source.into(),
			target: target.into(),
			relation: relation.into(),
			weight: default_weight(),
			timestamp: None,
		}
	}

	/// Set the weight.
	pub fn weight(mut self, weight: f64) -> Self {
		self.weight = weight;
		self
	}

	/// Set the timestamp from an ISO-8601 string.
	pub fn at(mut self, timestamp: &str) -> Self {
		self.timestamp = Some(Timestamp::parse(timestamp));
		self
	}

	/// Parsed timestamp in epoch milliseconds.
	pub fn time(&self) -> Option<i64> {
		self.timestamp.as_ref().and_then(Timestamp::millis)
	}

	/// Strength class of the weight.
	pub fn weight_class(&self) -> LinkWeight {
		LinkWeight::of(self.weight)
	}

	/// Whether `id` is one of the endpoints.
	pub fn touches(&self, id: &str) -> bool {
		self.source == id || self.target == id
	}
}

/// One immutable graph dataset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphSnapshot {
	nodes: Vec<GraphNode>,
	links: Vec<GraphLink>,
	index: HashMap<String, usize>,
}

impl GraphSnapshot {
	/// Build a snapshot. Duplicate node ids are tolerated; lookups resolve to the first.
	pub fn new(nodes: Vec<GraphNode>, links: Vec<GraphLink>) -> Self {
		let mut index = HashMap::with_capacity(nodes.len());
		for (i, node) in nodes.iter().enumerate() {
			index.entry(node.id.clone()).or_insert(i);
		}
		Self {
			nodes,
			links,
			index,
		}
	}

	/// Nodes in dataset order.
	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	/// Links in dataset order.
	pub fn links(&self) -> &[GraphLink] {
		&self.links
	}

	/// Look up a node by id.
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.index.get(id).map(|&i| &self.nodes[i])
	}

	/// Whether a node with this id exists.
	pub fn contains(&self, id: &str) -> bool {
		self.index.contains_key(id)
	}

	/// True when there are no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Nodes of one type, in snapshot order.
	pub fn nodes_of(&self, kind: NodeType) -> impl Iterator<Item = &GraphNode> {
		self.nodes.iter().filter(move |n| n.kind == kind)
	}
}
