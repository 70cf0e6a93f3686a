//! JSON snapshot loading.
//!
//! Link endpoints arrive either as a bare id or as an object carrying `id`
//! (the shape a force layout leaves behind after it resolves links). Both are
//! normalized to a plain id here so nothing downstream branches on shape.

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use super::model::{GraphLink, GraphNode, GraphSnapshot};

/// Failure to read a snapshot document.
#[derive(Debug, Error)]
pub enum LoadError {
	/// The document is not valid snapshot JSON.
	#[error("invalid snapshot JSON: {0}")]
	Json(#[from] serde_json::Error),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Endpoint {
	Id(String),
	Node { id: String },
}

pub(crate) fn endpoint_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Endpoint::deserialize(deserializer)? {
		Endpoint::Id(id) | Endpoint::Node { id } => id,
	})
}

#[derive(Deserialize)]
struct RawSnapshot {
	#[serde(default)]
	nodes: Vec<GraphNode>,
	#[serde(default)]
	links: Vec<GraphLink>,
}

/// Parse a `{ "nodes": [...], "links": [...] }` document.
pub fn from_json(text: &str) -> Result<GraphSnapshot, LoadError> {
	let raw: RawSnapshot = serde_json::from_str(text)?;
	Ok(GraphSnapshot::new(raw.nodes, raw.links))
}
