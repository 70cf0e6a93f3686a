//! Graph visibility, traversal and timeline engine.
//!
//! Pure data transformations from a [`GraphSnapshot`] plus user state to the
//! nodes and links the canvas should draw. Nothing here touches the DOM.

pub mod adjacency;
pub mod emphasis;
pub mod explorer;
pub mod loader;
pub mod model;
pub mod scenarios;
pub mod timeline;
pub mod traversal;
pub mod validate;
pub mod visibility;

pub use adjacency::AdjacencyMap;
pub use emphasis::{EmphasisConfig, FocusScope, LinkTier, NodeEmphasis};
pub use explorer::{Action, Explorer, ExplorerState, ExplorerView, IndexedGraph, ViewLink, ViewNode};
pub use loader::{LoadError, from_json};
pub use model::{GraphLink, GraphNode, GraphSnapshot, LinkWeight, NodeType, RiskTier, Timestamp};
pub use timeline::{TimeBounds, TimelineReach, propagate};
pub use traversal::{connected_component, direct_neighbors};
pub use validate::{DatasetIssue, validate};
pub use visibility::{TypeFilters, VisibleGraph, filter_visible};
