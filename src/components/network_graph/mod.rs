//! Collaboration-network visualization core: graph construction, the
//! ring-constrained force layout, selection/highlight state, the visual
//! encoding pipeline, and the canvas host component.

mod build;
mod component;
mod encode;
mod error;
mod interact;
mod layout;
mod render;
mod state;
mod types;

pub use build::{build, build_from_snapshot};
pub use component::NetworkGraphCanvas;
pub use encode::{DrawList, EdgeEncoding, NodeEncoding, draw_list, encode_edge, encode_node};
pub use error::InvalidGraphInput;
pub use interact::{InteractionState, PointerInput, TierSummary};
pub use layout::{LayoutConfig, LayoutEngine};
pub use state::NetworkState;
pub use types::{
	AuthorRecord, CollabEdge, CollabTier, NetworkGraph, NetworkSnapshot, OutputRecord,
	ResearcherNode,
};
