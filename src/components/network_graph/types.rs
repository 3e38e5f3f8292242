//! Core graph records and the raw snapshot shape the host fetches.

use std::collections::HashMap;

use serde::Deserialize;

/// Smallest display radius a researcher node can have.
pub const MIN_NODE_SIZE: f64 = 20.0;
/// Largest display radius a researcher node can have.
pub const MAX_NODE_SIZE: f64 = 50.0;

/// Collaboration distance from the lead investigator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollabTier {
	/// The lead investigator itself.
	Lead,
	/// Co-authored with the lead directly.
	Direct,
	/// Co-authored with a direct collaborator, but not the lead.
	Secondary,
	/// No collaboration path to the lead within two hops.
	Unrelated,
}

/// One researcher in the collaboration network.
#[derive(Clone, Debug)]
pub struct ResearcherNode {
	pub id: String,
	pub name: String,
	pub institution: String,
	pub specialization: String,
	pub role: String,
	pub is_lead: bool,
	pub tier: CollabTier,
	pub publications_count: u32,
	pub manuscripts_count: u32,
	/// Unconfirmed invitation; rendering cue only, layout ignores it.
	pub is_pending: bool,
	/// Layout coordinate. NaN until the layout engine has placed the node;
	/// the draw list skips non-finite positions.
	pub x: f64,
	pub y: f64,
	/// Pinned coordinate. While set, the layout engine must not move the node.
	pub fx: Option<f64>,
	pub fy: Option<f64>,
}

impl ResearcherNode {
	pub fn total_outputs(&self) -> u32 {
		self.publications_count + self.manuscripts_count
	}

	/// Display radius derived from output volume, clamped to [20, 50].
	pub fn size(&self) -> f64 {
		(MIN_NODE_SIZE + f64::from(self.total_outputs()) * 2.0).clamp(MIN_NODE_SIZE, MAX_NODE_SIZE)
	}

	pub fn has_position(&self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}
}

/// One unique unordered collaboration pair.
#[derive(Clone, Debug)]
pub struct CollabEdge {
	pub source: String,
	pub target: String,
	/// Indices into `NetworkGraph::nodes`, resolved at build time so the
	/// simulation and draw loops avoid id lookups.
	pub source_idx: usize,
	pub target_idx: usize,
	/// Mean log output volume of the endpoints, clamped to [1, 6].
	pub strength: f64,
	pub is_lead_link: bool,
	/// Outputs co-authored by both endpoints, for detail display.
	pub shared_output_ids: Vec<String>,
}

/// The fully-derived node/edge graph for one snapshot.
#[derive(Clone, Debug, Default)]
pub struct NetworkGraph {
	pub nodes: Vec<ResearcherNode>,
	pub edges: Vec<CollabEdge>,
	lead: usize,
	index: HashMap<String, usize>,
}

impl NetworkGraph {
	pub(crate) fn new(nodes: Vec<ResearcherNode>, edges: Vec<CollabEdge>, lead: usize) -> Self {
		let index = nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.clone(), i))
			.collect();
		Self {
			nodes,
			edges,
			lead,
			index,
		}
	}

	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	pub fn node_by_id(&self, id: &str) -> Option<&ResearcherNode> {
		self.index_of(id).map(|i| &self.nodes[i])
	}

	pub fn lead_index(&self) -> usize {
		self.lead
	}

	pub fn lead_node(&self) -> &ResearcherNode {
		&self.nodes[self.lead]
	}

	/// Node indices connected to `idx` by at least one edge.
	pub fn neighbors_of(&self, idx: usize) -> Vec<usize> {
		let mut out = Vec::new();
		for edge in &self.edges {
			if edge.source_idx == idx {
				out.push(edge.target_idx);
			} else if edge.target_idx == idx {
				out.push(edge.source_idx);
			}
		}
		out
	}

	/// Count of nodes in the given tier.
	pub fn tier_count(&self, tier: CollabTier) -> usize {
		self.nodes.iter().filter(|n| n.tier == tier).count()
	}
}

/// Raw author record as fetched by the host.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRecord {
	pub id: String,
	pub name: String,
	#[serde(default)]
	pub institution: String,
	#[serde(default)]
	pub specialization: String,
	#[serde(default)]
	pub role: String,
	/// Ids of direct collaborators.
	#[serde(default)]
	pub collaborations: Vec<String>,
	#[serde(default)]
	pub is_pending: bool,
}

/// Raw publication or manuscript record.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRecord {
	pub id: String,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub co_author_ids: Vec<String>,
}

/// The snapshot consumed once per session; replacing it rebuilds everything.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSnapshot {
	pub authors: Vec<AuthorRecord>,
	#[serde(default)]
	pub publications: Vec<OutputRecord>,
	#[serde(default)]
	pub manuscripts: Vec<OutputRecord>,
	pub lead_investigator_id: String,
}
