//! Selection, hover, highlight and search state.
//!
//! Two states only: idle, or exactly one node selected. The highlight sets
//! are a pure function of (graph, selected id); transitions between two
//! selections swap the sets atomically.

use std::collections::HashSet;

use super::types::{CollabTier, NetworkGraph, ResearcherNode};

/// Normalized pointer input from the host adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PointerInput {
	NodeActivate(String),
	BackgroundActivate,
}

/// Tier membership counts shown when the lead is selected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TierSummary {
	pub direct: usize,
	pub secondary: usize,
}

#[derive(Clone, Debug, Default)]
pub struct InteractionState {
	selected: Option<String>,
	highlight_nodes: HashSet<String>,
	/// Indices into `NetworkGraph::edges`.
	highlight_edges: HashSet<usize>,
	/// Sets of the last selection, kept while the emphasis blend fades out so
	/// deselection does not snap everything to the dimmed encoding.
	prev_highlight_nodes: HashSet<String>,
	prev_highlight_edges: HashSet<usize>,
	tier_summary: Option<TierSummary>,
	hovered: Option<String>,
	query: String,
	/// Eased 0..1 emphasis blend, driven toward 1 while a selection exists.
	emphasis_t: f64,
}

impl InteractionState {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn selected_id(&self) -> Option<&str> {
		self.selected.as_deref()
	}

	pub fn has_selection(&self) -> bool {
		self.selected.is_some()
	}

	/// True for the current highlight set, or the previous one while its
	/// fade-out is still in flight.
	pub fn is_node_highlighted(&self, id: &str) -> bool {
		self.highlight_nodes.contains(id) || self.prev_highlight_nodes.contains(id)
	}

	pub fn is_edge_highlighted(&self, edge_idx: usize) -> bool {
		self.highlight_edges.contains(&edge_idx) || self.prev_highlight_edges.contains(&edge_idx)
	}

	pub fn tier_summary(&self) -> Option<TierSummary> {
		self.tier_summary
	}

	/// (highlighted nodes, highlighted edges), for external summary display.
	pub fn highlight_counts(&self) -> (usize, usize) {
		(self.highlight_nodes.len(), self.highlight_edges.len())
	}

	pub fn hovered(&self) -> Option<&str> {
		self.hovered.as_deref()
	}

	pub fn set_hovered(&mut self, id: Option<String>) {
		self.hovered = id;
	}

	pub fn emphasis(&self) -> f64 {
		self.emphasis_t
	}

	/// Apply one normalized pointer event against the current graph.
	pub fn apply(&mut self, graph: &NetworkGraph, input: PointerInput) {
		match input {
			PointerInput::BackgroundActivate => self.clear_selection(),
			PointerInput::NodeActivate(id) => {
				if self.selected.as_deref() == Some(id.as_str()) {
					// Re-activating the selection toggles back to idle.
					self.clear_selection();
					return;
				}
				if graph.index_of(&id).is_none() {
					return;
				}
				// Compute the replacement sets first, then swap, so an
				// A -> B transition never exposes an empty highlight set.
				let (nodes, edges, summary) = highlight_sets(graph, &id);
				self.selected = Some(id);
				self.highlight_nodes = nodes;
				self.highlight_edges = edges;
				self.prev_highlight_nodes.clear();
				self.prev_highlight_edges.clear();
				self.tier_summary = summary;
			}
		}
	}

	fn clear_selection(&mut self) {
		// The cleared sets stick around for the fade-out; advance_emphasis
		// drops them once the blend reaches zero.
		self.prev_highlight_nodes = std::mem::take(&mut self.highlight_nodes);
		self.prev_highlight_edges = std::mem::take(&mut self.highlight_edges);
		self.selected = None;
		self.tier_summary = None;
	}

	pub fn query(&self) -> &str {
		&self.query
	}

	pub fn set_query(&mut self, query: &str) {
		self.query = query.to_string();
	}

	/// Live search over name, institution, specialization and role;
	/// case-insensitive substring match. An empty query matches nothing.
	pub fn matches<'g>(&self, graph: &'g NetworkGraph) -> Vec<&'g ResearcherNode> {
		let needle = self.query.trim().to_lowercase();
		if needle.is_empty() {
			return Vec::new();
		}
		graph
			.nodes
			.iter()
			.filter(|n| {
				[&n.name, &n.institution, &n.specialization, &n.role]
					.iter()
					.any(|field| field.to_lowercase().contains(&needle))
			})
			.collect()
	}

	/// Ease the emphasis blend toward 1 while selected, back toward 0 after.
	pub fn advance_emphasis(&mut self, dt: f64) {
		let (target, speed) = if self.selected.is_some() {
			(1.0, 4.0)
		} else {
			(0.0, 3.0)
		};
		self.emphasis_t += (target - self.emphasis_t) * (speed * dt).min(1.0);
		if self.selected.is_none() && self.emphasis_t < 0.01 {
			self.emphasis_t = 0.0;
			self.prev_highlight_nodes.clear();
			self.prev_highlight_edges.clear();
		}
	}

	/// Drop everything; used when the snapshot is replaced wholesale.
	pub fn reset(&mut self) {
		*self = Self::default();
	}
}

/// Pure highlight computation for one candidate selection.
fn highlight_sets(
	graph: &NetworkGraph,
	id: &str,
) -> (HashSet<String>, HashSet<usize>, Option<TierSummary>) {
	let mut nodes = HashSet::new();
	let mut edges = HashSet::new();
	nodes.insert(id.to_string());
	for (idx, edge) in graph.edges.iter().enumerate() {
		if edge.source == id {
			edges.insert(idx);
			nodes.insert(edge.target.clone());
		} else if edge.target == id {
			edges.insert(idx);
			nodes.insert(edge.source.clone());
		}
	}
	let summary = graph.node_by_id(id).filter(|n| n.is_lead).map(|_| TierSummary {
		direct: graph.tier_count(CollabTier::Direct),
		secondary: graph.tier_count(CollabTier::Secondary),
	});
	(nodes, edges, summary)
}
