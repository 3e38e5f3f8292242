//! Visual encoding: pure decisions about what to draw, no drawing.
//!
//! `encode_node`/`encode_edge` map a record plus the interaction snapshot to
//! colors, radii, opacities and label visibility; `draw_list` assembles the
//! per-frame ordered list the host adapter consumes, skipping anything with a
//! non-finite coordinate.

use super::interact::InteractionState;
use super::types::{CollabEdge, CollabTier, NetworkGraph, ResearcherNode};

/// Base fill per tier category. Selection changes emphasis, never category.
pub const COLOR_LEAD: &str = "#e63946";
pub const COLOR_DIRECT: &str = "#457b9d";
pub const COLOR_SECONDARY: &str = "#2a9d8f";
pub const COLOR_UNRELATED: &str = "#8d99ae";
pub const COLOR_EDGE: &str = "#64b4ff";
pub const COLOR_SELECTION_RING: &str = "#ffffff";

/// Absolute ceiling on the drawn radius, emphasis included.
pub const MAX_DRAW_RADIUS: f64 = 58.0;
/// Zoom level above which non-lead, non-selected labels appear.
pub const LABEL_ZOOM_THRESHOLD: f64 = 0.8;

const DIMMED_OPACITY: f64 = 0.15;
const HIGHLIGHT_OPACITY: f64 = 0.97;
const EDGE_BASE_OPACITY: f64 = 0.6;
const PENDING_FACTOR: f64 = 0.55;
const SELECTED_MULT: f64 = 1.35;
const NEIGHBOR_MULT: f64 = 1.15;

/// What to draw for one node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeEncoding {
	pub fill: &'static str,
	pub stroke: Option<&'static str>,
	pub stroke_width: f64,
	pub opacity: f64,
	pub radius: f64,
	/// Extra halo radius beyond `radius`; 0 disables the glow.
	pub glow: f64,
	pub show_label: bool,
}

/// What to draw for one edge.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeEncoding {
	pub color: &'static str,
	pub opacity: f64,
	pub width: f64,
}

/// One frame's worth of draw entries plus the host read-backs.
/// Edges first, then nodes ordered dim-to-emphasized so emphasis draws on top.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
	pub edges: Vec<(usize, EdgeEncoding)>,
	pub nodes: Vec<(usize, NodeEncoding)>,
}

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn tier_color(is_lead: bool, tier: CollabTier) -> &'static str {
	if is_lead {
		return COLOR_LEAD;
	}
	match tier {
		CollabTier::Lead => COLOR_LEAD,
		CollabTier::Direct => COLOR_DIRECT,
		CollabTier::Secondary => COLOR_SECONDARY,
		CollabTier::Unrelated => COLOR_UNRELATED,
	}
}

pub fn encode_node(node: &ResearcherNode, state: &InteractionState, zoom: f64) -> NodeEncoding {
	let t = ease_out_cubic(state.emphasis());
	let selected = state.selected_id() == Some(node.id.as_str());
	let highlighted = state.is_node_highlighted(&node.id);

	// Pending invitations are a standing cue, independent of selection.
	let base_opacity = if node.is_pending { PENDING_FACTOR } else { 1.0 };
	let opacity = if state.has_selection() || t > 0.0 {
		if highlighted || selected {
			base_opacity + (HIGHLIGHT_OPACITY - base_opacity) * t
		} else {
			base_opacity + (DIMMED_OPACITY - base_opacity) * t
		}
	} else {
		base_opacity
	};

	let target_mult = if selected {
		SELECTED_MULT
	} else if highlighted {
		NEIGHBOR_MULT
	} else {
		1.0
	};
	let mult = 1.0 + (target_mult - 1.0) * t;
	let radius = (node.size() * mult).min(MAX_DRAW_RADIUS);

	let glow = if selected {
		radius * 0.9 * t
	} else if highlighted && !node.is_lead {
		radius * 0.4 * t
	} else {
		0.0
	};

	NodeEncoding {
		fill: tier_color(node.is_lead, node.tier),
		stroke: if selected { Some(COLOR_SELECTION_RING) } else { None },
		stroke_width: if selected { 2.0 * t } else { 0.0 },
		opacity: opacity.clamp(0.0, 1.0),
		radius,
		glow,
		show_label: node.is_lead
			|| selected
			|| state.hovered() == Some(node.id.as_str())
			|| zoom >= LABEL_ZOOM_THRESHOLD,
	}
}

pub fn encode_edge(edge: &CollabEdge, edge_idx: usize, state: &InteractionState) -> EdgeEncoding {
	let t = ease_out_cubic(state.emphasis());
	let highlighted = state.is_edge_highlighted(edge_idx);

	// strength 1..6 maps to width 1.5..4.0
	let base_width = 1.0 + edge.strength * 0.5;
	let (opacity, width) = if highlighted {
		(
			EDGE_BASE_OPACITY + (HIGHLIGHT_OPACITY - EDGE_BASE_OPACITY) * t,
			base_width * (1.0 + 0.3 * t),
		)
	} else {
		(
			EDGE_BASE_OPACITY + (DIMMED_OPACITY - EDGE_BASE_OPACITY) * t,
			base_width * (1.0 - 0.2 * t),
		)
	};

	EdgeEncoding {
		color: COLOR_EDGE,
		opacity: opacity.clamp(0.0, 1.0),
		width,
	}
}

/// Assemble the ordered draw list for one frame. Nodes and edges whose
/// coordinates are not finite are omitted for this frame only.
pub fn draw_list(graph: &NetworkGraph, state: &InteractionState, zoom: f64) -> DrawList {
	let mut list = DrawList::default();

	for (idx, edge) in graph.edges.iter().enumerate() {
		let (a, b) = (&graph.nodes[edge.source_idx], &graph.nodes[edge.target_idx]);
		if !a.has_position() || !b.has_position() {
			continue;
		}
		list.edges.push((idx, encode_edge(edge, idx, state)));
	}

	let mut emphasized = Vec::new();
	for (idx, node) in graph.nodes.iter().enumerate() {
		if !node.has_position() {
			continue;
		}
		let encoding = encode_node(node, state, zoom);
		if state.is_node_highlighted(&node.id) {
			emphasized.push((idx, encoding));
		} else {
			list.nodes.push((idx, encoding));
		}
	}
	// Selected node last of all.
	emphasized.sort_by_key(|(idx, _)| state.selected_id() == Some(graph.nodes[*idx].id.as_str()));
	list.nodes.extend(emphasized);
	list
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network_graph::build;
	use crate::components::network_graph::interact::PointerInput;
	use crate::components::network_graph::layout::{LayoutConfig, LayoutEngine};
	use crate::components::network_graph::types::AuthorRecord;

	fn author(id: &str, collaborations: &[&str], pending: bool) -> AuthorRecord {
		AuthorRecord {
			id: id.into(),
			name: id.to_uppercase(),
			institution: String::new(),
			specialization: String::new(),
			role: String::new(),
			collaborations: collaborations.iter().map(|s| s.to_string()).collect(),
			is_pending: pending,
		}
	}

	fn placed_graph() -> NetworkGraph {
		let authors = [
			author("l", &["d1", "d2"], false),
			author("d1", &["l", "s1"], false),
			author("d2", &["l"], true),
			author("s1", &["d1"], false),
			author("x1", &[], false),
		];
		let graph = build(&authors, &[], &[], "l").unwrap();
		// Initial placement gives every node finite coordinates.
		let engine = LayoutEngine::new(graph, LayoutConfig::default());
		engine.graph().clone()
	}

	fn settled(state: &mut InteractionState) {
		for _ in 0..300 {
			state.advance_emphasis(1.0 / 60.0);
		}
	}

	#[test]
	fn color_follows_tier_category() {
		let g = placed_graph();
		let state = InteractionState::new();
		let enc = |id: &str| encode_node(g.node_by_id(id).unwrap(), &state, 1.0);
		assert_eq!(enc("l").fill, COLOR_LEAD);
		assert_eq!(enc("d1").fill, COLOR_DIRECT);
		assert_eq!(enc("s1").fill, COLOR_SECONDARY);
		assert_eq!(enc("x1").fill, COLOR_UNRELATED);
	}

	#[test]
	fn selection_does_not_change_the_category_color() {
		let g = placed_graph();
		let mut state = InteractionState::new();
		state.apply(&g, PointerInput::NodeActivate("d1".into()));
		settled(&mut state);
		let enc = encode_node(g.node_by_id("d1").unwrap(), &state, 1.0);
		assert_eq!(enc.fill, COLOR_DIRECT);
		assert!(enc.stroke.is_some());
	}

	#[test]
	fn no_selection_means_full_default_opacity() {
		let g = placed_graph();
		let state = InteractionState::new();
		let enc = encode_node(g.node_by_id("x1").unwrap(), &state, 1.0);
		assert_eq!(enc.opacity, 1.0);
	}

	#[test]
	fn pending_nodes_are_dimmed_without_any_selection() {
		let g = placed_graph();
		let state = InteractionState::new();
		let enc = encode_node(g.node_by_id("d2").unwrap(), &state, 1.0);
		assert!(enc.opacity < 1.0);
	}

	#[test]
	fn selection_dims_unrelated_and_brightens_highlighted() {
		let g = placed_graph();
		let mut state = InteractionState::new();
		state.apply(&g, PointerInput::NodeActivate("d1".into()));
		settled(&mut state);

		let dimmed = encode_node(g.node_by_id("x1").unwrap(), &state, 1.0);
		let bright = encode_node(g.node_by_id("s1").unwrap(), &state, 1.0);
		assert!(dimmed.opacity < 0.25);
		assert!(bright.opacity > 0.9);
	}

	#[test]
	fn deselection_fades_everything_back_to_default() {
		let g = placed_graph();
		let mut state = InteractionState::new();
		state.apply(&g, PointerInput::NodeActivate("d1".into()));
		settled(&mut state);
		state.apply(&g, PointerInput::BackgroundActivate);

		// One frame after deselection the former selection must still be
		// near its emphasized opacity, not snapped to the dimmed level.
		state.advance_emphasis(1.0 / 60.0);
		let former = encode_node(g.node_by_id("d1").unwrap(), &state, 1.0);
		assert!(former.opacity > 0.9);

		// Bystanders rise monotonically from dimmed back to the default.
		let mut last = encode_node(g.node_by_id("x1").unwrap(), &state, 1.0).opacity;
		for _ in 0..300 {
			state.advance_emphasis(1.0 / 60.0);
			let o = encode_node(g.node_by_id("x1").unwrap(), &state, 1.0).opacity;
			assert!(o >= last);
			last = o;
		}
		assert_eq!(last, 1.0);
		assert_eq!(
			encode_node(g.node_by_id("d1").unwrap(), &state, 1.0).opacity,
			1.0
		);
	}

	#[test]
	fn emphasis_multiplier_never_exceeds_the_radius_cap() {
		let authors = [author("l", &["d1"], false), author("d1", &["l"], false)];
		let mut graph = build(&authors, &[], &[], "l").unwrap();
		// Push the base size to the 50.0 cap.
		let idx = graph.index_of("d1").unwrap();
		graph.nodes[idx].publications_count = 40;
		graph.nodes[idx].x = 10.0;
		graph.nodes[idx].y = 10.0;

		let mut state = InteractionState::new();
		state.apply(&graph, PointerInput::NodeActivate("d1".into()));
		settled(&mut state);
		let enc = encode_node(&graph.nodes[idx], &state, 1.0);
		// 50 * 1.35 would be 67.5; the cap wins.
		assert!(enc.radius <= MAX_DRAW_RADIUS);
	}

	#[test]
	fn labels_for_lead_and_selection_regardless_of_zoom() {
		let g = placed_graph();
		let mut state = InteractionState::new();
		state.apply(&g, PointerInput::NodeActivate("s1".into()));
		settled(&mut state);

		let zoomed_out = 0.2;
		assert!(encode_node(g.lead_node(), &state, zoomed_out).show_label);
		assert!(encode_node(g.node_by_id("s1").unwrap(), &state, zoomed_out).show_label);
		assert!(!encode_node(g.node_by_id("x1").unwrap(), &state, zoomed_out).show_label);
		assert!(encode_node(g.node_by_id("x1").unwrap(), &state, 1.0).show_label);

		// Hover is a label cue too.
		state.set_hovered(Some("x1".into()));
		assert!(encode_node(g.node_by_id("x1").unwrap(), &state, zoomed_out).show_label);
	}

	#[test]
	fn edge_width_scales_with_strength() {
		let g = placed_graph();
		let state = InteractionState::new();
		let weak = EdgeEncoding {
			color: COLOR_EDGE,
			opacity: EDGE_BASE_OPACITY,
			width: 1.0 + 1.0 * 0.5,
		};
		assert_eq!(encode_edge(&g.edges[0], 0, &state), weak);
	}

	#[test]
	fn draw_list_omits_non_finite_nodes_and_their_edges() {
		let mut g = placed_graph();
		let poisoned = g.index_of("d1").unwrap();
		g.nodes[poisoned].x = f64::NAN;

		let state = InteractionState::new();
		let list = draw_list(&g, &state, 1.0);

		assert!(list.nodes.iter().all(|(idx, _)| *idx != poisoned));
		// Edges l-d1 and d1-s1 both touch the poisoned node.
		for (idx, _) in &list.edges {
			let e = &g.edges[*idx];
			assert!(e.source != "d1" && e.target != "d1");
		}
		// Everyone else still renders.
		assert_eq!(list.nodes.len(), g.nodes.len() - 1);
	}

	#[test]
	fn emphasized_nodes_draw_after_dimmed_ones() {
		let g = placed_graph();
		let mut state = InteractionState::new();
		state.apply(&g, PointerInput::NodeActivate("d1".into()));
		settled(&mut state);

		let list = draw_list(&g, &state, 1.0);
		let pos = |id: &str| {
			list.nodes
				.iter()
				.position(|(idx, _)| g.nodes[*idx].id == id)
				.unwrap()
		};
		assert!(pos("x1") < pos("s1"));
		// Selected node last.
		assert_eq!(pos("d1"), list.nodes.len() - 1);
	}
}
