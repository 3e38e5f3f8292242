//! Aggregate canvas state: layout engine, interaction machine, viewport
//! transform and pointer bookkeeping, owned by the component and advanced
//! once per animation frame.

use super::build::build_from_snapshot;
use super::encode::{self, DrawList};
use super::error::InvalidGraphInput;
use super::interact::{InteractionState, PointerInput};
use super::layout::{LayoutConfig, LayoutEngine};
use super::types::{NetworkGraph, NetworkSnapshot, ResearcherNode};

/// Extra world-space slack around a node when hit-testing the pointer.
pub const HIT_MARGIN: f64 = 4.0;

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_id: Option<String>,
	pub start_x: f64,
	pub start_y: f64,
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
	pub moved: bool,
}

pub struct NetworkState {
	pub layout: LayoutEngine,
	pub interact: InteractionState,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
}

impl NetworkState {
	/// Build the graph from a snapshot and centre the viewport on the lead.
	pub fn new(
		snapshot: &NetworkSnapshot,
		width: f64,
		height: f64,
	) -> Result<Self, InvalidGraphInput> {
		let graph = build_from_snapshot(snapshot)?;
		Ok(Self {
			layout: LayoutEngine::new(graph, LayoutConfig::default()),
			interact: InteractionState::new(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			width,
			height,
			animation_running: true,
		})
	}

	pub fn graph(&self) -> &NetworkGraph {
		self.layout.graph()
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node under a screen position, nodes without a finite position
	/// excluded. Later nodes win ties, matching draw order.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<String> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		for node in &self.graph().nodes {
			if !node.has_position() {
				continue;
			}
			let (dx, dy) = (node.x - gx, node.y - gy);
			if (dx * dx + dy * dy).sqrt() < node.size() + HIT_MARGIN {
				found = Some(node.id.clone());
			}
		}
		found
	}

	/// One normalized pointer event, applied synchronously.
	pub fn pointer(&mut self, input: PointerInput) {
		self.interact.apply(self.layout.graph(), input);
	}

	/// Advance one frame: layout tick plus emphasis easing.
	pub fn tick(&mut self, dt: f64) {
		self.layout.tick();
		self.interact.advance_emphasis(dt);
	}

	/// The frame's ordered draw list at the current zoom.
	pub fn frame(&self) -> DrawList {
		encode::draw_list(self.graph(), &self.interact, self.transform.k)
	}

	/// Full record of the current selection, for an external detail panel.
	pub fn selected_detail(&self) -> Option<&ResearcherNode> {
		self.interact
			.selected_id()
			.and_then(|id| self.graph().node_by_id(id))
	}

	/// Toggle the pending flag on a collaborator (external confirmation flow).
	pub fn set_pending(&mut self, id: &str, pending: bool) {
		if let Some(idx) = self.layout.graph().index_of(id) {
			self.layout.graph_mut().nodes[idx].is_pending = pending;
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}
