//! Ring-constrained force simulation.
//!
//! The lead sits pinned at the origin; direct collaborators settle on an inner
//! ring, secondary on a middle ring, everyone else on an outer ring. Within a
//! ring the usual charge/spring forces are free to jitter nodes around, and a
//! radial pull keeps the ring structure from dissolving.

use std::collections::HashMap;
use std::f64::consts::TAU;

use super::types::{CollabTier, NetworkGraph};

/// Simulation tunables. The magnitudes are empirical; the orderings matter:
/// inner < middle < outer radius, and lead-link distance < default distance <
/// same-tier distance (same-tier peers compete for the most room).
#[derive(Clone, Debug)]
pub struct LayoutConfig {
	pub inner_radius: f64,
	pub middle_radius: f64,
	pub outer_radius: f64,
	/// Ticks before non-lead nodes are released from their initial pins.
	pub release_after_ticks: u32,
	/// Hard tick budget; the sim is a no-op once it is spent.
	pub max_ticks: u32,
	pub charge_strength: f64,
	pub lead_charge_multiplier: f64,
	pub link_spring: f64,
	pub lead_link_distance: f64,
	pub default_link_distance: f64,
	pub same_tier_distance: f64,
	pub radial_strength: f64,
	pub collision_margin: f64,
	pub collision_strength: f64,
	pub centering_strength: f64,
	pub damping: f64,
	pub max_speed: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			// 1 : 1.6 : 2.2
			inner_radius: 150.0,
			middle_radius: 240.0,
			outer_radius: 330.0,
			// ~2s of settling at 60fps
			release_after_ticks: 120,
			max_ticks: 1800,
			charge_strength: 30_000.0,
			lead_charge_multiplier: 2.0,
			link_spring: 0.02,
			lead_link_distance: 120.0,
			default_link_distance: 160.0,
			same_tier_distance: 200.0,
			radial_strength: 0.08,
			collision_margin: 6.0,
			collision_strength: 0.5,
			centering_strength: 0.005,
			damping: 0.85,
			max_speed: 18.0,
		}
	}
}

/// Owns the graph and all simulation state; the host's frame loop calls
/// [`LayoutEngine::tick`] once per animation frame.
pub struct LayoutEngine {
	graph: NetworkGraph,
	config: LayoutConfig,
	ticks: u32,
	/// Initial placement pins have been cleared.
	released: bool,
	/// Nodes pinned by the host via [`LayoutEngine::pin`]; the release tick
	/// only clears placement pins, never these.
	host_pinned: Vec<bool>,
	velocities: Vec<(f64, f64)>,
}

impl LayoutEngine {
	pub fn new(graph: NetworkGraph, config: LayoutConfig) -> Self {
		let n = graph.nodes.len();
		let mut engine = Self {
			graph,
			config,
			ticks: 0,
			released: false,
			host_pinned: vec![false; n],
			velocities: vec![(0.0, 0.0); n],
		};
		engine.place_initial();
		engine
	}

	pub fn graph(&self) -> &NetworkGraph {
		&self.graph
	}

	pub fn graph_mut(&mut self) -> &mut NetworkGraph {
		&mut self.graph
	}

	pub fn ticks(&self) -> u32 {
		self.ticks
	}

	pub fn config(&self) -> &LayoutConfig {
		&self.config
	}

	/// Target ring radius for a tier; the lead has no ring.
	pub fn ring_radius(&self, tier: CollabTier) -> f64 {
		match tier {
			CollabTier::Lead => 0.0,
			CollabTier::Direct => self.config.inner_radius,
			CollabTier::Secondary => self.config.middle_radius,
			CollabTier::Unrelated => self.config.outer_radius,
		}
	}

	/// Even angular subdivision per tier, pinned until the release tick.
	fn place_initial(&mut self) {
		let mut tier_counts: HashMap<CollabTier, usize> = HashMap::new();
		for node in &self.graph.nodes {
			if !node.is_lead {
				*tier_counts.entry(node.tier).or_insert(0) += 1;
			}
		}
		let mut placed: HashMap<CollabTier, usize> = HashMap::new();
		let radii = (
			self.config.inner_radius,
			self.config.middle_radius,
			self.config.outer_radius,
		);
		for node in &mut self.graph.nodes {
			if node.is_lead {
				node.x = 0.0;
				node.y = 0.0;
				node.fx = Some(0.0);
				node.fy = Some(0.0);
				continue;
			}
			let count = tier_counts[&node.tier];
			let slot = placed.entry(node.tier).or_insert(0);
			let angle = TAU * (*slot as f64) / (count as f64);
			*slot += 1;
			let radius = match node.tier {
				CollabTier::Lead => 0.0,
				CollabTier::Direct => radii.0,
				CollabTier::Secondary => radii.1,
				CollabTier::Unrelated => radii.2,
			};
			node.x = radius * angle.cos();
			node.y = radius * angle.sin();
			node.fx = Some(node.x);
			node.fy = Some(node.y);
		}
	}

	/// Pin a node (host drag). The node stops responding to forces until
	/// [`LayoutEngine::unpin`]; the release tick does not touch host pins.
	pub fn pin(&mut self, id: &str, x: f64, y: f64) {
		if let Some(i) = self.graph.index_of(id) {
			let node = &mut self.graph.nodes[i];
			node.fx = Some(x);
			node.fy = Some(y);
			node.x = x;
			node.y = y;
			self.host_pinned[i] = true;
			self.velocities[i] = (0.0, 0.0);
		}
	}

	/// Release a pinned node. Ignored for the lead, which stays at the origin
	/// for the lifetime of the layout.
	pub fn unpin(&mut self, id: &str) {
		if let Some(i) = self.graph.index_of(id) {
			if self.graph.nodes[i].is_lead {
				return;
			}
			self.host_pinned[i] = false;
			self.graph.nodes[i].fx = None;
			self.graph.nodes[i].fy = None;
		}
	}

	/// Advance the simulation one step.
	///
	/// Any node with a non-finite coordinate is excluded from force
	/// accumulation for this step, so one corrupt coordinate never spreads.
	pub fn tick(&mut self) {
		if self.ticks >= self.config.max_ticks {
			return;
		}
		self.ticks += 1;
		if !self.released && self.ticks >= self.config.release_after_ticks {
			self.released = true;
			for (i, node) in self.graph.nodes.iter_mut().enumerate() {
				if !node.is_lead && !self.host_pinned[i] {
					node.fx = None;
					node.fy = None;
				}
			}
		}

		let n = self.graph.nodes.len();
		let mut forces = vec![(0.0f64, 0.0f64); n];
		let cfg = &self.config;
		let nodes = &self.graph.nodes;

		// Charge repulsion, the lead pushing roughly twice as hard.
		for i in 0..n {
			if !nodes[i].has_position() {
				continue;
			}
			for j in (i + 1)..n {
				if !nodes[j].has_position() {
					continue;
				}
				let dx = nodes[j].x - nodes[i].x;
				let dy = nodes[j].y - nodes[i].y;
				let dist_sq = (dx * dx + dy * dy).max(1.0);
				let dist = dist_sq.sqrt();
				let mult = if nodes[i].is_lead || nodes[j].is_lead {
					cfg.lead_charge_multiplier
				} else {
					1.0
				};
				let f = cfg.charge_strength * mult / dist_sq;
				let (fx, fy) = (f * dx / dist, f * dy / dist);
				forces[i].0 -= fx;
				forces[i].1 -= fy;
				forces[j].0 += fx;
				forces[j].1 += fy;
			}
		}

		// Spring attraction toward a per-edge target distance.
		for edge in &self.graph.edges {
			let (i, j) = (edge.source_idx, edge.target_idx);
			if !nodes[i].has_position() || !nodes[j].has_position() {
				continue;
			}
			let target = if edge.is_lead_link {
				cfg.lead_link_distance
			} else if nodes[i].tier == nodes[j].tier {
				cfg.same_tier_distance
			} else {
				cfg.default_link_distance
			};
			let dx = nodes[j].x - nodes[i].x;
			let dy = nodes[j].y - nodes[i].y;
			let dist = (dx * dx + dy * dy).sqrt().max(1.0);
			let f = cfg.link_spring * (dist - target);
			let (fx, fy) = (f * dx / dist, f * dy / dist);
			forces[i].0 += fx;
			forces[i].1 += fy;
			forces[j].0 -= fx;
			forces[j].1 -= fy;
		}

		// Radial pull toward the tier ring, plus weak global centering.
		for (i, node) in nodes.iter().enumerate() {
			if !node.has_position() {
				continue;
			}
			if !node.is_lead {
				let ring = self.ring_radius(node.tier);
				let dist = (node.x * node.x + node.y * node.y).sqrt().max(1.0);
				let f = cfg.radial_strength * (ring - dist);
				forces[i].0 += f * node.x / dist;
				forces[i].1 += f * node.y / dist;
			}
			forces[i].0 -= cfg.centering_strength * node.x;
			forces[i].1 -= cfg.centering_strength * node.y;
		}

		// Collision: keep pairs at least (r_i + r_j + margin) apart.
		for i in 0..n {
			if !nodes[i].has_position() {
				continue;
			}
			for j in (i + 1)..n {
				if !nodes[j].has_position() {
					continue;
				}
				let min_sep = nodes[i].size() + nodes[j].size() + cfg.collision_margin;
				let dx = nodes[j].x - nodes[i].x;
				let dy = nodes[j].y - nodes[i].y;
				let dist = (dx * dx + dy * dy).sqrt().max(1.0);
				if dist >= min_sep {
					continue;
				}
				let push = cfg.collision_strength * (min_sep - dist);
				let (fx, fy) = (push * dx / dist, push * dy / dist);
				forces[i].0 -= fx;
				forces[i].1 -= fy;
				forces[j].0 += fx;
				forces[j].1 += fy;
			}
		}

		// Integrate. Pinned nodes snap to their pin; a non-finite force is
		// skipped rather than written into the node.
		for (i, node) in self.graph.nodes.iter_mut().enumerate() {
			if let (Some(fx), Some(fy)) = (node.fx, node.fy) {
				node.x = fx;
				node.y = fy;
				self.velocities[i] = (0.0, 0.0);
				continue;
			}
			let (fx, fy) = forces[i];
			if !fx.is_finite() || !fy.is_finite() {
				continue;
			}
			let vel = &mut self.velocities[i];
			vel.0 = (vel.0 + fx) * cfg.damping;
			vel.1 = (vel.1 + fy) * cfg.damping;
			let speed = (vel.0 * vel.0 + vel.1 * vel.1).sqrt();
			if speed > cfg.max_speed {
				vel.0 *= cfg.max_speed / speed;
				vel.1 *= cfg.max_speed / speed;
			}
			node.x += vel.0;
			node.y += vel.1;
		}
	}
}
