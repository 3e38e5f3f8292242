//! Graph construction: raw snapshot records in, fully-derived graph out.

use std::collections::{HashMap, HashSet};

use log::debug;

use super::error::InvalidGraphInput;
use super::types::{
	AuthorRecord, CollabEdge, CollabTier, NetworkGraph, NetworkSnapshot, OutputRecord,
	ResearcherNode,
};

/// Build the collaboration graph from raw records.
///
/// Tier assignment is a two-hop walk from the lead: members of the lead's own
/// `collaborations` list are `Direct`; anyone adjacent to a direct collaborator
/// (over the symmetrized adjacency) who is not already lead/direct is
/// `Secondary`; the rest are `Unrelated`. Collaborator ids that don't resolve
/// to an author are dropped, as are self-loops and duplicate unordered pairs.
pub fn build(
	authors: &[AuthorRecord],
	publications: &[OutputRecord],
	manuscripts: &[OutputRecord],
	lead_id: &str,
) -> Result<NetworkGraph, InvalidGraphInput> {
	if authors.is_empty() {
		return Err(InvalidGraphInput::EmptyAuthors);
	}
	let index: HashMap<&str, usize> = authors
		.iter()
		.enumerate()
		.map(|(i, a)| (a.id.as_str(), i))
		.collect();
	let lead = *index
		.get(lead_id)
		.ok_or_else(|| InvalidGraphInput::UnknownLead(lead_id.to_string()))?;

	let n = authors.len();
	let mut pub_counts = vec![0u32; n];
	let mut ms_counts = vec![0u32; n];
	for output in publications {
		for id in &output.co_author_ids {
			// Unknown co-author ids are an expected data-quality gap.
			if let Some(&i) = index.get(id.as_str()) {
				pub_counts[i] += 1;
			}
		}
	}
	for output in manuscripts {
		for id in &output.co_author_ids {
			if let Some(&i) = index.get(id.as_str()) {
				ms_counts[i] += 1;
			}
		}
	}

	// Symmetrized adjacency over every author's collaborator list.
	let mut adjacency: Vec<HashSet<usize>> = vec![HashSet::new(); n];
	for (i, author) in authors.iter().enumerate() {
		for id in &author.collaborations {
			if let Some(&j) = index.get(id.as_str()) {
				if j != i {
					adjacency[i].insert(j);
					adjacency[j].insert(i);
				}
			}
		}
	}

	// Direct tier comes from the lead's own list, not the symmetrized set.
	let direct: HashSet<usize> = authors[lead]
		.collaborations
		.iter()
		.filter_map(|id| index.get(id.as_str()).copied())
		.filter(|&i| i != lead)
		.collect();
	let mut secondary: HashSet<usize> = HashSet::new();
	for &d in &direct {
		for &s in &adjacency[d] {
			if s != lead && !direct.contains(&s) {
				secondary.insert(s);
			}
		}
	}

	let nodes: Vec<ResearcherNode> = authors
		.iter()
		.enumerate()
		.map(|(i, a)| {
			let tier = if i == lead {
				CollabTier::Lead
			} else if direct.contains(&i) {
				CollabTier::Direct
			} else if secondary.contains(&i) {
				CollabTier::Secondary
			} else {
				CollabTier::Unrelated
			};
			ResearcherNode {
				id: a.id.clone(),
				name: a.name.clone(),
				institution: a.institution.clone(),
				specialization: a.specialization.clone(),
				role: a.role.clone(),
				is_lead: i == lead,
				tier,
				publications_count: pub_counts[i],
				manuscripts_count: ms_counts[i],
				is_pending: a.is_pending,
				x: f64::NAN,
				y: f64::NAN,
				fx: None,
				fy: None,
			}
		})
		.collect();

	let mut edges = Vec::new();
	let mut seen: HashSet<(usize, usize)> = HashSet::new();
	for (i, author) in authors.iter().enumerate() {
		for id in &author.collaborations {
			let Some(&j) = index.get(id.as_str()) else {
				continue;
			};
			if j == i {
				continue;
			}
			let key = (i.min(j), i.max(j));
			if !seen.insert(key) {
				continue;
			}
			let (src_outputs, tgt_outputs) = (
				f64::from(nodes[i].total_outputs()),
				f64::from(nodes[j].total_outputs()),
			);
			let strength =
				((src_outputs + 1.0).ln() + (tgt_outputs + 1.0).ln()) / 2.0;
			edges.push(CollabEdge {
				source: nodes[i].id.clone(),
				target: nodes[j].id.clone(),
				source_idx: i,
				target_idx: j,
				strength: strength.clamp(1.0, 6.0),
				is_lead_link: i == lead || j == lead,
				shared_output_ids: shared_outputs(
					publications,
					manuscripts,
					&nodes[i].id,
					&nodes[j].id,
				),
			});
		}
	}

	debug!(
		"built collaboration graph: {} nodes, {} edges, lead `{}`",
		nodes.len(),
		edges.len(),
		lead_id
	);
	Ok(NetworkGraph::new(nodes, edges, lead))
}

/// Convenience wrapper over [`build`] for the fetched snapshot shape.
pub fn build_from_snapshot(snapshot: &NetworkSnapshot) -> Result<NetworkGraph, InvalidGraphInput> {
	build(
		&snapshot.authors,
		&snapshot.publications,
		&snapshot.manuscripts,
		&snapshot.lead_investigator_id,
	)
}

fn shared_outputs(
	publications: &[OutputRecord],
	manuscripts: &[OutputRecord],
	a: &str,
	b: &str,
) -> Vec<String> {
	publications
		.iter()
		.chain(manuscripts)
		.filter(|o| {
			o.co_author_ids.iter().any(|id| id == a) && o.co_author_ids.iter().any(|id| id == b)
		})
		.map(|o| o.id.clone())
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn author(id: &str, collaborations: &[&str]) -> AuthorRecord {
		AuthorRecord {
			id: id.into(),
			name: format!("Dr. {id}"),
			institution: String::new(),
			specialization: String::new(),
			role: String::new(),
			collaborations: collaborations.iter().map(|s| s.to_string()).collect(),
			is_pending: false,
		}
	}

	fn output(id: &str, co_authors: &[&str]) -> OutputRecord {
		OutputRecord {
			id: id.into(),
			title: String::new(),
			co_author_ids: co_authors.iter().map(|s| s.to_string()).collect(),
		}
	}

	#[test]
	fn empty_author_list_is_rejected() {
		let err = build(&[], &[], &[], "l").unwrap_err();
		assert_eq!(err, InvalidGraphInput::EmptyAuthors);
	}

	#[test]
	fn unknown_lead_is_rejected() {
		let authors = [author("a", &[])];
		let err = build(&authors, &[], &[], "missing").unwrap_err();
		assert_eq!(err, InvalidGraphInput::UnknownLead("missing".into()));
	}

	#[test]
	fn single_direct_collaborator() {
		// Lead L plus author D whose collaborations list the lead.
		let authors = [author("l", &["d"]), author("d", &["l"])];
		let graph = build(&authors, &[], &[], "l").unwrap();

		assert_eq!(graph.node_by_id("d").unwrap().tier, CollabTier::Direct);
		assert_eq!(graph.edges.len(), 1);
		assert!(graph.edges[0].is_lead_link);
	}

	#[test]
	fn two_hop_collaborator_is_secondary() {
		// S reaches the lead only through D.
		let authors = [
			author("l", &["d"]),
			author("d", &["l", "s"]),
			author("s", &["d"]),
		];
		let graph = build(&authors, &[], &[], "l").unwrap();
		assert_eq!(graph.node_by_id("s").unwrap().tier, CollabTier::Secondary);
	}

	#[test]
	fn unreached_author_is_unrelated() {
		let authors = [author("l", &[]), author("x", &[])];
		let graph = build(&authors, &[], &[], "l").unwrap();
		assert_eq!(graph.node_by_id("x").unwrap().tier, CollabTier::Unrelated);
	}

	#[test]
	fn exactly_one_lead_tier_node() {
		let authors = [
			author("l", &["a", "b"]),
			author("a", &["l"]),
			author("b", &["l", "a"]),
		];
		let graph = build(&authors, &[], &[], "l").unwrap();
		let leads: Vec<_> = graph
			.nodes
			.iter()
			.filter(|n| n.tier == CollabTier::Lead)
			.collect();
		assert_eq!(leads.len(), 1);
		assert!(leads[0].is_lead);
		assert_eq!(leads[0].id, "l");
	}

	#[test]
	fn direct_tier_matches_lead_collaboration_list() {
		// `b` lists the lead but the lead does not list `b`; the edge exists
		// but `b` is not a direct collaborator.
		let authors = [author("l", &["a"]), author("a", &[]), author("b", &["l"])];
		let graph = build(&authors, &[], &[], "l").unwrap();
		assert_eq!(graph.node_by_id("a").unwrap().tier, CollabTier::Direct);
		assert_ne!(graph.node_by_id("b").unwrap().tier, CollabTier::Direct);
		assert!(graph.edges.iter().any(|e| {
			e.is_lead_link && (e.source == "b" || e.target == "b")
		}));
	}

	#[test]
	fn edges_deduplicate_unordered_pairs_and_drop_self_loops() {
		let authors = [
			author("l", &["a", "a", "l"]),
			author("a", &["l", "a"]),
		];
		let graph = build(&authors, &[], &[], "l").unwrap();
		assert_eq!(graph.edges.len(), 1);
		let mut keys: Vec<(String, String)> = graph
			.edges
			.iter()
			.map(|e| {
				let (a, b) = (e.source.clone(), e.target.clone());
				if a < b { (a, b) } else { (b, a) }
			})
			.collect();
		let before = keys.len();
		keys.sort();
		keys.dedup();
		assert_eq!(keys.len(), before);
		assert!(graph.edges.iter().all(|e| e.source != e.target));
	}

	#[test]
	fn unknown_collaborator_ids_are_dropped() {
		let authors = [author("l", &["ghost", "a"]), author("a", &["l"])];
		let graph = build(&authors, &[], &[], "l").unwrap();
		assert_eq!(graph.edges.len(), 1);
		assert!(graph.node_by_id("ghost").is_none());
	}

	#[test]
	fn output_counts_and_shared_ids() {
		let authors = [author("l", &["a"]), author("a", &["l"])];
		let pubs = [output("p1", &["l", "a"]), output("p2", &["l"])];
		let mss = [output("m1", &["a", "l"]), output("m2", &["ghost"])];
		let graph = build(&authors, &pubs, &mss, "l").unwrap();

		let lead = graph.node_by_id("l").unwrap();
		assert_eq!(lead.publications_count, 2);
		assert_eq!(lead.manuscripts_count, 1);
		assert_eq!(lead.total_outputs(), 3);

		let edge = &graph.edges[0];
		assert_eq!(edge.shared_output_ids, vec!["p1", "m1"]);
	}

	#[test]
	fn strength_stays_within_bounds() {
		let authors = [author("l", &["a"]), author("a", &["l"])];
		// Zero outputs on both ends: raw mean-log is 0, clamped up to 1.
		let graph = build(&authors, &[], &[], "l").unwrap();
		assert_eq!(graph.edges[0].strength, 1.0);

		// Huge output volume clamps down to 6.
		let pubs: Vec<OutputRecord> = (0..2000)
			.map(|i| output(&format!("p{i}"), &["l", "a"]))
			.collect();
		let graph = build(&authors, &pubs, &[], "l").unwrap();
		assert_eq!(graph.edges[0].strength, 6.0);
	}

	#[test]
	fn build_is_idempotent() {
		let authors = [
			author("l", &["a", "b"]),
			author("a", &["l", "c"]),
			author("b", &["l"]),
			author("c", &["a"]),
		];
		let pubs = [output("p1", &["l", "a", "b"])];
		let g1 = build(&authors, &pubs, &[], "l").unwrap();
		let g2 = build(&authors, &pubs, &[], "l").unwrap();

		assert_eq!(g1.nodes.len(), g2.nodes.len());
		assert_eq!(g1.edges.len(), g2.edges.len());
		for (a, b) in g1.nodes.iter().zip(&g2.nodes) {
			assert_eq!(a.id, b.id);
			assert_eq!(a.tier, b.tier);
			assert_eq!(a.total_outputs(), b.total_outputs());
			assert_eq!(a.size(), b.size());
		}
		for (a, b) in g1.edges.iter().zip(&g2.edges) {
			assert_eq!((&a.source, &a.target), (&b.source, &b.target));
			assert_eq!(a.strength, b.strength);
			assert_eq!(a.is_lead_link, b.is_lead_link);
			assert_eq!(a.shared_output_ids, b.shared_output_ids);
		}
	}

	#[test]
	fn coordinates_start_undefined() {
		let authors = [author("l", &[])];
		let graph = build(&authors, &[], &[], "l").unwrap();
		assert!(!graph.nodes[0].has_position());
		assert!(graph.nodes[0].fx.is_none());
	}
}
