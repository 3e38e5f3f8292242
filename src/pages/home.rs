use leptos::prelude::*;

use crate::components::network_graph::{
	AuthorRecord, NetworkGraphCanvas, NetworkSnapshot, OutputRecord, ResearcherNode,
};

/// Sample research network: one lead, a few direct and secondary
/// collaborators, a pending invitation, and an unlinked researcher.
fn sample_snapshot() -> NetworkSnapshot {
	let author = |id: &str,
	              name: &str,
	              institution: &str,
	              specialization: &str,
	              role: &str,
	              collaborations: &[&str],
	              pending: bool| AuthorRecord {
		id: id.into(),
		name: name.into(),
		institution: institution.into(),
		specialization: specialization.into(),
		role: role.into(),
		collaborations: collaborations.iter().map(|s| s.to_string()).collect(),
		is_pending: pending,
	};
	let output = |id: &str, title: &str, co_authors: &[&str]| OutputRecord {
		id: id.into(),
		title: title.into(),
		co_author_ids: co_authors.iter().map(|s| s.to_string()).collect(),
	};

	NetworkSnapshot {
		authors: vec![
			author(
				"r1",
				"Lena Ortiz",
				"University College London",
				"Computational Genomics",
				"Principal Investigator",
				&["r2", "r3", "r4"],
				false,
			),
			author(
				"r2",
				"Dev Raman",
				"Karolinska Institute",
				"Proteomics",
				"Senior Researcher",
				&["r1", "r5"],
				false,
			),
			author(
				"r3",
				"Mara Chen",
				"ETH Zurich",
				"Machine Learning",
				"Postdoc",
				&["r1", "r6"],
				false,
			),
			author(
				"r4",
				"Iris Kato",
				"University of Tokyo",
				"Epidemiology",
				"Professor",
				&["r1"],
				true,
			),
			author(
				"r5",
				"Omar Said",
				"Cairo University",
				"Biostatistics",
				"Lecturer",
				&["r2"],
				false,
			),
			author(
				"r6",
				"Ana Lima",
				"University of Sao Paulo",
				"Systems Biology",
				"PhD Student",
				&["r3"],
				false,
			),
			author(
				"r7",
				"Noah Berg",
				"MIT",
				"Bioinformatics",
				"Researcher",
				&[],
				false,
			),
		],
		publications: vec![
			output("p1", "Variant calling at scale", &["r1", "r2", "r3"]),
			output("p2", "Proteome atlases", &["r2", "r5"]),
			output("p3", "Graph models of regulation", &["r1", "r3", "r6"]),
			output("p4", "Cohort drift", &["r4"]),
		],
		manuscripts: vec![
			output("m1", "Pan-cancer splicing", &["r1", "r2"]),
			output("m2", "Pipeline reproducibility", &["r3", "r6"]),
		],
		lead_investigator_id: "r1".into(),
	}
}

/// Default Home Page: the network canvas with a search box and detail panel.
#[component]
pub fn Home() -> impl IntoView {
	let snapshot = Signal::derive(sample_snapshot);
	let (query, set_query) = signal(String::new());
	let (matches, set_matches) = signal(Vec::<ResearcherNode>::new());
	let (activate, set_activate) = signal(None::<String>);
	let (selected, set_selected) = signal(None::<ResearcherNode>);
	let (highlight_counts, set_highlight_counts) = signal((0usize, 0usize));

	let on_select = Callback::new(move |detail: Option<ResearcherNode>| {
		set_selected.set(detail);
	});
	let on_highlight = Callback::new(move |counts: (usize, usize)| {
		set_highlight_counts.set(counts);
	});
	let on_matches = Callback::new(move |hits: Vec<ResearcherNode>| {
		set_matches.set(hits);
	});

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<NetworkGraphCanvas
					data=snapshot
					query=query
					activate=activate
					fullscreen=true
					on_select=on_select
					on_highlight=on_highlight
					on_matches=on_matches
				/>
				<div class="graph-overlay">
					<h1>"Collaboration Network"</h1>
					<p class="subtitle">
						"Click a researcher to focus their collaborations. Scroll to zoom, drag the background to pan."
					</p>
					<input
						type="search"
						placeholder="Search name, institution, field..."
						prop:value=query
						on:input=move |ev| set_query.set(event_target_value(&ev))
					/>
					{move || {
						let hits = matches.get();
						(!query.get().trim().is_empty())
							.then(|| {
								view! {
									<ul class="match-list">
										{if hits.is_empty() {
											view! { <li class="match-empty">"No researchers found"</li> }
												.into_any()
										} else {
											hits.into_iter()
												.map(|node| {
													let id = node.id.clone();
													view! {
														<li>
															<button on:click=move |_| {
																set_activate.set(Some(id.clone()))
															}>
																{node.name.clone()} " · "
																{node.institution.clone()}
															</button>
														</li>
													}
												})
												.collect_view()
												.into_any()
										}}
									</ul>
								}
							})
					}}
					{move || {
						let (nodes, edges) = highlight_counts.get();
						(nodes > 0)
							.then(|| {
								view! {
									<p class="summary">
										{format!("{nodes} researchers, {edges} collaborations highlighted")}
									</p>
								}
							})
					}}
				</div>
				{move || {
					selected
						.get()
						.map(|node| {
							view! {
								<div class="detail-panel">
									<h2>{node.name.clone()}</h2>
									<p>{node.role.clone()} " · " {node.institution.clone()}</p>
									<p>{node.specialization.clone()}</p>
									<p>
										{format!(
											"{} publications · {} manuscripts",
											node.publications_count,
											node.manuscripts_count,
										)}
									</p>
								</div>
							}
						})
				}}
			</div>
		</ErrorBoundary>
	}
}
