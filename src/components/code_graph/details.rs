use leptos::either::Either;
use leptos::prelude::*;
use serde_json::Value;

use super::style::{self, ImpactLevel};
use crate::graph::{Graph, Location, Result, compute_impact};

fn line_range(location: &Location) -> Option<String> {
	match (location.start_line, location.end_line) {
		(Some(start), Some(end)) => Some(format!("Lines {start}-{end}")),
		_ => None,
	}
}

/// Metadata value as shown in the panel; strings lose their quotes.
fn display_value(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}

/// Node name, or the raw id for ids the graph does not know.
fn display_name(graph: &Graph, id: &str) -> String {
	match graph.node(id) {
		Some(node) if !node.name.is_empty() => node.name.clone(),
		_ => id.to_string(),
	}
}

/// Names reached at each hop from `id`, nearest first. Empty hops are skipped.
fn impact_tiers(graph: &Graph, id: &str, max_hops: u32) -> Result<Vec<(u32, Vec<String>)>> {
	let impact = compute_impact(graph, id, max_hops)?;
	Ok((1..=max_hops)
		.map(|hops| {
			let names = impact
				.at_distance(hops)
				.into_iter()
				.map(|id| display_name(graph, id))
				.collect::<Vec<_>>();
			(hops, names)
		})
		.filter(|(_, names)| !names.is_empty())
		.collect())
}

fn id_list(
	graph: &Graph,
	selected: RwSignal<Option<String>>,
	ids: &[String],
	empty: &'static str,
) -> impl IntoView + use<> {
	if ids.is_empty() {
		return Either::Left(view! { <p class="dimmed">{empty}</p> });
	}
	let items = ids
		.iter()
		.map(|id| {
			let (id, label) = (id.clone(), display_name(graph, id));
			view! {
				<li>
					<a
						href="#"
						on:click=move |ev| {
							ev.prevent_default();
							selected.set(Some(id.clone()));
						}
					>
						{label}
					</a>
				</li>
			}
		})
		.collect_view();
	Either::Right(view! { <ul>{items}</ul> })
}

/// Side panel for the selected node: kind, complexity, location, both
/// dependency directions, analyzer metadata and, on request, the blast
/// radius. Clicking a listed id selects that node.
#[component]
pub fn NodeDetails(
	#[prop(into)] graph: Signal<Graph>,
	selected: RwSignal<Option<String>>,
	#[prop(default = 3)] max_hops: u32,
) -> impl IntoView {
	let (show_impact, set_show_impact) = signal(false);
	Effect::new(move |_| {
		selected.track();
		set_show_impact.set(false);
	});
	let node = Memo::new(move |_| {
		let id = selected.get()?;
		graph.with(|g| g.node(&id).cloned())
	});

	move || {
		node.get().map(|node| {
			let label = if node.name.is_empty() {
				node.id.clone()
			} else {
				node.name.clone()
			};
			let (dependencies, dependents) = graph.with(|g| {
				(
					id_list(g, selected, &node.dependency_ids, "No dependencies"),
					id_list(g, selected, &node.dependent_ids, "No dependents"),
				)
			});
			let metadata = (!node.metadata.is_empty()).then(|| {
				let rows = node
					.metadata
					.iter()
					.map(|(key, value)| view! { <dt>{key.clone()}</dt><dd>{display_value(value)}</dd> })
					.collect_view();
				view! { <h3>"Metadata"</h3><dl>{rows}</dl> }
			});

			let id = node.id.clone();
			let impact = move || {
				show_impact.get().then(|| {
					match graph.with(|g| impact_tiers(g, &id, max_hops)) {
						Ok(tiers) => Either::Left(view! {
							<ul class="impact">
								{tiers
									.into_iter()
									.map(|(hops, names)| {
										let color = ImpactLevel::from_distance(hops).color();
										view! {
											<li style=format!("color: {color}")>
												{format!("{hops} hop(s): {}", names.join(", "))}
											</li>
										}
									})
									.collect_view()}
							</ul>
						}),
						Err(err) => Either::Right(view! { <p class="error">{err.to_string()}</p> }),
					}
				})
			};

			view! {
				<aside class="node-details">
					<header>
						<h2>{label}</h2>
						<button class="close" on:click=move |_| selected.set(None)>
							"×"
						</button>
					</header>
					<div class="badges">
						<span
							class="badge"
							style=format!("background: {}", style::node_color(node.kind))
						>
							{node.kind.as_str()}
						</span>
						{node.complexity.map(|c| {
							view! {
								<span
									class="badge"
									style=format!("background: {}", style::complexity_color(c))
								>
									{format!("Complexity {c}")}
								</span>
							}
						})}
					</div>
					<h3>"Location"</h3>
					<p class="path">{node.location.file_path.clone()}</p>
					{line_range(&node.location).map(|lines| view! { <p>{lines}</p> })}
					{node.lines_of_code().map(|loc| view! { <p>{format!("{loc} lines of code")}</p> })}
					<h3>"Dependencies"</h3>
					{dependencies}
					<h3>"Dependents"</h3>
					{dependents}
					{metadata}
					<button on:click=move |_| set_show_impact.update(|on| *on = !*on)>
						{move || if show_impact.get() { "Hide blast radius" } else { "Show blast radius" }}
					</button>
					{impact}
				</aside>
			}
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{GraphNode, NodeKind};

	fn chain() -> Graph {
		let mut g = Graph::default();
		g.push_node(GraphNode::new("app", NodeKind::Class))
			.push_node(GraphNode::new("svc", NodeKind::Class))
			.push_node(GraphNode::new("repo", NodeKind::Interface))
			.push_node(GraphNode::new("db", NodeKind::Variable))
			.link("app", "svc")
			.link("svc", "repo")
			.link("svc", "db");
		g.nodes[2].name = "UserRepository".into();
		g
	}

	#[test]
	fn lines_need_both_ends() {
		let mut location = Location {
			file_path: "src/a.ts".into(),
			start_line: Some(3),
			end_line: None,
		};
		assert_eq!(line_range(&location), None);
		location.end_line = Some(80);
		assert_eq!(line_range(&location).as_deref(), Some("Lines 3-80"));
	}

	#[test]
	fn metadata_strings_are_unquoted() {
		assert_eq!(display_value(&Value::from("public")), "public");
		assert_eq!(display_value(&Value::from(77)), "77");
		assert_eq!(display_value(&Value::Bool(true)), "true");
	}

	#[test]
	fn impact_tiers_group_names_by_hop() {
		let tiers = impact_tiers(&chain(), "app", 3).unwrap();
		assert_eq!(
			tiers,
			vec![
				(1, vec!["svc".to_string()]),
				(2, vec!["db".to_string(), "UserRepository".to_string()]),
			]
		);
	}

	#[test]
	fn impact_tiers_surface_engine_errors() {
		assert!(impact_tiers(&chain(), "ghost", 2).is_err());
	}
}
