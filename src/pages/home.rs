use leptos::prelude::*;

use crate::components::code_graph::{CodeGraphCanvas, NodeDetails};
use crate::graph::{EdgeKind, Graph, GraphEdge, GraphMetrics, GraphNode, LayoutStrategy, NodeKind};

const NODE_KINDS: [NodeKind; 5] = [
	NodeKind::Class,
	NodeKind::Interface,
	NodeKind::Enum,
	NodeKind::Function,
	NodeKind::Variable,
];

const EDGE_KINDS: [EdgeKind; 4] = [
	EdgeKind::DependsOn,
	EdgeKind::UsedBy,
	EdgeKind::Implements,
	EdgeKind::Extends,
];

/// Generate a sample code graph: a random dependency tree with a few
/// mutual dependencies mixed in.
fn generate_sample_graph(n: usize) -> Graph {
	let mut graph = Graph::default();
	for i in 0..n {
		let kind = NODE_KINDS[i % NODE_KINDS.len()];
		let mut node = GraphNode::new(format!("sym{i}"), kind)
			.at(format!("src/module_{}/file_{}.ts", i % 7, i % 13))
			.with_complexity((rand_simple(i * 7) * 20.0).round());
		node.name = format!("{}{}", kind.as_str(), i);
		graph.push_node(node);
	}

	for i in 1..n {
		let target = (rand_simple(i) * (i as f64)) as usize;
		graph.link_with(
			GraphEdge::new(
				format!("sym{i}"),
				format!("sym{target}"),
				EDGE_KINDS[i % EDGE_KINDS.len()],
			)
			.with_weight(rand_simple(i * 3) * 3.0),
		);
		if i % 19 == 0 {
			graph.link(&format!("sym{target}"), &format!("sym{i}"));
		}
	}
	graph
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

fn summarize(graph: &Graph) -> String {
	match GraphMetrics::compute(graph) {
		Ok(m) => format!(
			"{} nodes · {} edges · avg complexity {:.1} · {} cycles",
			m.total_nodes,
			m.total_edges,
			m.avg_complexity,
			m.circular_dependencies.len()
		),
		Err(err) => format!("invalid graph: {err}"),
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let full = generate_sample_graph(60);
	let summary = summarize(&full);
	let (strategy, set_strategy) = signal(LayoutStrategy::Layered);
	let (query, set_query) = signal(String::new());
	let selected = RwSignal::new(None::<String>);
	let graph = Signal::derive(move || full.filtered(&query.get()));

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
				<CodeGraphCanvas graph=graph strategy=strategy selected=selected fullscreen=true />
				<div class="graph-overlay">
					<h1>"Code Graph"</h1>
					<p class="subtitle">{summary}</p>
					<select on:change=move |ev| {
						match event_target_value(&ev).parse::<LayoutStrategy>() {
							Ok(s) => set_strategy.set(s),
							Err(err) => log::warn!("{err}"),
						}
					}>
						<option value="layered">"Layered"</option>
						<option value="forceDirected">"Force-directed"</option>
					</select>
					<input
						type="search"
						placeholder="Search nodes..."
						prop:value=query
						on:input=move |ev| set_query.set(event_target_value(&ev))
					/>
					<p class="subtitle">
						"Click a node to show its blast radius. Double-click to fit. Scroll to zoom."
					</p>
				</div>
				<NodeDetails graph=graph selected=selected />
			</div>
		</ErrorBoundary>
	}
}
