//! End-to-end behaviour of the layout and impact engine.

use std::collections::{BTreeMap, HashSet};

use code_graph_canvas::graph::layout::ForceOptions;
use code_graph_canvas::graph::{
	EdgeKind, ErrorKind, Graph, GraphEdge, GraphNode, LayoutOptions, LayoutStrategy, NodeKind,
	assign_layers, compute_impact, layout, layout_with,
};

fn graph(ids: &[&str], links: &[(&str, &str)]) -> Graph {
	let mut g = Graph::default();
	for id in ids {
		g.push_node(GraphNode::new(*id, NodeKind::Class));
	}
	for (a, b) in links {
		g.link(a, b);
	}
	g
}

fn services() -> Graph {
	graph(
		&["api", "auth", "users", "db", "cache", "config"],
		&[
			("api", "auth"),
			("api", "users"),
			("auth", "users"),
			("users", "db"),
			("users", "cache"),
			("cache", "config"),
			("db", "config"),
		],
	)
}

#[test]
fn layered_layout_positions_every_node_once() {
	let g = services();
	let result = layout(&g, LayoutStrategy::Layered).unwrap();
	assert_eq!(result.len(), g.nodes.len());
	for node in &g.nodes {
		assert!(result.get(&node.id).is_some(), "{} missing", node.id);
	}
}

#[test]
fn layered_edges_point_to_deeper_layers() {
	let g = services();
	let layers = assign_layers(&g).unwrap();
	for edge in &g.edges {
		assert!(
			layers.layer_of(&edge.target) > layers.layer_of(&edge.source),
			"{} -> {}",
			edge.source,
			edge.target
		);
	}
}

#[test]
fn layered_coordinates_grow_with_layer_and_slot() {
	let g = services();
	let layers = assign_layers(&g).unwrap();
	let result = layout(&g, LayoutStrategy::Layered).unwrap();

	for pair in layers.layers.windows(2) {
		let (upper, lower) = (result.get(&pair[0][0]).unwrap(), result.get(&pair[1][0]).unwrap());
		assert!(lower.y > upper.y);
	}
	for layer in &layers.layers {
		let xs: Vec<f64> = layer.iter().map(|id| result.get(id).unwrap().x).collect();
		assert!(xs.windows(2).all(|w| w[1] > w[0]), "{layer:?}: {xs:?}");
		let ys: HashSet<u64> = layer.iter().map(|id| result.get(id).unwrap().y.to_bits()).collect();
		assert_eq!(ys.len(), 1);
	}
}

#[test]
fn three_node_cycle_still_lays_out() {
	let g = graph(&["A", "B", "C"], &[("A", "B"), ("B", "C"), ("C", "A")]);
	let result = layout(&g, LayoutStrategy::Layered).unwrap();
	assert_eq!(result.len(), 3);
	let distinct: HashSet<(u64, u64)> = result
		.iter()
		.map(|(_, p)| (p.x.to_bits(), p.y.to_bits()))
		.collect();
	assert_eq!(distinct.len(), 3);
}

#[test]
fn empty_graph_gives_empty_layout() {
	let g = Graph::default();
	assert!(layout(&g, LayoutStrategy::Layered).unwrap().is_empty());
	assert!(layout(&g, LayoutStrategy::ForceDirected).unwrap().is_empty());
}

#[test]
fn impact_stops_at_max_hops() {
	let g = graph(&["A", "B", "C", "D"], &[("A", "B"), ("B", "C"), ("C", "D")]);
	let impact = compute_impact(&g, "A", 2).unwrap();
	let expected: BTreeMap<String, u32> = [("A".to_string(), 0), ("B".to_string(), 1), ("C".to_string(), 2)].into();
	assert_eq!(impact.distances(), &expected);
}

#[test]
fn zero_hops_is_only_the_origin() {
	let g = services();
	for node in &g.nodes {
		let impact = compute_impact(&g, &node.id, 0).unwrap();
		assert_eq!(impact.len(), 1);
		assert_eq!(impact.distance(&node.id), Some(0));
	}
}

#[test]
fn dangling_edge_fails_both_operations() {
	let mut g = services();
	g.edges.push(GraphEdge::new("api", "billing", EdgeKind::UsedBy));

	for strategy in [LayoutStrategy::Layered, LayoutStrategy::ForceDirected] {
		let err = layout(&g, strategy).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::DataIntegrity);
	}
	let err = compute_impact(&g, "api", 3).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::DataIntegrity);
}

#[test]
fn stale_dependency_list_only_fails_impact() {
	let mut g = services();
	g.nodes[0].dependency_ids.push("billing".into());

	for strategy in [LayoutStrategy::Layered, LayoutStrategy::ForceDirected] {
		assert_eq!(layout(&g, strategy).unwrap().len(), g.nodes.len());
	}
	let err = compute_impact(&g, "api", 3).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::DataIntegrity);
}

#[test]
fn malformed_options_are_reported_not_panicked() {
	let g = services();
	let options: LayoutOptions = serde_json::from_str(r#"{ "force": { "width": -10.0 } }"#).unwrap();
	let err = layout_with(&g, LayoutStrategy::ForceDirected, &options).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::InvalidOptions);
}

#[test]
fn unknown_origin_is_not_found() {
	let err = compute_impact(&services(), "does-not-exist", 5).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::NotFound);
	assert!(err.to_string().contains("does-not-exist"));
}

#[test]
fn layered_layout_is_bit_for_bit_repeatable() {
	let g = services();
	let first = layout(&g, LayoutStrategy::Layered).unwrap();
	let second = layout(&g, LayoutStrategy::Layered).unwrap();
	assert_eq!(first, second);
	for (id, p) in first.iter() {
		let q = second.get(id).unwrap();
		assert_eq!((p.x.to_bits(), p.y.to_bits()), (q.x.to_bits(), q.y.to_bits()));
	}
}

#[test]
fn force_layout_stays_within_twice_the_box() {
	let mut g = services();
	for i in 0..40 {
		g.push_node(GraphNode::new(format!("leaf{i}"), NodeKind::Variable));
		g.link("config", &format!("leaf{i}"));
	}
	let force = ForceOptions {
		width: 800.0,
		height: 600.0,
		iterations: 300,
		repulsion: 50_000.0,
		..ForceOptions::default()
	};
	let options = LayoutOptions {
		force: force.clone(),
		..LayoutOptions::default()
	};
	let result = layout_with(&g, LayoutStrategy::ForceDirected, &options).unwrap();
	assert_eq!(result.len(), g.nodes.len());

	let (cx, cy) = (force.width / 2.0, force.height / 2.0);
	for (id, p) in result.iter() {
		assert!((p.x - cx).abs() <= force.width, "{id} escaped: {p:?}");
		assert!((p.y - cy).abs() <= force.height, "{id} escaped: {p:?}");
	}
}

#[test]
fn layout_accepts_analysis_json() {
	let body = r#"{
		"nodes": [
			{ "id": "1", "name": "App", "type": "class", "filePath": "src/app.ts",
			  "dependencies": ["2"], "dependents": [] },
			{ "id": "2", "name": "Store", "type": "interface", "filePath": "src/store.ts",
			  "dependencies": [], "dependents": ["1"] }
		],
		"edges": [ { "id": "e", "source": "1", "target": "2", "type": "depends_on" } ]
	}"#;
	let g = Graph::from_json(body).unwrap();
	let result = layout(&g, "dagre".parse().unwrap()).unwrap();
	assert!(result.get("2").unwrap().y > result.get("1").unwrap().y);
	assert_eq!(compute_impact(&g, "1", 1).unwrap().distance("2"), Some(1));
}
