//! Summary figures shown above the graph: size, complexity, hubs and cycles.

use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;
use serde::Serialize;

use super::error::Result;
use super::model::Graph;

const HUB_LIMIT: usize = 5;

/// Aggregate figures for one graph.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetrics {
	/// Node count.
	pub total_nodes: usize,
	/// Edge count, parallel edges included.
	pub total_edges: usize,
	/// Highest complexity score; 0 when no node is scored.
	pub max_complexity: f64,
	/// Mean over nodes that carry a complexity score.
	pub avg_complexity: f64,
	/// Most depended-upon nodes, busiest first.
	pub hub_nodes: Vec<String>,
	/// Each cycle's members in input order.
	pub circular_dependencies: Vec<Vec<String>>,
}

impl GraphMetrics {
	/// Validates `graph` and summarizes it.
	pub fn compute(graph: &Graph) -> Result<Self> {
		let index = graph.index()?;
		let relations = index.relations()?;

		let scores: Vec<f64> = graph.nodes.iter().filter_map(|n| n.complexity).collect();
		let max_complexity = scores.iter().copied().fold(0.0, f64::max);
		let avg_complexity = if scores.is_empty() {
			0.0
		} else {
			scores.iter().sum::<f64>() / scores.len() as f64
		};

		let mut hubs: Vec<(usize, usize)> = relations
			.dependents
			.iter()
			.enumerate()
			.filter(|(_, d)| !d.is_empty())
			.map(|(i, d)| (i, d.len()))
			.collect();
		// stable: ties keep input order
		hubs.sort_by(|a, b| b.1.cmp(&a.1));
		let hub_nodes = hubs
			.into_iter()
			.take(HUB_LIMIT)
			.map(|(i, _)| index.id(i).to_string())
			.collect();

		let mut dg = DiGraph::<usize, ()>::with_capacity(index.len(), graph.edges.len());
		let handles: Vec<_> = (0..index.len()).map(|i| dg.add_node(i)).collect();
		let mut self_loops = vec![false; index.len()];
		for (source, targets) in index.edge_targets.iter().enumerate() {
			for &target in targets {
				if source == target {
					self_loops[source] = true;
				}
				dg.add_edge(handles[source], handles[target], ());
			}
		}
		let mut cycles: Vec<Vec<usize>> = tarjan_scc(&dg)
			.into_iter()
			.map(|scc| {
				let mut members: Vec<usize> = scc.into_iter().map(|h| dg[h]).collect();
				members.sort_unstable();
				members
			})
			.filter(|members| members.len() > 1 || self_loops[members[0]])
			.collect();
		cycles.sort_unstable_by_key(|members| members[0]);

		Ok(Self {
			total_nodes: index.len(),
			total_edges: graph.edges.len(),
			max_complexity,
			avg_complexity,
			hub_nodes,
			circular_dependencies: cycles
				.into_iter()
				.map(|members| members.into_iter().map(|i| index.id(i).to_string()).collect())
				.collect(),
		})
	}

	/// True if any dependency cycle was found.
	pub fn has_cycles(&self) -> bool {
		!self.circular_dependencies.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::model::{GraphNode, NodeKind};

	#[test]
	fn empty_graph_has_zero_metrics() {
		let metrics = GraphMetrics::compute(&Graph::default()).unwrap();
		assert_eq!(metrics, GraphMetrics::default());
		assert!(!metrics.has_cycles());
	}

	#[test]
	fn complexity_ignores_unscored_nodes() {
		let mut g = Graph::default();
		g.push_node(GraphNode::new("a", NodeKind::Function).with_complexity(4.0))
			.push_node(GraphNode::new("b", NodeKind::Function).with_complexity(10.0))
			.push_node(GraphNode::new("c", NodeKind::Variable));
		let metrics = GraphMetrics::compute(&g).unwrap();
		assert_eq!(metrics.max_complexity, 10.0);
		assert_eq!(metrics.avg_complexity, 7.0);
		assert_eq!(metrics.total_nodes, 3);
	}

	#[test]
	fn hubs_rank_by_dependents_then_input_order() {
		let mut g = Graph::default();
		for id in ["util", "log", "app", "cli", "lonely"] {
			g.push_node(GraphNode::new(id, NodeKind::Class));
		}
		g.link("app", "log").link("cli", "util").link("app", "util");
		let metrics = GraphMetrics::compute(&g).unwrap();
		assert_eq!(metrics.hub_nodes, vec!["util", "log"]);
	}

	#[test]
	fn finds_cycles_and_self_loops() {
		let mut g = Graph::default();
		for id in ["a", "b", "c", "d", "e"] {
			g.push_node(GraphNode::new(id, NodeKind::Interface));
		}
		g.link("c", "a").link("a", "b").link("b", "c").link("c", "d").link("e", "e");
		let metrics = GraphMetrics::compute(&g).unwrap();
		assert_eq!(
			metrics.circular_dependencies,
			vec![vec!["a", "b", "c"], vec!["e"]]
		);
		assert_eq!(metrics.total_edges, 5);
	}
}
