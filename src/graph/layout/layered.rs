//! Topological layering with a fallback for cycles.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{LayoutResult, Position, finite, non_negative};
use crate::graph::error::Result;
use crate::graph::index::GraphIndex;
use crate::graph::model::Graph;

/// Spacing of the layered layout. Layer index drives `y`, position within
/// the layer drives `x`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayeredOptions {
	/// Horizontal slot taken by one node.
	pub node_width: f64,
	/// Vertical slot taken by one node.
	pub node_height: f64,
	/// Space between neighbours in a layer.
	pub horizontal_gap: f64,
	/// Space between layers.
	pub vertical_gap: f64,
	/// Offset of the first slot and layer from the origin.
	pub margin: f64,
}

impl Default for LayeredOptions {
	fn default() -> Self {
		Self {
			node_width: 200.0,
			node_height: 120.0,
			horizontal_gap: 80.0,
			vertical_gap: 100.0,
			margin: 50.0,
		}
	}
}

impl LayeredOptions {
	/// Sizes and gaps must be finite and non-negative; the margin may be
	/// any finite number.
	pub fn validate(&self) -> Result<()> {
		non_negative("nodeWidth", self.node_width)?;
		non_negative("nodeHeight", self.node_height)?;
		non_negative("horizontalGap", self.horizontal_gap)?;
		non_negative("verticalGap", self.vertical_gap)?;
		finite("margin", self.margin)
	}
}

/// Rank of every node, as node positions in `graph.nodes`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layers {
	/// Each layer lists node positions in input order.
	pub layers: Vec<Vec<usize>>,
	/// Layers produced by the topological sweep; the rest are singleton
	/// layers holding nodes on or behind a cycle.
	pub acyclic_layers: usize,
	layer_of: Vec<usize>,
}

impl Layers {
	/// Layer of the node at `idx`.
	pub fn layer_of(&self, idx: usize) -> usize {
		self.layer_of[idx]
	}
}

/// Kahn-style layering. Every node ends up in exactly one layer, cycles
/// included.
pub fn layer_nodes(index: &GraphIndex<'_>) -> Layers {
	let n = index.len();
	let mut in_degree = vec![0usize; n];
	for targets in &index.edge_targets {
		for &t in targets {
			in_degree[t] += 1;
		}
	}

	let mut placed = vec![false; n];
	let mut layers: Vec<Vec<usize>> = Vec::new();
	let mut current: Vec<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();

	while !current.is_empty() {
		let mut next = Vec::new();
		for &node in &current {
			placed[node] = true;
			for &t in &index.edge_targets[node] {
				in_degree[t] -= 1;
				if in_degree[t] == 0 {
					next.push(t);
				}
			}
		}
		current.sort_unstable();
		layers.push(current);
		current = next;
	}

	let acyclic_layers = layers.len();
	let remainder: Vec<usize> = (0..n).filter(|&i| !placed[i]).collect();
	if !remainder.is_empty() {
		log::warn!(
			"{} nodes sit on or behind a dependency cycle; placing them in trailing layers",
			remainder.len()
		);
	}
	layers.extend(remainder.into_iter().map(|i| vec![i]));

	let mut layer_of = vec![0; n];
	for (l, layer) in layers.iter().enumerate() {
		for &i in layer {
			layer_of[i] = l;
		}
	}

	Layers {
		layers,
		acyclic_layers,
		layer_of,
	}
}

/// Layer assignment keyed by node id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerAssignment {
	/// Node ids per layer, in input order within each layer.
	pub layers: Vec<Vec<String>>,
	/// Number of layers produced by the topological sweep.
	pub acyclic_layers: usize,
	layer_of: BTreeMap<String, usize>,
}

impl LayerAssignment {
	/// Layer of node `id`.
	pub fn layer_of(&self, id: &str) -> Option<usize> {
		self.layer_of.get(id).copied()
	}

	/// True if the node was not reached by the sweep.
	pub fn is_cyclic_remainder(&self, id: &str) -> bool {
		self.layer_of(id).is_some_and(|l| l >= self.acyclic_layers)
	}

	/// Total number of layers, cyclic remainders included.
	pub fn layer_count(&self) -> usize {
		self.layers.len()
	}
}

/// Checks ids and edges of `graph` and reports the layer of each node.
pub fn assign_layers(graph: &Graph) -> Result<LayerAssignment> {
	let index = graph.index()?;
	let ranks = layer_nodes(&index);
	let layers: Vec<Vec<String>> = ranks
		.layers
		.iter()
		.map(|layer| layer.iter().map(|&i| index.id(i).to_string()).collect())
		.collect();
	let layer_of = (0..index.len())
		.map(|i| (index.id(i).to_string(), ranks.layer_of(i)))
		.collect();
	Ok(LayerAssignment {
		layers,
		acyclic_layers: ranks.acyclic_layers,
		layer_of,
	})
}

pub(super) fn place(index: &GraphIndex<'_>, options: &LayeredOptions) -> LayoutResult {
	let ranks = layer_nodes(index);
	let (step_x, step_y) = (
		options.node_width + options.horizontal_gap,
		options.node_height + options.vertical_gap,
	);

	let mut positions = BTreeMap::new();
	for (l, layer) in ranks.layers.iter().enumerate() {
		for (slot, &i) in layer.iter().enumerate() {
			positions.insert(
				index.id(i).to_string(),
				Position::new(
					slot as f64 * step_x + options.margin,
					l as f64 * step_y + options.margin,
				),
			);
		}
	}
	log::debug!(
		"layered layout: {} layers ({} acyclic)",
		ranks.layers.len(),
		ranks.acyclic_layers
	);
	LayoutResult::from_positions(positions)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::layout::{LayoutStrategy, layout};
	use crate::graph::model::{GraphNode, NodeKind};

	fn graph(ids: &[&str], links: &[(&str, &str)]) -> Graph {
		let mut g = Graph::default();
		for id in ids {
			g.push_node(GraphNode::new(*id, NodeKind::Function));
		}
		for (a, b) in links {
			g.link(a, b);
		}
		g
	}

	#[test]
	fn diamond_ranks_by_depth() {
		let g = graph(
			&["top", "left", "right", "bottom"],
			&[
				("top", "left"),
				("top", "right"),
				("left", "bottom"),
				("right", "bottom"),
			],
		);
		let layers = assign_layers(&g).unwrap();
		assert_eq!(
			layers.layers,
			vec![vec!["top"], vec!["left", "right"], vec!["bottom"]]
		);
		assert_eq!(layers.acyclic_layers, 3);
	}

	#[test]
	fn layer_members_keep_input_order() {
		// "late" is discovered before "early", but "early" comes first in the input.
		let g = graph(
			&["early", "root_a", "root_b", "late"],
			&[("root_a", "late"), ("root_b", "early")],
		);
		let layers = assign_layers(&g).unwrap();
		assert_eq!(layers.layers[0], vec!["root_a", "root_b"]);
		assert_eq!(layers.layers[1], vec!["early", "late"]);
	}

	#[test]
	fn cycle_members_get_trailing_singleton_layers() {
		let g = graph(
			&["entry", "a", "b", "c"],
			&[("entry", "a"), ("a", "b"), ("b", "c"), ("c", "a")],
		);
		let layers = assign_layers(&g).unwrap();
		assert_eq!(layers.acyclic_layers, 1);
		assert_eq!(
			layers.layers,
			vec![vec!["entry"], vec!["a"], vec!["b"], vec!["c"]]
		);
		assert!(layers.is_cyclic_remainder("b"));
		assert!(!layers.is_cyclic_remainder("entry"));
	}

	#[test]
	fn self_loop_goes_to_remainder() {
		let g = graph(&["solo", "loop"], &[("loop", "loop")]);
		let layers = assign_layers(&g).unwrap();
		assert_eq!(layers.layer_of("solo"), Some(0));
		assert_eq!(layers.layer_of("loop"), Some(1));
		assert!(layers.is_cyclic_remainder("loop"));
	}

	#[test]
	fn parallel_edges_count_twice() {
		let g = graph(&["a", "b", "c"], &[("a", "b"), ("a", "b"), ("b", "c")]);
		let layers = assign_layers(&g).unwrap();
		assert_eq!(layers.layer_of("c"), Some(2));
		assert_eq!(layers.acyclic_layers, 3);
	}

	#[test]
	fn positions_follow_layer_and_slot() {
		let g = graph(&["a", "b", "c"], &[("a", "b"), ("a", "c")]);
		let result = layout(&g, LayoutStrategy::Layered).unwrap();
		let options = LayeredOptions::default();

		assert_eq!(result.get("a"), Some(Position::new(50.0, 50.0)));
		assert_eq!(result.get("b"), Some(Position::new(50.0, 270.0)));
		assert_eq!(
			result.get("c"),
			Some(Position::new(
				50.0 + options.node_width + options.horizontal_gap,
				270.0
			))
		);
	}
}
