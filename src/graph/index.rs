//! Id resolution and up-front reference checks.

use std::collections::HashMap;

use super::error::{IntegrityViolation, Result};
use super::model::{Graph, GraphNode};

/// A validated view of a [`Graph`] with ids resolved to positions in
/// `graph.nodes`.
///
/// Construction checks node ids and edge endpoints, which is all layout
/// needs. The denormalized id lists are resolved separately by
/// [`GraphIndex::relations`], so a stale list only fails the walks that
/// read it.
pub struct GraphIndex<'g> {
	/// The indexed graph.
	pub graph: &'g Graph,
	ids: HashMap<&'g str, usize>,
	/// Edge targets per node, one entry per edge (parallel edges repeat).
	pub edge_targets: Vec<Vec<usize>>,
}

/// `dependency_ids` and `dependent_ids` resolved to node positions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relations {
	/// `dependency_ids` resolved.
	pub dependencies: Vec<Vec<usize>>,
	/// `dependent_ids` resolved.
	pub dependents: Vec<Vec<usize>>,
}

impl<'g> GraphIndex<'g> {
	/// Checks node ids and edge endpoints and builds the index.
	pub fn new(graph: &'g Graph) -> Result<Self> {
		let mut ids = HashMap::with_capacity(graph.nodes.len());
		for (i, node) in graph.nodes.iter().enumerate() {
			if ids.insert(node.id.as_str(), i).is_some() {
				return Err(IntegrityViolation::DuplicateNode {
					id: node.id.clone(),
				}
				.into());
			}
		}

		let mut edge_targets = vec![Vec::new(); graph.nodes.len()];
		for edge in &graph.edges {
			let resolve = |node: &str, endpoint: &'static str| {
				ids.get(node)
					.copied()
					.ok_or_else(|| IntegrityViolation::DanglingEdge {
						edge: edge.id.clone(),
						endpoint,
						node: node.to_string(),
					})
			};
			let source = resolve(&edge.source, "source")?;
			let target = resolve(&edge.target, "target")?;
			edge_targets[source].push(target);
		}

		Ok(Self {
			graph,
			ids,
			edge_targets,
		})
	}

	/// Resolves every node's dependency and dependent ids, failing on the
	/// first id that names a missing node.
	pub fn relations(&self) -> Result<Relations> {
		Ok(Relations {
			dependencies: resolve_lists(self.graph, &self.ids, "dependency", |n| {
				&n.dependency_ids
			})?,
			dependents: resolve_lists(self.graph, &self.ids, "dependent", |n| &n.dependent_ids)?,
		})
	}

	/// Position of `id` in `graph.nodes`.
	pub fn position(&self, id: &str) -> Option<usize> {
		self.ids.get(id).copied()
	}

	/// Id of the node at `idx`.
	pub fn id(&self, idx: usize) -> &'g str {
		&self.graph.nodes[idx].id
	}

	/// Number of nodes.
	pub fn len(&self) -> usize {
		self.graph.nodes.len()
	}

	/// True when the graph has no nodes.
	pub fn is_empty(&self) -> bool {
		self.graph.nodes.is_empty()
	}
}

fn resolve_lists(
	graph: &Graph,
	ids: &HashMap<&str, usize>,
	relation: &'static str,
	pick: fn(&GraphNode) -> &Vec<String>,
) -> std::result::Result<Vec<Vec<usize>>, IntegrityViolation> {
	let mut resolved = Vec::with_capacity(graph.nodes.len());
	for node in &graph.nodes {
		let mut targets = Vec::with_capacity(pick(node).len());
		for reference in pick(node) {
			let idx = ids.get(reference.as_str()).copied().ok_or_else(|| {
				IntegrityViolation::DanglingReference {
					node: node.id.clone(),
					relation,
					reference: reference.clone(),
				}
			})?;
			targets.push(idx);
		}
		resolved.push(targets);
	}
	Ok(resolved)
}

impl Graph {
	/// Checks node ids and edge endpoints, returning an index over them.
	pub fn index(&self) -> Result<GraphIndex<'_>> {
		GraphIndex::new(self)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::error::{ErrorKind, GraphError};
	use crate::graph::model::{EdgeKind, GraphEdge, NodeKind};

	fn pair() -> Graph {
		let mut graph = Graph::default();
		graph
			.push_node(GraphNode::new("a", NodeKind::Class))
			.push_node(GraphNode::new("b", NodeKind::Interface))
			.link("a", "b");
		graph
	}

	#[test]
	fn resolves_edges_and_id_lists() {
		let graph = pair();
		let index = graph.index().unwrap();
		assert_eq!(index.position("b"), Some(1));
		assert_eq!(index.edge_targets, vec![vec![1], vec![]]);
		let relations = index.relations().unwrap();
		assert_eq!(relations.dependencies, vec![vec![1], vec![]]);
		assert_eq!(relations.dependents, vec![vec![], vec![0]]);
	}

	#[test]
	fn duplicate_ids_are_rejected() {
		let mut graph = pair();
		graph.push_node(GraphNode::new("a", NodeKind::Enum));
		let err = graph.index().err().unwrap();
		assert_eq!(err.kind(), ErrorKind::DataIntegrity);
		assert!(matches!(
			err,
			GraphError::DataIntegrity(IntegrityViolation::DuplicateNode { ref id }) if id == "a"
		));
	}

	#[test]
	fn dangling_edge_target_is_rejected() {
		let mut graph = pair();
		graph.edges.push(GraphEdge::new("a", "ghost", EdgeKind::UsedBy));
		let err = graph.index().err().unwrap();
		assert!(matches!(
			err,
			GraphError::DataIntegrity(IntegrityViolation::DanglingEdge { endpoint: "target", ref node, .. })
				if node == "ghost"
		));
	}

	#[test]
	fn dangling_dependency_id_only_fails_relations() {
		let mut graph = pair();
		graph.nodes[1].dependency_ids.push("ghost".into());
		let index = graph.index().unwrap();
		assert_eq!(index.edge_targets, vec![vec![1], vec![]]);
		let err = index.relations().unwrap_err();
		assert!(matches!(
			err,
			GraphError::DataIntegrity(IntegrityViolation::DanglingReference { relation: "dependency", .. })
		));
	}
}
