use std::collections::HashSet;

use super::model::Graph;

impl Graph {
	/// Subgraph of nodes whose name or file path contains `query`, ignoring
	/// case. Edges and id lists are pruned to the surviving nodes so the
	/// result validates whenever `self` does.
	pub fn filtered(&self, query: &str) -> Graph {
		let query = query.trim().to_lowercase();
		if query.is_empty() {
			return self.clone();
		}

		let nodes: Vec<_> = self
			.nodes
			.iter()
			.filter(|n| {
				n.name.to_lowercase().contains(&query)
					|| n.location.file_path.to_lowercase().contains(&query)
			})
			.cloned()
			.collect();
		let kept: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

		let edges = self
			.edges
			.iter()
			.filter(|e| kept.contains(e.source.as_str()) && kept.contains(e.target.as_str()))
			.cloned()
			.collect();
		let nodes = nodes
			.iter()
			.map(|n| {
				let mut n = n.clone();
				n.dependency_ids.retain(|id| kept.contains(id.as_str()));
				n.dependent_ids.retain(|id| kept.contains(id.as_str()));
				n
			})
			.collect();

		Graph { nodes, edges }
	}
}
