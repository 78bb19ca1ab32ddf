//! Blast radius: which nodes break, and how many hops away, if a node changes.

use std::collections::{BTreeMap, VecDeque};

use serde::Serialize;

use super::error::{GraphError, Result};
use super::index::GraphIndex;
use super::model::Graph;

/// Hop distance of every node within reach of an origin.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactSet {
	/// Node the walk started from.
	pub origin: String,
	/// Hop budget the walk was bounded by.
	pub max_hops: u32,
	distances: BTreeMap<String, u32>,
}

impl ImpactSet {
	/// Hop distance of `id`, if it was reached.
	pub fn distance(&self, id: &str) -> Option<u32> {
		self.distances.get(id).copied()
	}

	/// True if `id` is within reach.
	pub fn contains(&self, id: &str) -> bool {
		self.distances.contains_key(id)
	}

	/// Number of reached nodes, origin included.
	pub fn len(&self) -> usize {
		self.distances.len()
	}

	/// Never true for a successful walk, which always holds the origin.
	pub fn is_empty(&self) -> bool {
		self.distances.is_empty()
	}

	/// Reached ids and their distances, in id order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
		self.distances.iter().map(|(id, d)| (id.as_str(), *d))
	}

	/// Ids exactly `hops` away, in id order.
	pub fn at_distance(&self, hops: u32) -> Vec<&str> {
		self.iter()
			.filter(|&(_, d)| d == hops)
			.map(|(id, _)| id)
			.collect()
	}

	/// The raw id → distance map.
	pub fn distances(&self) -> &BTreeMap<String, u32> {
		&self.distances
	}
}

/// Breadth-first walk over `dependency_ids` from `origin`, up to `max_hops`.
///
/// The graph is validated first, edges and id lists alike, so a corrupt
/// graph reports a data-integrity error even when the origin is unknown.
pub fn compute_impact(graph: &Graph, origin: &str, max_hops: u32) -> Result<ImpactSet> {
	let index = graph.index()?;
	let relations = index.relations()?;
	walk(&index, origin, max_hops, &relations.dependencies)
}

/// The same walk over `dependent_ids`: who depends on `origin`, transitively.
pub fn compute_dependents_impact(graph: &Graph, origin: &str, max_hops: u32) -> Result<ImpactSet> {
	let index = graph.index()?;
	let relations = index.relations()?;
	walk(&index, origin, max_hops, &relations.dependents)
}

fn walk(
	index: &GraphIndex<'_>,
	origin: &str,
	max_hops: u32,
	adjacency: &[Vec<usize>],
) -> Result<ImpactSet> {
	let start = index.position(origin).ok_or_else(|| GraphError::NotFound {
		id: origin.to_string(),
	})?;

	let mut hops: Vec<Option<u32>> = vec![None; index.len()];
	let mut queue = VecDeque::new();
	hops[start] = Some(0);
	queue.push_back((start, 0u32));

	while let Some((node, depth)) = queue.pop_front() {
		if depth == max_hops {
			continue;
		}
		for &next in &adjacency[node] {
			if hops[next].is_none() {
				hops[next] = Some(depth + 1);
				queue.push_back((next, depth + 1));
			}
		}
	}

	let distances: BTreeMap<String, u32> = hops
		.iter()
		.enumerate()
		.filter_map(|(i, d)| d.map(|d| (index.id(i).to_string(), d)))
		.collect();
	log::debug!(
		"impact of '{origin}' within {max_hops} hops reaches {} nodes",
		distances.len()
	);

	Ok(ImpactSet {
		origin: origin.to_string(),
		max_hops,
		distances,
	})
}
