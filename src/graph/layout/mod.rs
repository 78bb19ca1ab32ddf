//! Node placement for the code graph view.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{GraphError, Result};
use super::model::Graph;

pub mod force;
pub mod layered;

pub use force::ForceOptions;
pub use layered::{LayerAssignment, LayeredOptions};

/// How nodes are placed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutStrategy {
	/// Deterministic topological layering.
	#[default]
	Layered,
	/// Seeded spring/repulsion simulation.
	ForceDirected,
}

impl LayoutStrategy {
	/// Name accepted by [`FromStr`].
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Layered => "layered",
			Self::ForceDirected => "forceDirected",
		}
	}
}

impl fmt::Display for LayoutStrategy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Unrecognized layout strategy name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown layout strategy '{0}'")]
pub struct UnknownStrategy(pub String);

impl FromStr for LayoutStrategy {
	type Err = UnknownStrategy;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s {
			"layered" | "hierarchical" | "dagre" => Ok(Self::Layered),
			"force" | "forceDirected" | "force_directed" => Ok(Self::ForceDirected),
			other => Err(UnknownStrategy(other.to_string())),
		}
	}
}

/// Tunables for both strategies. Missing fields fall back to defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
	/// Used by [`LayoutStrategy::Layered`].
	pub layered: LayeredOptions,
	/// Used by [`LayoutStrategy::ForceDirected`].
	pub force: ForceOptions,
}

fn finite(option: &'static str, value: f64) -> Result<()> {
	if value.is_finite() {
		Ok(())
	} else {
		Err(GraphError::InvalidOption {
			option,
			expected: "a finite number",
			value,
		})
	}
}

fn non_negative(option: &'static str, value: f64) -> Result<()> {
	if value.is_finite() && value >= 0.0 {
		Ok(())
	} else {
		Err(GraphError::InvalidOption {
			option,
			expected: "a finite number >= 0",
			value,
		})
	}
}

/// A 2D point in layout space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate, growing downwards.
	pub y: f64,
}

impl Position {
	/// Point at `(x, y)`.
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Axis-aligned extent of a layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	/// Top-left corner.
	pub min: Position,
	/// Bottom-right corner.
	pub max: Position,
}

impl Bounds {
	/// Horizontal extent.
	pub fn width(&self) -> f64 {
		self.max.x - self.min.x
	}

	/// Vertical extent.
	pub fn height(&self) -> f64 {
		self.max.y - self.min.y
	}

	/// Midpoint of the box.
	pub fn center(&self) -> Position {
		Position::new(
			(self.min.x + self.max.x) / 2.0,
			(self.min.y + self.max.y) / 2.0,
		)
	}
}

/// One position per input node, keyed by node id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutResult {
	positions: BTreeMap<String, Position>,
}

impl LayoutResult {
	pub(crate) fn from_positions(positions: BTreeMap<String, Position>) -> Self {
		Self { positions }
	}

	/// Position of node `id`.
	pub fn get(&self, id: &str) -> Option<Position> {
		self.positions.get(id).copied()
	}

	/// Number of placed nodes.
	pub fn len(&self) -> usize {
		self.positions.len()
	}

	/// True for the layout of an empty graph.
	pub fn is_empty(&self) -> bool {
		self.positions.is_empty()
	}

	/// Positions in id order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, Position)> {
		self.positions.iter().map(|(id, p)| (id.as_str(), *p))
	}

	/// Smallest box holding every position; `None` for an empty layout.
	pub fn bounds(&self) -> Option<Bounds> {
		let mut points = self.positions.values();
		let first = *points.next()?;
		Some(points.fold(
			Bounds {
				min: first,
				max: first,
			},
			|b, p| Bounds {
				min: Position::new(b.min.x.min(p.x), b.min.y.min(p.y)),
				max: Position::new(b.max.x.max(p.x), b.max.y.max(p.y)),
			},
		))
	}
}

/// Lays out `graph` with default options.
///
/// Fails with a data-integrity error before placing anything if two nodes
/// share an id or an edge references a node that is not in the graph. The
/// `dependencies`/`dependents` id lists play no part in placement and are
/// not checked here.
pub fn layout(graph: &Graph, strategy: LayoutStrategy) -> Result<LayoutResult> {
	layout_with(graph, strategy, &LayoutOptions::default())
}

/// Lays out `graph` with explicit options. Only the options of the chosen
/// strategy are checked; an out-of-range value fails with
/// [`GraphError::InvalidOption`].
pub fn layout_with(
	graph: &Graph,
	strategy: LayoutStrategy,
	options: &LayoutOptions,
) -> Result<LayoutResult> {
	match strategy {
		LayoutStrategy::Layered => options.layered.validate()?,
		LayoutStrategy::ForceDirected => options.force.validate()?,
	}
	let index = graph.index()?;
	if index.is_empty() {
		return Ok(LayoutResult::default());
	}
	let result = match strategy {
		LayoutStrategy::Layered => layered::place(&index, &options.layered),
		LayoutStrategy::ForceDirected => force::place(&index, &options.force),
	};
	log::debug!("{strategy} layout placed {} nodes", result.len());
	Ok(result)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::error::ErrorKind;
	use crate::graph::model::{GraphNode, NodeKind};

	#[test]
	fn strategy_names_include_view_aliases() {
		assert_eq!("dagre".parse::<LayoutStrategy>(), Ok(LayoutStrategy::Layered));
		assert_eq!("hierarchical".parse::<LayoutStrategy>(), Ok(LayoutStrategy::Layered));
		assert_eq!("force".parse::<LayoutStrategy>(), Ok(LayoutStrategy::ForceDirected));
		assert_eq!(
			LayoutStrategy::ForceDirected.to_string().parse::<LayoutStrategy>(),
			Ok(LayoutStrategy::ForceDirected)
		);
		assert_eq!(
			"radial".parse::<LayoutStrategy>(),
			Err(UnknownStrategy("radial".into()))
		);
	}

	#[test]
	fn options_accept_partial_json() {
		let options: LayoutOptions =
			serde_json::from_str(r#"{ "force": { "iterations": 10, "seed": 7 } }"#).unwrap();
		assert_eq!(options.force.iterations, 10);
		assert_eq!(options.force.seed, 7);
		assert_eq!(options.force.repulsion, ForceOptions::default().repulsion);
		assert_eq!(options.layered, LayeredOptions::default());
	}

	#[test]
	fn stale_id_lists_do_not_block_placement() {
		let mut g = Graph::default();
		g.push_node(GraphNode::new("a", NodeKind::Class))
			.push_node(GraphNode::new("b", NodeKind::Class))
			.link("a", "b");
		g.nodes[0].dependency_ids.push("ghost".into());
		g.nodes[1].dependent_ids.push("phantom".into());

		for strategy in [LayoutStrategy::Layered, LayoutStrategy::ForceDirected] {
			let result = layout(&g, strategy).unwrap();
			assert_eq!(result.len(), 2);
		}
		let layers = layered::assign_layers(&g).unwrap();
		assert_eq!(layers.layer_of("b"), Some(1));
	}

	#[test]
	fn bad_options_of_the_chosen_strategy_are_errors() {
		let mut g = Graph::default();
		g.push_node(GraphNode::new("solo", NodeKind::Class));
		let options: LayoutOptions =
			serde_json::from_str(r#"{ "force": { "width": -10.0 } }"#).unwrap();

		let err = layout_with(&g, LayoutStrategy::ForceDirected, &options).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::InvalidOptions);
		assert!(err.to_string().contains("'width'"), "{err}");
		assert_eq!(
			layout_with(&g, LayoutStrategy::Layered, &options)
				.unwrap()
				.len(),
			1
		);
	}

	#[test]
	fn non_finite_options_are_rejected() {
		let g = Graph::default();
		let mut options = LayoutOptions::default();
		options.force.height = f64::NAN;
		assert!(matches!(
			layout_with(&g, LayoutStrategy::ForceDirected, &options),
			Err(GraphError::InvalidOption { option: "height", .. })
		));

		let mut options = LayoutOptions::default();
		options.layered.vertical_gap = f64::INFINITY;
		assert!(matches!(
			layout_with(&g, LayoutStrategy::Layered, &options),
			Err(GraphError::InvalidOption { option: "verticalGap", .. })
		));
	}

	#[test]
	fn bounds_cover_all_positions() {
		let mut positions = BTreeMap::new();
		positions.insert("a".to_string(), Position::new(10.0, 40.0));
		positions.insert("b".to_string(), Position::new(-5.0, 60.0));
		let bounds = LayoutResult::from_positions(positions).bounds().unwrap();
		assert_eq!(bounds.min, Position::new(-5.0, 40.0));
		assert_eq!(bounds.max, Position::new(10.0, 60.0));
		assert_eq!(bounds.width(), 15.0);
		assert!(LayoutResult::default().bounds().is_none());
	}
}
