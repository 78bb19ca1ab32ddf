use std::collections::HashMap;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::style::{self, HIT_RADIUS, ImpactLevel};
use crate::graph::{Graph, GraphError, LayoutResult, LayoutStrategy, compute_impact};

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub label: String,
	pub color: &'static str,
}

#[derive(Clone, Debug)]
pub struct EdgeView {
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub color: &'static str,
	pub width: f64,
	pub animated: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub moved: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Selected node and the blast radius painted around it. `impact` outlives
/// the selection until the fade-out finishes.
#[derive(Clone, Debug, Default)]
pub struct SelectionState {
	pub node: Option<DefaultNodeIdx>,
	pub impact: HashMap<DefaultNodeIdx, ImpactLevel>,
	pub highlight_t: f64,
}

pub struct CodeGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub edges: Vec<EdgeView>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub selection: SelectionState,
	pub hovered: Option<DefaultNodeIdx>,
	pub width: f64,
	pub height: f64,
	/// Keep running the physics after the initial layout.
	pub live: bool,
	pub flow_time: f64,
	source: Graph,
	max_hops: u32,
	index_of: HashMap<String, DefaultNodeIdx>,
	id_of: HashMap<DefaultNodeIdx, String>,
}

impl CodeGraphState {
	/// Builds the scene from an engine layout. Nodes start at their laid-out
	/// positions; in layered mode they stay pinned there.
	pub fn new(
		source: Graph,
		layout: &LayoutResult,
		strategy: LayoutStrategy,
		max_hops: u32,
		width: f64,
		height: f64,
	) -> Self {
		let live = strategy == LayoutStrategy::ForceDirected;
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut index_of = HashMap::new();
		let mut id_of = HashMap::new();

		for node in &source.nodes {
			let p = layout.get(&node.id).unwrap_or_default();
			let label = if node.name.is_empty() {
				node.id.clone()
			} else {
				node.name.clone()
			};
			let idx = graph.add_node(NodeData {
				x: p.x as f32,
				y: p.y as f32,
				mass: 10.0,
				is_anchor: !live,
				user_data: NodeInfo {
					id: node.id.clone(),
					label,
					color: style::node_color(node.kind),
				},
			});
			index_of.insert(node.id.clone(), idx);
			id_of.insert(idx, node.id.clone());
		}

		let mut edges = Vec::with_capacity(source.edges.len());
		for edge in &source.edges {
			if let (Some(&src), Some(&tgt)) =
				(index_of.get(&edge.source), index_of.get(&edge.target))
			{
				if src != tgt {
					graph.add_edge(src, tgt, EdgeData::default());
				}
				edges.push(EdgeView {
					source: src,
					target: tgt,
					color: style::edge_color(edge.kind),
					width: style::edge_width(edge.weight),
					animated: edge.kind.is_animated(),
				});
			}
		}

		let mut state = Self {
			graph,
			edges,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			selection: SelectionState::default(),
			hovered: None,
			width,
			height,
			live,
			flow_time: 0.0,
			source,
			max_hops,
			index_of,
			id_of,
		};
		state.fit_view();
		state
	}

	/// Centers the scene and zooms so every node is visible.
	pub fn fit_view(&mut self) {
		let mut bounds: Option<(f64, f64, f64, f64)> = None;
		self.graph.visit_nodes(|node| {
			let (x, y) = (node.x() as f64, node.y() as f64);
			bounds = Some(match bounds {
				None => (x, y, x, y),
				Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
			});
		});
		let Some((x0, y0, x1, y1)) = bounds else {
			return;
		};
		let pad = 4.0 * HIT_RADIUS;
		let k = ((self.width - 2.0 * pad) / (x1 - x0).max(1.0))
			.min((self.height - 2.0 * pad) / (y1 - y0).max(1.0))
			.clamp(0.1, 1.5);
		self.transform = ViewTransform {
			x: self.width / 2.0 - (x0 + x1) / 2.0 * k,
			y: self.height / 2.0 - (y0 + y1) / 2.0 * k,
			k,
		};
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(node.index());
			}
		});
		found
	}

	/// Selects a node and computes its blast radius; `None` clears the
	/// selection and lets the highlight fade out.
	pub fn select(&mut self, node: Option<DefaultNodeIdx>) -> Result<(), GraphError> {
		if self.selection.node == node {
			return Ok(());
		}
		self.selection.node = node;
		let Some(idx) = node else {
			return Ok(());
		};
		let Some(id) = self.id_of.get(&idx) else {
			return Ok(());
		};

		let impact = match compute_impact(&self.source, id, self.max_hops) {
			Ok(impact) => impact,
			Err(err) => {
				self.selection.impact.clear();
				return Err(err);
			}
		};
		self.selection.impact = impact
			.iter()
			.filter_map(|(id, hops)| {
				self.index_of
					.get(id)
					.map(|&i| (i, ImpactLevel::from_distance(hops)))
			})
			.collect();
		log::info!(
			"blast radius of '{}': {} nodes within {} hops",
			impact.origin,
			impact.len(),
			impact.max_hops
		);
		Ok(())
	}

	/// [`select`](Self::select) by node id. Ids missing from the scene, for
	/// example after a search filtered them out, clear the selection.
	pub fn select_id(&mut self, id: Option<&str>) -> Result<(), GraphError> {
		let idx = id.and_then(|id| self.index_of.get(id).copied());
		self.select(idx)
	}

	pub fn selected_id(&self) -> Option<String> {
		self.selection
			.node
			.and_then(|idx| self.id_of.get(&idx).cloned())
	}

	pub fn impact_level(&self, idx: DefaultNodeIdx) -> Option<ImpactLevel> {
		self.selection.impact.get(&idx).copied()
	}

	pub fn has_active_highlight(&self) -> bool {
		!self.selection.impact.is_empty()
	}

	pub fn is_selected(&self, idx: DefaultNodeIdx) -> bool {
		self.selection.node == Some(idx)
	}

	pub fn tick(&mut self, dt: f32) {
		if self.live {
			self.graph.update(dt);
		}
		self.flow_time += dt as f64;

		let target = if self.selection.node.is_some() { 1.0 } else { 0.0 };
		let speed = if self.selection.node.is_some() { 1.8 } else { 1.26 };
		self.selection.highlight_t += (target - self.selection.highlight_t) * speed * dt as f64;
		if self.selection.node.is_none() && self.selection.highlight_t < 0.01 {
			self.selection.highlight_t = 0.0;
			self.selection.impact.clear();
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}
