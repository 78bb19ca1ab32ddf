//! Wire model of an analysis response.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::{GraphError, Result};

/// Symbol category of a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	/// A class declaration.
	#[default]
	Class,
	/// An interface or trait.
	Interface,
	/// An enumeration.
	Enum,
	/// A free function or method.
	Function,
	/// A variable or constant.
	Variable,
}

impl NodeKind {
	/// Wire name, as sent by the analysis service.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Class => "class",
			Self::Interface => "interface",
			Self::Enum => "enum",
			Self::Function => "function",
			Self::Variable => "variable",
		}
	}
}

/// Relationship carried by an edge. Only affects rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
	/// Source needs target to compile or run.
	#[default]
	DependsOn,
	/// Source is used by target.
	UsedBy,
	/// Source implements the interface target.
	Implements,
	/// Source inherits from target.
	Extends,
}

impl EdgeKind {
	/// `implements` edges are drawn with a moving dash.
	pub fn is_animated(&self) -> bool {
		matches!(self, Self::Implements)
	}
}

/// Where a symbol lives in the analyzed source tree.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
	/// Path relative to the repository root.
	pub file_path: String,
	/// First line of the declaration, 1-based.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub start_line: Option<u32>,
	/// Last line of the declaration, inclusive.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub end_line: Option<u32>,
}

/// A code symbol tracked by the analysis.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
	/// Unique within a graph.
	pub id: String,
	/// Display name of the symbol.
	#[serde(default)]
	pub name: String,
	/// Symbol category, `type` on the wire.
	#[serde(rename = "type")]
	pub kind: NodeKind,
	/// Source position, flattened into the node on the wire.
	#[serde(flatten)]
	pub location: Location,
	/// Cyclomatic complexity, when the analyzer scored the symbol.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub complexity: Option<f64>,
	/// Ids this node depends on.
	#[serde(default, rename = "dependencies")]
	pub dependency_ids: Vec<String>,
	/// Ids that depend on this node.
	#[serde(default, rename = "dependents")]
	pub dependent_ids: Vec<String>,
	/// Free-form analyzer annotations.
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub metadata: BTreeMap<String, serde_json::Value>,
}

impl GraphNode {
	/// Creates a node whose display name is its id.
	pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
		let id = id.into();
		Self {
			name: id.clone(),
			id,
			kind,
			..Self::default()
		}
	}

	/// Sets the source file.
	pub fn at(mut self, file_path: impl Into<String>) -> Self {
		self.location.file_path = file_path.into();
		self
	}

	/// Sets the complexity score.
	pub fn with_complexity(mut self, complexity: f64) -> Self {
		self.complexity = Some(complexity);
		self
	}

	/// Lines of code, when the analyzer annotated them.
	pub fn lines_of_code(&self) -> Option<u64> {
		self.metadata.get("linesOfCode").and_then(|v| v.as_u64())
	}
}

/// A directed relationship between two nodes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
	/// Edge id; not required to be unique.
	pub id: String,
	/// Id of the depending node.
	pub source: String,
	/// Id of the node depended upon.
	pub target: String,
	/// Relationship, `type` on the wire.
	#[serde(rename = "type")]
	pub kind: EdgeKind,
	/// Optional caption.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	/// Visual weight; widens the drawn edge.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub weight: Option<f64>,
}

impl GraphEdge {
	/// Creates an edge with an id derived from its endpoints.
	pub fn new(source: impl Into<String>, target: impl Into<String>, kind: EdgeKind) -> Self {
		let (source, target) = (source.into(), target.into());
		Self {
			id: format!("{source}->{target}"),
			source,
			target,
			kind,
			label: None,
			weight: None,
		}
	}

	/// Sets the visual weight.
	pub fn with_weight(mut self, weight: f64) -> Self {
		self.weight = Some(weight);
		self
	}
}

/// A code-dependency graph as returned by the analysis endpoint.
///
/// Node order is significant: the layered layout orders nodes within a
/// layer, and cyclic remainders, by their position in `nodes`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
	/// Nodes in analyzer order.
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	/// Directed relationships between `nodes`.
	#[serde(default)]
	pub edges: Vec<GraphEdge>,
}

impl Graph {
	/// Parses the JSON body of an analysis response. Extra fields such as
	/// `metrics` are ignored.
	pub fn from_json(body: &str) -> Result<Self> {
		serde_json::from_str(body).map_err(GraphError::from)
	}

	/// True when the graph has no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Looks up a node by id.
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Appends a node.
	pub fn push_node(&mut self, node: GraphNode) -> &mut Self {
		self.nodes.push(node);
		self
	}

	/// Records "`from` depends on `to`": adds a `depends_on` edge and keeps
	/// the denormalized id lists of both nodes in sync. Missing nodes are
	/// left for validation to report.
	pub fn link(&mut self, from: &str, to: &str) -> &mut Self {
		self.link_with(GraphEdge::new(from, to, EdgeKind::DependsOn))
	}

	/// Like [`Graph::link`] with an explicit edge.
	pub fn link_with(&mut self, edge: GraphEdge) -> &mut Self {
		for node in &mut self.nodes {
			if node.id == edge.source && !node.dependency_ids.contains(&edge.target) {
				node.dependency_ids.push(edge.target.clone());
			}
			if node.id == edge.target && !node.dependent_ids.contains(&edge.source) {
				node.dependent_ids.push(edge.source.clone());
			}
		}
		self.edges.push(edge);
		self
	}
}
