//! Error types shared by every engine operation.

use thiserror::Error;

/// Result alias for graph engine operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors raised by the graph engine.
#[derive(Debug, Error)]
pub enum GraphError {
	/// The graph itself is corrupt; re-fetch it rather than retrying.
	#[error("data integrity violation: {0}")]
	DataIntegrity(#[from] IntegrityViolation),

	/// A requested node is not part of the graph.
	#[error("node '{id}' not found in graph")]
	NotFound {
		/// The id that was looked up.
		id: String,
	},

	/// The analysis response could not be decoded.
	#[error("invalid graph JSON: {0}")]
	Json(#[from] serde_json::Error),

	/// A layout option is out of range; nothing was placed.
	#[error("layout option '{option}' must be {expected}, got {value}")]
	InvalidOption {
		/// Option name, as spelled in JSON config.
		option: &'static str,
		/// Accepted range.
		expected: &'static str,
		/// The rejected value.
		value: f64,
	},
}

/// Broad category of a [`GraphError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
	/// Dangling or duplicate references inside the graph.
	DataIntegrity,
	/// Unknown node id.
	NotFound,
	/// Undecodable input.
	Parse,
	/// Layout options the engine cannot honour.
	InvalidOptions,
}

impl GraphError {
	/// Category of this error.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::DataIntegrity(_) => ErrorKind::DataIntegrity,
			Self::NotFound { .. } => ErrorKind::NotFound,
			Self::Json(_) => ErrorKind::Parse,
			Self::InvalidOption { .. } => ErrorKind::InvalidOptions,
		}
	}
}

/// The specific reference that failed validation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IntegrityViolation {
	/// Two nodes share an id.
	#[error("node id '{id}' appears more than once")]
	DuplicateNode {
		/// The repeated id.
		id: String,
	},

	/// An edge endpoint names a node that does not exist.
	#[error("edge '{edge}' {endpoint} references missing node '{node}'")]
	DanglingEdge {
		/// Id of the offending edge.
		edge: String,
		/// `"source"` or `"target"`.
		endpoint: &'static str,
		/// The missing node id.
		node: String,
	},

	/// A dependency or dependent id names a node that does not exist.
	#[error("node '{node}' lists missing {relation} '{reference}'")]
	DanglingReference {
		/// Node whose list is stale.
		node: String,
		/// `"dependency"` or `"dependent"`.
		relation: &'static str,
		/// The missing node id.
		reference: String,
	},
}
