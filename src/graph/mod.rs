//! Code-dependency graph engine: model, validation, layout and impact.
//!
//! Every operation is a pure function of its inputs. A [`Graph`] is never
//! mutated by the engine, so layouts and impact sets for different graphs
//! can be computed concurrently without coordination.

pub mod error;
mod filter;
pub mod impact;
pub mod index;
pub mod layout;
pub mod metrics;
pub mod model;

pub use error::{ErrorKind, GraphError, IntegrityViolation, Result};
pub use impact::{ImpactSet, compute_dependents_impact, compute_impact};
pub use index::{GraphIndex, Relations};
pub use layout::{
	LayoutOptions, LayoutResult, LayoutStrategy, Position, layered::assign_layers, layout,
	layout_with,
};
pub use metrics::GraphMetrics;
pub use model::{EdgeKind, Graph, GraphEdge, GraphNode, Location, NodeKind};
