use crate::graph::{EdgeKind, NodeKind};

pub const NODE_RADIUS: f64 = 8.0;
pub const HIT_RADIUS: f64 = 14.0;
pub const BACKGROUND: &str = "#1a1a2e";

pub fn node_color(kind: NodeKind) -> &'static str {
	match kind {
		NodeKind::Class => "#3b82f6",
		NodeKind::Interface => "#a855f7",
		NodeKind::Enum => "#f97316",
		NodeKind::Function => "#22c55e",
		NodeKind::Variable => "#6b7280",
	}
}

pub fn edge_color(kind: EdgeKind) -> &'static str {
	match kind {
		EdgeKind::DependsOn => "#94a3b8",
		EdgeKind::UsedBy => "#22c55e",
		EdgeKind::Implements => "#a855f7",
		EdgeKind::Extends => "#3b82f6",
	}
}

/// Badge colour for a complexity score: red above 15, yellow above 10.
pub fn complexity_color(complexity: f64) -> &'static str {
	if complexity > 15.0 {
		"#ef4444"
	} else if complexity > 10.0 {
		"#eab308"
	} else {
		"#22c55e"
	}
}

/// Stroke width in screen pixels at zoom 1.
pub fn edge_width(weight: Option<f64>) -> f64 {
	weight.map_or(2.0, |w| (1.0 + w).min(4.0))
}

/// Highlight tier of a node inside a blast radius.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImpactLevel {
	/// The selected node itself.
	Critical,
	/// One hop away.
	High,
	/// Two hops away.
	Medium,
	/// Three or more hops away.
	Low,
}

impl ImpactLevel {
	/// Tier for a node `hops` away from the selection.
	pub fn from_distance(hops: u32) -> Self {
		match hops {
			0 => Self::Critical,
			1 => Self::High,
			2 => Self::Medium,
			_ => Self::Low,
		}
	}

	/// Ring and glow colour.
	pub fn color(&self) -> &'static str {
		match self {
			Self::Critical => "#ef4444",
			Self::High => "#f97316",
			Self::Medium => "#eab308",
			Self::Low => "#22c55e",
		}
	}

	/// Glow size relative to the node radius.
	pub fn glow(&self) -> f64 {
		match self {
			Self::Critical => 3.0,
			Self::High => 2.4,
			Self::Medium => 1.9,
			Self::Low => 1.5,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn impact_tiers_by_distance() {
		assert_eq!(ImpactLevel::from_distance(0), ImpactLevel::Critical);
		assert_eq!(ImpactLevel::from_distance(1), ImpactLevel::High);
		assert_eq!(ImpactLevel::from_distance(2), ImpactLevel::Medium);
		assert_eq!(ImpactLevel::from_distance(3), ImpactLevel::Low);
		assert_eq!(ImpactLevel::from_distance(40), ImpactLevel::Low);
	}

	#[test]
	fn complexity_thresholds() {
		assert_eq!(complexity_color(3.0), "#22c55e");
		assert_eq!(complexity_color(10.0), "#22c55e");
		assert_eq!(complexity_color(10.5), "#eab308");
		assert_eq!(complexity_color(15.0), "#eab308");
		assert_eq!(complexity_color(16.0), "#ef4444");
	}

	#[test]
	fn edge_width_is_capped() {
		assert_eq!(edge_width(None), 2.0);
		assert_eq!(edge_width(Some(0.5)), 1.5);
		assert_eq!(edge_width(Some(9.0)), 4.0);
	}
}
