//! Seeded force-directed placement.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{LayoutResult, Position, finite, non_negative};
use crate::graph::error::{GraphError, Result};
use crate::graph::index::GraphIndex;

/// Radians between successive fallback directions for coincident nodes.
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Simulation parameters for the force-directed layout.
///
/// The same seed and iteration count always reproduce the same positions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForceOptions {
	/// Width of the box initial positions are sampled from.
	pub width: f64,
	/// Height of the box initial positions are sampled from.
	pub height: f64,
	/// Upper bound on simulation steps.
	pub iterations: usize,
	/// Pairwise push, divided by squared distance.
	pub repulsion: f64,
	/// Length springs pull (or push) edges toward.
	pub spring_length: f64,
	/// Pull per unit of stretch beyond `spring_length`.
	pub spring_strength: f64,
	/// Fraction of the offset to the box center removed per iteration.
	pub centering: f64,
	/// Largest distance a node may move in one iteration.
	pub max_step: f64,
	/// Seed of the initial placement.
	pub seed: u64,
	/// Stop once no node moves farther than this in an iteration.
	pub convergence_threshold: Option<f64>,
}

impl Default for ForceOptions {
	fn default() -> Self {
		Self {
			width: 2000.0,
			height: 1500.0,
			iterations: 100,
			repulsion: 500.0,
			spring_length: 150.0,
			spring_strength: 0.05,
			centering: 0.01,
			max_step: 100.0,
			seed: 0x5eed_c0de,
			convergence_threshold: None,
		}
	}
}

impl ForceOptions {
	/// Region every node is confined to: the sampling box grown by half its
	/// size on each side, i.e. twice its dimensions around the same center.
	pub fn containment(&self) -> (Position, Position) {
		(
			Position::new(-self.width / 2.0, -self.height / 2.0),
			Position::new(self.width * 1.5, self.height * 1.5),
		)
	}

	/// Rejects options that would make sampling or containment ill-formed.
	pub fn validate(&self) -> Result<()> {
		non_negative("width", self.width)?;
		non_negative("height", self.height)?;
		non_negative("maxStep", self.max_step)?;
		finite("repulsion", self.repulsion)?;
		finite("springLength", self.spring_length)?;
		finite("springStrength", self.spring_strength)?;
		finite("centering", self.centering)?;
		match self.convergence_threshold {
			Some(t) if t.is_nan() => Err(GraphError::InvalidOption {
				option: "convergenceThreshold",
				expected: "a number",
				value: t,
			}),
			_ => Ok(()),
		}
	}
}

/// Unit vector from `b` to `a` and their distance, floored at 1.
/// Coincident points get a direction derived from `salt`, so distinct pairs
/// stacked on one spot fan out instead of staying put.
fn separation(a: Position, b: Position, salt: usize) -> (f64, f64, f64) {
	let (dx, dy) = (a.x - b.x, a.y - b.y);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist == 0.0 {
		let angle = GOLDEN_ANGLE * salt as f64;
		(angle.cos(), angle.sin(), 1.0)
	} else {
		(dx / dist, dy / dist, dist.max(1.0))
	}
}

pub(super) fn place(index: &GraphIndex<'_>, options: &ForceOptions) -> LayoutResult {
	let n = index.len();
	let mut rng = StdRng::seed_from_u64(options.seed);
	let mut pos: Vec<Position> = (0..n)
		.map(|_| {
			Position::new(
				rng.gen_range(0.0..=options.width),
				rng.gen_range(0.0..=options.height),
			)
		})
		.collect();

	let springs: Vec<(usize, usize)> = index
		.edge_targets
		.iter()
		.enumerate()
		.flat_map(|(s, targets)| targets.iter().map(move |&t| (s, t)))
		.filter(|&(s, t)| s != t)
		.collect();

	let center = Position::new(options.width / 2.0, options.height / 2.0);
	let (lo, hi) = options.containment();
	let mut shift = vec![Position::default(); n];
	let mut ran = 0;

	for _ in 0..options.iterations {
		ran += 1;
		shift.iter_mut().for_each(|s| *s = Position::default());

		for a in 0..n {
			for b in (a + 1)..n {
				let (ux, uy, dist) = separation(pos[a], pos[b], a * n + b);
				let push = options.repulsion / (dist * dist);
				shift[a].x += ux * push;
				shift[a].y += uy * push;
				shift[b].x -= ux * push;
				shift[b].y -= uy * push;
			}
		}

		for &(s, t) in &springs {
			let (ux, uy, dist) = separation(pos[t], pos[s], s * n + t);
			let pull = (dist - options.spring_length) * options.spring_strength;
			shift[s].x += ux * pull;
			shift[s].y += uy * pull;
			shift[t].x -= ux * pull;
			shift[t].y -= uy * pull;
		}

		let mut largest = 0.0f64;
		for (p, s) in pos.iter_mut().zip(&shift) {
			let (mut dx, mut dy) = (
				s.x + (center.x - p.x) * options.centering,
				s.y + (center.y - p.y) * options.centering,
			);
			let len = (dx * dx + dy * dy).sqrt();
			if len > options.max_step {
				dx *= options.max_step / len;
				dy *= options.max_step / len;
			}
			p.x = (p.x + dx).clamp(lo.x, hi.x);
			p.y = (p.y + dy).clamp(lo.y, hi.y);
			largest = largest.max(len.min(options.max_step));
		}

		if options
			.convergence_threshold
			.is_some_and(|threshold| largest <= threshold)
		{
			break;
		}
	}
	log::debug!("force layout: {ran} iterations over {n} nodes, {} springs", springs.len());

	let positions: BTreeMap<String, Position> = pos
		.into_iter()
		.enumerate()
		.map(|(i, p)| (index.id(i).to_string(), p))
		.collect();
	LayoutResult::from_positions(positions)
}
