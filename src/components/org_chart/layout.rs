//! Node placement. Both strategies are pure: the same nodes, edges and options always
//! give the same positions, and every input node gets one.

use std::collections::{BTreeMap, HashMap};
use std::f64::consts::{FRAC_PI_2, TAU};

use serde::Deserialize;

use super::types::{GraphEdge, GraphNode, UnitKind};

/// Top-left corner of a node in world coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Left edge.
	pub x: f64,
	/// Top edge.
	pub y: f64,
}

/// Top-left anchor per node id.
pub type Positions = HashMap<String, Point>;

/// Measured size of the render surface. Zero means "not measured yet".
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Extent {
	/// Horizontal size.
	pub width: f64,
	/// Vertical size.
	pub height: f64,
}

impl Extent {
	/// An extent of the given size.
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// Each side raised to at least `min`.
	pub fn at_least(self, min: f64) -> Self {
		Self {
			width: self.width.max(min),
			height: self.height.max(min),
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
	/// Concentric rings by depth.
	#[default]
	Radial,
	/// Top-to-bottom ranks by depth.
	#[serde(rename = "tree", alias = "layered")]
	Layered,
}

impl LayoutKind {
	/// The strategy implementing this layout.
	pub fn strategy(self) -> &'static dyn LayoutStrategy {
		match self {
			LayoutKind::Radial => &RadialLayout,
			LayoutKind::Layered => &LayeredLayout,
		}
	}

	/// Name shown on the layout switch.
	pub fn label(self) -> &'static str {
		match self {
			LayoutKind::Radial => "Radial",
			LayoutKind::Layered => "Tree",
		}
	}

	/// The other layout.
	pub fn toggled(self) -> Self {
		match self {
			LayoutKind::Radial => LayoutKind::Layered,
			LayoutKind::Layered => LayoutKind::Radial,
		}
	}
}

/// Node sizes and spacing shared by both layouts.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
	/// Width of every node.
	pub node_width: f64,
	/// Height of director cards.
	pub director_height: f64,
	/// Height of pillar cards.
	pub pillar_height: f64,
	/// Height of team cards.
	pub team_height: f64,
	/// Gap kept between neighbours on a ring.
	pub ring_margin: f64,
	/// Horizontal gap between nodes of one rank.
	pub node_sep: f64,
	/// Vertical gap between ranks.
	pub rank_sep: f64,
	/// Left margin of the tree layout.
	pub margin_x: f64,
	/// Top margin of the tree layout.
	pub margin_y: f64,
	/// Used in place of unmeasured or tiny viewport sides.
	pub min_extent: f64,
	/// Measured surface size; set by the controller, never read from documents.
	#[serde(skip)]
	pub viewport: Extent,
}

impl Default for LayoutOptions {
	fn default() -> Self {
		Self {
			node_width: 220.0,
			director_height: 96.0,
			pillar_height: 88.0,
			team_height: 80.0,
			ring_margin: 24.0,
			node_sep: 50.0,
			rank_sep: 90.0,
			margin_x: 20.0,
			margin_y: 20.0,
			min_extent: 300.0,
			viewport: Extent::default(),
		}
	}
}

impl LayoutOptions {
	/// Width and height of a node of `kind`.
	pub fn node_size(&self, kind: UnitKind) -> (f64, f64) {
		let height = match kind {
			UnitKind::Director => self.director_height,
			UnitKind::Pillar => self.pillar_height,
			UnitKind::Team => self.team_height,
		};
		(self.node_width, height)
	}

	fn tallest_node(&self) -> f64 {
		self.director_height
			.max(self.pillar_height)
			.max(self.team_height)
	}
}

/// Assigns a position to every node; pure and deterministic.
pub trait LayoutStrategy {
	fn layout(
		&self,
		nodes: &[GraphNode],
		edges: &[GraphEdge],
		options: &LayoutOptions,
	) -> Positions;
}

/// Runs the strategy selected by `kind`.
pub fn layout(
	kind: LayoutKind,
	nodes: &[GraphNode],
	edges: &[GraphEdge],
	options: &LayoutOptions,
) -> Positions {
	kind.strategy().layout(nodes, edges, options)
}

/// Smallest ring radius at which `count` nodes fit side by side without overlapping.
pub fn spacing_radius(count: usize, options: &LayoutOptions) -> f64 {
	count as f64 * (options.node_width + options.ring_margin) / TAU
}

/// Concentric rings by depth around the roots.
pub struct RadialLayout;

impl LayoutStrategy for RadialLayout {
	fn layout(&self, nodes: &[GraphNode], _: &[GraphEdge], options: &LayoutOptions) -> Positions {
		let mut rings: BTreeMap<usize, Vec<&GraphNode>> = BTreeMap::new();
		for node in nodes {
			rings.entry(node.depth).or_default().push(node);
		}

		let extent = options.viewport.at_least(options.min_extent);
		let (cx, cy) = (extent.width / 2.0, extent.height / 2.0);
		let short_side = extent.width.min(extent.height);
		let base_radius = short_side / 5.0;
		let ring_gap = (options.tallest_node() + options.ring_margin).max(short_side / 7.0);

		let mut positions = Positions::with_capacity(nodes.len());
		for (depth, ring) in rings {
			// rings are never empty, so count >= 1
			let count = ring.len();
			let radius =
				(base_radius + depth as f64 * ring_gap).max(spacing_radius(count, options));
			let step = TAU / count as f64;
			for (i, node) in ring.into_iter().enumerate() {
				let angle = -FRAC_PI_2 + i as f64 * step;
				let (w, h) = options.node_size(node.display.kind);
				positions.insert(
					node.id.clone(),
					Point {
						x: cx + radius * angle.cos() - w / 2.0,
						y: cy + radius * angle.sin() - h / 2.0,
					},
				);
			}
		}
		positions
	}
}

/// Ordering passes over the ranks.
const ORDER_PASSES: usize = 2;

/// Top-down ranks with crossing-reducing order.
pub struct LayeredLayout;

impl LayoutStrategy for LayeredLayout {
	fn layout(
		&self,
		nodes: &[GraphNode],
		edges: &[GraphEdge],
		options: &LayoutOptions,
	) -> Positions {
		if nodes.is_empty() {
			return Positions::new();
		}

		let slot: HashMap<&str, usize> = nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.as_str(), i))
			.collect();
		let mut parents: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
		let mut children: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
		for edge in edges {
			let source = slot.get(edge.source.as_str());
			if let (Some(&s), Some(&t)) = (source, slot.get(edge.target.as_str())) {
				parents[t].push(s);
				children[s].push(t);
			}
		}

		let mut by_depth: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
		for (i, node) in nodes.iter().enumerate() {
			by_depth.entry(node.depth).or_default().push(i);
		}
		let mut ranks: Vec<Vec<usize>> = by_depth.into_values().collect();
		order_ranks(&mut ranks, &parents);

		let sizes: Vec<(f64, f64)> = nodes
			.iter()
			.map(|n| options.node_size(n.display.kind))
			.collect();
		let mut centers = vec![0.0; nodes.len()];

		// downward: children under the barycenter of their parents
		for rank in &ranks {
			let desired: Vec<f64> = rank
				.iter()
				.map(|&i| mean(parents[i].iter().map(|&p| centers[p])).unwrap_or(f64::NEG_INFINITY))
				.collect();
			sweep(rank, &desired, &sizes, options.node_sep, &mut centers);
		}
		// upward: parents over the barycenter of their children
		for rank in ranks.iter().rev().skip(1) {
			let desired: Vec<f64> = rank
				.iter()
				.map(|&i| mean(children[i].iter().map(|&c| centers[c])).unwrap_or(centers[i]))
				.collect();
			sweep(rank, &desired, &sizes, options.node_sep, &mut centers);
		}

		let min_left = centers
			.iter()
			.zip(&sizes)
			.map(|(c, (w, _))| c - w / 2.0)
			.fold(f64::INFINITY, f64::min);
		let shift = options.margin_x - min_left;

		let mut positions = Positions::with_capacity(nodes.len());
		let mut top = options.margin_y;
		for rank in &ranks {
			let row_height = rank.iter().map(|&i| sizes[i].1).fold(0.0, f64::max);
			for &i in rank {
				let (w, h) = sizes[i];
				positions.insert(
					nodes[i].id.clone(),
					Point {
						x: centers[i] - w / 2.0 + shift,
						// shorter nodes sit centered in the row
						y: top + (row_height - h) / 2.0,
					},
				);
			}
			top += row_height + options.rank_sep;
		}
		positions
	}
}

/// Barycenter crossing reduction: each rank is sorted by the mean order of its parents in
/// the rank above. The sort is stable, so ties keep source order and nodes without a
/// parent stay at the end.
fn order_ranks(ranks: &mut [Vec<usize>], parents: &[Vec<usize>]) {
	let mut order: HashMap<usize, usize> = HashMap::new();
	for _ in 0..ORDER_PASSES {
		for r in 0..ranks.len() {
			if r > 0 {
				let score = |i: &usize| {
					mean(parents[*i].iter().filter_map(|p| order.get(p).map(|&o| o as f64)))
						.unwrap_or(f64::INFINITY)
				};
				ranks[r].sort_by(|a, b| score(a).total_cmp(&score(b)));
			}
			for (pos, &i) in ranks[r].iter().enumerate() {
				order.insert(i, pos);
			}
		}
	}
}

/// Places one rank left to right, each node as close to its desired center as the
/// separation from its left neighbour allows.
fn sweep(rank: &[usize], desired: &[f64], sizes: &[(f64, f64)], sep: f64, centers: &mut [f64]) {
	let mut right_edge = f64::NEG_INFINITY;
	for (&i, &want) in rank.iter().zip(desired) {
		let half = sizes[i].0 / 2.0;
		let earliest = if right_edge.is_finite() {
			right_edge + sep + half
		} else {
			half
		};
		let center = if want.is_finite() { want.max(earliest) } else { earliest };
		centers[i] = center;
		right_edge = center + half;
	}
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
	let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
	(count > 0).then(|| sum / count as f64)
}
