//! Viewport math: world/screen transform, fit and center targets, animated transitions.

/// Maps world coordinates to screen: `screen = world * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportTransform {
	/// Horizontal offset in screen pixels.
	pub x: f64,
	/// Vertical offset in screen pixels.
	pub y: f64,
	/// Zoom factor.
	pub k: f64,
}

impl Default for ViewportTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewportTransform {
	/// Inverse of [`Self::world_to_screen`].
	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Applies the transform to a world point.
	pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
		(wx * self.k + self.x, wy * self.k + self.y)
	}

	/// Zooms by `factor` keeping the screen point `(sx, sy)` fixed.
	pub fn zoom_around(&self, sx: f64, sy: f64, factor: f64, min_k: f64, max_k: f64) -> Self {
		let k = (self.k * factor).clamp(min_k, max_k);
		let ratio = k / self.k;
		Self {
			x: sx - (sx - self.x) * ratio,
			y: sy - (sy - self.y) * ratio,
			k,
		}
	}

	fn lerp(&self, to: &Self, t: f64) -> Self {
		Self {
			x: self.x + (to.x - self.x) * t,
			y: self.y + (to.y - self.y) * t,
			k: self.k + (to.k - self.k) * t,
		}
	}
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
	/// Left edge.
	pub x: f64,
	/// Top edge.
	pub y: f64,
	/// Horizontal size.
	pub width: f64,
	/// Vertical size.
	pub height: f64,
}

impl Rect {
	/// Edges count as inside.
	pub fn contains(&self, px: f64, py: f64) -> bool {
		px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
	}

	/// Midpoint.
	pub fn center(&self) -> (f64, f64) {
		(self.x + self.width / 2.0, self.y + self.height / 2.0)
	}
}

/// Axis-aligned box given by its extreme coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	/// Left edge.
	pub min_x: f64,
	/// Top edge.
	pub min_y: f64,
	/// Right edge.
	pub max_x: f64,
	/// Bottom edge.
	pub max_y: f64,
}

impl Bounds {
	/// Smallest bounds covering every rect, `None` for an empty input.
	pub fn enclosing(rects: impl IntoIterator<Item = Rect>) -> Option<Self> {
		rects.into_iter().fold(None, |acc, r| {
			let b = Bounds {
				min_x: r.x,
				min_y: r.y,
				max_x: r.x + r.width,
				max_y: r.y + r.height,
			};
			Some(match acc {
				None => b,
				Some(a) => Bounds {
					min_x: a.min_x.min(b.min_x),
					min_y: a.min_y.min(b.min_y),
					max_x: a.max_x.max(b.max_x),
					max_y: a.max_y.max(b.max_y),
				},
			})
		})
	}

	/// Horizontal extent.
	pub fn width(&self) -> f64 {
		self.max_x - self.min_x
	}

	/// Vertical extent.
	pub fn height(&self) -> f64 {
		self.max_y - self.min_y
	}

	/// Midpoint.
	pub fn center(&self) -> (f64, f64) {
		(
			(self.min_x + self.max_x) / 2.0,
			(self.min_y + self.max_y) / 2.0,
		)
	}
}

/// Imperative requests from the controller to the render surface.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewportCommand {
	/// Scale and pan so every visible node fits, with `padding` as a fraction of the extent.
	FitAll {
		/// Margin around the graph bounds, as a fraction.
		padding: f64,
		/// Transition length; zero jumps.
		duration_ms: f64,
	},
	/// Center the world point `(x, y)` at the given zoom.
	Center {
		/// World x of the new center.
		x: f64,
		/// World y of the new center.
		y: f64,
		/// Target scale.
		zoom: f64,
		/// Transition length; zero jumps.
		duration_ms: f64,
	},
}

impl ViewportCommand {
	/// Length of the transition the command asks for.
	pub fn duration_ms(&self) -> f64 {
		match self {
			ViewportCommand::FitAll { duration_ms, .. }
			| ViewportCommand::Center { duration_ms, .. } => *duration_ms,
		}
	}
}

/// Transform that fits `bounds` into a `width` x `height` screen.
pub fn fit_transform(
	bounds: &Bounds,
	width: f64,
	height: f64,
	padding: f64,
	min_k: f64,
	max_k: f64,
) -> ViewportTransform {
	let scale = 1.0 + padding.max(0.0);
	let kx = width / (bounds.width().max(1.0) * scale);
	let ky = height / (bounds.height().max(1.0) * scale);
	let (cx, cy) = bounds.center();
	center_transform(cx, cy, kx.min(ky).clamp(min_k, max_k), width, height)
}

pub fn center_transform(x: f64, y: f64, k: f64, width: f64, height: f64) -> ViewportTransform {
	ViewportTransform {
		x: width / 2.0 - x * k,
		y: height / 2.0 - y * k,
		k,
	}
}

pub fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Bounded-duration transition between two transforms.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewportAnimation {
	from: ViewportTransform,
	to: ViewportTransform,
	elapsed_ms: f64,
	duration_ms: f64,
}

impl ViewportAnimation {
	pub fn new(from: ViewportTransform, to: ViewportTransform, duration_ms: f64) -> Self {
		Self {
			from,
			to,
			elapsed_ms: 0.0,
			duration_ms: duration_ms.max(0.0),
		}
	}

	/// Advances by `dt_ms` and returns the transform for this frame.
	pub fn advance(&mut self, dt_ms: f64) -> ViewportTransform {
		self.elapsed_ms = (self.elapsed_ms + dt_ms).min(self.duration_ms);
		if self.duration_ms <= 0.0 {
			return self.to;
		}
		self.from
			.lerp(&self.to, ease_out_cubic(self.elapsed_ms / self.duration_ms))
	}

	pub fn finished(&self) -> bool {
		self.elapsed_ms >= self.duration_ms
	}

	pub fn target(&self) -> ViewportTransform {
		self.to
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-9
	}

	#[test]
	fn screen_world_roundtrip() {
		let t = ViewportTransform {
			x: 40.0,
			y: -10.0,
			k: 1.5,
		};
		let (wx, wy) = t.screen_to_world(100.0, 200.0);
		let (sx, sy) = t.world_to_screen(wx, wy);
		assert!(close(sx, 100.0) && close(sy, 200.0));
	}

	#[test]
	fn zoom_keeps_anchor_fixed_and_clamps() {
		let t = ViewportTransform::default();
		let z = t.zoom_around(300.0, 200.0, 1.1, 0.7, 2.0);
		let before = t.screen_to_world(300.0, 200.0);
		let after = z.screen_to_world(300.0, 200.0);
		assert!(close(before.0, after.0) && close(before.1, after.1));
		assert_eq!(t.zoom_around(0.0, 0.0, 100.0, 0.7, 2.0).k, 2.0);
	}

	#[test]
	fn fit_centers_bounds_with_padding() {
		let bounds = Bounds {
			min_x: 0.0,
			min_y: 0.0,
			max_x: 1000.0,
			max_y: 500.0,
		};
		let t = fit_transform(&bounds, 1000.0, 1000.0, 0.15, 0.1, 10.0);
		assert!(close(t.k, 1.0 / 1.15));
		let (sx, sy) = t.world_to_screen(500.0, 250.0);
		assert!(close(sx, 500.0) && close(sy, 500.0));
	}

	#[test]
	fn degenerate_bounds_do_not_divide_by_zero() {
		let bounds = Bounds {
			min_x: 5.0,
			min_y: 5.0,
			max_x: 5.0,
			max_y: 5.0,
		};
		let t = fit_transform(&bounds, 800.0, 600.0, 0.15, 0.7, 2.0);
		assert!(t.k.is_finite());
		assert_eq!(t.k, 2.0);
	}

	#[test]
	fn enclosing_empty_is_none() {
		assert!(Bounds::enclosing(Vec::new()).is_none());
	}

	#[test]
	fn animation_reaches_target() {
		let to = ViewportTransform {
			x: 100.0,
			y: 50.0,
			k: 2.0,
		};
		let mut anim = ViewportAnimation::new(ViewportTransform::default(), to, 400.0);
		let mid = anim.advance(200.0);
		assert!(mid.k > 1.0 && mid.k < 2.0);
		assert!(!anim.finished());
		assert_eq!(anim.advance(500.0), to);
		assert!(anim.finished());
	}
}
