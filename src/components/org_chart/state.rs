use super::controller::ViewController;
use super::viewport::{
	Bounds, Rect, ViewportAnimation, ViewportCommand, ViewportTransform, center_transform,
	fit_transform,
};

/// Side of the expand/collapse box in a node's top-right corner.
pub const TOGGLE_SIZE: f64 = 22.0;
/// Pointer travel (screen px) below which a press counts as a click.
pub const CLICK_SLOP: f64 = 4.0;
const GLOW_SECONDS: f64 = 1.6;
const WHEEL_ZOOM_STEP: f64 = 1.1;
const BUTTON_ZOOM_STEP: f64 = 1.2;
const MINIMAP_WIDTH: f64 = 180.0;
const MINIMAP_HEIGHT: f64 = 120.0;
const MINIMAP_MARGIN: f64 = 12.0;

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Two-finger gesture: zoom follows the finger spread, pan follows their midpoint.
#[derive(Clone, Debug, Default)]
pub struct PinchState {
	pub active: bool,
	pub start_distance: f64,
	pub start_mid: (f64, f64),
	pub transform_start: ViewportTransform,
}

/// Fading highlight on the unit a search centered on.
#[derive(Clone, Debug, Default)]
pub struct GlowState {
	pub unit: Option<String>,
	pub t: f64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PointerTarget {
	Toggle(String),
	Node(String),
	Background,
}

/// Render-surface state: pointer interaction, running viewport animation, surface size.
pub struct CanvasState {
	pub pan: PanState,
	pub pinch: PinchState,
	/// The press started on the minimap; moves recenter the view.
	pub minimap_drag: bool,
	pub hover: Option<String>,
	pub glow: GlowState,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
	animation: Option<ViewportAnimation>,
}

/// Where the minimap sits on screen and how it maps the world into itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Minimap {
	pub frame: Rect,
	pub world: Bounds,
	pub scale: f64,
}

impl Minimap {
	pub fn project(&self, r: Rect) -> Rect {
		Rect {
			x: self.frame.x + (r.x - self.world.min_x) * self.scale,
			y: self.frame.y + (r.y - self.world.min_y) * self.scale,
			width: r.width * self.scale,
			height: r.height * self.scale,
		}
	}

	pub fn to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			self.world.min_x + (sx - self.frame.x) / self.scale,
			self.world.min_y + (sy - self.frame.y) / self.scale,
		)
	}
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
	((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

fn midpoint(a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
	((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0)
}

pub fn toggle_rect(node: &Rect) -> Rect {
	Rect {
		x: node.x + node.width - TOGGLE_SIZE - 6.0,
		y: node.y + 6.0,
		width: TOGGLE_SIZE,
		height: TOGGLE_SIZE,
	}
}

impl CanvasState {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			pan: PanState::default(),
			pinch: PinchState::default(),
			minimap_drag: false,
			hover: None,
			glow: GlowState::default(),
			width,
			height,
			flow_time: 0.0,
			animation: None,
		}
	}

	pub fn target_at(&self, ctl: &ViewController, sx: f64, sy: f64) -> PointerTarget {
		let (wx, wy) = ctl.viewport().screen_to_world(sx, sy);
		match ctl.node_at(wx, wy) {
			Some((node, rect))
				if node.display.expandable && toggle_rect(&rect).contains(wx, wy) =>
			{
				PointerTarget::Toggle(node.id.clone())
			}
			Some((node, _)) => PointerTarget::Node(node.id.clone()),
			None => PointerTarget::Background,
		}
	}

	pub fn begin_pan(&mut self, ctl: &ViewController, x: f64, y: f64) {
		let t = ctl.viewport();
		self.pan = PanState {
			active: true,
			moved: false,
			start_x: x,
			start_y: y,
			transform_start_x: t.x,
			transform_start_y: t.y,
		};
	}

	pub fn pan_to(&mut self, ctl: &mut ViewController, x: f64, y: f64) {
		if !self.pan.active {
			return;
		}
		let (dx, dy) = (x - self.pan.start_x, y - self.pan.start_y);
		if !self.pan.moved && (dx * dx + dy * dy).sqrt() < CLICK_SLOP {
			return;
		}
		self.pan.moved = true;
		self.animation = None;
		ctl.set_viewport(ViewportTransform {
			x: self.pan.transform_start_x + dx,
			y: self.pan.transform_start_y + dy,
			k: ctl.viewport().k,
		});
	}

	/// Ends a press; true when it was a click rather than a drag.
	pub fn end_pan(&mut self) -> bool {
		let click = self.pan.active && !self.pan.moved;
		self.pan = PanState::default();
		self.minimap_drag = false;
		click
	}

	pub fn begin_pinch(&mut self, ctl: &ViewController, a: (f64, f64), b: (f64, f64)) {
		self.pan = PanState::default();
		self.animation = None;
		self.pinch = PinchState {
			active: true,
			start_distance: distance(a, b),
			start_mid: midpoint(a, b),
			transform_start: ctl.viewport(),
		};
	}

	pub fn pinch_to(&mut self, ctl: &mut ViewController, a: (f64, f64), b: (f64, f64)) {
		if !self.pinch.active || self.pinch.start_distance <= 0.0 {
			return;
		}
		let factor = distance(a, b) / self.pinch.start_distance;
		let (sx, sy) = self.pinch.start_mid;
		let (mx, my) = midpoint(a, b);
		let (min_k, max_k) = (ctl.config().min_zoom, ctl.config().max_zoom);
		let zoomed = self
			.pinch
			.transform_start
			.zoom_around(sx, sy, factor, min_k, max_k);
		ctl.set_viewport(ViewportTransform {
			x: zoomed.x + mx - sx,
			y: zoomed.y + my - sy,
			k: zoomed.k,
		});
	}

	pub fn end_pinch(&mut self) {
		self.pinch = PinchState::default();
	}

	/// One step of the zoom buttons, about the surface center.
	pub fn zoom_step(&mut self, ctl: &mut ViewController, zoom_in: bool) {
		let factor = if zoom_in {
			BUTTON_ZOOM_STEP
		} else {
			1.0 / BUTTON_ZOOM_STEP
		};
		let (min_k, max_k) = (ctl.config().min_zoom, ctl.config().max_zoom);
		self.animation = None;
		let (cx, cy) = (self.width / 2.0, self.height / 2.0);
		ctl.set_viewport(ctl.viewport().zoom_around(cx, cy, factor, min_k, max_k));
	}

	/// Minimap geometry for the current content and viewport; `None` when there is
	/// nothing to show or the surface is too small to hold it.
	pub fn minimap(&self, ctl: &ViewController) -> Option<Minimap> {
		let bounds = ctl.content_bounds()?;
		let frame = Rect {
			x: self.width - MINIMAP_WIDTH - MINIMAP_MARGIN,
			y: self.height - MINIMAP_HEIGHT - MINIMAP_MARGIN,
			width: MINIMAP_WIDTH,
			height: MINIMAP_HEIGHT,
		};
		if frame.x < 0.0 || frame.y < 0.0 {
			return None;
		}
		let view = ctl.viewport();
		let (vx0, vy0) = view.screen_to_world(0.0, 0.0);
		let (vx1, vy1) = view.screen_to_world(self.width, self.height);
		let world = Bounds {
			min_x: bounds.min_x.min(vx0),
			min_y: bounds.min_y.min(vy0),
			max_x: bounds.max_x.max(vx1),
			max_y: bounds.max_y.max(vy1),
		};
		let scale = (frame.width / world.width().max(1.0))
			.min(frame.height / world.height().max(1.0));
		Some(Minimap {
			frame,
			world,
			scale,
		})
	}

	/// Starts a minimap drag when the press lands on it. Returns false otherwise.
	pub fn begin_minimap(&mut self, ctl: &mut ViewController, x: f64, y: f64) -> bool {
		let on_map = self
			.minimap(ctl)
			.is_some_and(|map| map.frame.contains(x, y));
		if on_map {
			self.minimap_drag = true;
			self.minimap_to(ctl, x, y);
		}
		on_map
	}

	/// Centers the view on the world point under the minimap position, keeping the zoom.
	pub fn minimap_to(&mut self, ctl: &mut ViewController, x: f64, y: f64) {
		let Some(map) = self.minimap(ctl) else {
			return;
		};
		let (wx, wy) = map.to_world(x, y);
		self.animation = None;
		let k = ctl.viewport().k;
		ctl.set_viewport(center_transform(wx, wy, k, self.width, self.height));
	}

	pub fn zoom_at(&mut self, ctl: &mut ViewController, x: f64, y: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 {
			1.0 / WHEEL_ZOOM_STEP
		} else {
			WHEEL_ZOOM_STEP
		};
		let (min_k, max_k) = (ctl.config().min_zoom, ctl.config().max_zoom);
		self.animation = None;
		ctl.set_viewport(ctl.viewport().zoom_around(x, y, factor, min_k, max_k));
	}

	/// Starts the transition for `command`, replacing any running one.
	pub fn apply_command(&mut self, command: ViewportCommand, ctl: &ViewController) {
		let config = ctl.config();
		let target = match &command {
			ViewportCommand::FitAll { padding, .. } => {
				let Some(bounds) = ctl.content_bounds() else {
					return;
				};
				fit_transform(
					&bounds,
					self.width,
					self.height,
					*padding,
					config.min_zoom,
					config.max_zoom,
				)
			}
			ViewportCommand::Center { x, y, zoom, .. } => {
				self.glow = GlowState {
					unit: ctl.focused().map(str::to_owned),
					t: 1.0,
				};
				center_transform(*x, *y, *zoom, self.width, self.height)
			}
		};
		self.animation = Some(ViewportAnimation::new(
			ctl.viewport(),
			target,
			command.duration_ms(),
		));
	}

	/// Advances one frame of `dt` seconds.
	pub fn tick(&mut self, dt: f64, ctl: &mut ViewController) {
		if let Some(command) = ctl.take_command() {
			self.apply_command(command, ctl);
		}
		if let Some(animation) = self.animation.as_mut() {
			ctl.set_viewport(animation.advance(dt * 1000.0));
			if animation.finished() {
				self.animation = None;
			}
		}
		if self.glow.unit.is_some() {
			self.glow.t -= dt / GLOW_SECONDS;
			if self.glow.t <= 0.0 {
				self.glow = GlowState::default();
			}
		}
		self.flow_time += dt;
	}

	pub fn is_animating(&self) -> bool {
		self.animation.is_some()
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}
