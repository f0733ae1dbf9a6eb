use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent, TouchList, WheelEvent,
	Window,
};

use super::controller::ViewController;
use super::render;
use super::state::{CanvasState, PointerTarget};

/// Fallback size for a canvas whose container has not been laid out yet.
const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);

type SharedState = Rc<RefCell<Option<CanvasState>>>;
type SharedController = Rc<RefCell<ViewController>>;

/// Size of the canvas's container.
fn measure(canvas: &HtmlCanvasElement) -> (f64, f64) {
	let parent = canvas.parent_element();
	let from_parent = |f: fn(&web_sys::Element) -> i32, fallback: f64| {
		parent
			.as_ref()
			.map(|p| f(p) as f64)
			.filter(|v| *v > 0.0)
			.unwrap_or(fallback)
	};
	(
		from_parent(web_sys::Element::client_width, FALLBACK_SIZE.0),
		from_parent(web_sys::Element::client_height, FALLBACK_SIZE.1),
	)
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn touch_points(canvas_ref: NodeRef<leptos::html::Canvas>, touches: &TouchList) -> Vec<(f64, f64)> {
	let Some(canvas) = canvas_ref.get() else {
		return Vec::new();
	};
	let canvas: HtmlCanvasElement = canvas.into();
	let rect = canvas.get_bounding_client_rect();
	(0..touches.length())
		.filter_map(|i| touches.get(i))
		.map(|t| {
			(
				t.client_x() as f64 - rect.left(),
				t.client_y() as f64 - rect.top(),
			)
		})
		.collect()
}

/// Applies a click or tap that did not turn into a drag.
fn dispatch_click(
	s: &CanvasState,
	ctl: &SharedController,
	selected: RwSignal<Option<String>>,
	x: f64,
	y: f64,
) {
	let target = s.target_at(&ctl.borrow(), x, y);
	match target {
		PointerTarget::Toggle(id) => {
			ctl.borrow_mut().toggle_expand(&id);
		}
		PointerTarget::Node(id) => {
			ctl.borrow_mut().select_node(Some(&id));
			selected.set(Some(id));
		}
		PointerTarget::Background => {
			ctl.borrow_mut().select_node(None);
			selected.set(None);
		}
	}
}

/// A press at `(x, y)`: drags the minimap when it lands there, pans otherwise.
fn press(s: &mut CanvasState, ctl: &SharedController, x: f64, y: f64) {
	let mut ctl = ctl.borrow_mut();
	if !s.begin_minimap(&mut ctl, x, y) {
		s.begin_pan(&ctl, x, y);
	}
}

fn drag(s: &mut CanvasState, ctl: &SharedController, x: f64, y: f64) {
	let mut ctl = ctl.borrow_mut();
	if s.minimap_drag {
		s.minimap_to(&mut ctl, x, y);
	} else {
		s.pan_to(&mut ctl, x, y);
	}
}

/// Interactive org chart surface: draws the controller's graph every animation frame and
/// turns mouse and touch input into pan, zoom, selection and expand/collapse.
#[component]
pub fn OrgChartCanvas(
	controller: SharedController,
	selected: RwSignal<Option<String>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init, ctl_init) = (
		state.clone(),
		animate.clone(),
		resize_cb.clone(),
		controller.clone(),
	);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window): Option<Window> = web_sys::window() else {
			warn!("no window; org chart canvas not started");
			return;
		};

		let (w, h) = measure(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => return,
			},
			_ => {
				warn!("2d context unavailable; org chart canvas not started");
				return;
			}
		};
		*state_init.borrow_mut() = Some(CanvasState::new(w, h));
		ctl_init.borrow_mut().resize(w, h);
		debug!("org chart canvas started at {w}x{h}");

		let (state_resize, ctl_resize, canvas_resize) =
			(state_init.clone(), ctl_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = measure(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
			ctl_resize.borrow_mut().resize(nw, nh);
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, ctl_anim, animate_inner) =
			(state_init.clone(), ctl_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				let mut ctl = ctl_anim.borrow_mut();
				s.tick(0.016, &mut ctl);
				render::render(s, &ctl, &ctx);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let (state_md, ctl_md) = (state.clone(), controller.clone());
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			press(s, &ctl_md, x, y);
		}
	};

	let (state_mm, ctl_mm) = (state.clone(), controller.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.pan.active || s.minimap_drag {
				drag(s, &ctl_mm, x, y);
			} else {
				s.hover = match s.target_at(&ctl_mm.borrow(), x, y) {
					PointerTarget::Toggle(id) | PointerTarget::Node(id) => Some(id),
					PointerTarget::Background => None,
				};
			}
		}
	};

	let (state_mu, ctl_mu) = (state.clone(), controller.clone());
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let mut guard = state_mu.borrow_mut();
		let Some(s) = guard.as_mut() else {
			return;
		};
		if s.end_pan() {
			dispatch_click(s, &ctl_mu, selected, x, y);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.end_pan();
			s.hover = None;
		}
	};

	let (state_wh, ctl_wh) = (state.clone(), controller.clone());
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.zoom_at(&mut ctl_wh.borrow_mut(), x, y, ev.delta_y());
		}
	};

	let (state_ts, ctl_ts) = (state.clone(), controller.clone());
	let on_touchstart = move |ev: TouchEvent| {
		ev.prevent_default();
		let points = touch_points(canvas_ref, &ev.touches());
		if let Some(ref mut s) = *state_ts.borrow_mut() {
			match points.as_slice() {
				[a, b, ..] => s.begin_pinch(&ctl_ts.borrow(), *a, *b),
				[(x, y)] => press(s, &ctl_ts, *x, *y),
				[] => {}
			}
		}
	};

	let (state_tm, ctl_tm) = (state.clone(), controller.clone());
	let on_touchmove = move |ev: TouchEvent| {
		ev.prevent_default();
		let points = touch_points(canvas_ref, &ev.touches());
		if let Some(ref mut s) = *state_tm.borrow_mut() {
			match points.as_slice() {
				[a, b, ..] if s.pinch.active => s.pinch_to(&mut ctl_tm.borrow_mut(), *a, *b),
				[(x, y)] => drag(s, &ctl_tm, *x, *y),
				_ => {}
			}
		}
	};

	let (state_te, ctl_te) = (state.clone(), controller.clone());
	let on_touchend = move |ev: TouchEvent| {
		let remaining = touch_points(canvas_ref, &ev.touches());
		let lifted = touch_points(canvas_ref, &ev.changed_touches());
		let mut guard = state_te.borrow_mut();
		let Some(s) = guard.as_mut() else {
			return;
		};
		if s.pinch.active {
			if remaining.len() < 2 {
				s.end_pinch();
				// the finger still down keeps panning from where it is
				if let [(x, y)] = remaining.as_slice() {
					s.begin_pan(&ctl_te.borrow(), *x, *y);
				}
			}
			return;
		}
		if remaining.is_empty() && s.end_pan() {
			if let Some(&(x, y)) = lifted.first() {
				dispatch_click(s, &ctl_te, selected, x, y);
			}
		}
	};

	let (state_zi, ctl_zi) = (state.clone(), controller.clone());
	let on_zoom_in = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_zi.borrow_mut() {
			s.zoom_step(&mut ctl_zi.borrow_mut(), true);
		}
	};
	let (state_zo, ctl_zo) = (state.clone(), controller.clone());
	let on_zoom_out = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_zo.borrow_mut() {
			s.zoom_step(&mut ctl_zo.borrow_mut(), false);
		}
	};

	let on_touchcancel = on_touchend.clone();

	view! {
		<div class="org-canvas-wrap">
			<canvas
				node_ref=canvas_ref
				class="org-chart-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				on:touchstart=on_touchstart
				on:touchmove=on_touchmove
				on:touchend=on_touchend
				on:touchcancel=on_touchcancel
				style="display: block; cursor: grab; touch-action: none;"
			/>
			<div class="org-zoom-controls">
				<button title="Zoom in" on:click=on_zoom_in>
					"+"
				</button>
				<button title="Zoom out" on:click=on_zoom_out>
					"\u{2212}"
				</button>
			</div>
		</div>
	}
}
