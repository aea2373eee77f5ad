use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::scene::MapScene;
use super::state::MapViewState;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn window_size(window: &Window) -> (f64, f64) {
	(
		window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0),
		window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0),
	)
}

fn local_position(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(client_x as f64 - rect.left(), client_y as f64 - rect.top())
}

#[component]
pub fn MapView(
	#[prop(into)] scene: Signal<MapScene>,
	#[prop(default = false)] fullscreen: bool,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<MapViewState>>> = Rc::new(RefCell::new(None));
	let animate: FrameCallback = Rc::new(RefCell::new(None));
	let resize_cb: FrameCallback = Rc::new(RefCell::new(None));
	let mounted = Arc::new(AtomicBool::new(true));

	let mounted_cleanup = mounted.clone();
	on_cleanup(move || mounted_cleanup.store(false, Ordering::Relaxed));

	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window)
		} else {
			canvas
				.parent_element()
				.map(|p| (p.client_width() as f64, p.client_height() as f64))
				.unwrap_or((800.0, 600.0))
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			log::error!("canvas has no 2d context");
			return;
		};

		let mut initial = MapViewState::new(w, h);
		initial.set_scene(scene.get_untracked());
		*state_init.borrow_mut() = Some(initial);

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner, resize_inner, mounted_anim) = (
			state_init.clone(),
			animate_init.clone(),
			resize_cb_init.clone(),
			mounted.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			if !mounted_anim.load(Ordering::Relaxed) {
				debug!("map view unmounted, stopping render loop");
				if let Some(cb) = resize_inner.borrow_mut().take() {
					let _ = win
						.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
				state_anim.borrow_mut().take();
				// Still running here, so it is leaked instead of dropped.
				if let Some(cb) = animate_inner.borrow_mut().take() {
					cb.forget();
				}
				return;
			}
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(0.016);
				render::render(s, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_scene = state.clone();
	Effect::new(move |_| {
		let next = scene.get();
		if let Some(ref mut s) = *state_scene.borrow_mut() {
			if s.set_scene(next) {
				debug!("viewport fitted to new geometry");
			}
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_position(&canvas, ev.client_x(), ev.client_y());
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pan.active = true;
			s.pan.start_x = x;
			s.pan.start_y = y;
			s.pan.transform_start_x = s.transform.x;
			s.pan.transform_start_y = s.transform.y;
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_position(&canvas, ev.client_x(), ev.client_y());
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.pan.active {
				s.transform.x = s.pan.transform_start_x + (x - s.pan.start_x);
				s.transform.y = s.pan.transform_start_y + (y - s.pan.start_y);
			} else {
				s.hover = s.node_at_position(x, y);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.pan.active = false;
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pan.active = false;
			s.hover = None;
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = local_position(&canvas, ev.client_x(), ev.client_y());
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.zoom_at(x, y, factor);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="map-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
