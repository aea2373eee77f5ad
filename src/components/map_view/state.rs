use crate::geo::{self, Bounds};
use crate::types::{LatLng, NodeId};

use super::scene::MapScene;

pub const NODE_RADIUS: f64 = 4.0;
pub const HIT_RADIUS: f64 = 10.0;
/// Pixels per degree.
pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 2_000_000.0;
const INITIAL_ZOOM: f64 = 20_000.0;
/// Share of the canvas a fitted region may fill.
const FIT_PADDING: f64 = 0.85;

/// Screen = world * k + (x, y), with world = (lng, -lat).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

pub struct MapViewState {
	pub scene: MapScene,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub hover: Option<NodeId>,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
	fitted: Option<Bounds>,
}

impl MapViewState {
	pub fn new(width: f64, height: f64) -> Self {
		let mut state = Self {
			scene: MapScene::default(),
			transform: ViewTransform::default(),
			pan: PanState::default(),
			hover: None,
			width,
			height,
			flow_time: 0.0,
			fitted: None,
		};
		state.center_on(geo::CENTER, INITIAL_ZOOM);
		state
	}

	pub fn to_screen(&self, p: LatLng) -> (f64, f64) {
		(
			p.lng * self.transform.k + self.transform.x,
			-p.lat * self.transform.k + self.transform.y,
		)
	}

	pub fn to_geo(&self, sx: f64, sy: f64) -> LatLng {
		LatLng::new(
			-(sy - self.transform.y) / self.transform.k,
			(sx - self.transform.x) / self.transform.k,
		)
	}

	fn center_on(&mut self, center: LatLng, k: f64) {
		self.transform = ViewTransform {
			x: self.width / 2.0 - center.lng * k,
			y: self.height / 2.0 + center.lat * k,
			k,
		};
	}

	pub fn fit(&mut self, bounds: Bounds) {
		let (lng_span, lat_span) = (bounds.lng_span(), bounds.lat_span());
		let k = if lng_span <= 0.0 && lat_span <= 0.0 {
			MAX_ZOOM / 100.0
		} else {
			let kx = if lng_span > 0.0 { self.width * FIT_PADDING / lng_span } else { f64::INFINITY };
			let ky = if lat_span > 0.0 { self.height * FIT_PADDING / lat_span } else { f64::INFINITY };
			kx.min(ky)
		};
		self.center_on(bounds.center(), k.clamp(MIN_ZOOM, MAX_ZOOM));
		self.fitted = Some(bounds);
	}

	/// Installs a new scene and re-fits only when its fit target moved, so
	/// user pan/zoom survives refreshes with identical geometry.
	pub fn set_scene(&mut self, scene: MapScene) -> bool {
		let target = scene.fit_target();
		self.scene = scene;
		if let Some(hovered) = &self.hover {
			if !self.scene.nodes.iter().any(|n| &n.id == hovered) {
				self.hover = None;
			}
		}
		match target {
			Some(bounds) if self.fitted != Some(bounds) => {
				self.fit(bounds);
				true
			}
			_ => false,
		}
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<NodeId> {
		self.scene
			.nodes
			.iter()
			.map(|n| {
				let (x, y) = self.to_screen(n.at);
				(n, (x - sx).hypot(y - sy))
			})
			.filter(|(_, d)| *d < HIT_RADIUS)
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(n, _)| n.id.clone())
	}

	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn tick(&mut self, dt: f64) {
		self.flow_time += dt;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::{CostVector, Graph, Node, RouteGeometry, RouteResult};

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-6
	}

	fn route_scene(points: Vec<LatLng>) -> MapScene {
		let route = RouteResult {
			geometry: RouteGeometry::ByPoints(points),
			stats: CostVector::default(),
		};
		MapScene::build(&Graph::default(), Some(&route))
	}

	#[test]
	fn screen_and_geo_are_inverse() {
		let state = MapViewState::new(800.0, 600.0);
		let p = LatLng::new(40.75, -73.99);
		let (x, y) = state.to_screen(p);
		let back = state.to_geo(x, y);
		assert!(close(back.lat, p.lat) && close(back.lng, p.lng));
		let (cx, cy) = state.to_screen(geo::CENTER);
		assert!(close(cx, 400.0) && close(cy, 300.0));
	}

	#[test]
	fn fitting_puts_route_inside_canvas() {
		let mut state = MapViewState::new(800.0, 600.0);
		let pts = vec![LatLng::new(51.50, -0.09), LatLng::new(51.51, -0.08)];
		assert!(state.set_scene(route_scene(pts.clone())));
		for p in pts {
			let (x, y) = state.to_screen(p);
			assert!((0.0..=800.0).contains(&x) && (0.0..=600.0).contains(&y));
		}
	}

	#[test]
	fn same_geometry_does_not_undo_user_pan() {
		let mut state = MapViewState::new(800.0, 600.0);
		let pts = vec![LatLng::new(51.50, -0.09), LatLng::new(51.51, -0.08)];
		state.set_scene(route_scene(pts.clone()));
		state.transform.x += 120.0;
		state.zoom_at(10.0, 10.0, 1.1);
		let panned = state.transform.clone();

		assert!(!state.set_scene(route_scene(pts)));
		assert_eq!(state.transform, panned);
	}

	#[test]
	fn empty_scene_leaves_viewport_alone() {
		let mut state = MapViewState::new(800.0, 600.0);
		state.transform.x = 42.0;
		let before = state.transform.clone();
		assert!(!state.set_scene(MapScene::default()));
		assert_eq!(state.transform, before);
	}

	#[test]
	fn single_point_fits_without_infinite_zoom() {
		let mut state = MapViewState::new(800.0, 600.0);
		state.set_scene(route_scene(vec![LatLng::new(1.0, 2.0)]));
		assert!(state.transform.k.is_finite());
		assert!(state.transform.k <= MAX_ZOOM);
	}

	#[test]
	fn hovering_finds_nearest_node() {
		let mut state = MapViewState::new(800.0, 600.0);
		let graph = Graph {
			nodes: vec![
				Node { id: "a".into(), x: 0.0, y: 0.0 },
				Node { id: "b".into(), x: 4.0, y: 0.0 },
			],
			edges: Vec::new(),
		};
		state.set_scene(MapScene::build(&graph, None));
		let (x, y) = state.to_screen(geo::project(4.0, 0.0));
		assert_eq!(state.node_at_position(x + 2.0, y), Some("b".into()));
		assert_eq!(state.node_at_position(x + 500.0, y + 500.0), None);
	}

	#[test]
	fn zoom_is_clamped() {
		let mut state = MapViewState::new(800.0, 600.0);
		for _ in 0..500 {
			state.zoom_at(400.0, 300.0, 1.1);
		}
		assert_eq!(state.transform.k, MAX_ZOOM);
	}
}
