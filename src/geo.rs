//! Grid-to-geographic projection and bounding regions.

use crate::types::LatLng;

/// Anchor of the synthetic grid (Empire State Building).
pub const CENTER: LatLng = LatLng {
	lat: 40.7484,
	lng: -73.9857,
};

/// Degrees per grid unit.
pub const SCALE: f64 = 0.005;

pub fn project(x: f64, y: f64) -> LatLng {
	LatLng {
		lat: CENTER.lat + y * SCALE,
		lng: CENTER.lng + x * SCALE,
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub south: f64,
	pub west: f64,
	pub north: f64,
	pub east: f64,
}

impl Bounds {
	pub fn center(&self) -> LatLng {
		LatLng::new((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
	}

	pub fn lat_span(&self) -> f64 {
		self.north - self.south
	}

	pub fn lng_span(&self) -> f64 {
		self.east - self.west
	}
}

/// Bounding region of `points`, ignoring non-finite ones.
///
/// Returns `None` when nothing usable is left so callers can skip fitting.
pub fn bounds_of<I>(points: I) -> Option<Bounds>
where
	I: IntoIterator<Item = LatLng>,
{
	points
		.into_iter()
		.filter(LatLng::is_finite)
		.fold(None, |acc: Option<Bounds>, p| {
			Some(match acc {
				None => Bounds {
					south: p.lat,
					west: p.lng,
					north: p.lat,
					east: p.lng,
				},
				Some(b) => Bounds {
					south: b.south.min(p.lat),
					west: b.west.min(p.lng),
					north: b.north.max(p.lat),
					east: b.east.max(p.lng),
				},
			})
		})
}

/// Region the viewport should show: the route when it has points, otherwise
/// the whole graph.
pub fn fit_target(route: &[LatLng], graph: &[LatLng]) -> Option<Bounds> {
	bounds_of(route.iter().copied()).or_else(|| bounds_of(graph.iter().copied()))
}
