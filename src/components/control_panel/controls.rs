use crate::store::NetworkStore;
use crate::types::{Location, RouteGeometry, RouteRequest, RouteResult, TrafficUpdate};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RequestStatus {
	#[default]
	Idle,
	Pending,
	Success,
}

/// Inputs and lifecycle of the route form.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteControls {
	pub start: Option<Location>,
	pub end: Option<Location>,
	time_hour: u8,
	status: RequestStatus,
	message: Option<String>,
}

impl RouteControls {
	pub fn new(time_hour: u8) -> Self {
		Self {
			start: None,
			end: None,
			time_hour: time_hour.min(23),
			status: RequestStatus::Idle,
			message: None,
		}
	}

	pub fn time_hour(&self) -> u8 {
		self.time_hour
	}

	pub fn set_time_hour(&mut self, hour: u8) {
		self.time_hour = hour.min(23);
	}

	pub fn status(&self) -> RequestStatus {
		self.status
	}

	pub fn message(&self) -> Option<&str> {
		self.message.as_deref()
	}

	/// Body for `POST /route`, if both ends are resolved and of the same kind.
	pub fn request(&self) -> Option<RouteRequest> {
		let time_hour = self.time_hour;
		match (self.start.as_ref()?, self.end.as_ref()?) {
			(Location::Node(a), Location::Node(b)) => Some(RouteRequest::Legacy {
				start_node: a.clone(),
				end_node: b.clone(),
				time_hour,
			}),
			(
				Location::Address {
					lat: start_lat,
					lng: start_lon,
					..
				},
				Location::Address {
					lat: end_lat,
					lng: end_lon,
					..
				},
			) => Some(RouteRequest::Coordinate {
				start_lat: *start_lat,
				start_lon: *start_lon,
				end_lat: *end_lat,
				end_lon: *end_lon,
				time_hour,
			}),
			_ => None,
		}
	}

	pub fn can_submit(&self) -> bool {
		self.status != RequestStatus::Pending && self.request().is_some()
	}

	/// Moves to `Pending` and hands out the request to send.
	pub fn submit(&mut self) -> Option<RouteRequest> {
		if !self.can_submit() {
			return None;
		}
		let request = self.request()?;
		self.status = RequestStatus::Pending;
		self.message = None;
		Some(request)
	}

	pub fn succeeded(&mut self) {
		self.status = RequestStatus::Success;
		self.message = None;
	}

	/// Drops any pending request state and message.
	pub fn reset(&mut self) {
		self.status = RequestStatus::Idle;
		self.message = None;
	}

	/// Shows `message` and goes straight back to `Idle` so the user can retry.
	pub fn failed(&mut self, message: String) {
		self.status = RequestStatus::Idle;
		self.message = Some(message);
	}
}

/// Drops the route and any request in flight. The abandoned request can no
/// longer settle the form, so it goes back to `Idle` here.
pub fn abandon_route(store: &mut NetworkStore, controls: &mut RouteControls) {
	store.clear_route();
	controls.reset();
}

/// Updates that zero the flow on every edge of a node-id route.
pub fn clear_traffic_updates(route: &RouteResult) -> Vec<TrafficUpdate> {
	match &route.geometry {
		RouteGeometry::ByNodeIds(ids) => ids
			.windows(2)
			.map(|pair| TrafficUpdate {
				u: pair[0].clone(),
				v: pair[1].clone(),
				current_flow: 0.0,
			})
			.collect(),
		RouteGeometry::ByPoints(_) | RouteGeometry::Unavailable => Vec::new(),
	}
}
