//! The single authoritative graph/route pair.
//!
//! The UI keeps one [`NetworkStore`] inside a `RwSignal`; every writer goes
//! through the replace-wholesale operations below and every reader re-renders
//! when the signal changes.

use log::{debug, warn};

use crate::types::{Graph, RouteResult};

/// Token handed out when a route request starts. Only the most recently issued
/// ticket may write the route slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteTicket(u64);

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NetworkStore {
	graph: Graph,
	route: Option<RouteResult>,
	/// Route that was on screen when the latest request started.
	superseded: Option<RouteResult>,
	latest_ticket: u64,
	poll_in_flight: bool,
}

impl NetworkStore {
	pub fn graph(&self) -> &Graph {
		&self.graph
	}

	pub fn route(&self) -> Option<&RouteResult> {
		self.route.as_ref()
	}

	pub fn set_graph(&mut self, graph: Graph) {
		self.graph = graph;
	}

	pub fn set_route(&mut self, route: Option<RouteResult>) {
		self.route = route;
	}

	/// Starts a new route request: hides the current route and invalidates the
	/// tickets of every earlier request.
	pub fn begin_route_request(&mut self) -> RouteTicket {
		self.latest_ticket += 1;
		if let Some(prev) = self.route.take() {
			self.superseded = Some(prev);
		}
		RouteTicket(self.latest_ticket)
	}

	pub fn is_current(&self, ticket: RouteTicket) -> bool {
		ticket.0 == self.latest_ticket
	}

	/// Applies a successful response. Returns `false` if a newer request has
	/// started since `ticket` was issued.
	pub fn complete_route_request(&mut self, ticket: RouteTicket, route: RouteResult) -> bool {
		if !self.is_current(ticket) {
			debug!("dropping stale route response #{}", ticket.0);
			return false;
		}
		self.superseded = None;
		self.set_route(Some(route));
		true
	}

	/// Handles a failed request. The route shown before it started comes back.
	pub fn fail_route_request(&mut self, ticket: RouteTicket) -> bool {
		if !self.is_current(ticket) {
			debug!("dropping stale route failure #{}", ticket.0);
			return false;
		}
		if let Some(prev) = self.superseded.take() {
			self.set_route(Some(prev));
		}
		true
	}

	/// Removes the route and abandons any request still in flight.
	pub fn clear_route(&mut self) {
		self.latest_ticket += 1;
		self.superseded = None;
		self.set_route(None);
	}

	/// Claims the poll slot. Returns `false` while a previous poll is still out.
	pub fn try_begin_poll(&mut self) -> bool {
		if self.poll_in_flight {
			return false;
		}
		self.poll_in_flight = true;
		true
	}

	/// Releases the poll slot; a failure keeps the current snapshot.
	pub fn finish_poll<E: std::fmt::Display>(&mut self, result: Result<Graph, E>) {
		self.poll_in_flight = false;
		match result {
			Ok(graph) => self.set_graph(graph),
			Err(e) => warn!("layout poll failed, keeping previous graph: {e}"),
		}
	}
}
