use std::collections::HashMap;

use crate::geo::{self, Bounds};
use crate::types::{Graph, LatLng, NodeId, RouteGeometry, RouteResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadClass {
	Free,
	Moderate,
	Heavy,
}

impl LoadClass {
	pub fn from_load(load: f64) -> Self {
		if load > 0.8 {
			LoadClass::Heavy
		} else if load > 0.5 {
			LoadClass::Moderate
		} else {
			LoadClass::Free
		}
	}

	pub fn color(self) -> &'static str {
		match self {
			LoadClass::Free => "rgba(100, 180, 255, 0.6)",
			LoadClass::Moderate => "rgba(255, 170, 40, 0.8)",
			LoadClass::Heavy => "rgba(235, 60, 60, 0.9)",
		}
	}

	/// Stroke width in screen pixels.
	pub fn width(self) -> f64 {
		match self {
			LoadClass::Free => 1.5,
			LoadClass::Moderate => 2.5,
			LoadClass::Heavy => 4.0,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeLine {
	pub from: LatLng,
	pub to: LatLng,
	pub class: LoadClass,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeMark {
	pub id: NodeId,
	pub at: LatLng,
}

/// Everything the map draws, already in geographic coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapScene {
	pub edges: Vec<EdgeLine>,
	pub nodes: Vec<NodeMark>,
	pub route: Vec<LatLng>,
	pub overloaded: usize,
}

impl MapScene {
	/// Projects `graph` and `route`, skipping edges with unknown endpoints or
	/// no capacity and node ids that are not in the graph.
	pub fn build(graph: &Graph, route: Option<&RouteResult>) -> Self {
		let positions: HashMap<&NodeId, LatLng> = graph
			.nodes
			.iter()
			.map(|n| (&n.id, geo::project(n.x, n.y)))
			.filter(|(_, p)| p.is_finite())
			.collect();

		let nodes = graph
			.nodes
			.iter()
			.filter_map(|n| {
				positions.get(&n.id).map(|&at| NodeMark {
					id: n.id.clone(),
					at,
				})
			})
			.collect();

		let edges = graph
			.edges
			.iter()
			.filter_map(|e| {
				let load = e.load()?;
				Some(EdgeLine {
					from: *positions.get(&e.source)?,
					to: *positions.get(&e.target)?,
					class: LoadClass::from_load(load),
				})
			})
			.collect();

		let route = match route.map(|r| &r.geometry) {
			Some(RouteGeometry::ByPoints(points)) => {
				points.iter().copied().filter(LatLng::is_finite).collect()
			}
			Some(RouteGeometry::ByNodeIds(ids)) => {
				ids.iter().filter_map(|id| positions.get(id).copied()).collect()
			}
			Some(RouteGeometry::Unavailable) | None => Vec::new(),
		};

		Self {
			edges,
			nodes,
			route,
			overloaded: graph.overloaded_edges().count(),
		}
	}

	pub fn start(&self) -> Option<LatLng> {
		self.route.first().copied()
	}

	pub fn end(&self) -> Option<LatLng> {
		self.route.last().copied().filter(|_| self.route.len() > 1)
	}

	pub fn fit_target(&self) -> Option<Bounds> {
		let graph: Vec<LatLng> = self.nodes.iter().map(|n| n.at).collect();
		geo::fit_target(&self.route, &graph)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::{CostVector, Edge, Node};

	fn node(id: &str, x: f64, y: f64) -> Node {
		Node {
			id: id.into(),
			x,
			y,
		}
	}

	fn edge(s: &str, t: &str, capacity: f64, flow: f64) -> Edge {
		Edge {
			source: s.into(),
			target: t.into(),
			capacity,
			current_flow: flow,
		}
	}

	fn grid() -> Graph {
		Graph {
			nodes: vec![node("5", 0.0, 0.0), node("7", 1.0, 0.0), node("12", 1.0, -1.0)],
			edges: vec![
				edge("5", "7", 100.0, 90.0),
				edge("7", "12", 100.0, 60.0),
				edge("12", "5", 100.0, 10.0),
				edge("5", "99", 100.0, 10.0),
				edge("7", "5", 0.0, 10.0),
			],
		}
	}

	#[test]
	fn load_thresholds() {
		assert_eq!(LoadClass::from_load(0.81), LoadClass::Heavy);
		assert_eq!(LoadClass::from_load(0.8), LoadClass::Moderate);
		assert_eq!(LoadClass::from_load(0.51), LoadClass::Moderate);
		assert_eq!(LoadClass::from_load(0.5), LoadClass::Free);
		assert_eq!(LoadClass::from_load(2.0), LoadClass::Heavy);
	}

	#[test]
	fn invalid_edges_are_skipped() {
		let scene = MapScene::build(&grid(), None);
		assert_eq!(scene.nodes.len(), 3);
		let classes: Vec<LoadClass> = scene.edges.iter().map(|e| e.class).collect();
		assert_eq!(classes, vec![LoadClass::Heavy, LoadClass::Moderate, LoadClass::Free]);
	}

	#[test]
	fn node_path_is_resolved_through_projection() {
		let route = RouteResult {
			geometry: RouteGeometry::ByNodeIds(vec!["5".into(), "7".into(), "12".into()]),
			stats: CostVector::default(),
		};
		let scene = MapScene::build(&grid(), Some(&route));
		assert_eq!(scene.route.len(), 3);
		assert_eq!(scene.start(), Some(geo::project(0.0, 0.0)));
		assert_eq!(scene.end(), Some(geo::project(1.0, -1.0)));
	}

	#[test]
	fn unknown_path_ids_are_skipped() {
		let route = RouteResult {
			geometry: RouteGeometry::ByNodeIds(vec!["5".into(), "nope".into(), "12".into()]),
			stats: CostVector::default(),
		};
		assert_eq!(MapScene::build(&grid(), Some(&route)).route.len(), 2);
	}

	#[test]
	fn point_geometry_is_drawn_directly() {
		let points = vec![LatLng::new(51.50, -0.09), LatLng::new(51.51, -0.08)];
		let route = RouteResult {
			geometry: RouteGeometry::ByPoints(points.clone()),
			stats: CostVector::default(),
		};
		let scene = MapScene::build(&Graph::default(), Some(&route));
		assert_eq!(scene.route, points);
		assert_eq!(scene.start(), Some(points[0]));
		assert_eq!(scene.end(), Some(points[1]));
		assert_eq!(scene.fit_target(), geo::bounds_of(points));
	}

	#[test]
	fn missing_geometry_renders_graph_only() {
		let route = RouteResult {
			geometry: RouteGeometry::Unavailable,
			stats: CostVector::default(),
		};
		let scene = MapScene::build(&grid(), Some(&route));
		assert!(scene.route.is_empty());
		assert_eq!(scene.start(), None);
		assert_eq!(scene.edges.len(), 3);
		assert_eq!(scene.fit_target(), geo::bounds_of(scene.nodes.iter().map(|n| n.at)));
	}

	#[test]
	fn counts_overloaded_edges() {
		let mut graph = grid();
		graph.edges.push(edge("12", "7", 50.0, 80.0));
		assert_eq!(MapScene::build(&graph, None).overloaded, 1);
	}
}
