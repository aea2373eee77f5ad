//! Wire-level data model shared by the store, the map and the panels.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Identifier of a network node.
///
/// The routing backend emits grid ids as strings (`"2,3"`) and OSM ids as
/// integers; both are kept as their decimal/string form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for NodeId {
	fn from(s: &str) -> Self {
		Self(s.to_owned())
	}
}

impl From<String> for NodeId {
	fn from(s: String) -> Self {
		Self(s)
	}
}

impl<'de> Deserialize<'de> for NodeId {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum RawId {
			Text(String),
			Unsigned(u64),
			Signed(i64),
		}

		Ok(match RawId::deserialize(deserializer)? {
			RawId::Text(s) => Self(s),
			RawId::Unsigned(n) => Self(n.to_string()),
			RawId::Signed(n) => Self(n.to_string()),
		})
	}
}

/// A geographic point in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
	pub lat: f64,
	pub lng: f64,
}

impl LatLng {
	pub fn new(lat: f64, lng: f64) -> Self {
		Self { lat, lng }
	}

	pub fn is_finite(&self) -> bool {
		self.lat.is_finite() && self.lng.is_finite()
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Node {
	pub id: NodeId,
	pub x: f64,
	pub y: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Edge {
	pub source: NodeId,
	pub target: NodeId,
	#[serde(default)]
	pub capacity: f64,
	#[serde(default)]
	pub current_flow: f64,
}

impl Edge {
	/// `current_flow / capacity`, or `None` when the capacity cannot carry a load.
	pub fn load(&self) -> Option<f64> {
		if self.capacity > 0.0 && self.capacity.is_finite() && self.current_flow.is_finite() {
			Some(self.current_flow / self.capacity)
		} else {
			None
		}
	}
}

/// One snapshot of the road network as served by `GET /network/layout`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Graph {
	#[serde(default)]
	pub nodes: Vec<Node>,
	#[serde(default)]
	pub edges: Vec<Edge>,
}

impl Graph {
	/// Edges carrying more flow than their capacity.
	pub fn overloaded_edges(&self) -> impl Iterator<Item = &Edge> {
		self.edges.iter().filter(|e| e.load().is_some_and(|l| l > 1.0))
	}
}

/// A place picked by the user.
#[derive(Clone, Debug, PartialEq)]
pub enum Location {
	Address { address: String, lat: f64, lng: f64 },
	Node(NodeId),
}

impl Location {
	pub fn label(&self) -> String {
		match self {
			Location::Address { address, .. } => address.clone(),
			Location::Node(id) => format!("node {id}"),
		}
	}
}

/// Any finite JSON number; `null`, strings and the like read as absent.
pub(crate) fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
	Ok(Value::deserialize(deserializer)?.as_f64().filter(|n| n.is_finite()))
}

fn lenient_component<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
	Ok(lenient_number(deserializer)?.unwrap_or(0.0))
}

/// Decomposed objective value of a computed route.
///
/// Unusable components decode as `0.0` (and the total as `None`) so one bad
/// field never costs the caller the rest of the response.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CostVector {
	#[serde(default, deserialize_with = "lenient_number")]
	pub total_cost: Option<f64>,
	#[serde(default, deserialize_with = "lenient_component")]
	pub time_cost: f64,
	#[serde(default, deserialize_with = "lenient_component")]
	pub congestion_penalty: f64,
	#[serde(default, deserialize_with = "lenient_component")]
	pub emission_cost: f64,
	#[serde(default, deserialize_with = "lenient_component")]
	pub social_cost: f64,
	#[serde(default, deserialize_with = "lenient_component")]
	pub travel_time_hours: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RouteGeometry {
	ByNodeIds(Vec<NodeId>),
	ByPoints(Vec<LatLng>),
	/// The backend answered without any usable geometry.
	Unavailable,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RouteResult {
	pub geometry: RouteGeometry,
	pub stats: CostVector,
}

/// Body of `POST /route`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RouteRequest {
	Legacy {
		start_node: NodeId,
		end_node: NodeId,
		time_hour: u8,
	},
	Coordinate {
		start_lat: f64,
		start_lon: f64,
		end_lat: f64,
		end_lon: f64,
		time_hour: u8,
	},
}

/// One entry of `POST /traffic/update`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrafficUpdate {
	pub u: NodeId,
	pub v: NodeId,
	pub current_flow: f64,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn node_ids_accept_strings_and_integers() {
		let graph: Graph = serde_json::from_value(serde_json::json!({
			"nodes": [{"id": "0,1", "x": 1.0, "y": 0.0}, {"id": 42, "x": 2, "y": -1}],
			"edges": [{"source": "0,1", "target": 42, "capacity": 100, "current_flow": 20, "congestion": 0.2}]
		}))
		.unwrap();

		assert_eq!(graph.nodes[1].id, NodeId::from("42"));
		assert_eq!(graph.edges[0].target.as_str(), "42");
	}

	#[test]
	fn load_is_undefined_without_capacity() {
		let edge = Edge {
			source: "a".into(),
			target: "b".into(),
			capacity: 0.0,
			current_flow: 5.0,
		};
		assert_eq!(edge.load(), None);

		let saturated = Edge { capacity: 10.0, current_flow: 15.0, ..edge };
		assert_eq!(saturated.load(), Some(1.5));
	}

	#[test]
	fn overloaded_edges_exceed_capacity() {
		let edge = |flow: f64| Edge {
			source: "a".into(),
			target: "b".into(),
			capacity: 100.0,
			current_flow: flow,
		};
		let graph = Graph {
			nodes: Vec::new(),
			edges: vec![edge(50.0), edge(100.0), edge(130.0)],
		};
		assert_eq!(graph.overloaded_edges().count(), 1);
	}

	#[test]
	fn cost_components_tolerate_bad_values() {
		let stats: CostVector = serde_json::from_value(serde_json::json!({
			"total_cost": "n/a",
			"time_cost": 6,
			"congestion_penalty": null,
			"emission_cost": [1],
		}))
		.unwrap();

		assert_eq!(stats.total_cost, None);
		assert_eq!(stats.time_cost, 6.0);
		assert_eq!(stats.congestion_penalty, 0.0);
		assert_eq!(stats.emission_cost, 0.0);
		assert_eq!(stats.social_cost, 0.0);
	}

	#[test]
	fn route_requests_serialize_flat() {
		let legacy = RouteRequest::Legacy {
			start_node: "5".into(),
			end_node: "12".into(),
			time_hour: 8,
		};
		assert_eq!(
			serde_json::to_value(&legacy).unwrap(),
			serde_json::json!({"start_node": "5", "end_node": "12", "time_hour": 8})
		);

		let coordinate = RouteRequest::Coordinate {
			start_lat: 51.5,
			start_lon: -0.09,
			end_lat: 51.51,
			end_lon: -0.08,
			time_hour: 17,
		};
		let value = serde_json::to_value(&coordinate).unwrap();
		assert_eq!(value["start_lon"], -0.09);
		assert_eq!(value["time_hour"], 17);
	}
}
