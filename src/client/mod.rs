//! HTTP boundary to the routing service and the places service.

mod error;
mod places;

use gloo_net::http::{Request, Response};
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::Value;

pub use error::ClientError;
pub use places::{PlacesService, Suggestion};

use crate::types::{
	CostVector, Edge, Graph, LatLng, Node, NodeId, RouteGeometry, RouteRequest, RouteResult, TrafficUpdate,
	lenient_number,
};

/// Client for the routing backend. No request is retried automatically.
#[derive(Clone, Debug)]
pub struct RouteClient {
	base_url: String,
}

impl RouteClient {
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			base_url: base_url.into().trim_end_matches('/').to_owned(),
		}
	}

	fn url(&self, path: &str) -> String {
		format!("{}{}", self.base_url, path)
	}

	pub async fn request_route(&self, request: &RouteRequest) -> Result<RouteResult, ClientError> {
		debug!("POST /route {request:?}");
		let resp = Request::post(&self.url("/route")).json(request)?.send().await?;
		let body = read_body(resp).await?;
		let route = parse_route_response(&body)?;
		info!("route received: {:?}", route_summary(&route.geometry));
		Ok(route)
	}

	pub async fn request_graph_layout(&self) -> Result<Graph, ClientError> {
		let resp = Request::get(&self.url("/network/layout")).send().await?;
		let body = read_body(resp).await?;
		parse_layout_response(&body)
	}

	/// Resolves a free-text address to the nearest network node.
	pub async fn geocode(&self, address: &str) -> Result<NodeId, ClientError> {
		#[derive(serde::Serialize)]
		struct Body<'a> {
			address: &'a str,
		}

		let resp = Request::post(&self.url("/geocode")).json(&Body { address })?.send().await?;
		let body = read_body(resp).await?;
		parse_geocode_response(&body)
	}

	pub async fn update_traffic(&self, updates: &[TrafficUpdate]) -> Result<(), ClientError> {
		#[derive(serde::Serialize)]
		struct Body<'a> {
			updates: &'a [TrafficUpdate],
		}

		let resp = Request::post(&self.url("/traffic/update")).json(&Body { updates })?.send().await?;
		read_body(resp).await.map(drop)
	}

	/// Re-initialises the backend network as a `rows` x `cols` grid.
	pub async fn init_grid(&self, rows: u32, cols: u32) -> Result<(), ClientError> {
		let resp = Request::post(&self.url("/network/init-grid"))
			.query([("rows", rows.to_string()), ("cols", cols.to_string())])
			.send()
			.await?;
		read_body(resp).await.map(drop)
	}
}

async fn read_body(resp: Response) -> Result<String, ClientError> {
	let status = resp.status();
	let ok = resp.ok();
	let body = resp.text().await?;
	if ok {
		Ok(body)
	} else {
		Err(ClientError::from_response(status, &body))
	}
}

fn route_summary(geometry: &RouteGeometry) -> String {
	match geometry {
		RouteGeometry::ByNodeIds(ids) => format!("{} nodes", ids.len()),
		RouteGeometry::ByPoints(pts) => format!("{} points", pts.len()),
		RouteGeometry::Unavailable => "no geometry".to_owned(),
	}
}

/// Elements of a JSON array that decode as `T`; anything else is dropped.
fn usable_entries<T: serde::de::DeserializeOwned>(value: Option<Value>) -> Vec<T> {
	match value {
		Some(Value::Array(items)) => items.into_iter().filter_map(|v| serde_json::from_value(v).ok()).collect(),
		_ => Vec::new(),
	}
}

#[derive(Deserialize)]
struct LayoutResponse {
	#[serde(default)]
	nodes: Option<Value>,
	#[serde(default)]
	edges: Option<Value>,
}

/// Decodes a `/network/layout` body. Nodes and edges that do not decode are
/// skipped so one bad entry does not cost the whole snapshot.
pub fn parse_layout_response(body: &str) -> Result<Graph, ClientError> {
	let raw: LayoutResponse =
		serde_json::from_str(body).map_err(|e| ClientError::Malformed(e.to_string()))?;
	let total = |v: &Option<Value>| v.as_ref().and_then(Value::as_array).map_or(0, Vec::len);
	let (node_count, edge_count) = (total(&raw.nodes), total(&raw.edges));

	let graph = Graph {
		nodes: usable_entries::<Node>(raw.nodes),
		edges: usable_entries::<Edge>(raw.edges),
	};
	if graph.nodes.len() < node_count || graph.edges.len() < edge_count {
		warn!(
			"layout: skipped {} malformed nodes and {} malformed edges",
			node_count - graph.nodes.len(),
			edge_count - graph.edges.len(),
		);
	}
	Ok(graph)
}

#[derive(Deserialize)]
struct RouteResponse {
	#[serde(default)]
	path: Option<Value>,
	#[serde(default)]
	geometry: Option<Value>,
	#[serde(default)]
	stats: Option<Value>,
	#[serde(default, deserialize_with = "lenient_number")]
	total_cost: Option<f64>,
	#[serde(default)]
	breakdown: Option<Value>,
}

/// Decodes a `/route` body, keeping whatever subset is usable.
pub fn parse_route_response(body: &str) -> Result<RouteResult, ClientError> {
	let raw: RouteResponse =
		serde_json::from_str(body).map_err(|e| ClientError::Malformed(e.to_string()))?;

	let points: Vec<LatLng> = usable_entries::<LatLng>(raw.geometry)
		.into_iter()
		.filter(LatLng::is_finite)
		.collect();
	let ids: Vec<NodeId> = usable_entries(raw.path);

	let geometry = if !points.is_empty() {
		RouteGeometry::ByPoints(points)
	} else if !ids.is_empty() {
		RouteGeometry::ByNodeIds(ids)
	} else {
		RouteGeometry::Unavailable
	};

	let costs = |v: Option<Value>| v.and_then(|v| serde_json::from_value::<CostVector>(v).ok());
	let stats = match (costs(raw.stats), costs(raw.breakdown)) {
		(Some(stats), _) => stats,
		(None, Some(breakdown)) => CostVector {
			total_cost: raw.total_cost.or(breakdown.total_cost),
			..breakdown
		},
		(None, None) => CostVector {
			total_cost: raw.total_cost,
			..CostVector::default()
		},
	};

	Ok(RouteResult { geometry, stats })
}

pub fn parse_geocode_response(body: &str) -> Result<NodeId, ClientError> {
	#[derive(Deserialize)]
	struct GeocodeResponse {
		node_id: Option<NodeId>,
	}

	serde_json::from_str::<GeocodeResponse>(body)
		.map_err(|e| ClientError::Malformed(e.to_string()))?
		.node_id
		.ok_or_else(|| ClientError::Malformed("geocode response has no node_id".to_owned()))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn node_path_response() {
		let body = r#"{"path": ["5", "7", "12"], "stats": {"total_cost": 10, "time_cost": 6,
			"congestion_penalty": 2, "emission_cost": 1, "social_cost": 1, "travel_time_hours": 0.2}}"#;
		let route = parse_route_response(body).unwrap();
		assert_eq!(
			route.geometry,
			RouteGeometry::ByNodeIds(vec!["5".into(), "7".into(), "12".into()])
		);
		assert_eq!(route.stats.total_cost, Some(10.0));
		assert_eq!(route.stats.travel_time_hours, 0.2);
	}

	#[test]
	fn geometry_response_without_path() {
		let body = r#"{"geometry": [{"lat": 51.50, "lng": -0.09}, {"lat": 51.51, "lng": -0.08}],
			"stats": {"total_cost": 3}}"#;
		let route = parse_route_response(body).unwrap();
		assert_eq!(
			route.geometry,
			RouteGeometry::ByPoints(vec![LatLng::new(51.50, -0.09), LatLng::new(51.51, -0.08)])
		);
	}

	#[test]
	fn geometry_wins_when_both_are_present() {
		let body = r#"{"path": [1, 2], "geometry": [{"lat": 40.7, "lng": -73.9}], "stats": {}}"#;
		let route = parse_route_response(body).unwrap();
		assert!(matches!(route.geometry, RouteGeometry::ByPoints(ref p) if p.len() == 1));
	}

	#[test]
	fn breakdown_shape_is_accepted() {
		let body = r#"{"path": [101, 102], "total_cost": 8.5, "breakdown": {"time_cost": 4,
			"congestion_penalty": 2, "emission_cost": 2, "social_cost": 0.5, "travel_time_hours": 0.1},
			"segments": []}"#;
		let route = parse_route_response(body).unwrap();
		assert_eq!(route.stats.total_cost, Some(8.5));
		assert_eq!(route.stats.time_cost, 4.0);
		assert_eq!(route.geometry, RouteGeometry::ByNodeIds(vec!["101".into(), "102".into()]));
	}

	#[test]
	fn partial_payloads_degrade() {
		let route = parse_route_response(r#"{"path": [], "stats": {"total_cost": 1}}"#).unwrap();
		assert_eq!(route.geometry, RouteGeometry::Unavailable);

		let body = r#"{"geometry": [{"lat": "x"}, {"lat": 1.0, "lng": 2.0}]}"#;
		let route = parse_route_response(body).unwrap();
		assert_eq!(route.geometry, RouteGeometry::ByPoints(vec![LatLng::new(1.0, 2.0)]));
		assert_eq!(route.stats.total_cost, None);
	}

	#[test]
	fn bad_cost_field_keeps_the_route() {
		let body = r#"{"path": ["5", "7", "12"], "stats": {"total_cost": 10, "time_cost": 6, "emission_cost": null}}"#;
		let route = parse_route_response(body).unwrap();
		assert_eq!(
			route.geometry,
			RouteGeometry::ByNodeIds(vec!["5".into(), "7".into(), "12".into()])
		);
		assert_eq!(route.stats.total_cost, Some(10.0));
		assert_eq!(route.stats.time_cost, 6.0);
		assert_eq!(route.stats.emission_cost, 0.0);

		let route = parse_route_response(r#"{"geometry": "oops", "path": [1, 2], "stats": "n/a"}"#).unwrap();
		assert_eq!(route.geometry, RouteGeometry::ByNodeIds(vec!["1".into(), "2".into()]));
		assert_eq!(route.stats, CostVector::default());
	}

	#[test]
	fn layout_skips_malformed_entries() {
		let body = r#"{
			"nodes": [{"id": "0,0", "x": 0, "y": 0}, {"id": "0,1", "x": 1}, {"id": 7, "x": 2, "y": 1}],
			"edges": [
				{"source": "0,0", "target": 7, "capacity": 100, "current_flow": 20},
				{"source": "0,0", "target": "0,1", "capacity": null, "current_flow": 5}
			]
		}"#;
		let graph = parse_layout_response(body).unwrap();
		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.nodes[1].id, NodeId::from("7"));
		assert_eq!(graph.edges.len(), 1);
		assert_eq!(graph.edges[0].load(), Some(0.2));

		assert_eq!(parse_layout_response("{}").unwrap(), Graph::default());
		assert!(parse_layout_response("<html>").is_err());
	}

	#[test]
	fn non_json_is_malformed() {
		let err = parse_route_response("<html>").unwrap_err();
		assert_eq!(err.kind(), "malformed_response");
	}

	#[test]
	fn geocode_node_ids() {
		assert_eq!(
			parse_geocode_response(r#"{"address": "x", "lat": 1, "lon": 2, "node_id": 4242}"#).unwrap(),
			NodeId::from("4242")
		);
		assert!(parse_geocode_response(r#"{"address": "x"}"#).is_err());
	}

	#[test]
	fn base_url_is_normalised() {
		let client = RouteClient::new("http://localhost:8000/");
		assert_eq!(client.url("/route"), "http://localhost:8000/route");
	}
}
