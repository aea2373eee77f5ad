use gloo_net::http::Request;
use serde::Deserialize;

use super::ClientError;
use crate::types::Location;

/// One autocomplete candidate.
#[derive(Clone, Debug, PartialEq)]
pub struct Suggestion {
	pub id: String,
	pub description: String,
}

/// Autocomplete and geocoding backed by an OSM Nominatim instance.
#[derive(Clone, Debug)]
pub struct PlacesService {
	base_url: String,
	limit: usize,
}

#[derive(Deserialize)]
struct Place {
	osm_type: String,
	osm_id: u64,
	display_name: String,
	#[serde(default)]
	lat: Option<String>,
	#[serde(default)]
	lon: Option<String>,
}

impl Place {
	fn id(&self) -> Option<String> {
		let prefix = match self.osm_type.as_str() {
			"node" => 'N',
			"way" => 'W',
			"relation" => 'R',
			_ => return None,
		};
		Some(format!("{prefix}{}", self.osm_id))
	}
}

impl PlacesService {
	pub fn new(base_url: impl Into<String>, limit: usize) -> Self {
		Self {
			base_url: base_url.into().trim_end_matches('/').to_owned(),
			limit,
		}
	}

	pub async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>, ClientError> {
		let resp = Request::get(&format!("{}/search", self.base_url))
			.query([
				("q", query.to_owned()),
				("format", "jsonv2".to_owned()),
				("limit", self.limit.to_string()),
			])
			.send()
			.await?;
		let body = super::read_body(resp).await?;
		parse_suggestions(&body)
	}

	/// Looks up the coordinates of a previously suggested place.
	pub async fn resolve(&self, suggestion: &Suggestion) -> Result<Location, ClientError> {
		let resp = Request::get(&format!("{}/lookup", self.base_url))
			.query([("osm_ids", suggestion.id.as_str()), ("format", "jsonv2")])
			.send()
			.await?;
		let body = super::read_body(resp).await?;
		parse_lookup(&body, suggestion)
	}
}

pub fn parse_suggestions(body: &str) -> Result<Vec<Suggestion>, ClientError> {
	let places: Vec<Place> =
		serde_json::from_str(body).map_err(|e| ClientError::Malformed(e.to_string()))?;
	Ok(places
		.into_iter()
		.filter_map(|p| {
			Some(Suggestion {
				id: p.id()?,
				description: p.display_name,
			})
		})
		.collect())
}

/// Produces a location only when both coordinates parse.
pub fn parse_lookup(body: &str, suggestion: &Suggestion) -> Result<Location, ClientError> {
	let places: Vec<Place> =
		serde_json::from_str(body).map_err(|e| ClientError::Malformed(e.to_string()))?;
	let place = places
		.into_iter()
		.find(|p| p.id().as_deref() == Some(suggestion.id.as_str()))
		.ok_or_else(|| ClientError::Malformed(format!("no result for {}", suggestion.id)))?;

	let coord = |s: Option<String>| s.and_then(|s| s.parse::<f64>().ok()).filter(|v| v.is_finite());
	match (coord(place.lat), coord(place.lon)) {
		(Some(lat), Some(lng)) => Ok(Location::Address {
			address: suggestion.description.clone(),
			lat,
			lng,
		}),
		_ => Err(ClientError::Malformed(format!("{} has no coordinates", suggestion.id))),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const SEARCH: &str = r#"[
		{"place_id": 1, "osm_type": "way", "osm_id": 34633854, "lat": "40.7484", "lon": "-73.9857",
		 "display_name": "Empire State Building, 350, 5th Avenue, Manhattan"},
		{"place_id": 2, "osm_type": "node", "osm_id": 42, "lat": "40.75", "lon": "-73.98",
		 "display_name": "Herald Square"},
		{"place_id": 3, "osm_type": "unknown", "osm_id": 7, "display_name": "???"}
	]"#;

	#[test]
	fn suggestions_carry_lookup_ids() {
		let suggestions = parse_suggestions(SEARCH).unwrap();
		assert_eq!(suggestions.len(), 2);
		assert_eq!(suggestions[0].id, "W34633854");
		assert_eq!(suggestions[1].description, "Herald Square");
	}

	#[test]
	fn lookup_yields_complete_location() {
		let pick = Suggestion {
			id: "N42".into(),
			description: "Herald Square".into(),
		};
		let loc = parse_lookup(SEARCH, &pick).unwrap();
		assert_eq!(
			loc,
			Location::Address {
				address: "Herald Square".into(),
				lat: 40.75,
				lng: -73.98
			}
		);
	}

	#[test]
	fn lookup_without_coordinates_fails() {
		let body = r#"[{"osm_type": "node", "osm_id": 9, "display_name": "Nowhere", "lat": "abc"}]"#;
		let pick = Suggestion {
			id: "N9".into(),
			description: "Nowhere".into(),
		};
		assert!(parse_lookup(body, &pick).is_err());
		assert!(parse_lookup("[]", &pick).is_err());
	}
}
