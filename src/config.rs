//! Runtime configuration read from the host page.

use std::time::Duration;

use log::{info, warn};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

const CONFIG_ELEMENT_ID: &str = "app-config";

/// Which backend contract the client speaks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingMode {
	/// Geocoded addresses, routes returned as coordinate lists.
	#[default]
	Coordinate,
	/// Synthetic grid network, polled layout, routes as node id paths.
	Legacy,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
	pub api_base_url: String,
	pub mode: RoutingMode,
	pub poll_interval_ms: u64,
	pub debounce_ms: u64,
	pub places_url: String,
	pub suggestion_limit: usize,
	pub default_time_hour: u8,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			api_base_url: "http://localhost:8000".to_owned(),
			mode: RoutingMode::default(),
			poll_interval_ms: 5_000,
			debounce_ms: 300,
			places_url: "https://nominatim.openstreetmap.org".to_owned(),
			suggestion_limit: 5,
			default_time_hour: 8,
		}
	}
}

impl AppConfig {
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		let mut config: Self = serde_json::from_str(text)?;
		config.default_time_hour = config.default_time_hour.min(23);
		Ok(config)
	}

	pub fn poll_interval(&self) -> Duration {
		Duration::from_millis(self.poll_interval_ms)
	}

	pub fn debounce(&self) -> Duration {
		Duration::from_millis(self.debounce_ms)
	}

	/// Reads `<script id="app-config" type="application/json">`, falling back
	/// to defaults when it is missing or invalid.
	pub fn load() -> Self {
		let Some(text) = config_element_text() else {
			info!("no #{CONFIG_ELEMENT_ID} element, using default config");
			return Self::default();
		};
		match Self::from_json(&text) {
			Ok(config) => {
				info!("config loaded: {:?} mode, api {}", config.mode, config.api_base_url);
				config
			}
			Err(e) => {
				warn!("invalid #{CONFIG_ELEMENT_ID}: {e}; using defaults");
				Self::default()
			}
		}
	}
}

fn config_element_text() -> Option<String> {
	let document = web_sys::window()?.document()?;
	let element = document.get_element_by_id(CONFIG_ELEMENT_ID)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}
