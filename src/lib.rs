//! Leptos client-side app for planning load-aware routes over a road network.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
mod client;
mod components;
mod config;
mod cost;
mod geo;
mod pages;
mod store;
mod types;

// Top-Level pages
use crate::client::{PlacesService, RouteClient};
use crate::config::AppConfig;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Configuration and service clients shared through context.
#[derive(Clone, Debug)]
pub(crate) struct Services {
	pub config: AppConfig,
	pub routes: RouteClient,
	pub places: PlacesService,
}

impl Services {
	fn new(config: AppConfig) -> Self {
		Self {
			routes: RouteClient::new(config.api_base_url.clone()),
			places: PlacesService::new(config.places_url.clone(), config.suggestion_limit),
			config,
		}
	}
}

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router which renders the route planner and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();
	provide_context(Services::new(AppConfig::load()));

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="Load-Balanced Routing" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
