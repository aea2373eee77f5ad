use std::time::Duration;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, info, warn};

use crate::Services;
use crate::client::RouteClient;
use crate::components::control_panel::ControlPanel;
use crate::components::map_view::{MapScene, MapView};
use crate::components::stats_panel::StatsPanel;
use crate::config::RoutingMode;
use crate::store::NetworkStore;

/// Polls the layout endpoint while the page is mounted. A tick is skipped if
/// the previous poll has not returned yet.
fn start_layout_poll(store: RwSignal<NetworkStore>, routes: RouteClient, every: Duration) {
	let routes = StoredValue::new(routes);
	let poll = move || {
		if store.try_update_untracked(|s| s.try_begin_poll()) != Some(true) {
			debug!("layout poll still in flight, skipping tick");
			return;
		}
		let Some(routes) = routes.try_get_value() else {
			return;
		};
		spawn_local(async move {
			let result = routes.request_graph_layout().await;
			if let Ok(graph) = &result {
				debug!("layout: {} nodes, {} edges", graph.nodes.len(), graph.edges.len());
			}
			if store.try_update(|s| s.finish_poll(result)).is_none() {
				debug!("layout arrived after teardown, ignored");
			}
		});
	};

	poll();
	match set_interval_with_handle(poll, every) {
		Ok(handle) => on_cleanup(move || handle.clear()),
		Err(e) => warn!("could not start layout poll: {e:?}"),
	}
}

#[component]
fn Legend(#[prop(into)] scene: Signal<MapScene>) -> impl IntoView {
	view! {
		<div class="map-legend">
			<span class="legend-item free">"≤ 50%"</span>
			<span class="legend-item moderate">"50–80%"</span>
			<span class="legend-item heavy">"> 80%"</span>
			<span class="legend-item base">"Base: lat/lng grid"</span>
			<Show when=move || scene.with(|s| !s.nodes.is_empty())>
				<span class="legend-counts">
					{move || {
						scene
							.with(|s| {
								format!(
									"{} nodes · {} edges · {} overloaded",
									s.nodes.len(),
									s.edges.len(),
									s.overloaded,
								)
							})
					}}
				</span>
			</Show>
		</div>
	}
}

/// Route planner page: map, controls and cost breakdown.
#[component]
pub fn Home() -> impl IntoView {
	let services = expect_context::<Services>();
	let store = RwSignal::new(NetworkStore::default());

	if services.config.mode == RoutingMode::Legacy {
		info!("legacy grid mode, polling layout every {:?}", services.config.poll_interval());
		start_layout_poll(store, services.routes.clone(), services.config.poll_interval());
	}

	let scene = Memo::new(move |_| store.with(|s| MapScene::build(s.graph(), s.route())));
	let route = Memo::new(move |_| store.with(|s| s.route().cloned()));

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-map">
				<MapView scene=scene fullscreen=true />
				<div class="map-overlay">
					<h1>"Load-Balanced Routing"</h1>
					<p class="subtitle">"Pick two places and a departure hour. Drag to pan, scroll to zoom."</p>
					<ControlPanel store=store />
					<StatsPanel route=route />
				</div>
				<Legend scene=scene />
			</div>
		</ErrorBoundary>
	}
}
