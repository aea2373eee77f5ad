use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{info, warn};
use web_sys::{Event, MouseEvent};

use super::controls::{RequestStatus, RouteControls, abandon_route, clear_traffic_updates};
use crate::Services;
use crate::components::location_input::LocationInput;
use crate::config::RoutingMode;
use crate::cost::is_peak_hour;
use crate::store::NetworkStore;
use crate::types::Location;

const GRID_ROWS: u32 = 5;
const GRID_COLS: u32 = 5;

#[component]
pub fn ControlPanel(store: RwSignal<NetworkStore>) -> impl IntoView {
	let services = expect_context::<Services>();
	let legacy = services.config.mode == RoutingMode::Legacy;
	let routes = StoredValue::new(services.routes.clone());

	let controls = RwSignal::new(RouteControls::new(services.config.default_time_hour));
	let start = RwSignal::new(None::<Location>);
	let end = RwSignal::new(None::<Location>);

	Effect::new(move |_| {
		let (s, e) = (start.get(), end.get());
		controls.update(|c| {
			c.start = s;
			c.end = e;
		});
	});

	let compute = move |_: MouseEvent| {
		let Some(request) = controls.try_update(|c| c.submit()).flatten() else {
			return;
		};
		let Some(ticket) = store.try_update(|s| s.begin_route_request()) else {
			return;
		};
		let Some(routes) = routes.try_get_value() else {
			return;
		};
		spawn_local(async move {
			match routes.request_route(&request).await {
				Ok(route) => {
					if store.try_update(|s| s.complete_route_request(ticket, route)) == Some(true) {
						controls.try_update(|c| c.succeeded());
					}
				}
				Err(e) => {
					warn!("route request failed ({}): {e}", e.kind());
					if store.try_update(|s| s.fail_route_request(ticket)) == Some(true) {
						controls.try_update(|c| c.failed(e.user_message()));
					}
				}
			}
		});
	};

	let abandon = move || {
		store.try_update(|s| controls.try_update(|c| abandon_route(s, c)));
	};

	let clear = move |_: MouseEvent| abandon();

	let reset_grid = move |_: MouseEvent| {
		let Some(routes) = routes.try_get_value() else {
			return;
		};
		spawn_local(async move {
			match routes.init_grid(GRID_ROWS, GRID_COLS).await {
				Ok(()) => {
					info!("backend grid reset to {GRID_ROWS}x{GRID_COLS}");
					abandon();
				}
				Err(e) => warn!("grid reset failed: {e}"),
			}
		});
	};

	let clear_traffic = move |_: MouseEvent| {
		let updates = store.with_untracked(|s| s.route().map(clear_traffic_updates).unwrap_or_default());
		if updates.is_empty() {
			return;
		}
		let Some(routes) = routes.try_get_value() else {
			return;
		};
		spawn_local(async move {
			match routes.update_traffic(&updates).await {
				Ok(()) => info!("cleared traffic on {} route edges", updates.len()),
				Err(e) => warn!("traffic update failed: {e}"),
			}
		});
	};

	let on_hour = move |ev: Event| {
		if let Ok(hour) = event_target_value(&ev).parse::<u8>() {
			controls.update(|c| c.set_time_hour(hour));
		}
	};

	let hour = move || controls.with(|c| c.time_hour());
	let pending = move || controls.with(|c| c.status() == RequestStatus::Pending);
	let has_route = move || store.with(|s| s.route().is_some());
	let placeholder = if legacy { "Address, then Enter" } else { "Search a place" };

	view! {
		<div class="control-panel">
			<LocationInput label="From" placeholder=placeholder selected=start />
			<LocationInput label="To" placeholder=placeholder selected=end />

			<div class="time-control">
				<label>"Departure " {move || format!("{:02}:00", hour())}</label>
				<input
					type="range"
					min="0"
					max="23"
					step="1"
					prop:value=move || hour().to_string()
					on:input=on_hour
				/>
				<Show when=move || is_peak_hour(hour())>
					<span class="peak-badge">"peak"</span>
				</Show>
			</div>

			<div class="actions">
				<button
					class="primary"
					on:click=compute
					prop:disabled=move || !controls.with(|c| c.can_submit())
				>
					{move || if pending() { "Computing…" } else { "Compute route" }}
				</button>
				<button on:click=clear prop:disabled=move || !has_route() && !pending()>
					"Clear"
				</button>
			</div>

			<Show when=move || legacy>
				<div class="actions admin">
					<button on:click=reset_grid>"Reset grid"</button>
					<button on:click=clear_traffic prop:disabled=move || !has_route()>
						"Clear traffic on route"
					</button>
				</div>
			</Show>

			<p class="route-message error">{move || controls.with(|c| c.message().map(str::to_owned))}</p>
		</div>
	}
}
