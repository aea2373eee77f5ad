use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, warn};
use web_sys::{Event, FocusEvent, KeyboardEvent};

use super::resolver::{LocationResolver, ResolverState, Ticket};
use crate::Services;
use crate::config::RoutingMode;
use crate::types::Location;

/// Free-text location field.
///
/// In coordinate mode it offers debounced place suggestions and geocodes the
/// picked one; in legacy mode it geocodes the typed address to a network
/// node on Enter or blur.
#[component]
pub fn LocationInput(
	label: &'static str,
	placeholder: &'static str,
	selected: RwSignal<Option<Location>>,
) -> impl IntoView {
	let services = expect_context::<Services>();
	let direct = services.config.mode == RoutingMode::Legacy;
	let debounce = services.config.debounce();
	let places = StoredValue::new(services.places.clone());
	let routes = StoredValue::new(services.routes.clone());

	let resolver = RwSignal::new(if direct {
		LocationResolver::direct()
	} else {
		LocationResolver::with_suggestions()
	});
	let pending_timer = StoredValue::new(None::<TimeoutHandle>);

	// Publishes the resolved location, if any, to the form.
	let sync = move || {
		let Some(current) = resolver.try_with_untracked(|r| r.resolved().cloned()) else {
			return;
		};
		if selected.try_get_untracked().is_some_and(|prev| prev != current) {
			selected.try_set(current);
		}
	};

	let clear_timer = move || {
		pending_timer.try_update_value(|t| {
			if let Some(handle) = t.take() {
				handle.clear();
			}
		});
	};

	on_cleanup(move || {
		clear_timer();
		resolver.try_update(|r| r.cancel());
	});

	// The places capability is usable once the field is mounted.
	Effect::new(move |_| resolver.update(|r| r.enable()));

	let fetch_suggestions = move |ticket: Ticket| {
		let Some(query) = resolver.try_with_untracked(|r| r.debounce_elapsed(ticket)).flatten() else {
			return;
		};
		let Some(places) = places.try_get_value() else {
			return;
		};
		spawn_local(async move {
			match places.suggest(&query).await {
				Ok(list) => {
					debug!("{} suggestions for {query:?}", list.len());
					resolver.try_update(|r| r.suggestions_arrived(ticket, list));
				}
				Err(e) => {
					warn!("place suggestions failed for {query:?}: {e}");
					resolver.try_update(|r| r.suggestions_failed(ticket));
				}
			}
		});
	};

	let on_input = move |ev: Event| {
		let text = event_target_value(&ev);
		clear_timer();
		let ticket = resolver.try_update(|r| r.input_changed(text)).flatten();
		sync();
		if let Some(ticket) = ticket {
			match set_timeout_with_handle(move || fetch_suggestions(ticket), debounce) {
				Ok(handle) => pending_timer.set_value(Some(handle)),
				Err(e) => warn!("could not arm debounce timer: {e:?}"),
			}
		}
	};

	let select = move |index: usize| {
		clear_timer();
		let Some((ticket, picked)) = resolver.try_update(|r| r.select(index)).flatten() else {
			return;
		};
		sync();
		let Some(places) = places.try_get_value() else {
			return;
		};
		spawn_local(async move {
			match places.resolve(&picked).await {
				Ok(location) => {
					resolver.try_update(|r| r.resolution_succeeded(ticket, location));
				}
				Err(e) => {
					warn!("geocoding {:?} failed: {e}", picked.description);
					resolver.try_update(|r| r.resolution_failed(ticket, e.user_message()));
				}
			}
			sync();
		});
	};

	let submit = move || {
		let Some((ticket, address)) = resolver.try_update(|r| r.submit()).flatten() else {
			return;
		};
		sync();
		let Some(routes) = routes.try_get_value() else {
			return;
		};
		spawn_local(async move {
			match routes.geocode(&address).await {
				Ok(node) => {
					debug!("{address:?} resolved to node {node}");
					resolver.try_update(|r| r.resolution_succeeded(ticket, Location::Node(node)));
				}
				Err(e) => {
					warn!("geocoding {address:?} failed: {e}");
					resolver.try_update(|r| r.resolution_failed(ticket, e.user_message()));
				}
			}
			sync();
		});
	};

	let on_keydown = move |ev: KeyboardEvent| {
		if direct && ev.key() == "Enter" {
			submit();
		}
	};
	let on_blur = move |_: FocusEvent| {
		if direct && resolver.with_untracked(|r| r.resolved().is_none() && !r.is_busy()) {
			submit();
		}
	};

	let status = move || {
		resolver.with(|r| match r.state() {
			ResolverState::Disabled => "Loading places…".to_owned(),
			ResolverState::Pending { .. } => "Searching…".to_owned(),
			ResolverState::Resolving { .. } => "Locating…".to_owned(),
			ResolverState::Resolved(location) => format!("✓ {}", location.label()),
			ResolverState::Suggestions(list) if list.is_empty() => "No matches".to_owned(),
			ResolverState::Suggestions(_) | ResolverState::Ready => {
				r.error().map(str::to_owned).unwrap_or_default()
			}
		})
	};

	view! {
		<div class="location-input">
			<label>{label}</label>
			<input
				type="text"
				placeholder=placeholder
				prop:value=move || resolver.with(|r| r.text().to_owned())
				prop:disabled=move || resolver.with(|r| *r.state() == ResolverState::Disabled)
				on:input=on_input
				on:keydown=on_keydown
				on:blur=on_blur
			/>
			<ul class="suggestions">
				{move || {
					resolver
						.with(|r| r.suggestions().to_vec())
						.into_iter()
						.enumerate()
						.map(|(i, s)| {
							view! { <li on:mousedown=move |_| select(i)>{s.description}</li> }
						})
						.collect_view()
				}}
			</ul>
			<p class="location-status" class:error=move || resolver.with(|r| r.error().is_some())>
				{status}
			</p>
		</div>
	}
}
