use leptos::prelude::*;

use crate::cost::CostBreakdown;
use crate::types::RouteResult;

/// Cost breakdown of the current route as proportional bars.
#[component]
pub fn StatsPanel(#[prop(into)] route: Signal<Option<RouteResult>>) -> impl IntoView {
	move || {
		route.get().map(|r| {
			let breakdown = CostBreakdown::new(&r.stats);
			view! {
				<div class="stats-panel">
					<div class="stats-summary">
						<span class="travel-time">{breakdown.minutes_label()}</span>
						<span class="total-cost">"Total cost " {breakdown.total_label()}</span>
					</div>
					{breakdown
						.bars
						.iter()
						.cloned()
						.map(|bar| {
							view! {
								<div class="cost-row">
									<span class="cost-label">{bar.label}</span>
									<div class="bar-track">
										<div
											class=format!("bar {}", bar.class)
											style=format!("width: {:.1}%", bar.percent)
										></div>
									</div>
									<span class="cost-value">{format!("{:.2}", bar.value)}</span>
								</div>
							}
						})
						.collect_view()}
				</div>
			}
		})
	}
}
