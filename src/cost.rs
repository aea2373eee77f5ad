//! Normalisation of a route's cost vector into display bars.

use crate::types::CostVector;

pub const BAR_FLOOR: f64 = 5.0;
pub const BAR_CEILING: f64 = 100.0;

/// Width of a cost bar as a percentage of `total`.
///
/// Every component with data is at least [`BAR_FLOOR`] wide so it stays
/// visible. A zero, negative, missing or non-finite total means "no data" and
/// yields 0.
pub fn bar_percent(value: f64, total: Option<f64>) -> f64 {
	match total {
		Some(t) if t > 0.0 && t.is_finite() => {
			let pct = value / t * 100.0;
			if pct.is_nan() {
				BAR_FLOOR
			} else {
				pct.clamp(BAR_FLOOR, BAR_CEILING)
			}
		}
		_ => 0.0,
	}
}

/// Travel time in minutes, rounded to one decimal.
pub fn format_minutes(travel_time_hours: f64) -> f64 {
	(travel_time_hours * 60.0 * 10.0).round() / 10.0
}

/// Hours in which the backend weights time and congestion more heavily.
pub fn is_peak_hour(hour: u8) -> bool {
	matches!(hour, 7..=9 | 17..=19)
}

#[derive(Clone, Debug, PartialEq)]
pub struct CostBar {
	pub label: &'static str,
	pub class: &'static str,
	pub value: f64,
	pub percent: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CostBreakdown {
	pub total: Option<f64>,
	pub minutes: f64,
	pub bars: [CostBar; 4],
}

impl CostBreakdown {
	pub fn new(stats: &CostVector) -> Self {
		let total = stats.total_cost;
		let bar = |label, class, value| CostBar {
			label,
			class,
			value,
			percent: bar_percent(value, total),
		};
		Self {
			total,
			minutes: format_minutes(stats.travel_time_hours),
			bars: [
				bar("Time", "bar-time", stats.time_cost),
				bar("Congestion", "bar-congestion", stats.congestion_penalty),
				bar("Emission", "bar-emission", stats.emission_cost),
				bar("Social", "bar-social", stats.social_cost),
			],
		}
	}

	pub fn minutes_label(&self) -> String {
		format!("{:.1} min", self.minutes)
	}

	pub fn total_label(&self) -> String {
		match self.total {
			Some(t) => format!("{t:.2}"),
			None => "n/a".to_owned(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn no_total_means_no_bars() {
		for v in [0.0, 1.0, 250.0] {
			assert_eq!(bar_percent(v, Some(0.0)), 0.0);
			assert_eq!(bar_percent(v, None), 0.0);
			assert_eq!(bar_percent(v, Some(f64::NAN)), 0.0);
		}
	}

	#[test]
	fn bars_are_floored_and_capped() {
		assert_eq!(bar_percent(0.0, Some(100.0)), 5.0);
		assert_eq!(bar_percent(150.0, Some(100.0)), 100.0);
		assert_eq!(bar_percent(40.0, Some(100.0)), 40.0);
	}

	#[test]
	fn bar_sum_never_runs_away() {
		let vectors = [
			CostVector {
				total_cost: Some(1e-9),
				time_cost: 1e9,
				congestion_penalty: 1e9,
				emission_cost: 1e9,
				social_cost: 1e9,
				travel_time_hours: 1.0,
			},
			CostVector {
				total_cost: Some(1e9),
				..Default::default()
			},
			CostVector::default(),
		];
		for stats in &vectors {
			let sum: f64 = CostBreakdown::new(stats).bars.iter().map(|b| b.percent).sum();
			assert!(sum <= 400.0, "sum {sum}");
		}
	}

	#[test]
	fn components_above_total_are_not_corrected() {
		let stats = CostVector {
			total_cost: Some(10.0),
			time_cost: 12.0,
			..Default::default()
		};
		let breakdown = CostBreakdown::new(&stats);
		assert_eq!(breakdown.bars[0].value, 12.0);
		assert_eq!(breakdown.bars[0].percent, 100.0);
	}

	#[test]
	fn typical_route_breakdown() {
		let stats = CostVector {
			total_cost: Some(10.0),
			time_cost: 6.0,
			congestion_penalty: 2.0,
			emission_cost: 1.0,
			social_cost: 1.0,
			travel_time_hours: 0.2,
		};
		let breakdown = CostBreakdown::new(&stats);
		let pcts: Vec<f64> = breakdown.bars.iter().map(|b| b.percent.round()).collect();
		assert_eq!(pcts, vec![60.0, 20.0, 10.0, 10.0]);
		assert_eq!(breakdown.minutes_label(), "12.0 min");
		assert_eq!(breakdown.total_label(), "10.00");
	}

	#[test]
	fn minutes_round_to_one_decimal() {
		assert_eq!(format_minutes(0.2), 12.0);
		assert_eq!(format_minutes(1.0 / 3.0), 20.0);
		assert_eq!(format_minutes(0.0123), 0.7);
	}

	#[test]
	fn peak_hours() {
		assert!(is_peak_hour(8));
		assert!(is_peak_hour(17));
		assert!(!is_peak_hour(12));
		assert!(!is_peak_hour(0));
	}
}
