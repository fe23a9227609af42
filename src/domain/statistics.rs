// Summary statistics over a reading set
use super::reading::SensorReading;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_readings: usize,
    pub unique_boxes: usize,
    pub min_reading: Option<String>,
    pub max_reading: Option<String>,
    pub avg_reading: Option<String>,
}

impl Statistics {
    pub fn empty() -> Self {
        Self {
            total_readings: 0,
            unique_boxes: 0,
            min_reading: None,
            max_reading: None,
            avg_reading: None,
        }
    }
}

/// Reduce a reading set to the five dashboard scalars.
///
/// Totals count every record. Extrema and mean only consider readings with a
/// finite numeric value; when none exists they stay `None`.
pub fn calculate_stats(readings: &[SensorReading]) -> Statistics {
    if readings.is_empty() {
        return Statistics::empty();
    }

    let unique_boxes = readings
        .iter()
        .map(|r| r.box_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    let values: Vec<f64> = readings.iter().filter_map(SensorReading::value).collect();
    let skipped = readings.len() - values.len();
    if skipped > 0 {
        tracing::warn!(
            "Excluded {} non-numeric readings from min/max/avg",
            skipped
        );
    }

    let (min, max, avg) = match values.split_first() {
        Some((first, rest)) => {
            let (min, max) = rest
                .iter()
                .fold((*first, *first), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
            let mut mean = RunningMean::default();
            values.iter().for_each(|v| mean.push(*v));
            // Summation error must not push the mean outside the extrema.
            let avg = mean.mean().unwrap_or(min).clamp(min, max);
            (
                Some(format_two_decimals(min)),
                Some(format_two_decimals(max)),
                Some(format_two_decimals(avg)),
            )
        }
        None => (None, None, None),
    };

    Statistics {
        total_readings: readings.len(),
        unique_boxes,
        min_reading: min,
        max_reading: max,
        avg_reading: avg,
    }
}

/// Arithmetic mean of finite values that stays finite near `f64::MAX`.
///
/// The plain sum is used while it is finite; after an overflow the
/// incremental mean takes over.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunningMean {
    count: usize,
    total: f64,
    incremental: f64,
}

impl RunningMean {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        self.total += value;
        let n = self.count as f64;
        self.incremental += value / n - self.incremental / n;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        let mean = self.total / self.count as f64;
        Some(if mean.is_finite() { mean } else { self.incremental })
    }
}

/// Round half away from zero to `digits` fractional digits.
/// Magnitudes too large to scale carry no fractional digits and pass through.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

pub fn format_two_decimals(value: f64) -> String {
    format!("{:.2}", round_to(value, 2))
}
