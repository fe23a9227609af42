// Time-of-day bucketed multi-series builder for the line chart
use super::filter::Selection;
use super::reading::SensorReading;
use super::statistics::RunningMean;
use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// Minute-resolution clock time with the date and zone stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeBucket(NaiveTime);

impl TimeBucket {
    pub fn of<T: Timelike>(time: &T) -> Self {
        // hour() < 24 and minute() < 60 always hold
        let time = NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or_default();
        Self(time)
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl Serialize for TimeBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One chart row: a bucket plus one entry per effective category.
/// `None` marks "no data" so the chart bridges the gap instead of dipping to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesPoint {
    pub time: TimeBucket,
    pub values: Vec<(String, Option<f64>)>,
}

impl TimeSeriesPoint {
    pub fn value(&self, category: &str) -> Option<Option<f64>> {
        self.values
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, value)| *value)
    }
}

impl Serialize for TimeSeriesPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry("time", &self.time)?;
        for (category, value) in &self.values {
            map.serialize_entry(category, value)?;
        }
        map.end()
    }
}

/// Record accounting for one build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeriesSummary {
    pub input: usize,
    /// Removed by the date or category selection
    pub excluded: usize,
    /// Malformed timestamp or non-numeric reading
    pub skipped: usize,
    pub aggregated: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    pub categories: Vec<String>,
    pub points: Vec<TimeSeriesPoint>,
    pub summary: SeriesSummary,
}

/// Bucket readings by time of day and average them per category.
///
/// An empty category selection means every category present after the date
/// filter; an empty date selection means every date.
pub fn build_time_series(
    readings: &[SensorReading],
    categories: &Selection<String>,
    dates: &Selection<NaiveDate>,
) -> TimeSeries {
    let mut summary = SeriesSummary {
        input: readings.len(),
        ..SeriesSummary::default()
    };

    // Date filter first; remember parsed timestamps for the bucketing pass.
    let mut dated = Vec::with_capacity(readings.len());
    for reading in readings {
        let ts = reading.timestamp();
        if dates.is_active() {
            match ts {
                Some(ts) if dates.matches(&ts.date_naive()) => {}
                Some(_) => {
                    summary.excluded += 1;
                    continue;
                }
                None => {
                    tracing::debug!("Skipping reading {} with invalid timestamp {:?}", reading.id, reading.reading_ts);
                    summary.skipped += 1;
                    continue;
                }
            }
        }
        dated.push((reading, ts));
    }

    let effective: Vec<String> = if categories.is_active() {
        categories.values().cloned().collect()
    } else {
        dated
            .iter()
            .map(|(r, _)| r.sensor_type.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    };

    let mut buckets: BTreeMap<TimeBucket, HashMap<&str, RunningMean>> = BTreeMap::new();
    for (reading, ts) in dated {
        if !categories.matches(reading.sensor_type.as_str()) {
            summary.excluded += 1;
            continue;
        }
        let Some(ts) = ts else {
            tracing::debug!("Skipping reading {} with invalid timestamp {:?}", reading.id, reading.reading_ts);
            summary.skipped += 1;
            continue;
        };
        let Some(value) = reading.value() else {
            tracing::debug!(
                "Skipping invalid reading value for {} at {}: {:?}",
                reading.sensor_type,
                reading.reading_ts,
                reading.reading
            );
            summary.skipped += 1;
            continue;
        };

        buckets
            .entry(TimeBucket::of(&ts))
            .or_default()
            .entry(reading.sensor_type.as_str())
            .or_default()
            .push(value);
        summary.aggregated += 1;
    }

    if summary.skipped > 0 {
        tracing::warn!(
            "Skipped {} of {} readings with malformed timestamp or value",
            summary.skipped,
            summary.input
        );
    }

    let points = buckets
        .into_iter()
        .map(|(time, per_category)| TimeSeriesPoint {
            time,
            values: effective
                .iter()
                .map(|category| {
                    let mean = per_category.get(category.as_str()).and_then(RunningMean::mean);
                    (category.clone(), mean)
                })
                .collect(),
        })
        .collect();

    TimeSeries {
        categories: effective,
        points,
        summary,
    }
}
