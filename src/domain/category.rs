// Per-sensor-type aggregates for the distribution and radial views
use super::reading::SensorReading;
use super::statistics::{round_to, RunningMean};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateMode {
    /// Number of readings per sensor type
    Count,
    /// Mean reading per sensor type, two decimals
    Average,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAggregate {
    #[serde(rename = "name")]
    pub category: String,
    pub readings: usize,
    pub value: f64,
}

#[derive(Default)]
struct Group {
    records: usize,
    mean: RunningMean,
}

/// Group readings by `sensor_type`. Output is ordered by category label.
pub fn aggregate_by_category(readings: &[SensorReading], mode: AggregateMode) -> Vec<CategoryAggregate> {
    let mut groups: BTreeMap<&str, Group> = BTreeMap::new();

    for reading in readings {
        let group = groups.entry(reading.sensor_type.as_str()).or_default();
        group.records += 1;

        if mode == AggregateMode::Average {
            match reading.value() {
                Some(value) => group.mean.push(value),
                None => tracing::warn!(
                    "Invalid reading value for {} ({}): {:?}",
                    reading.sensor_type,
                    reading.id,
                    reading.reading
                ),
            }
        }
    }

    groups
        .into_iter()
        .filter_map(|(category, group)| match mode {
            AggregateMode::Count => Some(CategoryAggregate {
                category: category.to_string(),
                readings: group.records,
                value: group.records as f64,
            }),
            AggregateMode::Average => group.mean.mean().map(|mean| CategoryAggregate {
                category: category.to_string(),
                readings: group.mean.count(),
                value: round_to(mean, 2),
            }),
        })
        .collect()
}
