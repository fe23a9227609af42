// Mock reading generator with simulated fetch latency
use crate::application::reading_source::ReadingSource;
use crate::domain::reading::{ReadingValue, SensorReading};
use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// (sensor_type, unit, name)
const SENSORS: [(&str, &str, &str); 4] = [
    ("O3", "ppm", "Ozone"),
    ("NO2", "ppm", "Nitrogen Dioxide"),
    ("CO", "ppm", "Carbon Monoxide"),
    ("TEMP", "°C", "Temperature"),
];

const RECENT_WINDOW_MS: i64 = 24 * 60 * 60 * 1000;

pub struct MockReadingSource {
    count: usize,
    latency: std::time::Duration,
    rng: Mutex<StdRng>,
}

impl MockReadingSource {
    pub fn new(count: usize, latency: std::time::Duration, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            count,
            latency,
            rng: Mutex::new(rng),
        }
    }
}

#[async_trait]
impl ReadingSource for MockReadingSource {
    fn describe(&self) -> String {
        format!("mock({})", self.count)
    }

    async fn fetch_readings(&self) -> anyhow::Result<Vec<SensorReading>> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let mut rng = self
            .rng
            .lock()
            .map_err(|_| anyhow::anyhow!("mock generator state poisoned"))?;
        Ok(generate_readings(&mut *rng, self.count, Utc::now()))
    }
}

/// Random readings spread over the 24 hours before `now`.
pub fn generate_readings<R: Rng>(rng: &mut R, count: usize, now: DateTime<Utc>) -> Vec<SensorReading> {
    (0..count)
        .map(|_| {
            let (sensor_type, unit, name) = SENSORS[rng.gen_range(0..SENSORS.len())];
            let suffix: String = (&mut *rng).sample_iter(&Alphanumeric).take(3).map(char::from).collect();
            let ts = now - Duration::milliseconds(rng.gen_range(0..RECENT_WINDOW_MS));
            let id = uuid::Builder::from_random_bytes(rng.r#gen()).into_uuid();

            SensorReading {
                id: id.to_string(),
                box_id: format!("Box-{}", suffix),
                sensor_type: sensor_type.to_string(),
                unit: unit.to_string(),
                name: name.to_string(),
                range_l: rng.gen_range(0.0..10.0),
                range_u: rng.gen_range(100.0..1000.0),
                longitude: rng.gen_range(-180.0..180.0),
                latitude: rng.gen_range(-90.0..90.0),
                reading: ReadingValue::Number(rng.gen_range(0.0..500.0)),
                reading_ts: ts.to_rfc3339_opts(SecondsFormat::Millis, true),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::statistics::calculate_stats;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_generated_records_have_expected_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let readings = generate_readings(&mut rng, 150, now());
        assert_eq!(readings.len(), 150);

        for r in &readings {
            assert!(SENSORS.iter().any(|(t, u, n)| *t == r.sensor_type && *u == r.unit && *n == r.name));
            assert!(r.box_id.starts_with("Box-") && r.box_id.len() == 7);
            assert!(uuid::Uuid::parse_str(&r.id).is_ok());
            let value = r.value().unwrap();
            assert!((0.0..500.0).contains(&value));
            let ts = r.timestamp().unwrap();
            assert!(ts <= now() && ts > now() - Duration::hours(24));
            assert!(r.reading_ts.ends_with('Z'));
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = generate_readings(&mut StdRng::seed_from_u64(42), 20, now());
        let b = generate_readings(&mut StdRng::seed_from_u64(42), 20, now());
        assert_eq!(a, b);
        assert_eq!(calculate_stats(&a), calculate_stats(&b));
    }

    #[tokio::test]
    async fn test_source_resolves_with_requested_count() {
        let source = MockReadingSource::new(25, std::time::Duration::ZERO, Some(1));
        assert_eq!(source.describe(), "mock(25)");
        let readings = source.fetch_readings().await.unwrap();
        assert_eq!(readings.len(), 25);
    }

    #[tokio::test]
    async fn test_source_simulates_latency() {
        let source = MockReadingSource::new(1, std::time::Duration::from_millis(50), Some(1));
        let started = tokio::time::Instant::now();
        source.fetch_readings().await.unwrap();
        assert!(started.elapsed() >= std::time::Duration::from_millis(50));
    }
}
