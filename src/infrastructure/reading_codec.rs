// Decoding of reading payloads (NDJSON or a JSON array)
use crate::domain::reading::SensorReading;
use anyhow::{Context, Result};

/// Accepts either one JSON array of records or one record per non-blank line.
pub fn decode_readings(body: &str) -> Result<Vec<SensorReading>> {
    let trimmed = body.trim_start();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).context("Failed to parse readings array");
    }

    body.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str::<SensorReading>(line)
                .with_context(|| format!("Failed to parse reading on line {}", idx + 1))
        })
        .collect()
}
