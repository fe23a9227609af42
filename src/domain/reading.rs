// Sensor reading domain model
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Naive layouts accepted after RFC 3339 fails; interpreted as UTC.
const NAIVE_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub id: String,
    pub box_id: String,
    pub sensor_type: String,
    pub unit: String,
    pub name: String,
    pub range_l: f64,
    pub range_u: f64,
    pub longitude: f64,
    pub latitude: f64,
    #[serde(default)]
    pub reading: ReadingValue,
    pub reading_ts: String,
}

/// Measurement as delivered upstream: usually a number, sometimes text.
/// Anything else (null, booleans, objects) is kept as `Other` so one odd
/// record does not fail the whole load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReadingValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Default for ReadingValue {
    fn default() -> Self {
        ReadingValue::Other(serde_json::Value::Null)
    }
}

impl ReadingValue {
    /// Finite numeric value, or `None` when the value cannot be used in arithmetic.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            ReadingValue::Number(n) => *n,
            ReadingValue::Text(s) => s.trim().parse::<f64>().ok()?,
            ReadingValue::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for ReadingValue {
    fn from(value: f64) -> Self {
        ReadingValue::Number(value)
    }
}

impl SensorReading {
    pub fn value(&self) -> Option<f64> {
        self.reading.as_f64()
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.reading_ts)
    }

    /// UTC calendar date of the reading, used by the date filters.
    pub fn date_key(&self) -> Option<NaiveDate> {
        self.timestamp().map(|ts| ts.date_naive())
    }
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Parse a `YYYY-MM-DD` date as used in date selections.
pub fn parse_date_key(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn reading(id: &str, box_id: &str, sensor_type: &str, value: f64, ts: &str) -> SensorReading {
        SensorReading {
            id: id.to_string(),
            box_id: box_id.to_string(),
            sensor_type: sensor_type.to_string(),
            unit: "ppm".to_string(),
            name: format!("Test Sensor {}", id),
            range_l: 0.0,
            range_u: 100.0,
            longitude: 10.0,
            latitude: 20.0,
            reading: ReadingValue::Number(value),
            reading_ts: ts.to_string(),
        }
    }

    pub fn with_value(id: &str, box_id: &str, value: f64) -> SensorReading {
        reading(id, box_id, "test_sensor", value, "2026-10-16T08:15:00.000Z")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_reading_value_coercion() {
        assert_eq!(ReadingValue::Number(12.5).as_f64(), Some(12.5));
        assert_eq!(ReadingValue::Text(" 7.25 ".to_string()).as_f64(), Some(7.25));
        assert_eq!(ReadingValue::Text("n/a".to_string()).as_f64(), None);
        assert_eq!(ReadingValue::Text("NaN".to_string()).as_f64(), None);
        assert_eq!(ReadingValue::Number(f64::INFINITY).as_f64(), None);
        assert_eq!(ReadingValue::Other(serde_json::Value::Bool(true)).as_f64(), None);
    }

    #[test]
    fn test_reading_deserializes_numeric_and_text_values() {
        let json = r#"{"id":"1","box_id":"Box-abc","sensor_type":"O3","unit":"ppm","name":"Ozone",
            "range_l":1.5,"range_u":500.0,"longitude":12.0,"latitude":48.0,
            "reading":"42.1","reading_ts":"2026-10-16T08:15:30.000Z"}"#;
        let reading: SensorReading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.reading, ReadingValue::Text("42.1".to_string()));
        assert_eq!(reading.value(), Some(42.1));

        let json = json.replace("\"42.1\"", "42.1");
        let reading: SensorReading = serde_json::from_str(&json).unwrap();
        assert_eq!(reading.reading, ReadingValue::Number(42.1));
    }

    #[test]
    fn test_reading_deserializes_unusable_values() {
        let json = r#"{"id":"1","box_id":"Box-abc","sensor_type":"O3","unit":"ppm","name":"Ozone",
            "range_l":1.5,"range_u":500.0,"longitude":12.0,"latitude":48.0,
            "reading":null,"reading_ts":"2026-10-16T08:15:30.000Z"}"#;
        let reading: SensorReading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.reading, ReadingValue::Other(serde_json::Value::Null));
        assert_eq!(reading.value(), None);

        let json = json.replace("null", r#"{"raw":3}"#);
        let reading: SensorReading = serde_json::from_str(&json).unwrap();
        assert!(matches!(reading.reading, ReadingValue::Other(serde_json::Value::Object(_))));

        let json = json.replace(r#""reading":{"raw":3},"#, "");
        let reading: SensorReading = serde_json::from_str(&json).unwrap();
        assert_eq!(reading.value(), None);
    }

    #[test]
    fn test_parse_timestamp_normalises_offsets_to_utc() {
        let ts = parse_timestamp("2026-10-16T23:30:00-02:00").unwrap();
        assert_eq!(ts.day(), 17);
        assert_eq!(ts.hour(), 1);
        assert_eq!(ts.minute(), 30);
    }

    #[test]
    fn test_parse_timestamp_accepts_naive_layouts() {
        assert!(parse_timestamp("2026-10-16T08:15:30.123").is_some());
        assert!(parse_timestamp("2026-10-16 08:15:30").is_some());
        assert!(parse_timestamp("2026-10-16T08:15").is_some());
        assert!(parse_timestamp("not a timestamp").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_date_key() {
        let reading = fixtures::reading("1", "A", "O3", 1.0, "2026-10-16T08:15:00Z");
        assert_eq!(reading.date_key(), parse_date_key("2026-10-16"));
        assert_eq!(parse_date_key("16/10/2026"), None);
    }
}
