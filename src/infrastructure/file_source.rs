// File-backed reading source (NDJSON or JSON array)
use crate::application::reading_source::ReadingSource;
use crate::domain::reading::SensorReading;
use crate::infrastructure::reading_codec::decode_readings;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct FileReadingSource {
    path: PathBuf,
}

impl FileReadingSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ReadingSource for FileReadingSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_readings(&self) -> Result<Vec<SensorReading>> {
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        let readings = decode_readings(&body)?;
        tracing::debug!("Decoded {} readings from {}", readings.len(), self.path.display());
        Ok(readings)
    }
}
