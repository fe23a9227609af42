// Record source trait for loading reading sets
use crate::domain::reading::SensorReading;
use async_trait::async_trait;

#[async_trait]
pub trait ReadingSource: Send + Sync {
    /// Short label for logs, e.g. "mock(150)" or a file path
    fn describe(&self) -> String;

    /// Load the complete reading set. Resolves once per call; an error means
    /// nothing was loaded.
    async fn fetch_readings(&self) -> anyhow::Result<Vec<SensorReading>>;
}
