// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod file_source;
pub mod http_source;
pub mod mock_source;
pub mod reading_codec;

use crate::application::reading_source::ReadingSource;
use crate::infrastructure::config::{SourceKind, SourceSettings};
use crate::infrastructure::file_source::FileReadingSource;
use crate::infrastructure::http_source::HttpReadingSource;
use crate::infrastructure::mock_source::MockReadingSource;
use std::sync::Arc;
use std::time::Duration;

/// Pick the reading source named by the configuration.
pub fn build_reading_source(settings: &SourceSettings) -> anyhow::Result<Arc<dyn ReadingSource>> {
    let source: Arc<dyn ReadingSource> = match settings.kind {
        SourceKind::Mock => Arc::new(MockReadingSource::new(
            settings.mock_count,
            Duration::from_millis(settings.mock_latency_ms),
            settings.mock_seed,
        )),
        SourceKind::File => {
            let Some(path) = &settings.path else {
                anyhow::bail!("source.path is required for the file source");
            };
            Arc::new(FileReadingSource::new(path.clone()))
        }
        SourceKind::Http => {
            let Some(url) = &settings.url else {
                anyhow::bail!("source.url is required for the http source");
            };
            Arc::new(HttpReadingSource::new(url.clone())?)
        }
    };
    Ok(source)
}
