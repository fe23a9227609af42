use crate::application::dashboard_service::TableSettings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub server: ServerSettings,
    pub source: SourceSettings,
    pub table: TableConfig,
    pub cache: CacheSettings,
    pub display: DisplaySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Mock,
    File,
    Http,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceSettings {
    pub kind: SourceKind,
    pub mock_count: usize,
    pub mock_latency_ms: u64,
    pub mock_seed: Option<u64>,
    pub path: Option<PathBuf>,
    pub url: Option<String>,
    pub refresh_interval_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TableConfig {
    pub default_page_size: usize,
    pub page_sizes: Vec<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheSettings {
    pub capacity: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplaySettings {
    pub theme: ThemeMode,
}

impl TableConfig {
    pub fn to_settings(&self) -> anyhow::Result<TableSettings> {
        if self.page_sizes.is_empty() || self.page_sizes.contains(&0) {
            anyhow::bail!("table.page_sizes must be a non-empty list of positive sizes");
        }
        if !self.page_sizes.contains(&self.default_page_size) {
            anyhow::bail!(
                "table.default_page_size {} is not one of {:?}",
                self.default_page_size,
                self.page_sizes
            );
        }
        Ok(TableSettings {
            default_page_size: self.default_page_size,
            page_sizes: self.page_sizes.clone(),
        })
    }
}

fn builder() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(config::Config::builder()
        .set_default("server.bind", "0.0.0.0:8080")?
        .set_default("source.kind", "mock")?
        .set_default("source.mock_count", 150)?
        .set_default("source.mock_latency_ms", 500)?
        .set_default("table.default_page_size", 10)?
        .set_default("table.page_sizes", vec![10, 20, 30, 40, 50])?
        .set_default("cache.capacity", 64)?
        .set_default("display.theme", "light")?)
}

/// Defaults, then `config/dashboard.{toml,yaml,json}` if present, then
/// `DASHBOARD__SECTION__KEY` environment variables.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = builder()?
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(config::Environment::with_prefix("DASHBOARD").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
