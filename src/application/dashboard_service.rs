// Dashboard service - Load state and the derived views served to the UI
use crate::application::reading_source::ReadingSource;
use crate::application::view_cache::ViewCache;
use crate::domain::category::{aggregate_by_category, AggregateMode, CategoryAggregate};
use crate::domain::filter::Selection;
use crate::domain::reading::SensorReading;
use crate::domain::statistics::{calculate_stats, Statistics};
use crate::domain::table::{filter_options, query_table, FilterOptions, TablePage, TableQuery};
use crate::domain::time_series::{build_time_series, TimeSeries};
use crate::error::{DashboardError, DashboardResult};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, RwLock};

/// Immutable reading set produced by one successful load.
#[derive(Debug, Clone)]
pub struct ReadingSnapshot {
    pub version: u64,
    pub readings: Arc<[SensorReading]>,
}

#[derive(Debug, Clone)]
pub enum LoadState {
    Loading,
    Ready(ReadingSnapshot),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStatus {
    pub state: &'static str,
    pub version: Option<u64>,
    pub records: Option<usize>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub categories: Selection<String>,
    pub dates: Selection<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct TableSettings {
    pub default_page_size: usize,
    pub page_sizes: Vec<usize>,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            page_sizes: vec![10, 20, 30, 40, 50],
        }
    }
}

pub struct DashboardService {
    source: Arc<dyn ReadingSource>,
    state: RwLock<LoadState>,
    /// Serializes reloads so an older fetch never overwrites a newer one
    reload_lock: Mutex<()>,
    next_version: AtomicU64,
    table_settings: TableSettings,
    statistics: ViewCache<(), Statistics>,
    categories: ViewCache<AggregateMode, Vec<CategoryAggregate>>,
    series: ViewCache<SeriesKey, TimeSeries>,
    options: ViewCache<(), FilterOptions>,
}

impl DashboardService {
    pub fn new(source: Arc<dyn ReadingSource>, table_settings: TableSettings, cache_capacity: usize) -> Self {
        Self {
            source,
            state: RwLock::new(LoadState::Loading),
            reload_lock: Mutex::new(()),
            next_version: AtomicU64::new(1),
            table_settings,
            statistics: ViewCache::new(1),
            categories: ViewCache::new(2),
            series: ViewCache::new(cache_capacity),
            options: ViewCache::new(1),
        }
    }

    pub fn table_settings(&self) -> &TableSettings {
        &self.table_settings
    }

    /// Fetch a fresh reading set. Views report `Loading` until it settles;
    /// a failure replaces any previous data with a single error state.
    pub async fn reload(&self) -> DashboardResult<DashboardStatus> {
        let _reloading = self.reload_lock.lock().await;
        *self.state.write().await = LoadState::Loading;

        let started = Instant::now();
        let source = self.source.describe();
        tracing::info!("Loading readings from {}", source);

        let next = match self.source.fetch_readings().await {
            Ok(readings) => {
                let version = self.next_version.fetch_add(1, Ordering::SeqCst);
                tracing::info!(
                    "Loaded {} readings from {} in {:?} (version {})",
                    readings.len(),
                    source,
                    started.elapsed(),
                    version
                );
                LoadState::Ready(ReadingSnapshot {
                    version,
                    readings: readings.into(),
                })
            }
            Err(e) => {
                tracing::error!("Error loading readings from {}: {:#}", source, e);
                LoadState::Failed(format!("{:#}", e))
            }
        };

        let outcome = match &next {
            LoadState::Failed(message) => Err(DashboardError::SourceFailed(message.clone())),
            _ => Ok(()),
        };
        *self.state.write().await = next;
        outcome?;

        Ok(self.status().await)
    }

    pub async fn status(&self) -> DashboardStatus {
        match &*self.state.read().await {
            LoadState::Loading => DashboardStatus {
                state: "loading",
                version: None,
                records: None,
                error: None,
            },
            LoadState::Ready(snapshot) => DashboardStatus {
                state: "ready",
                version: Some(snapshot.version),
                records: Some(snapshot.readings.len()),
                error: None,
            },
            LoadState::Failed(message) => DashboardStatus {
                state: "failed",
                version: None,
                records: None,
                error: Some(message.clone()),
            },
        }
    }

    pub async fn snapshot(&self) -> DashboardResult<ReadingSnapshot> {
        match &*self.state.read().await {
            LoadState::Loading => Err(DashboardError::Loading),
            LoadState::Ready(snapshot) => Ok(snapshot.clone()),
            LoadState::Failed(message) => Err(DashboardError::SourceFailed(message.clone())),
        }
    }

    pub async fn statistics(&self) -> DashboardResult<Arc<Statistics>> {
        let snapshot = self.snapshot().await?;
        Ok(self
            .statistics
            .get_or_compute(snapshot.version, (), || calculate_stats(&snapshot.readings))
            .await)
    }

    pub async fn category_aggregates(&self, mode: AggregateMode) -> DashboardResult<Arc<Vec<CategoryAggregate>>> {
        let snapshot = self.snapshot().await?;
        Ok(self
            .categories
            .get_or_compute(snapshot.version, mode, || aggregate_by_category(&snapshot.readings, mode))
            .await)
    }

    pub async fn time_series(
        &self,
        categories: Selection<String>,
        dates: Selection<NaiveDate>,
    ) -> DashboardResult<Arc<TimeSeries>> {
        let snapshot = self.snapshot().await?;
        let key = SeriesKey { categories, dates };
        let series = self
            .series
            .get_or_compute(snapshot.version, key.clone(), || {
                build_time_series(&snapshot.readings, &key.categories, &key.dates)
            })
            .await;
        Ok(series)
    }

    pub async fn filter_options(&self) -> DashboardResult<Arc<FilterOptions>> {
        let snapshot = self.snapshot().await?;
        Ok(self
            .options
            .get_or_compute(snapshot.version, (), || filter_options(&snapshot.readings))
            .await)
    }

    pub async fn table(&self, query: TableQuery) -> DashboardResult<TablePage> {
        if !self.table_settings.page_sizes.contains(&query.page_size) {
            return Err(DashboardError::InvalidQuery(format!(
                "page_size must be one of {:?}",
                self.table_settings.page_sizes
            )));
        }
        let snapshot = self.snapshot().await?;
        Ok(query_table(&snapshot.readings, &query))
    }
}
