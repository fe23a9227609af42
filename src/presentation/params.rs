// Query-string parsing for the dashboard endpoints
use crate::domain::filter::{ReadingFilter, Selection};
use crate::domain::reading::parse_date_key;
use crate::domain::table::{Column, SortDirection, SortSpec, TableQuery};
use crate::error::{DashboardError, DashboardResult};
use chrono::NaiveDate;
use serde::Deserialize;

/// Comma-separated multi-select values; absent or empty means nothing selected.
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    pub sensors: Option<String>,
    pub dates: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TableParams {
    pub sensors: Option<String>,
    pub dates: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

fn split_list(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

impl FilterParams {
    pub fn categories(&self) -> Selection<String> {
        Selection::inclusive(split_list(self.sensors.as_deref()).map(str::to_string))
    }

    pub fn dates(&self) -> DashboardResult<Selection<NaiveDate>> {
        let dates = split_list(self.dates.as_deref())
            .map(|raw| {
                parse_date_key(raw)
                    .ok_or_else(|| DashboardError::InvalidQuery(format!("invalid date '{}', expected YYYY-MM-DD", raw)))
            })
            .collect::<DashboardResult<Vec<_>>>()?;
        Ok(Selection::inclusive(dates))
    }

    pub fn to_filter(&self) -> DashboardResult<ReadingFilter> {
        Ok(ReadingFilter::new(self.categories(), self.dates()?))
    }
}

impl TableParams {
    fn filter_params(&self) -> FilterParams {
        FilterParams {
            sensors: self.sensors.clone(),
            dates: self.dates.clone(),
        }
    }

    pub fn to_query(&self, default_page_size: usize) -> DashboardResult<TableQuery> {
        let sort = match self.sort.as_deref().filter(|s| !s.is_empty()) {
            Some(column) => {
                let column = column.parse::<Column>().map_err(DashboardError::InvalidQuery)?;
                let direction = match self.order.as_deref() {
                    Some(order) => order.parse::<SortDirection>().map_err(DashboardError::InvalidQuery)?,
                    None => SortDirection::default(),
                };
                Some(SortSpec { column, direction })
            }
            None => None,
        };

        Ok(TableQuery {
            filter: self.filter_params().to_filter()?,
            sort,
            page_index: self.page.unwrap_or(0),
            page_size: self.page_size.unwrap_or(default_page_size),
        })
    }
}
