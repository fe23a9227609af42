// Table view: column comparators, filtering, sorting and pagination
use super::filter::ReadingFilter;
use super::reading::{parse_timestamp, SensorReading};
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Id,
    BoxId,
    SensorType,
    Unit,
    Name,
    RangeL,
    RangeU,
    Longitude,
    Latitude,
    Reading,
    ReadingTs,
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Column::Id),
            "box_id" => Ok(Column::BoxId),
            "sensor_type" => Ok(Column::SensorType),
            "unit" => Ok(Column::Unit),
            "name" => Ok(Column::Name),
            "range_l" => Ok(Column::RangeL),
            "range_u" => Ok(Column::RangeU),
            "longitude" => Ok(Column::Longitude),
            "latitude" => Ok(Column::Latitude),
            "reading" => Ok(Column::Reading),
            "reading_ts" => Ok(Column::ReadingTs),
            other => Err(format!("unknown column '{}'", other)),
        }
    }
}

impl Column {
    /// Ascending order for this column.
    pub fn compare(&self, a: &SensorReading, b: &SensorReading) -> Ordering {
        self.compare_directed(a, b, SortDirection::Ascending)
    }

    /// Order in `direction`. Unparseable timestamps stay first and non-numeric
    /// readings stay last whichever way the column is sorted.
    pub fn compare_directed(&self, a: &SensorReading, b: &SensorReading, direction: SortDirection) -> Ordering {
        match self {
            Column::Id => direction.apply(compare_text(&a.id, &b.id)),
            Column::BoxId => direction.apply(compare_text(&a.box_id, &b.box_id)),
            Column::SensorType => direction.apply(compare_text(&a.sensor_type, &b.sensor_type)),
            Column::Unit => direction.apply(compare_text(&a.unit, &b.unit)),
            Column::Name => direction.apply(compare_text(&a.name, &b.name)),
            Column::RangeL => direction.apply(a.range_l.total_cmp(&b.range_l)),
            Column::RangeU => direction.apply(a.range_u.total_cmp(&b.range_u)),
            Column::Longitude => direction.apply(a.longitude.total_cmp(&b.longitude)),
            Column::Latitude => direction.apply(a.latitude.total_cmp(&b.latitude)),
            Column::Reading => compare_present(a.value(), b.value(), Missing::Last, direction, f64::total_cmp)
                .unwrap_or(Ordering::Equal),
            Column::ReadingTs => compare_timestamps_directed(&a.reading_ts, &b.reading_ts, direction),
        }
    }
}

/// Locale-style text ordering: case-insensitive first, lowercase before
/// uppercase when the folded forms are equal.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| b.cmp(a))
}

/// Chronological ordering of raw timestamps. Unparseable values sort first.
pub fn compare_timestamps(a: &str, b: &str) -> Ordering {
    compare_timestamps_directed(a, b, SortDirection::Ascending)
}

fn compare_timestamps_directed(a: &str, b: &str, direction: SortDirection) -> Ordering {
    compare_present(parse_timestamp(a), parse_timestamp(b), Missing::First, direction, |x, y| x.cmp(y))
        .unwrap_or_else(|| a.cmp(b))
}

#[derive(Clone, Copy)]
enum Missing {
    First,
    Last,
}

/// Present values follow `direction`; missing ones keep their fixed place.
/// `None` when both are missing, leaving the tie-break to the caller.
fn compare_present<T>(
    a: Option<T>,
    b: Option<T>,
    missing: Missing,
    direction: SortDirection,
    cmp: impl FnOnce(&T, &T) -> Ordering,
) -> Option<Ordering> {
    let missing_before = match missing {
        Missing::First => Ordering::Less,
        Missing::Last => Ordering::Greater,
    };
    match (a, b) {
        (Some(x), Some(y)) => Some(direction.apply(cmp(&x, &y))),
        (None, Some(_)) => Some(missing_before),
        (Some(_), None) => Some(missing_before.reverse()),
        (None, None) => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(format!("unknown sort order '{}'", other)),
        }
    }
}

impl SortDirection {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortSpec {
    pub column: Column,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableQuery {
    pub filter: ReadingFilter,
    pub sort: Option<SortSpec>,
    pub page_index: usize,
    pub page_size: usize,
}

/// Why a page has no rows. The two cases carry different user-facing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyState {
    NoRecords,
    NoMatches,
}

impl EmptyState {
    pub fn message(&self) -> &'static str {
        match self {
            EmptyState::NoRecords => "No records found",
            EmptyState::NoMatches => "No records found matching your filters",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmptyNotice {
    pub kind: EmptyState,
    pub message: &'static str,
}

impl From<EmptyState> for EmptyNotice {
    fn from(kind: EmptyState) -> Self {
        Self {
            kind,
            message: kind.message(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePage {
    pub rows: Vec<SensorReading>,
    pub total_records: usize,
    pub matching_records: usize,
    pub page_index: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub filtered: bool,
    pub empty: Option<EmptyNotice>,
}

/// Filter, sort and paginate. The page index is clamped to the last page.
pub fn query_table(readings: &[SensorReading], query: &TableQuery) -> TablePage {
    let mut matching: Vec<&SensorReading> = readings.iter().filter(|r| query.filter.matches(r)).collect();

    if let Some(sort) = query.sort {
        matching.sort_by(|a, b| sort.column.compare_directed(a, b, sort.direction));
    }

    let page_size = query.page_size.max(1);
    let page_count = matching.len().div_ceil(page_size);
    let page_index = query.page_index.min(page_count.saturating_sub(1));

    let rows = matching
        .iter()
        .skip(page_index * page_size)
        .take(page_size)
        .map(|r| (*r).clone())
        .collect();

    let filtered = query.filter.is_active();
    let empty = empty_state(readings.len(), matching.len(), filtered).map(EmptyNotice::from);

    TablePage {
        rows,
        total_records: readings.len(),
        matching_records: matching.len(),
        page_index,
        page_size,
        page_count,
        filtered,
        empty,
    }
}

pub fn empty_state(total: usize, matching: usize, filter_active: bool) -> Option<EmptyState> {
    match (total, matching) {
        (0, _) => Some(EmptyState::NoRecords),
        (_, 0) if filter_active => Some(EmptyState::NoMatches),
        (_, 0) => Some(EmptyState::NoRecords),
        _ => None,
    }
}

/// Values offered by the sensor-type and date multi-selects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    /// Ascending
    pub sensor_types: Vec<String>,
    /// Newest first
    pub dates: Vec<NaiveDate>,
}

pub fn filter_options(readings: &[SensorReading]) -> FilterOptions {
    let sensor_types: BTreeSet<&str> = readings.iter().map(|r| r.sensor_type.as_str()).collect();
    let dates: BTreeSet<NaiveDate> = readings.iter().filter_map(SensorReading::date_key).collect();

    FilterOptions {
        sensor_types: sensor_types.into_iter().map(str::to_string).collect(),
        dates: dates.into_iter().rev().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filter::Selection;
    use crate::domain::reading::fixtures::reading;
    use crate::domain::reading::{parse_date_key, ReadingValue};

    fn sample() -> Vec<SensorReading> {
        vec![
            reading("1", "Box-b", "TEMP", 21.0, "2026-10-16T10:00:00Z"),
            reading("2", "Box-a", "O3", 5.0, "2026-10-17T09:00:00+02:00"),
            reading("3", "box-C", "CO", 300.0, "2026-10-16T08:00:00Z"),
            reading("4", "Box-d", "O3", 42.0, "2026-10-17T06:30:00Z"),
        ]
    }

    fn query(filter: ReadingFilter, sort: Option<SortSpec>, page_index: usize, page_size: usize) -> TableQuery {
        TableQuery {
            filter,
            sort,
            page_index,
            page_size,
        }
    }

    fn ids(page: &TablePage) -> Vec<&str> {
        page.rows.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_compare_text_is_case_insensitive() {
        assert_eq!(compare_text("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_text("Zeta", "alpha"), Ordering::Greater);
        assert_eq!(compare_text("a", "A"), Ordering::Less);
        assert_eq!(compare_text("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_compare_timestamps_is_chronological() {
        // Lexically the first sorts before the second; as instants it is later.
        assert_eq!(
            compare_timestamps("2026-10-16T23:00:00Z", "2026-10-17T00:30:00+05:00"),
            Ordering::Greater
        );
        assert_eq!(compare_timestamps("bogus", "2026-10-16T23:00:00Z"), Ordering::Less);
    }

    #[test]
    fn test_sort_by_timestamp() {
        let sort = SortSpec {
            column: Column::ReadingTs,
            direction: SortDirection::Ascending,
        };
        let page = query_table(&sample(), &query(ReadingFilter::default(), Some(sort), 0, 10));
        assert_eq!(ids(&page), vec!["3", "1", "4", "2"]);
    }

    #[test]
    fn test_sort_by_text_and_number_descending() {
        let by_box = SortSpec {
            column: Column::BoxId,
            direction: SortDirection::Ascending,
        };
        let page = query_table(&sample(), &query(ReadingFilter::default(), Some(by_box), 0, 10));
        assert_eq!(ids(&page), vec!["2", "1", "3", "4"]);

        let by_reading = SortSpec {
            column: Column::Reading,
            direction: SortDirection::Descending,
        };
        let page = query_table(&sample(), &query(ReadingFilter::default(), Some(by_reading), 0, 10));
        assert_eq!(ids(&page), vec!["3", "4", "1", "2"]);
    }

    #[test]
    fn test_non_numeric_readings_sort_last() {
        let mut readings = sample();
        readings[0].reading = ReadingValue::Text("n/a".to_string());
        let sort = SortSpec {
            column: Column::Reading,
            direction: SortDirection::Ascending,
        };
        let page = query_table(&readings, &query(ReadingFilter::default(), Some(sort), 0, 10));
        assert_eq!(ids(&page).last(), Some(&"1"));

        let descending = SortSpec {
            direction: SortDirection::Descending,
            ..sort
        };
        let page = query_table(&readings, &query(ReadingFilter::default(), Some(descending), 0, 10));
        assert_eq!(ids(&page), vec!["3", "4", "2", "1"]);
    }

    #[test]
    fn test_unparseable_timestamps_sort_first_in_both_directions() {
        let mut readings = sample();
        readings[3].reading_ts = "bogus".to_string();
        for (direction, expected) in [
            (SortDirection::Ascending, vec!["4", "3", "1", "2"]),
            (SortDirection::Descending, vec!["4", "2", "1", "3"]),
        ] {
            let sort = SortSpec {
                column: Column::ReadingTs,
                direction,
            };
            let page = query_table(&readings, &query(ReadingFilter::default(), Some(sort), 0, 10));
            assert_eq!(ids(&page), expected);
        }
    }

    #[test]
    fn test_pagination_clamps_page_index() {
        let page = query_table(&sample(), &query(ReadingFilter::default(), None, 7, 3));
        assert_eq!(page.page_count, 2);
        assert_eq!(page.page_index, 1);
        assert_eq!(ids(&page), vec!["4"]);
        assert!(page.empty.is_none());
    }

    #[test]
    fn test_filters_apply_to_rows() {
        let filter = ReadingFilter::new(
            Selection::inclusive(vec!["O3".to_string()]),
            Selection::inclusive(vec![parse_date_key("2026-10-17").unwrap()]),
        );
        let page = query_table(&sample(), &query(filter, None, 0, 10));
        assert_eq!(ids(&page), vec!["2", "4"]);
        assert_eq!(page.total_records, 4);
        assert_eq!(page.matching_records, 2);
        assert!(page.filtered);
    }

    #[test]
    fn test_empty_source_reports_no_records() {
        let page = query_table(&[], &query(ReadingFilter::default(), None, 0, 10));
        assert_eq!(page.page_count, 0);
        assert_eq!(page.page_index, 0);
        assert_eq!(page.empty.map(|e| e.kind), Some(EmptyState::NoRecords));
    }

    #[test]
    fn test_filter_excluding_everything_reports_no_matches() {
        let filter = ReadingFilter::new(Selection::inclusive(vec!["NO2".to_string()]), Selection::all());
        let page = query_table(&sample(), &query(filter, None, 0, 10));
        let empty = page.empty.unwrap();
        assert_eq!(empty.kind, EmptyState::NoMatches);
        assert_eq!(empty.message, "No records found matching your filters");
    }

    #[test]
    fn test_filter_options() {
        let options = filter_options(&sample());
        assert_eq!(options.sensor_types, vec!["CO", "O3", "TEMP"]);
        assert_eq!(
            options.dates,
            vec![parse_date_key("2026-10-17").unwrap(), parse_date_key("2026-10-16").unwrap()]
        );
    }

    #[test]
    fn test_column_parsing() {
        assert_eq!("reading_ts".parse::<Column>(), Ok(Column::ReadingTs));
        assert!("colour".parse::<Column>().is_err());
        assert_eq!("DESC".parse::<SortDirection>(), Ok(SortDirection::Descending));
    }
}
