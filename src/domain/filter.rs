// Selection filters for sensor types and calendar dates
use super::reading::SensorReading;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// What an empty selection means for one filter dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmptyPolicy {
    MatchAll,
    MatchNone,
}

/// A multi-select filter dimension with an explicit empty-selection policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selection<T: Ord> {
    values: BTreeSet<T>,
    when_empty: EmptyPolicy,
}

impl<T: Ord> Selection<T> {
    pub fn new(values: impl IntoIterator<Item = T>, when_empty: EmptyPolicy) -> Self {
        Self {
            values: values.into_iter().collect(),
            when_empty,
        }
    }

    /// Inclusive default: nothing selected means everything passes.
    pub fn inclusive(values: impl IntoIterator<Item = T>) -> Self {
        Self::new(values, EmptyPolicy::MatchAll)
    }

    pub fn all() -> Self {
        Self::inclusive(std::iter::empty())
    }

    pub fn is_active(&self) -> bool {
        !self.values.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }

    pub fn matches<Q>(&self, value: &Q) -> bool
    where
        T: std::borrow::Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if self.values.is_empty() {
            return self.when_empty == EmptyPolicy::MatchAll;
        }
        self.values.contains(value)
    }

    /// Like `matches`, for a value that may be missing (e.g. an unparseable date).
    /// A missing value only passes when the selection is empty and matches all.
    pub fn matches_opt(&self, value: Option<&T>) -> bool {
        match value {
            Some(v) => self.matches(v),
            None => self.values.is_empty() && self.when_empty == EmptyPolicy::MatchAll,
        }
    }
}

/// Row filter shared by the table and the filter-aware views.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReadingFilter {
    pub categories: Selection<String>,
    pub dates: Selection<NaiveDate>,
}

impl Default for ReadingFilter {
    fn default() -> Self {
        Self {
            categories: Selection::all(),
            dates: Selection::all(),
        }
    }
}

impl ReadingFilter {
    pub fn new(categories: Selection<String>, dates: Selection<NaiveDate>) -> Self {
        Self { categories, dates }
    }

    pub fn is_active(&self) -> bool {
        self.categories.is_active() || self.dates.is_active()
    }

    pub fn matches(&self, reading: &SensorReading) -> bool {
        self.categories.matches(reading.sensor_type.as_str())
            && self.dates.matches_opt(reading.date_key().as_ref())
    }
}
