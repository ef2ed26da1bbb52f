//! Temporal bucketing of a metadata store.
//!
//! A partitioning run prunes documents whose date is missing or outside the
//! configured bounds, lays contiguous half-open `[start, end)` buckets over the
//! surviving date range, and assigns every survivor to the first bucket that
//! contains its date.

use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{info, warn};

use crate::config::ProcessingSettings;
use crate::dates::resolve_date;
use crate::error::{Error, Result};
use crate::metadata::MetadataStore;
use crate::types::{FailureReason, ValidationFailure, DATE_FIELD};

/// Label for documents whose date falls in no bucket.
pub const UNBUCKETED: &str = "";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LabelStyle {
    /// `2021-03-01`
    #[default]
    Start,
    /// `2021/03/01-2021/04/01`
    StartAndEnd,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interval {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: String,
}

impl Interval {
    fn new(start: NaiveDate, end: NaiveDate, style: LabelStyle) -> Self {
        let label = match style {
            LabelStyle::Start => start.format("%Y-%m-%d").to_string(),
            LabelStyle::StartAndEnd => format!(
                "{}-{}",
                start.format("%Y/%m/%d"),
                end.format("%Y/%m/%d")
            ),
        };
        Self { start, end, label }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

/// Result of one partitioning run.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    pub intervals: Vec<Interval>,
    /// Bucket label (or [`UNBUCKETED`]) to the filenames assigned to it.
    pub labels: BTreeMap<String, BTreeSet<String>>,
    /// Documents removed from the store during validation.
    pub failures: Vec<ValidationFailure>,
    /// Raw date string to resolved day, for every resolvable date seen.
    pub dates: HashMap<String, NaiveDate>,
}

impl Partition {
    pub fn documents(&self, label: &str) -> Option<&BTreeSet<String>> {
        self.labels.get(label)
    }

    pub fn label_of(&self, filename: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(_, files)| files.contains(filename))
            .map(|(label, _)| label.as_str())
    }

    /// Number of documents that landed in some bucket or in the unbucketed set.
    pub fn assigned_count(&self) -> usize {
        self.labels.values().map(BTreeSet::len).sum()
    }
}

#[derive(Debug, Clone)]
pub struct IntervalPartitioner {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    step_days: u32,
    style: LabelStyle,
}

impl Default for IntervalPartitioner {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            step_days: 1,
            style: LabelStyle::Start,
        }
    }
}

impl IntervalPartitioner {
    pub fn new(step_days: u32) -> Self {
        Self {
            step_days,
            ..Self::default()
        }
    }

    pub fn with_bounds(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_label_style(mut self, style: LabelStyle) -> Self {
        self.style = style;
        self
    }

    pub fn from_settings(settings: &ProcessingSettings) -> Result<Self> {
        settings.validate()?;
        let (start, end) = settings.bounds()?;
        let style = if settings.start_and_end_labels {
            LabelStyle::StartAndEnd
        } else {
            LabelStyle::Start
        };
        Ok(Self::new(settings.interval_days)
            .with_bounds(start, end)
            .with_label_style(style))
    }

    /// Validate, prune and bucket every document in `store`.
    ///
    /// Documents with unresolvable or out-of-range dates are removed from the
    /// store and reported in [`Partition::failures`]. Fails with
    /// [`Error::EmptyCorpus`] when nothing survives.
    pub fn partition(&self, store: &mut MetadataStore) -> Result<Partition> {
        let (dates, failures) = self.validate(store);

        let surviving: Vec<NaiveDate> = store
            .iter()
            .filter_map(|(_, meta)| meta.get(DATE_FIELD))
            .filter_map(|raw| dates.get(raw).copied())
            .collect();
        let (Some(&first), Some(&last)) = (surviving.iter().min(), surviving.iter().max()) else {
            return Err(Error::EmptyCorpus);
        };
        let range_start = self.start.unwrap_or(first);
        let range_end = self.end.unwrap_or(last);

        let intervals = self.build_intervals(range_start, range_end)?;

        let mut labels: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for filename in store.keys() {
            let date = store
                .raw_date(&filename)
                .and_then(|raw| dates.get(raw))
                .copied();
            let label = date
                .and_then(|d| intervals.iter().find(|interval| interval.contains(d)))
                .map_or(UNBUCKETED, |interval| interval.label.as_str());
            labels.entry(label.to_string()).or_default().insert(filename);
        }

        info!(
            documents = store.len(),
            removed = failures.len(),
            intervals = intervals.len(),
            start = %range_start,
            end = %range_end,
            "partitioned corpus"
        );
        Ok(Partition {
            intervals,
            labels,
            failures,
            dates,
        })
    }

    fn validate(
        &self,
        store: &mut MetadataStore,
    ) -> (HashMap<String, NaiveDate>, Vec<ValidationFailure>) {
        let mut dates = HashMap::new();
        let mut failures = Vec::new();
        for filename in store.keys() {
            let raw = store.raw_date(&filename).unwrap_or_default().to_string();
            let reason = match resolve_date(&raw) {
                None => Some(FailureReason::InvalidDate),
                Some(date) => {
                    dates.insert(raw, date);
                    if self.start.is_some_and(|start| date < start) {
                        Some(FailureReason::BeforeRange)
                    } else if self.end.is_some_and(|end| date > end) {
                        Some(FailureReason::AfterRange)
                    } else {
                        None
                    }
                }
            };
            if let Some(reason) = reason {
                warn!(%filename, %reason, "removing document");
                store.remove(&filename);
                failures.push(ValidationFailure { filename, reason });
            }
        }
        (dates, failures)
    }

    /// Contiguous buckets from `start`, stepping while the bucket start is
    /// still `<= end`. The last bucket may run past `end`.
    pub fn build_intervals(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Interval>> {
        if self.step_days == 0 {
            return Err(Error::InvalidConfig(
                "interval step must be at least one day".to_string(),
            ));
        }
        let mut intervals = Vec::new();
        let mut cursor = start;
        while cursor <= end {
            let next = cursor
                .checked_add_days(Days::new(u64::from(self.step_days)))
                .ok_or_else(|| {
                    Error::Operation(format!("interval after {cursor} overflows the calendar"))
                })?;
            intervals.push(Interval::new(cursor, next, self.style));
            cursor = next;
        }
        Ok(intervals)
    }
}
