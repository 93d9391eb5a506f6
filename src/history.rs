//! Per-athlete run history keyed by calendar day.
//!
//! The history holds at most one record per day; inserting a second record for
//! a day replaces the first. Views are available newest-first (the order the
//! analytics engine consumes) and oldest-first (the order exports use).

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::RunRecord;

/// Ordered, day-keyed collection of run records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunHistory {
    records: BTreeMap<NaiveDate, RunRecord>,
}

impl RunHistory {
    pub fn new() -> Self {
        RunHistory {
            records: BTreeMap::new(),
        }
    }

    /// Insert a record, returning the record it replaced for the same day
    pub fn insert(&mut self, record: RunRecord) -> Option<RunRecord> {
        let replaced = self.records.insert(record.date, record);
        if let Some(previous) = &replaced {
            tracing::debug!(date = %previous.date, "Replaced existing record for day");
        }
        replaced
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recent record
    pub fn latest(&self) -> Option<&RunRecord> {
        self.records.values().next_back()
    }

    /// First and last recorded day
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.keys().next()?;
        let last = self.records.keys().next_back()?;
        Some((*first, *last))
    }

    /// Iterate records from most recent to oldest
    pub fn iter_newest_first(&self) -> impl Iterator<Item = &RunRecord> {
        self.records.values().rev()
    }

    /// Iterate records from oldest to most recent
    pub fn iter_oldest_first(&self) -> impl Iterator<Item = &RunRecord> {
        self.records.values()
    }

    /// Owned newest-first sequence
    pub fn newest_first(&self) -> Vec<RunRecord> {
        self.iter_newest_first().cloned().collect()
    }

    /// Owned oldest-first sequence
    pub fn oldest_first(&self) -> Vec<RunRecord> {
        self.iter_oldest_first().cloned().collect()
    }
}

impl FromIterator<RunRecord> for RunHistory {
    fn from_iter<I: IntoIterator<Item = RunRecord>>(iter: I) -> Self {
        let mut history = RunHistory::new();
        history.extend(iter);
        history
    }
}

impl Extend<RunRecord> for RunHistory {
    fn extend<I: IntoIterator<Item = RunRecord>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}
