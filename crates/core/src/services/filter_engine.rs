use std::collections::BTreeSet;

use crate::models::filter::FilterCriteria;
use crate::models::record::Record;

/// Applies year / month / free-text criteria to a view.
///
/// Never fails: criteria that match nothing produce an empty view, which
/// the renderer shows as "no records".
pub struct FilterEngine;

impl FilterEngine {
    /// Records matching every present criterion, in input order.
    /// Applying the same criteria twice yields the same view.
    pub fn filter<'a, I>(records: I, criteria: &FilterCriteria) -> Vec<&'a Record>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        if criteria.is_pass_through() {
            return records.into_iter().collect();
        }
        records
            .into_iter()
            .filter(|record| criteria.matches(record))
            .collect()
    }

    /// Distinct `"YYYY"` values, newest first, for the year selector.
    pub fn available_years<'a, I>(records: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let years: BTreeSet<&str> = records.into_iter().map(|r| r.year_key()).collect();
        years.into_iter().rev().map(str::to_string).collect()
    }

    /// Distinct `"MM"` values within `year` (or across all years), ascending.
    pub fn available_months<'a, I>(records: I, year: Option<&str>) -> Vec<String>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let months: BTreeSet<&str> = records
            .into_iter()
            .filter(|r| year.map_or(true, |y| r.year_key() == y))
            .map(|r| r.month_key())
            .collect();
        months.into_iter().map(str::to_string).collect()
    }
}
