use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::record::Record;

/// Year / month / free-text criteria. Every field is optional and the
/// present ones combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// `"YYYY"`, compared verbatim against the record's year component
    #[serde(default)]
    pub year: Option<String>,

    /// `"MM"`, compared verbatim against the record's month component
    #[serde(default)]
    pub month: Option<String>,

    /// Case-insensitive substring searched in the record haystack
    #[serde(default)]
    pub query: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    pub fn month(mut self, month: impl Into<String>) -> Self {
        self.month = Some(month.into());
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// `true` when no criterion would exclude anything.
    pub fn is_pass_through(&self) -> bool {
        active(&self.year).is_none() && active(&self.month).is_none() && active(&self.query).is_none()
    }

    /// Whether a single record satisfies every present criterion.
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(year) = active(&self.year) {
            if record.year_key() != year {
                return false;
            }
        }
        if let Some(month) = active(&self.month) {
            if record.month_key() != month {
                return false;
            }
        }
        if let Some(query) = active(&self.query) {
            if !record.haystack().contains(&query.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

/// Blank and whitespace-only values count as unset.
fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Named period presets shown above the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickFilter {
    ThisMonth,
    LastMonth,
    ThisYear,
    All,
}

impl std::fmt::Display for QuickFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuickFilter::ThisMonth => write!(f, "this month"),
            QuickFilter::LastMonth => write!(f, "last month"),
            QuickFilter::ThisYear => write!(f, "this year"),
            QuickFilter::All => write!(f, "all"),
        }
    }
}

impl QuickFilter {
    /// Concrete `(year, month)` values for this preset relative to `today`.
    ///
    /// "last month" in January rolls back to December of the previous year.
    pub fn period(&self, today: NaiveDate) -> (Option<String>, Option<String>) {
        match self {
            QuickFilter::ThisMonth => (
                Some(format!("{:04}", today.year())),
                Some(format!("{:02}", today.month())),
            ),
            QuickFilter::LastMonth => {
                let (year, month) = if today.month() == 1 {
                    (today.year() - 1, 12)
                } else {
                    (today.year(), today.month() - 1)
                };
                (Some(format!("{year:04}")), Some(format!("{month:02}")))
            }
            QuickFilter::ThisYear => (Some(format!("{:04}", today.year())), None),
            QuickFilter::All => (None, None),
        }
    }

    /// Replace the period of `criteria` with this preset, keeping its query.
    pub fn apply(&self, criteria: &FilterCriteria, today: NaiveDate) -> FilterCriteria {
        let (year, month) = self.period(today);
        FilterCriteria {
            year,
            month,
            query: criteria.query.clone(),
        }
    }
}
