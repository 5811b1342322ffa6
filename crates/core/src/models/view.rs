use serde::{Deserialize, Serialize};

use super::filter::{FilterCriteria, QuickFilter};
use super::kpi::{GroupedSeries, KpiDisplay, KpiSummary};
use super::record::Record;
use super::sort::{SortColumn, SortState};

/// The UI's single mutable state: what is filtered and how it is sorted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub criteria: FilterCriteria,

    /// `None` keeps storage order
    pub sort: Option<SortState>,

    /// Preset that produced the current period, cleared by manual edits
    pub quick_filter: Option<QuickFilter>,
}

/// Control interactions the binder reacts to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewEvent {
    SetYear(Option<String>),
    SetMonth(Option<String>),
    SetQuery(String),
    ApplyQuickFilter(QuickFilter),
    ClickColumn(SortColumn),
    Reset,
}

/// Why the table has no rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EmptyState {
    /// Data loaded, the current filters just match nothing
    NoRecords,
    /// The bulk load itself failed
    LoadError { message: String },
}

/// Everything the renderer needs for one paint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel<'a> {
    pub kpis: KpiSummary,
    pub display: KpiDisplay,
    /// Filtered and sorted, ready to render
    pub rows: Vec<&'a Record>,
    pub series: GroupedSeries,
    /// Records excluded by the current filters
    pub hidden_count: usize,
    pub empty_state: Option<EmptyState>,
}

impl ViewModel<'static> {
    /// The model shown when the bulk load failed.
    pub fn load_error(message: impl Into<String>, display: KpiDisplay) -> Self {
        Self {
            kpis: KpiSummary::default(),
            display,
            rows: Vec::new(),
            series: GroupedSeries::default(),
            hidden_count: 0,
            empty_state: Some(EmptyState::LoadError {
                message: message.into(),
            }),
        }
    }
}

/// A table row in full-table order: visible rows sorted, hidden rows after.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TableRow<'a> {
    pub record: &'a Record,
    pub visible: bool,
}
