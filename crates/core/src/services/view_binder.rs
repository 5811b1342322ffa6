use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::detail::{
    DetailOutcome, DetailRequest, DetailSupplement, RecordDetail, RequestToken,
};
use crate::models::kpi::{KpiDisplay, KpiSummary};
use crate::models::record::RecordId;
use crate::models::settings::Settings;
use crate::models::sort::SortState;
use crate::models::view::{EmptyState, ViewEvent, ViewModel, ViewState};
use crate::services::aggregation_engine::AggregationEngine;
use crate::services::filter_engine::FilterEngine;
use crate::services::record_store::RecordStore;
use crate::services::sort_engine::SortEngine;

/// Connects control events to the engines.
///
/// `update` is a pure state transition and `render` a pure projection of
/// (store, state) into a `ViewModel`. The host owns the one mutable
/// `ViewState` and paints whatever `render` returns.
pub struct ViewBinder;

impl ViewBinder {
    pub fn update(state: &ViewState, event: ViewEvent, today: NaiveDate) -> ViewState {
        let mut next = state.clone();
        match event {
            ViewEvent::SetYear(year) => {
                next.criteria.year = year;
                next.quick_filter = None;
            }
            ViewEvent::SetMonth(month) => {
                next.criteria.month = month;
                next.quick_filter = None;
            }
            ViewEvent::SetQuery(query) => {
                next.criteria.query = Some(query);
            }
            ViewEvent::ApplyQuickFilter(preset) => {
                next.criteria = preset.apply(&state.criteria, today);
                next.quick_filter = Some(preset);
            }
            ViewEvent::ClickColumn(column) => {
                next.sort = Some(SortState::toggle(state.sort, column));
            }
            ViewEvent::Reset => next = ViewState::default(),
        }
        next
    }

    /// Filter, then sort and aggregate the filtered view.
    pub fn render<'a>(store: &'a RecordStore, state: &ViewState, settings: &Settings) -> ViewModel<'a> {
        let filtered = FilterEngine::filter(store.all(), &state.criteria);
        let kpis = AggregationEngine::summarize(&filtered);
        let series = AggregationEngine::series(&filtered, settings);
        let rows = match state.sort {
            Some(sort) => SortEngine::sort(&filtered, sort.column, sort.direction, settings),
            None => filtered,
        };

        log::debug!(
            "Rendered ledger view: {} of {} records",
            rows.len(),
            store.len()
        );

        ViewModel {
            display: KpiDisplay::from_summary(&kpis, settings),
            kpis,
            hidden_count: store.len() - rows.len(),
            empty_state: rows.is_empty().then_some(EmptyState::NoRecords),
            rows,
            series,
        }
    }

    /// The model to paint when the bulk load failed.
    pub fn render_load_error(error: &CoreError, settings: &Settings) -> ViewModel<'static> {
        ViewModel::load_error(
            error.to_string(),
            KpiDisplay::from_summary(&KpiSummary::default(), settings),
        )
    }
}

/// Issues detail request tokens and decides whether a resolved fetch is
/// still wanted. Only the most recently issued token is applied.
#[derive(Debug, Clone, Default)]
pub struct DetailTracker {
    latest: u64,
}

impl DetailTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request for `record_id`, superseding any earlier one.
    pub fn begin(&mut self, store: &RecordStore, record_id: &RecordId) -> Result<DetailRequest, CoreError> {
        let record = store
            .get(record_id)
            .cloned()
            .ok_or_else(|| CoreError::RecordNotFound(record_id.to_string()))?;
        self.latest += 1;
        Ok(DetailRequest {
            token: RequestToken(self.latest),
            record,
        })
    }

    /// Invalidate every request issued so far, e.g. after the records
    /// they point at have been replaced.
    pub fn supersede(&mut self) {
        self.latest += 1;
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }

    /// Reconcile a resolved fetch with whatever is open now.
    pub fn complete(
        &self,
        request: &DetailRequest,
        result: Result<DetailSupplement, CoreError>,
    ) -> DetailOutcome {
        if !self.is_current(request.token) {
            log::info!(
                "Discarding stale detail response for {} (token {}, latest {})",
                request.record.id(),
                request.token.0,
                self.latest
            );
            return DetailOutcome::Stale;
        }
        match result {
            Ok(supplement) => DetailOutcome::Applied(RecordDetail {
                record: request.record.clone(),
                supplement,
            }),
            Err(e) => {
                log::warn!("Detail fetch for {} failed: {e}", request.record.id());
                DetailOutcome::Failed {
                    record_id: request.record.id().clone(),
                    error: e.to_string(),
                }
            }
        }
    }
}
