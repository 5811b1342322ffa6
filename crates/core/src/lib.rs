pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use chrono::NaiveDate;
use models::{
    detail::{DetailOutcome, DetailRequest, DetailSupplement},
    record::{Record, RecordId},
    settings::Settings,
    view::{TableRow, ViewEvent, ViewModel, ViewState},
};
use providers::traits::LedgerSource;
use services::{
    filter_engine::FilterEngine,
    record_store::{LoadReport, RecordStore},
    sort_engine::SortEngine,
    view_binder::{DetailTracker, ViewBinder},
};

use errors::CoreError;

/// Main entry point for the ledger view core library.
/// Holds the loaded records, the settings, the single mutable view state
/// and the detail request counter.
#[must_use]
pub struct LedgerView {
    store: RecordStore,
    settings: Settings,
    state: ViewState,
    detail: DetailTracker,
}

impl std::fmt::Debug for LedgerView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerView")
            .field("records", &self.store.len())
            .field("skipped", &self.store.load_report().skipped.len())
            .field("state", &self.state)
            .finish()
    }
}

impl LedgerView {
    /// Wrap an already loaded store.
    pub fn new(store: RecordStore, settings: Settings) -> Self {
        Self {
            store,
            settings,
            state: ViewState::default(),
            detail: DetailTracker::new(),
        }
    }

    /// An empty ledger, rendered while the first load is pending.
    pub fn empty(settings: Settings) -> Self {
        Self::new(RecordStore::empty(), settings)
    }

    /// Fetch and normalize every row from `source`.
    ///
    /// Malformed rows are skipped (see [`LedgerView::load_report`]); only a
    /// failure of the source as a whole is an error, always
    /// `CoreError::LoadFailure`.
    pub async fn load(source: &dyn LedgerSource, settings: Settings) -> Result<Self, CoreError> {
        let store = Self::fetch_store(source, &settings).await?;
        Ok(Self::new(store, settings))
    }

    /// Build from a server-rendered JSON payload (a bare array of rows, or
    /// an object wrapping it under `records`).
    pub fn from_json(json: &str, settings: Settings) -> Result<Self, CoreError> {
        let store = RecordStore::from_json(json, &settings)
            .map_err(|e| CoreError::LoadFailure(e.to_string()))?;
        Ok(Self::new(store, settings))
    }

    /// Replace the records with a fresh load, keeping the view state.
    /// This is the only point at which net profits are recomputed.
    /// On failure the current records stay in place; on success any
    /// detail request still in flight resolves as stale.
    pub async fn reload(&mut self, source: &dyn LedgerSource) -> Result<(), CoreError> {
        self.store = Self::fetch_store(source, &self.settings).await?;
        self.detail.supersede();
        Ok(())
    }

    // ── Accessors ───────────────────────────────────────────────────

    #[must_use]
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        self.store.all()
    }

    #[must_use]
    pub fn get_record(&self, id: &RecordId) -> Option<&Record> {
        self.store.get(id)
    }

    #[must_use]
    pub fn load_report(&self) -> &LoadReport {
        self.store.load_report()
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    // ── View ────────────────────────────────────────────────────────

    /// Apply a control event using today's local date for quick filters.
    pub fn dispatch(&mut self, event: ViewEvent) -> ViewModel<'_> {
        let today = chrono::Local::now().date_naive();
        self.dispatch_at(event, today)
    }

    /// Apply a control event with an explicit "today".
    pub fn dispatch_at(&mut self, event: ViewEvent, today: NaiveDate) -> ViewModel<'_> {
        self.state = ViewBinder::update(&self.state, event, today);
        self.view_model()
    }

    /// The view model for the current state.
    #[must_use]
    pub fn view_model(&self) -> ViewModel<'_> {
        ViewBinder::render(&self.store, &self.state, &self.settings)
    }

    /// The full table in display order: visible rows sorted, hidden rows
    /// after them in storage order.
    #[must_use]
    pub fn table_rows(&self) -> Vec<TableRow<'_>> {
        let model = self.view_model();
        SortEngine::arrange_table(self.store.all(), &model.rows)
    }

    /// Years present in the ledger, newest first.
    #[must_use]
    pub fn available_years(&self) -> Vec<String> {
        FilterEngine::available_years(self.store.all())
    }

    /// Months present in `year` (or in any year), ascending.
    #[must_use]
    pub fn available_months(&self, year: Option<&str>) -> Vec<String> {
        FilterEngine::available_months(self.store.all(), year)
    }

    // ── Detail ──────────────────────────────────────────────────────

    /// Open a record's detail view. The returned request carries the base
    /// record for an immediate render; any earlier request becomes stale.
    pub fn begin_detail(&mut self, id: &RecordId) -> Result<DetailRequest, CoreError> {
        self.detail.begin(&self.store, id)
    }

    /// Reconcile a resolved detail fetch with the currently open detail.
    pub fn complete_detail(
        &self,
        request: &DetailRequest,
        result: Result<DetailSupplement, CoreError>,
    ) -> DetailOutcome {
        self.detail.complete(request, result)
    }

    // ── Export ──────────────────────────────────────────────────────

    /// Export the visible rows, in display order, as CSV.
    /// Columns: id, date, kind, symbol_name, symbol_code, broker,
    /// account_type, quantity, buy_price, sell_price, fee, net_profit
    #[must_use]
    pub fn export_view_csv(&self) -> String {
        let mut csv = String::from(
            "id,date,kind,symbol_name,symbol_code,broker,account_type,quantity,buy_price,sell_price,fee,net_profit\n",
        );
        for record in self.view_model().rows {
            let kind = self.settings.kind_label(record.kind().is_sale());
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{},{},{},{},{}\n",
                escape_csv(record.id().as_str()),
                record.date(),
                escape_csv(kind),
                escape_csv(record.symbol_name()),
                escape_csv(record.symbol_code()),
                escape_csv(record.broker()),
                escape_csv(record.account_type()),
                record.quantity().map(|q| q.to_string()).unwrap_or_default(),
                record.buy_price().map(|p| p.to_string()).unwrap_or_default(),
                record.sell_price().map(|p| p.to_string()).unwrap_or_default(),
                record.fee(),
                record.net_profit(),
            ));
        }
        csv
    }

    /// The current view model as JSON (for hosts that render in JS).
    pub fn view_model_json(&self) -> Result<String, CoreError> {
        serde_json::to_string(&self.view_model())
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize view model: {e}")))
    }

    // ── Internal ────────────────────────────────────────────────────

    async fn fetch_store(
        source: &dyn LedgerSource,
        settings: &Settings,
    ) -> Result<RecordStore, CoreError> {
        let rows = source.fetch_records().await.map_err(|e| {
            log::warn!("Ledger load from {} failed: {e}", source.name());
            CoreError::LoadFailure(format!("{}: {e}", source.name()))
        })?;
        Ok(RecordStore::load_values(rows, settings))
    }
}

/// Quote fields containing commas, quotes, or newlines.
fn escape_csv(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
