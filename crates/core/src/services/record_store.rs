use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use crate::errors::CoreError;
use crate::models::record::{RawRecord, Record, RecordId};
use crate::models::settings::Settings;
use crate::providers::http::parse_records_body;
use crate::services::normalizer::Normalizer;

/// A row that was dropped during load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    pub index: usize,
    pub id: String,
    pub reason: String,
}

/// Outcome of a load: how many rows made it and which did not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: Vec<SkippedRecord>,
}

/// The immutable, session-long set of ledger records.
///
/// Records keep the order the server supplied them in (date-descending).
/// Filtering hands out views of references into this store; nothing
/// downstream copies or mutates records.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    report: LoadReport,
}

impl RecordStore {
    /// An empty store, shown while the first load is in flight.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Normalize every raw row. Rows that fail validation are logged and
    /// skipped; one bad row never empties the ledger.
    pub fn load(raw_records: &[RawRecord], settings: &Settings) -> Self {
        let mut store = Self::default();
        let mut seen = HashSet::new();
        for (index, raw) in raw_records.iter().enumerate() {
            store.push(&mut seen, index, Normalizer::normalize(index, raw, settings));
        }
        store.finish()
    }

    /// Load from loosely typed JSON rows. A row whose shape does not even
    /// deserialize is skipped like any other malformed row.
    pub fn load_values(rows: Vec<Value>, settings: &Settings) -> Self {
        let mut store = Self::default();
        let mut seen = HashSet::new();
        for (index, row) in rows.into_iter().enumerate() {
            let id = row
                .get("id")
                .filter(|v| !v.is_null())
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .unwrap_or_else(|| format!("row-{index}"));

            let result = RawRecord::deserialize(row)
                .map_err(|e| CoreError::MalformedRecord {
                    index,
                    id,
                    reason: e.to_string(),
                })
                .and_then(|raw| Normalizer::normalize(index, &raw, settings));
            store.push(&mut seen, index, result);
        }
        store.finish()
    }

    /// Parse a JSON payload of rows (e.g., a server-rendered payload): a
    /// bare array, or one wrapped under `records` / `results`.
    /// Only a payload with no row list at all is an error.
    pub fn from_json(json: &str, settings: &Settings) -> Result<Self, CoreError> {
        let rows = parse_records_body(json, "embedded payload")?;
        Ok(Self::load_values(rows, settings))
    }

    /// Every record, in original order.
    pub fn all(&self) -> &[Record] {
        &self.records
    }

    /// A view over every record.
    pub fn view(&self) -> Vec<&Record> {
        self.records.iter().collect()
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }

    fn push(
        &mut self,
        seen: &mut HashSet<RecordId>,
        index: usize,
        result: Result<Record, CoreError>,
    ) {
        let record = match result {
            Ok(record) => record,
            Err(CoreError::MalformedRecord { index, id, reason }) => {
                self.skip(index, id, reason);
                return;
            }
            Err(other) => {
                self.skip(index, format!("row-{index}"), other.to_string());
                return;
            }
        };

        if !seen.insert(record.id().clone()) {
            self.skip(index, record.id().to_string(), "duplicate id".into());
            return;
        }
        self.records.push(record);
    }

    fn skip(&mut self, index: usize, id: String, reason: String) {
        log::warn!("Skipping malformed ledger record at index {index} (id {id}): {reason}");
        self.report.skipped.push(SkippedRecord { index, id, reason });
    }

    fn finish(mut self) -> Self {
        self.report.loaded = self.records.len();
        log::debug!(
            "Loaded {} ledger records ({} skipped)",
            self.report.loaded,
            self.report.skipped.len()
        );
        self
    }
}

/// Distinct ids, for callers that need set membership over a view.
pub(crate) fn id_set<'a>(view: &[&'a Record]) -> HashSet<&'a RecordId> {
    view.iter().map(|r| r.id()).collect()
}
