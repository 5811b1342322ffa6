use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::record::{Record, RecordId};

/// Monotonically increasing id of a detail request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestToken(pub u64);

/// A started detail request. The base record is available immediately;
/// the supplement arrives later.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRequest {
    pub token: RequestToken,
    pub record: Record,
}

/// A single (date → closing price) point of an instrument's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Lazily fetched extras for the detail view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailSupplement {
    /// Sorted by date
    #[serde(default)]
    pub price_history: Vec<PricePoint>,

    /// Named fundamentals (e.g., "per", "pbr", "dividendYield")
    #[serde(default)]
    pub fundamentals: BTreeMap<String, f64>,
}

/// A record together with whatever supplementary data has arrived.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDetail {
    pub record: Record,
    pub supplement: DetailSupplement,
}

/// What to do with a resolved detail fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailOutcome {
    /// Latest request succeeded; show the full detail
    Applied(RecordDetail),
    /// Latest request failed; keep showing the base record
    Failed { record_id: RecordId, error: String },
    /// A newer request was started meanwhile; discard
    Stale,
}
