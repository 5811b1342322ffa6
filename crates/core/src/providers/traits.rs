use async_trait::async_trait;
use serde_json::Value;

use crate::errors::CoreError;
use crate::models::detail::DetailSupplement;
use crate::models::record::RecordId;

/// Where the bulk ledger rows come from (a JSON endpoint, an embedded
/// server-rendered payload, a test fixture).
///
/// Rows are returned loosely typed so the store can skip a bad row
/// without failing the whole load.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait LedgerSource: Send + Sync {
    /// Human-readable name of this source (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch every ledger row.
    async fn fetch_records(&self) -> Result<Vec<Value>, CoreError>;
}

/// Supplies the lazily loaded extras of a record's detail view
/// (price history, fundamentals).
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait DetailProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_detail(&self, record_id: &RecordId) -> Result<DetailSupplement, CoreError>;
}
