use async_trait::async_trait;
use serde_json::Value;

use crate::errors::CoreError;
use super::http::parse_records_body;
use super::traits::LedgerSource;

/// Ledger rows rendered into the page by the server (a JSON
/// `<script>` payload or `data-*` attribute), read without a network call.
pub struct EmbeddedSource {
    payload: String,
}

impl EmbeddedSource {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl LedgerSource for EmbeddedSource {
    fn name(&self) -> &str {
        "EmbeddedSource"
    }

    async fn fetch_records(&self) -> Result<Vec<Value>, CoreError> {
        if self.payload.trim().is_empty() {
            return Err(CoreError::Api {
                source_name: self.name().into(),
                message: "embedded payload is empty".into(),
            });
        }
        parse_records_body(&self.payload, self.name())
    }
}
