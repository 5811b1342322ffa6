use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::detail::{DetailSupplement, PricePoint};
use crate::models::record::{parse_display_number, RecordId};
use crate::models::settings::Settings;
use super::traits::{DetailProvider, LedgerSource};

fn build_client(settings: &Settings) -> Client {
    let builder = Client::builder();
    #[cfg(not(target_arch = "wasm32"))]
    let builder = builder.timeout(Duration::from_secs(settings.request_timeout_secs));
    #[cfg(target_arch = "wasm32")]
    let _ = settings;
    builder.build().unwrap_or_else(|_| Client::new())
}

// ── Ledger rows ─────────────────────────────────────────────────────

/// Fetches ledger rows from the backend's JSON endpoint.
///
/// Accepts either a bare array or an object wrapping it under
/// `records` / `results`.
pub struct HttpLedgerSource {
    client: Client,
    url: String,
}

impl HttpLedgerSource {
    pub fn new(settings: &Settings) -> Self {
        Self {
            client: build_client(settings),
            url: settings.records_url.clone(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordsResponse {
    Bare(Vec<Value>),
    Wrapped {
        #[serde(alias = "results")]
        records: Vec<Value>,
    },
}

impl RecordsResponse {
    fn into_rows(self) -> Vec<Value> {
        match self {
            RecordsResponse::Bare(rows) => rows,
            RecordsResponse::Wrapped { records } => records,
        }
    }
}

/// Unwrap a records payload body. Shared by the HTTP and embedded sources.
pub(crate) fn parse_records_body(body: &str, source: &str) -> Result<Vec<Value>, CoreError> {
    serde_json::from_str::<RecordsResponse>(body)
        .map(RecordsResponse::into_rows)
        .map_err(|e| CoreError::Api {
            source_name: source.to_string(),
            message: format!("Unexpected records payload: {e}"),
        })
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl LedgerSource for HttpLedgerSource {
    fn name(&self) -> &str {
        "HttpLedgerSource"
    }

    async fn fetch_records(&self) -> Result<Vec<Value>, CoreError> {
        let resp = self.client.get(&self.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::Api {
                source_name: self.name().into(),
                message: format!("HTTP {status} from records endpoint"),
            });
        }
        let body = resp.text().await?;
        parse_records_body(&body, self.name())
    }
}

// ── Detail extras ───────────────────────────────────────────────────

/// Fetches a record's overview (price history + fundamentals).
pub struct HttpDetailProvider {
    client: Client,
    settings: Settings,
}

impl HttpDetailProvider {
    pub fn new(settings: &Settings) -> Self {
        Self {
            client: build_client(settings),
            settings: settings.clone(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OverviewResponse {
    #[serde(default, alias = "prices")]
    price_history: Vec<OverviewPrice>,
    #[serde(default)]
    fundamentals: BTreeMap<String, Value>,
}

#[derive(Deserialize)]
struct OverviewPrice {
    date: String,
    #[serde(default, alias = "close")]
    price: Value,
}

/// Convert the loosely typed overview payload, dropping points and
/// fundamentals that carry no usable number.
pub(crate) fn parse_overview_body(body: &str, source: &str) -> Result<DetailSupplement, CoreError> {
    let resp: OverviewResponse = serde_json::from_str(body).map_err(|e| CoreError::Api {
        source_name: source.to_string(),
        message: format!("Unexpected overview payload: {e}"),
    })?;

    let mut price_history: Vec<PricePoint> = resp
        .price_history
        .into_iter()
        .filter_map(|p| {
            let date = NaiveDate::parse_from_str(p.date.get(..10)?, "%Y-%m-%d").ok()?;
            let price = value_to_f64(&p.price)?;
            Some(PricePoint { date, price })
        })
        .collect();
    price_history.sort_by_key(|p| p.date);

    let fundamentals = resp
        .fundamentals
        .into_iter()
        .filter_map(|(k, v)| value_to_f64(&v).map(|n| (k, n)))
        .collect();

    Ok(DetailSupplement {
        price_history,
        fundamentals,
    })
}

fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_display_number(s),
        _ => None,
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl DetailProvider for HttpDetailProvider {
    fn name(&self) -> &str {
        "HttpDetailProvider"
    }

    async fn fetch_detail(&self, record_id: &RecordId) -> Result<DetailSupplement, CoreError> {
        let url = self.settings.detail_url(record_id.as_str());
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::Api {
                source_name: self.name().into(),
                message: format!("HTTP {status} for detail of {record_id}"),
            });
        }
        let body = resp.text().await?;
        parse_overview_body(&body, self.name())
    }
}
