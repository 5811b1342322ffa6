use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Opaque, session-stable identifier of a ledger record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row as it arrives from the server, before validation.
///
/// Every field is optional on the wire. Numeric fields accept JSON numbers
/// or display text (`"1,200원"`, `"-50"`); text that holds no number is
/// treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    #[serde(default, deserialize_with = "lenient_opt_text")]
    pub id: Option<String>,

    /// `"sale"` or `"dividend"` (case-insensitive)
    #[serde(default, deserialize_with = "lenient_text")]
    pub kind: String,

    /// ISO date, `YYYY-MM-DD`
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: String,

    #[serde(default, deserialize_with = "lenient_text")]
    pub symbol_name: String,

    #[serde(default, deserialize_with = "lenient_text")]
    pub symbol_code: String,

    #[serde(default, deserialize_with = "lenient_text")]
    pub broker: String,

    #[serde(default, deserialize_with = "lenient_text")]
    pub account_type: String,

    #[serde(default, deserialize_with = "lenient_opt_number")]
    pub quantity: Option<f64>,

    #[serde(default, deserialize_with = "lenient_opt_number")]
    pub buy_price: Option<f64>,

    #[serde(default, deserialize_with = "lenient_opt_number")]
    pub sell_price: Option<f64>,

    #[serde(default, deserialize_with = "lenient_opt_number")]
    pub fee: Option<f64>,

    #[serde(default, deserialize_with = "lenient_opt_number")]
    pub gross_amount: Option<f64>,

    #[serde(default, deserialize_with = "lenient_opt_number")]
    pub server_profit: Option<f64>,
}

impl RawRecord {
    /// A sale row with every numeric field present.
    pub fn sale(
        date: impl Into<String>,
        symbol_name: impl Into<String>,
        quantity: f64,
        buy_price: f64,
        sell_price: f64,
        fee: f64,
    ) -> Self {
        Self {
            kind: "sale".into(),
            date: date.into(),
            symbol_name: symbol_name.into(),
            quantity: Some(quantity),
            buy_price: Some(buy_price),
            sell_price: Some(sell_price),
            fee: Some(fee),
            ..Self::default()
        }
    }

    /// A dividend row carrying the server's net figure.
    pub fn dividend(
        date: impl Into<String>,
        symbol_name: impl Into<String>,
        server_profit: f64,
    ) -> Self {
        Self {
            kind: "dividend".into(),
            date: date.into(),
            symbol_name: symbol_name.into(),
            server_profit: Some(server_profit),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_broker(mut self, broker: impl Into<String>) -> Self {
        self.broker = broker.into();
        self
    }

    pub fn with_account_type(mut self, account_type: impl Into<String>) -> Self {
        self.account_type = account_type.into();
        self
    }

    pub fn with_symbol_code(mut self, code: impl Into<String>) -> Self {
        self.symbol_code = code.into();
        self
    }
}

/// What kind of ledger event a record is, with the inputs only that kind has.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RecordKind {
    /// A realized sale: quantity units bought at `buy_price`, sold at `sell_price`
    #[serde(rename_all = "camelCase")]
    Sale {
        quantity: u64,
        buy_price: f64,
        sell_price: f64,
    },
    /// A dividend payment; the server has already netted any fees
    #[serde(rename_all = "camelCase")]
    Dividend { gross_amount: f64 },
}

impl RecordKind {
    pub fn is_sale(&self) -> bool {
        matches!(self, RecordKind::Sale { .. })
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Sale { .. } => write!(f, "Sale"),
            RecordKind::Dividend { .. } => write!(f, "Dividend"),
        }
    }
}

/// A validated ledger record.
///
/// Only the normalizer builds these. `net_profit`, `buy_amount` and
/// `sell_amount` are computed once at load and never change afterwards,
/// so every sort and aggregate in a session sees the same figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    id: RecordId,
    date: NaiveDate,
    symbol_name: String,
    symbol_code: String,
    broker: String,
    account_type: String,
    kind: RecordKind,
    fee: f64,
    server_profit: f64,
    net_profit: f64,
    buy_amount: f64,
    sell_amount: f64,
    #[serde(skip)]
    year_key: String,
    #[serde(skip)]
    month_key: String,
    #[serde(skip)]
    haystack: String,
}

/// Everything the normalizer has decided about a row.
pub(crate) struct RecordParts {
    pub id: RecordId,
    pub date: NaiveDate,
    pub symbol_name: String,
    pub symbol_code: String,
    pub broker: String,
    pub account_type: String,
    pub kind: RecordKind,
    pub kind_label: String,
    pub fee: f64,
    pub server_profit: f64,
    pub net_profit: f64,
    pub buy_amount: f64,
    pub sell_amount: f64,
}

impl Record {
    pub(crate) fn from_parts(parts: RecordParts) -> Self {
        let haystack = [
            parts.symbol_name.as_str(),
            parts.symbol_code.as_str(),
            parts.broker.as_str(),
            parts.account_type.as_str(),
            parts.kind_label.as_str(),
        ]
        .join(" ")
        .to_lowercase();

        Self {
            year_key: parts.date.format("%Y").to_string(),
            month_key: parts.date.format("%m").to_string(),
            haystack,
            id: parts.id,
            date: parts.date,
            symbol_name: parts.symbol_name,
            symbol_code: parts.symbol_code,
            broker: parts.broker,
            account_type: parts.account_type,
            kind: parts.kind,
            fee: parts.fee,
            server_profit: parts.server_profit,
            net_profit: parts.net_profit,
            buy_amount: parts.buy_amount,
            sell_amount: parts.sell_amount,
        }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn symbol_name(&self) -> &str {
        &self.symbol_name
    }

    pub fn symbol_code(&self) -> &str {
        &self.symbol_code
    }

    pub fn broker(&self) -> &str {
        &self.broker
    }

    pub fn account_type(&self) -> &str {
        &self.account_type
    }

    pub fn kind(&self) -> &RecordKind {
        &self.kind
    }

    /// Sale quantity; `None` for dividends.
    pub fn quantity(&self) -> Option<u64> {
        match self.kind {
            RecordKind::Sale { quantity, .. } => Some(quantity),
            RecordKind::Dividend { .. } => None,
        }
    }

    pub fn buy_price(&self) -> Option<f64> {
        match self.kind {
            RecordKind::Sale { buy_price, .. } => Some(buy_price),
            RecordKind::Dividend { .. } => None,
        }
    }

    pub fn sell_price(&self) -> Option<f64> {
        match self.kind {
            RecordKind::Sale { sell_price, .. } => Some(sell_price),
            RecordKind::Dividend { .. } => None,
        }
    }

    /// Fee as a non-negative magnitude.
    pub fn fee(&self) -> f64 {
        self.fee
    }

    pub fn server_profit(&self) -> f64 {
        self.server_profit
    }

    pub fn net_profit(&self) -> f64 {
        self.net_profit
    }

    pub fn buy_amount(&self) -> f64 {
        self.buy_amount
    }

    pub fn sell_amount(&self) -> f64 {
        self.sell_amount
    }

    /// Net profit as a percentage of the buy amount; `0.0` when nothing was bought.
    pub fn profit_rate(&self) -> f64 {
        if self.buy_amount.abs() > f64::EPSILON {
            self.net_profit / self.buy_amount * 100.0
        } else {
            0.0
        }
    }

    /// `"YYYY"` component of the date.
    pub fn year_key(&self) -> &str {
        &self.year_key
    }

    /// `"MM"` component of the date.
    pub fn month_key(&self) -> &str {
        &self.month_key
    }

    /// `"YYYY-MM"`, the month grouping key.
    pub fn period_key(&self) -> String {
        format!("{}-{}", self.year_key, self.month_key)
    }

    /// Lowercased search haystack: names, code, broker, account type and kind label.
    pub fn haystack(&self) -> &str {
        &self.haystack
    }
}

// ── Lenient field parsing ───────────────────────────────────────────

/// Parse a number out of display text: keep digits, `.` and `-`, drop the rest.
///
/// `"₩1,200"` → `1200.0`, `"-50원"` → `-50.0`, `"12.5%"` → `12.5`.
/// Returns `None` when nothing numeric is left.
pub fn parse_display_number(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn lenient_opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_display_number(&s),
        _ => None,
    })
}

fn lenient_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_text(deserializer)?.unwrap_or_default())
}
