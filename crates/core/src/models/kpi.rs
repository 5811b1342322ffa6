use serde::{Deserialize, Serialize};

use super::settings::Settings;

/// Scalar summary of a filtered view.
///
/// Amounts keep full `f64` precision; rounding happens only in [`KpiDisplay`].
/// Every ratio and average is `0.0` when its denominator is zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    /// Number of records in the view
    pub count: usize,

    /// Records with a positive net profit
    pub win_count: usize,

    /// Records with a negative net profit
    pub loss_count: usize,

    /// `win_count / count × 100`
    pub win_rate: f64,

    pub net_total: f64,

    /// Sum of positive net profits
    pub gross_profit_total: f64,

    /// Sum of negative net profits (keeps its sign)
    pub gross_loss_total: f64,

    pub avg_net: f64,
    pub avg_win_only: f64,
    pub avg_loss_only: f64,
}

/// One bar / slice of a grouped chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub key: String,
    pub net: f64,
}

impl SeriesPoint {
    pub fn new(key: impl Into<String>, net: f64) -> Self {
        Self {
            key: key.into(),
            net,
        }
    }
}

/// Chart-ready breakdowns of a filtered view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedSeries {
    /// Net per `YYYY-MM`, ascending by month
    pub by_month: Vec<SeriesPoint>,

    /// Running total over `by_month`
    pub cumulative_by_month: Vec<SeriesPoint>,

    /// Net per broker, largest first
    pub by_broker: Vec<SeriesPoint>,

    /// Net per symbol name, largest first
    pub by_symbol: Vec<SeriesPoint>,

    /// Net per account type, largest first
    pub by_account_type: Vec<SeriesPoint>,
}

/// KPI values as the panel shows them: whole currency units, whole percent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiDisplay {
    pub count: String,
    pub win_rate: String,
    pub net_total: String,
    pub gross_profit_total: String,
    pub gross_loss_total: String,
    pub avg_net: String,
    pub avg_win_only: String,
    pub avg_loss_only: String,
}

impl KpiDisplay {
    pub fn from_summary(summary: &KpiSummary, settings: &Settings) -> Self {
        Self {
            count: group_thousands(summary.count as i64),
            win_rate: format!("{}%", round_unit(summary.win_rate)),
            net_total: format_currency(summary.net_total, settings),
            gross_profit_total: format_currency(summary.gross_profit_total, settings),
            gross_loss_total: format_currency(summary.gross_loss_total, settings),
            avg_net: format_currency(summary.avg_net, settings),
            avg_win_only: format_currency(summary.avg_win_only, settings),
            avg_loss_only: format_currency(summary.avg_loss_only, settings),
        }
    }
}

/// Round to the nearest whole unit; non-finite input renders as `0`.
pub fn round_unit(value: f64) -> i64 {
    if value.is_finite() {
        value.round() as i64
    } else {
        0
    }
}

/// `1900.4` → `"₩1,900"`, `-1000.0` → `"-₩1,000"` (or `"1,900원"` with a suffix marker).
pub fn format_currency(value: f64, settings: &Settings) -> String {
    let rounded = round_unit(value);
    let sign = if rounded < 0 { "-" } else { "" };
    let digits = group_thousands(rounded.unsigned_abs() as i64);
    if settings.currency_suffix {
        format!("{sign}{digits}{}", settings.currency_symbol)
    } else {
        format!("{sign}{}{digits}", settings.currency_symbol)
    }
}

fn group_thousands(value: i64) -> String {
    let raw = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(raw.len() + raw.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
