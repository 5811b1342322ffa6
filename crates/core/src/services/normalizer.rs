use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::preview::SalePreview;
use crate::models::record::{RawRecord, Record, RecordId, RecordKind, RecordParts};
use crate::models::settings::Settings;

/// Turns raw rows into validated records with one trustworthy net profit.
///
/// Upstream sources disagree on the sign of `fee`. The normalizer always
/// takes its absolute value, so a fee can only ever reduce profit:
///
/// - Sale: `(sell_price × quantity) − (buy_price × quantity) − |fee|`
/// - Dividend: `server_profit` (already net of fees)
pub struct Normalizer;

impl Normalizer {
    /// Validate and normalize one raw row. `index` is its position in the
    /// supplied list and also provides the fallback id `row-{index}`.
    pub fn normalize(
        index: usize,
        raw: &RawRecord,
        settings: &Settings,
    ) -> Result<Record, CoreError> {
        let id = raw
            .id
            .clone()
            .map(RecordId)
            .unwrap_or_else(|| RecordId(format!("row-{index}")));

        let malformed = |reason: String| CoreError::MalformedRecord {
            index,
            id: id.to_string(),
            reason,
        };

        let date = parse_date(&raw.date)
            .ok_or_else(|| malformed(format!("invalid date '{}'", raw.date)))?;

        let fee = raw.fee.unwrap_or(0.0).abs();

        let (kind, net_profit, buy_amount, sell_amount, server_profit) =
            match raw.kind.trim().to_lowercase().as_str() {
                "sale" => {
                    let quantity = raw
                        .quantity
                        .ok_or_else(|| malformed("sale has no quantity".into()))?;
                    if quantity < 0.0 || quantity.fract() != 0.0 {
                        return Err(malformed(format!(
                            "sale quantity must be a non-negative integer, got {quantity}"
                        )));
                    }

                    let buy_price = raw.buy_price.unwrap_or(0.0);
                    let sell_price = raw.sell_price.unwrap_or(0.0);
                    let preview =
                        Self::preview_sale(quantity as u64, buy_price, sell_price, fee);

                    // Without either price the server figure is all we have.
                    let net_profit = match raw.server_profit {
                        Some(profit) if raw.buy_price.is_none() && raw.sell_price.is_none() => {
                            log::debug!(
                                "Record {id}: sale without prices, using server profit {profit}"
                            );
                            profit
                        }
                        _ => preview.net_profit,
                    };

                    (
                        RecordKind::Sale {
                            quantity: quantity as u64,
                            buy_price,
                            sell_price,
                        },
                        net_profit,
                        preview.buy_amount,
                        preview.sell_amount,
                        raw.server_profit.unwrap_or(0.0),
                    )
                }
                "dividend" => {
                    let gross_amount = raw.gross_amount.unwrap_or(0.0);
                    let server_profit = raw.server_profit.unwrap_or(0.0);
                    (
                        RecordKind::Dividend { gross_amount },
                        server_profit,
                        0.0,
                        0.0,
                        server_profit,
                    )
                }
                "" => return Err(malformed("missing kind".into())),
                other => return Err(malformed(format!("unknown kind '{other}'"))),
            };

        if !(net_profit.is_finite() && buy_amount.is_finite() && sell_amount.is_finite()) {
            return Err(malformed(format!(
                "amounts out of range (net profit {net_profit})"
            )));
        }

        let kind_label = settings.kind_label(kind.is_sale()).to_string();

        Ok(Record::from_parts(RecordParts {
            id,
            date,
            symbol_name: raw.symbol_name.clone(),
            symbol_code: raw.symbol_code.clone(),
            broker: raw.broker.clone(),
            account_type: raw.account_type.clone(),
            kind,
            kind_label,
            fee,
            server_profit,
            net_profit,
            buy_amount,
            sell_amount,
        }))
    }

    /// The figures a sale would normalize to. Used by the entry form's
    /// live preview as well as by [`Normalizer::normalize`].
    pub fn preview_sale(quantity: u64, buy_price: f64, sell_price: f64, fee: f64) -> SalePreview {
        let qty = quantity as f64;
        let buy_amount = buy_price * qty;
        let sell_amount = sell_price * qty;
        let fee = fee.abs();
        let net_profit = (sell_amount - buy_amount) - fee;
        let profit_rate = if buy_amount.abs() > f64::EPSILON {
            net_profit / buy_amount * 100.0
        } else {
            0.0
        };
        SalePreview {
            buy_amount,
            sell_amount,
            fee,
            net_profit,
            profit_rate,
        }
    }
}

/// `YYYY-MM-DD`, optionally followed by a time part (`T…` or ` …`).
fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let date_part = match text.char_indices().nth(10) {
        Some((idx, 'T')) | Some((idx, ' ')) => &text[..idx],
        _ => text,
    };
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
