use serde::{Deserialize, Serialize};

/// Live P&L preview for a sale being entered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalePreview {
    pub buy_amount: f64,
    pub sell_amount: f64,
    /// Fee magnitude actually deducted
    pub fee: f64,
    pub net_profit: f64,
    /// Net profit as a percentage of the buy amount
    pub profit_rate: f64,
}
