use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Sortable ledger table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortColumn {
    Date,
    SymbolName,
    SymbolCode,
    Broker,
    AccountType,
    Kind,
    Quantity,
    BuyPrice,
    SellPrice,
    Fee,
    NetProfit,
    /// Profit rate (net profit / buy amount, percent)
    Rate,
}

/// How values in a column are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Date,
    Numeric,
    Text,
}

impl SortColumn {
    pub fn column_type(&self) -> ColumnType {
        match self {
            SortColumn::Date => ColumnType::Date,
            SortColumn::Quantity
            | SortColumn::BuyPrice
            | SortColumn::SellPrice
            | SortColumn::Fee
            | SortColumn::NetProfit
            | SortColumn::Rate => ColumnType::Numeric,
            SortColumn::SymbolName
            | SortColumn::SymbolCode
            | SortColumn::Broker
            | SortColumn::AccountType
            | SortColumn::Kind => ColumnType::Text,
        }
    }

    /// The key used in table header markup (`data-sort="netProfit"`).
    pub fn key(&self) -> &'static str {
        match self {
            SortColumn::Date => "date",
            SortColumn::SymbolName => "symbolName",
            SortColumn::SymbolCode => "symbolCode",
            SortColumn::Broker => "broker",
            SortColumn::AccountType => "accountType",
            SortColumn::Kind => "kind",
            SortColumn::Quantity => "quantity",
            SortColumn::BuyPrice => "buyPrice",
            SortColumn::SellPrice => "sellPrice",
            SortColumn::Fee => "fee",
            SortColumn::NetProfit => "netProfit",
            SortColumn::Rate => "rate",
        }
    }

    pub const ALL: [SortColumn; 12] = [
        SortColumn::Date,
        SortColumn::SymbolName,
        SortColumn::SymbolCode,
        SortColumn::Broker,
        SortColumn::AccountType,
        SortColumn::Kind,
        SortColumn::Quantity,
        SortColumn::BuyPrice,
        SortColumn::SellPrice,
        SortColumn::Fee,
        SortColumn::NetProfit,
        SortColumn::Rate,
    ];
}

impl std::str::FromStr for SortColumn {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortColumn::ALL
            .iter()
            .copied()
            .find(|c| c.key() == s.trim())
            .ok_or_else(|| CoreError::ValidationError(format!("Unknown sort column '{s}'")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// The active column sort of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Header click: the same column flips direction, a new column starts ascending.
    pub fn toggle(current: Option<SortState>, column: SortColumn) -> SortState {
        match current {
            Some(state) if state.column == column => SortState {
                column,
                direction: state.direction.reversed(),
            },
            _ => SortState {
                column,
                direction: SortDirection::Asc,
            },
        }
    }
}
