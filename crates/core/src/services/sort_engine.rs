use std::cmp::Ordering;

use crate::models::record::Record;
use crate::models::sort::{ColumnType, SortColumn, SortDirection};
use crate::models::settings::Settings;
use crate::models::view::TableRow;
use crate::services::record_store::id_set;

/// Stable column sort over a filtered view.
///
/// Equal values keep their prior relative order in both directions.
/// Descending is the reversed comparator, never a reversed vector, so
/// flipping a column back and forth does not shuffle ties.
pub struct SortEngine;

impl SortEngine {
    pub fn sort<'a>(
        view: &[&'a Record],
        column: SortColumn,
        direction: SortDirection,
        settings: &Settings,
    ) -> Vec<&'a Record> {
        let mut sorted = view.to_vec();
        sorted.sort_by(|a, b| {
            let ord = Self::compare(a, b, column, settings);
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
        sorted
    }

    /// Whole-table order: the sorted visible rows first, then every hidden
    /// record in storage order, untouched.
    pub fn arrange_table<'a>(all: &'a [Record], sorted_visible: &[&'a Record]) -> Vec<TableRow<'a>> {
        let visible = id_set(sorted_visible);
        let mut rows: Vec<TableRow<'a>> = sorted_visible
            .iter()
            .map(|&record| TableRow {
                record,
                visible: true,
            })
            .collect();
        rows.extend(
            all.iter()
                .filter(|r| !visible.contains(r.id()))
                .map(|record| TableRow {
                    record,
                    visible: false,
                }),
        );
        rows
    }

    /// Ascending comparison of two records on `column`, dispatched on the
    /// column's type: dates as dates, numbers as floats, text verbatim.
    pub fn compare(a: &Record, b: &Record, column: SortColumn, settings: &Settings) -> Ordering {
        match column.column_type() {
            ColumnType::Date => a.date().cmp(&b.date()),
            ColumnType::Numeric => {
                numeric_value(a, column).total_cmp(&numeric_value(b, column))
            }
            ColumnType::Text => text_value(a, column, settings).cmp(text_value(b, column, settings)),
        }
    }
}

fn numeric_value(record: &Record, column: SortColumn) -> f64 {
    match column {
        SortColumn::Quantity => record.quantity().unwrap_or(0) as f64,
        SortColumn::BuyPrice => record.buy_price().unwrap_or(0.0),
        SortColumn::SellPrice => record.sell_price().unwrap_or(0.0),
        SortColumn::Fee => record.fee(),
        SortColumn::NetProfit => record.net_profit(),
        SortColumn::Rate => record.profit_rate(),
        _ => 0.0,
    }
}

fn text_value<'a>(record: &'a Record, column: SortColumn, settings: &'a Settings) -> &'a str {
    match column {
        SortColumn::SymbolName => record.symbol_name(),
        SortColumn::SymbolCode => record.symbol_code(),
        SortColumn::Broker => record.broker(),
        SortColumn::AccountType => record.account_type(),
        SortColumn::Kind => settings.kind_label(record.kind().is_sale()),
        _ => "",
    }
}
