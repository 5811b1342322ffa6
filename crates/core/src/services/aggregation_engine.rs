use std::collections::{BTreeMap, HashMap};

use crate::models::kpi::{GroupedSeries, KpiSummary, SeriesPoint};
use crate::models::record::Record;
use crate::models::settings::Settings;

/// Computes KPIs and chart series from a filtered view.
///
/// Every output is a single pass over the view. Sums keep full precision;
/// nothing is rounded here (see `KpiDisplay` for render-time rounding).
pub struct AggregationEngine;

impl AggregationEngine {
    /// Count, win rate, totals and averages. All-zero for an empty view.
    pub fn summarize(view: &[&Record]) -> KpiSummary {
        let mut summary = KpiSummary {
            count: view.len(),
            ..KpiSummary::default()
        };

        for record in view {
            let net = record.net_profit();
            summary.net_total += net;
            if net > 0.0 {
                summary.win_count += 1;
                summary.gross_profit_total += net;
            } else if net < 0.0 {
                summary.loss_count += 1;
                summary.gross_loss_total += net;
            }
        }

        summary.win_rate = ratio(summary.win_count as f64 * 100.0, summary.count);
        summary.avg_net = ratio(summary.net_total, summary.count);
        summary.avg_win_only = ratio(summary.gross_profit_total, summary.win_count);
        summary.avg_loss_only = ratio(summary.gross_loss_total, summary.loss_count);
        summary
    }

    /// Sum net profit per key, keeping keys in first-appearance order.
    /// Blank keys are reported under `empty_label`, never dropped.
    pub fn group_by<F>(view: &[&Record], empty_label: &str, key_fn: F) -> Vec<SeriesPoint>
    where
        F: Fn(&Record) -> String,
    {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut points: Vec<SeriesPoint> = Vec::new();

        for record in view {
            let mut key = key_fn(record);
            if key.trim().is_empty() {
                key = empty_label.to_string();
            }
            match index.get(&key) {
                Some(&i) => points[i].net += record.net_profit(),
                None => {
                    index.insert(key.clone(), points.len());
                    points.push(SeriesPoint::new(key, record.net_profit()));
                }
            }
        }
        points
    }

    /// Net per `YYYY-MM`, ascending.
    pub fn by_month(view: &[&Record]) -> Vec<SeriesPoint> {
        let mut months: BTreeMap<String, f64> = BTreeMap::new();
        for record in view {
            *months.entry(record.period_key()).or_insert(0.0) += record.net_profit();
        }
        months
            .into_iter()
            .map(|(key, net)| SeriesPoint { key, net })
            .collect()
    }

    /// Running total over a month series.
    pub fn cumulative(series: &[SeriesPoint]) -> Vec<SeriesPoint> {
        let mut running = 0.0;
        series
            .iter()
            .map(|p| {
                running += p.net;
                SeriesPoint::new(p.key.clone(), running)
            })
            .collect()
    }

    /// All chart breakdowns for a view.
    pub fn series(view: &[&Record], settings: &Settings) -> GroupedSeries {
        let by_month = Self::by_month(view);
        let cumulative_by_month = Self::cumulative(&by_month);
        let label = settings.empty_group_label.as_str();

        GroupedSeries {
            by_month,
            cumulative_by_month,
            by_broker: largest_first(Self::group_by(view, label, |r| r.broker().to_string())),
            by_symbol: largest_first(Self::group_by(view, label, |r| {
                r.symbol_name().to_string()
            })),
            by_account_type: largest_first(Self::group_by(view, label, |r| {
                r.account_type().to_string()
            })),
        }
    }
}

/// `numerator / denominator`, or `0.0` for an empty denominator.
fn ratio(numerator: f64, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator / denominator as f64
    }
}

/// Stable sort by net, descending; ties keep first-appearance order.
fn largest_first(mut points: Vec<SeriesPoint>) -> Vec<SeriesPoint> {
    points.sort_by(|a, b| b.net.total_cmp(&a.net));
    points
}
