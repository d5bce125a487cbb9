//! Summary metrics and chart series computed from an [`EnrichedTable`].

use serde::Serialize;

use crate::models::EnrichedTable;

/// A single month's revenue, used for the best/worst cards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthPoint {
    pub index: usize,
    pub period: String,
    pub revenue: f64,
}

/// Headline metrics shown above the charts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesSummary {
    pub record_count: usize,
    pub total_revenue: f64,
    pub mean_yoy_pct: Option<f64>,
    pub best_month: Option<MonthPoint>,
    pub worst_month: Option<MonthPoint>,
}

/// KPI achievement rate for one period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiPoint {
    pub period: String,
    pub rate_pct: Option<f64>,
}

/// Box-plot statistics of monthly revenue within one quarter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuarterStats {
    pub quarter: u8,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub values: Vec<f64>,
}

/// Pick the extreme revenue month; `better` decides whether a candidate
/// replaces the current pick, so ties keep the earliest row.
fn extreme_month<F>(table: &EnrichedTable, better: F) -> Option<MonthPoint>
where
    F: Fn(f64, f64) -> bool,
{
    let mut pick: Option<MonthPoint> = None;
    for (index, record) in table.records().iter().enumerate() {
        let Some(revenue) = record.revenue else {
            continue;
        };
        let replace = match &pick {
            Some(current) => better(revenue, current.revenue),
            None => true,
        };
        if replace {
            pick = Some(MonthPoint {
                index,
                period: record.period.clone(),
                revenue,
            });
        }
    }
    pick
}

/// Compute total revenue, mean percent change and best/worst months
pub fn summarize(table: &EnrichedTable) -> SalesSummary {
    let records = table.records();
    let total_revenue = records.iter().filter_map(|r| r.revenue).sum();
    let mean_yoy_pct = if records.is_empty() {
        None
    } else {
        Some(records.iter().map(|r| r.yoy_change_pct).sum::<f64>() / records.len() as f64)
    };

    SalesSummary {
        record_count: records.len(),
        total_revenue,
        mean_yoy_pct,
        best_month: extreme_month(table, |candidate, current| candidate > current),
        worst_month: extreme_month(table, |candidate, current| candidate < current),
    }
}

/// Achievement rate of each month against `target`
///
/// A zero target is treated as 1 so the rate stays finite.
pub fn kpi_achievement(table: &EnrichedTable, target: u64) -> Vec<KpiPoint> {
    let denominator = if target == 0 { 1.0 } else { target as f64 };
    table
        .records()
        .iter()
        .map(|record| KpiPoint {
            period: record.period.clone(),
            rate_pct: record.revenue.map(|revenue| revenue / denominator * 100.0),
        })
        .collect()
}

/// Percent change per period, in table order
pub fn yoy_series(table: &EnrichedTable) -> Vec<(String, f64)> {
    table
        .records()
        .iter()
        .map(|r| (r.period.clone(), r.yoy_change_pct))
        .collect()
}

/// Linear-interpolated quantile of an ascending slice
fn quantile(sorted: &[f64], p: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let pos = p * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (pos - lower as f64)
}

/// Revenue distribution per quarter, skipping rows without a quarter or revenue
pub fn quarterly_distribution(table: &EnrichedTable) -> Vec<QuarterStats> {
    (1..=4u8)
        .filter_map(|quarter| {
            let mut values: Vec<f64> = table
                .records()
                .iter()
                .filter(|r| r.quarter == Some(quarter))
                .filter_map(|r| r.revenue)
                .collect();
            if values.is_empty() {
                return None;
            }
            values.sort_by(f64::total_cmp);

            Some(QuarterStats {
                quarter,
                count: values.len(),
                min: values[0],
                q1: quantile(&values, 0.25),
                median: quantile(&values, 0.5),
                q3: quantile(&values, 0.75),
                max: values[values.len() - 1],
                values,
            })
        })
        .collect()
}
