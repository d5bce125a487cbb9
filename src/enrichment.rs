//! CSV loading and row enrichment.
//!
//! Turns an uploaded sales sheet into an [`EnrichedTable`]: period labels are
//! trimmed and parsed, rows are ordered by month, numeric cells are coerced,
//! missing percent changes are backfilled and every row gets its quarter.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::io::{Read, Write};

use chrono::{Datelike, NaiveDate};
use csv::{ReaderBuilder, StringRecord, Trim, Writer};
use tracing::{debug, info, warn};

use crate::error::{DashboardError, DashboardResult};
use crate::models::{EnrichedTable, MonthlyRecord};

pub const PERIOD_COLUMN: &str = "월";
pub const REVENUE_COLUMN: &str = "매출액";
pub const PRIOR_YEAR_COLUMN: &str = "전년동월";
pub const YOY_COLUMN: &str = "증감률";
pub const QUARTER_COLUMN: &str = "분기";

/// One CSV row before any coercion
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRow {
    pub period: String,
    pub revenue: Option<String>,
    pub prior_year_revenue: Option<String>,
    pub yoy_change_pct: Option<String>,
}

/// Rows as read from the CSV, in file order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    pub rows: Vec<RawRow>,
    pub has_yoy_column: bool,
}

fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}') == name)
}

fn required_column(headers: &StringRecord, name: &str) -> DashboardResult<usize> {
    column_index(headers, name).ok_or_else(|| DashboardError::MissingColumn(name.to_string()))
}

/// Read a sales CSV into a [`RawTable`]
///
/// The header must name the period, revenue and prior-year columns; the
/// percent-change column is optional and unknown columns are ignored. Rows
/// shorter than the header simply have missing cells.
pub fn read_table<R: Read>(reader: R) -> DashboardResult<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(DashboardError::DataFormat(
            "input has no header row".to_string(),
        ));
    }

    let period_idx = required_column(&headers, PERIOD_COLUMN)?;
    let revenue_idx = required_column(&headers, REVENUE_COLUMN)?;
    let prior_idx = required_column(&headers, PRIOR_YEAR_COLUMN)?;
    let yoy_idx = column_index(&headers, YOY_COLUMN);

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let cell = |idx: usize| record.get(idx).map(str::to_string);
        rows.push(RawRow {
            period: cell(period_idx).unwrap_or_default(),
            revenue: cell(revenue_idx),
            prior_year_revenue: cell(prior_idx),
            yoy_change_pct: yoy_idx.and_then(cell),
        });
    }

    debug!("Read {} rows ({} columns)", rows.len(), headers.len());
    Ok(RawTable {
        rows,
        has_yoy_column: yoy_idx.is_some(),
    })
}

/// Parse a `YYYY-MM` label into the first day of that month
pub fn parse_period(label: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", label.trim()), "%Y-%m-%d").ok()
}

/// Calendar quarter (1-4) of a date
pub fn quarter_of(date: NaiveDate) -> u8 {
    ((date.month() - 1) / 3 + 1) as u8
}

/// Coerce a cell to a number; blanks, garbage and non-finite values become `None`
pub fn parse_number(cell: Option<&str>) -> Option<f64> {
    let trimmed = cell?.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Percent change to report for a row
///
/// A supplied value always wins. Otherwise it is derived from revenue and
/// prior-year revenue, falling back to 0 when either is missing or the
/// prior-year figure is zero.
pub fn derive_yoy_pct(supplied: Option<f64>, revenue: Option<f64>, prior: Option<f64>) -> f64 {
    if let Some(pct) = supplied {
        return pct;
    }
    match (revenue, prior) {
        (Some(current), Some(previous)) if previous != 0.0 => {
            (current - previous) / previous * 100.0
        }
        _ => 0.0,
    }
}

fn compare_period_keys(a: &Option<NaiveDate>, b: &Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn enrich_row(row: &RawRow) -> MonthlyRecord {
    let period = row.period.trim().to_string();
    let period_date = parse_period(&period);
    if period_date.is_none() {
        debug!("Unparseable period label '{}'", period);
    }

    let revenue = parse_number(row.revenue.as_deref());
    let prior_year_revenue = parse_number(row.prior_year_revenue.as_deref());
    let supplied = parse_number(row.yoy_change_pct.as_deref());

    MonthlyRecord {
        period,
        period_date,
        revenue,
        prior_year_revenue,
        yoy_change_pct: derive_yoy_pct(supplied, revenue, prior_year_revenue),
        quarter: period_date.map(quarter_of),
    }
}

/// Enrich raw rows into a month-ordered table
///
/// Rows with malformed periods sort after every dated row and keep their
/// relative input order.
pub fn normalize(raw: &RawTable) -> EnrichedTable {
    let mut records: Vec<MonthlyRecord> = raw.rows.iter().map(enrich_row).collect();
    records.sort_by(|a, b| compare_period_keys(&a.period_date, &b.period_date));

    let mut seen = HashSet::new();
    for record in &records {
        if !seen.insert(record.period.as_str()) {
            warn!("Duplicate period '{}' in input", record.period);
        }
    }

    EnrichedTable::new(records, raw.has_yoy_column)
}

/// Read and enrich a CSV payload in one step
pub fn enrich(bytes: &[u8]) -> DashboardResult<EnrichedTable> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(DashboardError::DataFormat("input is empty".to_string()));
    }
    let raw = read_table(bytes)?;
    let table = normalize(&raw);
    info!("Enriched {} monthly records", table.len());
    Ok(table)
}

/// Write an enriched table as CSV with a trailing quarter column
pub fn write_table<W: Write>(table: &EnrichedTable, writer: W) -> DashboardResult<()> {
    let mut wtr = Writer::from_writer(writer);
    if table.is_empty() {
        wtr.write_record([
            PERIOD_COLUMN,
            REVENUE_COLUMN,
            PRIOR_YEAR_COLUMN,
            YOY_COLUMN,
            QUARTER_COLUMN,
        ])?;
    }
    for record in table.records() {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}
