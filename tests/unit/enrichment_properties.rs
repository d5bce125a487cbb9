//! Row-level guarantees of the enrichment step

use pretty_assertions::assert_eq;
use test_log::test;

use sales_dashboard::enrichment::{enrich, parse_period};
use sales_dashboard::DashboardError;

use crate::common::test_data::csv_from_rows;

#[test]
fn test_quarter_is_ceil_of_month_for_every_row() {
    let rows: Vec<(String, String)> = (1..=12)
        .map(|m| (format!("2023-{:02}", m), (m * 1000).to_string()))
        .collect();
    let cells: Vec<(&str, &str, &str, &str)> = rows
        .iter()
        .map(|(p, r)| (p.as_str(), r.as_str(), "1000", ""))
        .collect();
    let table = enrich(csv_from_rows(&cells).as_bytes()).unwrap();

    for record in table.records() {
        let month: u32 = record.period[5..].parse().unwrap();
        let quarter = record.quarter.expect("valid period has a quarter");
        assert!((1..=4).contains(&quarter));
        assert_eq!(quarter as u32, (month + 2) / 3);
    }
}

#[test]
fn test_omitted_percent_is_derived() {
    let csv = csv_from_rows(&[("2024-01", "12000000", "10500000", "")]);
    let table = enrich(csv.as_bytes()).unwrap();
    let pct = table.records()[0].yoy_change_pct;
    assert!((pct - 14.29).abs() < 0.01, "got {}", pct);
}

#[test]
fn test_zero_prior_year_falls_back_to_zero() {
    let csv = csv_from_rows(&[("2024-03", "11000000", "0", "")]);
    let table = enrich(csv.as_bytes()).unwrap();
    assert_eq!(table.records()[0].yoy_change_pct, 0.0);
}

#[test]
fn test_supplied_percent_is_kept_verbatim() {
    // 14.3 is not the exact derived value (14.2857...)
    let csv = csv_from_rows(&[("2024-01", "12000000", "10500000", "14.3")]);
    let table = enrich(csv.as_bytes()).unwrap();
    assert_eq!(table.records()[0].yoy_change_pct, 14.3);
}

#[test]
fn test_rows_are_non_decreasing_by_period() {
    let csv = csv_from_rows(&[
        ("2024-11", "1", "1", ""),
        ("nope", "1", "1", ""),
        ("2023-02", "1", "1", ""),
        ("2024-01", "1", "1", ""),
        ("2023-12", "1", "1", ""),
        ("", "1", "1", ""),
    ]);
    let table = enrich(csv.as_bytes()).unwrap();
    let keys: Vec<_> = table.records().iter().map(|r| parse_period(&r.period)).collect();

    let dated: Vec<_> = keys.iter().flatten().collect();
    assert!(dated.windows(2).all(|w| w[0] <= w[1]));
    // Malformed periods trail the dated rows
    assert_eq!(&keys[4..], &[None, None]);
    assert_eq!(table.records()[4].period, "nope");
}

#[test]
fn test_unparseable_numbers_become_missing() {
    let csv = csv_from_rows(&[("2024-06", "lots", "n/a", "?")]);
    let table = enrich(csv.as_bytes()).unwrap();
    let record = &table.records()[0];

    assert_eq!(record.revenue, None);
    assert_eq!(record.prior_year_revenue, None);
    assert_eq!(record.yoy_change_pct, 0.0);
    assert_eq!(record.quarter, Some(2));
}

#[test]
fn test_not_a_sales_sheet_is_a_format_error() {
    let err = enrich(b"name,age\nkim,30\n").unwrap_err();
    assert!(matches!(err, DashboardError::MissingColumn(ref c) if c == "월"));
    assert!(err.user_message().contains("월"));
}
