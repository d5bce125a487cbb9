//! File → cache → metrics → export, the way the dashboard drives it

use std::sync::Arc;

use pretty_assertions::assert_eq;
use test_log::test;

use sales_dashboard::analysis::{kpi_achievement, quarterly_distribution, summarize};
use sales_dashboard::enrichment::{enrich, write_table};
use sales_dashboard::models::DataSource;
use sales_dashboard::sample::SAMPLE_CSV;
use sales_dashboard::EnrichmentCache;

use crate::common::logging::log_test_step;
use crate::common::test_data::{csv_from_rows, write_temp_csv};

#[test]
fn test_sample_dataset_totals() {
    let table = enrich(SAMPLE_CSV.as_bytes()).unwrap();
    let summary = summarize(&table);

    assert_eq!(summary.total_revenue, 234_000_000.0);
    assert_eq!(summary.best_month.unwrap().period, "2024-08");
    assert_eq!(summary.worst_month.unwrap().period, "2024-03");
    assert_eq!(quarterly_distribution(&table).len(), 4);
}

#[test]
fn test_uploaded_file_goes_through_cache() {
    log_test_step("Enrich an uploaded file twice through the cache");
    let file = write_temp_csv(&csv_from_rows(&[
        ("2024-02", "13500000", "11200000", ""),
        ("2024-01", "12000000", "10500000", ""),
        ("2024-03", "11000000", "0", ""),
    ]));
    let source = DataSource::File(file.path().to_path_buf());
    let mut cache = EnrichmentCache::new(2);

    let (key, table) = cache.get_or_enrich(&source.load_bytes().unwrap()).unwrap();
    let (again_key, again) = cache.get_or_enrich(&source.load_bytes().unwrap()).unwrap();
    assert_eq!(key, again_key);
    assert!(Arc::ptr_eq(&table, &again));

    let periods: Vec<&str> = table.records().iter().map(|r| r.period.as_str()).collect();
    assert_eq!(periods, vec!["2024-01", "2024-02", "2024-03"]);
    assert!((table.records()[0].yoy_change_pct - 14.2857).abs() < 1e-3);
    assert_eq!(table.records()[2].yoy_change_pct, 0.0);

    let rates = kpi_achievement(&table, 12_000_000);
    assert!((rates[0].rate_pct.unwrap() - 100.0).abs() < 1e-9);

    cache.invalidate(&key);
    let (_, recomputed) = cache.get_or_enrich(&source.load_bytes().unwrap()).unwrap();
    assert!(!Arc::ptr_eq(&table, &recomputed));
    assert_eq!(*table, *recomputed);
}

#[test]
fn test_export_can_be_read_back() {
    let table = enrich(SAMPLE_CSV.as_bytes()).unwrap();
    let out = tempfile::NamedTempFile::new().unwrap();
    write_table(&table, std::fs::File::create(out.path()).unwrap()).unwrap();

    let exported = std::fs::read(out.path()).unwrap();
    let reread = enrich(&exported).unwrap();

    assert_eq!(reread.len(), 12);
    assert_eq!(summarize(&reread).total_revenue, 234_000_000.0);
    assert_eq!(reread.records()[2].yoy_change_pct, -14.1);
}

#[test]
fn test_missing_file_is_an_io_error() {
    let source = DataSource::File("definitely/not/here.csv".into());
    let err = source.load_bytes().unwrap_err();
    assert!(err.user_message().starts_with("Failed to process data: I/O error"));
}
