//! Main test entry point for sales-dashboard

mod common;
mod integration;
mod unit;

use test_log::test;

/// Test that the shared fixtures produce the documented sample
#[test]
fn test_common_utilities() {
    common::logging::init_test_logging();
    common::logging::log_test_step("Testing common utilities");

    let csv = common::test_data::csv_from_rows(&[("2024-01", "1", "1", "")]);
    assert!(csv.starts_with("월,매출액,전년동월,증감률\n"));
    assert_eq!(csv.lines().count(), 2);
}
