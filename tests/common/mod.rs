//! Common test utilities and helpers

/// Test data utilities
pub mod test_data {
    use std::io::Write;

    use tempfile::NamedTempFile;

    pub const HEADER: &str = "월,매출액,전년동월,증감률";

    /// Build a CSV payload from (period, revenue, prior-year, percent) cells
    pub fn csv_from_rows(rows: &[(&str, &str, &str, &str)]) -> String {
        let mut csv = format!("{}\n", HEADER);
        for (period, revenue, prior, pct) in rows {
            csv.push_str(&format!("{},{},{},{}\n", period, revenue, prior, pct));
        }
        csv
    }

    /// Write `contents` to a temporary `.csv` file
    pub fn write_temp_csv(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("Failed to create temp file");
        file.write_all(contents.as_bytes())
            .expect("Failed to write temp file");
        file
    }
}

/// Logging utilities for tests
pub mod logging {
    use std::sync::Once;
    use tracing::info;

    static INIT: Once = Once::new();

    /// Initialize test logging
    pub fn init_test_logging() {
        INIT.call_once(|| {
            // test-log may have installed a subscriber already
            let _ = tracing::subscriber::set_global_default(
                tracing_subscriber::fmt()
                    .with_env_filter("sales_dashboard=debug")
                    .with_test_writer()
                    .finish(),
            );
        });
    }

    /// Log test step
    pub fn log_test_step(step: &str) {
        info!("🧪 Test Step: {}", step);
    }
}
