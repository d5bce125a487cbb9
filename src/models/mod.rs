use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{DashboardError, DashboardResult};
use crate::sample::SAMPLE_CSV;

/// Default KPI revenue target (KRW)
pub const DEFAULT_KPI_TARGET: u64 = 20_000_000;

/// Increment applied by the dashboard's target controls
pub const KPI_TARGET_STEP: u64 = 100_000;

/// Default number of enrichment results kept in the cache
pub const DEFAULT_CACHE_CAPACITY: usize = 8;

/// One month of sales after enrichment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRecord {
    #[serde(rename = "월")]
    pub period: String,
    #[serde(skip)]
    pub period_date: Option<NaiveDate>,
    #[serde(rename = "매출액")]
    pub revenue: Option<f64>,
    #[serde(rename = "전년동월")]
    pub prior_year_revenue: Option<f64>,
    #[serde(rename = "증감률")]
    pub yoy_change_pct: f64,
    #[serde(rename = "분기")]
    pub quarter: Option<u8>,
}

/// Enriched, period-ordered sales table
///
/// Built once per dataset by [`crate::enrichment::normalize`] and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedTable {
    records: Vec<MonthlyRecord>,
    has_supplied_yoy: bool,
}

impl EnrichedTable {
    pub(crate) fn new(records: Vec<MonthlyRecord>, has_supplied_yoy: bool) -> Self {
        Self {
            records,
            has_supplied_yoy,
        }
    }

    pub fn records(&self) -> &[MonthlyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the input carried a percent-change column at all
    pub fn has_supplied_yoy(&self) -> bool {
        self.has_supplied_yoy
    }

    pub fn get(&self, index: usize) -> Option<&MonthlyRecord> {
        self.records.get(index)
    }
}

/// Where the dashboard reads its CSV from
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    File(PathBuf),
    Sample,
}

impl DataSource {
    /// Pick a source the way the settings panel does: an explicit file wins,
    /// otherwise the sample if enabled, otherwise nothing.
    pub fn select(file: Option<PathBuf>, use_sample: bool) -> Option<Self> {
        match file {
            Some(path) => Some(DataSource::File(path)),
            None if use_sample => Some(DataSource::Sample),
            None => None,
        }
    }

    /// Read the raw CSV bytes for this source
    pub fn load_bytes(&self) -> DashboardResult<Vec<u8>> {
        match self {
            DataSource::File(path) => Ok(std::fs::read(path)?),
            DataSource::Sample => Ok(SAMPLE_CSV.as_bytes().to_vec()),
        }
    }

    pub fn label(&self) -> String {
        match self {
            DataSource::File(path) => path.display().to_string(),
            DataSource::Sample => "sample data".to_string(),
        }
    }
}

/// Configuration for the application
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub csv_path: Option<PathBuf>,
    pub kpi_target: u64,
    pub cache_capacity: usize,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            csv_path: None,
            kpi_target: DEFAULT_KPI_TARGET,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            log_filter: "sales_dashboard=info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> DashboardResult<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> DashboardResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let kpi_target = match lookup("SALES_DASHBOARD_TARGET") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                DashboardError::Config(format!(
                    "SALES_DASHBOARD_TARGET must be a non-negative integer, got '{}'",
                    raw
                ))
            })?,
            None => defaults.kpi_target,
        };

        let cache_capacity = match lookup("SALES_DASHBOARD_CACHE_CAPACITY") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                DashboardError::Config(format!(
                    "SALES_DASHBOARD_CACHE_CAPACITY must be a positive integer, got '{}'",
                    raw
                ))
            })?,
            None => defaults.cache_capacity,
        };
        if cache_capacity == 0 {
            return Err(DashboardError::Config(
                "SALES_DASHBOARD_CACHE_CAPACITY must be at least 1".to_string(),
            ));
        }

        Ok(Config {
            csv_path: lookup("SALES_DASHBOARD_CSV")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            kpi_target,
            cache_capacity,
            log_filter: lookup("SALES_DASHBOARD_LOG").unwrap_or(defaults.log_filter),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.kpi_target, 20_000_000);
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("SALES_DASHBOARD_CSV", "data/sales.csv"),
            ("SALES_DASHBOARD_TARGET", "15000000"),
            ("SALES_DASHBOARD_CACHE_CAPACITY", "2"),
            ("SALES_DASHBOARD_LOG", "sales_dashboard=debug"),
        ]))
        .unwrap();

        assert_eq!(config.csv_path, Some(PathBuf::from("data/sales.csv")));
        assert_eq!(config.kpi_target, 15_000_000);
        assert_eq!(config.cache_capacity, 2);
        assert_eq!(config.log_filter, "sales_dashboard=debug");
    }

    #[test]
    fn test_config_rejects_bad_target() {
        let result = Config::from_lookup(lookup_from(&[("SALES_DASHBOARD_TARGET", "-5")]));
        assert!(matches!(result, Err(DashboardError::Config(_))));
    }

    #[test]
    fn test_config_rejects_zero_capacity() {
        let result =
            Config::from_lookup(lookup_from(&[("SALES_DASHBOARD_CACHE_CAPACITY", "0")]));
        assert!(matches!(result, Err(DashboardError::Config(_))));
    }

    #[test]
    fn test_source_selection() {
        let path = PathBuf::from("upload.csv");
        assert_eq!(
            DataSource::select(Some(path.clone()), true),
            Some(DataSource::File(path))
        );
        assert_eq!(DataSource::select(None, true), Some(DataSource::Sample));
        assert_eq!(DataSource::select(None, false), None);
    }

    #[test]
    fn test_sample_source_loads_bytes() {
        let bytes = DataSource::Sample.load_bytes().unwrap();
        assert!(bytes.starts_with("월,매출액".as_bytes()));
    }
}
