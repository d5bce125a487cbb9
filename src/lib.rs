pub mod analysis;
pub mod cache;
pub mod enrichment;
pub mod error;
pub mod models;
pub mod sample;
pub mod ui;

pub use cache::{ContentKey, EnrichmentCache};
pub use enrichment::{enrich, normalize, read_table};
pub use error::{DashboardError, DashboardResult};
pub use models::{Config, DataSource, EnrichedTable, MonthlyRecord};
