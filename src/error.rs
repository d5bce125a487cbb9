use thiserror::Error;

/// Errors raised while loading or enriching a sales table
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Data format error: {0}")]
    DataFormat(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;

impl DashboardError {
    /// Message shown to the user in place of the dashboard
    pub fn user_message(&self) -> String {
        format!("Failed to process data: {}", self)
    }
}
