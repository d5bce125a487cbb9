//! Terminal dashboard: metric cards, four charts and a data preview.

pub mod app;
pub mod charts;
pub mod components;

pub use app::{run_app, DashboardApp, LoadState};
