mod csv_export;
pub mod performance_model;
pub mod performance_service;
mod view_builder;

#[cfg(test)]
mod performance_service_tests;

pub use csv_export::{export_performance_csv, EXPORT_HEADERS};
pub use performance_model::*;
pub use performance_service::{PerformanceService, PerformanceServiceTrait};
pub use view_builder::{build_performance_view, sort_rows};
