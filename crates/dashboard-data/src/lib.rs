//! Data layer for the inventory dashboard.
//!
//! Reads the product and inventory tables from a workbook or CSV directory,
//! joins them into typed records, and computes the aggregates each dashboard
//! page displays.

pub mod aggregator;
pub mod analysis;
pub mod loader;
pub mod reader;

pub use dashboard_core as core;
