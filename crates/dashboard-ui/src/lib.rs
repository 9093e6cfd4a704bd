//! Terminal UI layer for the inventory dashboard.
//!
//! Provides themes, chart components, the overview and trends pages, and the
//! application event loop built on top of [`ratatui`].

pub mod app;
pub mod components;
pub mod overview_view;
pub mod table_view;
pub mod themes;
pub mod trends_view;

pub use dashboard_core as core;
