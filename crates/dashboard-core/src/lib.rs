//! Shared types for the inventory dashboard: error enums, typed inventory
//! records, CLI settings and number formatting.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
