//! Core domain types and logic.

pub mod acquisition;
pub mod config;
pub mod date;
pub mod error;
pub mod indicator;
pub mod price_table;
pub mod resolver;
pub mod stats;
pub mod window;
