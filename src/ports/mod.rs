//! Port traits for the collaborators the domain depends on.

pub mod clock_port;
pub mod config_port;
pub mod indicator_port;
pub mod market_data_port;
pub mod price_store_port;
