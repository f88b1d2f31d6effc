//! File I/O for simulation settings.
//!
//! Only configuration is read and written; fields are never persisted.

pub mod config_file;

pub use config_file::{read_config, write_config};
