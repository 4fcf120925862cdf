//! File-system storage for the server: the TOML configuration file and the
//! word list the workers serve from.

pub mod config;
pub mod dictionary;
