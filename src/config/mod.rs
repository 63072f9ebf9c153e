//! Configuration file loading and layer resolution
//!
//! Reads the optional configuration file into a partial config and merges it
//! with the command-line layer (CLI > File > Defaults).

pub mod ini;
pub mod loader;
pub mod merge;

pub use loader::parse_config_file;
pub use merge::resolve;
