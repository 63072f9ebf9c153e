//! program-options: resolve options from the command line and a configuration file
//!
//! Each source is parsed into an independent partial config; `resolve` merges
//! them under the per-option policy declared in [`domain::OPTION_SPECS`].

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod render;

pub use config::{parse_config_file, resolve};
pub use domain::{MergePolicy, OptionId, OptionSpec, PartialConfig, ResolvedConfig};
pub use error::{OptionsError, ParseError};
pub use render::report;
