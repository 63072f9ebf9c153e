//! Error taxonomy for option parsing and config file loading.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Malformed command-line token, config line, or option value.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{0}")]
    CommandLine(String),

    #[error("unrecognised option '{key}' at line {line}")]
    UnknownOption { key: String, line: usize },

    #[error("the argument ('{value}') for option '{option}' is invalid")]
    InvalidValue { option: String, value: String },

    #[error("option '{option}' cannot be specified more than once")]
    MultipleOccurrences { option: String },

    #[error("invalid config file syntax at line {line}: '{content}'")]
    Syntax { line: usize, content: String },

    #[error("configuration file is not valid UTF-8")]
    Encoding(#[source] std::string::FromUtf8Error),

    #[error("unsupported value type for option '{option}'")]
    UnsupportedValue { option: String },

    #[error("invalid TOML")]
    Toml(#[from] toml::de::Error),

    #[error("invalid YAML")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum OptionsError {
    /// The named configuration file could not be opened for reading.
    #[error("can not read options configuration file")]
    ConfigFileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}
