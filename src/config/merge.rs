//! Layer resolution
//!
//! Merges the command-line layer over the file layer, option by option:
//! - Override: command line wins, then file, then the declared default
//! - Accumulate: command-line entries followed by file entries

use crate::domain::{
    MergePolicy, OptionValue, Origin, PartialConfig, ResolvedConfig, ResolvedOption, OPTION_SPECS,
};

/// Resolve every known option from the two layers.
pub fn resolve(cli: &PartialConfig, file: &PartialConfig) -> ResolvedConfig {
    let entries = OPTION_SPECS
        .iter()
        .map(|spec| {
            let (value, origin) = match spec.policy {
                MergePolicy::Override => match (cli.get(spec.id), file.get(spec.id)) {
                    (Some(value), shadowed) => {
                        if let Some(shadowed) = shadowed {
                            tracing::warn!(
                                "Command line overrides {} = {} from config file",
                                spec.long,
                                shadowed.display()
                            );
                        }
                        (value.clone(), Origin::CommandLine)
                    }
                    (None, Some(value)) => (value.clone(), Origin::ConfigFile),
                    (None, None) => (spec.default_value(), Origin::Default),
                },
                MergePolicy::Accumulate => {
                    let from_cli = cli.list(spec.id);
                    let from_file = file.list(spec.id);
                    let origin = match (from_cli.is_empty(), from_file.is_empty()) {
                        (false, false) => Origin::Merged,
                        (false, true) => Origin::CommandLine,
                        (true, false) => Origin::ConfigFile,
                        (true, true) => Origin::Default,
                    };
                    (OptionValue::List([from_cli, from_file].concat()), origin)
                }
            };
            tracing::debug!("Resolved {} = {:?} ({:?})", spec.long, value, origin);
            ResolvedOption { spec, value, origin }
        })
        .collect();

    ResolvedConfig::from_entries(entries)
}
