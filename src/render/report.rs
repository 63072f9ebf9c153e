//! Report generation for a resolved configuration.

use crate::domain::ResolvedConfig;
use anyhow::Result;

/// One display line per option that carries a non-default, non-empty value.
pub fn report(config: &ResolvedConfig) -> Vec<String> {
    config
        .entries()
        .iter()
        .filter(|entry| entry.is_interesting())
        .map(|entry| format!("{}: {}", entry.spec.label, entry.value.display()))
        .collect()
}

/// The full resolved configuration, defaults included, as pretty-printed JSON
/// keyed by long option name.
pub fn render_json(config: &ResolvedConfig) -> Result<String> {
    // Serialized directly so option order follows the table.
    Ok(serde_json::to_string_pretty(config)?)
}
