//! Config file loading

use std::fs;
use std::path::Path;

use super::ini;
use crate::domain::{OptionSpec, PartialConfig};
use crate::error::{OptionsError, ParseError};

/// Read `path` fully and parse it into the file layer.
///
/// The format follows the extension: `.toml`, `.yaml`/`.yml`, or the native
/// `key=value` format for anything else.
pub fn parse_config_file(path: &Path) -> Result<PartialConfig, OptionsError> {
    let bytes = fs::read(path)
        .map_err(|source| OptionsError::ConfigFileOpen { path: path.to_path_buf(), source })?;
    let content = String::from_utf8(bytes).map_err(ParseError::Encoding)?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
    tracing::debug!("Parsing config file {} ({} bytes)", path.display(), content.len());

    let partial = match ext.as_str() {
        "toml" => parse_toml_config(&content)?,
        "yaml" | "yml" => parse_yaml_config(&content)?,
        _ => parse_native_config(&content)?,
    };

    Ok(partial)
}

pub fn parse_native_config(content: &str) -> Result<PartialConfig, ParseError> {
    let mut partial = PartialConfig::new();
    for entry in ini::parse_entries(content)? {
        let spec = OptionSpec::by_long_name(&entry.key)
            .ok_or(ParseError::UnknownOption { key: entry.key.clone(), line: entry.line })?;
        partial.insert_raw(spec.id, &entry.value)?;
    }
    Ok(partial)
}

/// Parse a TOML table keyed by long option names.
pub fn parse_toml_config(content: &str) -> Result<PartialConfig, ParseError> {
    let table: toml::Table = toml::from_str(content)?;

    let mut partial = PartialConfig::new();
    for (key, value) in table {
        let spec = known_option(&key, content)?;
        for raw in toml_scalars(spec, value)? {
            partial.insert_raw(spec.id, &raw)?;
        }
    }
    Ok(partial)
}

/// Parse a YAML mapping keyed by long option names.
pub fn parse_yaml_config(content: &str) -> Result<PartialConfig, ParseError> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)?;

    let mut partial = PartialConfig::new();
    let mapping = match raw {
        serde_yaml::Value::Mapping(mapping) => mapping,
        // Empty document
        serde_yaml::Value::Null => return Ok(partial),
        _ => return Err(ParseError::Syntax { line: 1, content: "expected a mapping".into() }),
    };

    for (key, value) in mapping {
        let Some(key) = key.as_str() else {
            return Err(ParseError::Syntax { line: 1, content: format!("non-string key {key:?}") });
        };
        let spec = known_option(key, content)?;
        for raw in yaml_scalars(spec, value)? {
            partial.insert_raw(spec.id, &raw)?;
        }
    }
    Ok(partial)
}

/// Look up a structured-format key, reporting the line it first appears on.
fn known_option(key: &str, content: &str) -> Result<&'static OptionSpec, ParseError> {
    OptionSpec::by_long_name(key).ok_or_else(|| ParseError::UnknownOption {
        key: key.to_string(),
        line: content.lines().position(|l| defines_key(l, key)).map(|i| i + 1).unwrap_or(0),
    })
}

/// True when `line` starts with `key` (optionally quoted) followed by `:`, `=` or whitespace.
fn defines_key(line: &str, key: &str) -> bool {
    let quotes = ['"', '\''];
    let line = line.trim_start().trim_start_matches(quotes);
    line.strip_prefix(key).is_some_and(|rest| {
        let rest = rest.trim_start_matches(quotes);
        rest.starts_with([':', '=']) || rest.starts_with(char::is_whitespace)
    })
}

fn toml_scalars(spec: &OptionSpec, value: toml::Value) -> Result<Vec<String>, ParseError> {
    let unsupported = || ParseError::UnsupportedValue { option: spec.long.to_string() };
    match value {
        toml::Value::String(s) => Ok(vec![s]),
        toml::Value::Integer(i) => Ok(vec![i.to_string()]),
        toml::Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                toml::Value::String(s) => Ok(s),
                toml::Value::Integer(i) => Ok(i.to_string()),
                _ => Err(unsupported()),
            })
            .collect(),
        _ => Err(unsupported()),
    }
}

fn yaml_scalars(spec: &OptionSpec, value: serde_yaml::Value) -> Result<Vec<String>, ParseError> {
    let unsupported = || ParseError::UnsupportedValue { option: spec.long.to_string() };
    let scalar = |value: serde_yaml::Value| match value {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) if n.is_i64() => Ok(n.to_string()),
        _ => Err(unsupported()),
    };
    match value {
        serde_yaml::Value::Sequence(items) => items.into_iter().map(scalar).collect(),
        other => Ok(vec![scalar(other)?]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OptionId, OptionValue};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_open_error() {
        let tmp = TempDir::new().expect("tmp");
        let err = parse_config_file(&tmp.path().join("absent.cfg")).expect_err("missing");
        assert!(matches!(err, OptionsError::ConfigFileOpen { .. }));
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("bad.cfg");
        fs::write(&path, b"language=\xff\n").expect("write");

        let err = parse_config_file(&path).expect_err("invalid utf-8");
        assert!(matches!(err, OptionsError::Parse(ParseError::Encoding(_))), "{err:?}");
    }

    #[test]
    fn test_load_native_config() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("multiple_sources.cfg");
        fs::write(&path, "include-path=bar\ninclude-path=baz\nlanguage=C\noptimization-level=2\n")
            .expect("write");

        let cfg = parse_config_file(&path).expect("config");
        assert_eq!(cfg.list(OptionId::IncludePath), ["bar", "baz"]);
        assert_eq!(cfg.get(OptionId::Language), Some(&OptionValue::Text("C".into())));
        assert_eq!(cfg.get(OptionId::OptimizationLevel), Some(&OptionValue::Integer(2)));
    }

    #[test]
    fn test_native_unknown_key_reports_line() {
        let err = parse_native_config("language=C\nwarp-drive=on\n").expect_err("unknown");
        match err {
            ParseError::UnknownOption { key, line } => {
                assert_eq!(key, "warp-drive");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_command_line_only_options_are_rejected_in_files() {
        for key in ["help", "version", "config"] {
            let err = parse_native_config(&format!("{key}=x\n")).expect_err(key);
            assert!(matches!(err, ParseError::UnknownOption { .. }), "{key} should be unknown");
        }
    }

    #[test]
    fn test_native_non_numeric_optimization_level() {
        let err = parse_native_config("optimization-level=fast\n").expect_err("invalid");
        assert!(matches!(err, ParseError::InvalidValue { .. }));
    }

    #[test]
    fn test_native_repeated_scalar_is_rejected() {
        let err = parse_native_config("language=C\nlanguage=Rust\n").expect_err("repeat");
        assert!(matches!(err, ParseError::MultipleOccurrences { .. }));
    }

    #[test]
    fn test_load_toml_config() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("options.toml");
        fs::write(
            &path,
            "language = 'Rust'\noptimization-level = 3\ninclude-path = ['a', 'b']\nclasses = 'Main'\n",
        )
        .expect("write");

        let cfg = parse_config_file(&path).expect("config");
        assert_eq!(cfg.get(OptionId::Language), Some(&OptionValue::Text("Rust".into())));
        assert_eq!(cfg.get(OptionId::OptimizationLevel), Some(&OptionValue::Integer(3)));
        assert_eq!(cfg.list(OptionId::IncludePath), ["a", "b"]);
        assert_eq!(cfg.list(OptionId::Classes), ["Main"]);
    }

    #[test]
    fn test_toml_rejects_boolean_value() {
        let err = parse_toml_config("language = true\n").expect_err("bool");
        assert!(matches!(err, ParseError::UnsupportedValue { .. }));
    }

    #[test]
    fn test_toml_rejects_list_for_scalar_option() {
        let err = parse_toml_config("language = ['C', 'Rust']\n").expect_err("list");
        assert!(matches!(err, ParseError::MultipleOccurrences { .. }));
    }

    #[test]
    fn test_toml_syntax_error() {
        let err = parse_toml_config("language = \n").expect_err("syntax");
        assert!(matches!(err, ParseError::Toml(_)));
    }

    #[test]
    fn test_load_yaml_config() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("options.yml");
        fs::write(&path, "language: C\ninput-file:\n  - main.cpp\n  - util.cpp\n").expect("write");

        let cfg = parse_config_file(&path).expect("config");
        assert_eq!(cfg.get(OptionId::Language), Some(&OptionValue::Text("C".into())));
        assert_eq!(cfg.list(OptionId::InputFile), ["main.cpp", "util.cpp"]);
    }

    #[test]
    fn test_unknown_key_line_ignores_longer_keys_with_same_prefix() {
        let err = parse_yaml_config("language: C\nlang: x\n").expect_err("unknown");
        assert!(matches!(err, ParseError::UnknownOption { line: 2, .. }), "{err:?}");

        let err = parse_toml_config("language = 'C'\n\"lang\" = 'x'\n").expect_err("unknown");
        assert!(matches!(err, ParseError::UnknownOption { line: 2, .. }), "{err:?}");
    }

    #[test]
    fn test_empty_yaml_is_empty_layer() {
        assert!(parse_yaml_config("").expect("empty").is_empty());
    }

    #[test]
    fn test_yaml_unknown_key() {
        let err = parse_yaml_config("language: C\nbogus: 1\n").expect_err("unknown");
        match err {
            ParseError::UnknownOption { key, line } => {
                assert_eq!(key, "bogus");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
