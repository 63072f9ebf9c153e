//! Core data model: the option table, partial configs and the resolved config.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use crate::error::ParseError;

/// Fallback project language when neither source sets one.
pub const DEFAULT_LANGUAGE: &str = "C++";

/// Identifier for every resolvable option.
///
/// Variant order matches the row order of [`OPTION_SPECS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionId {
    IncludePath,
    InputFile,
    Classes,
    Language,
    OptimizationLevel,
}

/// How values from the command line and the config file are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Command line beats file, file beats default.
    Override,
    /// Command-line entries followed by file entries.
    Accumulate,
}

/// Shape of the value an option accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Integer,
    TextList,
}

/// A single option value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Text(String),
    Integer(i64),
    List(Vec<String>),
}

impl OptionValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            OptionValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            OptionValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> &[String] {
        match self {
            OptionValue::List(items) => items,
            _ => &[],
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            OptionValue::Text(s) => s.is_empty(),
            OptionValue::Integer(_) => false,
            OptionValue::List(items) => items.is_empty(),
        }
    }

    /// Human-readable form used by the text report.
    pub fn display(&self) -> String {
        match self {
            OptionValue::Text(s) => s.clone(),
            OptionValue::Integer(n) => n.to_string(),
            OptionValue::List(items) => items.join(" "),
        }
    }
}

/// One row of the option table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpec {
    pub id: OptionId,
    pub long: &'static str,
    pub short: Option<char>,
    pub kind: ValueKind,
    pub policy: MergePolicy,
    pub label: &'static str,
    pub hidden: bool,
}

/// Every option that takes part in resolution, in report order.
pub const OPTION_SPECS: &[OptionSpec] = &[
    OptionSpec {
        id: OptionId::IncludePath,
        long: "include-path",
        short: Some('I'),
        kind: ValueKind::TextList,
        policy: MergePolicy::Accumulate,
        label: "Include paths are",
        hidden: false,
    },
    OptionSpec {
        id: OptionId::InputFile,
        long: "input-file",
        short: None,
        kind: ValueKind::TextList,
        policy: MergePolicy::Accumulate,
        label: "Input files are",
        hidden: true,
    },
    OptionSpec {
        id: OptionId::Classes,
        long: "classes",
        short: None,
        kind: ValueKind::TextList,
        policy: MergePolicy::Accumulate,
        label: "Classes are",
        hidden: false,
    },
    OptionSpec {
        id: OptionId::Language,
        long: "language",
        short: Some('l'),
        kind: ValueKind::Text,
        policy: MergePolicy::Override,
        label: "Language is",
        hidden: false,
    },
    OptionSpec {
        id: OptionId::OptimizationLevel,
        long: "optimization-level",
        short: Some('O'),
        kind: ValueKind::Integer,
        policy: MergePolicy::Override,
        label: "Optimization level is",
        hidden: false,
    },
];

impl OptionSpec {
    pub fn get(id: OptionId) -> &'static OptionSpec {
        &OPTION_SPECS[id as usize]
    }

    pub fn by_long_name(name: &str) -> Option<&'static OptionSpec> {
        OPTION_SPECS.iter().find(|spec| spec.long == name)
    }

    pub fn default_value(&self) -> OptionValue {
        match self.id {
            OptionId::Language => OptionValue::Text(DEFAULT_LANGUAGE.to_string()),
            OptionId::OptimizationLevel => OptionValue::Integer(0),
            OptionId::IncludePath | OptionId::Classes | OptionId::InputFile => {
                OptionValue::List(Vec::new())
            }
        }
    }

    /// Parse one raw occurrence into the value shape this option stores.
    pub fn parse_raw(&self, raw: &str) -> Result<OptionValue, ParseError> {
        match self.kind {
            ValueKind::Text => Ok(OptionValue::Text(raw.to_string())),
            ValueKind::TextList => Ok(OptionValue::List(vec![raw.to_string()])),
            ValueKind::Integer => match raw.trim().parse::<i64>() {
                Ok(n) => Ok(OptionValue::Integer(n)),
                Err(_) => Err(ParseError::InvalidValue {
                    option: self.long.to_string(),
                    value: raw.to_string(),
                }),
            },
        }
    }
}

/// Options explicitly set by a single source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialConfig {
    values: BTreeMap<OptionId, OptionValue>,
}

impl PartialConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: OptionId) -> Option<&OptionValue> {
        self.values.get(&id)
    }

    pub fn list(&self, id: OptionId) -> &[String] {
        self.get(id).map(OptionValue::as_list).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Record one occurrence given as text, validating it against the option's kind.
    pub fn insert_raw(&mut self, id: OptionId, raw: &str) -> Result<(), ParseError> {
        let value = OptionSpec::get(id).parse_raw(raw)?;
        self.insert(id, value)
    }

    /// Record one occurrence. Accumulating options append; a second occurrence
    /// of an overriding option is rejected.
    pub fn insert(&mut self, id: OptionId, value: OptionValue) -> Result<(), ParseError> {
        let spec = OptionSpec::get(id);
        match spec.policy {
            MergePolicy::Override => {
                if self.values.contains_key(&id) {
                    return Err(ParseError::MultipleOccurrences { option: spec.long.to_string() });
                }
                self.values.insert(id, value);
            }
            MergePolicy::Accumulate => {
                let OptionValue::List(items) = value else {
                    return Err(ParseError::UnsupportedValue { option: spec.long.to_string() });
                };
                self.extend(id, items);
            }
        }
        Ok(())
    }

    /// Append values to an accumulating option. Appending nothing leaves it unset.
    pub fn extend(&mut self, id: OptionId, items: impl IntoIterator<Item = String>) {
        let mut items = items.into_iter().peekable();
        if items.peek().is_none() {
            return;
        }
        match self.values.entry(id).or_insert_with(|| OptionValue::List(Vec::new())) {
            OptionValue::List(existing) => existing.extend(items),
            other => *other = OptionValue::List(items.collect()),
        }
    }
}

/// Which layer a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    CommandLine,
    ConfigFile,
    /// Both layers contributed to an accumulated list.
    Merged,
    Default,
}

/// A single option after resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOption {
    pub spec: &'static OptionSpec,
    pub value: OptionValue,
    pub origin: Origin,
}

impl ResolvedOption {
    /// True when the value differs from the declared default and is not empty.
    pub fn is_interesting(&self) -> bool {
        !self.value.is_empty() && self.value != self.spec.default_value()
    }
}

/// The effective configuration: exactly one entry per row of [`OPTION_SPECS`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    entries: Vec<ResolvedOption>,
}

impl ResolvedConfig {
    pub(crate) fn from_entries(entries: Vec<ResolvedOption>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ResolvedOption] {
        &self.entries
    }

    pub fn entry(&self, id: OptionId) -> Option<&ResolvedOption> {
        self.entries.iter().find(|entry| entry.spec.id == id)
    }

    pub fn language(&self) -> &str {
        self.entry(OptionId::Language).and_then(|e| e.value.as_text()).unwrap_or(DEFAULT_LANGUAGE)
    }

    pub fn optimization_level(&self) -> i64 {
        self.entry(OptionId::OptimizationLevel).and_then(|e| e.value.as_integer()).unwrap_or(0)
    }

    pub fn include_paths(&self) -> &[String] {
        self.list(OptionId::IncludePath)
    }

    pub fn classes(&self) -> &[String] {
        self.list(OptionId::Classes)
    }

    pub fn input_files(&self) -> &[String] {
        self.list(OptionId::InputFile)
    }

    fn list(&self, id: OptionId) -> &[String] {
        self.entry(id).map(|e| e.value.as_list()).unwrap_or(&[])
    }
}

impl Serialize for ResolvedConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Entry<'a> {
            value: &'a OptionValue,
            origin: Origin,
        }

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            let value = Entry { value: &entry.value, origin: entry.origin };
            map.serialize_entry(entry.spec.long, &value)?;
        }
        map.end()
    }
}
