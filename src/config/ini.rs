//! Native line-oriented `key=value` config format.
//!
//! - `#` starts a comment running to end of line
//! - `[section]` qualifies following keys as `section.key`
//! - `key = value` splits at the first `=`; both sides are trimmed

use crate::error::ParseError;

/// A single `key=value` entry with the 1-based line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
    pub line: usize,
}

pub fn parse_entries(content: &str) -> Result<Vec<Entry>, ParseError> {
    let mut entries = Vec::new();
    let mut prefix = String::new();

    for (index, raw_line) in content.lines().enumerate() {
        let line_no = index + 1;
        let line = match raw_line.find('#') {
            Some(pos) => &raw_line[..pos],
            None => raw_line,
        }
        .trim();

        if line.is_empty() {
            continue;
        }

        if let Some(section) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            let section = section.trim();
            prefix = if section.is_empty() { String::new() } else { format!("{section}.") };
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(ParseError::Syntax { line: line_no, content: raw_line.to_string() });
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(ParseError::Syntax { line: line_no, content: raw_line.to_string() });
        }

        entries.push(Entry {
            key: format!("{prefix}{key}"),
            value: value.trim().to_string(),
            line: line_no,
        });
    }

    Ok(entries)
}
