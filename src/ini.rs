//! Minimal INI reader for steps and variables files.
//!
//! Supports `[section]` headers, `key = value` and `key: value` pairs,
//! valueless keys, full-line `#`/`;` comments, and indented continuation
//! lines for multi-line values. Section and key order is preserved.

use indexmap::IndexMap;

use crate::error::{Error, Result};

/// Keys of one section, in file order. `None` marks a key given without a value.
pub type Section = IndexMap<String, Option<String>>;

/// Parses INI text into ordered sections.
///
/// # Errors
/// * `Error::ConfigError` on a key outside of any section, a malformed
///   header, or a duplicate section or key
pub fn parse_ini(content: &str) -> Result<IndexMap<String, Section>> {
    let mut sections: IndexMap<String, Section> = IndexMap::new();
    let mut open_key: Option<String> = None;
    let mut pending_blank = 0usize;

    for (index, raw) in content.lines().enumerate() {
        let number = index + 1;
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            if open_key.is_some() {
                pending_blank += 1;
            }
            continue;
        }

        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        let indented = raw.starts_with(' ') || raw.starts_with('\t');
        if indented {
            // The open key always belongs to the most recent section.
            let value = open_key
                .as_ref()
                .and_then(|key| sections.last_mut().and_then(|(_, entries)| entries.get_mut(key)));
            if let Some(value) = value {
                let mut joined = value.take().unwrap_or_default();
                for _ in 0..pending_blank {
                    joined.push('\n');
                }
                if !joined.is_empty() || pending_blank > 0 {
                    joined.push('\n');
                }
                joined.push_str(trimmed);
                *value = Some(joined);
                pending_blank = 0;
                continue;
            }
        }

        pending_blank = 0;

        if trimmed.starts_with('[') {
            let name = trimmed
                .strip_prefix('[')
                .and_then(|s| s.strip_suffix(']'))
                .map(str::trim)
                .ok_or_else(|| {
                    Error::ConfigError(format!("line {number}: malformed section header"))
                })?;
            if sections.contains_key(name) {
                return Err(Error::ConfigError(format!(
                    "line {number}: duplicate section '{name}'"
                )));
            }
            sections.insert(name.to_string(), Section::new());
            open_key = None;
            continue;
        }

        let (section, entries) = sections.last_mut().ok_or_else(|| {
            Error::ConfigError(format!("line {number}: key found before any section header"))
        })?;

        let (key, value) = match trimmed.find(['=', ':']) {
            Some(at) => {
                let value = trimmed[at + 1..].trim();
                (trimmed[..at].trim(), Some(value.to_string()))
            }
            None => (trimmed, None),
        };

        if entries.contains_key(key) {
            return Err(Error::ConfigError(format!(
                "line {number}: duplicate key '{key}' in section '{section}'"
            )));
        }
        entries.insert(key.to_string(), value);
        open_key = Some(key.to_string());
    }

    Ok(sections)
}
