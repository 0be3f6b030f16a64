use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::error::{Error, Result};

/// In-memory copy of a `.env` file.
///
/// Only key/value pairs are kept: comments and blank lines are dropped and
/// are not written back by [`EnvFile::save`]. Keys keep the order in which
/// they first appeared; a repeated key takes the value of its last occurrence.
#[derive(Debug, Clone)]
pub struct EnvFile {
    path: PathBuf,
    entries: IndexMap<String, String>,
}

impl EnvFile {
    /// Reads and parses `path`. A missing file yields an empty set of entries.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => parse(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("{:?} does not exist, starting from an empty env file", path);
                IndexMap::new()
            }
            Err(e) => return Err(Error::io(path, e)),
        };

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns the value for `key` only when it is present and non-empty.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `KEY=VALUE` lines joined by `\n`, without quoting or escaping.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Overwrites the whole file with [`EnvFile::render`].
    pub fn save(&self) -> Result<()> {
        std::fs::write(&self.path, self.render()).map_err(|e| Error::io(&self.path, e))
    }
}

fn parse(content: &str) -> IndexMap<String, String> {
    let mut entries = IndexMap::new();

    for line in content.lines() {
        if let Some((key, value)) = parse_line(line) {
            entries.insert(key.to_string(), value);
        }
    }

    entries
}

/// Parses one `KEY=VALUE` line the way dotenv files are commonly read:
/// optional `export ` prefix, `=` or `: ` separator, `#` comments, and values
/// optionally wrapped in matching `'`, `"` or `` ` `` quotes.
///
/// Values are taken literally. `$VAR` references are never expanded, so what
/// was read is exactly what [`EnvFile::save`] writes back.
fn parse_line(line: &str) -> Option<(&str, String)> {
    let line = line.trim_end_matches('\r').trim_start();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let line = match line.strip_prefix("export") {
        Some(rest) if rest.starts_with(char::is_whitespace) => rest.trim_start(),
        _ => line,
    };

    let key_len = line
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')))
        .unwrap_or(line.len());
    if key_len == 0 {
        tracing::warn!("Skipping env file line without a key: {:?}", line);
        return None;
    }
    let (key, rest) = line.split_at(key_len);

    let rest = rest.trim_start();
    let raw = if let Some(value) = rest.strip_prefix('=') {
        value
    } else if let Some(value) = rest
        .strip_prefix(':')
        .filter(|value| value.starts_with(char::is_whitespace))
    {
        value
    } else {
        tracing::warn!("Skipping env file line without '=': {:?}", line);
        return None;
    };

    Some((key, parse_value(raw.trim_start())))
}

fn parse_value(raw: &str) -> String {
    if let Some(quote) = raw.chars().next().filter(|c| matches!(c, '\'' | '"' | '`')) {
        if let Some(inner) = quoted(&raw[1..], quote) {
            return if quote == '"' {
                inner.replace("\\n", "\n").replace("\\r", "\r")
            } else {
                inner.to_string()
            };
        }
    }

    // Unquoted: everything up to an inline comment
    let end = raw.find('#').unwrap_or(raw.len());
    raw[..end].trim().to_string()
}

/// Text up to the closing `quote`, skipping backslash-escaped quotes.
fn quoted(after_open: &str, quote: char) -> Option<&str> {
    let mut escaped = false;
    for (i, c) in after_open.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            c if c == quote => return Some(&after_open[..i]),
            _ => {}
        }
    }
    None
}
