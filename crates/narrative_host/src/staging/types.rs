//! Staging-service wire models shared by the HTTP adapter and the widgets.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::ServiceError;

/// Suffixes the staging service knows how to decompress.
pub const ARCHIVE_SUFFIXES: [&str; 8] = [
    ".zip", ".tar.gz", ".tgz", ".tar.bz", ".tar.bz2", ".tar", ".gz", ".bz2",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One row of a staging directory listing.
pub struct FileEntry {
    /// Base name, unique within its parent directory.
    pub name: String,
    /// Whether the entry is a directory.
    #[serde(default)]
    pub is_folder: bool,
    /// Size in bytes (files only).
    #[serde(default, deserialize_with = "de_number_u64")]
    pub size: u64,
    /// Last-modified time in unix milliseconds.
    #[serde(default, deserialize_with = "de_number_u64")]
    pub mtime: u64,
}

impl FileEntry {
    /// Builds a file entry.
    pub fn file(name: impl Into<String>, size: u64, mtime: u64) -> Self {
        Self {
            name: name.into(),
            is_folder: false,
            size,
            mtime,
        }
    }

    /// Builds a folder entry.
    pub fn folder(name: impl Into<String>, mtime: u64) -> Self {
        Self {
            name: name.into(),
            is_folder: true,
            size: 0,
            mtime,
        }
    }

    /// Returns `true` when the staging service can decompress this entry.
    pub fn is_archive(&self) -> bool {
        !self.is_folder && ARCHIVE_SUFFIXES.iter().any(|ext| self.name.ends_with(ext))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Per-file metadata computed by the staging service.
pub struct FileMetadata {
    /// Base name.
    pub name: String,
    /// Last-modified time in unix milliseconds.
    #[serde(default, deserialize_with = "de_number_u64")]
    pub mtime: u64,
    /// Size in bytes.
    #[serde(default, deserialize_with = "de_number_u64")]
    pub size: u64,
    /// MD5 digest when the service computed one.
    #[serde(default)]
    pub md5: Option<String>,
    /// Line count; the service sends either a number or a string.
    #[serde(default)]
    pub line_count: Option<Value>,
    /// First lines of the file.
    #[serde(default)]
    pub head: String,
    /// Last lines of the file.
    #[serde(default)]
    pub tail: String,
    /// Workspace object reference when the file was imported before.
    #[serde(default, rename = "UPA")]
    pub upa: Option<String>,
}

impl FileMetadata {
    /// Parses the line count the way the service reports it, ignoring trailing garbage.
    pub fn parsed_line_count(&self) -> Option<i64> {
        match self.line_count.as_ref()? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
            Value::String(raw) => parse_leading_integer(raw),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Optional domain-specific sidecar metadata (JGI metadata).
pub struct ExtendedMetadata {
    /// Parsed JSON document.
    pub document: Value,
}

impl ExtendedMetadata {
    /// Parses a raw payload, replacing bare `NaN` tokens with empty strings first.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Decode`] when the sanitized payload is still not valid JSON.
    pub fn parse(raw: &str) -> Result<Self, ServiceError> {
        let document = serde_json::from_str(&sanitize_nan_tokens(raw))?;
        Ok(Self { document })
    }

    /// Pretty-printed document with two-space indentation.
    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(&self.document).unwrap_or_else(|_| self.document.to_string())
    }
}

/// Replaces `NaN` tokens outside string literals with `""`.
pub fn sanitize_nan_tokens(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut rest = raw;

    while let Some(ch) = rest.chars().next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
        } else if ch == '"' {
            in_string = true;
        } else if rest.starts_with("NaN") {
            out.push_str("\"\"");
            rest = &rest[3..];
            continue;
        }
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    out
}

fn parse_leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

fn de_number_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().map(|f| f.max(0.0) as u64))
            .unwrap_or(0),
        Value::String(raw) => parse_leading_integer(&raw).unwrap_or(0).max(0) as u64,
        _ => 0,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn listing_rows_decode_from_service_payload() {
        let raw = r#"[
            {"name": "a.txt", "isFolder": false, "size": 10, "mtime": 1000},
            {"name": "sub", "isFolder": true, "size": 0, "mtime": 2000.0}
        ]"#;
        let entries: Vec<FileEntry> = serde_json::from_str(raw).expect("decode");
        assert_eq!(
            entries,
            vec![FileEntry::file("a.txt", 10, 1000), FileEntry::folder("sub", 2000)]
        );
    }

    #[test]
    fn archive_detection_ignores_folders() {
        assert!(FileEntry::file("reads.tar.gz", 1, 1).is_archive());
        assert!(FileEntry::file("bundle.zip", 1, 1).is_archive());
        assert!(!FileEntry::file("reads.fq", 1, 1).is_archive());
        assert!(!FileEntry::folder("backup.tar", 1).is_archive());
    }

    #[test]
    fn metadata_line_count_accepts_numbers_and_strings() {
        let meta: FileMetadata = serde_json::from_value(json!({
            "name": "reads.fq",
            "mtime": 1500000000000u64,
            "size": 2048,
            "md5": "abc",
            "lineCount": "1234",
            "head": "@r1",
            "tail": "+",
            "UPA": "1/2/3"
        }))
        .expect("decode");
        assert_eq!(meta.parsed_line_count(), Some(1234));
        assert_eq!(meta.upa.as_deref(), Some("1/2/3"));

        let meta: FileMetadata =
            serde_json::from_value(json!({"name": "x", "lineCount": 12})).expect("decode");
        assert_eq!(meta.parsed_line_count(), Some(12));
        assert_eq!(meta.md5, None);

        let meta: FileMetadata =
            serde_json::from_value(json!({"name": "x", "lineCount": "n/a"})).expect("decode");
        assert_eq!(meta.parsed_line_count(), None);
    }

    #[test]
    fn nan_tokens_are_replaced_outside_strings_only() {
        let raw = r#"{"avg_insert": NaN, "label": "NaN stays", "list": [1, NaN]}"#;
        assert_eq!(
            sanitize_nan_tokens(raw),
            r#"{"avg_insert": "", "label": "NaN stays", "list": [1, ""]}"#
        );

        let parsed = ExtendedMetadata::parse(raw).expect("parse");
        assert_eq!(parsed.document["avg_insert"], json!(""));
        assert_eq!(parsed.document["label"], json!("NaN stays"));
    }

    #[test]
    fn extended_metadata_pretty_prints_in_source_order() {
        let parsed = ExtendedMetadata::parse(r#"{"b": 1, "a": {"c": true}}"#).expect("parse");
        assert_eq!(
            parsed.pretty(),
            "{\n  \"b\": 1,\n  \"a\": {\n    \"c\": true\n  }\n}"
        );
    }

    #[test]
    fn extended_metadata_rejects_garbage() {
        assert!(matches!(
            ExtendedMetadata::parse("<html>"),
            Err(ServiceError::Decode(_))
        ));
    }
}
