//! Lazily fetched per-file details shown in the expanded row.

use narrative_host::{
    line_count_label, long_date, readable_bytes, ExtendedMetadata, FileMetadata, ServiceError,
};

/// Placeholder for optional metadata fields.
pub const NOT_PROVIDED: &str = "Not provided";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Workspace object a staged file was imported as.
pub struct ImportedAs {
    /// Object address (`ws/obj/ver`).
    pub upa: String,
    /// Object display name, or the lookup error message.
    pub resolution: Result<String, String>,
}

impl ImportedAs {
    /// Data view link for the object.
    pub fn link(&self) -> String {
        format!("/#dataview/{}", self.upa)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Everything shown in a file's detail panel.
pub struct FileDetails {
    /// Computed metadata.
    pub metadata: FileMetadata,
    /// Import provenance, when the metadata carried a UPA.
    pub imported_as: Option<ImportedAs>,
    /// JGI sidecar, when one exists.
    pub extended: Option<ExtendedMetadata>,
}

impl FileDetails {
    /// Labelled rows of the `Info` tab, excluding the import link.
    pub fn info_fields(&self) -> Vec<(&'static str, String)> {
        let metadata = &self.metadata;
        vec![
            ("Name", metadata.name.clone()),
            ("Created", long_date(metadata.mtime)),
            ("Size", readable_bytes(metadata.size)),
            ("Line Count", line_count_label(metadata.parsed_line_count())),
            (
                "MD5",
                metadata
                    .md5
                    .clone()
                    .unwrap_or_else(|| NOT_PROVIDED.to_string()),
            ),
        ]
    }

    /// Tabs in display order; `JGI Metadata` only when a sidecar was found.
    pub fn tabs(&self) -> Vec<DetailTab> {
        let mut tabs = vec![DetailTab::Info, DetailTab::Head, DetailTab::Tail];
        if self.extended.is_some() {
            tabs.push(DetailTab::Jgi);
        }
        tabs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Detail panel tabs.
pub enum DetailTab {
    /// Metadata summary.
    #[default]
    Info,
    /// Head preview.
    Head,
    /// Tail preview.
    Tail,
    /// Pretty-printed JGI sidecar.
    Jgi,
}

impl DetailTab {
    /// Tab label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Head => "First 10 lines",
            Self::Tail => "Last 10 lines",
            Self::Jgi => "JGI Metadata",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
/// Fetch state of one file's details within the current listing.
pub enum DetailState {
    /// Never expanded.
    #[default]
    NotFetched,
    /// Metadata (and follow-up lookups) in flight.
    Loading,
    /// Cached until the next listing.
    Fetched(FileDetails),
    /// Metadata failed; the next expansion retries.
    Failed(ServiceError),
}

impl DetailState {
    /// Whether expanding the row should start a fetch.
    pub fn needs_fetch(&self) -> bool {
        matches!(self, Self::NotFetched | Self::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn metadata() -> FileMetadata {
        serde_json::from_value(json!({
            "name": "reads.fq",
            "mtime": 1_500_000_000_000_u64,
            "size": 2048,
            "lineCount": "12345",
            "head": "@r1",
            "tail": "+",
        }))
        .expect("metadata")
    }

    #[test]
    fn info_fields_fill_placeholders() {
        let details = FileDetails {
            metadata: metadata(),
            imported_as: None,
            extended: None,
        };
        let fields = details.info_fields();
        let labels: Vec<&str> = fields.iter().map(|(label, _)| *label).collect();
        assert_eq!(labels, vec!["Name", "Created", "Size", "Line Count", "MD5"]);
        assert_eq!(fields[2].1, "2 KB");
        assert_eq!(fields[3].1, "12,345");
        assert_eq!(fields[4].1, NOT_PROVIDED);
    }

    #[test]
    fn jgi_tab_only_with_sidecar() {
        let mut details = FileDetails {
            metadata: metadata(),
            imported_as: None,
            extended: None,
        };
        assert_eq!(
            details.tabs(),
            vec![DetailTab::Info, DetailTab::Head, DetailTab::Tail]
        );
        details.extended = Some(ExtendedMetadata::parse(r#"{"a": NaN}"#).expect("sidecar"));
        assert_eq!(details.tabs().last(), Some(&DetailTab::Jgi));
        assert_eq!(DetailTab::Head.label(), "First 10 lines");
    }

    #[test]
    fn imported_as_links_to_data_view() {
        let imported = ImportedAs {
            upa: "1/2/3".into(),
            resolution: Ok("reads".into()),
        };
        assert_eq!(imported.link(), "/#dataview/1/2/3");
    }

    #[test]
    fn failed_and_unfetched_states_refetch() {
        assert!(DetailState::NotFetched.needs_fetch());
        assert!(DetailState::Failed(ServiceError::http(500, "boom")).needs_fetch());
        assert!(!DetailState::Loading.needs_fetch());
    }
}
