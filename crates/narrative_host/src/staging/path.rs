//! Staging-area path handling.
//!
//! Paths are always interpreted under the signed-in user's staging root, so `/` is that root and
//! the server-relative `subpath` is the normalized path without its leading slash.

use serde::{Deserialize, Serialize};

/// Normalizes a staging path to `/`-joined segments under the staging root.
///
/// Backslashes count as separators. Empty, `.` and `..` segments are dropped, so a path never
/// climbs above the root.
pub fn normalize_staging_path(path: &str) -> String {
    let segments: Vec<&str> = path
        .trim()
        .split(|c: char| c == '/' || c == '\\')
        .filter(|segment| !matches!(*segment, "" | "." | ".."))
        .collect();
    format!("/{}", segments.join("/"))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Normalized location inside the user's staging area.
pub struct StagingPath {
    path: String,
}

impl StagingPath {
    /// Parses and normalizes a caller-supplied path.
    pub fn new(raw: &str) -> Self {
        Self {
            path: normalize_staging_path(raw),
        }
    }

    /// The staging root.
    pub fn root() -> Self {
        Self {
            path: "/".to_string(),
        }
    }

    /// Display form, always starting with `/`.
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Server-relative directory (no leading slash, empty at the root).
    pub fn subpath(&self) -> &str {
        &self.path[1..]
    }

    /// Returns `true` at the staging root.
    pub fn is_root(&self) -> bool {
        self.path == "/"
    }

    /// Path of a child folder.
    pub fn child(&self, name: &str) -> Self {
        Self::new(&format!("{}/{}", self.path, name))
    }

    /// Server-relative path of a file inside this directory.
    pub fn file_path(&self, name: &str) -> String {
        if self.is_root() {
            name.to_string()
        } else {
            format!("{}/{}", self.subpath(), name)
        }
    }

    /// Breadcrumb trail from the root to this directory.
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        let mut crumbs = vec![Breadcrumb {
            label: "/".to_string(),
            path: Self::root(),
        }];
        let mut prefix = String::new();
        for segment in self.subpath().split('/').filter(|s| !s.is_empty()) {
            prefix.push('/');
            prefix.push_str(segment);
            crumbs.push(Breadcrumb {
                label: segment.to_string(),
                path: Self::new(&prefix),
            });
        }
        crumbs
    }
}

impl Default for StagingPath {
    fn default() -> Self {
        Self::root()
    }
}

impl std::fmt::Display for StagingPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One clickable segment of the path bar.
pub struct Breadcrumb {
    /// Segment label.
    pub label: String,
    /// Cumulative path the segment navigates to.
    pub path: StagingPath,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn staging_paths_stay_under_the_root() {
        let cases = [
            ("", "/"),
            ("   ", "/"),
            ("proj/reads", "/proj/reads"),
            ("/proj//reads/", "/proj/reads"),
            ("\\\\proj\\reads", "/proj/reads"),
            ("./proj/../other", "/proj/other"),
            ("../../etc", "/etc"),
            ("/../../", "/"),
        ];

        for (input, expected) in cases {
            assert_eq!(normalize_staging_path(input), expected, "input={input:?}");
        }
    }

    #[test]
    fn subpath_and_file_paths_are_server_relative() {
        let root = StagingPath::root();
        assert_eq!(root.subpath(), "");
        assert_eq!(root.file_path("a.txt"), "a.txt");

        let proj = root.child("proj");
        assert_eq!(proj.as_str(), "/proj");
        assert_eq!(proj.subpath(), "proj");
        assert_eq!(proj.file_path("reads.fq"), "proj/reads.fq");
        assert_eq!(proj.child("nested").subpath(), "proj/nested");
    }

    #[test]
    fn breadcrumbs_accumulate_prefixes() {
        let crumbs = StagingPath::new("/a/b").breadcrumbs();
        let labels: Vec<_> = crumbs.iter().map(|c| c.label.as_str()).collect();
        let paths: Vec<_> = crumbs.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(labels, vec!["/", "a", "b"]);
        assert_eq!(paths, vec!["/", "/a", "/a/b"]);

        assert_eq!(StagingPath::root().breadcrumbs().len(), 1);
    }
}
