//! Listing context, sorting, and search over one directory listing.

use std::cmp::Ordering;

use narrative_host::{FileEntry, StagingPath};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Immutable snapshot of the directory a listing (and every call it spawns) belongs to.
///
/// A new context with a higher generation is minted for every listing; continuations holding
/// an older generation are stale and must discard their results.
pub struct ListingContext {
    generation: u64,
    path: StagingPath,
}

impl ListingContext {
    /// First context for `path`.
    pub fn new(path: StagingPath) -> Self {
        Self {
            generation: 0,
            path,
        }
    }

    /// Successor context listing `path`.
    pub fn next(&self, path: StagingPath) -> Self {
        Self {
            generation: self.generation + 1,
            path,
        }
    }

    /// Monotonic listing counter.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Directory being shown.
    pub fn path(&self) -> &StagingPath {
        &self.path
    }

    /// Server-relative directory.
    pub fn subpath(&self) -> &str {
        self.path.subpath()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Sortable table columns.
pub enum SortColumn {
    /// Folder/file marker.
    Type,
    /// Entry name.
    Name,
    /// Size in bytes.
    Size,
    /// Modification time.
    Modified,
}

impl SortColumn {
    /// Column header label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Type => "Type",
            Self::Name => "Name",
            Self::Size => "Size",
            Self::Modified => "Modified",
        }
    }

    /// Columns in display order.
    pub const ALL: [SortColumn; 4] = [Self::Type, Self::Name, Self::Size, Self::Modified];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Sort direction.
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Active sort column and direction.
pub struct SortState {
    /// Sorted column.
    pub column: SortColumn,
    /// Sort direction.
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: SortColumn::Modified,
            direction: SortDirection::Descending,
        }
    }
}

impl SortState {
    /// Header click: flips direction on the active column, otherwise sorts ascending by `column`.
    pub fn toggle(&mut self, column: SortColumn) {
        if self.column == column {
            self.direction = match self.direction {
                SortDirection::Ascending => SortDirection::Descending,
                SortDirection::Descending => SortDirection::Ascending,
            };
        } else {
            self.column = column;
            self.direction = SortDirection::Ascending;
        }
    }

    fn compare(&self, a: &FileEntry, b: &FileEntry) -> Ordering {
        let primary = match self.column {
            SortColumn::Type => a.is_folder.cmp(&b.is_folder),
            SortColumn::Name => a.name.cmp(&b.name),
            SortColumn::Size => a.size.cmp(&b.size),
            SortColumn::Modified => a.mtime.cmp(&b.mtime),
        };
        let primary = match self.direction {
            SortDirection::Ascending => primary,
            SortDirection::Descending => primary.reverse(),
        };
        primary.then_with(|| a.name.cmp(&b.name))
    }
}

/// Rows matching `search` (case-insensitive substring of the name), in `sort` order.
pub fn visible_rows(entries: &[FileEntry], sort: SortState, search: &str) -> Vec<FileEntry> {
    let needle = search.trim().to_lowercase();
    let mut rows: Vec<FileEntry> = entries
        .iter()
        .filter(|entry| needle.is_empty() || entry.name.to_lowercase().contains(&needle))
        .cloned()
        .collect();
    rows.sort_by(|a, b| sort.compare(a, b));
    rows
}
