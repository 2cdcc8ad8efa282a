//! Serial upload queue backing the upload widget.

/// Status line shown when nothing is queued or in flight.
pub const IDLE_MESSAGE: &str = "No files uploading.";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Lifecycle of one tracked file.
pub enum UploadStatus {
    /// Waiting for the in-flight upload to finish.
    Queued,
    /// Currently being sent.
    Uploading,
    /// Accepted by the staging service.
    Succeeded,
    /// Rejected or interrupted; kept as-is with no retry.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One file tracked by the widget.
pub struct UploadEntry {
    /// Widget-local id.
    pub id: u64,
    /// File name.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Percent complete; the transport reports only start and finish.
    pub progress: u8,
    /// Current status.
    pub status: UploadStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Upload queue processing one file at a time into a mutable destination path.
pub struct UploadQueue {
    path: String,
    entries: Vec<UploadEntry>,
    next_id: u64,
}

impl UploadQueue {
    /// Creates an empty queue targeting `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// Destination directory for new uploads.
    pub fn get_path(&self) -> &str {
        &self.path
    }

    /// Changes the destination directory for uploads that have not started yet.
    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    /// Tracked files, oldest first.
    pub fn entries(&self) -> &[UploadEntry] {
        &self.entries
    }

    /// Enqueues a file and returns its id.
    pub fn add_file(&mut self, name: impl Into<String>, size: u64) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        self.entries.push(UploadEntry {
            id,
            name: name.into(),
            size,
            progress: 0,
            status: UploadStatus::Queued,
        });
        id
    }

    /// Starts the oldest queued file unless an upload is already in flight.
    pub fn start_next(&mut self) -> Option<u64> {
        if self.uploading_count() > 0 {
            return None;
        }
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.status == UploadStatus::Queued)?;
        entry.status = UploadStatus::Uploading;
        Some(entry.id)
    }

    /// Marks an in-flight upload as accepted.
    pub fn mark_succeeded(&mut self, id: u64) {
        if let Some(entry) = self.in_flight_mut(id) {
            entry.status = UploadStatus::Succeeded;
            entry.progress = 100;
        }
    }

    /// Marks an in-flight upload as failed.
    pub fn mark_failed(&mut self, id: u64, message: impl Into<String>) {
        if let Some(entry) = self.in_flight_mut(id) {
            entry.status = UploadStatus::Failed(message.into());
        }
    }

    fn in_flight_mut(&mut self, id: u64) -> Option<&mut UploadEntry> {
        self.entries
            .iter_mut()
            .find(|entry| entry.id == id && entry.status == UploadStatus::Uploading)
    }

    /// Entry by id.
    pub fn entry(&self, id: u64) -> Option<&UploadEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Number of uploads in flight (zero or one).
    pub fn uploading_count(&self) -> usize {
        self.count(|status| *status == UploadStatus::Uploading)
    }

    /// Number of files waiting to be sent.
    pub fn queued_count(&self) -> usize {
        self.count(|status| *status == UploadStatus::Queued)
    }

    fn count(&self, pred: impl Fn(&UploadStatus) -> bool) -> usize {
        self.entries
            .iter()
            .filter(|entry| pred(&entry.status))
            .count()
    }

    /// Whether any file is tracked (drives the global info panel).
    pub fn is_active(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Whether any tracked upload succeeded; drives the "clear completed" affordance.
    pub fn has_completed(&self) -> bool {
        self.count(|status| *status == UploadStatus::Succeeded) > 0
    }

    /// Aggregate status line.
    pub fn make_upload_message(&self) -> String {
        let uploading = self.uploading_count();
        let queued = self.queued_count();
        if uploading == 0 && queued == 0 {
            return IDLE_MESSAGE.to_string();
        }
        format!(
            "Uploading {uploading} files ({queued} queued) to {}",
            self.path
        )
    }

    /// Forgets every tracked file except the in-flight upload and returns the dropped ids.
    ///
    /// Queued files are dropped without being sent.
    pub fn clear_completed(&mut self) -> Vec<u64> {
        let (kept, removed): (Vec<UploadEntry>, Vec<UploadEntry>) =
            std::mem::take(&mut self.entries)
                .into_iter()
                .partition(|entry| entry.status == UploadStatus::Uploading);
        self.entries = kept;
        removed.into_iter().map(|entry| entry.id).collect()
    }
}

impl Default for UploadQueue {
    fn default() -> Self {
        Self::new("/")
    }
}
