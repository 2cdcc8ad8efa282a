//! Host-notebook and dialog contracts.
//!
//! The notebook owns app cells and the data-panel overlay; the widgets only ask it to add a
//! populated app cell and close the overlay.

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use serde_json::{Map, Value};

/// Version tag used when the host does not pin one.
pub const DEFAULT_APP_VERSION_TAG: &str = "release";

/// Host notebook application.
pub trait NotebookHost {
    /// Release tag new app cells should be created with.
    fn app_version_tag(&self) -> String {
        DEFAULT_APP_VERSION_TAG.to_string()
    }

    /// Adds an app cell for `app_id` with its parameters pre-filled.
    fn add_and_populate_app(&self, app_id: &str, tag: &str, inputs: &Map<String, Value>);

    /// Closes the data-panel overlay hosting the widgets.
    fn hide_overlay(&self);
}

#[derive(Debug, Clone, PartialEq)]
/// App cell requested through [`MemoryNotebookHost`].
pub struct AddedApp {
    /// App id.
    pub app_id: String,
    /// Version tag.
    pub tag: String,
    /// Pre-filled parameters.
    pub inputs: Map<String, Value>,
}

#[derive(Debug, Clone, Default)]
/// Host adapter recording requests for assertions.
pub struct MemoryNotebookHost {
    added: Rc<RefCell<Vec<AddedApp>>>,
    overlay_hides: Rc<RefCell<usize>>,
}

impl MemoryNotebookHost {
    /// App cells requested so far.
    pub fn added_apps(&self) -> Vec<AddedApp> {
        self.added.borrow().clone()
    }

    /// Number of overlay-hide requests.
    pub fn overlay_hides(&self) -> usize {
        *self.overlay_hides.borrow()
    }
}

impl NotebookHost for MemoryNotebookHost {
    fn add_and_populate_app(&self, app_id: &str, tag: &str, inputs: &Map<String, Value>) {
        self.added.borrow_mut().push(AddedApp {
            app_id: app_id.to_string(),
            tag: tag.to_string(),
            inputs: inputs.clone(),
        });
    }

    fn hide_overlay(&self) {
        *self.overlay_hides.borrow_mut() += 1;
    }
}

/// Blocking user dialogs.
pub trait DialogService {
    /// Asks a yes/no question.
    fn confirm(&self, message: &str) -> bool;

    /// Shows a message.
    fn alert(&self, message: &str);
}

#[derive(Debug, Clone, Default)]
/// Dialog adapter with scripted answers; unscripted confirmations are accepted.
pub struct MemoryDialogService {
    answers: Rc<RefCell<VecDeque<bool>>>,
    confirms: Rc<RefCell<Vec<String>>>,
    alerts: Rc<RefCell<Vec<String>>>,
}

impl MemoryDialogService {
    /// Queues the answer for the next confirmation.
    pub fn answer_next(&self, answer: bool) {
        self.answers.borrow_mut().push_back(answer);
    }

    /// Confirmation prompts shown so far.
    pub fn confirms(&self) -> Vec<String> {
        self.confirms.borrow().clone()
    }

    /// Alerts shown so far.
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }
}

impl DialogService for MemoryDialogService {
    fn confirm(&self, message: &str) -> bool {
        self.confirms.borrow_mut().push(message.to_string());
        self.answers.borrow_mut().pop_front().unwrap_or(true)
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn memory_notebook_host_records_requests() {
        let host = MemoryNotebookHost::default();
        let mut inputs = Map::new();
        inputs.insert("input".to_string(), json!(["reads.fq"]));

        host.add_and_populate_app("kb_uploadmethods/import_fastq", &host.app_version_tag(), &inputs);
        host.hide_overlay();

        let added = host.added_apps();
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].tag, DEFAULT_APP_VERSION_TAG);
        assert_eq!(added[0].inputs["input"], json!(["reads.fq"]));
        assert_eq!(host.overlay_hides(), 1);
    }

    #[test]
    fn memory_dialogs_follow_script_then_accept() {
        let dialogs = MemoryDialogService::default();
        dialogs.answer_next(false);

        assert!(!dialogs.confirm("first?"));
        assert!(dialogs.confirm("second?"));
        dialogs.alert("boom");

        assert_eq!(dialogs.confirms(), vec!["first?".to_string(), "second?".to_string()]);
        assert_eq!(dialogs.alerts(), vec!["boom".to_string()]);
    }
}
