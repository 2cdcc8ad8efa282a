//! Browser-side host-notebook bridge and dialogs.

use narrative_host::{DialogService, NotebookHost};
use serde_json::{json, Map, Value};

/// DOM event asking the host notebook to add a populated app cell.
pub const ADD_APP_EVENT: &str = "narrative:add-app";
/// DOM event asking the host notebook to close the data-panel overlay.
pub const HIDE_OVERLAY_EVENT: &str = "narrative:hide-overlay";

#[derive(Debug, Clone, Default)]
/// Notebook bridge dispatching window events for the host page to handle.
pub struct BrowserNotebookHost {
    version_tag: Option<String>,
}

impl BrowserNotebookHost {
    /// Pins the version tag used for new app cells.
    pub fn with_version_tag(tag: impl Into<String>) -> Self {
        Self {
            version_tag: Some(tag.into()),
        }
    }
}

/// Event detail for [`ADD_APP_EVENT`].
pub(crate) fn add_app_detail(app_id: &str, tag: &str, inputs: &Map<String, Value>) -> Value {
    json!({
        "app_id": app_id,
        "tag": tag,
        "inputs": inputs,
    })
}

impl NotebookHost for BrowserNotebookHost {
    fn app_version_tag(&self) -> String {
        self.version_tag
            .clone()
            .unwrap_or_else(|| narrative_host::DEFAULT_APP_VERSION_TAG.to_string())
    }

    fn add_and_populate_app(&self, app_id: &str, tag: &str, inputs: &Map<String, Value>) {
        let detail = add_app_detail(app_id, tag, inputs).to_string();
        if let Err(err) = crate::bridge::dispatch_host_event(ADD_APP_EVENT, &detail) {
            crate::bridge::console_warn(&format!("add app `{app_id}` failed: {err}"));
        }
    }

    fn hide_overlay(&self) {
        if let Err(err) = crate::bridge::dispatch_host_event(HIDE_OVERLAY_EVENT, "{}") {
            crate::bridge::console_warn(&format!("hide overlay failed: {err}"));
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// `window.confirm`/`window.alert` dialogs.
pub struct BrowserDialogService;

impl DialogService for BrowserDialogService {
    fn confirm(&self, message: &str) -> bool {
        crate::bridge::confirm(message)
    }

    fn alert(&self, message: &str) {
        crate::bridge::alert(message);
    }
}
