//! Browser implementations of the [`narrative_host`] service contracts.
//!
//! HTTP clients (built on `reqwest`, which rides on `fetch` in the browser) talk to the staging,
//! workspace, and auth services. DOM access (anchor downloads, dialogs, file reads, cookies, host
//! events) goes through `bridge`, which has an inert fallback off wasm32.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod adapters;
pub mod auth;
mod bridge;
mod http;
pub mod notebook;
pub mod staging;
pub mod workspace;

pub use adapters::{build_host_services, build_host_services_with_token};
pub use auth::{CookieTokenSource, HttpAuthService, SESSION_COOKIE};
pub use bridge::{read_file_bytes, trigger_download};
pub use notebook::{BrowserDialogService, BrowserNotebookHost, ADD_APP_EVENT, HIDE_OVERLAY_EVENT};
pub use staging::{HttpStagingService, UPLOAD_DEST_FIELD, UPLOAD_FILE_FIELD};
pub use workspace::HttpWorkspaceService;
