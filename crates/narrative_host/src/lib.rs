//! Typed service contracts and shared models for the narrative data-staging widgets.
//!
//! This crate is the API boundary between the widgets and the services they talk to: the
//! staging service, the workspace service, the auth service, and the host notebook. Concrete
//! browser adapters live in `narrative_host_web`; the in-memory adapters here back the widget
//! tests.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod auth;
pub mod config;
pub mod error;
pub mod format;
pub mod host;
pub mod notebook;
pub mod staging;
pub mod workspace;

pub use auth::{
    AuthService, Identity, MemoryAuthService, Profile, StaticToken, TokenSource, GLOBUS_PROVIDER,
};
pub use config::{
    ImportAppSpec, ImporterOption, ImporterRegistry, InputArity, NarrativeConfig,
    ServiceEndpoints, WEB_UPLOAD_IMPORTER,
};
pub use error::ServiceError;
pub use format::{line_count_label, long_date, readable_bytes, short_timestamp};
pub use host::HostServices;
pub use notebook::{
    AddedApp, DialogService, MemoryDialogService, MemoryNotebookHost, NotebookHost,
    DEFAULT_APP_VERSION_TAG,
};
pub use staging::path::{normalize_staging_path, Breadcrumb, StagingPath};
pub use staging::service::{MemoryStagingService, StagingCall, StagingFuture, StagingService};
pub use staging::types::{
    sanitize_nan_tokens, ExtendedMetadata, FileEntry, FileMetadata, ARCHIVE_SUFFIXES,
};
pub use workspace::{MemoryWorkspaceService, ObjectInfo, WorkspaceService};
