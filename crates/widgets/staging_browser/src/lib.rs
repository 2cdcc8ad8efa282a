//! Staging-area browser: lists the signed-in user's staged files and launches import apps.
//!
//! All behavior lives in the headless [`StagingBrowserController`]; the Leptos components in
//! `view` only render its snapshots and forward clicks.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod controller;
pub mod details;
pub mod import;
pub mod listing;
mod view;

pub use controller::{ListingView, StagingBrowserController};
pub use details::{DetailState, DetailTab, FileDetails, ImportedAs, NOT_PROVIDED};
pub use import::{build_import_inputs, output_object_name};
pub use listing::{visible_rows, ListingContext, SortColumn, SortDirection, SortState};
pub use view::StagingBrowser;
