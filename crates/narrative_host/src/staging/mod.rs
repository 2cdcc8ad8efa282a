//! Staging-area contracts: wire models, path handling, and the service trait.

pub mod path;
pub mod service;
pub mod types;
