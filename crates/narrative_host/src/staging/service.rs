//! Staging-service contract and in-process adapters.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

use super::types::{ExtendedMetadata, FileEntry, FileMetadata};
use crate::ServiceError;

/// Object-safe boxed future used by [`StagingService`] async methods.
pub type StagingFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Remote file-staging service scoped to the signed-in user's staging root.
///
/// Every `path` is server-relative (no leading slash, empty for the root).
pub trait StagingService {
    /// Lists a directory.
    fn list<'a>(&'a self, path: &'a str)
        -> StagingFuture<'a, Result<Vec<FileEntry>, ServiceError>>;

    /// Fetches computed metadata for one file.
    fn metadata<'a>(&'a self, path: &'a str)
        -> StagingFuture<'a, Result<FileMetadata, ServiceError>>;

    /// Fetches the JGI sidecar metadata for one file; fails when no sidecar exists.
    fn jgi_metadata<'a>(
        &'a self,
        path: &'a str,
    ) -> StagingFuture<'a, Result<ExtendedMetadata, ServiceError>>;

    /// Asks the service to unpack an archive in place.
    fn decompress<'a>(&'a self, path: &'a str) -> StagingFuture<'a, Result<(), ServiceError>>;

    /// Deletes a file.
    fn delete<'a>(&'a self, path: &'a str) -> StagingFuture<'a, Result<(), ServiceError>>;

    /// Uploads one file into `dest_path`.
    fn upload<'a>(
        &'a self,
        dest_path: &'a str,
        file_name: &'a str,
        bytes: Vec<u8>,
    ) -> StagingFuture<'a, Result<(), ServiceError>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One request observed by [`MemoryStagingService`].
pub enum StagingCall {
    /// `list(path)`.
    List(String),
    /// `metadata(path)`.
    Metadata(String),
    /// `jgi_metadata(path)`.
    JgiMetadata(String),
    /// `decompress(path)`.
    Decompress(String),
    /// `delete(path)`.
    Delete(String),
    /// `upload(dest_path, file_name, bytes)`.
    Upload {
        /// Destination directory.
        dest_path: String,
        /// Uploaded file name.
        file_name: String,
        /// Payload length in bytes.
        size: usize,
    },
}

#[derive(Debug, Default)]
struct MemoryStagingState {
    directories: HashMap<String, Result<Vec<FileEntry>, ServiceError>>,
    metadata: HashMap<String, Result<FileMetadata, ServiceError>>,
    extended: HashMap<String, String>,
    failures: HashMap<(&'static str, String), ServiceError>,
    calls: Vec<StagingCall>,
}

#[derive(Debug, Clone, Default)]
/// In-memory staging adapter that records every request.
///
/// Missing directories, metadata, and sidecars answer with HTTP 404 like the real service.
pub struct MemoryStagingService {
    inner: Rc<RefCell<MemoryStagingState>>,
}

impl MemoryStagingService {
    /// Registers the listing for a directory.
    pub fn with_listing(self, path: &str, entries: Vec<FileEntry>) -> Self {
        self.inner
            .borrow_mut()
            .directories
            .insert(path.to_string(), Ok(entries));
        self
    }

    /// Makes `list(path)` fail.
    pub fn with_listing_error(self, path: &str, err: ServiceError) -> Self {
        self.inner
            .borrow_mut()
            .directories
            .insert(path.to_string(), Err(err));
        self
    }

    /// Registers metadata for a file path.
    pub fn with_metadata(self, path: &str, metadata: FileMetadata) -> Self {
        self.inner
            .borrow_mut()
            .metadata
            .insert(path.to_string(), Ok(metadata));
        self
    }

    /// Makes `metadata(path)` fail.
    pub fn with_metadata_error(self, path: &str, err: ServiceError) -> Self {
        self.inner
            .borrow_mut()
            .metadata
            .insert(path.to_string(), Err(err));
        self
    }

    /// Registers a raw JGI sidecar payload for a file path.
    pub fn with_jgi_metadata(self, path: &str, raw: &str) -> Self {
        self.inner
            .borrow_mut()
            .extended
            .insert(path.to_string(), raw.to_string());
        self
    }

    /// Makes `decompress(path)` fail.
    pub fn with_decompress_error(self, path: &str, err: ServiceError) -> Self {
        self.inner
            .borrow_mut()
            .failures
            .insert(("decompress", path.to_string()), err);
        self
    }

    /// Makes `delete(path)` fail.
    pub fn with_delete_error(self, path: &str, err: ServiceError) -> Self {
        self.inner
            .borrow_mut()
            .failures
            .insert(("delete", path.to_string()), err);
        self
    }

    /// Makes uploads of `file_name` fail.
    pub fn with_upload_error(self, file_name: &str, err: ServiceError) -> Self {
        self.inner
            .borrow_mut()
            .failures
            .insert(("upload", file_name.to_string()), err);
        self
    }

    /// Requests observed so far, oldest first.
    pub fn calls(&self) -> Vec<StagingCall> {
        self.inner.borrow().calls.clone()
    }

    /// Forgets recorded requests.
    pub fn clear_calls(&self) {
        self.inner.borrow_mut().calls.clear();
    }

    fn record(&self, call: StagingCall) {
        self.inner.borrow_mut().calls.push(call);
    }

    fn failure(&self, op: &'static str, key: &str) -> Option<ServiceError> {
        self.inner
            .borrow()
            .failures
            .get(&(op, key.to_string()))
            .cloned()
    }

    fn not_found(path: &str) -> ServiceError {
        ServiceError::http(404, format!("could not find {path}"))
    }

    fn split_parent(path: &str) -> (&str, &str) {
        match path.rfind('/') {
            Some(idx) => (&path[..idx], &path[idx + 1..]),
            None => ("", path),
        }
    }
}

impl StagingService for MemoryStagingService {
    fn list<'a>(
        &'a self,
        path: &'a str,
    ) -> StagingFuture<'a, Result<Vec<FileEntry>, ServiceError>> {
        Box::pin(async move {
            self.record(StagingCall::List(path.to_string()));
            self.inner
                .borrow()
                .directories
                .get(path)
                .cloned()
                .unwrap_or_else(|| Err(Self::not_found(path)))
        })
    }

    fn metadata<'a>(
        &'a self,
        path: &'a str,
    ) -> StagingFuture<'a, Result<FileMetadata, ServiceError>> {
        Box::pin(async move {
            self.record(StagingCall::Metadata(path.to_string()));
            self.inner
                .borrow()
                .metadata
                .get(path)
                .cloned()
                .unwrap_or_else(|| Err(Self::not_found(path)))
        })
    }

    fn jgi_metadata<'a>(
        &'a self,
        path: &'a str,
    ) -> StagingFuture<'a, Result<ExtendedMetadata, ServiceError>> {
        Box::pin(async move {
            self.record(StagingCall::JgiMetadata(path.to_string()));
            let raw = self.inner.borrow().extended.get(path).cloned();
            match raw {
                Some(raw) => ExtendedMetadata::parse(&raw),
                None => Err(Self::not_found(path)),
            }
        })
    }

    fn decompress<'a>(&'a self, path: &'a str) -> StagingFuture<'a, Result<(), ServiceError>> {
        Box::pin(async move {
            self.record(StagingCall::Decompress(path.to_string()));
            match self.failure("decompress", path) {
                Some(err) => Err(err),
                None => Ok(()),
            }
        })
    }

    fn delete<'a>(&'a self, path: &'a str) -> StagingFuture<'a, Result<(), ServiceError>> {
        Box::pin(async move {
            self.record(StagingCall::Delete(path.to_string()));
            if let Some(err) = self.failure("delete", path) {
                return Err(err);
            }
            let (parent, name) = Self::split_parent(path);
            let mut state = self.inner.borrow_mut();
            state.metadata.remove(path);
            if let Some(Ok(entries)) = state.directories.get_mut(parent) {
                entries.retain(|entry| entry.name != name);
            }
            Ok(())
        })
    }

    fn upload<'a>(
        &'a self,
        dest_path: &'a str,
        file_name: &'a str,
        bytes: Vec<u8>,
    ) -> StagingFuture<'a, Result<(), ServiceError>> {
        Box::pin(async move {
            self.record(StagingCall::Upload {
                dest_path: dest_path.to_string(),
                file_name: file_name.to_string(),
                size: bytes.len(),
            });
            match self.failure("upload", file_name) {
                Some(err) => Err(err),
                None => Ok(()),
            }
        })
    }
}
