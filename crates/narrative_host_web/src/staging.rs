//! HTTP client for the staging service.

use std::rc::Rc;

use narrative_host::{
    ExtendedMetadata, FileEntry, FileMetadata, ServiceError, StagingFuture, StagingService,
    TokenSource,
};
use reqwest::{
    multipart::{Form, Part},
    Client,
};

use crate::http::{authorize, endpoint_url, send_for_text, service_url};

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FILE_FIELD: &str = "uploads";
/// Multipart field carrying the destination directory.
pub const UPLOAD_DEST_FIELD: &str = "destPath";

#[derive(Clone)]
/// Staging-service client authenticating with the caller's session token.
pub struct HttpStagingService {
    client: Client,
    root: String,
    token: Rc<dyn TokenSource>,
}

impl HttpStagingService {
    /// Creates a client for the service rooted at `root`.
    pub fn new(root: impl Into<String>, token: Rc<dyn TokenSource>) -> Self {
        Self {
            client: Client::new(),
            root: root.into(),
            token,
        }
    }

    async fn get_text(&self, operation: &str, path: &str) -> Result<String, ServiceError> {
        let url = service_url(&self.root, operation, path)?;
        send_for_text(authorize(self.client.get(url), self.token.as_ref())).await
    }
}

impl StagingService for HttpStagingService {
    fn list<'a>(
        &'a self,
        path: &'a str,
    ) -> StagingFuture<'a, Result<Vec<FileEntry>, ServiceError>> {
        Box::pin(async move {
            let body = self.get_text("list", path).await?;
            Ok(serde_json::from_str(&body)?)
        })
    }

    fn metadata<'a>(
        &'a self,
        path: &'a str,
    ) -> StagingFuture<'a, Result<FileMetadata, ServiceError>> {
        Box::pin(async move {
            let body = self.get_text("metadata", path).await?;
            Ok(serde_json::from_str(&body)?)
        })
    }

    fn jgi_metadata<'a>(
        &'a self,
        path: &'a str,
    ) -> StagingFuture<'a, Result<ExtendedMetadata, ServiceError>> {
        Box::pin(async move {
            let body = self.get_text("jgi-metadata", path).await?;
            ExtendedMetadata::parse(&body)
        })
    }

    fn decompress<'a>(&'a self, path: &'a str) -> StagingFuture<'a, Result<(), ServiceError>> {
        Box::pin(async move {
            let url = service_url(&self.root, "decompress", path)?;
            send_for_text(authorize(self.client.patch(url), self.token.as_ref())).await?;
            Ok(())
        })
    }

    fn delete<'a>(&'a self, path: &'a str) -> StagingFuture<'a, Result<(), ServiceError>> {
        Box::pin(async move {
            let url = service_url(&self.root, "delete", path)?;
            send_for_text(authorize(self.client.delete(url), self.token.as_ref())).await?;
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
            let url = endpoint_url(&self.root, "upload")?;
            let part = Part::bytes(bytes)
                .file_name(file_name.to_string())
                .mime_str("application/octet-stream")
                .map_err(|err| ServiceError::Transport(err.to_string()))?;
            let form = Form::new()
                .text(UPLOAD_DEST_FIELD, dest_path.to_string())
                .part(UPLOAD_FILE_FIELD, part);
            let request = self.client.post(url).multipart(form);
            send_for_text(authorize(request, self.token.as_ref())).await?;
            Ok(())
        })
    }
}
