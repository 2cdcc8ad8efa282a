//! Download widget: saves an in-memory text payload as a file without touching the network.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod encoding;

use leptos::*;
use thiserror::Error;

pub use encoding::{data_uri, decode_payload, encode_payload, payload_bytes, DATA_URI_PREFIX};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Download widget failures.
pub enum DownloadError {
    /// Content or file name was not supplied.
    #[error("Error: file content is empty.")]
    MissingContent,
    /// Payload is not valid base64.
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(String),
    /// The browser refused to start the download.
    #[error("download failed: {0}")]
    Trigger(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Validated download: payload plus the file name to save it under.
pub struct DownloadRequest {
    data: String,
    name: String,
}

impl DownloadRequest {
    /// Validates widget options; both values must be present.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::MissingContent`] when either option is absent.
    pub fn from_options(data: Option<String>, name: Option<String>) -> Result<Self, DownloadError> {
        match (data, name) {
            (Some(data), Some(name)) => Ok(Self { data, name }),
            _ => Err(DownloadError::MissingContent),
        }
    }

    /// File name the browser saves the payload as.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `data:` link carrying the encoded payload.
    pub fn href(&self) -> String {
        data_uri(&self.data)
    }

    /// Starts the browser download through a temporary anchor.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Trigger`] when the DOM is unavailable.
    pub fn trigger(&self) -> Result<(), DownloadError> {
        narrative_host_web::trigger_download(&self.name, &self.href())
            .map_err(DownloadError::Trigger)
    }
}

#[component]
/// Button that saves `data` as `name`; renders an error line when either is missing.
pub fn DownloadWidget(
    /// Text payload to save.
    #[prop(optional_no_strip, into)]
    data: Option<String>,
    /// File name to save under.
    #[prop(optional_no_strip, into)]
    name: Option<String>,
) -> impl IntoView {
    let body = match DownloadRequest::from_options(data, name) {
        Ok(request) => {
            let label = request.name().to_string();
            view! {
                <button
                    type="button"
                    class="btn btn-link"
                    on:click=move |_| {
                        if let Err(err) = request.trigger() {
                            logging::warn!("download of `{}` failed: {err}", request.name());
                        }
                    }
                >
                    {label}
                </button>
            }
            .into_view()
        }
        Err(err) => view! { <p>{err.to_string()}</p> }.into_view(),
    };

    view! { <div class="kb-download-file">{body}</div> }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_options_render_the_empty_content_error() {
        for (data, name) in [
            (None, Some("a.txt".to_string())),
            (Some("payload".to_string()), None),
            (None, None),
        ] {
            let err = DownloadRequest::from_options(data, name).expect_err("incomplete options");
            assert_eq!(err.to_string(), "Error: file content is empty.");
        }
    }

    #[test]
    fn request_builds_octet_stream_link() {
        let request =
            DownloadRequest::from_options(Some("naïve → 東京".into()), Some("notes.txt".into()))
                .expect("request");
        assert_eq!(request.name(), "notes.txt");

        let href = request.href();
        let payload = href
            .strip_prefix(DATA_URI_PREFIX)
            .expect("octet-stream data uri");
        assert_eq!(decode_payload(payload).expect("decode"), "naïve → 東京");
    }

    #[test]
    fn empty_strings_are_still_downloadable() {
        let request = DownloadRequest::from_options(Some(String::new()), Some("empty.txt".into()))
            .expect("request");
        assert_eq!(request.href(), DATA_URI_PREFIX);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn trigger_reports_missing_dom() {
        let request = DownloadRequest::from_options(Some("x".into()), Some("x.txt".into()))
            .expect("request");
        assert!(matches!(request.trigger(), Err(DownloadError::Trigger(_))));
    }
}
