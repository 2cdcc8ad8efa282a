//! Shared request plumbing for the HTTP service clients.

use narrative_host::{ServiceError, TokenSource};
use reqwest::{RequestBuilder, Url};

/// Builds `<root>/<operation>/<path segments...>` with every segment percent-encoded.
///
/// The staging root keeps its trailing slash (`<root>/list/`).
pub(crate) fn service_url(root: &str, operation: &str, path: &str) -> Result<Url, ServiceError> {
    let mut segments: Vec<&str> = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();
    if segments.is_empty() {
        segments.push("");
    }
    join_segments(root, operation, &segments)
}

/// Builds `<root>/<operation>` for endpoints that take no path.
pub(crate) fn endpoint_url(root: &str, operation: &str) -> Result<Url, ServiceError> {
    join_segments(root, operation, &[])
}

fn join_segments(root: &str, operation: &str, tail: &[&str]) -> Result<Url, ServiceError> {
    let mut url = Url::parse(root)
        .map_err(|err| ServiceError::Transport(format!("invalid service url `{root}`: {err}")))?;
    {
        let mut segments = url.path_segments_mut().map_err(|_| {
            ServiceError::Transport(format!("service url `{root}` cannot be a base"))
        })?;
        segments.pop_if_empty().push(operation).extend(tail);
    }
    Ok(url)
}

/// Attaches the session token as the `Authorization` header when signed in.
pub(crate) fn authorize(request: RequestBuilder, token: &dyn TokenSource) -> RequestBuilder {
    match token.token() {
        Some(token) => request.header("Authorization", token),
        None => request,
    }
}

/// Sends a request and returns the body text of a 2xx response.
///
/// # Errors
///
/// Non-2xx answers become [`ServiceError::Http`] carrying the raw body; failures before a
/// response arrives become [`ServiceError::Transport`].
pub(crate) async fn send_for_text(request: RequestBuilder) -> Result<String, ServiceError> {
    let response = request
        .send()
        .await
        .map_err(|err| ServiceError::Transport(err.to_string()))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|err| ServiceError::Transport(err.to_string()))?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(ServiceError::http(status.as_u16(), body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_url_encodes_each_segment() {
        let url = service_url("https://example.org/services/staging_service", "list", "")
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://example.org/services/staging_service/list/"
        );

        let url = service_url("https://example.org/services/staging_service", "delete", "/")
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://example.org/services/staging_service/delete/"
        );

        let url = service_url(
            "https://example.org/services/staging_service/",
            "metadata",
            "proj/my reads#1.fq",
        )
        .expect("url");
        assert_eq!(
            url.as_str(),
            "https://example.org/services/staging_service/metadata/proj/my%20reads%231.fq"
        );
    }

    #[test]
    fn endpoint_url_has_no_trailing_slash() {
        let url =
            endpoint_url("https://example.org/services/staging_service/", "upload").expect("url");
        assert_eq!(
            url.as_str(),
            "https://example.org/services/staging_service/upload"
        );
    }

    #[test]
    fn service_url_rejects_relative_roots() {
        let err = service_url("staging_service", "list", "").expect_err("relative root");
        assert!(matches!(err, ServiceError::Transport(_)));
    }
}
