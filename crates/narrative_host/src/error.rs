//! Error type shared by every remote-service contract.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Failure of a remote service call as surfaced to the widgets.
///
/// Every variant renders inline the same way: a status line followed by the raw body text.
pub enum ServiceError {
    /// The service answered with a non-success HTTP status.
    #[error("Error {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Raw response body text.
        body: String,
    },
    /// The request never produced an HTTP response.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The response arrived but its payload could not be decoded.
    #[error("malformed response: {0}")]
    Decode(String),
    /// A JSON-RPC service returned an error object.
    #[error("rpc error: {0}")]
    Rpc(String),
}

impl ServiceError {
    /// Builds an HTTP failure from a status code and body text.
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// HTTP status code, `0` for failures that never reached the server.
    pub fn status(&self) -> u16 {
        match self {
            Self::Http { status, .. } => *status,
            _ => 0,
        }
    }

    /// First line of the inline danger block (`Error <status>`).
    pub fn status_line(&self) -> String {
        format!("Error {}", self.status())
    }

    /// Raw body text shown below the status line.
    pub fn body(&self) -> String {
        match self {
            Self::Http { body, .. } => body.clone(),
            Self::Transport(message) | Self::Decode(message) | Self::Rpc(message) => {
                message.clone()
            }
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_errors_expose_status_and_body() {
        let err = ServiceError::http(404, "no such file");
        assert_eq!(err.status(), 404);
        assert_eq!(err.status_line(), "Error 404");
        assert_eq!(err.body(), "no such file");
        assert_eq!(err.to_string(), "Error 404: no such file");
    }

    #[test]
    fn non_http_errors_report_status_zero() {
        let err = ServiceError::Transport("connection refused".to_string());
        assert_eq!(err.status_line(), "Error 0");
        assert_eq!(err.body(), "connection refused");

        let decode: ServiceError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(decode, ServiceError::Decode(_)));
    }
}
