//! Auth-service client and cookie-backed session token.

use narrative_host::{AuthService, Profile, ServiceError, StagingFuture, TokenSource};
use reqwest::Client;

use crate::http::send_for_text;

/// Cookie holding the session token.
pub const SESSION_COOKIE: &str = "kbase_session";

#[derive(Clone)]
/// Auth client resolving the signed-in user's profile.
pub struct HttpAuthService {
    client: Client,
    root: String,
}

impl HttpAuthService {
    /// Creates a client for the auth service rooted at `root`.
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            root: root.into(),
        }
    }

    fn me_url(&self) -> String {
        format!("{}/api/V2/me", self.root.trim_end_matches('/'))
    }
}

impl AuthService for HttpAuthService {
    fn current_profile<'a>(
        &'a self,
        token: &'a str,
    ) -> StagingFuture<'a, Result<Profile, ServiceError>> {
        Box::pin(async move {
            let request = self.client.get(self.me_url()).header("Authorization", token);
            let body = send_for_text(request).await?;
            Ok(serde_json::from_str(&body)?)
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Reads the session token from the browser's session cookie on every call.
pub struct CookieTokenSource;

impl TokenSource for CookieTokenSource {
    fn token(&self) -> Option<String> {
        crate::bridge::cookie_value(SESSION_COOKIE)
    }
}

/// Extracts one cookie value from a `document.cookie` string.
pub(crate) fn find_cookie(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn me_url_strips_trailing_slash() {
        assert_eq!(
            HttpAuthService::new("https://example.org/services/auth/").me_url(),
            "https://example.org/services/auth/api/V2/me"
        );
    }

    #[test]
    fn find_cookie_matches_exact_names() {
        let cookies = "theme=dark; kbase_session=TOKEN123; kbase_session_backup=OTHER";
        assert_eq!(
            find_cookie(cookies, SESSION_COOKIE).as_deref(),
            Some("TOKEN123")
        );
        assert_eq!(find_cookie("kbase_session=", SESSION_COOKIE), None);
        assert_eq!(find_cookie("", SESSION_COOKIE), None);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn cookie_token_source_is_empty_off_browser() {
        assert_eq!(CookieTokenSource.token(), None);
    }
}
