//! Auth service contract and session-token access.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::{staging::service::StagingFuture, ServiceError};

/// Identity provider whose accounts get a direct transfer link.
pub const GLOBUS_PROVIDER: &str = "Globus";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Linked login identity.
pub struct Identity {
    /// Provider name (`Globus`, `Google`, ...).
    pub provider: String,
    /// User name at the provider.
    #[serde(default)]
    pub provusername: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Profile of the signed-in user.
pub struct Profile {
    /// Account user name.
    pub user: String,
    /// Linked identities.
    #[serde(default)]
    pub idents: Vec<Identity>,
}

impl Profile {
    /// User name to append to the Globus transfer link, when a Globus identity is linked.
    pub fn globus_name(&self) -> Option<&str> {
        self.idents
            .iter()
            .any(|ident| ident.provider == GLOBUS_PROVIDER)
            .then_some(self.user.as_str())
    }
}

/// Auth service lookups.
pub trait AuthService {
    /// Fetches the profile for `token`.
    fn current_profile<'a>(
        &'a self,
        token: &'a str,
    ) -> StagingFuture<'a, Result<Profile, ServiceError>>;
}

/// Accessor for the caller's session token.
pub trait TokenSource {
    /// Current token, if signed in.
    fn token(&self) -> Option<String>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Fixed token value.
pub struct StaticToken(pub Option<String>);

impl TokenSource for StaticToken {
    fn token(&self) -> Option<String> {
        self.0.clone()
    }
}

impl<T: TokenSource + ?Sized> TokenSource for Rc<T> {
    fn token(&self) -> Option<String> {
        (**self).token()
    }
}

#[derive(Debug, Clone, Default)]
/// Auth adapter answering with a fixed profile or error.
pub struct MemoryAuthService {
    profile: Option<Result<Profile, ServiceError>>,
}

impl MemoryAuthService {
    /// Answers every lookup with `profile`.
    pub fn with_profile(profile: Profile) -> Self {
        Self {
            profile: Some(Ok(profile)),
        }
    }

    /// Fails every lookup with `err`.
    pub fn with_error(err: ServiceError) -> Self {
        Self {
            profile: Some(Err(err)),
        }
    }
}

impl AuthService for MemoryAuthService {
    fn current_profile<'a>(
        &'a self,
        _token: &'a str,
    ) -> StagingFuture<'a, Result<Profile, ServiceError>> {
        Box::pin(async move {
            self.profile
                .clone()
                .unwrap_or_else(|| Err(ServiceError::http(401, "not signed in")))
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn globus_name_requires_a_globus_identity() {
        let profile: Profile = serde_json::from_value(json!({
            "user": "jdoe",
            "idents": [{"provider": "Google", "provusername": "jdoe@example.com"}]
        }))
        .expect("decode");
        assert_eq!(profile.globus_name(), None);

        let profile: Profile = serde_json::from_value(json!({
            "user": "jdoe",
            "idents": [
                {"provider": "Google"},
                {"provider": "Globus", "provusername": "jdoe@globusid.org"}
            ]
        }))
        .expect("decode");
        assert_eq!(profile.globus_name(), Some("jdoe"));
    }

    #[test]
    fn static_token_reports_its_value() {
        assert_eq!(StaticToken(Some("abc".into())).token().as_deref(), Some("abc"));
        assert_eq!(Rc::new(StaticToken::default()).token(), None);
    }
}
