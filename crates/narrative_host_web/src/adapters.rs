//! Concrete adapter wiring for the browser build.

use std::rc::Rc;

use narrative_host::{HostServices, NarrativeConfig, TokenSource};

use crate::{
    BrowserDialogService, BrowserNotebookHost, CookieTokenSource, HttpAuthService,
    HttpStagingService, HttpWorkspaceService,
};

/// Builds the HTTP-backed service bundle for `config`, reading the token from the session
/// cookie.
pub fn build_host_services(config: &NarrativeConfig) -> HostServices {
    build_host_services_with_token(config, Rc::new(CookieTokenSource))
}

/// Builds the HTTP-backed service bundle for `config` with an explicit token accessor.
pub fn build_host_services_with_token(
    config: &NarrativeConfig,
    token: Rc<dyn TokenSource>,
) -> HostServices {
    let services = &config.services;
    HostServices {
        staging: Rc::new(HttpStagingService::new(
            services.staging_api_url.clone(),
            token.clone(),
        )),
        workspace: Rc::new(HttpWorkspaceService::new(
            services.workspace_url.clone(),
            token.clone(),
        )),
        auth: Rc::new(HttpAuthService::new(services.auth_url.clone())),
        token,
        notebook: Rc::new(BrowserNotebookHost::default()),
        dialogs: Rc::new(BrowserDialogService),
        importers: Rc::new(config.uploaders.clone()),
        endpoints: Rc::new(services.clone()),
    }
}
