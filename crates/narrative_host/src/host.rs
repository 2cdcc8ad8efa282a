//! Service bundle injected into the widgets.

use std::rc::Rc;

use crate::{
    AuthService, DialogService, ImporterRegistry, NotebookHost, ServiceEndpoints,
    StagingService, TokenSource, WorkspaceService,
};

/// Environment-specific services and configuration handed to every widget.
///
/// All adapter selection happens before this bundle is built, which keeps the widget crates
/// free of browser/HTTP adapter details.
#[derive(Clone)]
pub struct HostServices {
    /// Staging service client.
    pub staging: Rc<dyn StagingService>,
    /// Workspace service client.
    pub workspace: Rc<dyn WorkspaceService>,
    /// Auth service client.
    pub auth: Rc<dyn AuthService>,
    /// Session-token accessor.
    pub token: Rc<dyn TokenSource>,
    /// Host notebook bridge.
    pub notebook: Rc<dyn NotebookHost>,
    /// Blocking dialogs.
    pub dialogs: Rc<dyn DialogService>,
    /// Importer registry.
    pub importers: Rc<ImporterRegistry>,
    /// Service endpoints.
    pub endpoints: Rc<ServiceEndpoints>,
}
