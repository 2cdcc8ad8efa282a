//! Headless staging-browser state machine.
//!
//! The controller owns every piece of browser state and drives the injected services. Views
//! subscribe through [`StagingBrowserController::set_on_change`] and read snapshots back; tests
//! drive the same methods with in-memory services.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use leptos::logging;
use narrative_host::{
    AuthService, DialogService, FileEntry, HostServices, ImporterOption, NotebookHost, ServiceError,
    StagingPath, StagingService, TokenSource, WorkspaceService, WEB_UPLOAD_IMPORTER,
};

use crate::details::{DetailState, FileDetails, ImportedAs};
use crate::import::build_import_inputs;
use crate::listing::{visible_rows, ListingContext, SortColumn, SortState};

#[derive(Debug, Clone, PartialEq, Default)]
/// Result of the current listing.
pub enum ListingView {
    /// Listing in flight.
    #[default]
    Loading,
    /// Entries of the current directory, in service order.
    Ready(Vec<FileEntry>),
    /// Listing failed; rendered as a danger block in place of the table.
    Failed(ServiceError),
}

#[derive(Default)]
struct BrowserState {
    context: ListingContext,
    listing: ListingView,
    details: HashMap<String, DetailState>,
    expanded: BTreeSet<String>,
    delete_errors: HashMap<String, ServiceError>,
    globus_name: Option<String>,
    sort: SortState,
    search: String,
}

type PathHook = Rc<dyn Fn(&StagingPath)>;
type ChangeHook = Rc<dyn Fn()>;

struct ControllerInner {
    services: HostServices,
    state: RefCell<BrowserState>,
    on_change: RefCell<Option<ChangeHook>>,
    update_path: RefCell<Option<PathHook>>,
}

#[derive(Clone)]
/// Shared handle to one staging browser.
pub struct StagingBrowserController {
    inner: Rc<ControllerInner>,
}

impl StagingBrowserController {
    /// Creates a browser showing `path`; nothing is fetched until [`Self::init`].
    pub fn new(services: HostServices, path: StagingPath) -> Self {
        Self {
            inner: Rc::new(ControllerInner {
                services,
                state: RefCell::new(BrowserState {
                    context: ListingContext::new(path),
                    ..BrowserState::default()
                }),
                on_change: RefCell::new(None),
                update_path: RefCell::new(None),
            }),
        }
    }

    /// Registers the state-change callback.
    pub fn set_on_change(&self, hook: impl Fn() + 'static) {
        *self.inner.on_change.borrow_mut() = Some(Rc::new(hook));
    }

    /// Registers a hook told about every navigation (used to keep an upload widget in sync).
    pub fn set_update_path(&self, hook: impl Fn(&StagingPath) + 'static) {
        *self.inner.update_path.borrow_mut() = Some(Rc::new(hook));
    }

    fn notify(&self) {
        let hook = self.inner.on_change.borrow().clone();
        if let Some(hook) = hook {
            hook();
        }
    }

    fn services(&self) -> &HostServices {
        &self.inner.services
    }

    /// Current listing context.
    pub fn context(&self) -> ListingContext {
        self.inner.state.borrow().context.clone()
    }

    /// Current directory.
    pub fn path(&self) -> StagingPath {
        self.inner.state.borrow().context.path().clone()
    }

    /// Current listing result.
    pub fn listing(&self) -> ListingView {
        self.inner.state.borrow().listing.clone()
    }

    /// Listed entries filtered by the search text and in the active sort order.
    pub fn visible_rows(&self) -> Vec<FileEntry> {
        let state = self.inner.state.borrow();
        match &state.listing {
            ListingView::Ready(entries) => visible_rows(entries, state.sort, &state.search),
            _ => Vec::new(),
        }
    }

    /// Active sort.
    pub fn sort(&self) -> SortState {
        self.inner.state.borrow().sort
    }

    /// Applies a header click.
    pub fn toggle_sort(&self, column: SortColumn) {
        self.inner.state.borrow_mut().sort.toggle(column);
        self.notify();
    }

    /// Current search text.
    pub fn search(&self) -> String {
        self.inner.state.borrow().search.clone()
    }

    /// Replaces the search text.
    pub fn set_search(&self, search: impl Into<String>) {
        self.inner.state.borrow_mut().search = search.into();
        self.notify();
    }

    /// Detail state of `name` in the current listing.
    pub fn detail_state(&self, name: &str) -> DetailState {
        self.inner
            .state
            .borrow()
            .details
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    /// Whether the detail row of `name` is open.
    pub fn is_expanded(&self, name: &str) -> bool {
        self.inner.state.borrow().expanded.contains(name)
    }

    /// Last delete failure for `name` in the current listing.
    pub fn delete_error(&self, name: &str) -> Option<ServiceError> {
        self.inner.state.borrow().delete_errors.get(name).cloned()
    }

    /// Importer types offered in each row's format select.
    pub fn importer_options(&self) -> Vec<ImporterOption> {
        self.services().importers.dropdown_order.clone()
    }

    /// Globus user name, once identity resolution found a Globus identity.
    pub fn globus_name(&self) -> Option<String> {
        self.inner.state.borrow().globus_name.clone()
    }

    /// Globus transfer link for the signed-in user, if available.
    pub fn globus_link(&self) -> Option<String> {
        self.globus_name().map(|name| {
            format!("{}{}", self.services().endpoints.globus_transfer_url, name)
        })
    }

    /// Resolves identity and lists the starting directory concurrently.
    pub async fn init(&self) {
        futures::future::join(self.resolve_identity(), self.list()).await;
    }

    /// Looks up the caller's linked identities; failures only hide the Globus link.
    pub async fn resolve_identity(&self) {
        let services = self.services();
        let Some(token) = services.token.token() else {
            logging::log!("no session token; skipping identity lookup");
            return;
        };
        match services.auth.current_profile(&token).await {
            Ok(profile) => {
                if let Some(name) = profile.globus_name() {
                    self.inner.state.borrow_mut().globus_name = Some(name.to_string());
                    self.notify();
                }
            }
            Err(err) => logging::log!("identity lookup failed: {err}"),
        }
    }

    /// Lists the current directory, replacing the view and dropping every cached detail.
    pub async fn list(&self) {
        let context = {
            let mut state = self.inner.state.borrow_mut();
            let next = state.context.next(state.context.path().clone());
            state.context = next.clone();
            state.listing = ListingView::Loading;
            state.details.clear();
            state.expanded.clear();
            state.delete_errors.clear();
            next
        };
        self.notify();

        let result = self.services().staging.list(context.subpath()).await;
        if !self.is_current(&context) {
            return;
        }
        let listing = match result {
            Ok(entries) => ListingView::Ready(entries),
            Err(err) => {
                logging::warn!("listing `{}` failed: {err}", context.path());
                ListingView::Failed(err)
            }
        };
        self.inner.state.borrow_mut().listing = listing;
        self.notify();
    }

    /// Re-lists the current directory.
    pub async fn refresh(&self) {
        self.list().await;
    }

    fn is_current(&self, context: &ListingContext) -> bool {
        self.inner.state.borrow().context.generation() == context.generation()
    }

    /// Moves to `path` without listing it, e.g. when the owner of the path changes it.
    pub fn set_path(&self, path: StagingPath) {
        let mut state = self.inner.state.borrow_mut();
        let next = state.context.next(path);
        state.context = next;
    }

    /// Navigates to `path`, tells the path hook, and lists the new directory.
    pub async fn navigate_to(&self, path: StagingPath) {
        self.set_path(path.clone());
        let hook = self.inner.update_path.borrow().clone();
        if let Some(hook) = hook {
            hook(&path);
        }
        self.list().await;
    }

    /// Enters a child folder of the current directory.
    pub async fn navigate_into(&self, folder: &str) {
        let path = self.path().child(folder);
        self.navigate_to(path).await;
    }

    fn entry(&self, name: &str) -> Option<FileEntry> {
        let state = self.inner.state.borrow();
        match &state.listing {
            ListingView::Ready(entries) => entries.iter().find(|e| e.name == name).cloned(),
            _ => None,
        }
    }

    /// Opens or closes the detail row of a file; the first opening fetches its details.
    ///
    /// Opening a row clears the error of an earlier failed delete.
    ///
    /// Folders and names outside the current listing are ignored.
    pub async fn toggle_row(&self, name: &str) {
        match self.entry(name) {
            Some(entry) if !entry.is_folder => {}
            _ => return,
        }

        let opened = {
            let mut state = self.inner.state.borrow_mut();
            if state.expanded.remove(name) {
                false
            } else {
                state.expanded.insert(name.to_string());
                state.delete_errors.remove(name);
                true
            }
        };
        self.notify();

        if opened && self.detail_state(name).needs_fetch() {
            self.fetch_details(name).await;
        }
    }

    fn set_detail(&self, context: &ListingContext, name: &str, detail: DetailState) -> bool {
        if !self.is_current(context) {
            return false;
        }
        self.inner
            .state
            .borrow_mut()
            .details
            .insert(name.to_string(), detail);
        self.notify();
        true
    }

    async fn fetch_details(&self, name: &str) {
        let context = self.context();
        let services = self.services();
        let file_path = context.path().file_path(name);
        self.set_detail(&context, name, DetailState::Loading);

        let metadata = match services.staging.metadata(&file_path).await {
            Ok(metadata) => metadata,
            Err(err) => {
                logging::warn!("metadata for `{file_path}` failed: {err}");
                self.set_detail(&context, name, DetailState::Failed(err));
                return;
            }
        };
        if !self.is_current(&context) {
            return;
        }

        let imported_as = match &metadata.upa {
            Some(upa) => {
                let resolution = match services.workspace.get_object_info(upa).await {
                    Ok(info) => Ok(info.name),
                    Err(err) => {
                        logging::warn!("object lookup for `{upa}` failed: {err}");
                        Err(err.body())
                    }
                };
                Some(ImportedAs {
                    upa: upa.clone(),
                    resolution,
                })
            }
            None => None,
        };
        if !self.is_current(&context) {
            return;
        }

        let extended = match services.staging.jgi_metadata(&file_path).await {
            Ok(extended) => Some(extended),
            Err(err) => {
                logging::log!("no JGI metadata for `{file_path}`: {err}");
                None
            }
        };

        self.set_detail(
            &context,
            name,
            DetailState::Fetched(FileDetails {
                metadata,
                imported_as,
                extended,
            }),
        );
    }

    /// Unpacks an archive in the current directory, alerting on failure, then re-lists.
    pub async fn decompress(&self, name: &str) {
        let services = self.services();
        let file_path = self.path().file_path(name);
        if let Err(err) = services.staging.decompress(&file_path).await {
            logging::error!("decompress of `{file_path}` failed: {err}");
            services.dialogs.alert(&err.body());
        }
        self.list().await;
    }

    /// Deletes a file after confirmation and re-lists; failures stay inline in the detail row.
    pub async fn delete(&self, name: &str) {
        let services = self.services();
        if !services
            .dialogs
            .confirm(&format!("Really delete file {name}?"))
        {
            return;
        }

        let context = self.context();
        let file_path = context.path().file_path(name);
        match services.staging.delete(&file_path).await {
            Ok(()) => self.list().await,
            Err(err) => {
                logging::warn!("delete of `{file_path}` failed: {err}");
                if self.is_current(&context) {
                    self.inner
                        .state
                        .borrow_mut()
                        .delete_errors
                        .insert(name.to_string(), err);
                    self.notify();
                }
            }
        }
    }

    fn launch_importer(&self, importer_type: &str, file_name: Option<&str>) -> bool {
        let services = self.services();
        let Some(spec) = services.importers.spec(importer_type) else {
            logging::warn!("no import app registered for `{importer_type}`");
            return false;
        };
        let inputs = build_import_inputs(spec, &self.path(), file_name);
        let tag = services.notebook.app_version_tag();
        services
            .notebook
            .add_and_populate_app(&spec.app_id, &tag, &inputs);
        services.notebook.hide_overlay();
        true
    }

    /// Launches the import app for `importer_type` bound to `name`, then re-lists.
    ///
    /// Unknown importer types are logged and ignored.
    pub async fn import(&self, name: &str, importer_type: &str) {
        if self.launch_importer(importer_type, Some(name)) {
            self.list().await;
        }
    }

    /// Launches the web-upload importer with no file bound.
    pub fn launch_web_upload(&self) -> bool {
        self.launch_importer(WEB_UPLOAD_IMPORTER, None)
    }
}
