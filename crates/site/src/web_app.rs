use std::rc::Rc;

use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use narrative_host::{HostServices, NarrativeConfig, StagingPath};
use narrative_host_web::BrowserNotebookHost;
use narrative_widget_download::DownloadWidget;
use narrative_widget_staging::StagingBrowser;
use narrative_widget_upload::{UploadHandle, UploadWidget};

fn host_services(version_tag: Option<String>) -> Result<HostServices, String> {
    let config =
        NarrativeConfig::builtin().map_err(|err| format!("invalid bundled config: {err}"))?;
    let mut services = narrative_host_web::build_host_services(&config);
    if let Some(tag) = version_tag {
        services.notebook = Rc::new(BrowserNotebookHost::with_version_tag(tag));
    }
    Ok(services)
}

#[component]
pub fn SiteApp() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Data staging" />
        <Meta name="description" content="Staging-area browser and uploader for narrative imports." />

        <Router>
            <main class="site-root">
                <Routes>
                    <Route path="" view=DataStagingPanel />
                    <Route path="/download" view=DownloadRoute />
                </Routes>
            </main>
        </Router>
    }
}

#[component]
pub fn DataStagingPanel() -> impl IntoView {
    let query = use_query_map();
    let tag = query.with_untracked(|map| map.get("tag").cloned());
    let services = match host_services(tag) {
        Ok(services) => services,
        Err(message) => {
            logging::error!("{message}");
            return view! { <div class="alert alert-danger">{message}</div> }.into_view();
        }
    };

    let start = query.with_untracked(|map| {
        map.get("path")
            .cloned()
            .unwrap_or_else(|| "/".to_string())
    });
    let user_id = query.with_untracked(|map| map.get("user").cloned());
    let start_path = StagingPath::new(&start);
    let uploads = UploadHandle::new(start_path.as_str());
    let on_path_change = Callback::new(move |path: StagingPath| uploads.set_path(path.as_str()));

    view! {
        <section class="kb-data-staging">
            <UploadWidget services=services.clone() handle=uploads user_id=user_id />
            <StagingBrowser services=services path=start_path.as_str() on_path_change=on_path_change />
        </section>
    }
    .into_view()
}

#[component]
pub fn DownloadRoute() -> impl IntoView {
    let query = use_query_map();
    let data = query.with_untracked(|map| map.get("data").cloned());
    let name = query.with_untracked(|map| map.get("name").cloned());

    view! {
        <section class="kb-download-route">
            <DownloadWidget data=data name=name />
        </section>
    }
}
