//! Leptos rendering of the staging browser.

use std::future::Future;

use leptos::*;
use narrative_host::{
    readable_bytes, short_timestamp, FileEntry, HostServices, ServiceError, StagingPath,
};

use crate::controller::{ListingView, StagingBrowserController};
use crate::details::{DetailState, DetailTab, FileDetails};
use crate::listing::{SortColumn, SortDirection};

type Ctrl = StoredValue<StagingBrowserController>;

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Loading,
    Ready(u64),
    Failed(ServiceError),
}

fn spawn_action<F, Fut>(ctrl: Ctrl, action: F)
where
    F: FnOnce(StagingBrowserController) -> Fut,
    Fut: Future<Output = ()> + 'static,
{
    spawn_local(action(ctrl.get_value()));
}

#[component]
/// Staging-area file browser rooted at the signed-in user's staging directory.
pub fn StagingBrowser(
    /// Injected services.
    services: HostServices,
    /// Starting directory.
    #[prop(into)]
    path: String,
    /// Called on every navigation with the new directory.
    #[prop(optional)]
    on_path_change: Option<Callback<StagingPath>>,
) -> impl IntoView {
    let controller = StagingBrowserController::new(services, StagingPath::new(&path));
    let revision = create_rw_signal(0_u64);
    controller.set_on_change(move || {
        let _ = revision.try_update(|rev| *rev += 1);
    });
    if let Some(callback) = on_path_change {
        controller.set_update_path(move |path| callback.call(path.clone()));
    }
    let ctrl: Ctrl = store_value(controller);
    spawn_action(ctrl, |c| async move { c.init().await });

    let phase = create_memo(move |_| {
        revision.get();
        ctrl.with_value(|c| match c.listing() {
            ListingView::Loading => Phase::Loading,
            ListingView::Ready(_) => Phase::Ready(c.context().generation()),
            ListingView::Failed(err) => Phase::Failed(err),
        })
    });

    view! {
        <div class="kb-staging-browser">
            {move || match phase.get() {
                Phase::Loading => view! {
                    <div class="kb-staging-loading"><i class="fa fa-spinner fa-spin"></i></div>
                }
                .into_view(),
                Phase::Failed(err) => view! { <ErrorBlock error=err/> }.into_view(),
                Phase::Ready(_) => view! {
                    <StagingHeader ctrl=ctrl revision=revision/>
                    <PathBar ctrl=ctrl/>
                    <FileTable ctrl=ctrl revision=revision/>
                }
                .into_view(),
            }}
        </div>
    }
}

#[component]
fn ErrorBlock(error: ServiceError) -> impl IntoView {
    view! {
        <div class="alert alert-danger">
            {error.status_line()}
            <br/>
            {error.body()}
        </div>
    }
}

#[component]
fn StagingHeader(ctrl: Ctrl, revision: RwSignal<u64>) -> impl IntoView {
    let globus_link = move || {
        revision.get();
        ctrl.with_value(StagingBrowserController::globus_link)
    };

    view! {
        <div class="kb-staging-header">
            {move || {
                globus_link()
                    .map(|href| {
                        view! {
                            <div class="globus_div">
                                <a class="globus_link" href=href target="_blank">
                                    "Transfer files with Globus"
                                </a>
                            </div>
                        }
                    })
            }}
            <div class="web_upload_div">
                <button
                    type="button"
                    class="btn btn-link"
                    on:click=move |_| {
                        ctrl.get_value().launch_web_upload();
                    }
                >
                    "Import from a web link"
                </button>
            </div>
        </div>
    }
}

#[component]
fn PathBar(ctrl: Ctrl) -> impl IntoView {
    let crumbs = ctrl.with_value(|c| c.path().breadcrumbs());
    let search = ctrl.with_value(StagingBrowserController::search);

    view! {
        <div class="file-path pull-left">
            {crumbs
                .into_iter()
                .map(|crumb| {
                    let target = crumb.path;
                    view! {
                        <a
                            class="kb-staging-crumb"
                            on:click=move |_| {
                                let target = target.clone();
                                spawn_action(ctrl, move |c| async move { c.navigate_to(target).await });
                            }
                        >
                            {crumb.label}
                        </a>
                        " "
                    }
                })
                .collect_view()}
            <button
                id="refresh"
                type="button"
                class="btn btn-xs btn-default"
                title="Refresh"
                on:click=move |_| spawn_action(ctrl, |c| async move { c.refresh().await })
            >
                <i class="fa fa-refresh"></i>
            </button>
        </div>
        <div class="dataTables_filter pull-right">
            <label>
                "Search: "
                <input
                    type="search"
                    value=search
                    on:input=move |ev| ctrl.get_value().set_search(event_target_value(&ev))
                />
            </label>
        </div>
    }
}

#[component]
fn FileTable(ctrl: Ctrl, revision: RwSignal<u64>) -> impl IntoView {
    let rows = move || {
        revision.get();
        ctrl.with_value(StagingBrowserController::visible_rows)
    };

    view! {
        <table class="table table-bordered table-striped kb-staging-table">
            <thead>
                <tr>
                    {SortColumn::ALL
                        .into_iter()
                        .map(|column| {
                            let class = move || {
                                revision.get();
                                let sort = ctrl.with_value(StagingBrowserController::sort);
                                match (sort.column == column, sort.direction) {
                                    (false, _) => "sorting",
                                    (true, SortDirection::Ascending) => "sorting_asc",
                                    (true, SortDirection::Descending) => "sorting_desc",
                                }
                            };
                            view! {
                                <th
                                    class=class
                                    on:click=move |_| ctrl.get_value().toggle_sort(column)
                                >
                                    {column.label()}
                                </th>
                            }
                        })
                        .collect_view()}
                    <th>"Import as"</th>
                </tr>
            </thead>
            <tbody>
                <Show when=move || rows().is_empty()>
                    <tr>
                        <td colspan="5" class="dataTables_empty">"No data available in table"</td>
                    </tr>
                </Show>
                <For each=rows key=|entry| entry.name.clone() let:entry>
                    <FileRow ctrl=ctrl revision=revision entry=entry/>
                </For>
            </tbody>
        </table>
    }
}

#[component]
fn FileRow(ctrl: Ctrl, revision: RwSignal<u64>, entry: FileEntry) -> impl IntoView {
    let name = entry.name.clone();
    let expanded = create_memo({
        let name = name.clone();
        move |_| {
            revision.get();
            ctrl.with_value(|c| c.is_expanded(&name))
        }
    });

    let type_cell = if entry.is_folder {
        let folder = name.clone();
        view! {
            <button
                type="button"
                class="btn btn-xs btn-default"
                on:click=move |_| {
                    let folder = folder.clone();
                    spawn_action(ctrl, move |c| async move { c.navigate_into(&folder).await });
                }
            >
                <span><i class="fa fa-folder"></i></span>
            </button>
        }
        .into_view()
    } else {
        let file = name.clone();
        view! {
            <i
                class=move || if expanded.get() { "fa fa-caret-down" } else { "fa fa-caret-right" }
                on:click=move |_| {
                    let file = file.clone();
                    spawn_action(ctrl, move |c| async move { c.toggle_row(&file).await });
                }
            ></i>
            " "
            <span><i class="fa fa-file-o"></i></span>
        }
        .into_view()
    };

    let decompress = entry.is_archive().then(|| {
        let file = name.clone();
        view! {
            <button
                type="button"
                class="btn btn-default btn-xs"
                title="Decompress"
                on:click=move |_| {
                    let file = file.clone();
                    spawn_action(ctrl, move |c| async move { c.decompress(&file).await });
                }
            >
                <i class="fa fa-expand"></i>
            </button>
        }
    });

    let size = if entry.is_folder {
        String::new()
    } else {
        readable_bytes(entry.size)
    };
    let import_cell = (!entry.is_folder).then(|| view! { <ImportControl ctrl=ctrl name=name.clone()/> });
    let detail_name = name.clone();

    view! {
        <tr>
            <td>{type_cell}</td>
            <td>
                <span class="kb-data-staging-table-name" title=name.clone()>{name.clone()}</span>
                {decompress}
            </td>
            <td>{size}</td>
            <td>{short_timestamp(entry.mtime)}</td>
            <td>{import_cell}</td>
        </tr>
        <Show when=move || expanded.get()>
            <tr class="kb-staging-detail-row">
                <td colspan="5" style="vertical-align: top">
                    <DetailPanel ctrl=ctrl revision=revision name=detail_name.clone()/>
                </td>
            </tr>
        </Show>
    }
}

#[component]
fn ImportControl(ctrl: Ctrl, name: String) -> impl IntoView {
    let importer = create_rw_signal(String::new());
    let options = ctrl.with_value(StagingBrowserController::importer_options);

    view! {
        <select on:change=move |ev| importer.set(event_target_value(&ev))>
            <option value="" disabled=true selected=true>"Select a format"</option>
            {options
                .into_iter()
                .map(|option| view! { <option value=option.id>{option.name}</option> })
                .collect_view()}
        </select>
        <button
            type="button"
            class="btn btn-xs btn-default"
            title="Import"
            on:click=move |_| {
                let importer_type = importer.get_untracked();
                if importer_type.is_empty() {
                    return;
                }
                let file = name.clone();
                spawn_action(ctrl, move |c| async move { c.import(&file, &importer_type).await });
            }
        >
            <i class="fa fa-download"></i>
        </button>
    }
}

#[component]
fn DetailPanel(ctrl: Ctrl, revision: RwSignal<u64>, name: String) -> impl IntoView {
    let state = create_memo({
        let name = name.clone();
        move |_| {
            revision.get();
            ctrl.with_value(|c| c.detail_state(&name))
        }
    });
    let delete_error = create_memo({
        let name = name.clone();
        move |_| {
            revision.get();
            ctrl.with_value(|c| c.delete_error(&name))
        }
    });
    let active = create_rw_signal(DetailTab::Info);
    let delete_title = format!("Delete {name}");

    view! {
        <div class="kb-staging-detail">
            {move || {
                if let Some(err) = delete_error.get() {
                    return view! { <ErrorBlock error=err/> }.into_view();
                }
                match state.get() {
                    DetailState::NotFetched | DetailState::Loading => {
                        view! { <i class="fa fa-spinner fa-spin"></i> }.into_view()
                    }
                    DetailState::Failed(err) => view! { <ErrorBlock error=err/> }.into_view(),
                    DetailState::Fetched(details) => {
                        view! { <DetailTabs details=details active=active/> }.into_view()
                    }
                }
            }}
            <button
                type="button"
                class="btn btn-default btn-xs pull-right"
                title=delete_title
                on:click=move |_| {
                    let file = name.clone();
                    spawn_action(ctrl, move |c| async move { c.delete(&file).await });
                }
            >
                <i class="fa fa-trash"></i>
            </button>
        </div>
    }
}

#[component]
fn DetailTabs(details: FileDetails, active: RwSignal<DetailTab>) -> impl IntoView {
    let tabs = details.tabs();
    if !tabs.contains(&active.get_untracked()) {
        active.set(DetailTab::Info);
    }

    view! {
        <ul class="nav nav-tabs">
            {tabs
                .into_iter()
                .map(|tab| {
                    view! {
                        <li class=move || if active.get() == tab { "active" } else { "" }>
                            <a on:click=move |_| active.set(tab)>{tab.label()}</a>
                        </li>
                    }
                })
                .collect_view()}
        </ul>
        <div class="tab-content">{move || tab_content(&details, active.get())}</div>
    }
}

fn tab_content(details: &FileDetails, tab: DetailTab) -> View {
    match tab {
        DetailTab::Info => {
            let imported = details.imported_as.clone().map(|imported| {
                let target = match imported.resolution.clone() {
                    Ok(name) => view! {
                        <a href=imported.link() target="_blank">{name}</a>
                    }
                    .into_view(),
                    Err(message) => view! {
                        <span class="alert alert-danger" style="padding: 0px; margin: 0px">
                            {message}
                        </span>
                    }
                    .into_view(),
                };
                view! {
                    <li>
                        <span class="kb-data-staging-metadata-list">"Imported as"</span>
                        {target}
                    </li>
                }
            });
            view! {
                <ul style="list-style: none">
                    {details
                        .info_fields()
                        .into_iter()
                        .map(|(label, value)| {
                            view! {
                                <li>
                                    <span class="kb-data-staging-metadata-list">{label}</span>
                                    {value}
                                </li>
                            }
                        })
                        .collect_view()}
                    {imported}
                </ul>
            }
            .into_view()
        }
        DetailTab::Head => file_lines(details.metadata.head.clone()),
        DetailTab::Tail => file_lines(details.metadata.tail.clone()),
        DetailTab::Jgi => file_lines(
            details
                .extended
                .as_ref()
                .map(|extended| extended.pretty())
                .unwrap_or_default(),
        ),
    }
}

fn file_lines(text: String) -> View {
    view! { <div class="kb-data-staging-metadata-file-lines">{text}</div> }.into_view()
}
