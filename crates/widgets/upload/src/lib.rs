//! Upload widget: a drop target that sends files to the staging area one at a time.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod queue;

use std::collections::HashMap;
use std::rc::Rc;

use leptos::*;
use narrative_host::{readable_bytes, HostServices, ServiceError, StagingFuture, StagingService};
use web_sys::{File, FileList, HtmlInputElement};

pub use queue::{UploadEntry, UploadQueue, UploadStatus, IDLE_MESSAGE};

#[derive(Clone, Copy)]
/// Reactive handle shared between the upload widget and whoever owns the destination path.
pub struct UploadHandle {
    queue: RwSignal<UploadQueue>,
}

impl UploadHandle {
    /// Creates a handle targeting `path`. Must be called inside a reactive owner.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            queue: create_rw_signal(UploadQueue::new(path)),
        }
    }

    /// Changes the destination for files that have not started uploading.
    pub fn set_path(&self, path: impl Into<String>) {
        let path = path.into();
        self.queue.update(|queue| queue.set_path(path));
    }

    /// Current destination path.
    pub fn get_path(&self) -> String {
        self.queue.with_untracked(|queue| queue.get_path().to_string())
    }

    /// Aggregate status line.
    pub fn upload_message(&self) -> String {
        self.queue.with(UploadQueue::make_upload_message)
    }
}

/// Bytes of queued files, keyed by queue id.
trait FileSource {
    fn read(&self, id: u64) -> StagingFuture<'_, Result<Vec<u8>, ServiceError>>;

    /// Forgets the file once its upload finished either way.
    fn release(&self, id: u64);
}

#[derive(Clone, Copy)]
/// Browser `File` handles waiting for their turn.
struct PendingFiles(StoredValue<HashMap<u64, File>>);

impl PendingFiles {
    fn new() -> Self {
        Self(store_value(HashMap::new()))
    }

    fn insert(&self, id: u64, file: File) {
        self.0.update_value(|files| {
            files.insert(id, file);
        });
    }

    fn drop_all(&self, ids: &[u64]) {
        self.0.update_value(|files| {
            for id in ids {
                files.remove(id);
            }
        });
    }
}

impl FileSource for PendingFiles {
    fn read(&self, id: u64) -> StagingFuture<'_, Result<Vec<u8>, ServiceError>> {
        let file = self.0.with_value(|files| files.get(&id).cloned());
        Box::pin(async move {
            let file = file.ok_or_else(|| {
                ServiceError::Transport("file is no longer available".to_string())
            })?;
            narrative_host_web::read_file_bytes(&file)
                .await
                .map_err(ServiceError::Transport)
        })
    }

    fn release(&self, id: u64) {
        self.0.update_value(|files| {
            files.remove(&id);
        });
    }
}

fn enqueue_files(
    list: &FileList,
    handle: UploadHandle,
    pending: PendingFiles,
    staging: &Rc<dyn StagingService>,
) {
    for idx in 0..list.length() {
        let Some(file) = list.get(idx) else {
            continue;
        };
        let name = file.name();
        let size = file.size().max(0.0) as u64;
        logging::log!("uploading {name} = {size}B");
        if let Some(id) = handle.queue.try_update(|queue| queue.add_file(name, size)) {
            pending.insert(id, file);
        }
    }
    let staging = staging.clone();
    spawn_local(async move { drain_queue(staging.as_ref(), handle, &pending).await });
}

/// Sends queued files one by one until the queue has nothing left to start.
///
/// Returns at once when another drain already has an upload in flight; that drain picks up
/// files queued in the meantime.
async fn drain_queue(
    staging: &dyn StagingService,
    handle: UploadHandle,
    source: &impl FileSource,
) {
    while let Some(id) = handle.queue.try_update(UploadQueue::start_next).flatten() {
        let Some((name, dest_path)) = handle.queue.try_with_untracked(|queue| {
            let name = queue.entry(id).map(|entry| entry.name.clone());
            (name.unwrap_or_default(), queue.get_path().to_string())
        }) else {
            return;
        };

        let result = match source.read(id).await {
            Ok(bytes) => staging.upload(&dest_path, &name, bytes).await,
            Err(err) => Err(err),
        };
        match result {
            Ok(()) => handle.queue.update(|queue| queue.mark_succeeded(id)),
            Err(err) => {
                logging::error!("upload of `{name}` to `{dest_path}` failed: {err}");
                handle.queue.update(|queue| queue.mark_failed(id, err.to_string()));
            }
        }
        source.release(id);
    }
}

#[component]
/// Drop zone and file picker uploading into the handle's current path.
pub fn UploadWidget(
    /// Injected services; only the staging client is used.
    services: HostServices,
    /// Shared destination path and queue.
    handle: UploadHandle,
    /// Staging-area owner shown in the prompt.
    #[prop(optional_no_strip, into)]
    user_id: Option<String>,
) -> impl IntoView {
    let pending = PendingFiles::new();
    let staging = services.staging;
    let staging_for_drop = staging.clone();
    let prompt = match user_id {
        Some(user) => format!("Drop files here to upload to {user}'s staging area"),
        None => "Drop files here to upload to your staging area".to_string(),
    };

    let entries = move || handle.queue.with(|queue| queue.entries().to_vec());

    view! {
        <div class="kb-dropzone">
            <div
                class="dz-message"
                on:dragover=move |event: ev::DragEvent| event.prevent_default()
                on:drop=move |event: ev::DragEvent| {
                    event.prevent_default();
                    if let Some(list) = event.data_transfer().and_then(|transfer| transfer.files()) {
                        enqueue_files(&list, handle, pending, &staging_for_drop);
                    }
                }
            >
                <p>{prompt}</p>
                <label class="btn btn-default">
                    "Select files"
                    <input
                        type="file"
                        multiple=true
                        style="display: none"
                        on:change=move |ev| {
                            let input: HtmlInputElement = event_target(&ev);
                            if let Some(list) = input.files() {
                                enqueue_files(&list, handle, pending, &staging);
                            }
                            input.set_value("");
                        }
                    />
                </label>
            </div>
            <input
                type="hidden"
                name="destPath"
                prop:value=move || handle.queue.with(|queue| queue.get_path().to_string())
            />
            <Show when=move || handle.queue.with(UploadQueue::is_active)>
                <div class="kb-dropzone-info">
                    <span class="upload-message">{move || handle.upload_message()}</span>
                    <Show when=move || handle.queue.with(UploadQueue::has_completed)>
                        <button
                            type="button"
                            class="btn btn-xs btn-default clear-completed"
                            on:click=move |_| {
                                let dropped = handle
                                    .queue
                                    .try_update(UploadQueue::clear_completed)
                                    .unwrap_or_default();
                                pending.drop_all(&dropped);
                            }
                        >
                            "Clear completed"
                        </button>
                    </Show>
                </div>
            </Show>
            <ul class="dz-previews">
                <For each=entries key=|entry| (entry.id, entry.status.clone()) let:entry>
                    <UploadPreview entry=entry/>
                </For>
            </ul>
        </div>
    }
}

#[component]
fn UploadPreview(entry: UploadEntry) -> impl IntoView {
    let (status_class, status_text, show_progress) = match &entry.status {
        UploadStatus::Succeeded => ("dz-success", "Completed".to_string(), false),
        UploadStatus::Failed(message) => ("dz-error", message.clone(), true),
        UploadStatus::Uploading => ("dz-processing", String::new(), true),
        UploadStatus::Queued => ("dz-queued", String::new(), true),
    };
    let progress = entry.progress;

    view! {
        <li class=format!("dz-preview {status_class}")>
            <span class="dz-filename">{entry.name.clone()}</span>
            " "
            <span class="dz-size">{readable_bytes(entry.size)}</span>
            <Show when=move || show_progress>
                <div class="progress progress-striped active">
                    <div
                        class="progress-bar"
                        style=format!("width: {progress}%")
                    ></div>
                </div>
            </Show>
            <span class="dz-status">{status_text}</span>
        </li>
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use futures::executor::block_on;
    use narrative_host::{MemoryStagingService, StagingCall};
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Default)]
    struct MemoryFiles {
        bytes: RefCell<HashMap<u64, Vec<u8>>>,
        released: RefCell<Vec<u64>>,
    }

    impl MemoryFiles {
        fn with(self, id: u64, bytes: &[u8]) -> Self {
            self.bytes.borrow_mut().insert(id, bytes.to_vec());
            self
        }
    }

    impl FileSource for MemoryFiles {
        fn read(&self, id: u64) -> StagingFuture<'_, Result<Vec<u8>, ServiceError>> {
            let bytes = self.bytes.borrow().get(&id).cloned();
            Box::pin(async move {
                bytes.ok_or_else(|| ServiceError::Transport(format!("no bytes for {id}")))
            })
        }

        fn release(&self, id: u64) {
            self.released.borrow_mut().push(id);
        }
    }

    fn upload_call(dest_path: &str, file_name: &str, size: usize) -> StagingCall {
        StagingCall::Upload {
            dest_path: dest_path.to_string(),
            file_name: file_name.to_string(),
            size,
        }
    }

    #[test]
    fn handle_tracks_path_and_message() {
        let _ = leptos::create_runtime();
        let handle = UploadHandle::new("/");
        assert_eq!(handle.upload_message(), IDLE_MESSAGE);

        handle.set_path("/proj");
        assert_eq!(handle.get_path(), "/proj");

        handle.queue.update(|queue| {
            queue.add_file("a.fq", 1);
            queue.add_file("b.fq", 1);
            queue.start_next();
        });
        assert_eq!(
            handle.upload_message(),
            "Uploading 1 files (1 queued) to /proj"
        );
    }

    #[test]
    fn drain_sends_files_in_order_to_the_current_path() {
        let _ = leptos::create_runtime();
        let handle = UploadHandle::new("/");
        let (a, b) = handle
            .queue
            .try_update(|queue| (queue.add_file("a.fq", 3), queue.add_file("b.fq", 2)))
            .expect("queue");
        handle.set_path("/proj");
        let files = MemoryFiles::default().with(a, b"abc").with(b, b"de");
        let staging = MemoryStagingService::default();

        block_on(drain_queue(&staging, handle, &files));

        assert_eq!(
            staging.calls(),
            vec![upload_call("/proj", "a.fq", 3), upload_call("/proj", "b.fq", 2)]
        );
        assert_eq!(*files.released.borrow(), vec![a, b]);
        assert_eq!(handle.upload_message(), IDLE_MESSAGE);
        assert!(handle.queue.with(UploadQueue::has_completed));
    }

    #[test]
    fn drain_moves_past_failed_uploads() {
        let _ = leptos::create_runtime();
        let handle = UploadHandle::new("/proj");
        let ids: Vec<u64> = handle
            .queue
            .try_update(|queue| {
                ["bad.bin", "gone.txt", "ok.txt"]
                    .into_iter()
                    .map(|name| queue.add_file(name, 1))
                    .collect()
            })
            .expect("queue");
        let files = MemoryFiles::default().with(ids[0], b"x").with(ids[2], b"y");
        let staging = MemoryStagingService::default()
            .with_upload_error("bad.bin", ServiceError::http(413, "too large"));

        block_on(drain_queue(&staging, handle, &files));

        assert_eq!(
            staging.calls(),
            vec![upload_call("/proj", "bad.bin", 1), upload_call("/proj", "ok.txt", 1)]
        );
        let statuses: Vec<UploadStatus> = handle
            .queue
            .with(|queue| queue.entries().iter().map(|e| e.status.clone()).collect());
        assert!(matches!(statuses[0], UploadStatus::Failed(_)));
        assert!(matches!(statuses[1], UploadStatus::Failed(_)));
        assert_eq!(statuses[2], UploadStatus::Succeeded);
        assert_eq!(*files.released.borrow(), ids);
    }

    #[test]
    fn drain_defers_to_an_upload_in_flight() {
        let _ = leptos::create_runtime();
        let handle = UploadHandle::new("/");
        let id = handle
            .queue
            .try_update(|queue| {
                let id = queue.add_file("a.fq", 1);
                queue.start_next();
                queue.add_file("b.fq", 1);
                id
            })
            .expect("queue");
        let staging = MemoryStagingService::default();

        block_on(drain_queue(&staging, handle, &MemoryFiles::default()));

        assert!(staging.calls().is_empty());
        assert_eq!(
            handle.queue.with(|queue| queue.entry(id).map(|e| e.status.clone())),
            Some(UploadStatus::Uploading)
        );
    }
}
