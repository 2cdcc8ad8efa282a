//! Target routing for the DOM bridge.

#[cfg(not(target_arch = "wasm32"))]
mod non_wasm;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(not(target_arch = "wasm32"))]
use non_wasm as imp;
#[cfg(target_arch = "wasm32")]
use wasm as imp;

pub fn trigger_download(filename: &str, href: &str) -> Result<(), String> {
    imp::trigger_download(filename, href)
}

pub async fn read_file_bytes(file: &web_sys::File) -> Result<Vec<u8>, String> {
    imp::read_file_bytes(file).await
}

pub fn confirm(message: &str) -> bool {
    imp::confirm(message)
}

pub fn alert(message: &str) {
    imp::alert(message)
}

pub fn document_cookies() -> Option<String> {
    imp::document_cookies()
}

pub fn dispatch_host_event(name: &str, detail_json: &str) -> Result<(), String> {
    imp::dispatch_host_event(name, detail_json)
}

pub fn console_warn(message: &str) {
    imp::console_warn(message)
}
