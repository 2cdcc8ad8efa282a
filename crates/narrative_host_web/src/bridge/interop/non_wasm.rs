fn unsupported() -> String {
    "DOM APIs are only available when compiled for wasm32".to_string()
}

pub fn trigger_download(_filename: &str, _href: &str) -> Result<(), String> {
    Err(unsupported())
}

pub async fn read_file_bytes(_file: &web_sys::File) -> Result<Vec<u8>, String> {
    Err(unsupported())
}

pub fn confirm(_message: &str) -> bool {
    false
}

pub fn alert(_message: &str) {}

pub fn document_cookies() -> Option<String> {
    None
}

pub fn dispatch_host_event(_name: &str, _detail_json: &str) -> Result<(), String> {
    Err(unsupported())
}

pub fn console_warn(message: &str) {
    eprintln!("{message}");
}
