//! DOM capability bridge used by the browser adapters and widgets.
//!
//! Calls route to the wasm32 implementation in the browser and to an inert fallback elsewhere,
//! so adapter logic stays testable on the host target.

mod interop;

/// Saves `href` as `filename` through a temporary anchor element.
///
/// Exactly one `<a download=filename href=href>` is appended to the body, clicked, and removed.
pub fn trigger_download(filename: &str, href: &str) -> Result<(), String> {
    interop::trigger_download(filename, href)
}

/// Reads the full contents of a picked or dropped file.
pub async fn read_file_bytes(file: &web_sys::File) -> Result<Vec<u8>, String> {
    interop::read_file_bytes(file).await
}

pub(crate) fn confirm(message: &str) -> bool {
    interop::confirm(message)
}

pub(crate) fn alert(message: &str) {
    interop::alert(message)
}

pub(crate) fn cookie_value(name: &str) -> Option<String> {
    interop::document_cookies().and_then(|cookies| crate::auth::find_cookie(&cookies, name))
}

pub(crate) fn dispatch_host_event(name: &str, detail_json: &str) -> Result<(), String> {
    interop::dispatch_host_event(name, detail_json)
}

pub(crate) fn console_warn(message: &str) {
    interop::console_warn(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn dom_public_api_non_wasm_parity() {
        let expected = "DOM APIs are only available when compiled for wasm32".to_string();

        assert_eq!(
            trigger_download("a.txt", "data:application/octet-stream;base64,YQ==")
                .expect_err("download should fail"),
            expected
        );
        assert_eq!(
            dispatch_host_event("narrative:add-app", "{}").expect_err("dispatch should fail"),
            expected
        );
        assert!(!confirm("ok?"));
        assert_eq!(cookie_value("kbase_session"), None);
        alert("ignored");
        console_warn("ignored");
    }
}
