use js_sys::Uint8Array;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{CustomEvent, CustomEventInit, Document, HtmlDocument, HtmlElement, Window};

fn js_error(err: JsValue) -> String {
    err.as_string()
        .or_else(|| {
            err.dyn_ref::<js_sys::Error>()
                .map(|err| String::from(err.message()))
        })
        .unwrap_or_else(|| format!("{err:?}"))
}

fn window() -> Result<Window, String> {
    web_sys::window().ok_or_else(|| "window is unavailable".to_string())
}

fn document() -> Result<Document, String> {
    window()?
        .document()
        .ok_or_else(|| "document is unavailable".to_string())
}

pub fn trigger_download(filename: &str, href: &str) -> Result<(), String> {
    let document = document()?;
    let body = document
        .body()
        .ok_or_else(|| "document body is unavailable".to_string())?;
    let anchor = document
        .create_element("a")
        .map_err(js_error)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| "anchor is not an HtmlElement".to_string())?;
    anchor.set_attribute("download", filename).map_err(js_error)?;
    anchor.set_attribute("href", href).map_err(js_error)?;
    body.append_child(&anchor).map_err(js_error)?;
    anchor.click();
    body.remove_child(&anchor).map_err(js_error)?;
    Ok(())
}

pub async fn read_file_bytes(file: &web_sys::File) -> Result<Vec<u8>, String> {
    let buffer = JsFuture::from(file.array_buffer()).await.map_err(js_error)?;
    Ok(Uint8Array::new(&buffer).to_vec())
}

pub fn confirm(message: &str) -> bool {
    window()
        .and_then(|window| window.confirm_with_message(message).map_err(js_error))
        .unwrap_or(false)
}

pub fn alert(message: &str) {
    if let Ok(window) = window() {
        let _ = window.alert_with_message(message);
    }
}

pub fn document_cookies() -> Option<String> {
    document()
        .ok()?
        .dyn_into::<HtmlDocument>()
        .ok()?
        .cookie()
        .ok()
}

pub fn dispatch_host_event(name: &str, detail_json: &str) -> Result<(), String> {
    let detail = js_sys::JSON::parse(detail_json).map_err(js_error)?;
    let init = CustomEventInit::new();
    init.set_detail(&detail);
    let event = CustomEvent::new_with_event_init_dict(name, &init).map_err(js_error)?;
    window()?.dispatch_event(&event).map_err(js_error)?;
    Ok(())
}

pub fn console_warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}
