use js_sys::{Array, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, Document, HtmlElement, Url};

/// Log a message to the browser console.
pub fn log(s: &str) {
    web_sys::console::log_1(&JsValue::from_str(s));
}

/// Wrap PNG bytes in a blob and hand back an object URL for it. The caller
/// owns the URL and must revoke it.
pub fn png_object_url(bytes: &[u8]) -> Result<String, JsValue> {
    let array = Array::new();
    array.push(&Uint8Array::from(bytes).buffer());
    let options = BlobPropertyBag::new();
    options.set_type("image/png");
    let blob = Blob::new_with_u8_array_sequence_and_options(&array, &options)?;
    Url::create_object_url_with_blob(&blob)
}

pub fn revoke_url(url: Option<String>) {
    if let Some(url) = url {
        let _ = Url::revoke_object_url(&url);
    }
}

/// Offer `bytes` as a PNG download named `filename`.
pub fn save_png_as_file(document: &Document, filename: &str, bytes: &[u8]) -> Result<(), JsValue> {
    let url = png_object_url(bytes)?;
    let a = document.create_element("a")?.dyn_into::<HtmlElement>()?;
    a.set_attribute("href", &url)?;
    a.set_attribute("download", filename)?;
    a.click();
    Url::revoke_object_url(&url)?;
    Ok(())
}

/// Look up an element by id and cast it, `None` if absent or of another type.
pub fn element<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<T>().ok())
}

/// Seed for sessions that did not pin one in the URL.
pub fn random_seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64
}
