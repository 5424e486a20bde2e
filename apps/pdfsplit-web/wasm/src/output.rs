//! Delivering the finished PDF to the user
//!
//! Output bytes are wrapped in a `Blob` and exposed through an object URL,
//! which is either opened in a new tab or loaded into an inline frame.
//! Callers revoke the URL once it is no longer shown.

use js_sys::{Array, Uint8Array};
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, HtmlIFrameElement, Url};

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Create an object URL for PDF bytes
#[wasm_bindgen(js_name = createPdfUrl)]
pub fn create_pdf_url(bytes: &[u8]) -> Result<String, JsValue> {
    let data = Uint8Array::new_with_length(bytes.len() as u32);
    data.copy_from(bytes);
    let parts = Array::new();
    parts.push(&data);

    let options = BlobPropertyBag::new();
    options.set_type(PDF_MIME_TYPE);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;

    Url::create_object_url_with_blob(&blob)
}

/// Open PDF bytes in a new browser tab, returning the object URL
#[wasm_bindgen(js_name = openPdfInNewTab)]
pub fn open_pdf_in_new_tab(bytes: &[u8]) -> Result<String, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
    let url = create_pdf_url(bytes)?;

    match window.open_with_url_and_target(&url, "_blank")? {
        Some(_) => Ok(url),
        None => {
            let _ = Url::revoke_object_url(&url);
            Err(JsValue::from_str(
                "The new tab was blocked; allow pop-ups for this page",
            ))
        }
    }
}

/// Show PDF bytes in an inline frame, returning the object URL
#[wasm_bindgen(js_name = showPdfInline)]
pub fn show_pdf_inline(bytes: &[u8], frame: &HtmlIFrameElement) -> Result<String, JsValue> {
    let url = create_pdf_url(bytes)?;
    frame.set_src(&url);
    Ok(url)
}

/// Release an object URL created by this module
#[wasm_bindgen(js_name = revokePdfUrl)]
pub fn revoke_pdf_url(url: &str) -> Result<(), JsValue> {
    Url::revoke_object_url(url)
}
