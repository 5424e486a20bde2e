//! PDF.js integration for the crop preview

use js_sys::{Reflect, Uint8Array};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

/// Worker used when the page does not supply its own.
const DEFAULT_WORKER_SRC: &str =
    "https://cdn.jsdelivr.net/npm/pdfjs-dist@3.11.174/build/pdf.worker.min.js";

// External JavaScript functions from pdf-bridge.js
#[wasm_bindgen(module = "/www/js/pdf-bridge.js")]
extern "C" {
    #[wasm_bindgen(js_name = initPdfJs)]
    async fn init_pdf_js_internal(worker_src: &str) -> JsValue;

    #[wasm_bindgen(js_name = loadDocument, catch)]
    async fn load_document_internal(data: Uint8Array) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_name = renderPage, catch)]
    async fn render_page_internal(
        page_num: u32,
        canvas: &HtmlCanvasElement,
        scale: f64,
    ) -> Result<JsValue, JsValue>;
}

/// Canvas size after rendering, which the cropper works in
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PreviewSize {
    pub width: u32,
    pub height: u32,
    pub page_count: u32,
}

/// Initialize PDF.js, optionally with a custom worker URL
#[wasm_bindgen(js_name = initPdfJs)]
pub async fn init_pdf_js(worker_src: Option<String>) -> Result<(), JsValue> {
    init_pdf_js_internal(worker_src.as_deref().unwrap_or(DEFAULT_WORKER_SRC)).await;
    Ok(())
}

/// Render page 1 of `bytes` into `canvas` at `scale` pixels per point.
///
/// Returns `{ width, height, page_count }` with the canvas pixel size.
#[wasm_bindgen(js_name = renderPreview)]
pub async fn render_preview(
    bytes: Vec<u8>,
    canvas: HtmlCanvasElement,
    scale: f64,
) -> Result<JsValue, JsValue> {
    if !(scale.is_finite() && scale > 0.0) {
        return Err(JsValue::from_str(&format!("Invalid scale: {}", scale)));
    }

    let data = Uint8Array::new_with_length(bytes.len() as u32);
    data.copy_from(&bytes);

    let document = load_document_internal(data).await?;
    if document.is_undefined() || document.is_null() {
        return Err(JsValue::from_str("Failed to load PDF document"));
    }
    let page_count = Reflect::get(&document, &JsValue::from_str("numPages"))?
        .as_f64()
        .map_or(0, |n| n as u32);
    if page_count == 0 {
        return Err(JsValue::from_str("PDF has no pages"));
    }

    render_page_internal(1, &canvas, scale).await?;

    let size = PreviewSize {
        width: canvas.width(),
        height: canvas.height(),
        page_count,
    };
    serde_wasm_bindgen::to_value(&size)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Scale that fits a page `page_width` points wide into `available` pixels,
/// never enlarging past `max_scale`.
#[wasm_bindgen(js_name = fitScale)]
pub fn fit_scale(page_width: f64, available: f64, max_scale: f64) -> f64 {
    if page_width <= 0.0 || available <= 0.0 {
        return max_scale;
    }
    (available / page_width).min(max_scale)
}
