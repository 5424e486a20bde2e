//! WASM bindings for PDF page splitting and cropping
//!
//! Document state lives in Rust (`PdfSplitSession`); the crop overlay is
//! driven by `CropperWidget`. JavaScript only handles file input and calls
//! into these bindings.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { PdfSplitSession, SessionMode, openPdfInNewTab } from './pkg/pdfsplit_wasm.js';
//!
//! await init();
//!
//! // Split mode
//! const session = new PdfSplitSession(SessionMode.Split);
//! session.setProgressCallback((percent, total, msg) => updateUI(percent, msg));
//! const info = session.loadDocument("file.pdf", bytes);
//! rangeInput.value = info.default_range;
//! session.setPageSelection("2-4");
//! session.setExtended(true);
//! openPdfInNewTab(session.execute());
//!
//! // Crop mode
//! const crop = new PdfSplitSession(SessionMode.Crop);
//! crop.loadDocument("file.pdf", bytes);
//! const size = await renderPreview(bytes, canvas, 1.5);
//! const widget = new CropperWidget(overlay, top, bottom, left, right, size.width, size.height);
//! crop.useCropperMargins(widget);
//! showPdfInline(crop.execute(), frame);
//! ```

pub mod cropper;
pub mod output;
pub mod session;
pub mod validation;
pub mod viewer;

#[cfg(test)]
mod test_pdf;

use wasm_bindgen::prelude::*;

// Re-export main types for JavaScript
pub use cropper::CropperWidget;
pub use session::{PdfSplitSession, SessionMode, SessionOptions};
pub use validation::PdfInfo;
pub use viewer::PreviewSize;

/// Initialize the WASM module
/// Called automatically by wasm-bindgen
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(
        &format!("pdfsplit-wasm {} initialized", env!("CARGO_PKG_VERSION")).into(),
    );
}
