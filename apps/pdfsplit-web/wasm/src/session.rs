//! Stateful PDF session management
//!
//! Holds the loaded document and the chosen options in Rust memory so the
//! page only forwards DOM events and file bytes.

use crate::cropper::CropperWidget;
use crate::validation::{info_for, PdfInfo};
use lopdf::Document;
use pdfsplit_core::{
    crop_document, parse_page_ranges, progress_percent, split_document, validate_page_range,
    CropMargins, PageInfo, SplitOptions,
};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

/// The loaded document with metadata
struct LoadedDocument {
    name: String,
    bytes: Vec<u8>,
    document: Document,
    info: PdfInfo,
}

/// Session mode determines which action `execute` runs
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Cut selected pages into two halves
    Split,
    /// Apply the same margins to every page
    Crop,
}

/// Options accepted by `configure`, e.g. `{ extended: true, margins: { left: 10 } }`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    #[serde(flatten)]
    pub split: SplitOptions,
    pub margins: CropMargins,
}

/// Stateful PDF session that holds one document in Rust memory
#[wasm_bindgen]
pub struct PdfSplitSession {
    mode: SessionMode,
    document: Option<LoadedDocument>,
    selected_pages: Vec<u32>,
    split_options: SplitOptions,
    margins: CropMargins,
    progress_callback: Option<js_sys::Function>,
}

#[wasm_bindgen]
impl PdfSplitSession {
    /// Create a new session in the specified mode
    #[wasm_bindgen(constructor)]
    pub fn new(mode: SessionMode) -> Self {
        Self {
            mode,
            document: None,
            selected_pages: Vec::new(),
            split_options: SplitOptions::default(),
            margins: CropMargins::default(),
            progress_callback: None,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    /// Set a progress callback function
    /// Callback signature: (percent: number, total: number, message: string) => void
    #[wasm_bindgen(js_name = setProgressCallback)]
    pub fn set_progress_callback(&mut self, callback: js_sys::Function) {
        self.progress_callback = Some(callback);
    }

    /// Internal method to load a document (testable without JsValue)
    fn load_document_internal(&mut self, name: &str, bytes: &[u8]) -> Result<PdfInfo, String> {
        let document =
            Document::load_mem(bytes).map_err(|e| format!("Failed to parse PDF: {}", e))?;
        let info = info_for(&document, bytes)?;

        // A new file replaces the previous one and selects every page.
        self.selected_pages = (1..=info.page_count).collect();
        self.document = Some(LoadedDocument {
            name: name.to_string(),
            bytes: bytes.to_vec(),
            document,
            info: info.clone(),
        });

        Ok(info)
    }

    /// Load a document, replacing any previous one
    /// Returns document info (page count, default range) on success
    #[wasm_bindgen(js_name = loadDocument)]
    pub fn load_document(&mut self, name: &str, bytes: &[u8]) -> Result<JsValue, JsValue> {
        crate::validation::quick_validate(bytes).map_err(|e| JsValue::from_str(&e))?;
        let info = self
            .load_document_internal(name, bytes)
            .map_err(|e| JsValue::from_str(&e))?;

        serde_wasm_bindgen::to_value(&info)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Drop the loaded document and reset the selection
    pub fn clear(&mut self) {
        self.document = None;
        self.selected_pages.clear();
    }

    #[wasm_bindgen(js_name = hasDocument)]
    pub fn has_document(&self) -> bool {
        self.document.is_some()
    }

    #[wasm_bindgen(js_name = getDocumentName)]
    pub fn get_document_name(&self) -> Option<String> {
        self.document.as_ref().map(|d| d.name.clone())
    }

    #[wasm_bindgen(js_name = getPageCount)]
    pub fn get_page_count(&self) -> u32 {
        self.document.as_ref().map_or(0, |d| d.info.page_count)
    }

    fn set_page_selection_internal(&mut self, range_str: &str) -> Result<Vec<u32>, String> {
        let total = self
            .document
            .as_ref()
            .map(|d| d.info.page_count)
            .ok_or_else(|| "No document loaded".to_string())?;

        self.selected_pages = parse_page_ranges(range_str, total);
        Ok(self.selected_pages.clone())
    }

    /// Set page selection for split mode
    /// Input: "1-3, 5, 8-10" format. Malformed or out-of-range parts are
    /// skipped; returns the pages that were selected.
    #[wasm_bindgen(js_name = setPageSelection)]
    pub fn set_page_selection(&mut self, range_str: &str) -> Result<Vec<u32>, JsValue> {
        self.set_page_selection_internal(range_str)
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Hint for the first part of a range expression that selects nothing
    #[wasm_bindgen(js_name = validatePageSelection)]
    pub fn validate_page_selection(&self, range_str: &str) -> Option<String> {
        validate_page_range(range_str, self.get_page_count())
    }

    #[wasm_bindgen(js_name = getSelectedPages)]
    pub fn get_selected_pages(&self) -> Vec<u32> {
        self.selected_pages.clone()
    }

    #[wasm_bindgen(js_name = setExtended)]
    pub fn set_extended(&mut self, extended: bool) {
        self.split_options.extended = extended;
    }

    #[wasm_bindgen(js_name = isExtended)]
    pub fn is_extended(&self) -> bool {
        self.split_options.extended
    }

    fn set_margins_internal(&mut self, margins: CropMargins) -> Result<(), String> {
        let margins = margins.clamped();
        margins.validate().map_err(|e| e.to_string())?;
        self.margins = margins;
        Ok(())
    }

    /// Set crop margins in percent
    #[wasm_bindgen(js_name = setMargins)]
    pub fn set_margins(
        &mut self,
        top: f64,
        bottom: f64,
        left: f64,
        right: f64,
    ) -> Result<(), JsValue> {
        self.set_margins_internal(CropMargins::new(top, bottom, left, right))
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Take the margins currently shown by a cropper widget
    #[wasm_bindgen(js_name = useCropperMargins)]
    pub fn use_cropper_margins(&mut self, cropper: &CropperWidget) -> Result<(), JsValue> {
        self.set_margins_internal(cropper.current_margins())
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Get the crop margins as `{ top, bottom, left, right }`
    #[wasm_bindgen(js_name = getMargins)]
    pub fn get_margins(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.margins.rounded())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    fn configure_internal(&mut self, options: SessionOptions) -> Result<(), String> {
        self.set_margins_internal(options.margins)?;
        self.split_options = options.split;
        Ok(())
    }

    /// Apply split and crop options from a plain JS object
    pub fn configure(&mut self, options: JsValue) -> Result<(), JsValue> {
        let options: SessionOptions = serde_wasm_bindgen::from_value(options)
            .map_err(|e| JsValue::from_str(&format!("Invalid options: {}", e)))?;
        self.configure_internal(options)
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Get info for a specific page, with pixel size at `scale`
    #[wasm_bindgen(js_name = getPageInfo)]
    pub fn get_page_info(&self, page_num: u32, scale: f64) -> Result<JsValue, JsValue> {
        let doc = self
            .document
            .as_ref()
            .ok_or_else(|| JsValue::from_str("No document loaded"))?;
        let info = PageInfo::from_document(&doc.document, page_num)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        serde_wasm_bindgen::to_value(&PageInfoJs::new(info, scale))
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Get info for every page, with pixel sizes at `scale`
    #[wasm_bindgen(js_name = getPageInfos)]
    pub fn get_page_infos(&self, scale: f64) -> Result<JsValue, JsValue> {
        let infos = self
            .page_infos_internal(scale)
            .map_err(|e| JsValue::from_str(&e))?;

        serde_wasm_bindgen::to_value(&infos)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    fn page_infos_internal(&self, scale: f64) -> Result<Vec<PageInfoJs>, String> {
        let doc = self
            .document
            .as_ref()
            .ok_or_else(|| "No document loaded".to_string())?;
        let infos = PageInfo::all_from_document(&doc.document).map_err(|e| e.to_string())?;
        Ok(infos
            .into_iter()
            .map(|info| PageInfoJs::new(info, scale))
            .collect())
    }

    /// Check if session is ready for execution
    #[wasm_bindgen(js_name = canExecute)]
    pub fn can_execute(&self) -> bool {
        self.document.is_some()
    }

    /// Execute the operation and return result as Uint8Array
    pub fn execute(&self) -> Result<js_sys::Uint8Array, JsValue> {
        let result = self
            .execute_internal()
            .map_err(|e| JsValue::from_str(&e))?;

        let array = js_sys::Uint8Array::new_with_length(result.len() as u32);
        array.copy_from(&result);
        Ok(array)
    }

    /// Run the action, always finishing with a `Complete` or `Failed` event
    fn execute_internal(&self) -> Result<Vec<u8>, String> {
        self.report_progress(0, "Starting...");

        let result = self.run();
        match &result {
            Ok(_) => self.report_progress(100, "Complete"),
            Err(e) => self.report_progress(0, &format!("Failed: {}", e)),
        }
        result
    }

    fn run(&self) -> Result<Vec<u8>, String> {
        let doc = self
            .document
            .as_ref()
            .ok_or_else(|| "No document loaded".to_string())?;

        let on_page = |done: u32, total: u32| {
            self.report_progress(
                progress_percent(done, total),
                &format!("Page {}/{}", done, total),
            );
        };

        match self.mode {
            SessionMode::Split => {
                split_document(&doc.bytes, &self.selected_pages, self.split_options, on_page)
                    .map_err(|e| format!("Split failed: {}", e))
            }
            SessionMode::Crop => crop_document(&doc.bytes, &self.margins, on_page)
                .map_err(|e| format!("Crop failed: {}", e)),
        }
    }

    /// Report progress to JavaScript callback
    fn report_progress(&self, percent: u32, message: &str) {
        if let Some(ref callback) = self.progress_callback {
            let this = JsValue::null();
            let _ = callback.call3(
                &this,
                &JsValue::from(percent),
                &JsValue::from(100u32),
                &JsValue::from_str(message),
            );
        }
    }
}

/// Page info for JS serialization, with pixel size at the viewer scale
#[derive(Debug, serde::Serialize)]
struct PageInfoJs {
    #[serde(flatten)]
    info: PageInfo,
    pixel_width: f64,
    pixel_height: f64,
}

impl PageInfoJs {
    fn new(info: PageInfo, scale: f64) -> Self {
        let scaled = info.scaled(scale);
        Self {
            info,
            pixel_width: scaled.width,
            pixel_height: scaled.height,
        }
    }
}
