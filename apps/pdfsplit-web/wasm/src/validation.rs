//! PDF validation and info extraction
//!
//! Checks an uploaded file before a session takes ownership of it.

use lopdf::Document;
use serde::Serialize;

/// PDF file information extracted during validation
#[derive(Debug, Clone, Serialize, Default)]
pub struct PdfInfo {
    /// Number of pages in the document
    pub page_count: u32,
    /// PDF version string (e.g., "1.7")
    pub version: String,
    /// Whether the document is encrypted
    pub encrypted: bool,
    /// File size in bytes
    pub size_bytes: usize,
    /// Range expression selecting every page, for pre-filling the input
    pub default_range: String,
}

/// Build info for an already parsed document
pub fn info_for(document: &Document, bytes: &[u8]) -> Result<PdfInfo, String> {
    let page_count = document.get_pages().len() as u32;
    if page_count == 0 {
        return Err("PDF has no pages".to_string());
    }

    Ok(PdfInfo {
        page_count,
        version: extract_version(bytes),
        encrypted: document.is_encrypted(),
        size_bytes: bytes.len(),
        default_range: pdfsplit_core::default_page_range(page_count),
    })
}

fn check_header(bytes: &[u8]) -> Result<(), String> {
    if bytes.len() < 8 {
        return Err("File too small to be a valid PDF".to_string());
    }
    if !bytes.starts_with(b"%PDF-") {
        return Err("Not a valid PDF file (missing %PDF- header)".to_string());
    }
    Ok(())
}

/// Extract PDF version from header
fn extract_version(bytes: &[u8]) -> String {
    // Header format: %PDF-1.7
    if bytes.len() >= 8 && bytes.starts_with(b"%PDF-") {
        if let Ok(version) = std::str::from_utf8(&bytes[5..8]) {
            return version.trim().to_string();
        }
    }
    "1.4".to_string()
}

/// Quick validation without full parsing (for large files)
pub fn quick_validate(bytes: &[u8]) -> Result<(), String> {
    check_header(bytes)?;

    let tail = if bytes.len() > 1024 {
        &bytes[bytes.len() - 1024..]
    } else {
        bytes
    };
    if !tail.windows(5).any(|w| w == b"%%EOF") {
        return Err("PDF appears truncated (missing %%EOF marker)".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_pdf::create_test_pdf;

    #[test]
    fn test_quick_validate_rejects_non_pdf() {
        assert!(quick_validate(b"not a pdf file").is_err());
    }

    #[test]
    fn test_quick_validate_rejects_small_file() {
        assert!(quick_validate(b"tiny").is_err());
    }

    #[test]
    fn test_quick_validate_accepts_valid_pdf() {
        assert!(quick_validate(&create_test_pdf(1)).is_ok());
    }

    #[test]
    fn test_info_reports_pages_and_range() {
        let pdf = create_test_pdf(5);
        let info = info_for(&Document::load_mem(&pdf).unwrap(), &pdf).unwrap();
        assert_eq!(info.page_count, 5);
        assert_eq!(info.default_range, "1-5");
        assert_eq!(info.version, "1.7");
        assert!(!info.encrypted);
    }

    #[test]
    fn test_extract_version() {
        assert_eq!(extract_version(b"%PDF-1.7\n"), "1.7");
        assert_eq!(extract_version(b"%PDF-2.0\n"), "2.0");
    }
}
