//! Document text extraction.
//!
//! The CLI accepts plain-text and PDF files; any other extension is
//! rejected before the content reaches the knowledge pipeline.

use doctalk_core::{AppError, AppResult};
use std::path::Path;

/// Read a document file and extract its text content.
///
/// Accepts `.txt` and `.pdf` (case-insensitive); anything else is an
/// `InvalidInput` error, reported before any file I/O happens.
pub fn extract_text(path: &Path) -> AppResult<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("txt") => Ok(std::fs::read_to_string(path)?),
        Some("pdf") => extract_pdf(path),
        _ => Err(AppError::InvalidInput(
            "File must be .txt or .pdf".to_string(),
        )),
    }
}

fn extract_pdf(path: &Path) -> AppResult<String> {
    let bytes = std::fs::read(path)?;

    tracing::debug!("Extracting text from PDF ({} bytes)", bytes.len());

    pdf_extract::extract_text_from_mem(&bytes)
        .map_err(|e| AppError::InvalidInput(format!("Failed to extract PDF text: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(suffix: &str, contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .prefix("doc")
            .suffix(suffix)
            .tempfile()
            .unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_extract_txt() {
        let file = temp_file(".txt", b"hello from a text file");
        let text = extract_text(file.path()).unwrap();
        assert_eq!(text, "hello from a text file");
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let file = temp_file(".TXT", b"upper case extension");
        let text = extract_text(file.path()).unwrap();
        assert_eq!(text, "upper case extension");
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let file = temp_file(".docx", b"word document");
        let err = extract_text(file.path()).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(err.to_string().contains("File must be .txt or .pdf"));
    }

    #[test]
    fn test_rejects_missing_extension() {
        let file = temp_file("", b"no extension at all");
        let err = extract_text(file.path()).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = extract_text(Path::new("/nonexistent/notes.txt")).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }

    #[test]
    fn test_invalid_pdf_is_rejected() {
        let file = temp_file(".pdf", b"this is not a pdf");
        let err = extract_text(file.path()).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
