//! Paper loading. PDFs go through the `pdftotext` tool from poppler.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use crate::error::{Result, RevfeedError};

const PDFTOTEXT: &str = "pdftotext";

/// Extract the text of a PDF file.
///
/// Characters that do not decode as UTF-8 are dropped.
pub async fn pdf_to_text(path: &Path) -> Result<String> {
    log::info!("Parsing the pdf {}", path.display());

    let output = Command::new(PDFTOTEXT)
        .arg("-layout")
        .arg(path)
        .arg("-")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| RevfeedError::PdfParsing(format!("Failed to run {}: {}", PDFTOTEXT, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::error!("Error parsing PDF {}: {}", path.display(), stderr.trim());
        return Err(RevfeedError::PdfParsing(format!(
            "{} exited with {}: {}",
            PDFTOTEXT,
            output.status,
            stderr.trim()
        )));
    }

    let text = String::from_utf8_lossy(&output.stdout).replace(char::REPLACEMENT_CHARACTER, "");
    if text.trim().is_empty() {
        return Err(RevfeedError::PdfParsing(format!("No text extracted from {}", path.display())));
    }

    Ok(text)
}

fn is_pdf(path: &Path, bytes: &[u8]) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("pdf")) || bytes.starts_with(b"%PDF-")
}

/// Load a paper as text. PDFs are extracted; anything else is read as
/// UTF-8 with invalid bytes replaced.
pub async fn load_paper(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| RevfeedError::PaperNotFound(format!("{}: {}", path.display(), e)))?;

    if is_pdf(path, &bytes) {
        return pdf_to_text(path).await;
    }

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_text_paper() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("paper.txt");
        fs::write(&path, "Abstract. We propose a method.").unwrap();

        let text = load_paper(&path).await.unwrap();
        assert_eq!(text, "Abstract. We propose a method.");
    }

    #[tokio::test]
    async fn test_load_paper_replaces_invalid_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("paper.txt");
        fs::write(&path, b"ok \xff end").unwrap();

        let text = load_paper(&path).await.unwrap();
        assert!(text.starts_with("ok "));
        assert!(text.ends_with(" end"));
    }

    #[tokio::test]
    async fn test_missing_paper_is_not_found() {
        let result = load_paper(Path::new("/nonexistent/paper.txt")).await;
        assert!(matches!(result, Err(RevfeedError::PaperNotFound(_))));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_parsing_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("paper.pdf");
        fs::write(&path, "%PDF-1.7 this is not really a pdf").unwrap();

        // Fails whether or not pdftotext is installed
        let result = load_paper(&path).await;
        assert!(matches!(result, Err(RevfeedError::PdfParsing(_))));
    }

    #[test]
    fn test_is_pdf_detection() {
        assert!(is_pdf(Path::new("a.pdf"), b""));
        assert!(is_pdf(Path::new("a.PDF"), b""));
        assert!(is_pdf(Path::new("download"), b"%PDF-1.4 ..."));
        assert!(!is_pdf(Path::new("a.txt"), b"plain text"));
    }
}
