//! PDF résumé import behind `PdfImporter`.

pub mod sections;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::errors::AppError;

pub use sections::{parse_resume_text, ImportedResume};

#[async_trait]
pub trait PdfImporter: Send + Sync {
    async fn import(&self, pdf: &[u8]) -> Result<ImportedResume, AppError>;
}

/// Extracts the text layer with `pdf-extract`, then applies section heuristics.
/// Scanned PDFs without a text layer are rejected.
pub struct TextPdfImporter;

#[async_trait]
impl PdfImporter for TextPdfImporter {
    async fn import(&self, pdf: &[u8]) -> Result<ImportedResume, AppError> {
        if pdf.is_empty() {
            return Err(AppError::InvalidInput("PDF body is empty".to_string()));
        }
        let bytes = pdf.to_vec();
        let size = bytes.len();
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}")))?
            .map_err(|e| AppError::Pdf(format!("Could not read PDF: {e}")))?;

        if text.trim().is_empty() {
            return Err(AppError::Pdf(
                "PDF has no extractable text layer".to_string(),
            ));
        }

        let imported = parse_resume_text(&text);
        info!(
            "Imported PDF ({size} bytes): {} work entries, {} warnings",
            imported.document.work.len(),
            imported.warnings.len()
        );
        for w in &imported.warnings {
            warn!("PDF import: {w}");
        }
        Ok(imported)
    }
}
