//! PDF 텍스트 추출 모듈
//!
//! 텍스트는 pdf-extract, 페이지 수는 lopdf로 구합니다.

use crate::error::{Result, StudyError};

use super::ExtractedContent;

/// 텍스트가 없는 PDF 경고 (스캔 문서일 가능성)
pub const SCANNED_PDF_WARNING: &str = "No extractable text found (possibly a scanned PDF)";

/// 업로드 파일 이름 검사 (`.pdf` 확장자, 대소문자 무시)
pub fn validate_pdf_filename(filename: &str) -> Result<()> {
    if filename.trim().is_empty() {
        return Err(StudyError::invalid("No file uploaded"));
    }
    if !filename.to_lowercase().ends_with(".pdf") {
        return Err(StudyError::invalid("Uploaded file is not a PDF"));
    }
    Ok(())
}

/// 메모리의 PDF 바이트에서 텍스트 추출
///
/// 텍스트가 비어있어도 에러가 아니며, 경고만 추가합니다.
pub fn extract_pdf(bytes: &[u8]) -> Result<ExtractedContent> {
    // lopdf로 먼저 파싱 → 손상된 입력을 여기서 걸러냄
    let document = lopdf::Document::load_mem(bytes)
        .map_err(|e| StudyError::Extraction(e.to_string()))?;
    let num_pages = document.get_pages().len();

    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| StudyError::Extraction(e.to_string()))?;

    let mut warnings = Vec::new();
    if text.trim().is_empty() {
        tracing::warn!(
            "No text extracted from PDF ({} pages). It might be a scanned document.",
            num_pages
        );
        warnings.push(SCANNED_PDF_WARNING.to_string());
    }

    Ok(ExtractedContent {
        text,
        num_pages,
        warnings,
    })
}

// ============================================================================
// Test Fixtures
// ============================================================================


// ============================================================================
// Tests
// ============================================================================
