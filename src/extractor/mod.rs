//! 콘텐츠 추출 모듈
//!
//! 업로드된 문서에서 텍스트를 추출합니다.
//! - PDF 파일: pdf-extract + lopdf
//! - 그 외 파일 (CLI 전용): UTF-8 텍스트로 직접 읽기

pub mod pdf;

use std::path::Path;

use serde::Serialize;

use crate::error::{Result, StudyError};

pub use pdf::{extract_pdf, validate_pdf_filename, SCANNED_PDF_WARNING};

// ============================================================================
// Extracted Content
// ============================================================================

/// 추출된 콘텐츠
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractedContent {
    /// 추출된 전체 텍스트 (비어있을 수 있음)
    pub text: String,
    /// 페이지 수
    pub num_pages: usize,
    /// 추출 경고
    pub warnings: Vec<String>,
}

/// PDF 바이트에서 추출 (CPU 바운드이므로 blocking 스레드에서 실행)
pub async fn extract_pdf_bytes(bytes: Vec<u8>) -> Result<ExtractedContent> {
    tokio::task::spawn_blocking(move || extract_pdf(&bytes))
        .await
        .map_err(|e| StudyError::Extraction(format!("PDF extraction task failed: {}", e)))?
}

/// 파일에서 추출
///
/// `.pdf` 확장자는 PDF로, 나머지는 텍스트 파일로 읽습니다.
pub async fn extract_file(path: &Path) -> Result<ExtractedContent> {
    let is_pdf = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);

    if is_pdf {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| StudyError::Extraction(format!("Failed to read PDF {:?}: {}", path, e)))?;
        return extract_pdf_bytes(bytes).await;
    }

    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        StudyError::Extraction(format!("Failed to read text file {:?}: {}", path, e))
    })?;

    Ok(ExtractedContent {
        text,
        num_pages: 1,
        warnings: vec![],
    })
}

// ============================================================================
// Tests
// ============================================================================
