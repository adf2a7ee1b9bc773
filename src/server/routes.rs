//! HTTP 핸들러

use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::UPLOAD_PREVIEW_CHARS;
use crate::error::StudyError;
use crate::extractor::{extract_pdf_bytes, validate_pdf_filename};
use crate::knowledge::NewDocument;
use crate::study::{StudyRequest, StudyResponse};

use super::{ApiError, AppState};

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

/// 문서 조회 시 돌려주는 청크 미리보기 수
const DOC_PREVIEW_CHUNKS: usize = 2;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub message: &'static str,
    pub documents: usize,
    pub chunks: usize,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub doc_id: String,
    pub filename: String,
    pub num_pages: usize,
    pub text_length: usize,
    pub chunk_count: usize,
    pub preview: String,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DocResponse {
    pub doc_id: String,
    pub filename: String,
    pub created_at: DateTime<Utc>,
    pub num_pages: Option<usize>,
    pub chunk_count: usize,
    pub chunks_preview: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub cleared: usize,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn health(State(state): State<AppState>) -> ApiResult<HealthResponse> {
    let stats = state.engine.store().stats()?;
    Ok(Json(HealthResponse {
        message: "yes server is operating correctly",
        documents: stats.document_count,
        chunks: stats.chunk_count,
    }))
}

/// PDF 업로드 → 추출 → 청킹 → 저장
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<UploadResponse> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| StudyError::invalid(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| StudyError::invalid(e.body_text()))?;
        upload = Some((filename, bytes));
        break;
    }

    let (filename, bytes) = upload.ok_or_else(|| StudyError::invalid("No file uploaded"))?;
    validate_pdf_filename(&filename)?;

    let content = extract_pdf_bytes(bytes.to_vec()).await?;
    let chunks = state.config.chunk.chunk(&content.text)?;

    let text_length = content.text.chars().count();
    let preview: String = content.text.chars().take(UPLOAD_PREVIEW_CHARS).collect();
    let chunk_count = chunks.len();

    let doc_id = state.engine.store().save(
        NewDocument::new(filename.clone(), content.text, chunks).with_pages(content.num_pages),
    )?;

    tracing::info!(
        "[upload] {} -> doc_id={} pages={} chunks={}",
        filename,
        doc_id,
        content.num_pages,
        chunk_count
    );

    Ok(Json(UploadResponse {
        doc_id,
        filename,
        num_pages: content.num_pages,
        text_length,
        chunk_count,
        preview,
        warnings: content.warnings,
    }))
}

pub async fn read_doc(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
) -> ApiResult<DocResponse> {
    let doc = state.engine.store().get(&doc_id)?;

    Ok(Json(DocResponse {
        doc_id: doc.doc_id.clone(),
        filename: doc.filename.clone(),
        created_at: doc.created_at,
        num_pages: doc.num_pages,
        chunk_count: doc.chunk_count(),
        chunks_preview: doc.chunks.iter().take(DOC_PREVIEW_CHUNKS).cloned().collect(),
    }))
}

/// 저장소 비우기 (디버그용)
pub async fn clear_docs(State(state): State<AppState>) -> ApiResult<ClearResponse> {
    Ok(Json(ClearResponse {
        cleared: state.engine.store().clear()?,
    }))
}

pub async fn study(
    State(state): State<AppState>,
    payload: std::result::Result<Json<StudyRequest>, JsonRejection>,
) -> ApiResult<StudyResponse> {
    let Json(req) = payload?;
    let params = req.params(state.config.max_chunks);
    let response = state.engine.run(&req.doc_id, &params).await?;
    Ok(Json(response))
}

// ============================================================================
// Tests
// ============================================================================
