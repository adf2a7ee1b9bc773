//! Document Store - 인메모리 문서 저장소
//!
//! 업로드된 문서(메타데이터, 전체 텍스트, 청크)를 생성된 ID로 보관합니다.
//! 프로세스가 살아있는 동안만 유지되며 재시작하면 사라집니다.
//!
//! 문서는 한 번 저장되면 수정되지 않습니다 (insert-once / read-many).

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{Result, StudyError};

// ============================================================================
// Types
// ============================================================================

/// 저장된 문서
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub doc_id: String,
    pub filename: String,
    pub full_text: String,
    pub chunks: Vec<String>,
    /// PDF 페이지 수 (알 수 있는 경우)
    pub num_pages: Option<usize>,
    pub created_at: DateTime<Utc>,
}

impl Document {
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}

/// 새 문서 입력용 구조체
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub filename: String,
    pub full_text: String,
    pub chunks: Vec<String>,
    pub num_pages: Option<usize>,
}

impl NewDocument {
    pub fn new(
        filename: impl Into<String>,
        full_text: impl Into<String>,
        chunks: Vec<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            full_text: full_text.into(),
            chunks,
            num_pages: None,
        }
    }

    pub fn with_pages(mut self, num_pages: usize) -> Self {
        self.num_pages = Some(num_pages);
        self
    }
}

/// 저장소 통계
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub document_count: usize,
    pub chunk_count: usize,
}

// ============================================================================
// DocumentStore
// ============================================================================

/// 인메모리 문서 저장소
///
/// 복제(clone)해도 같은 맵을 공유합니다. 전역 상태 대신 필요한 곳에 명시적으로 전달합니다.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    docs: Arc<RwLock<HashMap<String, Arc<Document>>>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 문서 저장 후 새 ID 반환
    ///
    /// ID 생성과 삽입은 하나의 쓰기 락 안에서 수행되므로
    /// 레코드는 완전히 채워진 상태로만 보입니다.
    pub fn save(&self, doc: NewDocument) -> Result<String> {
        if doc.filename.trim().is_empty() {
            return Err(StudyError::invalid("filename must not be empty"));
        }
        if doc.chunks.iter().any(|c| c.trim().is_empty()) {
            return Err(StudyError::invalid("chunks must not be empty"));
        }

        let mut docs = self
            .docs
            .write()
            .map_err(|e| StudyError::Storage(format!("Lock error: {}", e)))?;

        let created_at = Utc::now();
        let doc_id = loop {
            let candidate = Uuid::new_v4().to_string();
            if let Entry::Vacant(slot) = docs.entry(candidate.clone()) {
                slot.insert(Arc::new(Document {
                    doc_id: candidate.clone(),
                    filename: doc.filename,
                    full_text: doc.full_text,
                    chunks: doc.chunks,
                    num_pages: doc.num_pages,
                    created_at,
                }));
                break candidate;
            }
        };

        tracing::info!("Saved document: {} (total={})", doc_id, docs.len());
        Ok(doc_id)
    }

    /// ID로 문서 조회
    pub fn get(&self, doc_id: &str) -> Result<Arc<Document>> {
        let docs = self
            .docs
            .read()
            .map_err(|e| StudyError::Storage(format!("Lock error: {}", e)))?;

        docs.get(doc_id)
            .cloned()
            .ok_or_else(|| StudyError::NotFound(doc_id.to_string()))
    }

    /// 저장된 문서 수
    pub fn len(&self) -> Result<usize> {
        let docs = self
            .docs
            .read()
            .map_err(|e| StudyError::Storage(format!("Lock error: {}", e)))?;
        Ok(docs.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// 모든 문서 삭제 (디버그용). 삭제된 문서 수 반환
    pub fn clear(&self) -> Result<usize> {
        let mut docs = self
            .docs
            .write()
            .map_err(|e| StudyError::Storage(format!("Lock error: {}", e)))?;

        let count = docs.len();
        docs.clear();

        tracing::info!("Cleared document store ({} documents)", count);
        Ok(count)
    }

    /// 저장소 통계 (문서 수, 전체 청크 수)
    pub fn stats(&self) -> Result<StoreStats> {
        let docs = self
            .docs
            .read()
            .map_err(|e| StudyError::Storage(format!("Lock error: {}", e)))?;

        Ok(StoreStats {
            document_count: docs.len(),
            chunk_count: docs.values().map(|d| d.chunk_count()).sum(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
