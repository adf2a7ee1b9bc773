//! Knowledge 모듈 - 청킹, 문서 저장, 관련 청크 선택
//!
//! - Chunker: 공백 정규화 + 오버랩 슬라이딩 윈도우
//! - Store: 프로세스 수명 동안 유지되는 인메모리 문서 저장소
//! - Selector: 포커스 키워드 출현 횟수 기반 상위 K개 청크 선택

mod chunker;
mod selector;
mod store;

// Re-exports
pub use chunker::{chunk_text, normalize_text, ChunkConfig, DEFAULT_MAX_CHARS, DEFAULT_OVERLAP};
pub use selector::{extract_keywords, score_chunk, select_relevant_chunks, DEFAULT_MAX_CHUNKS};
pub use store::{Document, DocumentStore, NewDocument, StoreStats};
