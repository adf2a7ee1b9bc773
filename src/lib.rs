//! study-buddy - PDF 기반 AI 학습 도우미
//!
//! 업로드된 문서를 오버랩 청크로 나눠 메모리에 보관하고,
//! 학습 요청(요약/설명/퀴즈)마다 포커스 키워드와 관련된 청크를 골라
//! 프롬프트를 조립합니다.

pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod knowledge;
pub mod llm;
pub mod server;
pub mod study;

// Re-exports
pub use config::AppConfig;
pub use error::{Result, StudyError};
pub use extractor::{extract_file, extract_pdf, validate_pdf_filename, ExtractedContent};
pub use knowledge::{
    chunk_text, normalize_text, select_relevant_chunks, ChunkConfig, Document, DocumentStore,
    NewDocument, StoreStats,
};
pub use llm::{AzureOpenAiClient, LlmConfig, TextGenerator};
pub use study::{
    assemble_prompt, AssembledPrompt, Difficulty, StudyEngine, StudyMode, StudyParams,
    StudyRequest, StudyResponse,
};
