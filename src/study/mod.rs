//! Study 모듈 - 학습 요청 처리
//!
//! - params: 모드/난이도/요청 파라미터 타입
//! - prompt: 선택된 청크로 프롬프트 조립
//! - engine: 모드별 출력 생성 (텍스트 생성 백엔드 또는 플레이스홀더)

mod engine;
mod params;
mod prompt;

// Re-exports
pub use engine::{placeholder_output, system_instructions, StudyEngine, NO_TEXT_WARNING};
pub use params::{
    Difficulty, StudyMode, StudyParams, StudyRequest, StudyResponse, DEFAULT_NUM_QUESTIONS,
    MAX_NUM_QUESTIONS, MIN_NUM_QUESTIONS,
};
pub use prompt::{assemble_prompt, AssembledPrompt, CHUNK_SEPARATOR};
