//! 학습 요청 파라미터 타입

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StudyError};
use crate::knowledge::DEFAULT_MAX_CHUNKS;

/// 퀴즈 기본 문항 수
pub const DEFAULT_NUM_QUESTIONS: u32 = 8;
/// 퀴즈 문항 수 허용 범위
pub const MIN_NUM_QUESTIONS: u32 = 1;
pub const MAX_NUM_QUESTIONS: u32 = 50;

// ============================================================================
// StudyMode
// ============================================================================

/// 학습 모드
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StudyMode {
    Summarize,
    Explain,
    Quiz,
}

impl StudyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudyMode::Summarize => "summarize",
            StudyMode::Explain => "explain",
            StudyMode::Quiz => "quiz",
        }
    }
}

impl fmt::Display for StudyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Difficulty
// ============================================================================

/// 난이도
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    #[default]
    Mixed,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Mixed => "mixed",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// StudyParams
// ============================================================================

/// 학습 요청 파라미터 (호출마다 새로 생성)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyParams {
    pub mode: StudyMode,
    /// 선택적 포커스 주제
    pub focus: Option<String>,
    /// 퀴즈 문항 수 (quiz 모드에서만 의미 있음)
    pub num_questions: u32,
    pub difficulty: Difficulty,
    /// 프롬프트에 넣을 최대 청크 수
    pub max_chunks: usize,
}

impl StudyParams {
    pub fn new(mode: StudyMode) -> Self {
        Self {
            mode,
            focus: None,
            num_questions: DEFAULT_NUM_QUESTIONS,
            difficulty: Difficulty::default(),
            max_chunks: DEFAULT_MAX_CHUNKS,
        }
    }

    pub fn with_focus(mut self, focus: impl Into<String>) -> Self {
        self.focus = Some(focus.into());
        self
    }

    pub fn with_num_questions(mut self, num_questions: u32) -> Self {
        self.num_questions = num_questions;
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_max_chunks(mut self, max_chunks: usize) -> Self {
        self.max_chunks = max_chunks;
        self
    }

    /// 공백뿐인 포커스는 없는 것으로 취급
    pub fn focus(&self) -> Option<&str> {
        self.focus
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_NUM_QUESTIONS..=MAX_NUM_QUESTIONS).contains(&self.num_questions) {
            return Err(StudyError::invalid(format!(
                "num_questions must be between {} and {} (got {})",
                MIN_NUM_QUESTIONS, MAX_NUM_QUESTIONS, self.num_questions
            )));
        }
        if self.max_chunks == 0 {
            return Err(StudyError::invalid("max_chunks must be > 0"));
        }
        Ok(())
    }
}

// ============================================================================
// Request / Response
// ============================================================================

fn default_num_questions() -> u32 {
    DEFAULT_NUM_QUESTIONS
}

/// 학습 요청 본문
#[derive(Debug, Clone, Deserialize)]
pub struct StudyRequest {
    pub doc_id: String,
    pub mode: StudyMode,
    #[serde(default)]
    pub focus: Option<String>,
    #[serde(default = "default_num_questions")]
    pub num_questions: u32,
    #[serde(default)]
    pub difficulty: Difficulty,
}

impl StudyRequest {
    pub fn params(&self, max_chunks: usize) -> StudyParams {
        StudyParams {
            mode: self.mode,
            focus: self.focus.clone(),
            num_questions: self.num_questions,
            difficulty: self.difficulty,
            max_chunks,
        }
    }
}

/// 학습 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyResponse {
    pub doc_id: String,
    pub mode: StudyMode,
    pub output: String,
    pub used_chunks: usize,
    #[serde(default)]
    pub warnings: Vec<String>,
}

// ============================================================================
// Tests
// ============================================================================
