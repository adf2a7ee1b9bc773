//! Study Engine - 모드별 학습 결과 생성
//!
//! 문서 조회 → 프롬프트 조립 → (텍스트 생성 백엔드 또는 플레이스홀더 출력)

use std::sync::Arc;

use crate::error::Result;
use crate::knowledge::DocumentStore;
use crate::llm::TextGenerator;

use super::params::{StudyMode, StudyParams, StudyResponse};
use super::prompt::{assemble_prompt, AssembledPrompt};

/// 미리보기에 포함할 프롬프트 문자 수
const PREVIEW_CHARS: usize = 500;

/// 청크가 없는 문서에 붙는 경고
pub const NO_TEXT_WARNING: &str = "Document has no extractable text";

/// 모드별 시스템 지시문
pub fn system_instructions(mode: StudyMode) -> &'static str {
    match mode {
        StudyMode::Summarize => {
            "You are an AI Study Buddy. Summarize the provided context as concise bullet points. \
             Use only the context; do not invent facts."
        }
        StudyMode::Explain => {
            "You are an AI Study Buddy. Explain the focus topic step by step for a student, \
             covering what it is, why it matters, common mistakes and a short example. \
             Use only the context; do not invent facts."
        }
        StudyMode::Quiz => {
            "You are an AI Study Buddy. Write numbered quiz questions at the requested difficulty, \
             each followed by its answer. Use only the context; do not invent facts."
        }
    }
}

/// 백엔드 없이 만드는 모드별 출력 골격
pub fn placeholder_output(params: &StudyParams, assembled: &AssembledPrompt) -> String {
    match params.mode {
        StudyMode::Summarize => format!(
            "📝 Summary\n\
             - Key idea 1\n\
             - Key idea 2\n\
             - Key idea 3\n\n\
             Context preview used:\n\
             {}...",
            preview(&assembled.prompt)
        ),
        StudyMode::Explain => format!(
            "📘 Explanation — {}\n\
             1) What it is: ...\n\
             2) Why it matters: ...\n\
             3) Common mistakes: ...\n\
             4) Mini example: ...\n\n\
             Context preview used:\n\
             {}...",
            params.focus().unwrap_or("the main ideas"),
            preview(&assembled.prompt)
        ),
        StudyMode::Quiz => {
            let questions: Vec<String> = (1..=params.num_questions)
                .map(|i| {
                    format!(
                        "{}. ({}) Question {} based on the PDF text...",
                        i, params.difficulty, i
                    )
                })
                .collect();
            format!("🧠 Quiz\n{}", questions.join("\n"))
        }
    }
}

fn preview(prompt: &str) -> String {
    prompt.chars().take(PREVIEW_CHARS).collect()
}

// ============================================================================
// StudyEngine
// ============================================================================

/// 학습 엔진
///
/// 저장소와 (선택적) 텍스트 생성 백엔드를 생성자로 주입받습니다.
#[derive(Clone)]
pub struct StudyEngine {
    store: DocumentStore,
    generator: Option<Arc<dyn TextGenerator>>,
}

impl StudyEngine {
    /// 플레이스홀더 출력만 하는 엔진
    pub fn new(store: DocumentStore) -> Self {
        Self {
            store,
            generator: None,
        }
    }

    /// 텍스트 생성 백엔드를 사용하는 엔진
    pub fn with_generator(store: DocumentStore, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            store,
            generator: Some(generator),
        }
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// 문서에 대해 학습 모드 실행
    pub async fn run(&self, doc_id: &str, params: &StudyParams) -> Result<StudyResponse> {
        params.validate()?;
        let doc = self.store.get(doc_id)?;

        let assembled = assemble_prompt(params, &doc.chunks);

        let mut warnings = Vec::new();
        if doc.chunks.is_empty() {
            warnings.push(NO_TEXT_WARNING.to_string());
        }

        let output = match &self.generator {
            Some(generator) => {
                tracing::debug!("Generating {} output with {}", params.mode, generator.name());
                generator
                    .generate(system_instructions(params.mode), &assembled.prompt)
                    .await?
            }
            None => placeholder_output(params, &assembled),
        };

        tracing::info!(
            "[study] doc_id={} mode={} used_chunks={}",
            doc_id,
            params.mode,
            assembled.used_chunks
        );

        Ok(StudyResponse {
            doc_id: doc.doc_id.clone(),
            mode: params.mode,
            output,
            used_chunks: assembled.used_chunks,
            warnings,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
