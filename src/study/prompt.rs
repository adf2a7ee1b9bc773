//! Prompt Assembler
//!
//! 선택된 청크와 요청 파라미터를 하나의 프롬프트 문자열로 조립합니다.
//! 텍스트 생성 백엔드는 호출하지 않습니다.

use crate::knowledge::select_relevant_chunks;

use super::params::{StudyMode, StudyParams};

/// 청크 사이 구분자
pub const CHUNK_SEPARATOR: &str = "\n\n---\n\n";

const ROLE_LINE: &str = "You are an AI Study Buddy.";

/// 조립된 프롬프트
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledPrompt {
    pub prompt: String,
    /// 프롬프트에 포함된 청크 수
    pub used_chunks: usize,
}

/// 프롬프트 조립
///
/// 헤더 형식:
/// ```text
/// You are an AI Study Buddy.
/// Task: <mode>
/// Focus topic: <focus>        (포커스가 있을 때만)
/// Difficulty: <difficulty>
/// Number of questions: <n>    (quiz 모드에서만)
///
/// Context:
/// <chunk>\n\n---\n\n<chunk>...
/// ```
pub fn assemble_prompt(params: &StudyParams, chunks: &[String]) -> AssembledPrompt {
    let focus = params.focus();
    let selected = select_relevant_chunks(chunks, focus, params.max_chunks);

    let mut prompt = format!("{}\nTask: {}\n", ROLE_LINE, params.mode);
    if let Some(focus) = focus {
        prompt.push_str(&format!("Focus topic: {}\n", focus));
    }
    prompt.push_str(&format!("Difficulty: {}\n", params.difficulty));
    if params.mode == StudyMode::Quiz {
        prompt.push_str(&format!("Number of questions: {}\n", params.num_questions));
    }

    prompt.push_str("\nContext:\n");
    prompt.push_str(&selected.join(CHUNK_SEPARATOR));

    AssembledPrompt {
        prompt,
        used_chunks: selected.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::study::params::Difficulty;

    fn chunks(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_quiz_prompt() {
        let params = StudyParams::new(StudyMode::Quiz)
            .with_num_questions(3)
            .with_difficulty(Difficulty::Easy);
        let assembled = assemble_prompt(&params, &chunks(&["c1", "c2"]));

        assert_eq!(assembled.used_chunks, 2);
        assert!(assembled.prompt.contains("Number of questions: 3"));
        assert!(assembled.prompt.contains("Difficulty: easy"));
        assert!(!assembled.prompt.contains("Focus topic"));
    }

    #[test]
    fn test_exact_layout() {
        let params = StudyParams::new(StudyMode::Explain).with_focus("limits");
        let assembled = assemble_prompt(&params, &chunks(&["about limits", "other", "limits again"]));

        assert_eq!(
            assembled.prompt,
            "You are an AI Study Buddy.\n\
             Task: explain\n\
             Focus topic: limits\n\
             Difficulty: mixed\n\
             \n\
             Context:\n\
             about limits\n\n---\n\nlimits again"
        );
        assert_eq!(assembled.used_chunks, 2);
    }

    #[test]
    fn test_non_quiz_omits_question_count() {
        let params = StudyParams::new(StudyMode::Summarize).with_num_questions(12);
        let assembled = assemble_prompt(&params, &chunks(&["only"]));
        assert!(!assembled.prompt.contains("Number of questions"));
        assert!(assembled.prompt.starts_with("You are an AI Study Buddy.\nTask: summarize\n"));
    }

    #[test]
    fn test_empty_chunks() {
        let params = StudyParams::new(StudyMode::Summarize);
        let assembled = assemble_prompt(&params, &[]);
        assert_eq!(assembled.used_chunks, 0);
        assert!(assembled.prompt.ends_with("Context:\n"));
    }

    #[test]
    fn test_max_chunks_respected() {
        let params = StudyParams::new(StudyMode::Summarize).with_max_chunks(2);
        let assembled = assemble_prompt(&params, &chunks(&["a", "b", "c", "d"]));
        assert_eq!(assembled.used_chunks, 2);
        assert!(assembled.prompt.ends_with("a\n\n---\n\nb"));
    }
}
