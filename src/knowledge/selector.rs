//! Relevance Selector - 키워드 기반 청크 선택
//!
//! 포커스 문구에서 키워드를 뽑아 각 청크에서의 출현 횟수로 점수를 매기고,
//! 상위 청크를 반환합니다. 임베딩 없이 어휘 일치만 사용합니다.

use std::sync::LazyLock;

use regex::Regex;

/// 기본 선택 청크 수
pub const DEFAULT_MAX_CHUNKS: usize = 3;

/// 키워드 최소 길이 (이 길이 이하는 무시)
const MIN_KEYWORD_CHARS: usize = 2;

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("Invalid regex"));

/// 포커스 문구에서 키워드 추출
///
/// 영숫자/밑줄 연속 구간 중 3자 이상인 것만 소문자로 반환합니다.
pub fn extract_keywords(focus: &str) -> Vec<String> {
    WORD_RE
        .find_iter(focus)
        .map(|m| m.as_str())
        .filter(|w| w.chars().count() > MIN_KEYWORD_CHARS)
        .map(str::to_lowercase)
        .collect()
}

/// 청크 점수: 각 키워드가 (겹치지 않게) 부분 문자열로 나타난 횟수의 합
///
/// 단어 경계를 보지 않으므로 "cat"은 "category" 안에서도 일치합니다.
pub fn score_chunk(chunk: &str, keywords: &[String]) -> usize {
    let text = chunk.to_lowercase();
    keywords.iter().map(|k| text.matches(k.as_str()).count()).sum()
}

/// 포커스와 관련된 청크 선택
///
/// - 포커스가 없거나 키워드가 없으면 앞에서부터 `max_chunks`개
/// - 점수가 0인 청크는 제외, 점수 내림차순 (동점이면 원래 순서)
/// - 일치하는 청크가 하나도 없으면 앞에서부터 `max_chunks`개
pub fn select_relevant_chunks(
    chunks: &[String],
    focus: Option<&str>,
    max_chunks: usize,
) -> Vec<String> {
    let first_n = || chunks.iter().take(max_chunks).cloned().collect::<Vec<_>>();

    let Some(focus) = focus.filter(|f| !f.trim().is_empty()) else {
        return first_n();
    };

    let keywords = extract_keywords(focus);
    if keywords.is_empty() {
        return first_n();
    }

    let mut scored: Vec<(usize, &String)> = chunks
        .iter()
        .map(|chunk| (score_chunk(chunk, &keywords), chunk))
        .filter(|(score, _)| *score > 0)
        .collect();

    if scored.is_empty() {
        tracing::debug!("No chunk matched focus {:?}, falling back to first chunks", focus);
        return first_n();
    }

    // sort_by는 안정 정렬 → 동점은 원래 순서 유지
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    tracing::debug!(
        "Selected {} of {} matching chunks (top score {})",
        scored.len().min(max_chunks),
        scored.len(),
        scored[0].0
    );

    scored
        .into_iter()
        .take(max_chunks)
        .map(|(_, chunk)| chunk.clone())
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_focus_returns_first_chunks() {
        let input = chunks(&["a", "b", "c", "d"]);
        assert_eq!(select_relevant_chunks(&input, None, 3), chunks(&["a", "b", "c"]));
        assert_eq!(select_relevant_chunks(&input, Some(""), 2), chunks(&["a", "b"]));
        assert_eq!(select_relevant_chunks(&input, Some("   "), 1), chunks(&["a"]));
    }

    #[test]
    fn test_short_keywords_fall_back() {
        let input = chunks(&["of it", "an ox", "to be"]);
        assert_eq!(
            select_relevant_chunks(&input, Some("of an ox"), 2),
            chunks(&["of it", "an ox"])
        );
    }

    #[test]
    fn test_tie_keeps_original_order() {
        let input = chunks(&["cat dog", "dog cat", "bird"]);
        assert_eq!(
            select_relevant_chunks(&input, Some("dog"), 2),
            chunks(&["cat dog", "dog cat"])
        );
    }

    #[test]
    fn test_ranked_by_score() {
        let input = chunks(&[
            "nothing relevant here",
            "integration once",
            "integration by parts: integration twice",
        ]);
        let selected = select_relevant_chunks(&input, Some("Integration by parts"), 3);
        assert_eq!(
            selected,
            chunks(&["integration by parts: integration twice", "integration once"])
        );
    }

    #[test]
    fn test_no_match_falls_back() {
        let input = chunks(&["alpha", "beta", "gamma", "delta"]);
        assert_eq!(
            select_relevant_chunks(&input, Some("xyz123notfound"), 3),
            chunks(&["alpha", "beta", "gamma"])
        );
    }

    #[test]
    fn test_substring_match_inside_word() {
        let input = chunks(&["dogs", "category theory"]);
        assert_eq!(
            select_relevant_chunks(&input, Some("cat"), 3),
            chunks(&["category theory"])
        );
    }

    #[test]
    fn test_bounds() {
        let input = chunks(&["x one", "x two"]);
        assert!(select_relevant_chunks(&input, Some("one"), 5).len() <= 2);
        assert!(select_relevant_chunks(&[], Some("one"), 3).is_empty());
        assert!(!select_relevant_chunks(&input, Some("zzz"), 1).is_empty());
    }

    #[test]
    fn test_extract_keywords() {
        assert_eq!(
            extract_keywords("What IS the_chain rule? (ok)"),
            vec!["what", "the_chain", "rule"]
        );
        assert!(extract_keywords("a, an; of!").is_empty());
    }

    #[test]
    fn test_score_chunk_non_overlapping() {
        let keywords = vec!["aaa".to_string()];
        assert_eq!(score_chunk("AAAAAA", &keywords), 2);
        assert_eq!(score_chunk("aaaaa", &keywords), 1);
    }
}
