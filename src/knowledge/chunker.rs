//! Text Chunking Module
//!
//! 추출된 텍스트를 정규화한 뒤 고정 크기의 슬라이딩 윈도우로 분할합니다.
//! 윈도우 사이에 오버랩을 두어 청크 경계에서 문맥이 끊기지 않도록 합니다.
//!
//! 모든 길이와 위치는 바이트가 아닌 문자(char) 단위입니다.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StudyError};

/// 기본 최대 청크 크기 (문자 수)
pub const DEFAULT_MAX_CHARS: usize = 1200;
/// 기본 오버랩 크기 (문자 수)
pub const DEFAULT_OVERLAP: usize = 150;

static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("Invalid regex"));
static HORIZONTAL_WS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]{2,}").expect("Invalid regex"));

// ============================================================================
// Chunk Configuration
// ============================================================================

/// 청킹 설정
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// 최대 청크 크기 (문자 수)
    pub max_chars: usize,
    /// 연속된 청크 사이에 반복되는 문자 수
    pub overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
            overlap: DEFAULT_OVERLAP,
        }
    }
}

impl ChunkConfig {
    pub fn new(max_chars: usize, overlap: usize) -> Result<Self> {
        let config = Self { max_chars, overlap };
        config.validate()?;
        Ok(config)
    }

    /// `max_chars > 0` 이고 `overlap < max_chars` 인지 확인
    pub fn validate(&self) -> Result<()> {
        if self.max_chars == 0 {
            return Err(StudyError::invalid("max_chars must be > 0"));
        }
        if self.overlap >= self.max_chars {
            return Err(StudyError::invalid(format!(
                "overlap ({}) must be smaller than max_chars ({})",
                self.overlap, self.max_chars
            )));
        }
        Ok(())
    }

    /// 윈도우 이동 간격
    fn step(&self) -> usize {
        self.max_chars - self.overlap
    }

    /// 이 설정으로 텍스트 분할
    pub fn chunk(&self, text: &str) -> Result<Vec<String>> {
        chunk_text(text, self.max_chars, self.overlap)
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// 공백 정규화
///
/// 순서가 중요합니다:
/// 1. `\r\n`, `\r` → `\n`
/// 2. 3개 이상 연속 줄바꿈 → 2개
/// 3. 2개 이상 연속 스페이스/탭 → 스페이스 1개
/// 4. 앞뒤 공백 제거
pub fn normalize_text(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let collapsed = EXCESS_NEWLINES.replace_all(&unified, "\n\n");
    let collapsed = HORIZONTAL_WS.replace_all(&collapsed, " ");
    collapsed.trim().to_string()
}

// ============================================================================
// Sliding Window
// ============================================================================

/// 텍스트를 오버랩이 있는 청크로 분할
///
/// 정규화된 텍스트 위에서 `max_chars` 크기의 윈도우를 `max_chars - overlap`
/// 간격으로 이동시키며, 각 윈도우를 trim 한 결과가 비어있지 않을 때만 추가합니다.
/// 윈도우 끝이 텍스트 끝에 도달하면 멈춥니다.
///
/// # Errors
/// `max_chars == 0` 또는 `overlap >= max_chars` 이면 `InvalidParameter`
pub fn chunk_text(text: &str, max_chars: usize, overlap: usize) -> Result<Vec<String>> {
    let config = ChunkConfig { max_chars, overlap };
    config.validate()?;

    let normalized = normalize_text(text);
    if normalized.is_empty() {
        return Ok(vec![]);
    }

    // 문자 인덱스 → 바이트 오프셋 (마지막 원소는 전체 길이)
    let offsets: Vec<usize> = normalized
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(normalized.len()))
        .collect();
    let n = offsets.len() - 1;

    let mut chunks = Vec::with_capacity(n / config.step() + 1);
    let mut start = 0;

    while start < n {
        let end = (start + max_chars).min(n);
        let chunk = normalized[offsets[start]..offsets[end]].trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }

        if end >= n {
            break;
        }

        start += config.step();
    }

    Ok(chunks)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunker_empty() {
        assert!(chunk_text("", 100, 10).unwrap().is_empty());
        assert!(chunk_text(" \n\t\r\n  ", 100, 10).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            chunk_text("abc", 0, 0),
            Err(StudyError::InvalidParameter(_))
        ));
        assert!(matches!(
            chunk_text("abc", 10, 10),
            Err(StudyError::InvalidParameter(_))
        ));
        assert!(matches!(
            chunk_text("abc", 10, 20),
            Err(StudyError::InvalidParameter(_))
        ));
        assert!(ChunkConfig::new(10, 9).is_ok());
    }

    #[test]
    fn test_two_windows_with_overlap() {
        let text = "A".repeat(1500);
        let chunks = chunk_text(&text, 1000, 100).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 1000);
        assert_eq!(chunks[1].chars().count(), 600);
    }

    #[test]
    fn test_small_text_single_chunk() {
        let chunks = chunk_text("hello world", 1200, 150).unwrap();
        assert_eq!(chunks, vec!["hello world".to_string()]);
    }

    #[test]
    fn test_normalization() {
        let text = "  Line one\r\nLine\ttwo\r\r\r\rLine   three\t\t end  ";
        assert_eq!(
            normalize_text(text),
            "Line one\nLine\ttwo\n\nLine three end"
        );
    }

    #[test]
    fn test_normalization_order() {
        // \r\n 변환이 줄바꿈 축약보다 먼저 적용되어야 함
        assert_eq!(normalize_text("a\r\n\r\n\r\nb"), "a\n\nb");
    }

    #[test]
    fn test_concatenation_without_overlap() {
        let text = "abcdefghij".repeat(37);
        let chunks = chunk_text(&text, 64, 0).unwrap();
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_chunk_bounds() {
        let text = "The quick brown fox jumps over the lazy dog.\n\n".repeat(40);
        for (max_chars, overlap) in [(50, 0), (50, 49), (120, 30), (7, 3)] {
            let chunks = chunk_text(&text, max_chars, overlap).unwrap();
            assert!(!chunks.is_empty());
            for chunk in &chunks {
                assert!(chunk.chars().count() <= max_chars);
                assert!(!chunk.trim().is_empty());
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let text = "Some   text\r\nwith\n\n\n\nodd whitespace. ".repeat(30);
        let config = ChunkConfig::default();
        assert_eq!(config.chunk(&text).unwrap(), config.chunk(&text).unwrap());
    }

    #[test]
    fn test_whitespace_only_window_skipped() {
        // 두 번째 윈도우는 "\n \n " 만 포함 → 제외
        let text = "abcd\n \n efgh";
        let chunks = chunk_text(text, 4, 0).unwrap();
        assert_eq!(chunks, vec!["abcd", "efgh"]);
    }

    #[test]
    fn test_multibyte_chars() {
        let text = "안녕하세요 세계".repeat(10);
        let chunks = chunk_text(&text, 8, 2).unwrap();
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 8);
        }
        assert!(chunks[0].starts_with("안녕하세요"));
    }

    #[test]
    fn test_config_default() {
        let config = ChunkConfig::default();
        assert_eq!(config.max_chars, 1200);
        assert_eq!(config.overlap, 150);
        assert_eq!(ChunkConfig::new(500, 0).unwrap().overlap, 0);
    }
}
