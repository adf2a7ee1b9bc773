//! 에러 타입
//!
//! 라이브러리 경계에서 사용하는 에러 분류입니다.
//! CLI 계층은 anyhow로 감싸서 사용합니다.

use thiserror::Error;

/// study-buddy 에러
#[derive(Debug, Error)]
pub enum StudyError {
    /// 잘못된 파라미터 (청킹 설정, 학습 요청 범위 등)
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// 존재하지 않는 문서 ID
    #[error("document not found: {0}")]
    NotFound(String),

    /// 텍스트 생성 백엔드 실패 (설정 누락, 전송 실패)
    #[error("generation failed: {0}")]
    GenerationFailure(String),

    /// PDF 텍스트 추출 실패
    #[error("failed to extract PDF text: {0}")]
    Extraction(String),

    /// 저장소 락 오류
    #[error("storage error: {0}")]
    Storage(String),
}

impl StudyError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub fn generation(msg: impl Into<String>) -> Self {
        Self::GenerationFailure(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, StudyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StudyError::invalid("overlap must be smaller than max_chars");
        assert_eq!(
            err.to_string(),
            "invalid parameter: overlap must be smaller than max_chars"
        );

        let err = StudyError::NotFound("abc".to_string());
        assert_eq!(err.to_string(), "document not found: abc");
    }
}
