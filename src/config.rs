//! 서버 설정
//!
//! 기본값은 여기서 한 번 정의하고, CLI 플래그(또는 대응 환경변수)로 덮어씁니다.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::error::{Result, StudyError};
use crate::knowledge::{ChunkConfig, DEFAULT_MAX_CHUNKS};

/// 기본 바인드 주소
pub const DEFAULT_BIND: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8000);
/// 기본 CORS 허용 origin (프론트엔드 개발 서버)
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
/// 업로드 최대 크기 (25 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;
/// 업로드 응답 미리보기 문자 수
pub const UPLOAD_PREVIEW_CHARS: usize = 800;

/// 애플리케이션 설정
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub cors_origin: String,
    pub chunk: ChunkConfig,
    /// 학습 요청당 프롬프트에 넣을 최대 청크 수
    pub max_chunks: usize,
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND,
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            chunk: ChunkConfig::default(),
            max_chunks: DEFAULT_MAX_CHUNKS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        self.chunk.validate()?;
        if self.max_chunks == 0 {
            return Err(StudyError::invalid("max_chunks must be > 0"));
        }
        if self.cors_origin.trim().is_empty() {
            return Err(StudyError::invalid("cors_origin must not be empty"));
        }
        Ok(())
    }
}
