//! 텍스트 생성 모듈 - Azure OpenAI Chat Completions
//!
//! (시스템 지시문, 프롬프트) → 텍스트 를 생성하는 외부 백엔드입니다.
//! 설정 누락이나 전송 실패는 모두 `GenerationFailure`로 반환합니다.
//!
//! ## 사용법
//! ```rust,ignore
//! let client = AzureOpenAiClient::from_env()?;
//! let answer = client.generate("You are a tutor.", &prompt).await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StudyError};

// ============================================================================
// TextGenerator Trait
// ============================================================================

/// 텍스트 생성 백엔드 트레이트
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// 시스템 지시문과 프롬프트로 텍스트 생성
    async fn generate(&self, system: &str, prompt: &str) -> Result<String>;

    /// 백엔드 이름
    fn name(&self) -> &str;
}

// ============================================================================
// Configuration
// ============================================================================

/// 기본 temperature
const DEFAULT_TEMPERATURE: f32 = 0.2;
/// 요청 타임아웃
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
/// 429 / 전송 실패 시 최대 재시도 횟수
const MAX_RETRIES: u32 = 3;
/// 재시도 시 초기 백오프 (ms)
const INITIAL_BACKOFF_MS: u64 = 2000;

/// Azure OpenAI 설정
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
    pub deployment: String,
    pub temperature: f32,
}

impl LlmConfig {
    /// 환경변수에서 설정 로드
    ///
    /// `AZURE_OPENAI_ENDPOINT`, `AZURE_OPENAI_API_KEY`,
    /// `AZURE_OPENAI_API_VERSION`, `AZURE_OPENAI_DEPLOYMENT` 모두 필요합니다.
    pub fn from_env() -> Result<Self> {
        let read = |key: &'static str| {
            std::env::var(key)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(key)
        };

        let values = [
            read("AZURE_OPENAI_ENDPOINT"),
            read("AZURE_OPENAI_API_KEY"),
            read("AZURE_OPENAI_API_VERSION"),
            read("AZURE_OPENAI_DEPLOYMENT"),
        ];

        let missing: Vec<&str> = values.iter().filter_map(|v| v.as_ref().err().copied()).collect();
        if !missing.is_empty() {
            return Err(StudyError::generation(format!(
                "missing Azure OpenAI configuration: {}",
                missing.join(", ")
            )));
        }

        let [endpoint, api_key, api_version, deployment] = values.map(|v| v.unwrap_or_default());

        Ok(Self {
            endpoint,
            api_key,
            api_version,
            deployment,
            temperature: DEFAULT_TEMPERATURE,
        })
    }

    /// Chat Completions 요청 URL
    pub fn chat_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        )
    }
}

/// 설정 존재 여부 확인
pub fn has_llm_config() -> bool {
    LlmConfig::from_env().is_ok()
}

// ============================================================================
// Azure OpenAI Client
// ============================================================================

/// Azure OpenAI Chat Completions 클라이언트
#[derive(Debug)]
pub struct AzureOpenAiClient {
    config: LlmConfig,
    client: reqwest::Client,
    initial_backoff: Duration,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI 형식 에러 응답
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

impl AzureOpenAiClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StudyError::generation(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            initial_backoff: Duration::from_millis(INITIAL_BACKOFF_MS),
        })
    }

    /// 환경변수 설정으로 생성
    pub fn from_env() -> Result<Self> {
        let client = Self::new(LlmConfig::from_env()?)?;
        tracing::info!("Using Azure OpenAI deployment: {}", client.config.deployment);
        Ok(client)
    }

    /// 재시도 초기 백오프 변경
    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.initial_backoff * 2u32.pow(attempt)
    }
}

#[async_trait]
impl TextGenerator for AzureOpenAiClient {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.config.temperature,
        };
        let url = self.config.chat_url();

        let mut last_error: Option<StudyError> = None;

        // 재시도 루프 (429 / 전송 실패 시 지수 백오프)
        for attempt in 0..=MAX_RETRIES {
            let response = match self
                .client
                .post(&url)
                .header("api-key", &self.config.api_key)
                .json(&request)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    last_error = Some(StudyError::generation(format!(
                        "Failed to send chat request: {}",
                        e
                    )));
                    if attempt < MAX_RETRIES {
                        let backoff = self.backoff(attempt);
                        tracing::warn!(
                            "Chat request failed, retrying in {:?} (attempt {}/{})",
                            backoff,
                            attempt + 1,
                            MAX_RETRIES
                        );
                        tokio::time::sleep(backoff).await;
                        continue;
                    }
                    break;
                }
            };

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| StudyError::generation(format!("Failed to read response body: {}", e)))?;

            if status.is_success() {
                let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
                    StudyError::generation(format!("Failed to parse chat response: {}", e))
                })?;
                return Ok(parsed
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|c| c.message.content)
                    .unwrap_or_default());
            }

            if status.as_u16() == 429 {
                last_error = Some(StudyError::generation("Rate limit exceeded (429)"));
                if attempt < MAX_RETRIES {
                    let backoff = self.backoff(attempt);
                    tracing::warn!(
                        "Rate limit hit (429), backing off {:?} (attempt {}/{})",
                        backoff,
                        attempt + 1,
                        MAX_RETRIES
                    );
                    tokio::time::sleep(backoff).await;
                    continue;
                }
            } else {
                if let Ok(error) = serde_json::from_str::<ApiError>(&body) {
                    return Err(StudyError::generation(format!(
                        "Azure OpenAI error ({}): {}",
                        error.error.code.unwrap_or_else(|| status.to_string()),
                        error.error.message
                    )));
                }
                return Err(StudyError::generation(format!(
                    "Azure OpenAI error ({}): {}",
                    status, body
                )));
            }
        }

        Err(last_error.unwrap_or_else(|| {
            StudyError::generation(format!("Chat completion failed after {} retries", MAX_RETRIES))
        }))
    }

    fn name(&self) -> &str {
        "azure-openai"
    }
}

// ============================================================================
// Tests
// ============================================================================
