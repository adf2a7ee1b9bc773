//! CLI 모듈
//!
//! study-buddy CLI 명령어 정의 및 구현

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::config::{AppConfig, DEFAULT_BIND, DEFAULT_CORS_ORIGIN};
use crate::extractor::extract_file;
use crate::knowledge::{
    ChunkConfig, DocumentStore, NewDocument, DEFAULT_MAX_CHARS, DEFAULT_MAX_CHUNKS,
    DEFAULT_OVERLAP,
};
use crate::llm::{has_llm_config, AzureOpenAiClient};
use crate::server::{serve, AppState};
use crate::study::{Difficulty, StudyEngine, StudyMode, StudyParams, DEFAULT_NUM_QUESTIONS};

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Parser)]
#[command(name = "study-buddy")]
#[command(version, about = "PDF 기반 AI 학습 도우미", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 청킹 관련 공통 옵션
#[derive(Args, Debug, Clone)]
pub struct ChunkArgs {
    /// 최대 청크 크기 (문자 수)
    #[arg(long, env = "STUDY_BUDDY_MAX_CHARS", default_value_t = DEFAULT_MAX_CHARS)]
    pub max_chars: usize,

    /// 청크 간 오버랩 (문자 수)
    #[arg(long, env = "STUDY_BUDDY_OVERLAP", default_value_t = DEFAULT_OVERLAP)]
    pub overlap: usize,
}

impl ChunkArgs {
    fn config(&self) -> Result<ChunkConfig> {
        ChunkConfig::new(self.max_chars, self.overlap).context("잘못된 청킹 설정")
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// HTTP 서버 실행
    Serve {
        /// 바인드 주소
        #[arg(long, env = "STUDY_BUDDY_ADDR", default_value_t = DEFAULT_BIND)]
        addr: SocketAddr,

        /// CORS 허용 origin
        #[arg(long, env = "STUDY_BUDDY_CORS_ORIGIN", default_value = DEFAULT_CORS_ORIGIN)]
        cors_origin: String,

        /// 학습 요청당 최대 청크 수
        #[arg(long, env = "STUDY_BUDDY_MAX_CHUNKS", default_value_t = DEFAULT_MAX_CHUNKS)]
        max_chunks: usize,

        #[command(flatten)]
        chunk: ChunkArgs,

        /// Azure OpenAI로 실제 답변 생성 (환경변수 필요)
        #[arg(long)]
        generate: bool,
    },

    /// 파일을 추출/청킹하고 결과 확인
    Ingest {
        /// PDF 또는 텍스트 파일
        file: PathBuf,

        #[command(flatten)]
        chunk: ChunkArgs,

        /// 출력할 청크 미리보기 수
        #[arg(short, long, default_value = "3")]
        preview: usize,
    },

    /// 파일 하나로 학습 모드 실행
    Study {
        /// PDF 또는 텍스트 파일
        file: PathBuf,

        /// 학습 모드
        #[arg(short, long, value_enum)]
        mode: StudyMode,

        /// 포커스 주제
        #[arg(short, long)]
        focus: Option<String>,

        /// 퀴즈 문항 수 (1-50)
        #[arg(short, long, default_value_t = DEFAULT_NUM_QUESTIONS)]
        num_questions: u32,

        /// 난이도
        #[arg(short, long, value_enum, default_value_t = Difficulty::Mixed)]
        difficulty: Difficulty,

        /// 최대 청크 수
        #[arg(long, default_value_t = DEFAULT_MAX_CHUNKS)]
        max_chunks: usize,

        #[command(flatten)]
        chunk: ChunkArgs,

        /// Azure OpenAI로 실제 답변 생성 (환경변수 필요)
        #[arg(long)]
        generate: bool,
    },
}

// ============================================================================
// CLI Runner
// ============================================================================

/// CLI 명령어 실행
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve {
            addr,
            cors_origin,
            max_chunks,
            chunk,
            generate,
        } => {
            let config = AppConfig {
                bind: addr,
                cors_origin,
                chunk: chunk.config()?,
                max_chunks,
                ..Default::default()
            };
            cmd_serve(config, generate).await
        }
        Commands::Ingest {
            file,
            chunk,
            preview,
        } => cmd_ingest(&file, chunk.config()?, preview).await,
        Commands::Study {
            file,
            mode,
            focus,
            num_questions,
            difficulty,
            max_chunks,
            chunk,
            generate,
        } => {
            let mut params = StudyParams::new(mode)
                .with_num_questions(num_questions)
                .with_difficulty(difficulty)
                .with_max_chunks(max_chunks);
            params.focus = focus;
            cmd_study(&file, chunk.config()?, params, generate).await
        }
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

/// 학습 엔진 생성 (`generate`면 Azure OpenAI 사용)
fn build_engine(store: DocumentStore, generate: bool) -> Result<StudyEngine> {
    if !generate {
        return Ok(StudyEngine::new(store));
    }

    let client = AzureOpenAiClient::from_env().context(
        "Azure OpenAI 설정이 없습니다.\n\
         설정: AZURE_OPENAI_ENDPOINT, AZURE_OPENAI_API_KEY, \
         AZURE_OPENAI_API_VERSION, AZURE_OPENAI_DEPLOYMENT",
    )?;
    Ok(StudyEngine::with_generator(store, Arc::new(client)))
}

/// 서버 명령어 (serve)
async fn cmd_serve(config: AppConfig, generate: bool) -> Result<()> {
    let engine = build_engine(DocumentStore::new(), generate)?;
    if !engine.has_generator() && has_llm_config() {
        tracing::info!("Azure OpenAI configured but --generate not set; using placeholder output");
    }

    println!("[*] study-buddy v{}", env!("CARGO_PKG_VERSION"));
    println!("[*] http://{}", config.bind);

    serve(AppState::new(engine, config)).await
}

/// 파일 추출 + 청킹 + 저장
async fn ingest_into(store: &DocumentStore, file: &Path, chunk: ChunkConfig) -> Result<String> {
    let content = extract_file(file)
        .await
        .with_context(|| format!("추출 실패: {}", file.display()))?;

    for warning in &content.warnings {
        println!("[!] {}", warning);
    }

    let chunks = chunk.chunk(&content.text)?;
    let filename = file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();

    let doc_id = store
        .save(NewDocument::new(filename, content.text, chunks).with_pages(content.num_pages))
        .context("문서 저장 실패")?;

    Ok(doc_id)
}

/// 수집 명령어 (ingest)
///
/// 추출/청킹 결과를 출력합니다. 저장소는 프로세스가 끝나면 사라집니다.
async fn cmd_ingest(file: &Path, chunk: ChunkConfig, preview: usize) -> Result<()> {
    println!("[*] 추출 중: {}", file.display());

    let store = DocumentStore::new();
    let doc_id = ingest_into(&store, file, chunk).await?;
    let doc = store.get(&doc_id)?;

    println!("[OK] {} (ID: {})", doc.filename, doc.doc_id);
    println!(
        "     페이지: {} | 텍스트: {} | 청크: {} (max {} / overlap {})",
        doc.num_pages.unwrap_or(0),
        format_bytes(doc.full_text.len()),
        doc.chunk_count(),
        chunk.max_chars,
        chunk.overlap
    );
    println!();

    for (i, c) in doc.chunks.iter().take(preview).enumerate() {
        println!("  #{:<3} [{} chars] {}", i, c.chars().count(), truncate_text(c, 100));
    }

    Ok(())
}

/// 학습 명령어 (study)
async fn cmd_study(
    file: &Path,
    chunk: ChunkConfig,
    params: StudyParams,
    generate: bool,
) -> Result<()> {
    params.validate().context("잘못된 학습 파라미터")?;

    let store = DocumentStore::new();
    let engine = build_engine(store.clone(), generate)?;
    let doc_id = ingest_into(&store, file, chunk).await?;

    let response = engine
        .run(&doc_id, &params)
        .await
        .context("학습 모드 실행 실패")?;

    println!("{}", response.output);
    println!();
    println!("[OK] mode={} used_chunks={}", response.mode, response.used_chunks);
    for warning in &response.warnings {
        println!("[!] {}", warning);
    }

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// 텍스트 자르기 (UTF-8 안전)
fn truncate_text(text: &str, max_chars: usize) -> String {
    let cleaned = text.replace('\n', " ").replace('\r', "");
    let cleaned = cleaned.trim();

    if cleaned.chars().count() <= max_chars {
        cleaned.to_string()
    } else {
        let truncated: String = cleaned.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}

/// 바이트 크기 포맷팅
fn format_bytes(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("hello", 10), "hello");
        assert_eq!(truncate_text("hello world", 5), "hello...");
        assert_eq!(truncate_text("hello\nworld", 20), "hello world");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(500), "500 B");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1048576), "1.00 MB");
    }

    #[test]
    fn test_parse_study_command() {
        let cli = Cli::try_parse_from([
            "study-buddy",
            "study",
            "notes.pdf",
            "--mode",
            "quiz",
            "--num-questions",
            "5",
            "--difficulty",
            "hard",
        ])
        .unwrap();

        match cli.command {
            Commands::Study {
                mode,
                num_questions,
                difficulty,
                max_chunks,
                chunk,
                ..
            } => {
                assert_eq!(mode, StudyMode::Quiz);
                assert_eq!(num_questions, 5);
                assert_eq!(difficulty, Difficulty::Hard);
                assert_eq!(max_chunks, 3);
                assert_eq!(chunk.max_chars, 1200);
                assert_eq!(chunk.overlap, 150);
            }
            _ => panic!("expected study command"),
        }
    }

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["study-buddy", "serve"]).unwrap();
        match cli.command {
            Commands::Serve {
                addr, max_chunks, ..
            } => {
                assert_eq!(addr, DEFAULT_BIND);
                assert_eq!(max_chunks, DEFAULT_MAX_CHUNKS);
            }
            _ => panic!("expected serve command"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_mode() {
        let result = Cli::try_parse_from(["study-buddy", "study", "notes.pdf", "--mode", "essay"]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_ingest_into_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "word ".repeat(100)).unwrap();

        let store = DocumentStore::new();
        let chunk = ChunkConfig::new(100, 20).unwrap();
        let id = ingest_into(&store, &path, chunk).await.unwrap();

        let doc = store.get(&id).unwrap();
        assert_eq!(doc.filename, "notes.txt");
        assert_eq!(doc.num_pages, Some(1));
        assert!(doc.chunk_count() > 1);
    }

    #[tokio::test]
    async fn test_cmd_study_placeholder() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "Derivatives measure change.").unwrap();

        let params = StudyParams::new(StudyMode::Explain).with_focus("derivatives");
        assert!(cmd_study(&path, ChunkConfig::default(), params, false)
            .await
            .is_ok());
    }
}
