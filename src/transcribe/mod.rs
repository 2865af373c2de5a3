pub mod assemblyai;

pub use assemblyai::AssemblyAiClient;

use crate::config::CaptionFormat;
use crate::error::Result;
use crate::settings::CaptionSettings;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// Reference to a transcription job owned by the external service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    pub id: String,
}

/// Status reported by the external service for a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Error,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }
}

/// One word with its timing, as reported by the service.
#[derive(Debug, Clone)]
pub struct WordTiming {
    pub text: String,
    pub start: Duration,
    pub end: Duration,
    pub speaker: Option<String>,
}

/// A contiguous turn attributed to one speaker.
#[derive(Debug, Clone)]
pub struct SpeakerTurn {
    pub speaker: String,
    pub text: String,
    pub start: Duration,
    pub end: Duration,
}

/// Terminal state of a transcription job. When `status` is `Error`, `error`
/// carries the provider's message verbatim and the other fields are empty.
#[derive(Debug, Clone)]
pub struct TranscriptResult {
    pub id: String,
    pub status: JobStatus,
    pub text: String,
    pub words: Vec<WordTiming>,
    pub utterances: Vec<SpeakerTurn>,
    pub language: Option<String>,
    pub error: Option<String>,
}

impl TranscriptResult {
    pub fn is_completed(&self) -> bool {
        self.status == JobStatus::Completed
    }

    /// Provider error text for a failed job.
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("unknown provider error")
    }
}

/// Options forwarded with the job submission.
#[derive(Debug, Clone, Default)]
pub struct TranscriptionOptions {
    pub diarization: bool,
    pub language_hints: Vec<String>,
}

impl TranscriptionOptions {
    pub fn from_settings(settings: &CaptionSettings) -> Self {
        Self {
            diarization: settings.diarization(),
            language_hints: settings.language_hints().to_vec(),
        }
    }
}

/// Seam over the hosted speech-to-text service. One attempt per call, no
/// retry: a failure anywhere is terminal for the current user action.
#[async_trait]
pub trait SpeechService: Send + Sync {
    /// Upload the staged media file and create a transcription job.
    async fn submit(&self, media: &Path, options: &TranscriptionOptions) -> Result<JobHandle>;

    /// Block until the job reaches a terminal status and return it. A job
    /// that reached `Error` status is returned, not raised, so the caller
    /// can surface the provider's message.
    async fn await_result(&self, handle: &JobHandle) -> Result<TranscriptResult>;

    /// Ask the service to render the completed transcript as caption text,
    /// passing the formatting parameters through unchanged.
    async fn export_captions(
        &self,
        handle: &JobHandle,
        format: CaptionFormat,
        settings: &CaptionSettings,
    ) -> Result<String>;

    fn name(&self) -> &'static str;
}
