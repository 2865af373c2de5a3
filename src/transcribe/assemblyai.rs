use crate::config::CaptionFormat;
use crate::error::{Result, SubgenError};
use crate::settings::CaptionSettings;
use crate::transcribe::{
    JobHandle, JobStatus, SpeakerTurn, SpeechService, TranscriptResult, TranscriptionOptions,
    WordTiming,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::debug;

/// AssemblyAI API base URL.
const DEFAULT_BASE_URL: &str = "https://api.assemblyai.com";

/// Default interval between status polls.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// AssemblyAI HTTP client.
///
/// Every operation is a single attempt. There is no retry or backoff: a
/// transport failure or vendor error aborts the current user action.
pub struct AssemblyAiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    poll_interval: Duration,
}

impl AssemblyAiClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Point the client at a different API host (used by tests).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Set the interval between status polls.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Upload raw media bytes, returning the vendor's transient URL for them.
    async fn upload(&self, media: &Path) -> Result<String> {
        let bytes = fs::read(media).await?;
        debug!("Uploading {} bytes from {:?}", bytes.len(), media);

        let response = self
            .client
            .post(format!("{}/v2/upload", self.base_url))
            .header("authorization", &self.api_key)
            .header("content-type", "application/octet-stream")
            .body(bytes)
            .send()
            .await?;

        let upload: UploadResponse = Self::parse_response(response, "upload").await?;
        Ok(upload.upload_url)
    }

    /// Create the transcription job for an already-uploaded file.
    async fn create_job(&self, audio_url: &str, options: &TranscriptionOptions) -> Result<JobHandle> {
        // One hint selects the language outright; none defers to the
        // vendor's automatic detection and code-switching handling.
        let (language_code, language_detection) = match options.language_hints.first() {
            Some(code) => (Some(code.clone()), None),
            None => (None, Some(true)),
        };

        let request = CreateTranscriptRequest {
            audio_url: audio_url.to_string(),
            speaker_labels: options.diarization,
            language_code,
            language_detection,
        };

        let response = self
            .client
            .post(format!("{}/v2/transcript", self.base_url))
            .header("authorization", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let envelope: TranscriptEnvelope = Self::parse_response(response, "create").await?;
        debug!("Created transcript job {}", envelope.id);
        Ok(JobHandle { id: envelope.id })
    }

    /// Fetch the current job envelope once.
    async fn poll_once(&self, handle: &JobHandle) -> Result<TranscriptEnvelope> {
        let response = self
            .client
            .get(format!("{}/v2/transcript/{}", self.base_url, handle.id))
            .header("authorization", &self.api_key)
            .send()
            .await?;

        Self::parse_response(response, "status").await
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        operation: &str,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            let parsed = serde_json::from_str(&body)?;
            return Ok(parsed);
        }

        let error_body = response.text().await.unwrap_or_default();
        if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&error_body) {
            return Err(SubgenError::Api(format!(
                "AssemblyAI {} error: {}",
                operation, api_error.error
            )));
        }

        Err(SubgenError::Api(format!(
            "AssemblyAI {} error ({}): {}",
            operation, status, error_body
        )))
    }

    fn to_result(envelope: TranscriptEnvelope) -> TranscriptResult {
        let words = envelope
            .words
            .unwrap_or_default()
            .into_iter()
            .map(|w| WordTiming {
                text: w.text,
                start: Duration::from_millis(w.start),
                end: Duration::from_millis(w.end),
                speaker: w.speaker,
            })
            .collect();

        let utterances = envelope
            .utterances
            .unwrap_or_default()
            .into_iter()
            .map(|u| SpeakerTurn {
                speaker: format!("Speaker {}", u.speaker),
                text: u.text,
                start: Duration::from_millis(u.start),
                end: Duration::from_millis(u.end),
            })
            .collect();

        TranscriptResult {
            id: envelope.id,
            status: envelope.status,
            text: envelope.text.unwrap_or_default(),
            words,
            utterances,
            language: envelope.language_code,
            error: envelope.error,
        }
    }
}

#[async_trait]
impl SpeechService for AssemblyAiClient {
    async fn submit(&self, media: &Path, options: &TranscriptionOptions) -> Result<JobHandle> {
        let audio_url = self.upload(media).await?;
        debug!("Upload complete: {}", audio_url);
        self.create_job(&audio_url, options).await
    }

    async fn await_result(&self, handle: &JobHandle) -> Result<TranscriptResult> {
        loop {
            let envelope = self.poll_once(handle).await?;
            debug!("Job {} status: {:?}", handle.id, envelope.status);

            if envelope.status.is_terminal() {
                return Ok(Self::to_result(envelope));
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn export_captions(
        &self,
        handle: &JobHandle,
        format: CaptionFormat,
        settings: &CaptionSettings,
    ) -> Result<String> {
        let response = self
            .client
            .get(format!(
                "{}/v2/transcript/{}/{}",
                self.base_url,
                handle.id,
                format.extension()
            ))
            .header("authorization", &self.api_key)
            .query(&[
                ("chars_per_caption", settings.max_chars_per_line().to_string()),
                ("max_lines", settings.lines_per_block().to_string()),
                ("subtitle_gap", settings.gap_seconds().to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.text().await?);
        }

        let error_body = response.text().await.unwrap_or_default();
        Err(SubgenError::Api(format!(
            "AssemblyAI {} export error ({}): {}",
            format, status, error_body
        )))
    }

    fn name(&self) -> &'static str {
        "AssemblyAI"
    }
}

// Request/Response types

#[derive(Serialize)]
struct CreateTranscriptRequest {
    audio_url: String,
    speaker_labels: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    language_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language_detection: Option<bool>,
}

#[derive(Deserialize)]
struct UploadResponse {
    upload_url: String,
}

#[derive(Deserialize)]
struct TranscriptEnvelope {
    id: String,
    status: JobStatus,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    words: Option<Vec<ApiWord>>,
    #[serde(default)]
    utterances: Option<Vec<ApiUtterance>>,
    #[serde(default)]
    language_code: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct ApiWord {
    text: String,
    start: u64,
    end: u64,
    #[serde(default)]
    speaker: Option<String>,
}

#[derive(Deserialize)]
struct ApiUtterance {
    speaker: String,
    text: String,
    start: u64,
    end: u64,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(status: JobStatus) -> TranscriptEnvelope {
        TranscriptEnvelope {
            id: "job-1".to_string(),
            status,
            text: Some("Hello world.".to_string()),
            words: Some(vec![
                ApiWord {
                    text: "Hello".to_string(),
                    start: 100,
                    end: 480,
                    speaker: Some("A".to_string()),
                },
                ApiWord {
                    text: "world.".to_string(),
                    start: 520,
                    end: 900,
                    speaker: Some("A".to_string()),
                },
            ]),
            utterances: Some(vec![ApiUtterance {
                speaker: "A".to_string(),
                text: "Hello world.".to_string(),
                start: 100,
                end: 900,
            }]),
            language_code: Some("en".to_string()),
            error: None,
        }
    }

    #[test]
    fn test_status_parsing() {
        let status: JobStatus = serde_json::from_str("\"queued\"").unwrap();
        assert_eq!(status, JobStatus::Queued);
        let status: JobStatus = serde_json::from_str("\"completed\"").unwrap();
        assert!(status.is_terminal());
        let status: JobStatus = serde_json::from_str("\"error\"").unwrap();
        assert!(status.is_terminal());
        let status: JobStatus = serde_json::from_str("\"processing\"").unwrap();
        assert!(!status.is_terminal());
    }

    #[test]
    fn test_envelope_to_result_timings() {
        let result = AssemblyAiClient::to_result(envelope(JobStatus::Completed));

        assert!(result.is_completed());
        assert_eq!(result.text, "Hello world.");
        assert_eq!(result.words.len(), 2);
        assert_eq!(result.words[0].start, Duration::from_millis(100));
        assert_eq!(result.words[1].end, Duration::from_millis(900));
        assert_eq!(result.utterances.len(), 1);
        assert_eq!(result.utterances[0].speaker, "Speaker A");
        assert_eq!(result.language.as_deref(), Some("en"));
    }

    #[test]
    fn test_error_envelope_carries_message() {
        let mut env = envelope(JobStatus::Error);
        env.error = Some("Audio file is corrupted".to_string());
        env.text = None;
        env.words = None;
        env.utterances = None;

        let result = AssemblyAiClient::to_result(env);
        assert!(!result.is_completed());
        assert_eq!(result.error_message(), "Audio file is corrupted");
        assert!(result.text.is_empty());
        assert!(result.words.is_empty());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = AssemblyAiClient::new("key".to_string())
            .with_base_url("http://localhost:9090/".to_string());
        assert_eq!(client.base_url, "http://localhost:9090");
    }
}
