use crate::config::CaptionFormat;
use crate::error::{Result, SubgenError};
use crate::settings::CaptionSettings;
use crate::transcribe::{JobHandle, SpeechService, TranscriptResult};

/// Download file name for the plain-text transcript.
pub const TRANSCRIPT_FILE_NAME: &str = "transcript.txt";
/// MIME type for the plain-text transcript.
pub const TRANSCRIPT_MIME: &str = "text/plain";

/// A rendered caption file ready to offer for download.
#[derive(Debug, Clone)]
pub struct CaptionArtifact {
    pub format: CaptionFormat,
    pub file_name: &'static str,
    pub mime_type: &'static str,
    pub content: String,
}

/// The full transcript text, offered alongside the captions for manual
/// proofreading.
#[derive(Debug, Clone)]
pub struct TranscriptArtifact {
    pub file_name: &'static str,
    pub mime_type: &'static str,
    pub content: String,
}

/// Ask the service to render the completed job as caption text and attach
/// the download metadata. All segmentation, line wrapping, and gap
/// enforcement happens inside the provider; the returned text is passed
/// through untouched.
pub async fn render(
    service: &dyn SpeechService,
    handle: &JobHandle,
    format: CaptionFormat,
    settings: &CaptionSettings,
) -> Result<CaptionArtifact> {
    let content = service.export_captions(handle, format, settings).await?;

    Ok(CaptionArtifact {
        format,
        file_name: format.file_name(),
        mime_type: format.mime_type(),
        content,
    })
}

/// Build the plain-text transcript artifact from a completed job.
pub fn transcript_artifact(result: &TranscriptResult) -> Result<TranscriptArtifact> {
    if !result.is_completed() {
        return Err(SubgenError::JobFailed(result.error_message().to_string()));
    }

    // With diarization on, prefer the speaker-labeled turns over the flat
    // text so the proofreading copy shows who said what.
    let content = if result.utterances.is_empty() {
        result.text.clone()
    } else {
        result
            .utterances
            .iter()
            .map(|u| format!("{}: {}", u.speaker, u.text))
            .collect::<Vec<_>>()
            .join("\n")
    };

    Ok(TranscriptArtifact {
        file_name: TRANSCRIPT_FILE_NAME,
        mime_type: TRANSCRIPT_MIME,
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcribe::{JobStatus, SpeakerTurn};
    use std::time::Duration;

    fn completed_result() -> TranscriptResult {
        TranscriptResult {
            id: "job-1".to_string(),
            status: JobStatus::Completed,
            text: "Hello there. General greeting.".to_string(),
            words: Vec::new(),
            utterances: Vec::new(),
            language: Some("en".to_string()),
            error: None,
        }
    }

    #[test]
    fn test_transcript_artifact_plain() {
        let artifact = transcript_artifact(&completed_result()).unwrap();
        assert_eq!(artifact.file_name, "transcript.txt");
        assert_eq!(artifact.mime_type, "text/plain");
        assert_eq!(artifact.content, "Hello there. General greeting.");
    }

    #[test]
    fn test_transcript_artifact_prefers_speaker_turns() {
        let mut result = completed_result();
        result.utterances = vec![
            SpeakerTurn {
                speaker: "Speaker A".to_string(),
                text: "Hello there.".to_string(),
                start: Duration::ZERO,
                end: Duration::from_secs(1),
            },
            SpeakerTurn {
                speaker: "Speaker B".to_string(),
                text: "General greeting.".to_string(),
                start: Duration::from_secs(1),
                end: Duration::from_secs(2),
            },
        ];

        let artifact = transcript_artifact(&result).unwrap();
        assert_eq!(
            artifact.content,
            "Speaker A: Hello there.\nSpeaker B: General greeting."
        );
    }

    #[test]
    fn test_transcript_artifact_rejects_failed_job() {
        let mut result = completed_result();
        result.status = JobStatus::Error;
        result.error = Some("Audio too short".to_string());

        let err = transcript_artifact(&result).unwrap_err();
        assert!(err.to_string().contains("Audio too short"));
    }
}
