//! Integration tests for subgen
//!
//! These tests validate the plumbing between components without requiring
//! an API key or a network connection.

use std::path::Path;
use std::time::Duration;
use subgen::config::{CaptionFormat, Config};
use subgen::export::{transcript_artifact, TRANSCRIPT_FILE_NAME, TRANSCRIPT_MIME};
use subgen::media::{MediaKind, StagedUpload, ACCEPTED_EXTENSIONS};
use subgen::pipeline::JobConfig;
use subgen::settings::{CaptionSettings, LinesPerBlock, MAX_GAP_MS};
use subgen::transcribe::{JobStatus, SpeakerTurn, TranscriptResult, TranscriptionOptions};

// ============================================================================
// Settings Collector Tests
// ============================================================================

mod settings_tests {
    use super::*;

    #[test]
    fn test_in_range_character_limits_accepted_unchanged() {
        for chars in 14..=60 {
            let settings = CaptionSettings::new(chars, 2, 200, true, Vec::new()).unwrap();
            assert_eq!(settings.max_chars_per_line(), chars);
        }
    }

    #[test]
    fn test_out_of_range_character_limits_rejected() {
        assert!(CaptionSettings::new(13, 2, 200, true, Vec::new()).is_err());
        assert!(CaptionSettings::new(61, 2, 200, true, Vec::new()).is_err());
    }

    #[test]
    fn test_widget_style_clamping() {
        let settings = CaptionSettings::clamped(200, LinesPerBlock::Two, 9999, true, Vec::new());
        assert_eq!(settings.max_chars_per_line(), 60);
        assert_eq!(settings.gap(), Duration::from_millis(MAX_GAP_MS));
    }

    #[test]
    fn test_line_count_limited_to_one_or_two() {
        for lines in [0u32, 3, 4, 100] {
            assert!(CaptionSettings::new(42, lines, 200, true, Vec::new()).is_err());
        }
        assert_eq!(
            CaptionSettings::new(42, 1, 200, true, Vec::new())
                .unwrap()
                .lines_per_block(),
            LinesPerBlock::One
        );
    }

    #[test]
    fn test_gap_converted_to_seconds_for_export() {
        for (ms, secs) in [(0u64, 0.0f64), (200, 0.2), (500, 0.5), (1000, 1.0)] {
            let settings = CaptionSettings::new(42, 2, ms, true, Vec::new()).unwrap();
            assert_eq!(settings.gap_seconds(), secs);
        }
    }

    #[test]
    fn test_options_derived_from_settings() {
        let settings =
            CaptionSettings::new(42, 2, 200, false, vec!["ja".to_string()]).unwrap();
        let options = TranscriptionOptions::from_settings(&settings);
        assert!(!options.diarization);
        assert_eq!(options.language_hints, vec!["ja".to_string()]);
    }
}

// ============================================================================
// Config Tests
// ============================================================================

mod config_tests {
    use super::*;

    #[test]
    fn test_missing_credential_is_blocking() {
        let config = Config {
            assemblyai_api_key: None,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_valid_config() {
        let config = Config {
            assemblyai_api_key: Some("key".to_string()),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_caption_format_download_metadata() {
        assert_eq!(CaptionFormat::Srt.file_name(), "transcript.srt");
        assert_eq!(CaptionFormat::Srt.mime_type(), "application/x-subrip");
        assert_eq!(CaptionFormat::Vtt.file_name(), "transcript.vtt");
        assert_eq!(CaptionFormat::Vtt.mime_type(), "text/vtt");
    }

    #[test]
    fn test_job_config_defaults_cover_both_formats() {
        let job = JobConfig::default();
        assert_eq!(job.formats, vec![CaptionFormat::Srt, CaptionFormat::Vtt]);
        assert!(job.write_transcript);
    }
}

// ============================================================================
// Media Staging Tests
// ============================================================================

mod media_tests {
    use super::*;

    #[test]
    fn test_accepted_container_types() {
        assert_eq!(ACCEPTED_EXTENSIONS, &["mp4", "mov", "wav", "mp3"]);
        for ext in ACCEPTED_EXTENSIONS {
            let name = format!("clip.{}", ext);
            assert!(MediaKind::from_path(Path::new(&name)).is_ok());
        }
    }

    #[test]
    fn test_rejected_container_types() {
        for name in ["clip.mkv", "clip.avi", "clip.txt", "clip"] {
            assert!(MediaKind::from_path(Path::new(name)).is_err());
        }
    }

    #[test]
    fn test_staged_file_removed_after_scope_ends() {
        let path = {
            let staged = StagedUpload::stage("clip.mp4", b"payload").unwrap();
            assert!(staged.path().exists());
            staged.path().to_path_buf()
        };
        // Removed whether the job succeeded or failed
        assert!(!path.exists());
    }

    #[test]
    fn test_staging_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("clip.wav");
        std::fs::write(&source, b"riff").unwrap();

        let staged = StagedUpload::from_file(&source).unwrap();
        assert_ne!(staged.path(), source.as_path());
        assert_eq!(std::fs::read(staged.path()).unwrap(), b"riff");
    }
}

// ============================================================================
// Export Artifact Tests
// ============================================================================

mod export_tests {
    use super::*;

    fn completed(text: &str, utterances: Vec<SpeakerTurn>) -> TranscriptResult {
        TranscriptResult {
            id: "job-1".to_string(),
            status: JobStatus::Completed,
            text: text.to_string(),
            words: Vec::new(),
            utterances,
            language: None,
            error: None,
        }
    }

    #[test]
    fn test_transcript_artifact_metadata() {
        let artifact = transcript_artifact(&completed("Hello.", Vec::new())).unwrap();
        assert_eq!(artifact.file_name, TRANSCRIPT_FILE_NAME);
        assert_eq!(artifact.mime_type, TRANSCRIPT_MIME);
        assert_eq!(artifact.file_name, "transcript.txt");
        assert_eq!(artifact.mime_type, "text/plain");
    }

    #[test]
    fn test_transcript_artifact_speaker_labels() {
        let turns = vec![
            SpeakerTurn {
                speaker: "Speaker A".to_string(),
                text: "Hi.".to_string(),
                start: Duration::ZERO,
                end: Duration::from_secs(1),
            },
            SpeakerTurn {
                speaker: "Speaker B".to_string(),
                text: "Hello.".to_string(),
                start: Duration::from_secs(1),
                end: Duration::from_secs(2),
            },
        ];
        let artifact = transcript_artifact(&completed("Hi. Hello.", turns)).unwrap();
        assert_eq!(artifact.content, "Speaker A: Hi.\nSpeaker B: Hello.");
    }

    #[test]
    fn test_failed_job_yields_no_transcript() {
        let result = TranscriptResult {
            id: "job-1".to_string(),
            status: JobStatus::Error,
            text: String::new(),
            words: Vec::new(),
            utterances: Vec::new(),
            language: None,
            error: Some("Download error to remote URL".to_string()),
        };
        let err = transcript_artifact(&result).unwrap_err();
        assert!(err.to_string().contains("Download error to remote URL"));
    }
}
