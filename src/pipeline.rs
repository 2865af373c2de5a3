use crate::config::{CaptionFormat, Config};
use crate::error::{Result, SubgenError};
use crate::export::{self, CaptionArtifact};
use crate::media::{MediaKind, StagedUpload};
use crate::settings::CaptionSettings;
use crate::transcribe::{AssemblyAiClient, SpeechService, TranscriptionOptions};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Lifecycle of one caption job. Terminal states are reported to the user;
/// there is no retry, resume, or cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    FileSelected,
    Submitted,
    Completed,
    Failed,
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobState::Idle => write!(f, "idle"),
            JobState::FileSelected => write!(f, "file selected"),
            JobState::Submitted => write!(f, "submitted"),
            JobState::Completed => write!(f, "completed"),
            JobState::Failed => write!(f, "failed"),
        }
    }
}

/// Per-job configuration beyond the formatting settings.
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Caption formats to export.
    pub formats: Vec<CaptionFormat>,
    /// Directory the artifacts are written to.
    pub output_dir: PathBuf,
    /// Also write the plain-text transcript for proofreading.
    pub write_transcript: bool,
    /// Show a spinner while the external job runs.
    pub show_progress: bool,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            formats: vec![CaptionFormat::Srt, CaptionFormat::Vtt],
            output_dir: PathBuf::from("."),
            write_transcript: true,
            show_progress: true,
        }
    }
}

/// An artifact written to disk.
#[derive(Debug, Clone)]
pub struct WrittenArtifact {
    pub path: PathBuf,
    pub format: CaptionFormat,
    pub mime_type: &'static str,
    pub bytes: usize,
}

/// Timing and size numbers for the summary.
#[derive(Debug, Clone)]
pub struct JobStats {
    pub total_time: Duration,
    pub transcription_time: Duration,
    pub transcript_chars: usize,
    pub artifact_count: usize,
    pub service: String,
}

/// Result of a finished caption job.
#[derive(Debug)]
pub struct JobOutcome {
    pub state: JobState,
    pub artifacts: Vec<WrittenArtifact>,
    pub transcript_path: Option<PathBuf>,
    pub detected_language: Option<String>,
    pub stats: JobStats,
}

/// Generate caption files for one media file using AssemblyAI.
///
/// This is the main entry point. It:
/// 1. Validates the input container type
/// 2. Stages the media to a transient local file
/// 3. Submits the transcription job and waits for a terminal status
/// 4. Asks the service to render each requested caption format
/// 5. Writes the artifacts (and the plain-text transcript) to disk
///
/// The staged file is removed on every exit path. A job that reaches error
/// status produces no artifacts and fails with the provider's message.
pub async fn generate_captions(
    input: &Path,
    config: &Config,
    settings: &CaptionSettings,
    job: &JobConfig,
) -> Result<JobOutcome> {
    let api_key = config.assemblyai_api_key.clone().ok_or_else(|| {
        SubgenError::Config(
            "AssemblyAI API key not set. Set ASSEMBLYAI_API_KEY environment variable.".to_string(),
        )
    })?;

    let service = AssemblyAiClient::new(api_key).with_poll_interval(config.poll_interval());
    generate_captions_with_service(&service, input, settings, job).await
}

/// Same flow, with the service injected (tests point this at a mock host).
pub async fn generate_captions_with_service(
    service: &dyn SpeechService,
    input: &Path,
    settings: &CaptionSettings,
    job: &JobConfig,
) -> Result<JobOutcome> {
    let start_time = Instant::now();
    let mut state = JobState::Idle;
    debug!("Job state: {}", state);

    if !input.exists() {
        return Err(SubgenError::FileNotFound(input.display().to_string()));
    }

    let kind = MediaKind::from_path(input)?;
    state = JobState::FileSelected;
    debug!(
        "Job state: {} ({}, {})",
        state,
        kind.extension(),
        kind.mime_type()
    );

    if job.formats.is_empty() {
        return Err(SubgenError::Settings(
            "At least one caption format must be requested".to_string(),
        ));
    }

    // Stage the upload; the transient file is removed when this guard
    // drops, success or failure.
    let staged = StagedUpload::from_file(input)?;

    // ═══════════════════════════════════════════════════════════════════════
    // Stage 1: Submit & transcribe
    // ═══════════════════════════════════════════════════════════════════════
    info!("Stage 1/3: Uploading and transcribing with {}", service.name());
    let transcription_start = Instant::now();

    let spinner = if job.show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message("Uploading and transcribing... This may take several minutes.");
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let options = TranscriptionOptions::from_settings(settings);

    let handle = match service.submit(staged.path(), &options).await {
        Ok(handle) => handle,
        Err(e) => {
            if let Some(pb) = spinner {
                pb.finish_with_message("✗ Submission failed");
            }
            return Err(e);
        }
    };
    state = JobState::Submitted;
    debug!("Job state: {} (job {})", state, handle.id);

    let result = match service.await_result(&handle).await {
        Ok(result) => result,
        Err(e) => {
            if let Some(pb) = spinner {
                pb.finish_with_message("✗ Transcription failed");
            }
            return Err(e);
        }
    };

    let transcription_time = transcription_start.elapsed();

    if !result.is_completed() {
        if let Some(pb) = spinner {
            pb.finish_with_message("✗ Transcription failed");
        }
        state = JobState::Failed;
        info!(
            "Job {} reached {} status after {:.1}s",
            handle.id,
            state,
            transcription_time.as_secs_f64()
        );
        return Err(SubgenError::JobFailed(result.error_message().to_string()));
    }

    if let Some(pb) = spinner {
        pb.finish_with_message(format!(
            "✓ Transcription complete ({:.1}s)",
            transcription_time.as_secs_f64()
        ));
    }
    info!(
        "Transcription complete: {} chars, {} words in {:.1}s",
        result.text.len(),
        result.words.len(),
        transcription_time.as_secs_f64()
    );

    // ═══════════════════════════════════════════════════════════════════════
    // Stage 2: Caption export
    // ═══════════════════════════════════════════════════════════════════════
    info!("Stage 2/3: Exporting {} caption format(s)", job.formats.len());

    let mut rendered: Vec<CaptionArtifact> = Vec::new();
    for format in &job.formats {
        let artifact = export::render(service, &handle, *format, settings).await?;
        debug!(
            "Rendered {} ({} bytes)",
            artifact.file_name,
            artifact.content.len()
        );
        rendered.push(artifact);
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Stage 3: Write output files
    // ═══════════════════════════════════════════════════════════════════════
    info!("Stage 3/3: Writing artifacts to {:?}", job.output_dir);
    fs::create_dir_all(&job.output_dir)?;

    let mut artifacts = Vec::new();
    for artifact in &rendered {
        let path = job.output_dir.join(artifact.file_name);
        fs::write(&path, &artifact.content)?;
        artifacts.push(WrittenArtifact {
            path,
            format: artifact.format,
            mime_type: artifact.mime_type,
            bytes: artifact.content.len(),
        });
    }

    let transcript_path = if job.write_transcript {
        let transcript = export::transcript_artifact(&result)?;
        let path = job.output_dir.join(transcript.file_name);
        fs::write(&path, &transcript.content)?;
        Some(path)
    } else {
        None
    };

    info!("Wrote {} artifact(s)", artifacts.len());

    let stats = JobStats {
        total_time: start_time.elapsed(),
        transcription_time,
        transcript_chars: result.text.len(),
        artifact_count: artifacts.len(),
        service: service.name().to_string(),
    };

    Ok(JobOutcome {
        state: JobState::Completed,
        artifacts,
        transcript_path,
        detected_language: result.language,
        stats,
    })
}

/// Print a summary of the finished job.
pub fn print_summary(outcome: &JobOutcome) {
    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("                  Caption Generation Complete                   ");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    for artifact in &outcome.artifacts {
        println!(
            "  {}  ({}, {} bytes)",
            artifact.path.display(),
            artifact.mime_type,
            artifact.bytes
        );
    }
    if let Some(ref path) = outcome.transcript_path {
        println!("  {}  (text/plain, proofreading copy)", path.display());
    }
    println!();
    println!("  Service:    {}", outcome.stats.service);
    println!(
        "  Transcript: {} characters",
        outcome.stats.transcript_chars
    );
    if let Some(ref lang) = outcome.detected_language {
        println!("  Language:   {}", lang);
    }
    println!();
    println!("  Timing:");
    println!(
        "    Transcribe: {:.2}s",
        outcome.stats.transcription_time.as_secs_f64()
    );
    println!(
        "    Total:      {:.2}s",
        outcome.stats.total_time.as_secs_f64()
    );
    println!();
    println!("═══════════════════════════════════════════════════════════════");
}
