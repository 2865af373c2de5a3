use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use subgen::config::{CaptionFormat, Config};
use subgen::pipeline::{generate_captions, print_summary, JobConfig};
use subgen::settings::CaptionSettings;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "subgen")]
#[command(version, about = "Timed caption generation from video/audio files")]
#[command(long_about = "Upload a media file to AssemblyAI and download SRT/WebVTT captions \
with configurable line length, line count, and inter-caption gap.")]
struct Cli {
    /// Input video/audio file (mp4, mov, wav, mp3)
    input: Option<PathBuf>,

    /// Directory to write the caption files to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Caption format: srt, vtt, or all
    #[arg(short, long, default_value = "all")]
    format: String,

    /// Max characters per caption line (14-60)
    #[arg(long, default_value = "42")]
    max_chars: u32,

    /// Max lines per caption block (1 or 2)
    #[arg(long, default_value = "2")]
    max_lines: u32,

    /// Minimum gap between captions in milliseconds (0-1000)
    #[arg(long, default_value = "200")]
    gap_ms: u64,

    /// Disable speaker diarization
    #[arg(long)]
    no_diarization: bool,

    /// Source language hint (repeatable; omit for auto-detection)
    #[arg(short, long)]
    language: Vec<String>,

    /// Skip writing the plain-text transcript
    #[arg(long)]
    no_transcript: bool,

    /// Run the interactive setup wizard
    #[arg(short, long)]
    interactive: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn parse_formats(s: &str) -> Result<Vec<CaptionFormat>> {
    if s.eq_ignore_ascii_case("all") {
        return Ok(vec![CaptionFormat::Srt, CaptionFormat::Vtt]);
    }
    let format: CaptionFormat = s.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    Ok(vec![format])
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let (input, config, settings, job) = if cli.interactive {
        let wizard = subgen::interactive::run_interactive_wizard()?;
        (wizard.input, wizard.config, wizard.settings, wizard.job)
    } else {
        let input = cli
            .input
            .ok_or_else(|| anyhow::anyhow!("Input file required (or use --interactive)"))?;

        if !input.exists() {
            anyhow::bail!("Input file not found: {}", input.display());
        }

        let settings = CaptionSettings::new(
            cli.max_chars,
            cli.max_lines,
            cli.gap_ms,
            !cli.no_diarization,
            cli.language,
        )?;

        let config = Config::load().context("Failed to load configuration")?;

        let job = JobConfig {
            formats: parse_formats(&cli.format)?,
            output_dir: cli.output_dir,
            write_transcript: !cli.no_transcript,
            show_progress: config.show_progress,
        };

        (input, config, settings, job)
    };

    // Fail on a missing credential before anything is uploaded.
    config.validate().context("Configuration validation failed")?;

    info!("Input:       {}", input.display());
    info!("Output dir:  {}", job.output_dir.display());
    info!("Max chars:   {}", settings.max_chars_per_line());
    info!("Max lines:   {}", settings.lines_per_block());
    info!("Caption gap: {} ms", settings.gap().as_millis());
    info!(
        "Diarization: {}",
        if settings.diarization() { "on" } else { "off" }
    );

    let outcome = generate_captions(&input, &config, &settings, &job).await?;
    print_summary(&outcome);

    Ok(())
}
