use crate::config::{CaptionFormat, Config};
use crate::media::ACCEPTED_EXTENSIONS;
use crate::pipeline::JobConfig;
use crate::settings::{
    CaptionSettings, LinesPerBlock, MAX_CHARS_PER_LINE, MAX_GAP_MS, MIN_CHARS_PER_LINE,
};
use console::style;
use dialoguer::{Confirm, Input, Select};
use std::fs;
use std::path::PathBuf;

pub struct InteractiveResult {
    pub input: PathBuf,
    pub config: Config,
    pub settings: CaptionSettings,
    pub job: JobConfig,
}

/// Walk the user through API-key setup, file selection, and the caption
/// formatting settings.
pub fn run_interactive_wizard() -> anyhow::Result<InteractiveResult> {
    print_header();

    // Step 1: Check/Setup API key
    let config = setup_api_key()?;

    // Step 2: Select source file
    let input = select_source_file()?;

    // Step 3: Caption formatting
    let settings = prompt_settings()?;

    // Step 4: Output formats
    let formats = select_formats()?;

    // Step 5: Confirm
    print_summary(&input, &settings, &formats);

    if !Confirm::new()
        .with_prompt("Proceed with these settings?")
        .default(true)
        .interact()?
    {
        anyhow::bail!("Cancelled by user");
    }

    println!();

    let job = JobConfig {
        formats,
        output_dir: PathBuf::from("."),
        write_transcript: true,
        show_progress: true,
    };

    Ok(InteractiveResult {
        input,
        config,
        settings,
        job,
    })
}

fn print_header() {
    println!();
    println!(
        "{}",
        style("╔═══════════════════════════════════════════════════╗").cyan()
    );
    println!(
        "{}",
        style("║          subgen - Timed Caption Generator         ║").cyan()
    );
    println!(
        "{}",
        style("╚═══════════════════════════════════════════════════╝").cyan()
    );
    println!();
}

fn setup_api_key() -> anyhow::Result<Config> {
    let mut config = Config::load().unwrap_or_default();

    if config.assemblyai_api_key.is_some() {
        println!("{} API key configured", style("✓").green());
        return Ok(config);
    }

    println!("{} AssemblyAI API key not found", style("!").yellow());
    println!("  Get one at: https://www.assemblyai.com/dashboard\n");

    let api_key: String = Input::new()
        .with_prompt("Enter your AssemblyAI API key")
        .interact_text()?;

    if api_key.trim().is_empty() {
        anyhow::bail!("API key is required");
    }

    config.assemblyai_api_key = Some(api_key.trim().to_string());

    // Offer to save
    if Confirm::new()
        .with_prompt("Save API key to config file?")
        .default(true)
        .interact()?
    {
        save_config(&config)?;
        println!("{} API key saved to config\n", style("✓").green());
    }

    Ok(config)
}

fn save_config(config: &Config) -> anyhow::Result<()> {
    if let Some(config_path) = Config::config_file_path() {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_content = toml::to_string_pretty(config)?;
        fs::write(config_path, toml_content)?;
    }
    Ok(())
}

fn select_source_file() -> anyhow::Result<PathBuf> {
    println!("\n{}", style("Select media file:").bold());

    let files = scan_media_files(".")?;

    if files.is_empty() {
        println!("  No media files found in current directory.\n");
        return prompt_custom_path();
    }

    let mut items: Vec<String> = files
        .iter()
        .map(|f| {
            let size = fs::metadata(f)
                .map(|m| format_size(m.len()))
                .unwrap_or_else(|_| "?".to_string());
            format!("{} ({})", f.display(), size)
        })
        .collect();
    items.push("Enter custom path...".to_string());

    let selection = Select::new()
        .with_prompt("Choose a file")
        .items(&items)
        .default(0)
        .interact()?;

    if selection == files.len() {
        prompt_custom_path()
    } else {
        Ok(files[selection].clone())
    }
}

fn prompt_custom_path() -> anyhow::Result<PathBuf> {
    let path: String = Input::new()
        .with_prompt("Enter file path")
        .interact_text()?;
    let path = PathBuf::from(path);
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    Ok(path)
}

fn scan_media_files(dir: &str) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() {
            if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                if ACCEPTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()) {
                    files.push(path);
                }
            }
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

fn prompt_settings() -> anyhow::Result<CaptionSettings> {
    println!("\n{}", style("Caption formatting:").bold());

    let max_chars: u32 = Input::new()
        .with_prompt(format!(
            "Max characters per line ({}-{})",
            MIN_CHARS_PER_LINE, MAX_CHARS_PER_LINE
        ))
        .default(42)
        .validate_with(|v: &u32| {
            if (MIN_CHARS_PER_LINE..=MAX_CHARS_PER_LINE).contains(v) {
                Ok(())
            } else {
                Err(format!(
                    "Must be between {} and {}",
                    MIN_CHARS_PER_LINE, MAX_CHARS_PER_LINE
                ))
            }
        })
        .interact_text()?;

    let lines = Select::new()
        .with_prompt("Max lines per block")
        .items(&["1 line", "2 lines"])
        .default(1)
        .interact()?;
    let lines_per_block = if lines == 0 {
        LinesPerBlock::One
    } else {
        LinesPerBlock::Two
    };

    let gap_ms: u64 = Input::new()
        .with_prompt(format!("Min caption gap in milliseconds (0-{})", MAX_GAP_MS))
        .default(200)
        .validate_with(|v: &u64| {
            if *v <= MAX_GAP_MS {
                Ok(())
            } else {
                Err(format!("Must be between 0 and {}", MAX_GAP_MS))
            }
        })
        .interact_text()?;

    let diarization = Confirm::new()
        .with_prompt("Enable speaker diarization (Speaker 1, Speaker 2)?")
        .default(true)
        .interact()?;

    println!(
        "  {}",
        style("Multiple languages and code-switching are handled automatically.").dim()
    );

    let language_hints = prompt_language_hint()?;

    Ok(CaptionSettings::clamped(
        max_chars,
        lines_per_block,
        gap_ms,
        diarization,
        language_hints,
    ))
}

fn prompt_language_hint() -> anyhow::Result<Vec<String>> {
    if !Confirm::new()
        .with_prompt("Pin a source language instead of auto-detection?")
        .default(false)
        .interact()?
    {
        return Ok(Vec::new());
    }

    let code: String = Input::new()
        .with_prompt("Language code (e.g. 'en', 'es', 'ja')")
        .interact_text()?;

    Ok(vec![code.trim().to_lowercase()])
}

fn select_formats() -> anyhow::Result<Vec<CaptionFormat>> {
    let choices = [
        ("SRT + VTT", "Both caption files"),
        ("SRT", "Premiere Pro, VLC, YouTube"),
        ("VTT", "Web players / HTML5 video"),
    ];

    let items: Vec<String> = choices
        .iter()
        .map(|(name, desc)| format!("{} - {}", name, desc))
        .collect();

    let selection = Select::new()
        .with_prompt("Select output")
        .items(&items)
        .default(0)
        .interact()?;

    Ok(match selection {
        1 => vec![CaptionFormat::Srt],
        2 => vec![CaptionFormat::Vtt],
        _ => vec![CaptionFormat::Srt, CaptionFormat::Vtt],
    })
}

fn print_summary(input: &PathBuf, settings: &CaptionSettings, formats: &[CaptionFormat]) {
    println!("\n{}", style("═══ Summary ═══").bold());
    println!("  Input:        {}", style(input.display()).cyan());
    println!("  Max chars:    {}", settings.max_chars_per_line());
    println!("  Max lines:    {}", settings.lines_per_block());
    println!("  Caption gap:  {} ms", settings.gap().as_millis());
    println!(
        "  Diarization:  {}",
        if settings.diarization() { "on" } else { "off" }
    );
    if let Some(hint) = settings.language_hints().first() {
        println!("  Language:     {}", hint);
    } else {
        println!("  Language:     auto-detect");
    }
    let names: Vec<&str> = formats.iter().map(|f| f.file_name()).collect();
    println!("  Output:       {}", names.join(", "));
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1024 * 1024), "1.0 MB");
        assert_eq!(format_size(1024 * 1024 * 1024), "1.0 GB");
    }
}
