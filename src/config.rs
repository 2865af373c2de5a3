use crate::error::{Result, SubgenError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionFormat {
    #[default]
    Srt,
    Vtt,
}

impl std::fmt::Display for CaptionFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptionFormat::Srt => write!(f, "srt"),
            CaptionFormat::Vtt => write!(f, "vtt"),
        }
    }
}

impl std::str::FromStr for CaptionFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "srt" => Ok(CaptionFormat::Srt),
            "vtt" => Ok(CaptionFormat::Vtt),
            _ => Err(format!("Unknown caption format: {}. Use 'srt' or 'vtt'", s)),
        }
    }
}

impl CaptionFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            CaptionFormat::Srt => "srt",
            CaptionFormat::Vtt => "vtt",
        }
    }

    /// MIME type to serve the downloaded artifact under.
    pub fn mime_type(&self) -> &'static str {
        match self {
            CaptionFormat::Srt => "application/x-subrip",
            CaptionFormat::Vtt => "text/vtt",
        }
    }

    /// Download file name for this format.
    pub fn file_name(&self) -> &'static str {
        match self {
            CaptionFormat::Srt => "transcript.srt",
            CaptionFormat::Vtt => "transcript.vtt",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub assemblyai_api_key: Option<String>,
    pub poll_interval_ms: u64,
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assemblyai_api_key: None,
            poll_interval_ms: 3000,
            show_progress: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Load from config file if it exists
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                if let Ok(file_config) = toml::from_str::<Config>(&contents) {
                    config = file_config;
                }
            }
        }

        // Override with environment variables
        if let Ok(key) = std::env::var("ASSEMBLYAI_API_KEY") {
            config.assemblyai_api_key = Some(key);
        }
        if let Ok(interval) = std::env::var("SUBGEN_POLL_INTERVAL_MS") {
            if let Ok(ms) = interval.parse() {
                config.poll_interval_ms = ms;
            }
        }

        Ok(config)
    }

    /// Fail before anything is uploaded when the credential is missing.
    pub fn validate(&self) -> Result<()> {
        if self.assemblyai_api_key.is_none() {
            return Err(SubgenError::Config(
                "ASSEMBLYAI_API_KEY not set. Export it with: export ASSEMBLYAI_API_KEY=..."
                    .to_string(),
            ));
        }

        if self.poll_interval_ms == 0 {
            return Err(SubgenError::Config(
                "Poll interval must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("subgen").join("config.toml"))
    }
}
