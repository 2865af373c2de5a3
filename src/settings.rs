use crate::error::{Result, SubgenError};
use std::time::Duration;

/// Smallest characters-per-line value the provider accepts.
pub const MIN_CHARS_PER_LINE: u32 = 14;
/// Largest characters-per-line value the provider accepts.
pub const MAX_CHARS_PER_LINE: u32 = 60;
/// Largest inter-caption gap, in milliseconds.
pub const MAX_GAP_MS: u64 = 1000;

/// Captions may span one or two lines per block, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinesPerBlock {
    One,
    #[default]
    Two,
}

impl LinesPerBlock {
    pub fn as_u32(&self) -> u32 {
        match self {
            LinesPerBlock::One => 1,
            LinesPerBlock::Two => 2,
        }
    }
}

impl TryFrom<u32> for LinesPerBlock {
    type Error = SubgenError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            1 => Ok(LinesPerBlock::One),
            2 => Ok(LinesPerBlock::Two),
            other => Err(SubgenError::Settings(format!(
                "Lines per block must be 1 or 2, got {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for LinesPerBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

/// Formatting parameters forwarded to the provider's caption export.
///
/// Created fresh per job and never persisted. The provider does all
/// segmentation and line wrapping; these values only parameterize it.
#[derive(Debug, Clone)]
pub struct CaptionSettings {
    max_chars_per_line: u32,
    lines_per_block: LinesPerBlock,
    gap: Duration,
    diarization: bool,
    language_hints: Vec<String>,
}

impl Default for CaptionSettings {
    fn default() -> Self {
        Self {
            max_chars_per_line: 42,
            lines_per_block: LinesPerBlock::Two,
            gap: Duration::from_millis(200),
            diarization: true,
            language_hints: Vec::new(),
        }
    }
}

impl CaptionSettings {
    /// Build settings, rejecting out-of-range values.
    pub fn new(
        max_chars_per_line: u32,
        lines_per_block: u32,
        gap_ms: u64,
        diarization: bool,
        language_hints: Vec<String>,
    ) -> Result<Self> {
        if !(MIN_CHARS_PER_LINE..=MAX_CHARS_PER_LINE).contains(&max_chars_per_line) {
            return Err(SubgenError::Settings(format!(
                "Max characters per line must be between {} and {}, got {}",
                MIN_CHARS_PER_LINE, MAX_CHARS_PER_LINE, max_chars_per_line
            )));
        }

        if gap_ms > MAX_GAP_MS {
            return Err(SubgenError::Settings(format!(
                "Caption gap must be between 0 and {} ms, got {}",
                MAX_GAP_MS, gap_ms
            )));
        }

        Ok(Self {
            max_chars_per_line,
            lines_per_block: LinesPerBlock::try_from(lines_per_block)?,
            gap: Duration::from_millis(gap_ms),
            diarization,
            language_hints,
        })
    }

    /// Build settings, clamping numeric values into range instead of
    /// rejecting them. Matches what a bounded input widget would do.
    pub fn clamped(
        max_chars_per_line: u32,
        lines_per_block: LinesPerBlock,
        gap_ms: u64,
        diarization: bool,
        language_hints: Vec<String>,
    ) -> Self {
        Self {
            max_chars_per_line: max_chars_per_line.clamp(MIN_CHARS_PER_LINE, MAX_CHARS_PER_LINE),
            lines_per_block,
            gap: Duration::from_millis(gap_ms.min(MAX_GAP_MS)),
            diarization,
            language_hints,
        }
    }

    pub fn max_chars_per_line(&self) -> u32 {
        self.max_chars_per_line
    }

    pub fn lines_per_block(&self) -> LinesPerBlock {
        self.lines_per_block
    }

    pub fn gap(&self) -> Duration {
        self.gap
    }

    /// Gap as fractional seconds, the unit the export call expects.
    pub fn gap_seconds(&self) -> f64 {
        self.gap.as_millis() as f64 / 1000.0
    }

    pub fn diarization(&self) -> bool {
        self.diarization
    }

    pub fn language_hints(&self) -> &[String] {
        &self.language_hints
    }
}
