pub mod config;
pub mod error;
pub mod export;
pub mod interactive;
pub mod media;
pub mod pipeline;
pub mod settings;
pub mod transcribe;

pub use config::{CaptionFormat, Config};
pub use error::{Result, SubgenError};
pub use pipeline::{
    generate_captions, generate_captions_with_service, print_summary, JobConfig, JobOutcome,
    JobState,
};
pub use settings::CaptionSettings;
