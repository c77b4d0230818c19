/// Pathway Transcript - course record extraction
///
/// Turns noisy PDF/OCR-extracted transcript text into structured course records
/// without any model assistance. The parsers are pure; configuration, the CLI
/// and the optional HTTP API wrap them.

pub mod api;
pub mod config;
pub mod transcript;

// Re-export main types for easy access
pub use crate::config::{Config, ConfigBuilder};
pub use crate::transcript::{
    sanitize_credits, CourseRecord, FreeTextCourse, FreeTextCourseParser, TranscriptParser,
};

/// Result type for transcript scanning operations
pub type Result<T> = std::result::Result<T, TranscriptError>;

/// Error types raised around the parsers (the parsers themselves never fail)
#[derive(thiserror::Error, Debug)]
pub enum TranscriptError {
    #[error("Invalid request body: {0}")]
    InvalidRequest(String),

    #[error("No text detected in the transcript.")]
    EmptyInput,

    #[error("Transcript text is too long ({len} characters, limit {limit})")]
    InputTooLarge { len: usize, limit: usize },

    #[error("No classes detected in the transcript. Please ensure the transcript contains course information.")]
    NoCoursesDetected { raw_text: String },
}
