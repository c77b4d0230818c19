//! API data models

use serde::{Deserialize, Serialize};

use crate::transcript::{CourseRecord, FreeTextCourse};

/// Body of `POST /api/scan-transcript` and `POST /api/parse-courses`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptTextRequest {
    /// Text already extracted from a PDF or image
    #[serde(default)]
    pub text: Option<String>,
}

impl TranscriptTextRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

/// Successful transcript scan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanTranscriptResponse {
    pub success: bool,
    pub classes: Vec<CourseRecord>,
    pub total_classes: usize,
    pub raw_text: String,
}

/// Successful free-text parse
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseCoursesResponse {
    pub success: bool,
    pub courses: Vec<FreeTextCourse>,
    pub total_courses: usize,
}

/// Error body returned by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    /// Input echoed back when nothing could be parsed, for diagnostic display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            success: false,
            error: message,
            raw_text: None,
        }
    }

    pub fn with_raw_text(mut self, raw_text: String) -> Self {
        self.raw_text = Some(raw_text);
        self
    }
}
