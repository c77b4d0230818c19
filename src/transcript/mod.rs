/// Transcript text parsing
///
/// Two heuristic parsers live here: `TranscriptParser` for registrar-style
/// transcripts (term headers, grade and credit columns, in-progress blocks) and
/// `FreeTextCourseParser` for loosely pasted course lists.

pub mod credits;
pub mod free_text;
pub mod parser;
pub mod patterns;

// Re-export main types
pub use credits::{sanitize_credits, MAX_CREDITS, MIN_CREDITS};
pub use free_text::{FreeTextCourseParser, DEFAULT_FREE_TEXT_LIMIT};
pub use parser::TranscriptParser;

use serde::{Deserialize, Serialize};

/// A single course recovered from a transcript
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CourseRecord {
    /// Subject and number without separator, e.g. `CMSC131`
    pub code: String,
    /// Course title, or `In Progress` for registered courses
    pub name: String,
    /// Credit hours, always within [0.5, 6.0] when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<f64>,
    /// Grade token as written on the transcript
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    /// Most recent term header seen before the course line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
}

impl CourseRecord {
    /// Whether this record came from an in-progress (registered) entry
    pub fn is_in_progress(&self) -> bool {
        self.grade.is_none() && self.name == parser::IN_PROGRESS_NAME
    }

    /// Composite key used to suppress exact duplicates within one parse
    pub fn dedup_key(&self) -> String {
        [
            self.code.as_str(),
            self.semester.as_deref().unwrap_or(""),
            self.grade.as_deref().unwrap_or(""),
            &self.credits.map(|c| c.to_string()).unwrap_or_default(),
            self.name.as_str(),
        ]
        .join("|")
    }
}

/// A course recovered from free-form pasted text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FreeTextCourse {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<f64>,
}

/// Collapse every whitespace run to a single space and trim the ends
///
/// A byte-order mark counts as whitespace so a BOM-prefixed first line still
/// starts with its course code.
pub fn normalize_whitespace(value: &str) -> String {
    value
        .split(|c: char| c.is_whitespace() || c == '\u{feff}')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split raw text into normalized, non-empty lines
pub fn normalized_lines(text: &str) -> Vec<String> {
    text.replace('\r', "")
        .split('\n')
        .map(normalize_whitespace)
        .filter(|line| !line.is_empty())
        .collect()
}
