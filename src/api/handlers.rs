//! API request handlers
//!
//! Transport-independent: each handler takes the config and a decoded request
//! and returns a response model or a `TranscriptError`, which the server maps
//! onto HTTP status codes.

use serde_json::Value;
use tracing::{info, warn};

use super::models::{ParseCoursesResponse, ScanTranscriptResponse, TranscriptTextRequest};
use crate::config::Config;
use crate::transcript::{FreeTextCourseParser, TranscriptParser};
use crate::{Result, TranscriptError};

/// Handle health check requests
pub async fn health_check() -> Result<Value> {
    Ok(serde_json::json!({
        "status": "ok",
        "service": "pathway-transcript",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Trim the submitted text and enforce the configured size limit
fn accept_text(config: &Config, request: &TranscriptTextRequest) -> Result<String> {
    let text = request.text.as_deref().unwrap_or("").trim();
    if text.is_empty() {
        return Err(TranscriptError::EmptyInput);
    }

    let len = text.chars().count();
    let limit = config.api.max_input_chars;
    if len > limit {
        warn!("Rejecting transcript text of {} characters (limit {})", len, limit);
        return Err(TranscriptError::InputTooLarge { len, limit });
    }

    Ok(text.to_string())
}

/// Handle registrar transcript scans
pub async fn scan_transcript(
    config: &Config,
    request: &TranscriptTextRequest,
) -> Result<ScanTranscriptResponse> {
    let text = accept_text(config, request)?;
    let classes = TranscriptParser::new().parse(&text);

    if classes.is_empty() {
        warn!("⚠️ No classes detected in {} characters of transcript text", text.chars().count());
        return Err(TranscriptError::NoCoursesDetected { raw_text: text });
    }

    info!("✅ Detected {} classes in transcript", classes.len());
    Ok(ScanTranscriptResponse {
        success: true,
        total_classes: classes.len(),
        classes,
        raw_text: text,
    })
}

/// Handle free-form pasted course lists
pub async fn parse_free_text(
    config: &Config,
    request: &TranscriptTextRequest,
) -> Result<ParseCoursesResponse> {
    let text = accept_text(config, request)?;
    let courses = FreeTextCourseParser::new()
        .with_limit(config.parser.free_text_limit)
        .parse(&text);

    if courses.is_empty() {
        return Err(TranscriptError::NoCoursesDetected { raw_text: text });
    }

    info!("✅ Detected {} courses in pasted text", courses.len());
    Ok(ParseCoursesResponse {
        success: true,
        total_courses: courses.len(),
        courses,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;

    #[tokio::test]
    async fn test_scan_transcript_success() {
        let config = Config::default();
        let request = TranscriptTextRequest::new("Fall 2024\nCMSC131 Intro to CS A 4\n");
        let response = scan_transcript(&config, &request).await.unwrap();
        assert!(response.success);
        assert_eq!(response.total_classes, 1);
        assert_eq!(response.raw_text, "Fall 2024\nCMSC131 Intro to CS A 4");
    }

    #[tokio::test]
    async fn test_scan_transcript_empty_input() {
        let config = Config::default();
        let result = scan_transcript(&config, &TranscriptTextRequest::default()).await;
        assert!(matches!(result, Err(TranscriptError::EmptyInput)));

        let result = scan_transcript(&config, &TranscriptTextRequest::new("   \n ")).await;
        assert!(matches!(result, Err(TranscriptError::EmptyInput)));
    }

    #[tokio::test]
    async fn test_scan_transcript_too_large() {
        let config = ConfigBuilder::new().with_max_input_chars(10).build();
        let result = scan_transcript(&config, &TranscriptTextRequest::new("CMSC131 Intro A 4")).await;
        assert!(matches!(
            result,
            Err(TranscriptError::InputTooLarge { len: 17, limit: 10 })
        ));
    }

    #[tokio::test]
    async fn test_scan_transcript_no_courses_returns_raw_text() {
        let config = Config::default();
        let result = scan_transcript(&config, &TranscriptTextRequest::new("Unofficial Transcript")).await;
        match result {
            Err(TranscriptError::NoCoursesDetected { raw_text }) => {
                assert_eq!(raw_text, "Unofficial Transcript")
            }
            other => panic!("unexpected result: {:?}", other.map(|r| r.total_classes)),
        }
    }

    #[tokio::test]
    async fn test_parse_free_text_uses_configured_limit() {
        let config = ConfigBuilder::new().with_free_text_limit(2).build();
        let request = TranscriptTextRequest::new("Biology\nChemistry\nPhysics");
        let response = parse_free_text(&config, &request).await.unwrap();
        assert_eq!(response.total_courses, 2);
        assert_eq!(response.courses[1].name, "Chemistry");
    }

    #[tokio::test]
    async fn test_health_check() {
        let health = health_check().await.unwrap();
        assert_eq!(health["status"], "ok");
        assert_eq!(health["service"], "pathway-transcript");
    }
}
