//! Loose line-based parser for pasted course lists

use super::patterns::PATTERNS;
use super::{normalize_whitespace, FreeTextCourse};
use std::collections::HashSet;
use tracing::debug;

/// Default cap on returned courses
pub const DEFAULT_FREE_TEXT_LIMIT: usize = 8;

/// Lines mentioning any of these are metadata, not courses
const IGNORED_KEYWORDS: [&str; 7] = ["gpa", "semester", "term", "credits", "total", "major", "program"];

/// Parser for free-form course text such as a pasted list
#[derive(Debug, Clone)]
pub struct FreeTextCourseParser {
    limit: usize,
}

impl Default for FreeTextCourseParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FreeTextCourseParser {
    /// Create a parser with the default cap
    pub fn new() -> Self {
        Self {
            limit: DEFAULT_FREE_TEXT_LIMIT,
        }
    }

    /// Override the maximum number of courses returned
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Parse pasted text into at most `limit` unique courses, in first-seen order
    pub fn parse(&self, raw_text: &str) -> Vec<FreeTextCourse> {
        let mut seen = HashSet::new();
        let courses: Vec<FreeTextCourse> = raw_text
            .lines()
            .filter_map(parse_line)
            .filter(|course| {
                let key = format!(
                    "{}|{}",
                    course.code.as_deref().unwrap_or("").to_lowercase(),
                    course.name.to_lowercase()
                );
                seen.insert(key)
            })
            .take(self.limit)
            .collect();

        debug!("📝 Parsed {} courses from free text", courses.len());
        courses
    }
}

fn parse_line(line: &str) -> Option<FreeTextCourse> {
    let normalized = normalize_whitespace(line);
    if normalized.chars().count() < 3 {
        return None;
    }

    let lower = normalized.to_lowercase();
    if IGNORED_KEYWORDS.iter().any(|keyword| lower.contains(keyword)) {
        return None;
    }

    if let Some(caps) = PATTERNS.free_text_separator.captures(&normalized) {
        let name = normalize_whitespace(&caps[2]);
        if name.is_empty() {
            return None;
        }
        return Some(FreeTextCourse {
            name,
            code: Some(normalize_whitespace(&caps[1])),
            credits: None,
        });
    }

    if let Some(caps) = PATTERNS.free_text_code.captures(&normalized) {
        let name = normalize_whitespace(&caps[2]);
        return Some(FreeTextCourse {
            name: if name.is_empty() { normalized.clone() } else { name },
            code: Some(normalize_whitespace(&caps[1])),
            credits: None,
        });
    }

    Some(FreeTextCourse {
        name: normalized,
        code: None,
        credits: None,
    })
}
