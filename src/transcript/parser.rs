//! Registrar-style transcript parser
//!
//! Lines are classified in a fixed priority order:
//!
//! 1. current-courses section header
//! 2. whole-line term header
//! 3. inline term mention (does not stop classification)
//! 4. graded course line, grade before credits
//! 5. graded course line, credits before grade
//! 6. registered (in-progress) course line
//!
//! Anything else is skipped. The parser never fails; an empty result is the
//! only signal that nothing course-like was found.

use super::credits::sanitize_credits;
use super::patterns::{CURRENT_COURSES_HEADER, PATTERNS, REGISTERED_TOKEN};
use super::{normalized_lines, CourseRecord};
use regex::Captures;
use std::collections::HashSet;
use tracing::{debug, trace};

/// Name given to courses that are registered but not yet graded
pub const IN_PROGRESS_NAME: &str = "In Progress";

/// Fields pulled out of a graded course line
#[derive(Debug, Clone, PartialEq)]
struct GradedMatch {
    subject: String,
    number: String,
    title: String,
    grade: String,
    credits: Option<f64>,
}

/// A graded-line matcher: returns the extracted fields or `None`
type GradedMatcher = fn(&str) -> Option<GradedMatch>;

/// Graded-line matchers in priority order
const GRADED_MATCHERS: [(&str, GradedMatcher); 2] = [
    ("grade-then-credits", match_grade_then_credits),
    ("credits-then-grade", match_credits_then_grade),
];

/// `SUBJECT NUMBER TITLE GRADE CREDITS`
///
/// Rejected when the credit figure is itself followed by a grade token; such a
/// line reads better as credits-then-grade (`Calculus I 4 B+`).
fn match_grade_then_credits(line: &str) -> Option<GradedMatch> {
    let caps = PATTERNS.graded_course.captures(line)?;
    let whole = caps.get(0)?;
    if PATTERNS.trailing_grade.is_match(&line[whole.end()..]) {
        return None;
    }

    Some(GradedMatch {
        subject: caps[1].to_string(),
        number: caps[2].to_string(),
        title: caps[3].trim().to_string(),
        grade: caps[4].to_string(),
        credits: parse_figure(&caps, 5),
    })
}

/// `SUBJECT NUMBER TITLE CREDITS GRADE`, grade matched case-insensitively
fn match_credits_then_grade(line: &str) -> Option<GradedMatch> {
    let caps = PATTERNS.credits_first_course.captures(line)?;

    Some(GradedMatch {
        subject: caps[1].to_string(),
        number: caps[2].to_string(),
        title: caps[3].trim().to_string(),
        credits: parse_figure(&caps, 4),
        grade: caps[5].to_string(),
    })
}

fn parse_figure(caps: &Captures<'_>, group: usize) -> Option<f64> {
    caps.get(group).and_then(|m| m.as_str().parse::<f64>().ok())
}

fn course_code(subject: &str, number: &str) -> String {
    format!("{subject}{number}").to_ascii_uppercase()
}

/// Registers carried across the lines of one parse call
#[derive(Debug, Default)]
struct ParseState {
    current_term: Option<String>,
    in_current_courses: bool,
    seen: HashSet<String>,
    records: Vec<CourseRecord>,
}

impl ParseState {
    /// Keep `record` unless an identical one was already emitted
    fn emit(&mut self, record: CourseRecord) {
        if self.seen.insert(record.dedup_key()) {
            self.records.push(record);
        } else {
            trace!("Skipping duplicate course {}", record.code);
        }
    }

    fn classify(&mut self, line: &str) {
        if line.eq_ignore_ascii_case(CURRENT_COURSES_HEADER) {
            trace!("Entering current-courses block");
            self.in_current_courses = true;
            return;
        }

        if PATTERNS.term_header.is_match(line) {
            trace!("Term header: {}", line);
            self.current_term = Some(line.to_string());
            self.in_current_courses = false;
            return;
        }

        if let Some(term) = PATTERNS.inline_term.find(line) {
            self.current_term = Some(term.as_str().to_string());
        }

        for (label, matcher) in GRADED_MATCHERS {
            if let Some(found) = matcher(line) {
                trace!("{} course line: {}", label, line);
                let credits = sanitize_credits(line, found.credits);
                self.emit(CourseRecord {
                    code: course_code(&found.subject, &found.number),
                    name: found.title,
                    credits,
                    grade: Some(found.grade),
                    semester: self.current_term.clone(),
                });
                return;
            }
        }

        self.classify_registered(line);
    }

    fn classify_registered(&mut self, line: &str) {
        let strict = PATTERNS.registered_course.captures(line);
        if !(self.in_current_courses || strict.is_some()) || !line.contains(REGISTERED_TOKEN) {
            return;
        }

        let Some(caps) = strict.or_else(|| PATTERNS.registered_in_block.captures(line)) else {
            return;
        };

        trace!("Registered course line: {}", line);
        let credits = sanitize_credits(line, parse_figure(&caps, 3));
        self.emit(CourseRecord {
            code: course_code(&caps[1], &caps[2]),
            name: IN_PROGRESS_NAME.to_string(),
            credits,
            grade: None,
            semester: self.current_term.clone(),
        });
    }
}

/// Parser for registrar-style transcripts
///
/// Holds no state between calls; every call to [`TranscriptParser::parse`]
/// starts with a fresh term register and duplicate set, so one parser can be
/// shared across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct TranscriptParser;

impl TranscriptParser {
    /// Create a new transcript parser
    pub fn new() -> Self {
        Self
    }

    /// Extract course records from raw transcript text, in first-seen order
    pub fn parse(&self, raw_text: &str) -> Vec<CourseRecord> {
        let lines = normalized_lines(raw_text);
        let mut state = ParseState::default();

        for line in &lines {
            state.classify(line);
        }

        debug!(
            "📄 Parsed {} course records from {} transcript lines",
            state.records.len(),
            lines.len()
        );
        state.records
    }
}
