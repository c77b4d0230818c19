//! Line patterns used by the transcript parsers
//!
//! Each pattern is kept as a named constant so the matching priority in
//! `parser.rs` stays readable. The compiled set is built once and shared by
//! every parse call; `Regex` is immutable so concurrent parses never interfere.

use regex::Regex;
use std::sync::LazyLock;

/// Section header that opens the block of in-progress courses
pub const CURRENT_COURSES_HEADER: &str = "Current Course Information";

/// Literal registrar status for a currently registered course
pub const REGISTERED_TOKEN: &str = "REG";

/// Subject (2-4 capitals, optional hyphen) and course number (3 digits, optional letter)
const COURSE_CODE: &str = r"([A-Z]{2,4})\s*-?\s*([0-9]{3}[A-Z]?)";

/// Letter and pass/fail grades. `IP` precedes `I` so the longer token wins.
const GRADE: &str = r"A[+-]?|B[+-]?|C[+-]?|D[+-]?|F|IP|P|W|I|S|U";

/// Integer or decimal figure
pub const NUMBER: &str = r"[0-9]+(?:\.[0-9]+)?";

/// Season, optional roman-numeral session, four-digit year
const TERM: &str = r"(?:Fall|Spring|Summer|Winter)(?:\s+[IVX]+)?\s+[0-9]{4}";

/// Compiled pattern table
pub struct TranscriptPatterns {
    /// Whole line is a term header, e.g. `Summer II 2023`
    pub term_header: Regex,
    /// Term mention anywhere in a line
    pub inline_term: Regex,
    /// `SUBJECT NUMBER TITLE GRADE CREDITS`
    pub graded_course: Regex,
    /// A grade token directly after a credit figure (start of the remaining text)
    pub trailing_grade: Regex,
    /// `SUBJECT NUMBER TITLE CREDITS GRADE`, grade matched case-insensitively
    pub credits_first_course: Regex,
    /// `SUBJECT NUMBER SECTION CREDITS REG` at the start of a line
    pub registered_course: Regex,
    /// Course code followed, anywhere later, by `CREDITS REG`; used inside the current-courses block
    pub registered_in_block: Regex,
    /// Every numeric token in a line
    pub number: Regex,
    /// Free text: `HEAD SEP TAIL` with one of `-:–—`
    pub free_text_separator: Regex,
    /// Free text: leading course code followed by a title
    pub free_text_code: Regex,
}

impl TranscriptPatterns {
    fn new() -> Self {
        // Every pattern below is a constant; a failure to compile is a programmer error.
        let compile = |pattern: String| Regex::new(&pattern).expect("static regex must compile");

        Self {
            term_header: compile(format!(r"(?i)^{TERM}$")),
            inline_term: compile(format!(r"(?i){TERM}")),
            graded_course: compile(format!(
                r"^{COURSE_CODE}\s+(.+?)\s+({GRADE})\s+({NUMBER})"
            )),
            trailing_grade: compile(format!(r"^\s+(?:{GRADE})(?:[^A-Za-z0-9_+-]|$)")),
            credits_first_course: compile(format!(
                r"^{COURSE_CODE}\s+(.+?)\s+({NUMBER})\s+((?i:{GRADE}))(?:[^A-Za-z0-9_+-]|$)"
            )),
            registered_course: compile(format!(
                r"^{COURSE_CODE}\s+[0-9]{{3,4}}\s+({NUMBER})\s+{REGISTERED_TOKEN}\b"
            )),
            registered_in_block: compile(format!(
                r"{COURSE_CODE}\s+(?:\S+\s+)*?({NUMBER})\s+{REGISTERED_TOKEN}\b"
            )),
            number: compile(format!(r"({NUMBER})")),
            free_text_separator: compile(r"^(.+?)\s*[-:–—]\s*(.+)$".to_string()),
            free_text_code: compile(r"^([A-Z]{2,4}\s?[0-9]{2,4}[A-Z]?)\s+(.*)$".to_string()),
        }
    }
}

/// Shared compiled patterns
pub static PATTERNS: LazyLock<TranscriptPatterns> = LazyLock::new(TranscriptPatterns::new);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_header_accepts_sessions() {
        assert!(PATTERNS.term_header.is_match("Fall 2024"));
        assert!(PATTERNS.term_header.is_match("summer II 2023"));
        assert!(!PATTERNS.term_header.is_match("Fall 2024 CMSC131"));
        assert!(!PATTERNS.term_header.is_match("Fall"));
    }

    #[test]
    fn test_inline_term_finds_mention() {
        let found = PATTERNS.inline_term.find("Term: Spring 2023 (continued)").unwrap();
        assert_eq!(found.as_str(), "Spring 2023");
    }

    #[test]
    fn test_graded_course_prefers_incomplete_in_progress_token() {
        let caps = PATTERNS.graded_course.captures("ENGL101 Writing IP 3").unwrap();
        assert_eq!(&caps[3], "Writing");
        assert_eq!(&caps[4], "IP");
        assert_eq!(&caps[5], "3");
    }

    #[test]
    fn test_hyphenated_subject() {
        let caps = PATTERNS.graded_course.captures("MATH-140 Calculus A 4").unwrap();
        assert_eq!(&caps[1], "MATH");
        assert_eq!(&caps[2], "140");
    }

    #[test]
    fn test_trailing_grade() {
        assert!(PATTERNS.trailing_grade.is_match(" B+"));
        assert!(PATTERNS.trailing_grade.is_match(" A 16.0"));
        assert!(!PATTERNS.trailing_grade.is_match(" 16.0"));
        assert!(!PATTERNS.trailing_grade.is_match(" Best"));
    }

    #[test]
    fn test_credits_first_grade_keeps_modifier() {
        let caps = PATTERNS.credits_first_course.captures("MATH141 Calculus I 4 B+").unwrap();
        assert_eq!(&caps[3], "Calculus I");
        assert_eq!(&caps[4], "4");
        assert_eq!(&caps[5], "B+");
    }

    #[test]
    fn test_registered_course() {
        let caps = PATTERNS.registered_course.captures("CMSC330 0101 3 REG").unwrap();
        assert_eq!(&caps[1], "CMSC");
        assert_eq!(&caps[3], "3");
        assert!(!PATTERNS.registered_course.is_match("CMSC330 0101 3 REGISTERED"));
        // Five-digit registration numbers only qualify inside the current-courses block
        assert!(!PATTERNS.registered_course.is_match("CMSC330 12345 3 REG"));
    }

    #[test]
    fn test_registered_in_block_takes_figure_before_token() {
        let caps = PATTERNS.registered_in_block.captures("CMSC330 12345 3 REG").unwrap();
        assert_eq!(&caps[1], "CMSC");
        assert_eq!(&caps[2], "330");
        assert_eq!(&caps[3], "3");
    }
}
