//! Credit-hour sanitization

use super::patterns::PATTERNS;

/// Smallest credit figure accepted on a course line
pub const MIN_CREDITS: f64 = 0.5;

/// Largest credit figure accepted on a course line
pub const MAX_CREDITS: f64 = 6.0;

/// Whether a figure is a plausible credit-hour value
pub fn is_valid_credits(value: f64) -> bool {
    (MIN_CREDITS..=MAX_CREDITS).contains(&value)
}

/// Settle the credit value for a course line.
///
/// A `candidate` already within [`MIN_CREDITS`, `MAX_CREDITS`] is returned as is.
/// Otherwise every numeric token on `line` is considered and the last one in
/// range wins: course numbers, section numbers and years tend to precede the
/// credit column, which is the last small figure on the line.
pub fn sanitize_credits(line: &str, candidate: Option<f64>) -> Option<f64> {
    if let Some(value) = candidate.filter(|v| is_valid_credits(*v)) {
        return Some(value);
    }

    PATTERNS
        .number
        .find_iter(line)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| is_valid_credits(*v))
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range_candidate_is_kept() {
        for value in [0.5, 1.0, 3.0, 4.5, 6.0] {
            assert_eq!(sanitize_credits("anything 9 9 9", Some(value)), Some(value));
        }
    }

    #[test]
    fn test_out_of_range_candidate_falls_back_to_last_small_number() {
        let line = "HIST101 American History to 1865 1865 3.0 B";
        assert_eq!(sanitize_credits(line, Some(1865.0)), Some(3.0));
    }

    #[test]
    fn test_last_qualifying_number_wins() {
        assert_eq!(sanitize_credits("ABC 2 x 4 y 12", Some(12.0)), Some(4.0));
    }

    #[test]
    fn test_no_qualifying_number() {
        assert_eq!(sanitize_credits("CMSC330 0101 REG", Some(101.0)), None);
        assert_eq!(sanitize_credits("", None), None);
        assert_eq!(sanitize_credits("0.25 7 12.5", None), None);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(is_valid_credits(MIN_CREDITS));
        assert!(is_valid_credits(MAX_CREDITS));
        assert!(!is_valid_credits(0.49));
        assert!(!is_valid_credits(6.01));
    }

    #[test]
    fn test_huge_digit_runs_do_not_panic() {
        let line = format!("{} 2.5", "9".repeat(500));
        assert_eq!(sanitize_credits(&line, None), Some(2.5));
    }
}
