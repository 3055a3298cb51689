//! Lenient comparison of learner answers against the canonical answer.
//!
//! Case, surrounding whitespace, repeated spaces, punctuation, and
//! parentheses are all ignored so typed answers are not rejected over
//! formatting.

/// Canonical form used for comparison.
#[must_use]
pub fn normalize_answer(answer: &str) -> String {
    let mut out = String::with_capacity(answer.len());
    let mut last_was_space = false;
    for ch in answer.trim().chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                out.push(' ');
                last_was_space = true;
            }
            continue;
        }
        if matches!(ch, '.' | ',' | ';' | ':' | '!' | '?' | '(' | ')') {
            continue;
        }
        out.extend(ch.to_lowercase());
        last_was_space = false;
    }
    // trailing space can remain when the input ends in stripped punctuation
    while out.ends_with(' ') {
        out.pop();
    }
    out
}

/// Whether a typed answer matches the canonical one.
///
/// Normalized exact match wins first. Answers that both reduce to a number
/// (choice indexes, "정답: 2" style answers) compare numerically. Blank
/// placeholders in the canonical answer never match loosely.
#[must_use]
pub fn check_answer(user_answer: &str, correct_answer: &str) -> bool {
    let user = normalize_answer(user_answer);
    let correct = normalize_answer(correct_answer);

    if user == correct {
        return true;
    }

    if correct.contains("___") {
        return false;
    }

    match (extract_number(&user), extract_number(&correct)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Comparison for fill-in-the-blank questions: only the blank's content is
/// canonical, so this is a strict normalized match.
#[must_use]
pub fn check_blank_answer(user_answer: &str, correct_answer: &str) -> bool {
    normalize_answer(user_answer) == normalize_answer(correct_answer)
}

fn extract_number(text: &str) -> Option<u64> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_collapses_case_space_and_punctuation() {
        assert_eq!(normalize_answer("  Red   Pine! "), "red pine");
        assert_eq!(normalize_answer("(a) option, one."), "a option one");
    }

    #[test]
    fn exact_match_after_normalization() {
        assert!(check_answer("Chamaecyparis obtusa", "chamaecyparis  obtusa"));
        assert!(!check_answer("larch", "red pine"));
    }

    #[test]
    fn numeric_answers_compare_by_value() {
        assert!(check_answer("2", "2번"));
        assert!(check_answer("answer 3", "3"));
        assert!(!check_answer("2", "3"));
    }

    #[test]
    fn blank_placeholder_never_matches_loosely() {
        assert!(!check_answer("15", "___ 15 ___"));
    }

    #[test]
    fn blank_answers_require_strict_normalized_match() {
        assert!(check_blank_answer(" Pinus densiflora ", "pinus densiflora"));
        assert!(!check_blank_answer("pinus", "pinus densiflora"));
    }

    #[test]
    fn non_numeric_mismatch_is_rejected() {
        assert!(!check_answer("oak", "2"));
    }
}
