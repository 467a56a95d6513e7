//! Text formats shared by the submission engine and account validation.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use regex::Regex;

pub const EMAIL_EXPRESSION: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
pub const PHONE_EXPRESSION: &str = r"^\+?[0-9 ()-]{7,20}$";

static PATTERNS: OnceLock<Mutex<HashMap<String, Option<Regex>>>> = OnceLock::new();

pub fn is_email(text: &str) -> bool {
    matches_pattern(EMAIL_EXPRESSION, text)
}

pub fn is_phone(text: &str) -> bool {
    matches_pattern(PHONE_EXPRESSION, text)
}

/// Match `text` against `pattern`, compiling each distinct pattern once per process.
/// A pattern that does not compile matches nothing.
pub fn matches_pattern(pattern: &str, text: &str) -> bool {
    compiled(pattern).is_some_and(|regex| regex.is_match(text))
}

fn compiled(pattern: &str) -> Option<Regex> {
    let cache = PATTERNS.get_or_init(|| Mutex::new(HashMap::new()));
    let Ok(mut cache) = cache.lock() else {
        return Regex::new(pattern).ok();
    };
    cache
        .entry(pattern.to_string())
        .or_insert_with(|| Regex::new(pattern).ok())
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_check_agrees_with_the_expression() {
        let expression = Regex::new(EMAIL_EXPRESSION).expect("compiles");
        for candidate in [
            "a@b.com",
            "juan.dela.cruz@barangay.gov.ph",
            "a@b..",
            "a@.b.c",
            "not-an-email",
            "a@b",
            "a @b.com",
            "a@b@c.com",
            "@b.com",
            "",
        ] {
            assert_eq!(
                is_email(candidate),
                expression.is_match(candidate),
                "{candidate:?}"
            );
        }
        assert!(is_email("a@b.."));
        assert!(!is_email("a@b@c.com"));
    }

    #[test]
    fn phone_check_agrees_with_the_expression() {
        let expression = Regex::new(PHONE_EXPRESSION).expect("compiles");
        for candidate in [
            "+63 912 345 6789",
            "(02) 8123-4567",
            "12345",
            "0912-CALL-NOW",
            "++6391234567",
            "+123456789012345678901",
        ] {
            assert_eq!(
                is_phone(candidate),
                expression.is_match(candidate),
                "{candidate:?}"
            );
        }
        assert!(is_phone("(02) 8123-4567"));
        assert!(!is_phone("12345"));
    }

    #[test]
    fn custom_patterns_are_compiled_once_and_reused() {
        assert!(matches_pattern("^[0-9]{4}$", "2048"));
        assert!(!matches_pattern("^[0-9]{4}$", "20481"));

        let cache = PATTERNS
            .get()
            .expect("cache initialised")
            .lock()
            .expect("cache lock");
        assert!(cache.get("^[0-9]{4}$").is_some_and(Option::is_some));
    }

    #[test]
    fn uncompilable_patterns_match_nothing() {
        assert!(!matches_pattern("[unclosed", "anything"));
        assert!(!matches_pattern("[unclosed", ""));
    }
}
