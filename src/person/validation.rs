//! Name validation
//!
//! Names may contain ASCII letters and spaces only. Digits, punctuation and
//! control characters are rejected, as is the empty string.

use std::sync::OnceLock;

use regex::Regex;

const VALID_NAME_PATTERN: &str = "^[A-Za-z ]+$";

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(VALID_NAME_PATTERN).expect("name pattern is a valid regex"))
}

/// Check whether a name is acceptable for create and update
pub fn is_valid_name(name: &str) -> bool {
    name_pattern().is_match(name)
}
