// Validation utilities module
// Provides custom validation functions for member input rules

use regex::Regex;
use std::sync::OnceLock;
use validator::ValidationError;

fn username_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("username pattern is a valid regex")
    })
}

/// Validates that a username only contains letters, digits, '_', '.' or '-'
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username_pattern().is_match(username) {
        Ok(())
    } else {
        let mut error = ValidationError::new("invalid_username");
        error.message = Some("Username may only contain letters, digits, '_', '.' and '-'".into());
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_usernames() {
        for name in ["alice", "bob_2", "j.doe", "x-y"] {
            assert!(validate_username(name).is_ok(), "{} should be accepted", name);
        }
    }

    #[test]
    fn test_rejects_whitespace_and_symbols() {
        for name in ["alice smith", "bob!", "", "é"] {
            assert!(validate_username(name).is_err(), "{:?} should be rejected", name);
        }
    }
}
