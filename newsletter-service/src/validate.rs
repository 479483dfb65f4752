//! Shared syntactic validation helpers.

use std::sync::OnceLock;

use regex::Regex;

/// Anchored RFC-shaped email check.
///
/// This is a syntactic gate only; deliverability is the upstream platform's
/// concern. Matches the local-part/domain shape accepted across the codebase.
pub fn is_valid_email(email: &str) -> bool {
    static RE_EMAIL: OnceLock<Regex> = OnceLock::new();
    let re = RE_EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
            .expect("invalid email pattern")
    });

    re.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_addresses() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co"));
        assert!(is_valid_email("USER_99%x@example.org"));
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user@example.com extra"));
    }
}
