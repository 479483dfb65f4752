//! Festival tip intake: validation and per-IP rate limiting.
//!
//! Tips arrive from anonymous visitors, so the endpoint carries the
//! anti-abuse checks the rest of the service doesn't need: a honeypot field,
//! content length bounds, and a submission cooldown per source address.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Minimum tip length; anything shorter is noise.
const MIN_CONTENT_LEN: usize = 10;
/// Maximum tip length.
const MAX_CONTENT_LEN: usize = 1000;

/// A submitted tip.
#[derive(Debug, Clone, Deserialize)]
pub struct TipSubmission {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub email: String,
    /// Honeypot field; real visitors leave it empty.
    #[serde(default)]
    pub website: String,
}

/// Validation failure with a user-facing message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TipError {
    #[error("Spam detected.")]
    Spam,

    #[error("Please enter your tip.")]
    MissingContent,

    #[error("Please provide a more detailed tip (at least 10 characters).")]
    ContentTooShort,

    #[error("Your tip is too long. Please keep it under 1000 characters.")]
    ContentTooLong,

    #[error("Email address is required.")]
    MissingEmail,

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Please wait before submitting another tip.")]
    RateLimited,
}

/// Check a submission against the honeypot, length, and email rules.
pub fn validate_tip(tip: &TipSubmission) -> Result<(), TipError> {
    if !tip.website.trim().is_empty() {
        return Err(TipError::Spam);
    }

    let content = tip.content.trim();
    if content.is_empty() {
        return Err(TipError::MissingContent);
    }
    if content.len() < MIN_CONTENT_LEN {
        return Err(TipError::ContentTooShort);
    }
    if content.len() > MAX_CONTENT_LEN {
        return Err(TipError::ContentTooLong);
    }

    let email = tip.email.trim();
    if email.is_empty() {
        return Err(TipError::MissingEmail);
    }
    if !crate::validate::is_valid_email(email) {
        return Err(TipError::InvalidEmail);
    }

    Ok(())
}

/// Per-IP submission cooldown.
///
/// Entries are pruned opportunistically on write, so the map stays bounded by
/// the number of distinct addresses seen within one window.
pub struct TipGate {
    window: Duration,
    last_seen: Mutex<HashMap<IpAddr, Instant>>,
}

impl TipGate {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_seen: Mutex::new(HashMap::new()),
        }
    }

    /// Whether `ip` submitted within the current window.
    pub fn is_limited(&self, ip: IpAddr) -> bool {
        let last_seen = self
            .last_seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        match last_seen.get(&ip) {
            Some(at) => at.elapsed() < self.window,
            None => false,
        }
    }

    /// Record a successful submission from `ip`.
    pub fn mark(&self, ip: IpAddr) {
        let mut last_seen = self
            .last_seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let window = self.window;
        last_seen.retain(|_, at| at.elapsed() < window);
        last_seen.insert(ip, Instant::now());

        debug!(tracked_addresses = last_seen.len(), "tip_rate_limit_marked");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tip(content: &str, email: &str, website: &str) -> TipSubmission {
        TipSubmission {
            content: content.to_string(),
            email: email.to_string(),
            website: website.to_string(),
        }
    }

    #[test]
    fn test_valid_tip_passes() {
        let result = validate_tip(&tip(
            "Headliner change announced for Saturday night.",
            "user@example.com",
            "",
        ));
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_honeypot_rejects_as_spam() {
        let result = validate_tip(&tip(
            "Headliner change announced for Saturday night.",
            "user@example.com",
            "https://spam.example",
        ));
        assert_eq!(result, Err(TipError::Spam));
    }

    #[test]
    fn test_content_length_bounds() {
        assert_eq!(
            validate_tip(&tip("", "user@example.com", "")),
            Err(TipError::MissingContent)
        );
        assert_eq!(
            validate_tip(&tip("too short", "user@example.com", "")),
            Err(TipError::ContentTooShort)
        );
        let long = "x".repeat(MAX_CONTENT_LEN + 1);
        assert_eq!(
            validate_tip(&tip(&long, "user@example.com", "")),
            Err(TipError::ContentTooLong)
        );
    }

    #[test]
    fn test_email_required_and_validated() {
        assert_eq!(
            validate_tip(&tip("A perfectly fine tip here.", "", "")),
            Err(TipError::MissingEmail)
        );
        assert_eq!(
            validate_tip(&tip("A perfectly fine tip here.", "nope", "")),
            Err(TipError::InvalidEmail)
        );
    }

    #[test]
    fn test_gate_limits_within_window() {
        let gate = TipGate::new(Duration::from_secs(300));
        let ip: IpAddr = "203.0.113.9".parse().unwrap();

        assert!(!gate.is_limited(ip));
        gate.mark(ip);
        assert!(gate.is_limited(ip));

        // Other addresses are unaffected.
        let other: IpAddr = "203.0.113.10".parse().unwrap();
        assert!(!gate.is_limited(other));
    }

    #[test]
    fn test_gate_zero_window_never_limits() {
        let gate = TipGate::new(Duration::ZERO);
        let ip: IpAddr = "203.0.113.9".parse().unwrap();

        gate.mark(ip);
        assert!(!gate.is_limited(ip));
    }
}
