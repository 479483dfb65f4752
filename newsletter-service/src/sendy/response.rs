//! Translation of Sendy's plain-text response bodies into typed outcomes.
//!
//! Sendy has no structured response format: subscribe calls answer with `"1"`
//! or short English sentences, campaign creation answers with a bare numeric
//! ID. All substring matching against that contract lives here so an upstream
//! format change is a single-point edit.

/// Typed outcome of a subscribe call, derived from the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    /// The address was added to the list.
    Subscribed,
    /// The address was already on the list.
    AlreadySubscribed,
    /// The upstream rejected the address as invalid.
    InvalidEmail,
    /// Response matched none of the known patterns.
    Failed,
}

/// Classify a subscribe response body.
pub fn classify_subscribe_response(body: &str) -> SubscribeOutcome {
    if body == "1" || body.contains("Success") {
        SubscribeOutcome::Subscribed
    } else if body.contains("Already subscribed") {
        SubscribeOutcome::AlreadySubscribed
    } else if body.contains("Invalid") {
        SubscribeOutcome::InvalidEmail
    } else {
        SubscribeOutcome::Failed
    }
}

/// Whether a campaign-status response confirms the campaign exists.
pub fn campaign_exists(body: &str) -> bool {
    body.trim() == "Campaign exists"
}

/// Extract the campaign ID allocated by a create call, if the body is one.
///
/// Sendy answers campaign creation with the bare numeric ID; anything else
/// (error sentences, HTML) yields `None`.
pub fn created_campaign_id(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        Some(trimmed.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_numeric_one_is_subscribed() {
        assert_eq!(classify_subscribe_response("1"), SubscribeOutcome::Subscribed);
    }

    #[test]
    fn test_classify_success_sentence_is_subscribed() {
        assert_eq!(
            classify_subscribe_response("Success: subscribed"),
            SubscribeOutcome::Subscribed
        );
    }

    #[test]
    fn test_classify_already_subscribed() {
        assert_eq!(
            classify_subscribe_response("Already subscribed."),
            SubscribeOutcome::AlreadySubscribed
        );
    }

    #[test]
    fn test_classify_invalid() {
        assert_eq!(
            classify_subscribe_response("Invalid email address."),
            SubscribeOutcome::InvalidEmail
        );
    }

    #[test]
    fn test_classify_unknown_is_failed() {
        assert_eq!(classify_subscribe_response("??"), SubscribeOutcome::Failed);
        assert_eq!(classify_subscribe_response(""), SubscribeOutcome::Failed);
    }

    #[test]
    fn test_campaign_exists() {
        assert!(campaign_exists("Campaign exists"));
        assert!(campaign_exists("  Campaign exists\n"));
        assert!(!campaign_exists("Campaign doesn't exist"));
        assert!(!campaign_exists(""));
    }

    #[test]
    fn test_created_campaign_id() {
        assert_eq!(created_campaign_id("77"), Some("77".to_string()));
        assert_eq!(created_campaign_id(" 1234\n"), Some("1234".to_string()));
        assert_eq!(created_campaign_id("Campaign created"), None);
        assert_eq!(created_campaign_id("12a"), None);
        assert_eq!(created_campaign_id(""), None);
    }
}
