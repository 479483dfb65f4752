//! Email content types and the post-to-email renderer.

pub mod render;
pub mod template;

use serde::{Deserialize, Serialize};

pub use render::EmailRenderer;

/// A content item as delivered by the host content system.
///
/// `content` is the already-expanded HTML fragment (shortcodes, embeds, and
/// block markup resolved by the host's own renderer before it reaches us).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Host-side identifier, used to key the campaign record.
    pub id: u64,
    /// Post title; becomes the campaign subject.
    pub title: String,
    /// Rendered HTML body.
    pub content: String,
}

/// Fully rendered campaign content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailContent {
    pub subject: String,
    pub html_body: String,
    pub plain_text: String,
}

/// Cross-site link shown in the email footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FooterLink {
    pub label: String,
    pub url: String,
}

/// Static branding applied to every rendered email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branding {
    /// Site name used in image alt text.
    pub site_name: String,
    /// Main site URL the logo links to.
    pub site_url: String,
    /// Logo image shown in the email header.
    pub logo_url: String,
    /// Public web archive of past newsletters.
    pub archive_url: String,
    /// Supporter note shown above the unsubscribe link.
    pub footer_note: String,
    /// Accent color for the header rule.
    pub accent_color: String,
    /// Optional cross-site navigation links in the footer.
    #[serde(default)]
    pub footer_links: Vec<FooterLink>,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            site_name: "Newsletter".to_string(),
            site_url: "https://example.com".to_string(),
            logo_url: "https://example.com/assets/logo.png".to_string(),
            archive_url: "https://newsletter.example.com".to_string(),
            footer_note: "You received this email because you've connected with us along the way. Thanks for reading."
                .to_string(),
            accent_color: "#53940b".to_string(),
            footer_links: Vec::new(),
        }
    }
}
