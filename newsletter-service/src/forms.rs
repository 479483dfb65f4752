//! Declarative form presets for the front-end renderers.
//!
//! Every subscription form on the site submits to the same endpoint with a
//! context slug; only the copy and layout differ. Keeping those differences
//! in one config table replaces the per-form markup the site used to carry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Display configuration for one form placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormPreset {
    /// Heading above the form, if the placement shows one.
    pub heading: Option<String>,
    /// Supporting copy below the heading.
    pub description: Option<String>,
    /// Layout hint for the renderer: `"horizontal"`, `"inline"`, or `"section"`.
    pub layout: String,
    pub placeholder: String,
    pub button_text: String,
    pub show_archive_link: bool,
    pub archive_link_text: Option<String>,
}

/// Built-in presets keyed by context slug.
pub fn presets() -> BTreeMap<String, FormPreset> {
    let mut map = BTreeMap::new();

    map.insert(
        "homepage".to_string(),
        FormPreset {
            heading: Some("A Note from the Editor".to_string()),
            description: Some(
                "Stories, reflections, and industry insights from behind the scenes.".to_string(),
            ),
            layout: "horizontal".to_string(),
            placeholder: "Your email for the inside scoop...".to_string(),
            button_text: "Get the Letter".to_string(),
            show_archive_link: true,
            archive_link_text: Some("Browse past newsletters".to_string()),
        },
    );

    map.insert(
        "navigation".to_string(),
        FormPreset {
            heading: None,
            description: None,
            layout: "inline".to_string(),
            placeholder: "Enter your email".to_string(),
            button_text: "Subscribe".to_string(),
            show_archive_link: true,
            archive_link_text: Some("See past newsletters".to_string()),
        },
    );

    map.insert(
        "content".to_string(),
        FormPreset {
            heading: Some("Stay Connected".to_string()),
            description: Some(
                "Get stories, reflections, and industry insights delivered to your inbox."
                    .to_string(),
            ),
            layout: "section".to_string(),
            placeholder: "Enter your email address".to_string(),
            button_text: "Subscribe".to_string(),
            show_archive_link: true,
            archive_link_text: Some("Browse past newsletters".to_string()),
        },
    );

    map.insert(
        "archive".to_string(),
        FormPreset {
            heading: Some("Subscribe to Our Newsletter".to_string()),
            description: Some(
                "Independent journalism with personality, delivered to your inbox.".to_string(),
            ),
            layout: "section".to_string(),
            placeholder: "Enter your email".to_string(),
            button_text: "Subscribe".to_string(),
            show_archive_link: false,
            archive_link_text: None,
        },
    );

    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_cover_standard_form_placements() {
        let presets = presets();

        for context in ["homepage", "navigation", "content", "archive"] {
            assert!(presets.contains_key(context), "missing {}", context);
        }
    }

    #[test]
    fn test_navigation_preset_is_chrome_free() {
        let presets = presets();
        let nav = &presets["navigation"];

        assert_eq!(nav.heading, None);
        assert_eq!(nav.layout, "inline");
    }
}
