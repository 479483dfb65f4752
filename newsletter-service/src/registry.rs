//! Integration registry mapping subscription contexts to their configuration keys.
//!
//! Each subscription entry point on the site (navigation bar, homepage section,
//! archive page, ...) registers an [`Integration`] descriptor binding its context
//! slug to the settings keys that hold its enable flag and target list ID.
//!
//! Registration happens once at startup, single-threaded; the registry is then
//! shared read-only behind an `Arc` for the lifetime of the process.

use std::collections::BTreeMap;

/// Descriptor binding a subscription context to its configuration keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Integration {
    /// Unique context slug, e.g. `"homepage"` or `"navigation"`.
    pub context: String,
    /// Human-readable label shown on the admin settings screen.
    pub label: String,
    /// Short description of where the form appears.
    pub description: String,
    /// Settings key holding the target mailing-list ID.
    pub list_id_key: String,
    /// Settings key holding the enable toggle.
    pub enable_key: String,
}

impl Integration {
    /// Build a descriptor with the conventional key names
    /// (`{context}_list_id` / `enable_{context}`).
    pub fn new(context: &str, label: &str, description: &str) -> Self {
        Self {
            context: context.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            list_id_key: format!("{}_list_id", context),
            enable_key: format!("enable_{}", context),
        }
    }
}

/// Registry of subscription integrations, keyed by context.
///
/// A `BTreeMap` keeps iteration order stable for the admin listing.
#[derive(Debug, Default)]
pub struct IntegrationRegistry {
    integrations: BTreeMap<String, Integration>,
}

impl IntegrationRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with the built-in site integrations.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for integration in default_integrations() {
            registry.register(integration);
        }
        registry
    }

    /// Add or overwrite an integration, keyed by its context.
    pub fn register(&mut self, integration: Integration) {
        self.integrations
            .insert(integration.context.clone(), integration);
    }

    /// Look up an integration by context.
    pub fn get(&self, context: &str) -> Option<&Integration> {
        self.integrations.get(context)
    }

    /// Iterate over all registered integrations in stable order.
    pub fn all(&self) -> impl Iterator<Item = &Integration> {
        self.integrations.values()
    }

    /// Number of registered integrations.
    pub fn len(&self) -> usize {
        self.integrations.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.integrations.is_empty()
    }
}

/// Built-in integrations for the standard site form placements.
fn default_integrations() -> Vec<Integration> {
    vec![
        Integration::new(
            "navigation",
            "Navigation Menu Form",
            "Newsletter subscription in site navigation",
        ),
        Integration::new(
            "homepage",
            "Homepage Newsletter Form",
            "Main homepage subscription form",
        ),
        Integration::new(
            "archive",
            "Archive Page Form",
            "Newsletter archive page subscription",
        ),
        Integration::new(
            "content",
            "Content Form",
            "Newsletter form after post content",
        ),
        Integration::new(
            "footer",
            "Footer Form",
            "Newsletter subscription in the site footer",
        ),
        Integration::new(
            "popup",
            "Popup Form",
            "Timed newsletter popup subscription",
        ),
        Integration::new(
            "festival_wire_tip",
            "Festival Wire Tips",
            "Guest tip submitters subscribed to festival updates",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integration_key_conventions() {
        let integration = Integration::new("homepage", "Homepage", "Homepage form");

        assert_eq!(integration.list_id_key, "homepage_list_id");
        assert_eq!(integration.enable_key, "enable_homepage");
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = IntegrationRegistry::new();
        registry.register(Integration::new("homepage", "Homepage", "Homepage form"));

        let found = registry.get("homepage").unwrap();
        assert_eq!(found.context, "homepage");
        assert!(registry.get("sidebar").is_none());
    }

    #[test]
    fn test_register_overwrites_by_context() {
        let mut registry = IntegrationRegistry::new();
        registry.register(Integration::new("homepage", "First", "First form"));
        registry.register(Integration::new("homepage", "Second", "Second form"));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("homepage").unwrap().label, "Second");
    }

    #[test]
    fn test_defaults_include_standard_contexts() {
        let registry = IntegrationRegistry::with_defaults();

        for context in [
            "navigation",
            "homepage",
            "archive",
            "content",
            "footer",
            "popup",
            "festival_wire_tip",
        ] {
            assert!(registry.get(context).is_some(), "missing {}", context);
        }
    }

    #[test]
    fn test_all_is_stable_order() {
        let registry = IntegrationRegistry::with_defaults();
        let first: Vec<String> = registry.all().map(|i| i.context.clone()).collect();
        let second: Vec<String> = registry.all().map(|i| i.context.clone()).collect();

        assert_eq!(first, second);
    }
}
