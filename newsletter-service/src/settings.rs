//! Persisted service settings: API credentials, sender identity, and
//! per-integration enable flags and list IDs.
//!
//! Settings live in a single JSON blob behind the [`SettingsStore`] trait.
//! They are read on every bridge call and written only through the admin
//! endpoint; writes are infrequent and last-write-wins.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::validate::is_valid_email;

/// Errors raised by settings validation and persistence.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read or write settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid settings field {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Full service settings blob.
///
/// Integration toggles and list IDs are open maps keyed by the registry's
/// `enable_key` / `list_id_key` so collaborator-registered integrations need
/// no schema change here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsletterSettings {
    /// Sendy API key.
    #[serde(default)]
    pub api_key: String,

    /// Base URL of the Sendy installation, without trailing slash.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Name shown in the "From" field of campaigns.
    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// Address shown in the "From" field of campaigns.
    #[serde(default = "default_from_email")]
    pub from_email: String,

    /// Reply-to address for campaigns.
    #[serde(default = "default_reply_to")]
    pub reply_to: String,

    /// Sendy brand ID campaigns are created under.
    #[serde(default = "default_brand_id")]
    pub brand_id: String,

    /// Per-integration enable toggles, keyed by `enable_key`.
    /// A missing key means enabled.
    #[serde(default)]
    pub enable_flags: BTreeMap<String, bool>,

    /// Per-integration list IDs, keyed by `list_id_key`.
    #[serde(default)]
    pub list_ids: BTreeMap<String, String>,
}

fn default_api_url() -> String {
    "https://mail.example.com/sendy".to_string()
}

fn default_from_name() -> String {
    "Newsletter".to_string()
}

fn default_from_email() -> String {
    "newsletter@example.com".to_string()
}

fn default_reply_to() -> String {
    "editor@example.com".to_string()
}

fn default_brand_id() -> String {
    "1".to_string()
}

impl Default for NewsletterSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_api_url(),
            from_name: default_from_name(),
            from_email: default_from_email(),
            reply_to: default_reply_to(),
            brand_id: default_brand_id(),
            enable_flags: BTreeMap::new(),
            list_ids: BTreeMap::new(),
        }
    }
}

impl NewsletterSettings {
    /// Whether the integration behind `enable_key` is enabled.
    /// Integrations are enabled until explicitly switched off.
    pub fn integration_enabled(&self, enable_key: &str) -> bool {
        self.enable_flags.get(enable_key).copied().unwrap_or(true)
    }

    /// The list ID behind `list_id_key`, treating empty strings as unset.
    pub fn list_id(&self, list_id_key: &str) -> Option<&str> {
        self.list_ids
            .get(list_id_key)
            .map(String::as_str)
            .filter(|id| !id.is_empty())
    }

    /// Validate and normalize admin input into a storable settings value.
    ///
    /// Text fields are trimmed, sender addresses must be RFC-shaped, and the
    /// API URL must be a well-formed http(s) URL. The trailing slash on the
    /// API URL is stripped so endpoint paths can be appended verbatim.
    pub fn sanitized(&self) -> Result<NewsletterSettings, SettingsError> {
        let api_url = self.api_url.trim().trim_end_matches('/').to_string();
        let parsed = Url::parse(&api_url).map_err(|e| SettingsError::Invalid {
            field: "api_url",
            reason: e.to_string(),
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(SettingsError::Invalid {
                field: "api_url",
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }

        let from_email = self.from_email.trim().to_string();
        if !is_valid_email(&from_email) {
            return Err(SettingsError::Invalid {
                field: "from_email",
                reason: "not a valid email address".to_string(),
            });
        }

        let reply_to = self.reply_to.trim().to_string();
        if !is_valid_email(&reply_to) {
            return Err(SettingsError::Invalid {
                field: "reply_to",
                reason: "not a valid email address".to_string(),
            });
        }

        let list_ids = self
            .list_ids
            .iter()
            .map(|(key, id)| (key.clone(), id.trim().to_string()))
            .collect();

        Ok(NewsletterSettings {
            api_key: self.api_key.trim().to_string(),
            api_url,
            from_name: self.from_name.trim().to_string(),
            from_email,
            reply_to,
            brand_id: self.brand_id.trim().to_string(),
            enable_flags: self.enable_flags.clone(),
            list_ids,
        })
    }
}

/// Persistence boundary for the settings blob.
///
/// `load` never fails: a fresh install, a missing file, or a corrupt blob all
/// yield usable defaults so the service stays serviceable.
pub trait SettingsStore: Send + Sync {
    /// Current settings, merged with defaults for anything missing.
    fn load(&self) -> NewsletterSettings;

    /// Persist a settings blob. Last write wins.
    fn save(&self, settings: &NewsletterSettings) -> Result<(), SettingsError>;
}

/// File-backed settings store holding one JSON document.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> NewsletterSettings {
        let path = self.path.display().to_string();

        let data = match std::fs::read_to_string(&self.path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path, "settings_file_not_found");
                return NewsletterSettings::default();
            }
            Err(e) => {
                warn!(path = %path, error = %e, "settings_file_read_failed");
                return NewsletterSettings::default();
            }
        };

        match serde_json::from_str(&data) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = %path, error = %e, "settings_file_parse_failed");
                NewsletterSettings::default()
            }
        }
    }

    fn save(&self, settings: &NewsletterSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, data)?;

        debug!(path = %self.path.display(), "settings_saved");
        Ok(())
    }
}

/// In-memory settings store for tests and demos.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: RwLock<NewsletterSettings>,
}

impl MemorySettingsStore {
    pub fn new(settings: NewsletterSettings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> NewsletterSettings {
        self.settings
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn save(&self, settings: &NewsletterSettings) -> Result<(), SettingsError> {
        *self
            .settings
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = settings.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_usable() {
        let settings = NewsletterSettings::default();

        assert!(settings.api_key.is_empty());
        assert!(settings.api_url.starts_with("https://"));
        assert!(is_valid_email(&settings.from_email));
        assert!(is_valid_email(&settings.reply_to));
    }

    #[test]
    fn test_integration_enabled_defaults_to_true() {
        let mut settings = NewsletterSettings::default();
        assert!(settings.integration_enabled("enable_homepage"));

        settings
            .enable_flags
            .insert("enable_homepage".to_string(), false);
        assert!(!settings.integration_enabled("enable_homepage"));
    }

    #[test]
    fn test_empty_list_id_is_unset() {
        let mut settings = NewsletterSettings::default();
        assert_eq!(settings.list_id("homepage_list_id"), None);

        settings
            .list_ids
            .insert("homepage_list_id".to_string(), "".to_string());
        assert_eq!(settings.list_id("homepage_list_id"), None);

        settings
            .list_ids
            .insert("homepage_list_id".to_string(), "42".to_string());
        assert_eq!(settings.list_id("homepage_list_id"), Some("42"));
    }

    #[test]
    fn test_sanitized_trims_and_strips_trailing_slash() {
        let settings = NewsletterSettings {
            api_key: "  key  ".to_string(),
            api_url: "https://mail.example.com/sendy/".to_string(),
            from_name: " Newsletter ".to_string(),
            ..NewsletterSettings::default()
        };

        let clean = settings.sanitized().unwrap();
        assert_eq!(clean.api_key, "key");
        assert_eq!(clean.api_url, "https://mail.example.com/sendy");
        assert_eq!(clean.from_name, "Newsletter");
    }

    #[test]
    fn test_sanitized_rejects_bad_email() {
        let settings = NewsletterSettings {
            from_email: "not-an-email".to_string(),
            ..NewsletterSettings::default()
        };

        let err = settings.sanitized().unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "from_email",
                ..
            }
        ));
    }

    #[test]
    fn test_sanitized_rejects_bad_url() {
        let settings = NewsletterSettings {
            api_url: "not a url".to_string(),
            ..NewsletterSettings::default()
        };
        assert!(settings.sanitized().is_err());

        let settings = NewsletterSettings {
            api_url: "ftp://mail.example.com".to_string(),
            ..NewsletterSettings::default()
        };
        assert!(settings.sanitized().is_err());
    }

    #[test]
    fn test_json_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSettingsStore::new(dir.path().join("settings.json"));

        // Fresh install loads defaults.
        assert_eq!(store.load(), NewsletterSettings::default());

        let mut settings = NewsletterSettings::default();
        settings.api_key = "secret".to_string();
        settings
            .list_ids
            .insert("homepage_list_id".to_string(), "42".to_string());
        store.save(&settings).unwrap();

        let loaded = store.load();
        assert_eq!(loaded.api_key, "secret");
        assert_eq!(loaded.list_id("homepage_list_id"), Some("42"));
    }

    #[test]
    fn test_json_store_corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonSettingsStore::new(path);
        assert_eq!(store.load(), NewsletterSettings::default());
    }

    #[test]
    fn test_partial_blob_merges_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"api_key": "abc"}"#).unwrap();

        let store = JsonSettingsStore::new(path);
        let loaded = store.load();

        assert_eq!(loaded.api_key, "abc");
        assert_eq!(loaded.from_name, "Newsletter");
        assert!(loaded.api_url.starts_with("https://"));
    }
}
