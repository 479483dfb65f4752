//! Campaign publishing: create-or-update a remote Sendy campaign for a post
//! and remember the allocated campaign ID.
//!
//! Per-post state machine: no campaign → campaign exists (id). Subsequent
//! publishes update in place; there is no deletion. No retries; the
//! editorial caller re-triggers manually on failure.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::RwLock;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::email::EmailContent;
use crate::sendy::{campaign_exists, created_campaign_id, SendyClient, TransportError};
use crate::settings::SettingsStore;

/// Failure publishing a campaign. All variants are caller-recoverable.
#[derive(Debug, Error)]
pub enum CampaignError {
    #[error("failed to check campaign status")]
    StatusCheck(#[source] TransportError),

    #[error("failed to submit campaign")]
    Submit(#[source] TransportError),

    #[error("campaign create returned an unexpected response")]
    UnexpectedResponse,

    #[error("failed to persist campaign record: {0}")]
    Store(String),
}

/// Persistence boundary for post → remote campaign ID associations.
pub trait CampaignStore: Send + Sync {
    /// Stored campaign ID for a post, if one was ever allocated.
    fn campaign_id(&self, post_id: u64) -> Option<String>;

    /// Associate a campaign ID with a post. Overwrites any previous value.
    fn set_campaign_id(&self, post_id: u64, campaign_id: &str) -> Result<(), CampaignError>;
}

/// File-backed campaign store: one JSON map of post ID to campaign ID.
#[derive(Debug, Clone)]
pub struct JsonCampaignStore {
    path: PathBuf,
}

impl JsonCampaignStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_map(&self) -> BTreeMap<String, String> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "campaign_store_read_failed");
                return BTreeMap::new();
            }
        };

        match serde_json::from_str(&data) {
            Ok(map) => map,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "campaign_store_parse_failed");
                BTreeMap::new()
            }
        }
    }
}

impl CampaignStore for JsonCampaignStore {
    fn campaign_id(&self, post_id: u64) -> Option<String> {
        self.read_map().get(&post_id.to_string()).cloned()
    }

    fn set_campaign_id(&self, post_id: u64, campaign_id: &str) -> Result<(), CampaignError> {
        let mut map = self.read_map();
        map.insert(post_id.to_string(), campaign_id.to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CampaignError::Store(e.to_string()))?;
        }

        let data =
            serde_json::to_string_pretty(&map).map_err(|e| CampaignError::Store(e.to_string()))?;
        std::fs::write(&self.path, data).map_err(|e| CampaignError::Store(e.to_string()))?;

        debug!(post_id = post_id, campaign_id = campaign_id, "campaign_record_saved");
        Ok(())
    }
}

/// In-memory campaign store for tests and demos.
#[derive(Debug, Default)]
pub struct MemoryCampaignStore {
    records: RwLock<BTreeMap<u64, String>>,
}

impl MemoryCampaignStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CampaignStore for MemoryCampaignStore {
    fn campaign_id(&self, post_id: u64) -> Option<String> {
        self.records
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&post_id)
            .cloned()
    }

    fn set_campaign_id(&self, post_id: u64, campaign_id: &str) -> Result<(), CampaignError> {
        self.records
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(post_id, campaign_id.to_string());
        Ok(())
    }
}

/// Creates or updates the remote campaign for a post.
pub struct CampaignPublisher {
    client: SendyClient,
    settings: Arc<dyn SettingsStore>,
    store: Arc<dyn CampaignStore>,
}

impl CampaignPublisher {
    pub fn new(
        client: SendyClient,
        settings: Arc<dyn SettingsStore>,
        store: Arc<dyn CampaignStore>,
    ) -> Self {
        Self {
            client,
            settings,
            store,
        }
    }

    /// Publish `content` as the campaign for `post_id`, returning the
    /// campaign ID (newly allocated or existing).
    pub async fn publish(
        &self,
        post_id: u64,
        content: &EmailContent,
    ) -> Result<String, CampaignError> {
        let settings = self.settings.load();

        // A stored ID only counts if the upstream still knows the campaign;
        // otherwise fall back to create and overwrite the stale record.
        let existing = match self.store.campaign_id(post_id) {
            Some(id) => {
                let body = self
                    .client
                    .campaign_status(&settings, &id)
                    .await
                    .map_err(CampaignError::StatusCheck)?;

                if campaign_exists(&body) {
                    Some(id)
                } else {
                    warn!(post_id = post_id, campaign_id = %id, "campaign_record_stale");
                    None
                }
            }
            None => None,
        };

        match existing {
            Some(id) => {
                self.client
                    .submit_campaign(&settings, content, Some(&id))
                    .await
                    .map_err(CampaignError::Submit)?;

                info!(post_id = post_id, campaign_id = %id, "campaign_updated");
                Ok(id)
            }
            None => {
                let body = self
                    .client
                    .submit_campaign(&settings, content, None)
                    .await
                    .map_err(CampaignError::Submit)?;

                let id = match created_campaign_id(&body) {
                    Some(id) => id,
                    None => {
                        error!(
                            post_id = post_id,
                            response_body = %body,
                            "campaign_create_unexpected_response"
                        );
                        return Err(CampaignError::UnexpectedResponse);
                    }
                };

                self.store.set_campaign_id(post_id, &id)?;

                info!(post_id = post_id, campaign_id = %id, "campaign_created");
                Ok(id)
            }
        }
    }
}
