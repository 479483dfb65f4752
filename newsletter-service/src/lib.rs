//! Newsletter bridge - subscription and campaign distribution over a
//! Sendy-compatible email platform.
//!
//! ## Architecture
//!
//! ```text
//! Forms → /subscribe → SubscriptionBridge → SendyClient → Sendy API
//! Editor → /campaigns/push → EmailRenderer → CampaignPublisher → Sendy API
//! Admin → /admin/settings → SettingsStore (JSON blob)
//! ```
//!
//! Context slugs resolve through the [`registry::IntegrationRegistry`] to
//! per-integration settings; all upstream plain-text response parsing is
//! isolated in [`sendy::response`].

pub mod campaign;
pub mod config;
pub mod email;
pub mod forms;
pub mod registry;
pub mod sendy;
pub mod settings;
pub mod subscribe;
pub mod tips;
pub mod validate;
pub mod web;

// Re-export commonly used types
pub use campaign::{CampaignPublisher, CampaignStore, JsonCampaignStore, MemoryCampaignStore};
pub use config::Config;
pub use email::{Branding, EmailContent, EmailRenderer, Post};
pub use registry::{Integration, IntegrationRegistry};
pub use sendy::{HttpTransport, SendyClient};
pub use settings::{JsonSettingsStore, MemorySettingsStore, NewsletterSettings, SettingsStore};
pub use subscribe::{SubscribedEvent, SubscribeStatus, SubscriptionBridge, SubscriptionResult};
pub use web::AppState;
