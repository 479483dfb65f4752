//! Sendy API integration: transport, endpoint wrappers, and response
//! classification.
//!
//! ## Call flow
//!
//! ```text
//! SubscriptionBridge ─┐
//!                     ├─ SendyClient ─ Transport ─ POST {base}/...
//! CampaignPublisher ──┘                  │
//!                                        └─ plain-text body → response::*
//! ```

pub mod client;
pub mod response;

pub use client::{HttpTransport, SendyClient, Transport, TransportError};
pub use response::{
    campaign_exists, classify_subscribe_response, created_campaign_id, SubscribeOutcome,
};
