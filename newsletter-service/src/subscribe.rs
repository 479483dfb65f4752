//! Subscription bridge: context resolution, settings checks, and the
//! subscribe call against the Sendy API.
//!
//! Every failure mode surfaces as a typed [`SubscriptionResult`]; nothing
//! here panics or leaks upstream response text to the caller. Raw bodies are
//! logged server-side only.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::registry::IntegrationRegistry;
use crate::sendy::{classify_subscribe_response, SendyClient, SubscribeOutcome};
use crate::settings::SettingsStore;
use crate::validate::is_valid_email;

/// Typed outcome of a subscription attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscribeStatus {
    /// The address was added to the list.
    Subscribed,
    /// The address was already on the list.
    AlreadySubscribed,
    /// The address failed validation, locally or upstream.
    Invalid,
    /// The integration is switched off in settings.
    Disabled,
    /// No integration is registered for the context.
    NotFound,
    /// The upstream response matched no known pattern.
    Failed,
    /// Configuration or transport failure.
    Error,
}

/// Synchronous result returned to the form-submission boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionResult {
    pub success: bool,
    pub message: String,
    pub status: SubscribeStatus,
}

impl SubscriptionResult {
    fn failure(status: SubscribeStatus, message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            status,
        }
    }
}

/// Fire-and-forget notification emitted after a successful subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribedEvent {
    pub email: String,
    pub context: String,
    pub list_id: String,
}

/// Resolves a (email, context) pair into a Sendy subscribe call.
pub struct SubscriptionBridge {
    registry: Arc<IntegrationRegistry>,
    settings: Arc<dyn SettingsStore>,
    client: SendyClient,
    events: Option<mpsc::UnboundedSender<SubscribedEvent>>,
}

impl SubscriptionBridge {
    pub fn new(
        registry: Arc<IntegrationRegistry>,
        settings: Arc<dyn SettingsStore>,
        client: SendyClient,
    ) -> Self {
        Self {
            registry,
            settings,
            client,
            events: None,
        }
    }

    /// Attach a listener channel for subscribed notifications.
    ///
    /// Sends are non-blocking; a closed receiver never fails a subscription.
    pub fn with_events(mut self, events: mpsc::UnboundedSender<SubscribedEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Subscribe `email` through the integration registered for `context`.
    pub async fn subscribe(&self, email: &str, context: &str) -> SubscriptionResult {
        let integration = match self.registry.get(context) {
            Some(integration) => integration,
            None => {
                warn!(context = context, "subscribe_integration_not_found");
                return SubscriptionResult::failure(
                    SubscribeStatus::NotFound,
                    "Newsletter integration not found",
                );
            }
        };

        let settings = self.settings.load();

        if !settings.integration_enabled(&integration.enable_key) {
            info!(context = context, "subscribe_integration_disabled");
            return SubscriptionResult::failure(
                SubscribeStatus::Disabled,
                "Newsletter integration is disabled",
            );
        }

        let list_id = match settings.list_id(&integration.list_id_key) {
            Some(id) => id.to_string(),
            None => {
                error!(
                    context = context,
                    list_id_key = %integration.list_id_key,
                    "subscribe_list_not_configured"
                );
                return SubscriptionResult::failure(
                    SubscribeStatus::Error,
                    "Newsletter list not configured for this integration",
                );
            }
        };

        // Syntactic gate before any network traffic.
        if !is_valid_email(email) {
            return SubscriptionResult::failure(
                SubscribeStatus::Invalid,
                "Please enter a valid email address",
            );
        }

        let body = match self.client.subscribe(&settings, &list_id, email).await {
            Ok(body) => body,
            Err(e) => {
                error!(context = context, error = %e, "subscribe_transport_failed");
                return SubscriptionResult::failure(
                    SubscribeStatus::Error,
                    "Subscription service unavailable",
                );
            }
        };

        match classify_subscribe_response(&body) {
            SubscribeOutcome::Subscribed => {
                info!(context = context, list_id = %list_id, "subscribe_success");
                self.emit_subscribed(email, context, &list_id);
                SubscriptionResult {
                    success: true,
                    message: "Successfully subscribed to newsletter".to_string(),
                    status: SubscribeStatus::Subscribed,
                }
            }
            SubscribeOutcome::AlreadySubscribed => {
                info!(context = context, "subscribe_already_subscribed");
                SubscriptionResult::failure(
                    SubscribeStatus::AlreadySubscribed,
                    "Email already subscribed",
                )
            }
            SubscribeOutcome::InvalidEmail => {
                info!(context = context, "subscribe_rejected_invalid");
                SubscriptionResult::failure(SubscribeStatus::Invalid, "Invalid email address")
            }
            SubscribeOutcome::Failed => {
                error!(
                    context = context,
                    response_body = %body,
                    "subscribe_unclassified_response"
                );
                SubscriptionResult::failure(
                    SubscribeStatus::Failed,
                    "Subscription failed, please try again",
                )
            }
        }
    }

    fn emit_subscribed(&self, email: &str, context: &str, list_id: &str) {
        if let Some(events) = &self.events {
            let event = SubscribedEvent {
                email: email.to_string(),
                context: context.to_string(),
                list_id: list_id.to_string(),
            };
            if events.send(event).is_err() {
                warn!(context = context, "subscribed_event_receiver_closed");
            }
        }
    }
}
