//! HTTP endpoint handlers.
//!
//! The web boundary stays thin: handlers validate the request shape, check
//! authorization where needed, and delegate to the bridge, renderer, and
//! publisher. Business failures come back as `{success, message}` bodies;
//! raw upstream text never reaches a client.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::campaign::CampaignPublisher;
use crate::config::Config;
use crate::email::{EmailRenderer, Post};
use crate::forms;
use crate::registry::IntegrationRegistry;
use crate::settings::{NewsletterSettings, SettingsStore};
use crate::subscribe::SubscriptionBridge;
use crate::tips::{validate_tip, TipGate, TipSubmission};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<IntegrationRegistry>,
    pub settings: Arc<dyn SettingsStore>,
    pub bridge: Arc<SubscriptionBridge>,
    pub renderer: Arc<EmailRenderer>,
    pub publisher: Arc<CampaignPublisher>,
    pub tip_gate: Arc<TipGate>,
}

/// Generic success/failure body.
#[derive(Serialize)]
pub struct ApiMessage {
    pub success: bool,
    pub message: String,
}

impl ApiMessage {
    fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }

    fn err(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Subscription
// =============================================================================

/// Canonical subscription request: one endpoint for every form placement,
/// distinguished by context.
#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
    pub context: String,
}

/// Subscription endpoint.
///
/// Always answers 200 with a `{success, message, status}` body; the outcome
/// lives in the body, matching what the form scripts consume.
pub async fn subscribe(
    State(state): State<AppState>,
    Json(request): Json<SubscribeRequest>,
) -> impl IntoResponse {
    info!(context = %request.context, "subscribe_request_received");

    let result = state
        .bridge
        .subscribe(request.email.trim(), &request.context)
        .await;

    info!(
        context = %request.context,
        status = ?result.status,
        success = result.success,
        "subscribe_request_complete"
    );

    (StatusCode::OK, Json(result))
}

// =============================================================================
// Campaign Push
// =============================================================================

/// Editorial push request. `content` is the host-rendered HTML body of the
/// post; rendering into email markup happens here.
#[derive(Debug, Deserialize)]
pub struct PushCampaignRequest {
    pub post_id: u64,
    pub title: String,
    pub content: String,
}

#[derive(Serialize)]
pub struct PushCampaignResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
}

/// Campaign push endpoint (token-protected).
pub async fn push_campaign(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<PushCampaignRequest>,
) -> impl IntoResponse {
    if let Some((status, Json(denied))) = check_admin_token(&headers, &state.config) {
        return (
            status,
            Json(PushCampaignResponse {
                success: false,
                message: denied.message,
                campaign_id: None,
            }),
        );
    }

    info!(post_id = request.post_id, "campaign_push_received");

    let post = Post {
        id: request.post_id,
        title: request.title,
        content: request.content,
    };
    let content = state.renderer.render(&post);

    match state.publisher.publish(post.id, &content).await {
        Ok(campaign_id) => {
            info!(post_id = post.id, campaign_id = %campaign_id, "campaign_push_complete");
            (
                StatusCode::OK,
                Json(PushCampaignResponse {
                    success: true,
                    message: "Campaign successfully created or updated".to_string(),
                    campaign_id: Some(campaign_id),
                }),
            )
        }
        Err(e) => {
            error!(post_id = post.id, error = %e, "campaign_push_failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(PushCampaignResponse {
                    success: false,
                    message: "Failed to send campaign to the email platform".to_string(),
                    campaign_id: None,
                }),
            )
        }
    }
}

// =============================================================================
// Admin Settings
// =============================================================================

/// One row of the admin integration listing.
#[derive(Serialize)]
pub struct IntegrationView {
    pub context: String,
    pub label: String,
    pub description: String,
    pub enable_key: String,
    pub list_id_key: String,
    pub enabled: bool,
    pub list_id: Option<String>,
}

/// Settings as shown to an admin: the API key itself is redacted.
#[derive(Serialize)]
pub struct SettingsView {
    pub settings: NewsletterSettings,
    pub api_key_set: bool,
    pub integrations: Vec<IntegrationView>,
}

/// Read current settings (token-protected).
pub async fn get_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Some(denied) = check_admin_token(&headers, &state.config) {
        return denied.into_response();
    }

    let settings = state.settings.load();
    let api_key_set = !settings.api_key.is_empty();

    let integrations = state
        .registry
        .all()
        .map(|integration| IntegrationView {
            context: integration.context.clone(),
            label: integration.label.clone(),
            description: integration.description.clone(),
            enable_key: integration.enable_key.clone(),
            list_id_key: integration.list_id_key.clone(),
            enabled: settings.integration_enabled(&integration.enable_key),
            list_id: settings.list_id(&integration.list_id_key).map(String::from),
        })
        .collect();

    let redacted = NewsletterSettings {
        api_key: String::new(),
        ..settings
    };

    (
        StatusCode::OK,
        Json(SettingsView {
            settings: redacted,
            api_key_set,
            integrations,
        }),
    )
        .into_response()
}

/// Replace settings (token-protected).
///
/// Fields are sanitized before persisting; an empty incoming API key keeps
/// the stored one so the redacted GET payload can round-trip unchanged.
pub async fn put_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(mut incoming): Json<NewsletterSettings>,
) -> impl IntoResponse {
    if let Some(denied) = check_admin_token(&headers, &state.config) {
        return denied.into_response();
    }

    if incoming.api_key.trim().is_empty() {
        incoming.api_key = state.settings.load().api_key;
    }

    let sanitized = match incoming.sanitized() {
        Ok(settings) => settings,
        Err(e) => {
            warn!(error = %e, "settings_update_rejected");
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ApiMessage::err(&e.to_string())),
            )
                .into_response();
        }
    };

    if let Err(e) = state.settings.save(&sanitized) {
        error!(error = %e, "settings_save_failed");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiMessage::err("Failed to save settings")),
        )
            .into_response();
    }

    info!("settings_updated");
    (
        StatusCode::OK,
        Json(ApiMessage::ok("Newsletter settings updated successfully")),
    )
        .into_response()
}

/// Admin token check, shared by the protected routes.
///
/// With no token configured the admin surface stays off entirely rather than
/// falling open.
fn check_admin_token(
    headers: &HeaderMap,
    config: &Config,
) -> Option<(StatusCode, Json<ApiMessage>)> {
    let expected = match config.admin_token.as_deref() {
        Some(token) => token,
        None => {
            warn!("admin_route_disabled_no_token");
            return Some((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiMessage::err("Admin interface is not configured")),
            ));
        }
    };

    let provided = headers.get("X-Admin-Token").and_then(|v| v.to_str().ok());

    match provided {
        Some(token) if token == expected => None,
        Some(_) => {
            warn!("admin_token_invalid");
            Some((
                StatusCode::UNAUTHORIZED,
                Json(ApiMessage::err("Unauthorized")),
            ))
        }
        None => {
            warn!("admin_token_missing");
            Some((
                StatusCode::UNAUTHORIZED,
                Json(ApiMessage::err("Unauthorized")),
            ))
        }
    }
}

// =============================================================================
// Form Presets
// =============================================================================

/// Form preset lookup for front-end renderers.
pub async fn get_form_preset(Path(context): Path<String>) -> impl IntoResponse {
    match forms::presets().remove(&context) {
        Some(preset) => (StatusCode::OK, Json(preset)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiMessage::err("Unknown form context")),
        )
            .into_response(),
    }
}

// =============================================================================
// Festival Tips
// =============================================================================

/// Tip intake endpoint.
///
/// Validates, subscribes the submitter to the festival updates list (failure
/// there is logged but never fails the tip), records the rate-limit mark,
/// and emits the operator notification as a structured log event.
pub async fn submit_tip(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(tip): Json<TipSubmission>,
) -> impl IntoResponse {
    let ip = addr.ip();

    if state.tip_gate.is_limited(ip) {
        info!(ip = %ip, "tip_rate_limited");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ApiMessage::err("Please wait before submitting another tip.")),
        );
    }

    if let Err(e) = validate_tip(&tip) {
        info!(ip = %ip, reason = %e, "tip_rejected");
        return (StatusCode::BAD_REQUEST, Json(ApiMessage::err(&e.to_string())));
    }

    let subscription = state
        .bridge
        .subscribe(tip.email.trim(), "festival_wire_tip")
        .await;
    if !subscription.success {
        warn!(
            status = ?subscription.status,
            "tip_subscription_failed"
        );
    }

    // Operator notification: picked up from the log stream.
    info!(
        ip = %ip,
        content_length = tip.content.trim().len(),
        subscribed = subscription.success,
        "tip_received"
    );

    state.tip_gate.mark(ip);

    (
        StatusCode::OK,
        Json(ApiMessage::ok(
            "Thank you for your tip! We will review it soon and have added you to our festival updates.",
        )),
    )
}
