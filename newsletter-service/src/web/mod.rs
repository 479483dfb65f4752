//! Web boundary for the newsletter service.
//!
//! One canonical subscription endpoint serves every form placement; the
//! editorial and admin surfaces share a token check. Handlers delegate to
//! the bridge, renderer, and publisher and never leak upstream text.

pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};

pub use handlers::{
    health, push_campaign, submit_tip, subscribe, ApiMessage, AppState, HealthResponse,
    PushCampaignRequest, PushCampaignResponse, SubscribeRequest,
};

/// Build the service router over shared state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/subscribe", post(handlers::subscribe))
        .route("/campaigns/push", post(handlers::push_campaign))
        .route(
            "/admin/settings",
            get(handlers::get_settings).put(handlers::put_settings),
        )
        .route("/forms/:context", get(handlers::get_form_preset))
        .route("/tips", post(handlers::submit_tip))
        .with_state(state)
}
