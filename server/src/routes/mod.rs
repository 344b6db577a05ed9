use axum::{
    middleware,
    routing::{delete, get, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::config::{create_cors_layer, Config, SecurityHeadersLayer};
use crate::handlers::{events, health_check};
use crate::state::AppState;

/// Mount point of the event routes.
pub const EVENTS_PATH: &str = "/api/event";

pub fn event_routes(state: AppState) -> Router {
    let public = Router::new().route("/allEvents", get(events::list_events));

    let protected = Router::new()
        .route("/addEvent/:clubId", put(events::create_event))
        .route("/deleteEvent/:id", delete(events::delete_event))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    public.merge(protected).with_state(state)
}

pub fn create_routes(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest(EVENTS_PATH, event_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(SecurityHeadersLayer::new(config.production))
        .layer(create_cors_layer(&config.cors_allowed_origins))
}
