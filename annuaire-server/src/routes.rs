use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post, put},
};
use serde_json::{Value, json};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::error;

use crate::{auth, infra::app_state::AppState, users};

/// Create all API routes
pub fn create_api_router(state: AppState) -> Router<AppState> {
    Router::new()
        // Public authentication endpoint
        .route("/api/login", post(auth::handlers::login))
        // Profile endpoints guarded by the token middleware
        .merge(create_profile_routes(state))
}

fn create_profile_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/editUser/{id}",
            put(users::handlers::edit_user_handler),
        )
        .route("/api/getUser/{id}", get(users::handlers::get_user_handler))
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::middleware::optional_auth_middleware,
        ))
}

/// Assemble the full application router with middleware layers.
pub fn create_app(state: AppState) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .merge(create_api_router(state.clone()))
        // Middleware layers in order (outer to inner):
        // 1. CORS (outermost)
        .layer(cors_layer)
        // 2. Tracing
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_handler(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let mut health_status = json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "checks": {}
    });

    // Check database connectivity
    match state.store.ping().await {
        Ok(()) => {
            health_status["checks"]["database"] = json!({ "status": "healthy" });
        }
        Err(err) => {
            error!(error = %err, "database health check failed");
            return Err(StatusCode::SERVICE_UNAVAILABLE);
        }
    }

    Ok(Json(health_status))
}
