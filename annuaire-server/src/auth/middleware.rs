use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::Response,
};

use crate::infra::app_state::AppState;

/// Caller identity attached to a request that carried a valid token.
///
/// The id is kept as the raw token subject; handlers parse it when they
/// compare it against a path parameter.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: String,
}

/// Attach an [`AuthContext`] when the request carries a valid bearer token.
///
/// Requests without one pass through untouched; each handler decides what a
/// missing identity means for its route.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Ok(token) = extract_bearer_token(&request)
        && let Ok(claims) = state.tokens.validate(&token)
    {
        request.extensions_mut().insert(AuthContext {
            user_id: claims.sub,
        });
    }

    next.run(request).await
}

fn extract_bearer_token(request: &Request) -> Result<String, StatusCode> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !auth_header.starts_with("Bearer ") {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(auth_header[7..].to_string())
}
