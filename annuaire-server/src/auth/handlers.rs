use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

/// Credentials submitted to the login endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_name: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub user_id: i64,
    pub token: String,
    pub expires_in: u64,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub data: LoginData,
}

/// Exchange credentials for an access token.
///
/// Unknown names and wrong passwords answer with the same message so the
/// endpoint does not reveal which accounts exist.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = state
        .store
        .find_by_username(&request.user_name)
        .await?
        .ok_or_else(|| {
            AppError::unauthorized("Paire identifiant/mot de passe incorrecte.")
        })?;

    // Verify password
    if !state.hasher.verify(&request.password, &user.password_hash) {
        return Err(AppError::unauthorized(
            "Paire identifiant/mot de passe incorrecte.",
        ));
    }

    let token = state.tokens.generate(user.id).map_err(|err| {
        tracing::error!(error = ?err, "failed to sign access token");
        AppError::internal("La connexion a échoué. Réessayez dans quelques instants.")
    })?;

    info!("User logged in: {} ({})", user.user_name, user.id);

    Ok(Json(LoginResponse {
        message: "Connexion réussie.".to_string(),
        data: LoginData {
            user_id: user.id,
            token,
            expires_in: state.tokens.ttl_secs(),
        },
    }))
}
