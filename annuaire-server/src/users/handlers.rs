//! Profile endpoints: self-service fetch and edit.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::error;

use annuaire_core::{StoreError, User};

use crate::auth::middleware::AuthContext;
use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

/// Body accepted by the profile edit endpoint.
///
/// All naming fields are required and overwrite the stored values. The
/// password is optional and an empty value means no change; otherwise it is
/// compared to the stored hash and only rehashed if it differs.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EditUserResponse {
    pub message: String,
    pub data: User,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub data: User,
}

/// Update a profile. Callers may only edit their own record.
pub async fn edit_user_handler(
    State(state): State<AppState>,
    auth: Option<Extension<AuthContext>>,
    Path(user_id): Path<i64>,
    Json(request): Json<EditUserRequest>,
) -> AppResult<Json<EditUserResponse>> {
    // Identity must match the targeted record before anything is read
    if !is_self(auth.as_ref(), user_id) {
        return Err(AppError::unauthorized(
            "L'utilisateur n'est pas autorisé à modifier ce compte.",
        ));
    }

    let mut user = state
        .store
        .find_by_id(user_id)
        .await
        .map_err(edit_failure)?
        .ok_or_else(|| AppError::not_found("L'utilisateur demandé n'existe plus."))?;

    user.first_name = request.first_name;
    user.last_name = request.last_name;
    user.user_name = request.user_name;

    // Rehash only when a non-empty password differs from the stored one
    if let Some(password) = request.password.as_deref().filter(|p| !p.is_empty())
        && !state.hasher.verify(password, &user.password_hash)
    {
        user.password_hash = state.hasher.hash(password).map_err(|err| {
            error!(error = %err, "failed to hash replacement password");
            AppError::internal(
                "L'utilisateur n'a pas pu être modifié. Réessayez dans quelques instants.",
            )
        })?;
    }

    let updated = state.store.update(&user).await.map_err(edit_failure)?;

    Ok(Json(EditUserResponse {
        message: format!("L'utilisateur {} a bien été modifié.", updated.user_name),
        data: updated,
    }))
}

/// Fetch a profile. Callers may only read their own record.
pub async fn get_user_handler(
    State(state): State<AppState>,
    auth: Option<Extension<AuthContext>>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<UserResponse>> {
    if !is_self(auth.as_ref(), user_id) {
        return Err(AppError::unauthorized(
            "L'utilisateur n'est pas autorisé à consulter ce compte.",
        ));
    }

    let user = state
        .store
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("L'utilisateur demandé n'existe plus."))?;

    Ok(Json(UserResponse { data: user }))
}

/// True when the request carries an identity whose id equals `user_id`.
///
/// A missing identity, a subject that is not an integer, and a mismatched id
/// are all treated the same way.
fn is_self(auth: Option<&Extension<AuthContext>>, user_id: i64) -> bool {
    auth.and_then(|Extension(ctx)| ctx.user_id.parse::<i64>().ok())
        .is_some_and(|caller_id| caller_id == user_id)
}

/// Store failures on the edit path keep the endpoint's own wording.
fn edit_failure(err: StoreError) -> AppError {
    match err {
        StoreError::NotFound => AppError::not_found("L'utilisateur demandé n'existe plus."),
        StoreError::Validation(message) | StoreError::Conflict(message) => {
            AppError::bad_request(message)
        }
        StoreError::Database(err) => {
            error!(error = ?err, "failed to persist profile update");
            AppError::internal(
                "L'utilisateur n'a pas pu être modifié. Réessayez dans quelques instants.",
            )
        }
    }
}
