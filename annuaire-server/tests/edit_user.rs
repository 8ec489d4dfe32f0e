use std::sync::Arc;

use anyhow::Result;
use axum::http::StatusCode;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::{Value, json};
use uuid::Uuid;

use annuaire_server::auth::token::Claims;

#[path = "support/mod.rs"]
mod support;

use support::{MemoryUserStore, TEST_SECRET, bearer, build_test_app, sample_user};

fn edit_body() -> Value {
    json!({
        "firstName": "Amélie",
        "lastName": "Bernard",
        "userName": "abernard"
    })
}

/// A validly signed token whose subject is not a numeric user id.
fn signed_token_with_subject(sub: &str) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: sub.to_string(),
        exp: now + 3600,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_ref()),
    )
    .expect("token encoding")
}

#[tokio::test]
async fn edit_rejects_anonymous_requests() -> Result<()> {
    let app = build_test_app(Arc::new(MemoryUserStore::default()));
    app.store
        .insert(sample_user(5, "jdupont", &app.hash("Secret#1")));

    let response = app.server.put("/api/editUser/5").json(&edit_body()).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(
        body["message"],
        "L'utilisateur n'est pas autorisé à modifier ce compte."
    );

    // The rejection happens before any store access.
    assert_eq!(app.store.reads(), 0);
    assert_eq!(app.store.writes(), 0);
    Ok(())
}

#[tokio::test]
async fn edit_rejects_tokens_for_another_user() -> Result<()> {
    let app = build_test_app(Arc::new(MemoryUserStore::default()));
    app.store
        .insert(sample_user(5, "jdupont", &app.hash("Secret#1")));

    let response = app
        .server
        .put("/api/editUser/5")
        .add_header("Authorization", bearer(&app.token_for(99)))
        .json(&edit_body())
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(
        body["message"],
        "L'utilisateur n'est pas autorisé à modifier ce compte."
    );
    assert_eq!(app.store.reads(), 0);
    assert_eq!(app.store.writes(), 0);

    let stored = app.store.get(5).expect("seeded user");
    assert_eq!(stored.user_name, "jdupont");
    Ok(())
}

#[tokio::test]
async fn edit_rejects_non_numeric_token_subjects() -> Result<()> {
    let app = build_test_app(Arc::new(MemoryUserStore::default()));
    app.store
        .insert(sample_user(5, "jdupont", &app.hash("Secret#1")));

    let response = app
        .server
        .put("/api/editUser/5")
        .add_header("Authorization", bearer(&signed_token_with_subject("abc")))
        .json(&edit_body())
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(app.store.reads(), 0);
    assert_eq!(app.store.writes(), 0);
    Ok(())
}

#[tokio::test]
async fn edit_returns_not_found_for_missing_user() -> Result<()> {
    let app = build_test_app(Arc::new(MemoryUserStore::default()));

    let response = app
        .server
        .put("/api/editUser/7")
        .add_header("Authorization", bearer(&app.token_for(7)))
        .json(&edit_body())
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["message"], "L'utilisateur demandé n'existe plus.");
    assert_eq!(app.store.writes(), 0);
    Ok(())
}

#[tokio::test]
async fn edit_overwrites_profile_fields() -> Result<()> {
    let app = build_test_app(Arc::new(MemoryUserStore::default()));
    let original_hash = app.hash("Secret#1");
    app.store.insert(sample_user(5, "jdupont", &original_hash));

    let response = app
        .server
        .put("/api/editUser/5")
        .add_header("Authorization", bearer(&app.token_for(5)))
        .json(&edit_body())
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "L'utilisateur abernard a bien été modifié.");
    assert_eq!(body["data"]["userName"], "abernard");
    assert_eq!(body["data"]["firstName"], "Amélie");

    // The hash never leaves the server.
    let data = body["data"].as_object().expect("data object");
    assert!(!data.contains_key("passwordHash"));
    assert!(!data.contains_key("password_hash"));

    let stored = app.store.get(5).expect("seeded user");
    assert_eq!(stored.first_name, "Amélie");
    assert_eq!(stored.last_name, "Bernard");
    assert_eq!(stored.user_name, "abernard");
    assert_eq!(stored.password_hash, original_hash);
    assert_eq!(app.store.writes(), 1);
    Ok(())
}

#[tokio::test]
async fn edit_message_embeds_the_new_user_name() -> Result<()> {
    let app = build_test_app(Arc::new(MemoryUserStore::default()));
    app.store
        .insert(sample_user(5, "jdupont", &app.hash("Secret#1")));

    let response = app
        .server
        .put("/api/editUser/5")
        .add_header("Authorization", bearer(&app.token_for(5)))
        .json(&json!({
            "firstName": "A",
            "lastName": "B",
            "userName": "ab"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "L'utilisateur ab a bien été modifié.");
    Ok(())
}

#[tokio::test]
async fn edit_keeps_hash_when_password_is_unchanged() -> Result<()> {
    let app = build_test_app(Arc::new(MemoryUserStore::default()));
    let original_hash = app.hash("Secret#1");
    app.store.insert(sample_user(5, "jdupont", &original_hash));

    let mut body = edit_body();
    body["password"] = json!("Secret#1");

    let response = app
        .server
        .put("/api/editUser/5")
        .add_header("Authorization", bearer(&app.token_for(5)))
        .json(&body)
        .await;

    response.assert_status_ok();
    let stored = app.store.get(5).expect("seeded user");
    assert_eq!(stored.password_hash, original_hash);
    Ok(())
}

#[tokio::test]
async fn edit_ignores_an_empty_password() -> Result<()> {
    let app = build_test_app(Arc::new(MemoryUserStore::default()));
    let original_hash = app.hash("Secret#1");
    app.store.insert(sample_user(5, "jdupont", &original_hash));

    let mut body = edit_body();
    body["password"] = json!("");

    let response = app
        .server
        .put("/api/editUser/5")
        .add_header("Authorization", bearer(&app.token_for(5)))
        .json(&body)
        .await;

    response.assert_status_ok();

    // A blank password means "keep mine": the stored credential survives.
    let stored = app.store.get(5).expect("seeded user");
    assert_eq!(stored.password_hash, original_hash);
    assert!(app.hasher.verify("Secret#1", &stored.password_hash));
    assert!(!app.hasher.verify("", &stored.password_hash));
    Ok(())
}

#[tokio::test]
async fn edit_rehashes_a_changed_password() -> Result<()> {
    let app = build_test_app(Arc::new(MemoryUserStore::default()));
    let original_hash = app.hash("Secret#1");
    app.store.insert(sample_user(5, "jdupont", &original_hash));

    let mut body = edit_body();
    body["password"] = json!("Autre#2");

    let response = app
        .server
        .put("/api/editUser/5")
        .add_header("Authorization", bearer(&app.token_for(5)))
        .json(&body)
        .await;

    response.assert_status_ok();
    let stored = app.store.get(5).expect("seeded user");
    assert_ne!(stored.password_hash, original_hash);
    assert!(app.hasher.verify("Autre#2", &stored.password_hash));
    assert!(!app.hasher.verify("Secret#1", &stored.password_hash));
    Ok(())
}

#[tokio::test]
async fn edit_rejects_a_taken_user_name() -> Result<()> {
    let app = build_test_app(Arc::new(MemoryUserStore::default()));
    app.store
        .insert(sample_user(5, "jdupont", &app.hash("Secret#1")));
    app.store
        .insert(sample_user(6, "mmartin", &app.hash("Secret#2")));

    let response = app
        .server
        .put("/api/editUser/5")
        .add_header("Authorization", bearer(&app.token_for(5)))
        .json(&json!({
            "firstName": "Jean",
            "lastName": "Dupont",
            "userName": "mmartin"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Ce nom d'utilisateur est déjà utilisé.");

    let stored = app.store.get(5).expect("seeded user");
    assert_eq!(stored.user_name, "jdupont");
    Ok(())
}

#[tokio::test]
async fn edit_reports_a_retryable_error_when_the_store_fails() -> Result<()> {
    let app = build_test_app(Arc::new(MemoryUserStore::default()));
    app.store
        .insert(sample_user(5, "jdupont", &app.hash("Secret#1")));
    app.store.fail_writes();

    let response = app
        .server
        .put("/api/editUser/5")
        .add_header("Authorization", bearer(&app.token_for(5)))
        .json(&edit_body())
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(
        body["message"],
        "L'utilisateur n'a pas pu être modifié. Réessayez dans quelques instants."
    );
    Ok(())
}
