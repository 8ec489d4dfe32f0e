//! Shared fixtures for the HTTP integration tests.
//!
//! Tests run against the real router with an in-memory [`UserStore`]
//! double, so they exercise routing, middleware, and handlers without
//! a live PostgreSQL instance.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use annuaire_core::{
    Result as StoreResult, StoreError, User,
    crypto::{HashParams, PasswordHasher},
    store::UserStore,
};
use annuaire_server::{
    auth::token::TokenService, infra::app_state::AppState, routes::create_app,
};
use async_trait::async_trait;
use axum_test::TestServer;
use chrono::Utc;

pub const TEST_SECRET: &str = "test-secret";

/// In-memory store double with access counters and failure switches.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<i64, User>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_pings: AtomicBool,
}

impl MemoryUserStore {
    pub fn insert(&self, user: User) {
        self.users.lock().unwrap().insert(user.id, user);
    }

    pub fn get(&self, id: i64) -> Option<User> {
        self.users.lock().unwrap().get(&id).cloned()
    }

    /// Number of lookups served so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of update attempts, including rejected ones.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every subsequent lookup fail with an opaque database error.
    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    /// Make every subsequent update fail with an opaque database error.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    /// Make every subsequent connectivity check fail.
    pub fn fail_pings(&self) {
        self.fail_pings.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_username(
        &self,
        user_name: &str,
    ) -> StoreResult<Option<User>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|user| user.user_name == user_name)
            .cloned())
    }

    async fn update(&self, user: &User) -> StoreResult<User> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }

        let mut users = self.users.lock().unwrap();

        // Mirror the database constraints the live store relies on.
        if [&user.first_name, &user.last_name, &user.user_name]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(StoreError::Validation(
                "Les informations fournies sont invalides.".into(),
            ));
        }
        if users
            .values()
            .any(|other| other.id != user.id && other.user_name == user.user_name)
        {
            return Err(StoreError::Conflict(
                "Ce nom d'utilisateur est déjà utilisé.".into(),
            ));
        }

        let entry = users.get_mut(&user.id).ok_or(StoreError::NotFound)?;
        *entry = user.clone();
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    async fn ping(&self) -> StoreResult<()> {
        if self.fail_pings.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryUserStore>,
    pub hasher: Arc<PasswordHasher>,
    pub tokens: Arc<TokenService>,
}

impl TestApp {
    pub fn token_for(&self, user_id: i64) -> String {
        self.tokens.generate(user_id).expect("token generation")
    }

    pub fn hash(&self, password: &str) -> String {
        self.hasher.hash(password).expect("password hashing")
    }
}

fn test_hash_params() -> HashParams {
    // Low cost keeps the suite fast
    HashParams {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    }
}

pub fn build_test_app(store: Arc<MemoryUserStore>) -> TestApp {
    let hasher = Arc::new(
        PasswordHasher::new(&test_hash_params())
            .expect("valid hash parameters"),
    );
    let tokens = Arc::new(TokenService::new(TEST_SECRET, 3600));

    let state = AppState {
        store: store.clone(),
        hasher: hasher.clone(),
        tokens: tokens.clone(),
    };
    let server =
        TestServer::new(create_app(state)).expect("test server startup");

    TestApp {
        server,
        store,
        hasher,
        tokens,
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

pub fn sample_user(id: i64, user_name: &str, password_hash: &str) -> User {
    let now = Utc::now();
    User {
        id,
        first_name: "Jean".into(),
        last_name: "Dupont".into(),
        user_name: user_name.into(),
        password_hash: password_hash.into(),
        created_at: now,
        updated_at: now,
    }
}
