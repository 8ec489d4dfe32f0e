use std::{fmt, sync::Arc};

use annuaire_core::{crypto::PasswordHasher, store::UserStore};

use crate::auth::token::TokenService;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub hasher: Arc<PasswordHasher>,
    pub tokens: Arc<TokenService>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
