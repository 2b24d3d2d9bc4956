/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! Token storage and in-flight login (CSRF state) bookkeeping.
//!
//! [`TokenStorage`] is the pluggable persistence seam: the blueprint only ever
//! talks to the trait, so callers can back it with a database or cache.
//! The shipped default is the in-process [`MemoryStorage`].

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;

use crate::error::AppError;
use crate::oauth::OAuthToken;

/// Storage for acquired OAuth tokens, keyed by session id.
#[async_trait]
pub trait TokenStorage: Send + Sync {
    async fn store(&self, session_id: &str, token: OAuthToken) -> Result<(), AppError>;
    async fn load(&self, session_id: &str) -> Result<Option<OAuthToken>, AppError>;
    async fn delete(&self, session_id: &str) -> Result<(), AppError>;
}

/// Default in-process token store.
#[derive(Default)]
pub struct MemoryStorage {
    tokens: RwLock<HashMap<String, OAuthToken>>,
}

#[async_trait]
impl TokenStorage for MemoryStorage {
    async fn store(&self, session_id: &str, token: OAuthToken) -> Result<(), AppError> {
        self.tokens
            .write()
            .map_err(|_| AppError::internal("token store poisoned"))?
            .insert(session_id.to_string(), token);
        Ok(())
    }

    async fn load(&self, session_id: &str) -> Result<Option<OAuthToken>, AppError> {
        Ok(self
            .tokens
            .read()
            .map_err(|_| AppError::internal("token store poisoned"))?
            .get(session_id)
            .cloned())
    }

    async fn delete(&self, session_id: &str) -> Result<(), AppError> {
        self.tokens
            .write()
            .map_err(|_| AppError::internal("token store poisoned"))?
            .remove(session_id);
        Ok(())
    }
}

/// An in-flight login recorded when the login route redirects to Figshare.
#[derive(Debug, Clone)]
pub struct PendingLogin {
    /// Where to send the user after the dance completes, when the login
    /// request carried a `next` parameter.
    pub next: Option<String>,
}

/// In-flight CSRF states: inserted at login, fetched-and-consumed at callback.
#[derive(Default)]
pub struct PendingLogins {
    inner: Mutex<HashMap<String, PendingLogin>>,
}

impl PendingLogins {
    pub fn insert(&self, csrf_state: &str, next: Option<String>) {
        let mut inner = self.inner.lock().expect("pending login lock poisoned");
        inner.insert(csrf_state.to_string(), PendingLogin { next });
    }

    /// Remove and return the pending login for `csrf_state`. Each state is
    /// usable exactly once.
    pub fn consume(&self, csrf_state: &str) -> Option<PendingLogin> {
        let mut inner = self.inner.lock().expect("pending login lock poisoned");
        inner.remove(csrf_state)
    }
}
