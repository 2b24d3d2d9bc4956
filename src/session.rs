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

//! The per-request Figshare session: a token-bearing API client.
//!
//! [`crate::blueprint::publish_session`] constructs one `FigshareSession` per
//! incoming request and places it in the request extensions; handlers receive
//! it through the `FromRequestParts` impl below. Call sites never touch
//! cookies or the token store directly.

use axum::{extract::FromRequestParts, http::request::Parts};
use url::Url;

use crate::error::AppError;
use crate::oauth::OAuthToken;
use crate::state::BlueprintState;

/// The current request's Figshare session.
///
/// Unauthorized requests still get a session object; [`Self::authorized`] is
/// just false and API calls fail with 401.
#[derive(Clone, Debug)]
pub struct FigshareSession {
    token: Option<OAuthToken>,
    http: reqwest::Client,
    api_base_url: Url,
}

impl FigshareSession {
    pub(crate) fn new(state: &BlueprintState, token: Option<OAuthToken>) -> Self {
        Self {
            token,
            http: state.http.clone(),
            api_base_url: state.api_base_url.clone(),
        }
    }

    /// True when a token is loaded for this request.
    pub fn authorized(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&OAuthToken> {
        self.token.as_ref()
    }

    /// Resolve `path` against the API base.
    fn endpoint(&self, path: &str) -> Result<Url, AppError> {
        self.api_base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| AppError::internal(&format!("invalid API path {path:?}: {e}")))
    }

    /// Authenticated GET against the Figshare API, e.g.
    /// `session.get("account/verify_credentials.json")`.
    pub async fn get(&self, path: &str) -> Result<reqwest::Response, AppError> {
        let token = self.token.as_ref().ok_or_else(AppError::unauthorized)?;
        let url = self.endpoint(path)?;
        Ok(self
            .http
            .get(url)
            .bearer_auth(&token.access_token)
            .send()
            .await?)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for FigshareSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<FigshareSession>()
            .cloned()
            .ok_or_else(|| AppError::internal("figshare session layer is not installed"))
    }
}
