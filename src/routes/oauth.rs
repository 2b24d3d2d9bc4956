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

//! OAuth route handlers: login and authorized (callback).
//!
//! After a successful code exchange the callback stores the token, issues a
//! **signed session JWT** inside an `HttpOnly; SameSite=Lax` cookie named
//! `session`, and redirects to the configured post-login target.

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Redirect, Response},
};
use oauth2::CsrfToken;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::oauth;
use crate::state::BlueprintState;
use crate::token;

// ---------------------------------------------------------------------------
// Cookie helpers
// ---------------------------------------------------------------------------

/// Build a `Set-Cookie` header value for the session JWT.
fn build_session_cookie(jwt: &str, ttl_secs: i64, domain: Option<&str>, secure: bool) -> String {
    let mut cookie = format!(
        "{}={jwt}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_secs}",
        token::SESSION_COOKIE
    );
    if secure {
        cookie.push_str("; Secure");
    }
    if let Some(d) = domain {
        cookie.push_str(&format!("; Domain={d}"));
    }
    cookie
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuthorizedQuery {
    pub state: Option<String>,
    pub code: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// GET `<prefix>/figshare?next=<path>`
///
/// Initiates the OAuth flow: generates a CSRF state, records it, and
/// redirects to the Figshare authorization endpoint.
pub async fn login(
    State(state): State<BlueprintState>,
    Query(query): Query<LoginQuery>,
) -> Result<Response, AppError> {
    let csrf_token = CsrfToken::new_random();
    state.pending.insert(csrf_token.secret(), query.next);

    let auth_url = oauth::build_auth_url(
        &state.authorization_url,
        &state.client_id,
        state.scope.as_deref(),
        state.callback_url.as_deref(),
        csrf_token.secret(),
        &state.authorization_url_params,
    );

    Ok(Redirect::to(&auth_url).into_response())
}

/// GET `<prefix>/figshare/authorized?state=...&code=...`
///
/// Handles the provider callback: validates the CSRF state, exchanges the
/// authorization code for a token, stores it, and sets the session cookie.
/// A denial (`error` parameter) redirects back without a token.
pub async fn authorized(
    State(state): State<BlueprintState>,
    Query(query): Query<AuthorizedQuery>,
) -> Result<Response, AppError> {
    if let Some(error) = &query.error {
        if let Some(csrf_state) = &query.state {
            state.pending.consume(csrf_state);
        }
        tracing::warn!(
            "authorization denied: {error} ({})",
            query.error_description.as_deref().unwrap_or("no description")
        );
        return Ok(Redirect::to(&state.redirect_url).into_response());
    }

    let csrf_state = query
        .state
        .ok_or_else(|| AppError::invalid_state("missing state parameter"))?;
    let pending = state
        .pending
        .consume(&csrf_state)
        .ok_or_else(|| AppError::invalid_state("unknown or already used state"))?;
    let code = query
        .code
        .ok_or_else(|| AppError::invalid_state("missing code parameter"))?;

    let oauth_token = oauth::exchange_code(
        &state.http,
        &state.token_url,
        &state.client_id,
        state.client_secret.as_deref(),
        state.callback_url.as_deref(),
        &code,
    )
    .await?;

    let session_id = Uuid::new_v4().to_string();
    state.storage.store(&session_id, oauth_token).await?;

    let session_jwt =
        token::generate_session_token(&state.secret_key, &session_id, state.session_ttl_secs)?;
    let session_cookie = build_session_cookie(
        &session_jwt,
        state.session_ttl_secs,
        state.cookie_domain.as_deref(),
        state.cookie_secure,
    );

    let redirect_url = pending.next.unwrap_or_else(|| state.redirect_url.clone());

    tracing::info!("figshare login successful, redirecting to {redirect_url}");

    let mut response = Redirect::to(&redirect_url).into_response();
    response.headers_mut().append(
        header::SET_COOKIE,
        HeaderValue::from_str(&session_cookie).unwrap(),
    );
    Ok(response)
}
