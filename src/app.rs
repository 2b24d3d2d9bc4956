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

//! Demo application assembly.
//!
//! Mounts the Figshare blueprint under `/login` and exposes a single route:
//! `GET /` redirects unauthenticated visitors to the login view, otherwise
//! calls the Figshare account-verification endpoint and returns its body.

use axum::{
    body::Body,
    http::header,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};

use crate::blueprint::FigshareBlueprint;
use crate::config::Config;
use crate::error::AppError;
use crate::session::FigshareSession;

/// Prefix the blueprint is mounted under.
pub const LOGIN_PREFIX: &str = "/login";

/// Full path of the login view: mount prefix + default login route.
pub const FIGSHARE_LOGIN_PATH: &str = "/login/figshare";

/// Build the blueprint from the demo configuration.
pub fn blueprint_from_config(config: &Config) -> FigshareBlueprint {
    let mut builder = FigshareBlueprint::builder()
        .secret_key(&config.secret_key)
        .session_ttl_secs(config.session_ttl_secs)
        .cookie_secure(config.cookie_secure);

    if let Some(client_id) = &config.client_id {
        builder = builder.client_id(client_id);
    }
    if let Some(client_secret) = &config.client_secret {
        builder = builder.client_secret(client_secret);
    }
    if let Some(domain) = &config.cookie_domain {
        builder = builder.cookie_domain(domain);
    }

    builder.build()
}

/// Assemble the demo router around a prebuilt blueprint.
pub fn router(blueprint: &FigshareBlueprint) -> Router {
    blueprint.mount(Router::new().route("/", get(index)), LOGIN_PREFIX)
}

/// GET `/` -- redirect-or-verify.
///
/// Unauthenticated visitors are sent to the login view. Authenticated ones get
/// the raw body of `account/verify_credentials.json`; a non-success
/// verification response is treated as fatal for the request.
async fn index(session: FigshareSession) -> Result<Response, AppError> {
    if !session.authorized() {
        return Ok(Redirect::to(FIGSHARE_LOGIN_PATH).into_response());
    }

    let resp = session.get("account/verify_credentials.json").await?;
    assert!(
        resp.status().is_success(),
        "account verification failed with HTTP {}",
        resp.status()
    );

    let content_type = resp.headers().get(header::CONTENT_TYPE).cloned();
    let bytes = resp.bytes().await?;

    let mut response = Response::new(Body::from(bytes));
    if let Some(ct) = content_type {
        response.headers_mut().insert(header::CONTENT_TYPE, ct);
    }
    Ok(response)
}
