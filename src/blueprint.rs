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

//! The login-with-Figshare blueprint: a configured, mountable pair of routes
//! (`login` + `authorized`) plus a per-request session layer.
//!
//! ```ignore
//! let bp = FigshareBlueprint::builder()
//!     .client_id("...")
//!     .client_secret("...")
//!     .build();
//! let app = bp.mount(Router::new().route("/", get(index)), "/login");
//! ```

use std::collections::HashMap;
use std::env;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::{self, Next},
    response::Response,
    Router,
};
use url::Url;

use crate::oauth::OAuthToken;
use crate::routes;
use crate::session::FigshareSession;
use crate::state::BlueprintState;
use crate::storage::{MemoryStorage, PendingLogins, TokenStorage};
use crate::token;

/// Figshare authorization endpoint.
pub const AUTHORIZATION_URL: &str = "https://figshare.com/account/applications/authorize";
/// Figshare token endpoint.
pub const TOKEN_URL: &str = "https://api.figshare.com/v2/token";
/// Figshare API base.
pub const API_BASE_URL: &str = "https://api.figshare.com/v2";

/// Well-known environment keys consulted when the builder is not given
/// credentials explicitly.
pub const CLIENT_ID_ENV: &str = "FIGSHARE_OAUTH_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "FIGSHARE_OAUTH_CLIENT_SECRET";
pub const REDIRECT_URL_ENV: &str = "FIGSHARE_OAUTH_REDIRECT_URL";

const DEFAULT_LOGIN_URL: &str = "/figshare";
const DEFAULT_AUTHORIZED_URL: &str = "/figshare/authorized";
const DEFAULT_SECRET_KEY: &str = "supersekrit";
const DEFAULT_SESSION_TTL_SECS: i64 = 3600;

/// A configured login-with-Figshare routing unit.
///
/// At most one blueprint should exist per application instance; its
/// configuration is immutable after [`FigshareBlueprintBuilder::build`].
pub struct FigshareBlueprint {
    state: BlueprintState,
    login_url: String,
    authorized_url: String,
}

impl FigshareBlueprint {
    pub fn builder() -> FigshareBlueprintBuilder {
        FigshareBlueprintBuilder::default()
    }

    /// The blueprint's routes, mountable under any prefix via `Router::nest`.
    pub fn router(&self) -> Router {
        routes::router(&self.login_url, &self.authorized_url, self.state.clone())
    }

    /// Mount the blueprint under `prefix` and install the session layer around
    /// the whole application, so every handler can extract
    /// [`FigshareSession`].
    pub fn mount(&self, app: Router, prefix: &str) -> Router {
        app.nest(prefix, self.router()).layer(middleware::from_fn_with_state(
            self.state.clone(),
            publish_session,
        ))
    }

    /// Route path of the login view, relative to the mount prefix.
    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    /// Route path of the authorized (callback) view, relative to the mount prefix.
    pub fn authorized_url(&self) -> &str {
        &self.authorized_url
    }

    pub fn state(&self) -> &BlueprintState {
        &self.state
    }
}

/// Builder for [`FigshareBlueprint`].
///
/// Credentials left unset fall back to the process-wide
/// [`CLIENT_ID_ENV`]/[`CLIENT_SECRET_ENV`] keys at build time; when those are
/// missing too, the blueprint still builds and the failure surfaces at token
/// exchange.
#[derive(Default)]
pub struct FigshareBlueprintBuilder {
    client_id: Option<String>,
    client_secret: Option<String>,
    scope: Option<String>,
    redirect_url: Option<String>,
    callback_url: Option<String>,
    login_url: Option<String>,
    authorized_url: Option<String>,
    rerequest_declined_permissions: bool,
    authorization_url: Option<String>,
    token_url: Option<String>,
    api_base_url: Option<String>,
    secret_key: Option<String>,
    session_ttl_secs: Option<i64>,
    cookie_domain: Option<String>,
    cookie_secure: bool,
    storage: Option<Arc<dyn TokenStorage>>,
    http_client: Option<reqwest::Client>,
}

impl FigshareBlueprintBuilder {
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Comma-separated list of scopes for the OAuth token.
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Where to redirect the user after the authentication dance completes.
    /// Defaults to `/`.
    pub fn redirect_url(mut self, redirect_url: impl Into<String>) -> Self {
        self.redirect_url = Some(redirect_url.into());
        self
    }

    /// Absolute `redirect_uri` passed to the provider. When unset, the
    /// parameter is omitted and Figshare uses the callback registered with the
    /// application.
    pub fn callback_url(mut self, callback_url: impl Into<String>) -> Self {
        self.callback_url = Some(callback_url.into());
        self
    }

    /// Route path for the login view. Defaults to `/figshare`.
    pub fn login_url(mut self, login_url: impl Into<String>) -> Self {
        self.login_url = Some(login_url.into());
        self
    }

    /// Route path for the authorized view. Defaults to `/figshare/authorized`.
    pub fn authorized_url(mut self, authorized_url: impl Into<String>) -> Self {
        self.authorized_url = Some(authorized_url.into());
        self
    }

    /// Ask Figshare again for permissions the user previously declined, by
    /// adding `auth_type=rerequest` to the authorization URL.
    pub fn rerequest_declined_permissions(mut self, rerequest: bool) -> Self {
        self.rerequest_declined_permissions = rerequest;
        self
    }

    /// Override the authorization endpoint (tests).
    pub fn authorization_url(mut self, url: impl Into<String>) -> Self {
        self.authorization_url = Some(url.into());
        self
    }

    /// Override the token endpoint (tests).
    pub fn token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = Some(url.into());
        self
    }

    /// Override the API base (tests).
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Session-cookie signing secret. Defaults to `supersekrit`.
    pub fn secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn session_ttl_secs(mut self, ttl_secs: i64) -> Self {
        self.session_ttl_secs = Some(ttl_secs);
        self
    }

    pub fn cookie_domain(mut self, domain: impl Into<String>) -> Self {
        self.cookie_domain = Some(domain.into());
        self
    }

    pub fn cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    /// Token store. Defaults to the in-process [`MemoryStorage`].
    pub fn storage(mut self, storage: Arc<dyn TokenStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// HTTP client used for the token exchange and authenticated API calls.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn build(self) -> FigshareBlueprint {
        let mut authorization_url_params = HashMap::new();
        if self.rerequest_declined_permissions {
            authorization_url_params.insert("auth_type".to_string(), "rerequest".to_string());
        }

        let client_id = self
            .client_id
            .or_else(|| env::var(CLIENT_ID_ENV).ok())
            .unwrap_or_default();
        let client_secret = self
            .client_secret
            .or_else(|| env::var(CLIENT_SECRET_ENV).ok());
        let callback_url = self
            .callback_url
            .or_else(|| env::var(REDIRECT_URL_ENV).ok());

        let api_base = self
            .api_base_url
            .unwrap_or_else(|| API_BASE_URL.to_string());
        let api_base_url = Url::parse(&normalize_base_url(&api_base))
            .expect("API base URL must be a valid URL");

        let state = BlueprintState {
            client_id,
            client_secret,
            scope: self.scope,
            redirect_url: self.redirect_url.unwrap_or_else(|| "/".to_string()),
            callback_url,
            authorization_url: self
                .authorization_url
                .unwrap_or_else(|| AUTHORIZATION_URL.to_string()),
            token_url: self.token_url.unwrap_or_else(|| TOKEN_URL.to_string()),
            api_base_url,
            authorization_url_params,
            secret_key: self
                .secret_key
                .unwrap_or_else(|| DEFAULT_SECRET_KEY.to_string()),
            session_ttl_secs: self.session_ttl_secs.unwrap_or(DEFAULT_SESSION_TTL_SECS),
            cookie_domain: self.cookie_domain,
            cookie_secure: self.cookie_secure,
            storage: self
                .storage
                .unwrap_or_else(|| Arc::new(MemoryStorage::default())),
            pending: Arc::new(PendingLogins::default()),
            http: self.http_client.unwrap_or_default(),
        };

        FigshareBlueprint {
            state,
            login_url: self.login_url.unwrap_or_else(|| DEFAULT_LOGIN_URL.to_string()),
            authorized_url: self
                .authorized_url
                .unwrap_or_else(|| DEFAULT_AUTHORIZED_URL.to_string()),
        }
    }
}

/// `Url::join` treats a base without a trailing slash as a file and would drop
/// its last segment.
fn normalize_base_url(base: &str) -> String {
    if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    }
}

/// Middleware that publishes the current [`FigshareSession`] into the request
/// extensions, once per request, before any handler runs.
///
/// Resolution is session cookie → session id → stored token; every step
/// failing soft (no cookie, bad signature, unknown id) yields an unauthorized
/// session rather than an error.
pub async fn publish_session(
    State(state): State<BlueprintState>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = resolve_token(&state, req.headers().get(header::COOKIE)).await;
    let session = FigshareSession::new(&state, token);
    req.extensions_mut().insert(session);
    next.run(req).await
}

async fn resolve_token(
    state: &BlueprintState,
    cookie_header: Option<&header::HeaderValue>,
) -> Option<OAuthToken> {
    let cookie_header = cookie_header.and_then(|v| v.to_str().ok())?;
    let jwt = session_cookie_value(cookie_header)?;
    let sid = token::validate_session_token(&state.secret_key, jwt)?;

    match state.storage.load(&sid).await {
        Ok(token) => token,
        Err(err) => {
            tracing::error!("token storage lookup failed: {}", err.body.message);
            None
        }
    }
}

/// Pull the [`token::SESSION_COOKIE`] value out of a `Cookie` header.
fn session_cookie_value(cookie_header: &str) -> Option<&str> {
    for pair in cookie_header.split(';') {
        let pair = pair.trim();
        if let Some(value) = pair.strip_prefix("session=") {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value);
            }
        }
    }
    None
}
