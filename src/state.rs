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

//! Shared blueprint state passed to every handler and middleware via `State`.

use std::collections::HashMap;
use std::sync::Arc;

use url::Url;

use crate::storage::{PendingLogins, TokenStorage};

/// Blueprint state shared across all request handlers.
///
/// Built once by [`crate::blueprint::FigshareBlueprintBuilder::build`] and
/// read-only thereafter.
#[derive(Clone)]
pub struct BlueprintState {
    /// OAuth client id. Empty when unresolved; the failure then surfaces at
    /// token exchange as an authentication error from the provider.
    pub client_id: String,
    /// OAuth client secret. `None` when unresolved.
    pub client_secret: Option<String>,
    /// Comma-separated scope string, omitted from the authorization URL when `None`.
    pub scope: Option<String>,
    /// Where to send the user after the dance completes.
    pub redirect_url: String,
    /// Absolute `redirect_uri` sent to the provider, or `None` to rely on the
    /// callback registered with the Figshare application.
    pub callback_url: Option<String>,
    /// Provider authorization endpoint.
    pub authorization_url: String,
    /// Provider token endpoint.
    pub token_url: String,
    /// Provider API base, always with a trailing slash.
    pub api_base_url: Url,
    /// Extra query parameters appended to the authorization URL
    /// (e.g. `auth_type=rerequest`).
    pub authorization_url_params: HashMap<String, String>,
    /// Session-cookie signing secret.
    pub secret_key: String,
    /// Session-cookie time-to-live in seconds.
    pub session_ttl_secs: i64,
    /// Cookie domain (e.g. ".example.com"), or `None` for default.
    pub cookie_domain: Option<String>,
    /// Whether to set the `Secure` attribute on the session cookie.
    pub cookie_secure: bool,
    /// Token store, keyed by session id.
    pub storage: Arc<dyn TokenStorage>,
    /// In-flight CSRF states.
    pub pending: Arc<PendingLogins>,
    /// HTTP client used for the token exchange and authenticated API calls.
    pub http: reqwest::Client,
}
