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

//! Demo application configuration loaded from environment variables.

use std::env;

/// Configuration for the demo application.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the HTTP server (e.g. "0.0.0.0:8080").
    pub listen_addr: String,
    /// Secret used to sign the session cookie.
    pub secret_key: String,
    /// Figshare OAuth client id. `None` when unset; the OAuth dance then
    /// fails at the token endpoint rather than at startup.
    pub client_id: Option<String>,
    /// Figshare OAuth client secret. `None` when unset.
    pub client_secret: Option<String>,
    /// Cookie domain (optional, e.g. ".example.com").
    pub cookie_domain: Option<String>,
    /// Whether the session cookie carries the `Secure` attribute.
    pub cookie_secure: bool,
    /// Session-cookie time-to-live in seconds (default: 3600).
    pub session_ttl_secs: i64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Optional
    /// - `LISTEN_ADDR` (default: `"0.0.0.0:8080"`)
    /// - `SECRET_KEY` (default: `"supersekrit"`)
    /// - `FIGSHARE_OAUTH_CLIENT_KEY`
    /// - `FIGSHARE_OAUTH_CLIENT_SECRET`
    /// - `COOKIE_DOMAIN`
    /// - `COOKIE_SECURE` (default: `"false"`)
    /// - `SESSION_TTL_SECS` (default: `"3600"`)
    pub fn from_env() -> Result<Self, String> {
        let listen_addr = env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let secret_key = env::var("SECRET_KEY").unwrap_or_else(|_| "supersekrit".to_string());

        let client_id = env::var("FIGSHARE_OAUTH_CLIENT_KEY")
            .ok()
            .filter(|s| !s.is_empty());
        let client_secret = env::var("FIGSHARE_OAUTH_CLIENT_SECRET")
            .ok()
            .filter(|s| !s.is_empty());

        let cookie_domain = env::var("COOKIE_DOMAIN").ok().filter(|s| !s.is_empty());
        let cookie_secure = env::var("COOKIE_SECURE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let session_ttl_secs = env::var("SESSION_TTL_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse::<i64>()
            .map_err(|_| "SESSION_TTL_SECS must be a valid integer")?;

        Ok(Self {
            listen_addr,
            secret_key,
            client_id,
            client_secret,
            cookie_domain,
            cookie_secure,
            session_ttl_secs,
        })
    }
}
