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

//! Auth URL construction and authorization code → token exchange.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AppError;

/// Token acquired from the Figshare token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Build the Figshare authorization URL.
///
/// Parameters are properly URL-encoded. `scope` and `redirect_uri` are
/// appended only when provided; `extra_auth_params` carries provider quirks
/// such as `auth_type=rerequest`.
pub fn build_auth_url(
    auth_url: &str,
    client_id: &str,
    scope: Option<&str>,
    redirect_uri: Option<&str>,
    csrf_state: &str,
    extra_auth_params: &HashMap<String, String>,
) -> String {
    let mut url = Url::parse(auth_url).expect("authorization URL must be a valid URL");

    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("client_id", client_id);
        pairs.append_pair("response_type", "code");
        pairs.append_pair("state", csrf_state);

        if let Some(s) = scope {
            pairs.append_pair("scope", s);
        }
        if let Some(r) = redirect_uri {
            pairs.append_pair("redirect_uri", r);
        }
        for (k, v) in extra_auth_params {
            pairs.append_pair(k, v);
        }
    }

    url.to_string()
}

/// Exchange an authorization code for a token at `token_url`.
///
/// A non-success response is logged and surfaced as an error; there are no
/// retries. Missing credentials surface here as whatever authentication
/// failure the provider returns.
pub async fn exchange_code(
    client: &reqwest::Client,
    token_url: &str,
    client_id: &str,
    client_secret: Option<&str>,
    redirect_uri: Option<&str>,
    authorization_code: &str,
) -> Result<OAuthToken, AppError> {
    let mut params = vec![
        ("grant_type", "authorization_code"),
        ("client_id", client_id),
        ("code", authorization_code),
    ];

    // Only include client_secret when configured (confidential clients).
    if let Some(secret) = client_secret {
        params.push(("client_secret", secret));
    }
    if let Some(redirect) = redirect_uri {
        params.push(("redirect_uri", redirect));
    }

    let response = client
        .post(token_url)
        .form(&params)
        .send()
        .await
        .map_err(|e| AppError::internal(&format!("OAuth token request failed: {e}")))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::error!("OAuth token request failed. Status: {status}, Body: {body}");
        return Err(AppError::internal("OAuth token exchange failed"));
    }

    let body_text = response
        .text()
        .await
        .map_err(|e| AppError::internal(&format!("Failed to read OAuth response: {e}")))?;

    serde_json::from_str(&body_text)
        .map_err(|e| AppError::internal(&format!("Failed to parse OAuth response: {e}")))
}
