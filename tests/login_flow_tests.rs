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

//! Integration tests for the login redirect and the OAuth callback.


use std::collections::HashMap;

use axum::http::StatusCode;
use test_helpers::*;
use tower::ServiceExt;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use figshare_login::app;
use figshare_login::token::validate_session_token;

fn query_params(location: &str) -> HashMap<String, String> {
    Url::parse(location)
        .expect("redirect target should be a valid URL")
        .query_pairs()
        .into_owned()
        .collect()
}

#[tokio::test]
async fn index_without_session_redirects_to_login() {
    let blueprint = test_blueprint_builder().build();
    let app = app::router(&blueprint);

    let resp = app.oneshot(get_request("/")).await.unwrap();

    assert!(resp.status().is_redirection());
    assert_eq!(location(&resp), "/login/figshare");
}

#[tokio::test]
async fn login_redirects_to_figshare_authorization_endpoint() {
    let blueprint = test_blueprint_builder().build();
    let app = app::router(&blueprint);

    let resp = app.oneshot(get_request("/login/figshare")).await.unwrap();
    assert!(resp.status().is_redirection());

    let target = location(&resp);
    assert!(
        target.starts_with("https://figshare.com/account/applications/authorize"),
        "unexpected authorization target: {target}"
    );

    let params = query_params(&target);
    assert_eq!(params.get("client_id").map(String::as_str), Some(TEST_CLIENT_ID));
    assert_eq!(params.get("scope").map(String::as_str), Some("all"));
    assert_eq!(params.get("response_type").map(String::as_str), Some("code"));
    assert!(
        !params.get("state").unwrap_or(&String::new()).is_empty(),
        "state parameter must be present"
    );
}

#[tokio::test]
async fn rerequest_flag_adds_auth_type_parameter() {
    let blueprint = test_blueprint_builder()
        .rerequest_declined_permissions(true)
        .build();
    let app = app::router(&blueprint);

    let resp = app.oneshot(get_request("/login/figshare")).await.unwrap();
    let params = query_params(&location(&resp));
    assert_eq!(params.get("auth_type").map(String::as_str), Some("rerequest"));
}

#[tokio::test]
async fn default_login_omits_auth_type_parameter() {
    let blueprint = test_blueprint_builder().build();
    let app = app::router(&blueprint);

    let resp = app.oneshot(get_request("/login/figshare")).await.unwrap();
    let params = query_params(&location(&resp));
    assert!(!params.contains_key("auth_type"));
}

#[tokio::test]
async fn callback_with_unknown_state_is_rejected() {
    let blueprint = test_blueprint_builder().build();
    let app = app::router(&blueprint);

    let resp = app
        .oneshot(get_request(
            "/login/figshare/authorized?code=abc&state=never-issued",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn callback_without_state_is_rejected() {
    let blueprint = test_blueprint_builder().build();
    let app = app::router(&blueprint);

    let resp = app
        .oneshot(get_request("/login/figshare/authorized?code=abc"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn full_dance_stores_token_and_authorizes_the_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("client_id=test-client-id"))
        .and(body_string_contains("client_secret=test-client-secret"))
        .and(body_string_contains("code=auth-code-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "figshare-access-token",
            "token_type": "Bearer",
            "expires_in": 3600,
            "scope": "all"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/account/verify_credentials.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 12345
        })))
        .mount(&server)
        .await;

    let blueprint = test_blueprint_builder()
        .token_url(format!("{}/token", server.uri()))
        .api_base_url(format!("{}/v2", server.uri()))
        .build();
    let app = app::router(&blueprint);

    // Step 1: initiate login, capture the CSRF state from the redirect.
    let resp = app
        .clone()
        .oneshot(get_request("/login/figshare"))
        .await
        .unwrap();
    let params = query_params(&location(&resp));
    let state = params.get("state").expect("state must be present").clone();

    // Step 2: provider calls back with the code and the same state.
    let resp = app
        .clone()
        .oneshot(get_request(&format!(
            "/login/figshare/authorized?code=auth-code-123&state={state}"
        )))
        .await
        .unwrap();

    assert!(resp.status().is_redirection());
    assert_eq!(location(&resp), "/");

    // The cookie carries a signed session id whose stored token is the one
    // the mock token endpoint issued.
    let cookie = session_cookie(&resp);
    let jwt = cookie.strip_prefix("session=").expect("session cookie");
    let sid = validate_session_token(TEST_SECRET, jwt).expect("cookie should validate");

    let stored = blueprint
        .state()
        .storage
        .load(&sid)
        .await
        .unwrap()
        .expect("token should be stored");
    assert_eq!(stored.access_token, "figshare-access-token");

    // Step 3: the session resolved from that cookie is authorized, so the
    // index no longer redirects.
    let resp = app
        .oneshot(get_request_with_cookie("/", &cookie))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn callback_consumes_state_exactly_once() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "tok",
        })))
        .mount(&server)
        .await;

    let blueprint = test_blueprint_builder()
        .token_url(format!("{}/token", server.uri()))
        .build();
    let app = app::router(&blueprint);

    let resp = app
        .clone()
        .oneshot(get_request("/login/figshare"))
        .await
        .unwrap();
    let params = query_params(&location(&resp));
    let state = params.get("state").unwrap().clone();
    let callback = format!("/login/figshare/authorized?code=c&state={state}");

    let first = app.clone().oneshot(get_request(&callback)).await.unwrap();
    assert!(first.status().is_redirection());

    let second = app.oneshot(get_request(&callback)).await.unwrap();
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn failed_token_exchange_surfaces_as_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "invalid_client"
        })))
        .mount(&server)
        .await;

    let blueprint = test_blueprint_builder()
        .token_url(format!("{}/token", server.uri()))
        .build();
    let app = app::router(&blueprint);

    let resp = app
        .clone()
        .oneshot(get_request("/login/figshare"))
        .await
        .unwrap();
    let state = query_params(&location(&resp))
        .get("state")
        .unwrap()
        .clone();

    let resp = app
        .oneshot(get_request(&format!(
            "/login/figshare/authorized?code=c&state={state}"
        )))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn denied_authorization_redirects_without_cookie() {
    let blueprint = test_blueprint_builder().build();
    let app = app::router(&blueprint);

    let resp = app
        .clone()
        .oneshot(get_request("/login/figshare"))
        .await
        .unwrap();
    let state = query_params(&location(&resp))
        .get("state")
        .unwrap()
        .clone();

    let resp = app
        .oneshot(get_request(&format!(
            "/login/figshare/authorized?error=access_denied&state={state}"
        )))
        .await
        .unwrap();

    assert!(resp.status().is_redirection());
    assert_eq!(location(&resp), "/");
    assert!(resp.headers().get(axum::http::header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn next_parameter_overrides_post_login_redirect() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "tok",
        })))
        .mount(&server)
        .await;

    let blueprint = test_blueprint_builder()
        .token_url(format!("{}/token", server.uri()))
        .build();
    let app = app::router(&blueprint);

    let resp = app
        .clone()
        .oneshot(get_request("/login/figshare?next=/after-login"))
        .await
        .unwrap();
    let state = query_params(&location(&resp))
        .get("state")
        .unwrap()
        .clone();

    let resp = app
        .oneshot(get_request(&format!(
            "/login/figshare/authorized?code=c&state={state}"
        )))
        .await
        .unwrap();

    assert_eq!(location(&resp), "/after-login");
}
