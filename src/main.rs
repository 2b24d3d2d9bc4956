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

//! Demo server entry point: login-with-Figshare behind a single
//! redirect-or-verify route.

use figshare_login::app;
use figshare_login::config::Config;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env().expect("failed to load configuration");

    if config.client_id.is_none() {
        tracing::warn!(
            "FIGSHARE_OAUTH_CLIENT_KEY is unset; login will fail at the token endpoint"
        );
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let blueprint = app::blueprint_from_config(&config);
    let router = app::router(&blueprint).layer(cors);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .expect("failed to bind listener");

    tracing::info!("figshare-login demo listening on {}", config.listen_addr);

    axum::serve(listener, router).await.expect("server error");
}
