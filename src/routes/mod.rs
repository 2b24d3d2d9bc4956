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

//! Axum router configuration for the blueprint routes.

pub mod oauth;

use axum::{routing::get, Router};

use crate::state::BlueprintState;

/// Build the blueprint router with the configured login/authorized paths.
pub fn router(login_url: &str, authorized_url: &str, state: BlueprintState) -> Router {
    Router::new()
        .route(login_url, get(oauth::login))
        .route(authorized_url, get(oauth::authorized))
        .with_state(state)
}
