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

//! OAuth2 helpers: authorization-URL construction and code → token exchange.

pub mod exchange;

pub use exchange::{build_auth_url, exchange_code, OAuthToken};
