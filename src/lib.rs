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

//! Login-with-Figshare OAuth2 blueprint.
//!
//! This crate provides a mountable Axum router implementing the Figshare
//! authorization-code flow (login + callback), a per-request session layer,
//! and a pluggable token store. The binary entry point (`main.rs`) is a thin
//! demo wrapper that mounts the blueprint under `/login` and exposes a single
//! redirect-or-verify route.

pub mod app;
pub mod blueprint;
pub mod config;
pub mod error;
pub mod oauth;
pub mod routes;
pub mod session;
pub mod state;
pub mod storage;
pub mod token;
