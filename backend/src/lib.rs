//! # Star Tracker Backend
//!
//! Computes where a bright star sits in an observer's sky and keeps a small
//! log of observations.
//!
//! ## Features
//!
//! - **Coordinate parsing**: decimal degrees with optional hemisphere suffix
//! - **Position lookup**: star catalog → equatorial → horizontal transform
//! - **Guidance**: compass direction and elevation phrased for people
//! - **Observation log**: append-only store with coordinates encrypted at rest
//! - **HTTP API**: RESTful endpoints behind an API key
//!
//! ## Architecture
//!
//! - [`astro`]: pure astronomy functions (normalizer, mapper, guidance)
//! - [`catalog`]: static star table and retrying target resolution
//! - [`crypto`]: encryption providers for stored coordinates
//! - [`db`]: repository pattern and persistence layer
//! - [`services`]: orchestration and input validation
//! - [`http`]: Axum-based HTTP server and request handlers
//! - [`config`]: TOML configuration with environment overrides

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod astro;
pub mod catalog;
pub mod config;
pub mod crypto;
pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
