//! Food Ordering Backend Library
//!
//! Actors (customers and restaurants), menu items and orders behind a JSON REST API.
//! Exposes every module for the server binary and the integration tests.

pub mod access;
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod images;
pub mod middleware;
pub mod models;
pub mod response;
pub mod state;
pub mod store;
pub mod validation;

pub use api::create_router;
pub use config::Config;
pub use error::ApiError;
pub use state::AppState;
