//! Middleware for observability.
//!
//! Request logging with latency tracking.

pub mod logging;

pub use logging::{make_request_span, request_logging, route_of};
