//! HTTP server module
//!
//! This module handles HTTP request routing and handling:
//! - Axum router with the video API endpoints
//! - Request handlers for summary lookup and download proxying
//! - The embedded front-end page
//! - HTTP headers (Content-Type, Content-Disposition)
//! - CORS middleware and request tracing

pub mod handlers;
pub mod routes;

pub use routes::create_router;
