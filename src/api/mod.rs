//! API Module
//!
//! HTTP handlers and routing for the admin REST API over a running cache
//! and quota group.
//!
//! # Endpoints
//! - `PUT /cache`, `DELETE /cache` - Store a response, clear the cache
//! - `GET /cache/:key`, `DELETE /cache/:key` - Read or invalidate a key
//! - `GET /stats` - Cache and quota statistics
//! - `GET /quota` - Admission status
//! - `POST /quota/acquire`, `POST /quota/reset` - Admit a call, reset quotas
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
