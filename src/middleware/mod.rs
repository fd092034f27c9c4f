//! Middleware layer.
//!
//! Cross-cutting concerns applied by the server around every request, before
//! and after routing. Handlers never see them.
//!
//! - [`cors`]: allow-all `CorsLayer`, answers preflights before routing
//! - [`trace`]: per-request span with method, path, status and latency

pub mod cors;
pub mod trace;
