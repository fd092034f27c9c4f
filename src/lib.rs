//! # postgate
//!
//! A small JSON gateway in front of a post recommendation service, for
//! browser clients that cannot reach the service themselves.
//!
//! ## What it does
//!
//! - `GET /posts` — the upstream post list, unchanged
//! - `GET /recommendations/{id}` — recommendations for an integer identifier
//! - `GET /top-posts` — posts with positive votes, most votes first
//! - allow-all CORS on every route
//!
//! Every upstream failure (unreachable, non-2xx, malformed JSON, `null` body)
//! becomes one `500` problem response per route.
//!
//! ## What it leaves to the proxy in front
//!
//! TLS termination, authentication, rate limiting and caching. None of them
//! exist here.
//!
//! ## Running it
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use postgate::{Config, Gateway, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), postgate::Error> {
//!     let config = Config::from_env()?;
//!     let gateway = Arc::new(Gateway::from_config(&config)?);
//!
//!     Server::bind(config.listen_addr)
//!         .serve(gateway.routes(&config))
//!         .await
//! }
//! ```

mod error;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod config;
pub mod gateway;
pub mod health;
pub mod middleware;
pub mod model;
pub mod openapi;
pub mod upstream;

pub use config::{Config, ConfigError, RecommendationShape};
pub use error::Error;
pub use gateway::{Gateway, GatewayError, Recommendations};
pub use method::Method;
pub use model::{Post, Recommendation};
pub use request::Request;
pub use response::{ContentType, IntoResponse, Json, Problem, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
pub use upstream::{UpstreamClient, UpstreamError};
