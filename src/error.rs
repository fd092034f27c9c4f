//! Unified error type.

use thiserror::Error;

use crate::config::ConfigError;

/// The error type returned by the gateway's fallible startup and serving
/// operations.
///
/// Request-level failures (upstream down, bad identifier, …) are expressed as
/// HTTP [`Response`](crate::Response) values, not as `Error`s. This type
/// surfaces infrastructure failures: reading configuration, building the
/// upstream client, binding a port.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("upstream client: {0}")]
    Client(#[from] reqwest::Error),
}
