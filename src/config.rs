//! Startup configuration.
//!
//! Everything is read once from the process environment, after an optional
//! `.env` file has been loaded, into an explicit [`Config`] value. Nothing
//! reads the environment after startup; the gateway and its upstream client
//! receive their settings at construction.
//!
//! | Variable | Default |
//! |---|---|
//! | `UPSTREAM_API_URL` (or legacy `FLASK_API_URL`) | [`PLACEHOLDER_UPSTREAM_URL`] |
//! | `GATEWAY_LISTEN_ADDR` | `0.0.0.0:80` |
//! | `UPSTREAM_TIMEOUT_SECS` | `30` |
//! | `RECOMMENDATION_SHAPE` | `titles` |
//! | `GATEWAY_OPENAPI` | `true` |

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Used when no upstream URL is configured. Requests against it fail as
/// transport errors; it only keeps the process from refusing to start.
pub const PLACEHOLDER_UPSTREAM_URL: &str = "http://default-url-if-env-var-is-not-set";

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:80";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a socket address like 0.0.0.0:80, got `{value}`")]
    InvalidListenAddr { var: &'static str, value: String },

    #[error("{var} must be a positive number of seconds, got `{value}`")]
    InvalidTimeout { var: &'static str, value: String },

    #[error("{var} must be `titles` or `records`, got `{value}`")]
    InvalidRecommendationShape { var: &'static str, value: String },

    #[error("{var} must be `true` or `false`, got `{value}`")]
    InvalidFlag { var: &'static str, value: String },
}

/// The element shape of `/recommendations/{id}` arrays.
///
/// The upstream service has been deployed with both shapes, so the choice is
/// explicit rather than guessed per response.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RecommendationShape {
    /// `["First post", "Second post"]`
    #[default]
    Titles,
    /// `[{"title": "First post", "score": "0.93"}]`
    Records,
}

impl FromStr for RecommendationShape {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "titles" => Ok(Self::Titles),
            "records" => Ok(Self::Records),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Upstream base URL without a trailing `/`.
    pub upstream_url: String,
    pub listen_addr: SocketAddr,
    pub upstream_timeout: Duration,
    pub recommendation_shape: RecommendationShape,
    /// Serve `GET /openapi.json`.
    pub openapi: bool,
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Empty values count as
    /// unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let upstream_url = get("UPSTREAM_API_URL")
            .or_else(|| get("FLASK_API_URL"))
            .map(|url| url.trim().trim_end_matches('/').to_owned())
            .unwrap_or_else(|| PLACEHOLDER_UPSTREAM_URL.to_owned());

        let listen_addr: SocketAddr = match get("GATEWAY_LISTEN_ADDR") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidListenAddr {
                var: "GATEWAY_LISTEN_ADDR",
                value,
            })?,
            None => DEFAULT_LISTEN_ADDR.parse().map_err(|_| ConfigError::InvalidListenAddr {
                var: "GATEWAY_LISTEN_ADDR",
                value: DEFAULT_LISTEN_ADDR.to_owned(),
            })?,
        };

        let upstream_timeout = match get("UPSTREAM_TIMEOUT_SECS") {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidTimeout { var: "UPSTREAM_TIMEOUT_SECS", value });
                }
            },
            None => Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        };

        let recommendation_shape: RecommendationShape = match get("RECOMMENDATION_SHAPE") {
            Some(value) => value.parse().map_err(|()| ConfigError::InvalidRecommendationShape {
                var: "RECOMMENDATION_SHAPE",
                value,
            })?,
            None => RecommendationShape::default(),
        };

        let openapi = match get("GATEWAY_OPENAPI") {
            Some(value) => parse_flag(&value)
                .ok_or(ConfigError::InvalidFlag { var: "GATEWAY_OPENAPI", value })?,
            None => true,
        };

        Ok(Self { upstream_url, listen_addr, upstream_timeout, recommendation_shape, openapi })
    }

    /// `true` when no upstream URL was configured.
    pub fn uses_placeholder_upstream(&self) -> bool {
        self.upstream_url == PLACEHOLDER_UPSTREAM_URL
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
