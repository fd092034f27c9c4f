//! Client for the upstream recommendation service.
//!
//! One operation: `GET {base_url}{path}` and decode the JSON body into the
//! caller's type. Every failure is reported as a distinct [`UpstreamError`]
//! variant; how coarsely to surface them is the caller's decision.
//!
//! A single `reqwest::Client` is shared by every call. It pools connections
//! and enforces the configured timeout, which surfaces as
//! [`UpstreamError::Transport`].

use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The request could not complete: DNS, connection refused, timeout, or
    /// the body could not be read.
    #[error("transport failure calling {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream answered with a non-2xx status.
    #[error("upstream returned {status} for {url}")]
    Status { url: String, status: u16 },

    /// The body is not JSON, or not the expected shape.
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// A success status with an empty or `null` body.
    #[error("upstream returned no payload for {url}")]
    Empty { url: String },
}

impl UpstreamError {
    /// Short machine-friendly label, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Status { .. } => "status",
            Self::Decode { .. } => "decode",
            Self::Empty { .. } => "empty",
        }
    }
}

#[derive(Clone, Debug)]
pub struct UpstreamClient {
    base_url: String,
    http: reqwest::Client,
}

impl UpstreamClient {
    /// Builds a client for `base_url` (no trailing `/`) whose every call is
    /// bounded by `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url: base_url.into().trim_end_matches('/').to_owned(), http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base_url}{path}` decoded as `T`.
    #[instrument(skip(self), fields(base = %self.base_url))]
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, UpstreamError> {
        let url = format!("{}{path}", self.base_url);

        let res = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| UpstreamError::Transport { url: url.clone(), source })?;

        let status = res.status();
        if !status.is_success() {
            return Err(UpstreamError::Status { url, status: status.as_u16() });
        }

        let body = res
            .bytes()
            .await
            .map_err(|source| UpstreamError::Transport { url: url.clone(), source })?;
        debug!(status = status.as_u16(), bytes = body.len(), "upstream responded");

        decode(&url, &body)
    }
}

/// Empty bodies and a bare `null` are [`UpstreamError::Empty`]; everything
/// else must decode as `T`.
fn decode<T: DeserializeOwned>(url: &str, body: &[u8]) -> Result<T, UpstreamError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(UpstreamError::Empty { url: url.to_owned() });
    }
    match serde_json::from_slice::<Option<T>>(body) {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(UpstreamError::Empty { url: url.to_owned() }),
        Err(source) => Err(UpstreamError::Decode { url: url.to_owned(), source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Post;

    const URL: &str = "http://upstream/posts";

    #[test]
    fn decodes_expected_shape() {
        let posts: Vec<Post> = decode(URL, br#"[{"id":1,"votes":2}]"#).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].votes, 2);
    }

    #[test]
    fn empty_and_null_bodies_are_empty() {
        for body in [&b""[..], b"  \n", b"null", b" null "] {
            let err = decode::<Vec<Post>>(URL, body).unwrap_err();
            assert_eq!(err.kind(), "empty", "body {body:?}");
        }
    }

    #[test]
    fn malformed_or_wrong_shape_is_decode() {
        for body in [&b"<html>oops</html>"[..], b"{\"id\":1}", b"[1,2,3]", b"[{\"id\":\"x\"}]"] {
            let err = decode::<Vec<Post>>(URL, body).unwrap_err();
            assert_eq!(err.kind(), "decode", "body {body:?}");
        }
    }

    #[test]
    fn new_trims_trailing_slash() {
        let client = UpstreamClient::new("http://reco:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://reco:5000");
    }
}
