//! The gateway's public operations and their route table.
//!
//! | Route | Upstream call | Result |
//! |---|---|---|
//! | `GET /posts` | `/posts` | posts, unchanged |
//! | `GET /recommendations/{id:int}` | `/recommendations/{id}` | recommendation items |
//! | `GET /top-posts` | `/posts` | positively voted posts, most votes first |
//!
//! Any upstream failure, whatever its kind, becomes one `500` problem response
//! per operation. The kind is logged, never shown to the client.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::config::{Config, RecommendationShape};
use crate::error::Error;
use crate::health;
use crate::model::{self, Post, Recommendation};
use crate::openapi;
use crate::request::Request;
use crate::response::{IntoResponse, Json, Problem, Response};
use crate::router::Router;
use crate::status::Status;
use crate::upstream::{UpstreamClient, UpstreamError};

/// Items of a `/recommendations/{id}` response, in the configured shape.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Recommendations {
    Titles(Vec<String>),
    Records(Vec<Recommendation>),
}

/// A failed gateway operation, as the client sees it.
#[derive(Debug)]
pub enum GatewayError {
    Posts(UpstreamError),
    Recommendations { id: i32, source: UpstreamError },
}

impl GatewayError {
    /// The upstream failure behind this error.
    pub fn upstream(&self) -> &UpstreamError {
        match self {
            Self::Posts(source) | Self::Recommendations { source, .. } => source,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let detail = match &self {
            Self::Posts(_) => "Error retrieving posts from the upstream API.".to_owned(),
            Self::Recommendations { id, .. } => {
                format!("Error retrieving recommendations for row number {id} from the upstream API.")
            }
        };
        Problem::new(Status::InternalServerError, detail).into_response()
    }
}

pub struct Gateway {
    upstream: UpstreamClient,
    recommendation_shape: RecommendationShape,
}

impl Gateway {
    pub fn new(upstream: UpstreamClient, recommendation_shape: RecommendationShape) -> Self {
        Self { upstream, recommendation_shape }
    }

    /// Builds the gateway, and its upstream client, from startup configuration.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let upstream = UpstreamClient::new(config.upstream_url.clone(), config.upstream_timeout)?;
        Ok(Self::new(upstream, config.recommendation_shape))
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>, GatewayError> {
        self.fetch_posts().await
    }

    pub async fn recommendations(&self, id: i32) -> Result<Recommendations, GatewayError> {
        let path = format!("/recommendations/{id}");
        let result = match self.recommendation_shape {
            RecommendationShape::Titles => {
                self.upstream.get_json(&path).await.map(Recommendations::Titles)
            }
            RecommendationShape::Records => {
                self.upstream.get_json(&path).await.map(Recommendations::Records)
            }
        };
        result.map_err(|source| {
            warn!(id, kind = source.kind(), "recommendations unavailable: {source}");
            GatewayError::Recommendations { id, source }
        })
    }

    pub async fn top_posts(&self) -> Result<Vec<Post>, GatewayError> {
        self.fetch_posts().await.map(model::top_posts)
    }

    async fn fetch_posts(&self) -> Result<Vec<Post>, GatewayError> {
        self.upstream.get_json("/posts").await.map_err(|source| {
            warn!(kind = source.kind(), "posts unavailable: {source}");
            GatewayError::Posts(source)
        })
    }

    /// The full route table: the three operations, health checks and, when
    /// enabled, the API description.
    pub fn routes(self: Arc<Self>, config: &Config) -> Router {
        let posts = Arc::clone(&self);
        let recs = Arc::clone(&self);
        let top = Arc::clone(&self);
        let ready = !config.uses_placeholder_upstream();

        let router = Router::new()
            .get("/posts", move |_req: Request| {
                let gw = Arc::clone(&posts);
                async move { gw.list_posts().await.map(Json) }
            })
            .get("/recommendations/{id:int}", move |req: Request| {
                let gw = Arc::clone(&recs);
                async move {
                    // The route constraint guarantees an i32 segment.
                    let Some(id) = req.param_as::<i32>("id") else {
                        return Problem::new(Status::BadRequest, "Identifier must be an integer.")
                            .into_response();
                    };
                    gw.recommendations(id).await.map(Json).into_response()
                }
            })
            .get("/top-posts", move |_req: Request| {
                let gw = Arc::clone(&top);
                async move { gw.top_posts().await.map(Json) }
            })
            .get("/healthz", health::liveness)
            .get("/readyz", move |_req: Request| health::readiness(ready));

        if config.openapi {
            router.get("/openapi.json", openapi::handler)
        } else {
            router
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn unreachable_gateway() -> Gateway {
        // Port 9 (discard) on loopback: connection refused, immediately.
        let upstream = UpstreamClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        Gateway::new(upstream, RecommendationShape::Titles)
    }

    #[test]
    fn posts_error_is_generic_500() {
        let err = GatewayError::Posts(UpstreamError::Empty { url: "http://u/posts".into() });
        let res = err.into_response();
        assert_eq!(res.status_code(), Status::InternalServerError);

        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["detail"], "Error retrieving posts from the upstream API.");
        assert!(!body.to_string().contains("http://u/posts"), "no internals leak");
    }

    #[test]
    fn recommendations_error_names_identifier() {
        let err = GatewayError::Recommendations {
            id: 7,
            source: UpstreamError::Status { url: "http://u/recommendations/7".into(), status: 502 },
        };
        assert_eq!(err.upstream().kind(), "status");

        let body: serde_json::Value = serde_json::from_slice(err.into_response().body()).unwrap();
        assert_eq!(
            body["detail"],
            "Error retrieving recommendations for row number 7 from the upstream API."
        );
    }

    #[test]
    fn recommendations_serialise_as_plain_arrays() {
        let titles = Recommendations::Titles(vec!["a".into(), "b".into()]);
        assert_eq!(serde_json::to_string(&titles).unwrap(), r#"["a","b"]"#);

        let records = Recommendations::Records(vec![Recommendation {
            title: "a".into(),
            score: "0.5".into(),
        }]);
        assert_eq!(serde_json::to_string(&records).unwrap(), r#"[{"title":"a","score":"0.5"}]"#);
    }

    #[tokio::test]
    async fn unreachable_upstream_is_a_transport_failure() {
        let gw = unreachable_gateway();
        let err = gw.list_posts().await.unwrap_err();
        assert_eq!(err.upstream().kind(), "transport");
        assert!(matches!(gw.top_posts().await, Err(GatewayError::Posts(_))));
        assert!(matches!(
            gw.recommendations(3).await,
            Err(GatewayError::Recommendations { id: 3, .. })
        ));
    }
}
