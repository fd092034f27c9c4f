//! Cross-origin resource sharing, allow-all policy.
//!
//! Any origin, any method, any header. Browsers on other origins can call
//! every route; nothing is tightened per path.
//!
//! - Every response carries `access-control-allow-origin: *`, whatever the
//!   status.
//! - Every `OPTIONS` request is a preflight. It is answered `200` by the
//!   layer itself, echoing the requested method and headers, and never
//!   reaches the router, so it succeeds on every path.

use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};

/// The layer the server wraps around request dispatch.
pub fn layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use bytes::Bytes;
    use http::{Request, Response, StatusCode};
    use http_body_util::Full;
    use tower::{ServiceBuilder, ServiceExt};

    use super::*;

    async fn call(req: Request<Full<Bytes>>) -> Response<Full<Bytes>> {
        ServiceBuilder::new()
            .layer(layer())
            .service_fn(|_req: Request<Full<Bytes>>| async {
                Ok::<_, Infallible>(Response::new(Full::new(Bytes::from_static(b"routed"))))
            })
            .oneshot(req)
            .await
            .unwrap()
    }

    fn header<'a>(res: &'a Response<Full<Bytes>>, name: &str) -> Option<&'a str> {
        res.headers().get(name).and_then(|v| v.to_str().ok())
    }

    #[tokio::test]
    async fn preflight_allows_any_requested_method() {
        let req = Request::options("/posts")
            .header("origin", "https://a.example")
            .header("access-control-request-method", "PROPFIND")
            .body(Full::default())
            .unwrap();

        let res = call(req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(header(&res, "access-control-allow-origin"), Some("*"));
        assert_eq!(header(&res, "access-control-allow-methods"), Some("PROPFIND"));
    }

    #[tokio::test]
    async fn preflight_echoes_requested_headers() {
        let req = Request::options("/recommendations/1")
            .header("origin", "https://a.example")
            .header("access-control-request-method", "GET")
            .header("access-control-request-headers", "x-custom, content-type")
            .body(Full::default())
            .unwrap();

        let res = call(req).await;
        assert_eq!(header(&res, "access-control-allow-methods"), Some("GET"));
        assert_eq!(header(&res, "access-control-allow-headers"), Some("x-custom, content-type"));
    }

    #[tokio::test]
    async fn simple_request_reaches_the_service_with_allow_origin() {
        let req = Request::get("/top-posts")
            .header("origin", "https://a.example")
            .body(Full::default())
            .unwrap();

        let res = call(req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(header(&res, "access-control-allow-origin"), Some("*"));
        assert_eq!(header(&res, "access-control-allow-methods"), None);
    }
}
