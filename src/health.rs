//! Kubernetes health-check handlers.
//!
//! | Probe | Path | Answer |
//! |---|---|---|
//! | **Liveness** | `/healthz` | `200 ok` whenever the process can serve HTTP. |
//! | **Readiness** | `/readyz` | `200 ready`, or `503` while no upstream URL is configured. |
//!
//! Readiness does not call the upstream: a slow upstream should produce
//! `500`s on the data routes, not pull every gateway pod out of rotation.

use crate::{Request, Response, Status};

/// Liveness check. No dependencies, always `200 OK`.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// Readiness check. `configured` is false while the placeholder upstream URL
/// is in effect, since every data route would fail.
pub async fn readiness(configured: bool) -> Response {
    if configured {
        Response::text("ready")
    } else {
        Response::builder()
            .status(Status::ServiceUnavailable)
            .text("upstream URL not configured")
    }
}
