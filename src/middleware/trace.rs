//! Per-request tracing.
//!
//! Wraps one request in an `http.request` span carrying method and path, and
//! emits a single event with the final status and latency when it completes.

use std::future::Future;
use std::time::Instant;

use tracing::{Instrument, info, info_span};

use crate::response::Response;

/// Runs `next` inside a request span and logs its outcome.
pub async fn trace<F>(method: &http::Method, path: &str, next: F) -> Response
where
    F: Future<Output = Response>,
{
    let span = info_span!("http.request", method = %method, path = %path);
    async move {
        let started = Instant::now();
        let res = next.await;
        info!(
            status = res.status_code().as_u16(),
            latency_ms = started.elapsed().as_millis() as u64,
            "request completed"
        );
        res
    }
    .instrument(span)
    .await
}
